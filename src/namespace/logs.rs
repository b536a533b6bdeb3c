use std::path::PathBuf;

use crate::error::ConfigError;
use crate::namespace::{file_name, PathNamespace};
use crate::unit::JobKey;

const METRICS_DIR: &str = "metrics";
const LOGS_DIR: &str = "logs";
const SCRIPTS_DIR: &str = "scripts";

/// Scheduler log streams of one job
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LogStream {
    Output,
    Error,
}

/// Metrics tables, one per input file (or per file pair for post hoc results)
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Metrics {
    Compression,
    ErrorAnalysis,
    PostHoc,
}

impl Metrics {
    /// CSV header written before any job appends rows
    pub fn header(&self) -> &'static [&'static str] {
        match self {
            Metrics::Compression => &[
                "job_id",
                "Compressor_Name",
                "Compression_Time",
                "Compression_Throughput",
                "Decompression_Time",
                "Decompression_Throughput",
                "Ratio",
            ],
            Metrics::ErrorAnalysis => &["job_id", "Compressor_Name", "MSE", "PSNR"],
            Metrics::PostHoc => &[
                "job_id",
                "Compressor_Name",
                "True_Positives",
                "False_Positives",
                "False_Negatives",
                "Precision",
                "Recall",
                "F1_Score",
            ],
        }
    }

    fn stage_dir(&self) -> &'static str {
        match self {
            Metrics::Compression => "compression",
            Metrics::ErrorAnalysis => "error_analysis",
            Metrics::PostHoc => "post_hoc",
        }
    }

    fn prefix(&self) -> &'static str {
        match self {
            Metrics::Compression => "compression_metrics",
            Metrics::ErrorAnalysis => "error_analysis_metrics",
            Metrics::PostHoc => "post_hoc",
        }
    }
}

impl PathNamespace {
    /// `{stage}/metrics/{prefix}_{input name}.csv`
    ///
    /// Post hoc results are per file pair and always named after the first file.
    pub fn metrics_path(&self, metrics: Metrics, pair: usize, file: usize) -> Result<PathBuf, ConfigError> {
        let file = match metrics {
            Metrics::PostHoc => 0,
            _ => file,
        };
        let input = self.input_path(pair, file)?;
        let name = format!("{}_{}.csv", metrics.prefix(), file_name(&input));
        let dir = self.work_dir.join(metrics.stage_dir()).join(METRICS_DIR);
        self.place(dir, &name)
    }

    /// `{stage}/scripts/{job key}.sh`
    pub fn script_path(&self, key: &JobKey) -> Result<PathBuf, ConfigError> {
        let dir = self.work_dir.join(key.stage_dir()).join(SCRIPTS_DIR);
        self.place(dir, &format!("{key}.sh"))
    }

    /// `{stage}/logs/{job key}_output.log` or `_error.log`
    pub fn log_path(&self, key: &JobKey, stream: LogStream) -> Result<PathBuf, ConfigError> {
        let suffix = match stream {
            LogStream::Output => "output",
            LogStream::Error => "error",
        };
        let dir = self.work_dir.join(key.stage_dir()).join(LOGS_DIR);
        self.place(dir, &format!("{key}_{suffix}.log"))
    }
}

//! Rendering contexts for the stage bodies
//!
//! Field names match the placeholders in `data/templates`.

use std::path::PathBuf;

use serde::Serialize;

use crate::error::ConfigError;
use crate::namespace::alignment::Alignment;
use crate::namespace::fields::FastqField;
use crate::namespace::logs::Metrics;
use crate::namespace::PathNamespace;
use crate::scheduler::Scheduler;
use crate::unit::WorkUnit;

/// Splits one input into its four field streams
#[derive(Serialize)]
pub struct SplitContext {
    fastq_split: String,
    input_path: String,
    base_id_path: String,
    dna_bases_path: String,
    quality_id_path: String,
    quality_scores_path: String,
}

impl SplitContext {
    pub fn new(namespace: &PathNamespace, pair: usize, file: usize) -> Result<SplitContext, ConfigError> {
        Ok(SplitContext {
            fastq_split: namespace.config().helpers.fastq_split.clone(),
            input_path: text(namespace.input_path(pair, file)?),
            base_id_path: text(namespace.field_path(pair, file, FastqField::BaseId)?),
            dna_bases_path: text(namespace.field_path(pair, file, FastqField::DnaBases)?),
            quality_id_path: text(namespace.field_path(pair, file, FastqField::QualityId)?),
            quality_scores_path: text(namespace.field_path(pair, file, FastqField::QualityScores)?),
        })
    }
}

/// Times a compressor and appends one compression metrics row
#[derive(Serialize)]
pub struct CompressionContext {
    compressor_name: String,
    input_path: String,
    /// only set for tools whose options reference the quality stream length
    binary_input_path: String,
    measured_input_path: String,
    compressed_output_path: String,
    metrics_csv_path: String,
    job_id_variable: String,
    reference_command: String,
    compression_command: String,
    decompression_command: String,
}

impl CompressionContext {
    /// `commands` as synthesized: compression alone, compression then
    /// decompression, or alignment, compression, decompression
    pub fn new(
        namespace: &PathNamespace,
        scheduler: &dyn Scheduler,
        unit: &WorkUnit,
        commands: &[String],
    ) -> Result<CompressionContext, ConfigError> {
        let job = namespace.config().job(unit.job)?;
        let (reference, compression, decompression) = match commands {
            [compression] => ("", compression.as_str(), ""),
            [compression, decompression] => ("", compression.as_str(), decompression.as_str()),
            [reference, compression, decompression, ..] => {
                (reference.as_str(), compression.as_str(), decompression.as_str())
            }
            [] => ("", "", ""),
        };

        let mut compressor_name = job.compressor_name();
        if job.reference_based {
            compressor_name.push_str("_referenced");
        }
        let binary_input_path = match job.tool.splits_fields() {
            true => text(namespace.quality_input_path(unit)?),
            false => String::new(),
        };

        Ok(CompressionContext {
            compressor_name,
            input_path: text(namespace.input_path(unit.pair, unit.file)?),
            binary_input_path,
            measured_input_path: text(namespace.quality_input_path(unit)?),
            compressed_output_path: text(namespace.compressed_path(unit)?),
            metrics_csv_path: text(namespace.metrics_path(Metrics::Compression, unit.pair, unit.file)?),
            job_id_variable: scheduler.job_id_variable().to_string(),
            reference_command: reference.to_string(),
            compression_command: compression.to_string(),
            decompression_command: decompression.to_string(),
        })
    }
}

/// Rebuilds a FASTQ file from the original fields and the decompressed quality
/// stream
#[derive(Serialize)]
pub struct ReconstructContext {
    fastq_reconstruct: String,
    base_id_path: String,
    dna_bases_path: String,
    quality_id_path: String,
    decompressed_quality_path: String,
    output_path: String,
}

impl ReconstructContext {
    pub fn new(namespace: &PathNamespace, unit: &WorkUnit) -> Result<ReconstructContext, ConfigError> {
        Ok(ReconstructContext {
            fastq_reconstruct: namespace.config().helpers.fastq_reconstruct.clone(),
            base_id_path: text(namespace.field_path(unit.pair, unit.file, FastqField::BaseId)?),
            dna_bases_path: text(namespace.field_path(unit.pair, unit.file, FastqField::DnaBases)?),
            quality_id_path: text(namespace.field_path(unit.pair, unit.file, FastqField::QualityId)?),
            decompressed_quality_path: text(namespace.decompressed_quality_path(unit)?),
            output_path: text(namespace.decompressed_path(unit)?),
        })
    }
}

#[derive(Serialize)]
pub struct ErrorAnalysisContext {
    fastq_metrics: String,
    threads: u32,
    original_file: String,
    decompressed_file: String,
    compressor_name: String,
    metrics_csv_path: String,
    job_id_variable: String,
}

impl ErrorAnalysisContext {
    pub fn new(
        namespace: &PathNamespace,
        scheduler: &dyn Scheduler,
        unit: &WorkUnit,
    ) -> Result<ErrorAnalysisContext, ConfigError> {
        let config = namespace.config();
        Ok(ErrorAnalysisContext {
            fastq_metrics: config.helpers.fastq_metrics.clone(),
            threads: config.threads()?,
            original_file: text(namespace.input_path(unit.pair, unit.file)?),
            decompressed_file: text(namespace.decompressed_path(unit)?),
            compressor_name: config.job(unit.job)?.compressor_name(),
            metrics_csv_path: text(namespace.metrics_path(Metrics::ErrorAnalysis, unit.pair, unit.file)?),
            job_id_variable: scheduler.job_id_variable().to_string(),
        })
    }
}

/// Align reads of one pair and call variants
#[derive(Serialize)]
pub struct CallingContext {
    aligner: String,
    samtools: String,
    bcftools: String,
    threads: u32,
    reference_file: String,
    input_fastq_1: String,
    /// empty for single-file pairs
    input_fastq_2: String,
    sam_path: String,
    sorted_bam_path: String,
    variant_path: String,
    compressed_variant_path: String,
}

impl CallingContext {
    /// Variants of the original reads
    pub fn truth(namespace: &PathNamespace, pair: usize) -> Result<CallingContext, ConfigError> {
        let second = match namespace.config().file_pair(pair)?.len() > 1 {
            true => text(namespace.input_path(pair, 1)?),
            false => String::new(),
        };
        CallingContext::new(
            namespace,
            namespace.input_path(pair, 0)?,
            second,
            |kind| namespace.truth_path(pair, kind),
        )
    }

    /// Variants of the reads a job decompressed, for the pair `unit` belongs to
    pub fn decompressed(namespace: &PathNamespace, unit: &WorkUnit) -> Result<CallingContext, ConfigError> {
        let first = unit.with_file(0);
        let second = match namespace.config().file_pair(unit.pair)?.len() > 1 {
            true => text(namespace.decompressed_path(&unit.with_file(1))?),
            false => String::new(),
        };
        CallingContext::new(
            namespace,
            namespace.decompressed_path(&first)?,
            second,
            |kind| namespace.test_path(&first, kind),
        )
    }

    fn new<F>(namespace: &PathNamespace, first: PathBuf, second: String, path: F) -> Result<CallingContext, ConfigError>
    where
        F: Fn(Alignment) -> Result<PathBuf, ConfigError>,
    {
        let config = namespace.config();
        Ok(CallingContext {
            aligner: config.helpers.aligner.clone(),
            samtools: config.helpers.samtools.clone(),
            bcftools: config.helpers.bcftools.clone(),
            threads: config.threads()?,
            reference_file: text(namespace.reference_path()?),
            input_fastq_1: text(first),
            input_fastq_2: second,
            sam_path: text(path(Alignment::Sam)?),
            sorted_bam_path: text(path(Alignment::SortedBam)?),
            variant_path: text(path(Alignment::Vcf)?),
            compressed_variant_path: text(path(Alignment::CompressedVcf)?),
        })
    }
}

/// Calls variants on decompressed reads and scores them against the truth set
#[derive(Serialize)]
pub struct PostHocContext {
    #[serde(flatten)]
    calling: CallingContext,
    original_vcf: String,
    comparison_dir: String,
    compressor_name: String,
    metrics_csv_path: String,
    job_id_variable: String,
}

impl PostHocContext {
    pub fn new(namespace: &PathNamespace, scheduler: &dyn Scheduler, unit: &WorkUnit) -> Result<PostHocContext, ConfigError> {
        Ok(PostHocContext {
            calling: CallingContext::decompressed(namespace, unit)?,
            original_vcf: text(namespace.truth_path(unit.pair, Alignment::CompressedVcf)?),
            comparison_dir: text(namespace.comparison_dir(unit)?),
            compressor_name: namespace.config().job(unit.job)?.compressor_name(),
            metrics_csv_path: text(namespace.metrics_path(Metrics::PostHoc, unit.pair, 0)?),
            job_id_variable: scheduler.job_id_variable().to_string(),
        })
    }
}

fn text(path: PathBuf) -> String {
    path.display().to_string()
}

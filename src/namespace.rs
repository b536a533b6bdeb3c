//! Deterministic paths for every artifact the pipeline produces
//!
//! A [PathNamespace] maps a [WorkUnit](crate::unit::WorkUnit) (or a
//! [JobKey](crate::unit::JobKey)) to a path. The same configuration and unit always
//! give the same path, across calls and across runs, which is what makes re-running
//! the orchestrator after a partial failure safe. Asking for a path creates its
//! parent directory.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::pipeline::PipelineConfig;
use crate::error::ConfigError;

/// FASTQ field streams written next to the input
pub mod fields;
/// Compressed and decompressed outputs
pub mod output;
/// Metrics CSVs, job scripts, and scheduler logs
pub mod logs;
/// Alignment and variant calling artifacts for the post hoc comparison
pub mod alignment;

pub struct PathNamespace {
    config: PipelineConfig,
    work_dir: PathBuf,
    storage_dir: PathBuf,
}

impl PathNamespace {
    /// Scripts, logs, and metrics go under `work_dir`; compressor outputs and
    /// alignments go under the configured storage directory (or `work_dir`)
    pub fn new(config: PipelineConfig, work_dir: &Path) -> PathNamespace {
        let storage_dir = match &config.storage_dir {
            Some(dir) => resolve(work_dir, dir),
            None => work_dir.to_path_buf(),
        };
        PathNamespace { config, work_dir: work_dir.to_path_buf(), storage_dir }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    #[cfg(test)]
    pub fn storage_dir(&self) -> &Path {
        &self.storage_dir
    }

    pub fn input_path(&self, pair: usize, file: usize) -> Result<PathBuf, ConfigError> {
        let input = self.config.input(pair, file)?;
        Ok(resolve(&self.work_dir, input))
    }

    pub fn reference_path(&self) -> Result<PathBuf, ConfigError> {
        let reference = self.config.reference.as_ref().ok_or(ConfigError::MissingReference)?;
        Ok(resolve(&self.work_dir, reference))
    }

    pub fn genozip_license_path(&self) -> Option<PathBuf> {
        self.config.genozip_license.as_ref().map(|license| resolve(&self.work_dir, license))
    }

    /// `dir/file_name`, creating `dir` first
    fn place(&self, dir: PathBuf, file_name: &str) -> Result<PathBuf, ConfigError> {
        ensure_dir(&dir)?;
        Ok(dir.join(file_name))
    }
}

fn resolve(base: &Path, path: &Path) -> PathBuf {
    match path.is_absolute() {
        true => path.to_path_buf(),
        false => base.join(path),
    }
}

fn ensure_dir(dir: &Path) -> Result<(), ConfigError> {
    fs::create_dir_all(dir).map_err(|source| ConfigError::CreateDir { path: dir.to_path_buf(), source })
}

/// Final component of a path as a string, empty for paths like `/`
fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

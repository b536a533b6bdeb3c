use std::path::PathBuf;

use crate::config::tool::Tool;
use crate::error::ConfigError;
use crate::namespace::fields::replace_extension;
use crate::namespace::{file_name, PathNamespace};
use crate::unit::WorkUnit;

const COMPRESSED_DIR: &str = "CompressedOutput";
const DECOMPRESSED_DIR: &str = "DecompressedOutput";
/// Read-to-reference mappings used by reference-based RENANO
const PAF_DIR: &str = "RefSeq";

impl PathNamespace {
    /// `CompressedOutput/{input name}_{options}[_referenced]{suffix}`
    ///
    /// BFQZIP is the exception: its output goes into `DecompressedOutput` without a
    /// suffix, because the tool writes a FASTQ-like file rather than an archive.
    pub fn compressed_path(&self, unit: &WorkUnit) -> Result<PathBuf, ConfigError> {
        let job = self.config.job(unit.job)?;
        let input = self.input_path(unit.pair, unit.file)?;
        let stem = format!("{}_{}", file_name(&input), job.artifact_stem());

        match job.tool {
            Tool::Bfqzip => self.place(self.storage_dir.join(DECOMPRESSED_DIR), &stem),
            tool => {
                let name = format!("{stem}{}", tool.compressed_suffix());
                self.place(self.storage_dir.join(COMPRESSED_DIR), &name)
            }
        }
    }

    /// `DecompressedOutput/{compressed name}{.fastq | .bin.fastq | .fq}`
    pub fn decompressed_path(&self, unit: &WorkUnit) -> Result<PathBuf, ConfigError> {
        let job = self.config.job(unit.job)?;
        let compressed = self.compressed_path(unit)?;
        let name = format!("{}{}", file_name(&compressed), job.tool.decompressed_suffix());
        self.place(self.storage_dir.join(DECOMPRESSED_DIR), &name)
    }

    /// Where the decompressor itself writes
    ///
    /// For SZ3 this is the raw quality stream (`.bin`) that reconstruction later
    /// turns into the `.bin.fastq` decompressed path. Other tools write their
    /// decompressed path directly.
    pub fn decompressed_quality_path(&self, unit: &WorkUnit) -> Result<PathBuf, ConfigError> {
        let decompressed = self.decompressed_path(unit)?;
        let name = file_name(&decompressed);
        match name.strip_suffix(".fastq") {
            Some(stem) if self.config.job(unit.job)?.tool.splits_fields() => Ok(decompressed.with_file_name(stem)),
            _ => Ok(decompressed),
        }
    }

    /// `RefSeq/{input stem}.paf`
    pub fn paf_path(&self, unit: &WorkUnit) -> Result<PathBuf, ConfigError> {
        let input = self.input_path(unit.pair, unit.file)?;
        let name = replace_extension(&input, ".paf")?;
        self.place(self.storage_dir.join(PAF_DIR), &name)
    }
}

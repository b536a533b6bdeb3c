use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::namespace::{file_name, PathNamespace};
use crate::unit::WorkUnit;

/// Field streams a FASTQ file is split into before SZ3 compression
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FastqField {
    BaseId,
    DnaBases,
    QualityId,
    QualityScores,
}

/// Directory next to each input that holds its split fields
const FIELDS_DIR: &str = "FASTQ_fields";

/// Extensions accepted as FASTQ input
const FASTQ_EXTENSIONS: [&str; 3] = ["fastq", "fq", "fnq"];

impl FastqField {
    pub fn suffix(&self) -> &'static str {
        match self {
            FastqField::BaseId => "_base_id.fastq",
            FastqField::DnaBases => "_dna_bases.fastq",
            FastqField::QualityId => "_quality_id.fastq",
            FastqField::QualityScores => "_quality_scores.bin",
        }
    }
}

impl PathNamespace {
    /// `{input dir}/FASTQ_fields/{input stem}{field suffix}`
    pub fn field_path(&self, pair: usize, file: usize, field: FastqField) -> Result<PathBuf, ConfigError> {
        let input = self.input_path(pair, file)?;
        let name = replace_extension(&input, field.suffix())?;
        let dir = input.parent().map(Path::to_path_buf).unwrap_or_default().join(FIELDS_DIR);
        self.place(dir, &name)
    }

    /// What the unit's compressor reads: the binary quality scores for tools that
    /// split fields, the raw FASTQ for everything else
    pub fn quality_input_path(&self, unit: &WorkUnit) -> Result<PathBuf, ConfigError> {
        let job = self.config.job(unit.job)?;
        match job.tool.splits_fields() {
            true => self.field_path(unit.pair, unit.file, FastqField::QualityScores),
            false => self.input_path(unit.pair, unit.file),
        }
    }
}

/// Swap a FASTQ extension for `replacement`, returning the new file name
pub fn replace_extension(path: &Path, replacement: &str) -> Result<String, ConfigError> {
    let extension = path.extension().and_then(|ext| ext.to_str());
    match extension {
        Some(ext) if FASTQ_EXTENSIONS.contains(&ext) => {
            let name = file_name(path);
            let stem = &name[..name.len() - ext.len() - 1];
            Ok(format!("{stem}{replacement}"))
        }
        _ => Err(ConfigError::UnsupportedExtension(path.to_path_buf())),
    }
}

use std::path::PathBuf;

use crate::error::ConfigError;
use crate::namespace::{file_name, PathNamespace};
use crate::unit::WorkUnit;

/// Variant comparison outputs, one directory per unit
const COMPARISON_DIR: &str = "comparison";

/// Files produced while aligning reads and calling variants
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Alignment {
    Sam,
    SortedBam,
    Vcf,
    CompressedVcf,
}

impl Alignment {
    fn dir(&self) -> &'static str {
        match self {
            Alignment::Sam => "SAM",
            Alignment::SortedBam => "BAM",
            Alignment::Vcf | Alignment::CompressedVcf => "VCF",
        }
    }

    fn file_name(&self, stem: &str) -> String {
        match self {
            Alignment::Sam => format!("{stem}.sam"),
            Alignment::SortedBam => format!("{stem}_sorted.bam"),
            Alignment::Vcf => format!("{stem}.vcf"),
            Alignment::CompressedVcf => format!("{stem}.vcf.gz"),
        }
    }
}

impl PathNamespace {
    /// Truth artifacts come from the original reads and are named after the first
    /// file of the pair
    pub fn truth_path(&self, pair: usize, kind: Alignment) -> Result<PathBuf, ConfigError> {
        let input = self.input_path(pair, 0)?;
        let stem = file_name(&input);
        self.place(self.storage_dir.join(kind.dir()), &kind.file_name(&stem))
    }

    /// Test artifacts come from decompressed reads and are named after the
    /// compressed output, which is already unique per job
    pub fn test_path(&self, unit: &WorkUnit, kind: Alignment) -> Result<PathBuf, ConfigError> {
        let compressed = self.compressed_path(unit)?;
        let stem = file_name(&compressed);
        self.place(self.storage_dir.join(kind.dir()), &kind.file_name(&stem))
    }

    /// `VCF/comparison/{pair}_{job}_{file}/`
    pub fn comparison_dir(&self, unit: &WorkUnit) -> Result<PathBuf, ConfigError> {
        let dir = self
            .storage_dir
            .join(Alignment::Vcf.dir())
            .join(COMPARISON_DIR)
            .join(format!("{}_{}_{}", unit.pair, unit.job, unit.file));
        super::ensure_dir(&dir)?;
        Ok(dir)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::namespace::test::sample_namespace;
    use pretty_assertions::assert_eq;

    #[test]
    fn truth_paths() {
        let (dir, namespace) = sample_namespace();
        let root = dir.path();
        assert_eq!(namespace.truth_path(0, Alignment::Sam).unwrap(), root.join("SAM/sample_1.fastq.sam"));
        assert_eq!(
            namespace.truth_path(0, Alignment::SortedBam).unwrap(),
            root.join("BAM/sample_1.fastq_sorted.bam")
        );
        assert_eq!(
            namespace.truth_path(0, Alignment::CompressedVcf).unwrap(),
            root.join("VCF/sample_1.fastq.vcf.gz")
        );
    }

    #[test]
    fn test_paths_differ_per_job_and_from_truth() {
        let (dir, namespace) = sample_namespace();
        let fqz = namespace.test_path(&WorkUnit::new(0, 1, 0), Alignment::Vcf).unwrap();
        let genozip = namespace.test_path(&WorkUnit::new(0, 2, 0), Alignment::Vcf).unwrap();
        let truth = namespace.truth_path(0, Alignment::Vcf).unwrap();
        assert_eq!(fqz, dir.path().join("VCF/sample_1.fastq_-q1.fqz.vcf"));
        assert_ne!(fqz, genozip);
        assert_ne!(fqz, truth);
    }

    #[test]
    fn comparison_dir_is_created() {
        let (dir, namespace) = sample_namespace();
        let comparison = namespace.comparison_dir(&WorkUnit::new(0, 1, 0)).unwrap();
        assert_eq!(comparison, dir.path().join("VCF/comparison/0_1_0"));
        assert!(comparison.is_dir());
    }
}

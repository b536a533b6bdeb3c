//! Shell commands that exercise one compressor on one input file
//!
//! Every supported tool registers a variant in [VARIANTS]. A variant is a plain
//! function from a namespace and a unit to an ordered list of commands:
//!
//! - 1 command: compression only (BFQZIP)
//! - 2 commands: compression then decompression
//! - 3 commands: reference alignment, reference-based compression, decompression
//!
//! A variant asked about a unit that belongs to another tool returns no commands.

use std::path::Path;

use log::debug;

use crate::config::tool::Tool;
use crate::error::ConfigError;
use crate::namespace::PathNamespace;
use crate::unit::WorkUnit;

mod bfqzip;
mod fqzcomp;
mod genozip;
mod nanopore;
mod spring;
mod sz3;

pub type Synthesize = fn(&PathNamespace, &WorkUnit) -> Result<Vec<String>, ConfigError>;

pub struct Variant {
    pub tool: Tool,
    pub synthesize: Synthesize,
}

pub static VARIANTS: &[Variant] = &[
    Variant { tool: Tool::Sz3, synthesize: sz3::synthesize },
    Variant { tool: Tool::Fqzcomp, synthesize: fqzcomp::synthesize },
    Variant { tool: Tool::Spring, synthesize: spring::synthesize },
    Variant { tool: Tool::Renano, synthesize: nanopore::synthesize_renano },
    Variant { tool: Tool::Enano, synthesize: nanopore::synthesize_enano },
    Variant { tool: Tool::Genozip, synthesize: genozip::synthesize },
    Variant { tool: Tool::Bfqzip, synthesize: bfqzip::synthesize },
];

/// Option placeholder for the quality stream length, only known once the job runs
pub const BINARY_LENGTH_PLACEHOLDER: &str = "{Binary_length}";
/// Shell variable the job script sets before running the compressor
pub const BINARY_LENGTH_VARIABLE: &str = "$BINARY_LENGTH";

/// Commands for one unit, dispatched on the unit's tool
pub fn synthesize(namespace: &PathNamespace, unit: &WorkUnit) -> Result<Vec<String>, ConfigError> {
    let job = namespace.config().job(unit.job)?;
    let mut commands = Vec::new();
    for variant in VARIANTS.iter().filter(|variant| variant.tool == job.tool) {
        commands.extend((variant.synthesize)(namespace, unit)?);
    }
    debug!("{} command(s) for {:?} ({})", commands.len(), unit, job.tool);
    Ok(commands)
}

/// Executable `index` (0 = compress, 1 = decompress) configured for `tool`
fn executable(namespace: &PathNamespace, tool: Tool, index: usize) -> Result<String, ConfigError> {
    namespace
        .config()
        .executables(tool)?
        .get(index)
        .cloned()
        .ok_or(ConfigError::MissingExecutable(tool))
}

/// Join the non-empty parts of a command with single spaces
fn command(parts: &[&str]) -> String {
    parts
        .iter()
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .collect::<Vec<&str>>()
        .join(" ")
}

fn path_arg(path: &Path) -> String {
    path.display().to_string()
}

/// Option strings that carry a standalone `-d` flag select decompression
fn is_decompression(option: &str) -> bool {
    option.split_whitespace().any(|flag| flag == "-d")
}

#[cfg(test)]
pub(crate) mod test {
    use super::*;
    use crate::config::pipeline::{self, PipelineConfig};
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};
    use tempfile::TempDir;

    pub(crate) fn namespace_with_jobs(jobs: Value) -> (TempDir, PathNamespace) {
        let dir = tempfile::tempdir().unwrap();
        let mut json = pipeline::test::sample();
        json["jobs"] = jobs;
        json["compressor_paths"] = json!({
            "SZ3": ["/opt/sz3"],
            "FQZCOMP": ["/opt/fqzcomp"],
            "SPRING": ["/opt/spring"],
            "RENANO": ["/opt/renano"],
            "ENANO": ["/opt/enano"],
            "GENOZIP": ["/opt/genozip", "/opt/genounzip"],
            "BFQZIP": ["/opt/bfqzip.py"]
        });
        let config = PipelineConfig::from_value(json).unwrap();
        let namespace = PathNamespace::new(config, dir.path());
        (dir, namespace)
    }

    #[test]
    fn fqzcomp_compress_then_decompress() {
        let (dir, namespace) = namespace_with_jobs(json!([{"name": "FQZCOMP", "options": ["-q1", "-d -q1"]}]));
        let root = dir.path().display();
        let commands = synthesize(&namespace, &WorkUnit::new(0, 0, 0)).unwrap();
        assert_eq!(
            commands,
            vec![
                format!("/opt/fqzcomp -q1 {root}/reads/sample_1.fastq {root}/CompressedOutput/sample_1.fastq_-q1.fqz"),
                format!(
                    "/opt/fqzcomp -d -q1 {root}/CompressedOutput/sample_1.fastq_-q1.fqz \
                     {root}/DecompressedOutput/sample_1.fastq_-q1.fqz.fastq -X"
                ),
            ]
        );
    }

    #[test]
    fn every_variant_ignores_other_tools() {
        let (_dir, namespace) = namespace_with_jobs(json!([{"name": "SPRING", "options": ["-t 4", "-d -t 4"]}]));
        let unit = WorkUnit::new(0, 0, 0);
        for variant in VARIANTS.iter().filter(|variant| variant.tool != Tool::Spring) {
            assert!((variant.synthesize)(&namespace, &unit).unwrap().is_empty(), "{}", variant.tool);
        }
    }

    #[test]
    fn every_tool_is_registered_once() {
        for tool in Tool::ALL {
            assert_eq!(VARIANTS.iter().filter(|variant| variant.tool == tool).count(), 1, "{tool}");
        }
    }

    #[test]
    fn missing_executable_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = PipelineConfig::from_value(pipeline::test::sample()).unwrap();
        config.compressor_paths.remove(&Tool::Fqzcomp);
        let namespace = PathNamespace::new(config, dir.path());
        let result = synthesize(&namespace, &WorkUnit::new(0, 1, 0));
        assert!(matches!(result, Err(ConfigError::MissingExecutable(Tool::Fqzcomp))));
    }

    #[test]
    fn commands_collapse_empty_parts() {
        assert_eq!(command(&["genozip", "", " --best ", "in.fq"]), "genozip --best in.fq");
        assert!(is_decompression("-d -q1"));
        assert!(!is_decompression("--dedup"));
    }
}

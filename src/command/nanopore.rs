//! RENANO and ENANO, the nanopore read compressors

use crate::command::{command, executable, path_arg};
use crate::config::tool::Tool;
use crate::error::ConfigError;
use crate::namespace::PathNamespace;
use crate::unit::WorkUnit;

/// Reference-based RENANO first maps the reads with the configured aligner and
/// compresses against the resulting PAF
pub fn synthesize_renano(namespace: &PathNamespace, unit: &WorkUnit) -> Result<Vec<String>, ConfigError> {
    let job = namespace.config().job(unit.job)?;
    if job.tool != Tool::Renano {
        return Ok(vec![]);
    }

    let renano = executable(namespace, Tool::Renano, 0)?;
    let input = path_arg(&namespace.input_path(unit.pair, unit.file)?);
    let compressed = path_arg(&namespace.compressed_path(unit)?);
    let decompressed = path_arg(&namespace.decompressed_path(unit)?);
    let compress_options = job.option(unit.job, 0)?;
    let decompress_options = job.option(unit.job, 1)?;

    if !job.reference_based {
        return Ok(vec![
            command(&[&renano, compress_options, &input, &compressed]),
            command(&[&renano, "-d", decompress_options, &compressed, &decompressed]),
        ]);
    }

    let reference = path_arg(&namespace.reference_path()?);
    let paf = path_arg(&namespace.paf_path(unit)?);
    let aligner = &namespace.config().helpers.aligner;
    Ok(vec![
        command(&[aligner, "-x map-ont --secondary=no --cs", &reference, &input, ">", &paf]),
        command(&[&renano, compress_options, "-r", &reference, &paf, &input, &compressed]),
        command(&[&renano, "-d", decompress_options, "-r", &reference, &compressed, &decompressed]),
    ])
}

pub fn synthesize_enano(namespace: &PathNamespace, unit: &WorkUnit) -> Result<Vec<String>, ConfigError> {
    let job = namespace.config().job(unit.job)?;
    if job.tool != Tool::Enano {
        return Ok(vec![]);
    }

    let enano = executable(namespace, Tool::Enano, 0)?;
    let input = path_arg(&namespace.input_path(unit.pair, unit.file)?);
    let compressed = path_arg(&namespace.compressed_path(unit)?);
    let decompressed = path_arg(&namespace.decompressed_path(unit)?);

    Ok(vec![
        command(&[&enano, job.option(unit.job, 0)?, &input, &compressed]),
        command(&[&enano, "-d", job.option(unit.job, 1)?, &compressed, &decompressed]),
    ])
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::command::test::namespace_with_jobs;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn reference_based_renano_aligns_first() {
        let (dir, namespace) = namespace_with_jobs(json!([
            {"name": "RENANO", "options": ["-t 8", "-t 8"], "reference_based": true}
        ]));
        let root = dir.path().display();
        let commands = synthesize_renano(&namespace, &WorkUnit::new(0, 0, 0)).unwrap();
        let compressed = format!("{root}/CompressedOutput/sample_1.fastq_-t_8_referenced.renano");
        assert_eq!(
            commands,
            vec![
                format!(
                    "minimap2 -x map-ont --secondary=no --cs {root}/ref/genome.fa {root}/reads/sample_1.fastq \
                     > {root}/RefSeq/sample_1.paf"
                ),
                format!(
                    "/opt/renano -t 8 -r {root}/ref/genome.fa {root}/RefSeq/sample_1.paf \
                     {root}/reads/sample_1.fastq {compressed}"
                ),
                format!(
                    "/opt/renano -d -t 8 -r {root}/ref/genome.fa {compressed} \
                     {root}/DecompressedOutput/sample_1.fastq_-t_8_referenced.renano.fastq"
                ),
            ]
        );
    }

    #[test]
    fn plain_renano_and_enano() {
        let (_dir, namespace) = namespace_with_jobs(json!([
            {"name": "RENANO", "options": ["-t 8", "-t 8"]},
            {"name": "ENANO", "options": ["-c", "-t 4"]}
        ]));
        let renano = synthesize_renano(&namespace, &WorkUnit::new(0, 0, 1)).unwrap();
        assert_eq!(renano.len(), 2);
        assert!(renano[1].starts_with("/opt/renano -d -t 8 "));

        let enano = synthesize_enano(&namespace, &WorkUnit::new(0, 1, 0)).unwrap();
        assert_eq!(enano.len(), 2);
        assert!(enano[0].starts_with("/opt/enano -c "));
        assert!(enano[1].starts_with("/opt/enano -d -t 4 "));
        assert!(enano[1].ends_with("sample_1.fastq_-c.enano.fastq"));
    }
}

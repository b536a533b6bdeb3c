use crate::command::{command, executable, path_arg};
use crate::config::tool::Tool;
use crate::error::ConfigError;
use crate::namespace::PathNamespace;
use crate::unit::WorkUnit;

/// genozip compresses, genounzip decompresses
///
/// With `pair_compression` both files of a pair go through one invocation made for
/// file 0, and file 1 gets no commands of its own. A pair with a single file is
/// compressed on its own.
pub fn synthesize(namespace: &PathNamespace, unit: &WorkUnit) -> Result<Vec<String>, ConfigError> {
    let job = namespace.config().job(unit.job)?;
    if job.tool != Tool::Genozip {
        return Ok(vec![]);
    }

    let genozip = executable(namespace, Tool::Genozip, 0)?;
    let genounzip = executable(namespace, Tool::Genozip, 1)?;
    let license = match namespace.genozip_license_path() {
        Some(path) => format!("--licfile {}", path.display()),
        None => String::new(),
    };
    let reference = match job.reference_based {
        true => format!("--reference {}", namespace.reference_path()?.display()),
        false => String::new(),
    };
    let compress_options = job.option(unit.job, 0)?;
    let decompress_options = job.option(unit.job, 1)?;

    let paired = job.pair_compression && namespace.config().file_pair(unit.pair)?.len() > 1;
    if paired {
        if unit.file >= 1 {
            return Ok(vec![]);
        }
        let first = unit.with_file(0);
        let second = unit.with_file(1);
        let input_1 = path_arg(&namespace.input_path(unit.pair, 0)?);
        let input_2 = path_arg(&namespace.input_path(unit.pair, 1)?);
        let compressed = path_arg(&namespace.compressed_path(&first)?);
        let decompressed_1 = path_arg(&namespace.decompressed_path(&first)?);
        let decompressed_2 = path_arg(&namespace.decompressed_path(&second)?);
        return Ok(vec![
            command(&[&genozip, &license, &reference, compress_options, &input_1, &input_2, "--pair -o", &compressed, "--force"]),
            command(&[&genounzip, &license, &reference, decompress_options, &compressed, "-o", &decompressed_1, &decompressed_2, "--force"]),
        ]);
    }

    let input = path_arg(&namespace.input_path(unit.pair, unit.file)?);
    let compressed = path_arg(&namespace.compressed_path(unit)?);
    let decompressed = path_arg(&namespace.decompressed_path(unit)?);
    Ok(vec![
        command(&[&genozip, &license, &reference, compress_options, &input, "-o", &compressed, "--force"]),
        command(&[&genounzip, &license, &reference, decompress_options, &compressed, "-o", &decompressed, "--force"]),
    ])
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::command::test::namespace_with_jobs;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn paired_compression_skips_second_file() {
        let (dir, namespace) = namespace_with_jobs(json!([
            {"name": "GENOZIP", "options": ["--best", ""], "pair_compression": true}
        ]));
        let root = dir.path().display();
        assert!(synthesize(&namespace, &WorkUnit::new(0, 0, 1)).unwrap().is_empty());

        let commands = synthesize(&namespace, &WorkUnit::new(0, 0, 0)).unwrap();
        let compressed = format!("{root}/CompressedOutput/sample_1.fastq_--best.genozip");
        assert_eq!(
            commands,
            vec![
                format!(
                    "/opt/genozip --best {root}/reads/sample_1.fastq {root}/reads/sample_2.fq --pair -o {compressed} --force"
                ),
                format!(
                    "/opt/genounzip {compressed} -o {root}/DecompressedOutput/sample_1.fastq_--best.genozip.fastq \
                     {root}/DecompressedOutput/sample_2.fq_--best.genozip.fastq --force"
                ),
            ]
        );
    }

    #[test]
    fn single_file_pair_is_not_paired() {
        let dir = tempfile::tempdir().unwrap();
        let mut json = crate::config::pipeline::test::sample();
        json["input_file"] = json!([["reads/single.fastq"]]);
        json["jobs"] = json!([{"name": "GENOZIP", "options": ["--best", ""], "pair_compression": true}]);
        let config = crate::config::pipeline::PipelineConfig::from_value(json).unwrap();
        let namespace = PathNamespace::new(config, dir.path());
        let commands = synthesize(&namespace, &WorkUnit::new(0, 0, 0)).unwrap();
        assert_eq!(commands.len(), 2);
        assert!(!commands[0].contains("--pair"));
    }

    #[test]
    fn license_and_reference() {
        let dir = tempfile::tempdir().unwrap();
        let mut json = crate::config::pipeline::test::sample();
        json["jobs"] = json!([{"name": "GENOZIP", "options": ["", ""], "reference_based": true}]);
        json["genozip_license"] = json!("/etc/genozip.lic");
        let config = crate::config::pipeline::PipelineConfig::from_value(json).unwrap();
        let namespace = PathNamespace::new(config, dir.path());
        let commands = synthesize(&namespace, &WorkUnit::new(0, 0, 1)).unwrap();
        let prefix = format!("genozip --licfile /etc/genozip.lic --reference {}/ref/genome.fa ", dir.path().display());
        assert!(commands[0].starts_with(&prefix), "{}", commands[0]);
        assert!(commands[1].starts_with("genounzip --licfile /etc/genozip.lic --reference "));
    }
}

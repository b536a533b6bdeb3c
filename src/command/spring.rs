use crate::command::{command, executable, is_decompression, path_arg};
use crate::config::tool::Tool;
use crate::error::ConfigError;
use crate::namespace::PathNamespace;
use crate::unit::WorkUnit;

pub fn synthesize(namespace: &PathNamespace, unit: &WorkUnit) -> Result<Vec<String>, ConfigError> {
    let job = namespace.config().job(unit.job)?;
    if job.tool != Tool::Spring {
        return Ok(vec![]);
    }

    let spring = executable(namespace, Tool::Spring, 0)?;
    let input = path_arg(&namespace.input_path(unit.pair, unit.file)?);
    let compressed = path_arg(&namespace.compressed_path(unit)?);
    let decompressed = path_arg(&namespace.decompressed_path(unit)?);

    let commands = job
        .options
        .iter()
        .map(|option| match is_decompression(option) {
            true => command(&[&spring, option, "-i", &compressed, "-o", &decompressed]),
            false => command(&[&spring, option, "-i", &input, "-o", &compressed]),
        })
        .collect();
    Ok(commands)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::command::test::namespace_with_jobs;
    use serde_json::json;

    #[test]
    fn input_and_output_flags() {
        let (dir, namespace) = namespace_with_jobs(json!([{"name": "spring", "options": ["-c -t 8", "-d -t 8"]}]));
        let root = dir.path().display();
        let commands = synthesize(&namespace, &WorkUnit::new(0, 0, 0)).unwrap();
        assert_eq!(commands.len(), 2);
        assert_eq!(
            commands[0],
            format!("/opt/spring -c -t 8 -i {root}/reads/sample_1.fastq -o {root}/CompressedOutput/sample_1.fastq_-c_-t_8.spring")
        );
        assert!(commands[1].starts_with(&format!("/opt/spring -d -t 8 -i {root}/CompressedOutput/")));
        assert!(commands[1].ends_with(".spring.fastq"));
    }
}

use crate::command::{command, executable, is_decompression, path_arg};
use crate::config::tool::Tool;
use crate::error::ConfigError;
use crate::namespace::PathNamespace;
use crate::unit::WorkUnit;

/// One fqzcomp call per option string, `-d` options decompress
pub fn synthesize(namespace: &PathNamespace, unit: &WorkUnit) -> Result<Vec<String>, ConfigError> {
    let job = namespace.config().job(unit.job)?;
    if job.tool != Tool::Fqzcomp {
        return Ok(vec![]);
    }

    let fqzcomp = executable(namespace, Tool::Fqzcomp, 0)?;
    let input = path_arg(&namespace.input_path(unit.pair, unit.file)?);
    let compressed = path_arg(&namespace.compressed_path(unit)?);
    let decompressed = path_arg(&namespace.decompressed_path(unit)?);

    let commands = job
        .options
        .iter()
        .map(|option| match is_decompression(option) {
            true => command(&[&fqzcomp, option, &compressed, &decompressed, "-X"]),
            false => command(&[&fqzcomp, option, &input, &compressed]),
        })
        .collect();
    Ok(commands)
}

use crate::command::{command, executable, path_arg};
use crate::config::tool::Tool;
use crate::error::ConfigError;
use crate::namespace::PathNamespace;
use crate::unit::WorkUnit;

/// BFQZIP is a python script with a single lossy pass, so there is nothing to
/// decompress afterwards
pub fn synthesize(namespace: &PathNamespace, unit: &WorkUnit) -> Result<Vec<String>, ConfigError> {
    let job = namespace.config().job(unit.job)?;
    if job.tool != Tool::Bfqzip {
        return Ok(vec![]);
    }

    let script = executable(namespace, Tool::Bfqzip, 0)?;
    let input = path_arg(&namespace.quality_input_path(unit)?);
    let compressed = path_arg(&namespace.compressed_path(unit)?);
    Ok(vec![command(&["python3", &script, &input, "-o", &compressed, job.option(unit.job, 0)?])])
}

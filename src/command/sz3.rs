use crate::command::{command, executable, path_arg, BINARY_LENGTH_PLACEHOLDER, BINARY_LENGTH_VARIABLE};
use crate::config::tool::Tool;
use crate::error::ConfigError;
use crate::namespace::PathNamespace;
use crate::unit::WorkUnit;

/// SZ3 compresses the split-out binary quality scores
///
/// Its options usually need the length of the quality stream, which only exists
/// once pre-processing has run, so `{Binary_length}` is handed to the job script as
/// `$BINARY_LENGTH` instead of being resolved here.
pub fn synthesize(namespace: &PathNamespace, unit: &WorkUnit) -> Result<Vec<String>, ConfigError> {
    let job = namespace.config().job(unit.job)?;
    if job.tool != Tool::Sz3 {
        return Ok(vec![]);
    }

    let sz3 = executable(namespace, Tool::Sz3, 0)?;
    let input = path_arg(&namespace.quality_input_path(unit)?);
    let compressed = path_arg(&namespace.compressed_path(unit)?);
    let decompressed = path_arg(&namespace.decompressed_quality_path(unit)?);

    let compress_options = job.option(unit.job, 0)?.replace(BINARY_LENGTH_PLACEHOLDER, BINARY_LENGTH_VARIABLE);
    let decompress_options = job.option(unit.job, 1)?.replace(BINARY_LENGTH_PLACEHOLDER, BINARY_LENGTH_VARIABLE);

    Ok(vec![
        command(&[&sz3, &compress_options, "-i", &input, "-z", &compressed]),
        command(&[&sz3, &decompress_options, "-z", &compressed, "-o", &decompressed]),
    ])
}

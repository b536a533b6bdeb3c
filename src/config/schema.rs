use jsonschema::{Draft, JSONSchema};
use log::{info, warn};
use serde_json::Value;

use crate::error::ConfigError;

/// included pipeline configuration schema
static SCHEMA: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/data/schema/pipeline.json"));

/// Validate an untyped configuration against the embedded JSON schema
///
/// All violations are collected into one error so a broken job file can be fixed
/// in a single pass.
pub fn validate(json: &Value) -> Result<(), ConfigError> {
    info!("Validating pipeline configuration against JSON schema");
    let schema = compile_schema()?;
    let result = schema.validate(json);
    if let Err(errors) = result {
        let messages: Vec<String> = errors
            .map(|err| format!("{} at '{}'", err, err.instance_path))
            .collect();
        warn!("Pipeline configuration fails validation");
        return Err(ConfigError::Schema(messages.join("; ")));
    }
    Ok(())
}

fn compile_schema() -> Result<JSONSchema, ConfigError> {
    let schema_json: Value = serde_json::from_str(SCHEMA)
        .map_err(|err| ConfigError::Schema(format!("embedded schema is not JSON: {err}")))?;
    JSONSchema::options()
        .with_draft(Draft::Draft7)
        .compile(&schema_json)
        .map_err(|err| ConfigError::Schema(format!("embedded schema doesn't compile: {err}")))
}

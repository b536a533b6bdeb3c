//! Pipeline configuration: input FASTQ pairs, compressor jobs, and job resources

/// Validate raw configuration JSON before deserialising it
pub mod schema;
pub mod pipeline;
/// Supported compressors and their file naming conventions
pub mod tool;

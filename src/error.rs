//! Error types shared across the pipeline
//!
//! Configuration errors are fatal and abort a run. Submission errors are scoped to
//! a single job script: the orchestrator logs them and moves on to the next unit.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::config::tool::Tool;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("can't read pipeline configuration {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("pipeline configuration {path} is not valid JSON: {source}")]
    Decode { path: PathBuf, source: serde_json::Error },
    #[error("pipeline configuration fails validation: {0}")]
    Schema(String),
    #[error("unsupported compressor {0}")]
    UnknownTool(String),
    #[error("no executable configured for compressor {0}")]
    MissingExecutable(Tool),
    #[error("job {job} ({tool}) needs options[{index}]")]
    MissingOption { job: usize, tool: Tool, index: usize },
    #[error("unsupported FASTQ extension on {}, expected .fastq, .fq or .fnq", .0.display())]
    UnsupportedExtension(PathBuf),
    #[error("no reference_file configured")]
    MissingReference,
    #[error("no input file {file} in file pair {pair}")]
    NoSuchFile { pair: usize, file: usize },
    #[error("no job {0} in pipeline configuration")]
    NoSuchJob(usize),
    #[error("jobs {first} and {second} would write the same compressed output {}", .path.display())]
    ArtifactCollision { first: usize, second: usize, path: PathBuf },
    #[error("inputs {first:?} and {second:?} (file pair, file) share the file name {name}")]
    DuplicateInput { first: (usize, usize), second: (usize, usize), name: String },
    #[error("{nodes} nodes of {ppn} processors overflow the thread count")]
    TooManyThreads { nodes: u32, ppn: u32 },
    #[error("can't create directory {path}: {source}")]
    CreateDir { path: PathBuf, source: io::Error },
    #[error("can't read template override {path}: {source}")]
    Template { path: PathBuf, source: io::Error },
}

#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("can't render job script: {0}")]
    Render(#[from] tinytemplate::error::Error),
    #[error("can't write job script {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
    #[error("can't run {program}: {source}")]
    Spawn { program: String, source: io::Error },
    #[error("{program} exited with {status}: {stderr}")]
    Rejected { program: String, status: std::process::ExitStatus, stderr: String },
    #[error("{program} printed no job id")]
    NoJobId { program: String },
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("can't read dependency file {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("dependency file {path} is not valid JSON: {source}")]
    Decode { path: PathBuf, source: serde_json::Error },
    #[error("can't write dependency file {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
}

/// Errors that stop a pipeline run
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("can't write metrics header {path}: {source}")]
    Metrics { path: PathBuf, source: io::Error },
}

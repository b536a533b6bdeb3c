use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::Deserialize;
use serde_json::Value;

use crate::config::schema;
use crate::config::tool::Tool;
use crate::error::ConfigError;
use crate::unit::WorkUnit;

/// A benchmark run: which FASTQ files to compress with which tools
///
/// The JSON layout is shared with existing benchmark job files, so field names like
/// `input_file` and `reference_file` are kept as they appear on disk.
#[derive(Debug, Deserialize)]
pub struct PipelineConfig {
    #[serde(rename = "input_file")]
    pub file_pairs: Vec<Vec<PathBuf>>,
    pub jobs: Vec<JobSpec>,
    #[serde(flatten)]
    pub resources: SchedulerDefaults,
    #[serde(default, rename = "reference_file")]
    pub reference: Option<PathBuf>,
    #[serde(default)]
    pub storage_dir: Option<PathBuf>,
    #[serde(default)]
    pub compressor_paths: BTreeMap<Tool, Vec<String>>,
    #[serde(default)]
    pub helpers: Helpers,
    #[serde(default)]
    pub genozip_license: Option<PathBuf>,
}

/// One compressor variant under test, identified by its position in `jobs`
#[derive(Debug, Clone, Deserialize)]
pub struct JobSpec {
    #[serde(rename = "name")]
    pub tool: Tool,
    pub options: Vec<String>,
    #[serde(default)]
    pub reference_based: bool,
    #[serde(default)]
    pub pair_compression: bool,
}

/// Resources requested in every job script header
#[derive(Debug, Deserialize)]
pub struct SchedulerDefaults {
    #[serde(default = "default_nodes")]
    pub nodes: u32,
    #[serde(default = "default_ppn")]
    pub ppn: u32,
    #[serde(default = "default_walltime")]
    pub walltime: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default = "default_node_size")]
    pub node_size: String,
    /// activation script sourced before any command runs
    #[serde(default)]
    pub conda_path: Option<String>,
}

/// Executables for the delegated routines, looked up on PATH unless configured
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Helpers {
    pub fastq_split: String,
    pub fastq_reconstruct: String,
    pub fastq_metrics: String,
    pub aligner: String,
    pub samtools: String,
    pub bcftools: String,
}

impl Default for Helpers {
    fn default() -> Self {
        Helpers {
            fastq_split: "fastq_split".to_string(),
            fastq_reconstruct: "fastq_reconstruct".to_string(),
            fastq_metrics: "fastq_metrics".to_string(),
            aligner: "minimap2".to_string(),
            samtools: "samtools".to_string(),
            bcftools: "bcftools".to_string(),
        }
    }
}

fn default_nodes() -> u32 { 1 }

fn default_ppn() -> u32 { 8 }

fn default_walltime() -> String { "24:00:00".to_string() }

fn default_node_size() -> String { "normal".to_string() }

impl PipelineConfig {
    /// Read, validate against the embedded JSON schema, and deserialise a pipeline
    /// configuration file
    pub fn load(path: &Path) -> Result<PipelineConfig, ConfigError> {
        info!("Reading pipeline configuration {}", path.display());
        let json_string = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let json: Value = serde_json::from_str(&json_string).map_err(|source| ConfigError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
        PipelineConfig::from_value(json).map_err(|err| match err {
            ConfigError::Decode { source, .. } => ConfigError::Decode { path: path.to_path_buf(), source },
            err => err,
        })
    }

    /// Validate and deserialise an already parsed configuration
    pub fn from_value(json: Value) -> Result<PipelineConfig, ConfigError> {
        schema::validate(&json)?;
        let config: PipelineConfig = serde_json::from_value(json).map_err(|source| ConfigError::Decode {
            path: PathBuf::new(),
            source,
        })?;
        let config = config.normalise();
        config.check()?;
        info!("Loaded {} file pair(s) and {} job(s)", config.file_pairs.len(), config.jobs.len());
        Ok(config)
    }

    /// Empty strings in job files mean "not set"
    fn normalise(mut self) -> Self {
        fn unset_empty_path(path: Option<PathBuf>) -> Option<PathBuf> {
            path.filter(|p| !p.as_os_str().is_empty())
        }
        fn unset_empty(value: Option<String>) -> Option<String> {
            value.filter(|v| !v.trim().is_empty())
        }
        self.reference = unset_empty_path(self.reference);
        self.storage_dir = unset_empty_path(self.storage_dir);
        self.genozip_license = unset_empty_path(self.genozip_license);
        self.resources.email = unset_empty(self.resources.email);
        self.resources.conda_path = unset_empty(self.resources.conda_path);
        self
    }

    /// Checks that need more than the schema: executables for every tool in use,
    /// references for reference-based jobs, and compressed outputs that don't collide
    ///
    /// Artifacts are named after the input's file name, so two inputs sharing a file
    /// name in different directories would overwrite each other's outputs.
    fn check(&self) -> Result<(), ConfigError> {
        self.threads()?;
        for (index, job) in self.jobs.iter().enumerate() {
            let executables = self.executables(job.tool)?;
            if job.tool == Tool::Genozip && executables.len() < 2 {
                warn!("GENOZIP needs compress and decompress executables, only one configured");
                return Err(ConfigError::MissingExecutable(job.tool));
            }
            if job.reference_based && self.reference.is_none() {
                warn!("Job {index} ({}) is reference based", job.tool);
                return Err(ConfigError::MissingReference);
            }
        }

        let mut names: BTreeMap<&OsStr, (usize, usize)> = BTreeMap::new();
        for (pair, files) in self.file_pairs.iter().enumerate() {
            for (file, input) in files.iter().enumerate() {
                let name = input.file_name().unwrap_or(input.as_os_str());
                if let Some(first) = names.insert(name, (pair, file)) {
                    return Err(ConfigError::DuplicateInput {
                        first,
                        second: (pair, file),
                        name: name.to_string_lossy().into_owned(),
                    });
                }
            }
        }

        let mut seen: BTreeMap<(Tool, String), usize> = BTreeMap::new();
        for (index, job) in self.jobs.iter().enumerate() {
            let stem = job.artifact_stem();
            if let Some(first) = seen.insert((job.tool, stem.clone()), index) {
                return Err(ConfigError::ArtifactCollision {
                    first,
                    second: index,
                    path: PathBuf::from(format!("*_{stem}{}", job.tool.compressed_suffix())),
                });
            }
        }
        Ok(())
    }

    pub fn file_pair(&self, pair: usize) -> Result<&[PathBuf], ConfigError> {
        self.file_pairs
            .get(pair)
            .map(|files| files.as_slice())
            .ok_or(ConfigError::NoSuchFile { pair, file: 0 })
    }

    pub fn input(&self, pair: usize, file: usize) -> Result<&Path, ConfigError> {
        self.file_pair(pair)?
            .get(file)
            .map(|path| path.as_path())
            .ok_or(ConfigError::NoSuchFile { pair, file })
    }

    pub fn job(&self, job: usize) -> Result<&JobSpec, ConfigError> {
        self.jobs.get(job).ok_or(ConfigError::NoSuchJob(job))
    }

    /// Compress (and optionally decompress) executables for a tool
    pub fn executables(&self, tool: Tool) -> Result<&[String], ConfigError> {
        self.compressor_paths
            .get(&tool)
            .map(|paths| paths.as_slice())
            .filter(|paths| !paths.is_empty())
            .ok_or(ConfigError::MissingExecutable(tool))
    }

    pub fn uses(&self, tool: Tool) -> bool {
        self.jobs.iter().any(|job| job.tool == tool)
    }

    /// Every (file pair, job, file) triple in submission order
    pub fn units(&self) -> Vec<WorkUnit> {
        let mut units = Vec::new();
        for (pair, files) in self.file_pairs.iter().enumerate() {
            for job in 0..self.jobs.len() {
                for file in 0..files.len() {
                    units.push(WorkUnit::new(pair, job, file));
                }
            }
        }
        units
    }

    /// Number of threads a job script may use
    pub fn threads(&self) -> Result<u32, ConfigError> {
        let (nodes, ppn) = (self.resources.nodes, self.resources.ppn);
        nodes.checked_mul(ppn).ok_or(ConfigError::TooManyThreads { nodes, ppn })
    }
}

impl JobSpec {
    pub fn option(&self, job: usize, index: usize) -> Result<&str, ConfigError> {
        self.options
            .get(index)
            .map(|option| option.as_str())
            .ok_or(ConfigError::MissingOption { job, tool: self.tool, index })
    }

    /// Compression options made safe for use inside a file name
    pub fn artifact_stem(&self) -> String {
        let options = self.options.first().map(String::as_str).unwrap_or_default();
        let mut stem = sanitise(options);
        if self.reference_based {
            stem.push_str("_referenced");
        }
        stem
    }

    /// Label written to the `Compressor_Name` metrics column
    pub fn compressor_name(&self) -> String {
        let options = self.options.first().map(String::as_str).unwrap_or_default();
        format!("{}_{}", self.tool, options.replace(' ', "_"))
    }
}

/// Replace spaces and path separators so an option string can be embedded in a
/// file name
pub fn sanitise(options: &str) -> String {
    options.replace(|c: char| matches!(c, ' ' | '/' | '\\'), "_")
}

use std::fmt;

/// One unit of pipeline work: a file of a file pair compressed by a job
///
/// Units are never stored; they are the key every path, script name, and dependency
/// record is derived from.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WorkUnit {
    pub pair: usize,
    pub job: usize,
    pub file: usize,
}

impl WorkUnit {
    pub fn new(pair: usize, job: usize, file: usize) -> WorkUnit {
        WorkUnit { pair, job, file }
    }

    /// The same pair and job, another file of the pair
    pub fn with_file(&self, file: usize) -> WorkUnit {
        WorkUnit { file, ..*self }
    }
}

/// Names one stage's submission for one unit
///
/// The display form is the canonical job name. It is used as the job name in script
/// headers, in script and log file names, and as the key of the dependency store, so
/// a producing stage and a consuming stage always agree on it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum JobKey {
    PreProcessing { pair: usize, file: usize },
    Compression(WorkUnit),
    Reconstruction(WorkUnit),
    ErrorAnalysis(WorkUnit),
    PostHoc(WorkUnit),
    TruthVcf { pair: usize },
}

impl JobKey {
    /// Directory group the key's scripts and logs live in
    pub fn stage_dir(&self) -> &'static str {
        match self {
            JobKey::PreProcessing { .. } | JobKey::Compression(_) | JobKey::Reconstruction(_) => "compression",
            JobKey::ErrorAnalysis(_) => "error_analysis",
            JobKey::PostHoc(_) | JobKey::TruthVcf { .. } => "post_hoc",
        }
    }
}

impl fmt::Display for JobKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            JobKey::PreProcessing { pair, file } => write!(f, "pre_processing_{pair}_{file}"),
            JobKey::Compression(u) => write!(f, "job_{}_{}_{}", u.pair, u.job, u.file),
            JobKey::Reconstruction(u) => write!(f, "fastq_reconstruct_{}_{}_{}", u.pair, u.job, u.file),
            JobKey::ErrorAnalysis(u) => write!(f, "error_analysis_{}_{}_{}", u.pair, u.job, u.file),
            JobKey::PostHoc(u) => write!(f, "post_hoc_{}_{}_{}", u.pair, u.job, u.file),
            JobKey::TruthVcf { pair } => write!(f, "truth_vcf_{pair}"),
        }
    }
}

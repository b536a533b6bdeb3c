//! Batch schedulers the pipeline submits to
//!
//! Every interaction is a blocking call to the scheduler's own command line tools.
//! Two backends are supported: PBS/Torque and SLURM.

use std::fmt;
use std::path::Path;
use std::process::Command;

use clap::ValueEnum;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::SubmissionError;

mod pbs;
mod slurm;
#[cfg(test)]
pub(crate) mod stub;

pub use pbs::Pbs;
pub use slurm::Slurm;

/// Opaque job identifier assigned by the scheduler
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for JobId {
    fn from(id: &str) -> Self {
        JobId(id.to_string())
    }
}

impl From<String> for JobId {
    fn from(id: String) -> Self {
        JobId(id)
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Scheduler state of a submitted job, as far as dependency wiring cares
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum JobStatus {
    Queued,
    Held,
    Running,
    /// finished, failed, purged from the scheduler, or the query itself failed
    Unknown,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum SchedulerKind {
    #[default]
    Pbs,
    Slurm,
}

impl fmt::Display for SchedulerKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SchedulerKind::Pbs => write!(f, "pbs"),
            SchedulerKind::Slurm => write!(f, "slurm"),
        }
    }
}

impl SchedulerKind {
    pub fn backend(&self) -> Box<dyn Scheduler> {
        match self {
            SchedulerKind::Pbs => Box::new(Pbs),
            SchedulerKind::Slurm => Box::new(Slurm),
        }
    }
}

pub trait Scheduler {
    fn kind(&self) -> SchedulerKind;

    /// Submit a job script, returning the id the scheduler assigned
    fn submit(&self, script: &Path) -> Result<JobId, SubmissionError>;

    fn status(&self, id: &JobId) -> JobStatus;

    /// Header line making a job wait for `ids` to succeed, empty for no ids
    fn dependency_directive(&self, ids: &[JobId]) -> String;

    /// Shell expression a running job script uses to refer to its own id
    fn job_id_variable(&self) -> &'static str;

    fn list_user_jobs(&self, user: &str) -> Result<Vec<JobId>, SubmissionError>;

    fn cancel(&self, id: &JobId) -> Result<(), SubmissionError>;
}

/// Run a scheduler tool and return its stdout, failing on a non-zero exit
fn run(program: &str, arguments: &[&str]) -> Result<String, SubmissionError> {
    let mut process = Command::new(program);
    let cmd = process.args(arguments);
    debug!("Running {program} process: {:?}", &cmd);
    let output = cmd.output().map_err(|source| SubmissionError::Spawn { program: program.to_string(), source })?;

    if !output.status.success() {
        return Err(SubmissionError::Rejected {
            program: program.to_string(),
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// `afterok:a:b`, shared by both backends
fn afterok(ids: &[JobId]) -> String {
    let ids: Vec<&str> = ids.iter().map(JobId::as_str).collect();
    format!("afterok:{}", ids.join(":"))
}

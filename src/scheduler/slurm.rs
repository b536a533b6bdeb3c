use std::path::Path;

use log::{debug, info};

use crate::error::SubmissionError;
use crate::scheduler::{afterok, run, JobId, JobStatus, Scheduler, SchedulerKind};

/// SLURM: `sbatch`, `squeue`, `scancel`
pub struct Slurm;

impl Scheduler for Slurm {
    fn kind(&self) -> SchedulerKind {
        SchedulerKind::Slurm
    }

    fn submit(&self, script: &Path) -> Result<JobId, SubmissionError> {
        let script = script.to_string_lossy();
        let stdout = run("sbatch", &["--parsable", &script])?;
        let id = parse_job_id(&stdout).ok_or(SubmissionError::NoJobId { program: "sbatch".to_string() })?;
        info!("SLURM job id: {id}");
        Ok(id)
    }

    fn status(&self, id: &JobId) -> JobStatus {
        match run("squeue", &["-h", "-j", id.as_str(), "-o", "%t"]) {
            Ok(stdout) => parse_status(&stdout),
            Err(err) => {
                debug!("squeue failed for {id}: {err}");
                JobStatus::Unknown
            }
        }
    }

    fn dependency_directive(&self, ids: &[JobId]) -> String {
        match ids.is_empty() {
            true => String::new(),
            false => format!("#SBATCH --dependency={}", afterok(ids)),
        }
    }

    fn job_id_variable(&self) -> &'static str {
        "$SLURM_JOB_ID"
    }

    fn list_user_jobs(&self, user: &str) -> Result<Vec<JobId>, SubmissionError> {
        let stdout = run("squeue", &["-h", "-u", user, "-o", "%i"])?;
        Ok(stdout.split_whitespace().map(JobId::from).collect())
    }

    fn cancel(&self, id: &JobId) -> Result<(), SubmissionError> {
        run("scancel", &[id.as_str()])?;
        Ok(())
    }
}

/// `sbatch --parsable` prints `id` or `id;cluster`
fn parse_job_id(stdout: &str) -> Option<JobId> {
    let token = stdout.split_whitespace().next()?;
    let id = token.split([';', '.']).next().unwrap_or(token);
    match id.is_empty() {
        true => None,
        false => Some(JobId::from(id)),
    }
}

/// Compact state codes from `squeue -o %t`
fn parse_status(stdout: &str) -> JobStatus {
    match stdout.trim() {
        "PD" => JobStatus::Queued,
        "R" | "CF" | "CG" => JobStatus::Running,
        "S" | "RH" | "RQ" | "RS" => JobStatus::Held,
        _ => JobStatus::Unknown,
    }
}

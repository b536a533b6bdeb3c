use std::path::Path;

use log::{debug, info};

use crate::error::SubmissionError;
use crate::scheduler::{afterok, run, JobId, JobStatus, Scheduler, SchedulerKind};

/// PBS/Torque: `qsub`, `qstat`, `qdel`
pub struct Pbs;

impl Scheduler for Pbs {
    fn kind(&self) -> SchedulerKind {
        SchedulerKind::Pbs
    }

    fn submit(&self, script: &Path) -> Result<JobId, SubmissionError> {
        let script = script.to_string_lossy();
        let stdout = run("qsub", &[&script])?;
        let id = parse_job_id(&stdout).ok_or(SubmissionError::NoJobId { program: "qsub".to_string() })?;
        info!("PBS job id: {id}");
        Ok(id)
    }

    fn status(&self, id: &JobId) -> JobStatus {
        match run("qstat", &["-f", id.as_str()]) {
            Ok(stdout) => parse_status(&stdout),
            Err(err) => {
                debug!("qstat failed for {id}: {err}");
                JobStatus::Unknown
            }
        }
    }

    fn dependency_directive(&self, ids: &[JobId]) -> String {
        match ids.is_empty() {
            true => String::new(),
            false => format!("#PBS -W depend={}", afterok(ids)),
        }
    }

    fn job_id_variable(&self) -> &'static str {
        "$PBS_JOBID"
    }

    fn list_user_jobs(&self, user: &str) -> Result<Vec<JobId>, SubmissionError> {
        let stdout = run("qstat", &["-u", user])?;
        Ok(parse_user_jobs(&stdout))
    }

    fn cancel(&self, id: &JobId) -> Result<(), SubmissionError> {
        run("qdel", &[id.as_str()])?;
        Ok(())
    }
}

/// `12345.headnode` -> `12345`
fn parse_job_id(stdout: &str) -> Option<JobId> {
    let token = stdout.split_whitespace().next()?;
    let id = token.split('.').next().unwrap_or(token);
    match id.is_empty() {
        true => None,
        false => Some(JobId::from(id)),
    }
}

/// Reads `job_state = X` from `qstat -f` output
fn parse_status(stdout: &str) -> JobStatus {
    let state = stdout
        .lines()
        .filter_map(|line| line.trim().strip_prefix("job_state"))
        .map(|rest| rest.trim_start_matches([' ', '=']).trim())
        .next();

    match state {
        Some("Q") | Some("W") => JobStatus::Queued,
        Some("H") => JobStatus::Held,
        Some("R") | Some("E") => JobStatus::Running,
        _ => JobStatus::Unknown,
    }
}

/// Job rows of `qstat -u` start with `{numeric id}.{server}`; header lines don't
fn parse_user_jobs(stdout: &str) -> Vec<JobId> {
    stdout
        .lines()
        .filter_map(|line| line.split_whitespace().next())
        .map(|token| token.split('.').next().unwrap_or(token))
        .filter(|id| !id.is_empty() && id.chars().all(|c| c.is_ascii_digit()))
        .map(JobId::from)
        .collect()
}

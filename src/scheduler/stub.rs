use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::SubmissionError;
use crate::scheduler::{afterok, JobId, JobStatus, Scheduler, SchedulerKind};

/// In-memory scheduler: hands out sequential ids and remembers every script
///
/// Submitted jobs report as queued unless told otherwise. Scripts whose file name
/// contains one of the `rejected` patterns fail to submit.
pub(crate) struct StubScheduler {
    next_id: RefCell<u32>,
    pub submitted: RefCell<Vec<(PathBuf, JobId)>>,
    statuses: RefCell<HashMap<JobId, JobStatus>>,
    rejected: Vec<String>,
    pub cancelled: RefCell<Vec<JobId>>,
}

impl StubScheduler {
    pub(crate) fn new() -> StubScheduler {
        StubScheduler {
            next_id: RefCell::new(100),
            submitted: RefCell::new(vec![]),
            statuses: RefCell::new(HashMap::new()),
            rejected: vec![],
            cancelled: RefCell::new(vec![]),
        }
    }

    pub(crate) fn rejecting(patterns: &[&str]) -> StubScheduler {
        StubScheduler { rejected: patterns.iter().map(|p| p.to_string()).collect(), ..StubScheduler::new() }
    }

    pub(crate) fn set_status(&self, id: &str, status: JobStatus) {
        self.statuses.borrow_mut().insert(JobId::from(id), status);
    }

    /// Script file names in submission order
    pub(crate) fn scripts(&self) -> Vec<String> {
        self.submitted
            .borrow()
            .iter()
            .map(|(path, _)| path.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    /// Id the stub handed out for a script file name
    pub(crate) fn id_of(&self, script: &str) -> Option<JobId> {
        self.submitted
            .borrow()
            .iter()
            .find(|(path, _)| path.file_name().unwrap().to_string_lossy() == script)
            .map(|(_, id)| id.clone())
    }
}

impl Scheduler for StubScheduler {
    fn kind(&self) -> SchedulerKind {
        SchedulerKind::Pbs
    }

    fn submit(&self, script: &Path) -> Result<JobId, SubmissionError> {
        let name = script.to_string_lossy();
        if self.rejected.iter().any(|pattern| name.contains(pattern.as_str())) {
            return Err(SubmissionError::NoJobId { program: "stub".to_string() });
        }
        let mut next_id = self.next_id.borrow_mut();
        let id = JobId::from(next_id.to_string());
        *next_id += 1;
        self.statuses.borrow_mut().insert(id.clone(), JobStatus::Queued);
        self.submitted.borrow_mut().push((script.to_path_buf(), id.clone()));
        Ok(id)
    }

    fn status(&self, id: &JobId) -> JobStatus {
        self.statuses.borrow().get(id).copied().unwrap_or(JobStatus::Unknown)
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

    fn list_user_jobs(&self, _user: &str) -> Result<Vec<JobId>, SubmissionError> {
        Ok(self.submitted.borrow().iter().map(|(_, id)| id.clone()).collect())
    }

    fn cancel(&self, id: &JobId) -> Result<(), SubmissionError> {
        self.cancelled.borrow_mut().push(id.clone());
        Ok(())
    }
}

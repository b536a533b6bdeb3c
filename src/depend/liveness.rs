use log::debug;

use crate::scheduler::{JobId, JobStatus, Scheduler};

/// Keep the recorded ids a new job should still wait for
///
/// Only jobs the scheduler reports as queued, held, or running are kept. A job in
/// any other state, or one the scheduler no longer knows, counts as finished: the
/// scheduler would reject a dependency on it, so it is dropped and the dependent
/// job may start straight away. This cannot tell a job that succeeded from one
/// that failed and was purged.
pub fn live_dependencies(scheduler: &dyn Scheduler, ids: &[JobId]) -> Vec<JobId> {
    ids.iter()
        .filter(|id| match scheduler.status(id) {
            JobStatus::Queued | JobStatus::Held | JobStatus::Running => true,
            JobStatus::Unknown => {
                debug!("Dropping dependency on {id}, no longer pending or running");
                false
            }
        })
        .cloned()
        .collect()
}

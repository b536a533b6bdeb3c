use log::warn;

use crate::depend::liveness::live_dependencies;
use crate::error::RunError;
use crate::namespace::logs::Metrics;
use crate::pipeline::Orchestrator;
use crate::scheduler::JobId;
use crate::script::context::{CallingContext, PostHocContext};
use crate::script::{POST_HOC, TRUTH_VCF};
use crate::unit::{JobKey, WorkUnit};

impl Orchestrator<'_> {
    /// Call variants on the original reads once per pair, then on each job's
    /// decompressed reads, and score the second against the first
    pub(super) fn post_hoc(&mut self) -> Result<(), RunError> {
        let namespace = self.namespace;
        let config = namespace.config();
        if config.reference.is_none() {
            warn!("No reference_file configured, skipping post hoc analysis");
            return Ok(());
        }

        for pair in 0..config.file_pairs.len() {
            self.write_header(Metrics::PostHoc, pair, 0)?;
        }

        for (pair, files) in config.file_pairs.iter().enumerate() {
            let key = JobKey::TruthVcf { pair };
            let compression_keys: Vec<JobKey> = (0..config.jobs.len())
                .flat_map(move |job| (0..files.len()).map(move |file| JobKey::Compression(WorkUnit::new(pair, job, file))))
                .collect();

            // the truth job of an earlier run is replaced, not accumulated
            let previous = self.store.get(&key);
            for compression in &compression_keys {
                self.store.remove(compression, &previous)?;
            }

            let context = CallingContext::truth(namespace, pair)?;
            let Some(id) = self.dispatch(&key, &[], TRUTH_VCF, &context)? else {
                self.store.clear(&key)?;
                continue;
            };
            self.store.replace(&key, &id)?;
            for compression in &compression_keys {
                self.store.append(compression, &id)?;
            }
        }

        for (pair, files) in config.file_pairs.iter().enumerate() {
            let truth = self.store.get(&JobKey::TruthVcf { pair });
            for job in 0..config.jobs.len() {
                let unit = WorkUnit::new(pair, job, 0);
                let first = self.store.get(&JobKey::Compression(unit));
                let second = self.store.get(&JobKey::Compression(unit.with_file(1)));
                if is_partial(files.len(), &first, &second, &truth) {
                    warn!("Partial dependency for post_hoc_{pair}_{job}_0: only one file of the pair has recorded jobs");
                }

                let key = JobKey::PostHoc(unit);
                let dependencies = live_dependencies(self.scheduler, &union(first, second));
                let context = PostHocContext::new(namespace, self.scheduler, &unit)?;
                if let Some(id) = self.dispatch(&key, &dependencies, POST_HOC, &context)? {
                    self.store.replace(&key, &id)?;
                }
            }
        }
        Ok(())
    }
}

/// True when a two-file pair has jobs besides the truth set recorded for one file
/// but not the other
fn is_partial(files: usize, first: &[JobId], second: &[JobId], truth: &[JobId]) -> bool {
    let recorded = |ids: &[JobId]| ids.iter().any(|id| !truth.contains(id));
    files > 1 && recorded(first) != recorded(second)
}

/// `first` followed by the ids of `second` it doesn't already contain
fn union(first: Vec<JobId>, second: Vec<JobId>) -> Vec<JobId> {
    let mut ids: Vec<JobId> = Vec::with_capacity(first.len() + second.len());
    for id in first.into_iter().chain(second) {
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    ids
}

#[cfg(test)]
mod test {
    use std::fs;

    use super::*;
    use crate::depend::store::DependencyStore;
    use crate::namespace::test::sample_namespace;
    use crate::namespace::PathNamespace;
    use crate::pipeline::PipelineStage;
    use crate::scheduler::stub::StubScheduler;
    use crate::script::Templates;
    use pretty_assertions::assert_eq;

    fn run(namespace: &PathNamespace, scheduler: &StubScheduler, store: &mut DependencyStore, stages: &[PipelineStage]) {
        let templates = Templates::embedded();
        Orchestrator::new(namespace, scheduler, store, &templates).run(stages).unwrap();
    }

    fn script(namespace: &PathNamespace, key: JobKey) -> String {
        fs::read_to_string(namespace.script_path(&key).unwrap()).unwrap()
    }

    fn compression(job: usize, file: usize) -> JobKey {
        JobKey::Compression(WorkUnit::new(0, job, file))
    }

    #[test]
    fn one_failed_file_is_a_partial_dependency() {
        let (dir, namespace) = sample_namespace();
        let scheduler = StubScheduler::rejecting(&["job_0_1_1"]);
        let mut store = DependencyStore::open(&dir.path().join("job_dependencies.json")).unwrap();
        run(&namespace, &scheduler, &mut store, &[PipelineStage::Compression, PipelineStage::PostHoc]);

        let truth = store.get(&JobKey::TruthVcf { pair: 0 });
        assert_eq!(truth, vec![JobId::from("104")]);
        let first = store.get(&compression(1, 0));
        let second = store.get(&compression(1, 1));
        assert_eq!(first, vec![JobId::from("102"), JobId::from("104")]);
        assert_eq!(second, vec![JobId::from("104")]);
        assert!(is_partial(2, &first, &second, &truth));
        assert!(!is_partial(2, &store.get(&compression(0, 0)), &store.get(&compression(0, 1)), &truth));

        // the lossy job still runs, after what was recorded
        assert!(script(&namespace, JobKey::PostHoc(WorkUnit::new(0, 1, 0))).contains("afterok:102:104\n"));
    }

    #[test]
    fn rerun_replaces_the_truth_dependency() {
        let (dir, namespace) = sample_namespace();
        let scheduler = StubScheduler::new();
        let mut store = DependencyStore::open(&dir.path().join("job_dependencies.json")).unwrap();
        run(&namespace, &scheduler, &mut store, &[PipelineStage::Compression, PipelineStage::PostHoc]);
        run(&namespace, &scheduler, &mut store, &[PipelineStage::PostHoc]);

        let ids = |values: &[&str]| values.iter().map(|v| JobId::from(*v)).collect::<Vec<_>>();
        assert_eq!(store.get(&JobKey::TruthVcf { pair: 0 }), ids(&["109"]));
        assert_eq!(store.get(&compression(0, 0)), ids(&["100", "109"]));
        assert_eq!(store.get(&compression(0, 1)), ids(&["101", "109"]));
        assert_eq!(store.get(&compression(2, 1)), ids(&["104", "109"]));
        assert_eq!(store.get(&JobKey::PostHoc(WorkUnit::new(0, 0, 0))), ids(&["110"]));
        assert!(script(&namespace, JobKey::PostHoc(WorkUnit::new(0, 0, 0))).contains("afterok:100:109:101\n"));
    }

    #[test]
    fn union_keeps_first_occurrence_order() {
        let ids = |values: &[&str]| values.iter().map(|v| JobId::from(*v)).collect::<Vec<_>>();
        assert_eq!(union(ids(&["7", "9"]), ids(&["8", "9"])), ids(&["7", "9", "8"]));
        assert_eq!(union(ids(&[]), ids(&["8"])), ids(&["8"]));
        assert!(union(vec![], vec![]).is_empty());
    }

    #[test]
    fn truth_ids_do_not_count_as_recorded_jobs() {
        let ids = |values: &[&str]| values.iter().map(|v| JobId::from(*v)).collect::<Vec<_>>();
        let truth = ids(&["104"]);
        assert!(is_partial(2, &ids(&["102", "104"]), &ids(&["104"]), &truth));
        assert!(is_partial(2, &ids(&[]), &ids(&["103"]), &truth));
        assert!(!is_partial(2, &ids(&["102", "104"]), &ids(&["103", "104"]), &truth));
        assert!(!is_partial(2, &ids(&["104"]), &ids(&["104"]), &truth));
        // a single-file pair has no second record to miss
        assert!(!is_partial(1, &ids(&["102", "104"]), &ids(&[]), &truth));
    }
}

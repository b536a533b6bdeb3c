use log::info;

use crate::error::RunError;
use crate::pipeline::{inputs, Orchestrator};
use crate::script::context::SplitContext;
use crate::script::FASTQ_SPLIT;
use crate::unit::{JobKey, WorkUnit};

impl Orchestrator<'_> {
    /// Split every input into field streams, once, if any job compresses fields
    ///
    /// The split job's id becomes the only recorded dependency of each
    /// field-splitting job on that input. If the split can't be submitted, those
    /// jobs are left with no recorded dependency at all rather than ids from an
    /// earlier run.
    pub(super) fn preprocess(&mut self) -> Result<(), RunError> {
        let namespace = self.namespace;
        let config = namespace.config();
        if !config.jobs.iter().any(|job| job.tool.splits_fields()) {
            info!("No job compresses FASTQ fields, skipping pre-processing");
            return Ok(());
        }

        for (pair, file) in inputs(config) {
            let key = JobKey::PreProcessing { pair, file };
            let context = SplitContext::new(namespace, pair, file)?;
            let submitted = self.dispatch(&key, &[], FASTQ_SPLIT, &context)?;
            if let Some(id) = &submitted {
                self.store.replace(&key, id)?;
            }

            for (job, spec) in config.jobs.iter().enumerate() {
                if !spec.tool.splits_fields() {
                    continue;
                }
                let compression = JobKey::Compression(WorkUnit::new(pair, job, file));
                match &submitted {
                    Some(id) => self.store.replace(&compression, id)?,
                    None => self.store.clear(&compression)?,
                }
            }
        }
        Ok(())
    }
}

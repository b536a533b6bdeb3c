use crate::error::RunError;
use crate::pipeline::Orchestrator;
use crate::script::context::ReconstructContext;
use crate::script::FASTQ_RECONSTRUCT;
use crate::unit::JobKey;

impl Orchestrator<'_> {
    /// Field compressors only decompress quality scores; put the FASTQ back
    /// together before anything compares it with the original
    pub(super) fn reconstruct(&mut self) -> Result<(), RunError> {
        let namespace = self.namespace;
        let config = namespace.config();

        for unit in config.units() {
            if !config.job(unit.job)?.tool.splits_fields() {
                continue;
            }
            let compression = JobKey::Compression(unit);
            let key = JobKey::Reconstruction(unit);
            let dependencies = self.live(&compression);
            let context = ReconstructContext::new(namespace, &unit)?;
            let Some(id) = self.dispatch(&key, &dependencies, FASTQ_RECONSTRUCT, &context)? else {
                continue;
            };

            // later stages wait on the compression key, which now means the rebuilt file
            self.store.replace(&compression, &id)?;
            self.store.replace(&key, &id)?;
        }
        Ok(())
    }
}

use crate::error::RunError;
use crate::namespace::logs::Metrics;
use crate::pipeline::{inputs, Orchestrator};
use crate::script::context::ErrorAnalysisContext;
use crate::script::ERROR_ANALYSIS;
use crate::unit::JobKey;

impl Orchestrator<'_> {
    /// Quality score error (MSE, PSNR) of every decompressed file
    pub(super) fn error_analysis(&mut self) -> Result<(), RunError> {
        let namespace = self.namespace;
        let config = namespace.config();
        for (pair, file) in inputs(config) {
            self.write_header(Metrics::ErrorAnalysis, pair, file)?;
        }

        for unit in config.units() {
            let key = JobKey::ErrorAnalysis(unit);
            let dependencies = self.live(&JobKey::Compression(unit));
            let context = ErrorAnalysisContext::new(namespace, self.scheduler, &unit)?;
            if let Some(id) = self.dispatch(&key, &dependencies, ERROR_ANALYSIS, &context)? {
                self.store.replace(&key, &id)?;
            }
        }
        Ok(())
    }
}

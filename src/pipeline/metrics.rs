use std::fs;

use log::info;

use crate::error::RunError;
use crate::namespace::logs::Metrics;
use crate::pipeline::{inputs, Orchestrator};

impl Orchestrator<'_> {
    /// One compression metrics table per input file
    pub(super) fn metrics(&mut self) -> Result<(), RunError> {
        for (pair, file) in inputs(self.namespace.config()) {
            self.write_header(Metrics::Compression, pair, file)?;
        }
        Ok(())
    }

    /// Start a metrics table, discarding rows from any earlier run
    pub(super) fn write_header(&self, metrics: Metrics, pair: usize, file: usize) -> Result<(), RunError> {
        let path = self.namespace.metrics_path(metrics, pair, file)?;
        let header = format!("{}\n", metrics.header().join(","));
        fs::write(&path, header).map_err(|source| RunError::Metrics { path: path.clone(), source })?;
        info!("Created metrics table {}", path.display());
        Ok(())
    }
}

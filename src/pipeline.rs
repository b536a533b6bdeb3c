//! Submits every stage of a benchmark run to the scheduler
//!
//! All stages are submitted up front. Ordering between them is left to the
//! scheduler: each job script carries a dependency directive built from the ids
//! earlier stages recorded in the [DependencyStore].

use clap::ValueEnum;
use log::{error, info};
use serde::Serialize;

use crate::config::pipeline::PipelineConfig;
use crate::depend::liveness::live_dependencies;
use crate::depend::store::DependencyStore;
use crate::error::{ConfigError, RunError, SubmissionError};
use crate::namespace::PathNamespace;
use crate::scheduler::{JobId, Scheduler};
use crate::script::{header_template, HeaderContext, JobScript, Templates};
use crate::unit::JobKey;

mod compression;
mod error_analysis;
mod metrics;
mod post_hoc;
mod preprocess;
mod reconstruct;

/// Stages in the order they always run
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum PipelineStage {
    /// Compression metrics CSV headers
    Metrics,
    /// Split FASTQ fields for compressors that only see quality scores
    PreProcessing,
    Compression,
    /// Rebuild FASTQ files from fields and decompressed quality scores
    Reconstruction,
    ErrorAnalysis,
    /// Variant calling comparison against the original reads
    PostHoc,
}

impl PipelineStage {
    pub const ALL: [PipelineStage; 6] = [
        PipelineStage::Metrics,
        PipelineStage::PreProcessing,
        PipelineStage::Compression,
        PipelineStage::Reconstruction,
        PipelineStage::ErrorAnalysis,
        PipelineStage::PostHoc,
    ];
}

pub struct Orchestrator<'a> {
    namespace: &'a PathNamespace,
    scheduler: &'a dyn Scheduler,
    store: &'a mut DependencyStore,
    templates: &'a Templates,
}

impl<'a> Orchestrator<'a> {
    pub fn new(
        namespace: &'a PathNamespace,
        scheduler: &'a dyn Scheduler,
        store: &'a mut DependencyStore,
        templates: &'a Templates,
    ) -> Orchestrator<'a> {
        Orchestrator { namespace, scheduler, store, templates }
    }

    /// Run the selected stages in pipeline order
    ///
    /// Configuration and dependency store errors stop the run. A job that can't be
    /// rendered or submitted is logged and skipped, and the stages after it still
    /// run.
    pub fn run(&mut self, stages: &[PipelineStage]) -> Result<(), RunError> {
        for stage in PipelineStage::ALL {
            if !stages.contains(&stage) {
                continue;
            }
            info!("Running stage {stage:?}");
            match stage {
                PipelineStage::Metrics => self.metrics()?,
                PipelineStage::PreProcessing => self.preprocess()?,
                PipelineStage::Compression => self.compress()?,
                PipelineStage::Reconstruction => self.reconstruct()?,
                PipelineStage::ErrorAnalysis => self.error_analysis()?,
                PipelineStage::PostHoc => self.post_hoc()?,
            }
        }
        info!("Dependencies recorded in {}", self.store.path().display());
        Ok(())
    }

    /// Ids recorded under `key` that the scheduler still has pending or running
    fn live(&self, key: &JobKey) -> Vec<JobId> {
        live_dependencies(self.scheduler, &self.store.get(key))
    }

    /// Render, write, and submit the script for `key`
    ///
    /// Returns `None` when the script could not be written or submitted; the
    /// failure is logged and nothing is recorded for it.
    fn dispatch<C: Serialize>(
        &self,
        key: &JobKey,
        dependencies: &[JobId],
        body_template: &str,
        context: &C,
    ) -> Result<Option<JobId>, ConfigError> {
        let path = self.namespace.script_path(key)?;
        let header = HeaderContext::new(self.namespace, self.scheduler, key, dependencies)?;

        let submitted = self.render(&header, body_template, context).and_then(|script| {
            script
                .write(&path)
                .map_err(|source| SubmissionError::Write { path: path.clone(), source })?;
            info!("Created job script {}", path.display());
            self.scheduler.submit(&path)
        });

        match submitted {
            Ok(id) => {
                info!("Submitted {key} with job id {id}");
                Ok(Some(id))
            }
            Err(err) => {
                error!("Failed to submit {key} ({}): {err}", path.display());
                Ok(None)
            }
        }
    }

    fn render<C: Serialize>(&self, header: &HeaderContext, body_template: &str, context: &C) -> Result<JobScript, SubmissionError> {
        Ok(JobScript {
            header: self.templates.render(header_template(self.scheduler.kind()), header)?,
            body: self.templates.render(body_template, context)?,
        })
    }
}

/// Every (pair, file) input in configuration order
fn inputs(config: &PipelineConfig) -> Vec<(usize, usize)> {
    config
        .file_pairs
        .iter()
        .enumerate()
        .flat_map(|(pair, files)| (0..files.len()).map(move |file| (pair, file)))
        .collect()
}

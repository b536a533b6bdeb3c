use log::info;

use crate::command;
use crate::config::tool::Tool;
use crate::error::RunError;
use crate::pipeline::Orchestrator;
use crate::script::context::CompressionContext;
use crate::script::COMPRESSION;
use crate::unit::JobKey;

impl Orchestrator<'_> {
    pub(super) fn compress(&mut self) -> Result<(), RunError> {
        let namespace = self.namespace;
        let config = namespace.config();

        for unit in config.units() {
            let key = JobKey::Compression(unit);
            let job = config.job(unit.job)?;
            let commands = command::synthesize(namespace, &unit)?;
            if commands.is_empty() {
                info!("No commands for {key}, not submitting");
                continue;
            }

            // only field compressors wait, for the split of their input
            let dependencies = match job.tool.splits_fields() {
                true => self.live(&key),
                false => vec![],
            };
            let context = CompressionContext::new(namespace, self.scheduler, &unit, &commands)?;
            let submitted = self.dispatch(&key, &dependencies, COMPRESSION, &context)?;

            // the same job produces the second file's output
            let paired = job.tool == Tool::Genozip && job.pair_compression && config.file_pair(unit.pair)?.len() > 1;
            let mut keys = vec![key];
            if paired && unit.file == 0 {
                keys.push(JobKey::Compression(unit.with_file(1)));
            }
            for key in &keys {
                match &submitted {
                    Some(id) => self.store.replace(key, id)?,
                    None => self.store.clear(key)?,
                }
            }
        }
        Ok(())
    }
}

//! Job scripts: a scheduler header followed by one stage body
//!
//! Templates are embedded in the binary. A template directory may override any of
//! them with a `{name}.txt` file.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;

use chrono::Utc;
use log::info;
use serde::Serialize;
use tinytemplate::TinyTemplate;

use crate::error::ConfigError;
use crate::namespace::logs::LogStream;
use crate::namespace::PathNamespace;
use crate::scheduler::{JobId, Scheduler, SchedulerKind};
use crate::unit::JobKey;

pub mod context;

pub const HEADER_PBS: &str = "header_pbs";
pub const HEADER_SLURM: &str = "header_slurm";
pub const FASTQ_SPLIT: &str = "fastq_split";
pub const COMPRESSION: &str = "compression";
pub const FASTQ_RECONSTRUCT: &str = "fastq_reconstruct";
pub const ERROR_ANALYSIS: &str = "error_analysis";
pub const TRUTH_VCF: &str = "truth_vcf";
pub const POST_HOC: &str = "post_hoc";

static EMBEDDED: &[(&str, &str)] = &[
    (HEADER_PBS, include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/data/templates/header_pbs.txt"))),
    (HEADER_SLURM, include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/data/templates/header_slurm.txt"))),
    (FASTQ_SPLIT, include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/data/templates/fastq_split.txt"))),
    (COMPRESSION, include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/data/templates/compression.txt"))),
    (FASTQ_RECONSTRUCT, include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/data/templates/fastq_reconstruct.txt"))),
    (ERROR_ANALYSIS, include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/data/templates/error_analysis.txt"))),
    (TRUTH_VCF, include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/data/templates/truth_vcf.txt"))),
    (POST_HOC, include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/data/templates/post_hoc.txt"))),
];

/// Template sources by name
pub struct Templates {
    sources: BTreeMap<&'static str, String>,
}

impl Templates {
    pub fn embedded() -> Templates {
        let sources = EMBEDDED.iter().map(|(name, text)| (*name, text.to_string())).collect();
        Templates { sources }
    }

    /// Embedded templates, replaced by `{dir}/{name}.txt` where such a file exists
    pub fn load(dir: Option<&Path>) -> Result<Templates, ConfigError> {
        let mut templates = Templates::embedded();
        let dir = match dir {
            Some(dir) => dir,
            None => return Ok(templates),
        };

        for (name, source) in templates.sources.iter_mut() {
            let path = dir.join(format!("{name}.txt"));
            if path.exists() {
                info!("Using template override {}", path.display());
                *source = fs::read_to_string(&path).map_err(|source| ConfigError::Template { path, source })?;
            }
        }
        Ok(templates)
    }

    /// Render one template without HTML escaping: paths and shell operators go in
    /// verbatim
    pub fn render<C: Serialize>(&self, name: &str, context: &C) -> Result<String, tinytemplate::error::Error> {
        let mut tt = TinyTemplate::new();
        tt.set_default_formatter(&tinytemplate::format_unescaped);
        for (template_name, source) in &self.sources {
            tt.add_template(template_name, source)?;
        }
        tt.render(name, context)
    }
}

/// Scheduler header template for a backend
pub fn header_template(kind: SchedulerKind) -> &'static str {
    match kind {
        SchedulerKind::Pbs => HEADER_PBS,
        SchedulerKind::Slurm => HEADER_SLURM,
    }
}

/// Rendering context shared by every header
#[derive(Serialize)]
pub struct HeaderContext {
    job_name: String,
    nodes: u32,
    ppn: u32,
    walltime: String,
    node_size: String,
    email: String,
    output_log: String,
    error_log: String,
    dependency_line: String,
    time_now: String,
    conda_path: String,
}

impl HeaderContext {
    /// Header for the job named by `key`, waiting on `dependencies`
    pub fn new(
        namespace: &PathNamespace,
        scheduler: &dyn Scheduler,
        key: &JobKey,
        dependencies: &[JobId],
    ) -> Result<HeaderContext, ConfigError> {
        let resources = &namespace.config().resources;
        Ok(HeaderContext {
            job_name: key.to_string(),
            nodes: resources.nodes,
            ppn: resources.ppn,
            walltime: resources.walltime.clone(),
            node_size: resources.node_size.clone(),
            email: resources.email.clone().unwrap_or_default(),
            output_log: namespace.log_path(key, LogStream::Output)?.display().to_string(),
            error_log: namespace.log_path(key, LogStream::Error)?.display().to_string(),
            dependency_line: scheduler.dependency_directive(dependencies),
            time_now: Utc::now().to_string(),
            conda_path: resources.conda_path.clone().unwrap_or_default(),
        })
    }
}

/// A rendered header and body, ready to write
pub struct JobScript {
    pub header: String,
    pub body: String,
}

impl JobScript {
    /// Write the script, replacing any script left by an earlier run
    pub fn write(&self, out_path: &Path) -> Result<(), io::Error> {
        let mut file = File::create(out_path)?;

        // header first: schedulers only read directives before the first command
        for content in [&self.header, &self.body] {
            file.write_all(content.as_bytes())?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::namespace::test::sample_namespace;
    use crate::scheduler::stub::StubScheduler;
    use crate::scheduler::Slurm;
    use crate::unit::WorkUnit;
    use pretty_assertions::assert_eq;

    #[test]
    fn every_template_is_embedded() {
        let templates = Templates::embedded();
        for name in [HEADER_PBS, HEADER_SLURM, FASTQ_SPLIT, COMPRESSION, FASTQ_RECONSTRUCT, ERROR_ANALYSIS, TRUTH_VCF, POST_HOC] {
            assert!(templates.sources.contains_key(name), "{name}");
        }
    }

    #[test]
    fn pbs_header_with_dependencies() {
        let (dir, namespace) = sample_namespace();
        let key = JobKey::Compression(WorkUnit::new(0, 1, 0));
        let header = HeaderContext::new(&namespace, &StubScheduler::new(), &key, &[JobId::from("7"), JobId::from("8")]).unwrap();
        let text = Templates::embedded().render(HEADER_PBS, &header).unwrap();

        assert!(text.starts_with("#!/bin/bash\n#PBS -N job_0_1_0\n#PBS -l nodes=1:ppn=8\n#PBS -l walltime=24:00:00\n"));
        assert!(text.contains("#PBS -W depend=afterok:7:8\n"));
        let output_log = dir.path().join("compression/logs/job_0_1_0_output.log");
        assert!(text.contains(&format!("#PBS -o {}\n", output_log.display())));
        // email is empty in the sample configuration
        assert!(!text.contains("#PBS -M"));
        assert!(!text.contains("source "));
    }

    #[test]
    fn slurm_header_without_dependencies() {
        let (_dir, namespace) = sample_namespace();
        let key = JobKey::TruthVcf { pair: 0 };
        let header = HeaderContext::new(&namespace, &Slurm, &key, &[]).unwrap();
        let text = Templates::embedded().render(HEADER_SLURM, &header).unwrap();
        assert!(text.contains("#SBATCH --job-name=truth_vcf_0\n"));
        assert!(text.contains("#SBATCH --partition=normal\n"));
        assert!(!text.contains("--dependency"));
    }

    #[test]
    fn optional_header_lines() {
        let dir = tempfile::tempdir().unwrap();
        let mut json = crate::config::pipeline::test::sample();
        json["email"] = serde_json::json!("bench@example.org");
        json["conda_path"] = serde_json::json!("/opt/conda/bin/activate");
        let config = crate::config::pipeline::PipelineConfig::from_value(json).unwrap();
        let namespace = PathNamespace::new(config, dir.path());
        let key = JobKey::PreProcessing { pair: 0, file: 1 };
        let header = HeaderContext::new(&namespace, &StubScheduler::new(), &key, &[]).unwrap();
        let text = Templates::embedded().render(HEADER_PBS, &header).unwrap();
        assert!(text.contains("#PBS -M bench@example.org\n"));
        assert!(text.contains("source /opt/conda/bin/activate\n"));
    }

    #[test]
    fn nothing_is_html_escaped() {
        #[derive(Serialize)]
        struct Context {
            command: String,
        }
        let mut templates = Templates::embedded();
        templates.sources.insert("probe", "{command}\n".to_string());
        let command = "minimap2 -x map-ont ref.fa 'reads & more.fq' > out.paf".to_string();
        let text = templates.render("probe", &Context { command: command.clone() }).unwrap();
        assert_eq!(text, format!("{command}\n"));
    }

    #[test]
    fn overrides_replace_embedded_templates() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("fastq_split.txt"), "split {input_path}\n").unwrap();
        let templates = Templates::load(Some(dir.path())).unwrap();
        assert_eq!(templates.sources[FASTQ_SPLIT], "split {input_path}\n");
        assert_eq!(templates.sources[COMPRESSION], Templates::embedded().sources[COMPRESSION]);
    }

    #[test]
    fn write_replaces_previous_script() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("job.sh");
        fs::write(&path, "stale").unwrap();
        let script = JobScript { header: "#!/bin/bash\n".to_string(), body: "echo hi\n".to_string() };
        script.write(&path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "#!/bin/bash\necho hi\n");
    }
}

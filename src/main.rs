use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use env_logger::Env;
use log::{info, warn};

use crate::config::pipeline::PipelineConfig;
use crate::depend::store::DependencyStore;
use crate::namespace::PathNamespace;
use crate::pipeline::{Orchestrator, PipelineStage};
use crate::scheduler::{Scheduler, SchedulerKind};
use crate::script::Templates;
use crate::unit::JobKey;

mod command;
mod config;
mod depend;
mod error;
mod namespace;
mod pipeline;
mod scheduler;
mod script;
mod unit;

#[derive(Parser)]
#[command(name = "seqbench")]
#[command(about = "Benchmark FASTQ compressors on a batch scheduled cluster", long_about = None)]
#[command(version)]
struct Args {
    /// Directory for job scripts, logs, and metrics. Relative paths in the
    /// pipeline configuration resolve against it
    #[arg(short, long, global = true, default_value = ".")]
    work_dir: PathBuf,

    /// Pipeline configuration (JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Job id record shared between runs [default: WORK_DIR/job_dependencies.json]
    #[arg(long, global = true)]
    dependency_file: Option<PathBuf>,

    #[arg(long, global = true, value_enum, default_value_t = SchedulerKind::Pbs)]
    scheduler: SchedulerKind,

    /// Directory of {name}.txt files replacing the built-in job script templates
    #[arg(long, global = true)]
    template_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write and submit job scripts
    Run {
        /// Stages to submit, in pipeline order whatever order they're given in [default: all]
        #[arg(short, long, value_enum, value_delimiter = ',')]
        stage: Vec<PipelineStage>,
    },
    /// Print the compressor commands of every unit without submitting anything
    #[command(name = "commands")]
    ListCommands,
    /// Cancel every job a user has queued or running
    Cancel {
        #[arg(short, long)]
        user: String,
    },
}

/// Root of everything the pipeline writes that isn't a compressor output
pub struct WorkingDirectory {
    pub path: PathBuf,
}

impl WorkingDirectory {
    fn open(path: &Path) -> Result<WorkingDirectory> {
        fs::create_dir_all(path).with_context(|| format!("Can't create working directory {}", path.display()))?;
        let path = path
            .canonicalize()
            .with_context(|| format!("Can't resolve working directory {}", path.display()))?;
        Ok(WorkingDirectory { path })
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    let scheduler = args.scheduler.backend();
    info!("Using {} scheduler", scheduler.kind());

    match &args.command {
        Commands::Run { stage } => {
            let namespace = load_namespace(&args)?;
            let templates = Templates::load(args.template_dir.as_deref())?;
            let dependency_file = match &args.dependency_file {
                Some(path) => path.clone(),
                None => namespace.work_dir().join("job_dependencies.json"),
            };
            let mut store = DependencyStore::open(&dependency_file)?;
            let stages = match stage.is_empty() {
                true => PipelineStage::ALL.to_vec(),
                false => stage.clone(),
            };

            Orchestrator::new(&namespace, scheduler.as_ref(), &mut store, &templates)
                .run(&stages)
                .context("Pipeline run stopped")?;
            info!("All stages submitted");
        }
        Commands::ListCommands => {
            let namespace = load_namespace(&args)?;
            for unit in namespace.config().units() {
                for command in command::synthesize(&namespace, &unit)? {
                    println!("{}\t{command}", JobKey::Compression(unit));
                }
            }
        }
        Commands::Cancel { user } => cancel(scheduler.as_ref(), user)?,
    }

    Ok(())
}

fn load_namespace(args: &Args) -> Result<PathNamespace> {
    let config_path = args.config.as_ref().context("--config is required")?;
    let wd = WorkingDirectory::open(&args.work_dir)?;
    info!("Working directory {}", wd.path.display());
    let config = PipelineConfig::load(config_path)?;
    Ok(PathNamespace::new(config, &wd.path))
}

fn cancel(scheduler: &dyn Scheduler, user: &str) -> Result<()> {
    let jobs = scheduler
        .list_user_jobs(user)
        .with_context(|| format!("Can't list jobs of {user}"))?;
    info!("{} job(s) to cancel for {user}", jobs.len());
    for id in jobs {
        match scheduler.cancel(&id) {
            Ok(()) => info!("Cancelled job {id}"),
            Err(err) => warn!("Can't cancel job {id}: {err}"),
        }
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::scheduler::stub::StubScheduler;
    use pretty_assertions::assert_eq;

    #[test]
    fn cancel_every_listed_job() {
        let scheduler = StubScheduler::new();
        for name in ["a.sh", "b.sh"] {
            scheduler.submit(Path::new(name)).unwrap();
        }
        cancel(&scheduler, "someone").unwrap();
        assert_eq!(scheduler.cancelled.borrow().len(), 2);
    }

    #[test]
    fn stage_list() {
        let args = Args::try_parse_from(["seqbench", "--config", "bench.json", "run", "--stage", "post-hoc,metrics"]).unwrap();
        match args.command {
            Commands::Run { stage } => assert_eq!(stage, vec![PipelineStage::PostHoc, PipelineStage::Metrics]),
            _ => panic!("expected run"),
        }
        assert_eq!(args.scheduler, SchedulerKind::Pbs);
    }

    #[test]
    fn global_options_after_subcommand() {
        let args = Args::try_parse_from(["seqbench", "commands", "--scheduler", "slurm", "-c", "bench.json"]).unwrap();
        assert_eq!(args.scheduler, SchedulerKind::Slurm);
        assert_eq!(args.config, Some(PathBuf::from("bench.json")));
    }

    #[test]
    fn working_directory_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let wd = WorkingDirectory::open(&dir.path().join("bench/run1")).unwrap();
        assert!(wd.path.is_dir());
        assert!(wd.path.is_absolute());
    }
}

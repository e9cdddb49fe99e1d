//! Command-line CMST solver.
//!
//! Reads `N` and the `(N+1)x(N+1)` cost matrix from stdin, anneals for
//! the given number of seconds and prints the best tree and a summary.

use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use u_cmst::instance::ProblemInstance;
use u_cmst::mst::minimum_spanning_tree_cost;
use u_cmst::report::{write_report, CsvProgressWriter};
use u_cmst::sa::{AnnealConfig, AnnealRunner, NoopObserver};
use u_cmst::CmstError;

#[derive(Debug, Parser)]
#[command(
    name = "cmst",
    version,
    about = "Capacitated minimum spanning tree by simulated annealing"
)]
struct Cli {
    /// Maximum number of nodes in a subtree attached to the depot.
    #[arg(allow_negative_numbers = true)]
    capacity: i64,

    /// Search time budget in seconds.
    seconds: f64,

    /// Random seed; drawn from the OS when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// TOML file with annealing parameters.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Write CSV progress samples to this file, or `-` for stderr.
    #[arg(long, value_name = "PATH")]
    progress: Option<String>,

    /// Stop after this many temperature stages even if time remains.
    #[arg(long)]
    max_stages: Option<u64>,
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();
}

fn build_config(cli: &Cli) -> Result<AnnealConfig> {
    let mut config = match &cli.config {
        Some(path) => AnnealConfig::from_toml_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => AnnealConfig::default(),
    };

    if cli.capacity <= 0 {
        return Err(CmstError::InvalidCapacity(cli.capacity).into());
    }
    if !(cli.seconds.is_finite() && cli.seconds >= 0.0) {
        anyhow::bail!(
            "time budget must be a non-negative number of seconds, got {}",
            cli.seconds
        );
    }
    config.time_budget = Duration::from_secs_f64(cli.seconds);
    if let Some(seed) = cli.seed {
        config.seed = Some(seed);
    }
    if let Some(stages) = cli.max_stages {
        config.max_stages = Some(stages);
    }
    config.validate()?;
    Ok(config)
}

fn progress_sink(target: Option<&str>) -> Result<Option<CsvProgressWriter<Box<dyn Write>>>> {
    let Some(target) = target else {
        return Ok(None);
    };
    let out: Box<dyn Write> = if target == "-" {
        Box::new(io::stderr())
    } else {
        let file = File::create(target).with_context(|| format!("creating {target}"))?;
        Box::new(BufWriter::new(file))
    };
    Ok(Some(CsvProgressWriter::new(out)))
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = build_config(&cli)?;
    let instance = ProblemInstance::from_reader(cli.capacity, io::stdin().lock())
        .context("reading the instance from stdin")?;

    let mut progress = progress_sink(cli.progress.as_deref())?;
    let result = match progress.as_mut() {
        Some(writer) => AnnealRunner::run_with_observer(&instance, &config, writer),
        None => AnnealRunner::run_with_observer(&instance, &config, &mut NoopObserver),
    }?;
    if let Some(writer) = progress {
        writer.finish().context("writing progress samples")?;
    }

    result
        .best
        .check_invariants(&instance)
        .context("best tree failed its final check")?;

    let lower_bound = minimum_spanning_tree_cost(&instance);
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    write_report(&mut out, &result, &config, Some(lower_bound))?;
    out.flush()?;
    Ok(())
}

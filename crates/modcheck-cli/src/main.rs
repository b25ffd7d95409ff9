//! Command-line harness for probing a script module shared library.
//!
//! Performs exactly one load / invoke / unload cycle and exits: 0 when the
//! module bound and answered, 1 when any step of the probe failed.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use modcheck_core::{probe, probe_cached, LibraryLoader, ProbeReport};

/// Load a script module shared library and probe its exports.
#[derive(Parser, Debug)]
#[command(name = "modcheck")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the script module shared library.
    module: PathBuf,

    /// Cached copy of the library to open instead of the original; deleted
    /// after unload.
    #[arg(long)]
    cache: Option<PathBuf>,

    /// Verbose output.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    match run(&args) {
        Ok(report) => {
            tracing::info!(
                name = %report.name,
                hash = %report.revision_hash,
                path = %report.path.display(),
                "module probe succeeded"
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(error = %format!("{err:#}"), "module probe failed");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> anyhow::Result<ProbeReport> {
    let loader = LibraryLoader::new();

    let report = match &args.cache {
        Some(cache) => probe_cached(&loader, &args.module, cache),
        None => probe(&loader, &args.module),
    }
    .with_context(|| format!("failed to probe script module {}", args.module.display()))?;

    Ok(report)
}

fn init_tracing(verbose: bool) {
    let default_directive = if verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_directive));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

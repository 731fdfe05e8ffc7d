//! Brokkr CLI - project scaffolding from versioned template packages
//!
//! This is the main entry point for the Brokkr command-line interface.

mod cli;
mod commands;
mod output;
mod update;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use brokkr_core::RuntimeConfig;
use cli::{Cli, Commands};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let verbose = cli.verbose;

    init_tracing(verbose, cli.quiet);

    match run(cli).await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            output::error(&e.to_string());
            if verbose > 0 || std::env::var_os("BROKKR_LOG").is_some() {
                // The full chain, for bug reports
                eprintln!("{e:?}");
            }
            std::process::exit(1);
        }
    }
}

async fn run(cli: Cli) -> Result<i32> {
    let config = RuntimeConfig::from_env()?.with_target_path(cli.target_path);
    tracing::debug!("brokkr v{}", env!("CARGO_PKG_VERSION"));

    update::check_for_newer_release(&config).await;

    match cli.command {
        Commands::Init(args) => {
            commands::init::run(args, &config).await?;
            Ok(0)
        }
        Commands::External(argv) => commands::dispatch::run(argv, &config).await,
    }
}

/// Initialize tracing with appropriate verbosity
///
/// `BROKKR_LOG` takes precedence over the flags, mirroring the usual
/// env-filter convention.
fn init_tracing(verbose: u8, quiet: bool) {
    let default = if quiet {
        "error"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };
    let filter =
        EnvFilter::try_from_env("BROKKR_LOG").unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();
}

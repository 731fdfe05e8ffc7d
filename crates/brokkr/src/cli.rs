//! CLI argument parsing with clap

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Brokkr - scaffold projects from versioned, registry-distributed templates
#[derive(Parser, Debug)]
#[command(name = "brokkr")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Resolve command packages from a local path instead of the cache
    #[arg(long, global = true, env = "BROKKR_TARGET_PATH")]
    pub target_path: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a new project or component from a template
    Init(InitArgs),

    /// Any other command dispatches to its registry-distributed package
    #[command(external_subcommand)]
    External(Vec<String>),
}

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Project name
    pub name: Option<String>,

    /// Continue into a non-empty directory without asking
    #[arg(short, long)]
    pub force: bool,
}

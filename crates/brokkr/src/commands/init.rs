//! `brokkr init` command handler

use anyhow::{Context, Result};

use brokkr_core::RuntimeConfig;
use brokkr_scaffold::catalog;
use brokkr_scaffold::pipeline::{InitOptions, Outcome, ProjectInitPipeline};
use brokkr_scaffold::prompt::TerminalPrompter;

use crate::cli::InitArgs;
use crate::output;

/// Run the project initialization pipeline in the current directory
pub(crate) async fn run(args: InitArgs, config: &RuntimeConfig) -> Result<()> {
    output::header("Create New Project");

    let spinner = output::spinner("Loading template catalog...");
    let templates = catalog::fetch_templates(config).await;
    spinner.finish_and_clear();
    let templates = templates.context("Failed to load the template catalog")?;

    let workdir = std::env::current_dir()?;
    let prompter = TerminalPrompter;
    let pipeline = ProjectInitPipeline::new(
        config,
        &prompter,
        templates,
        workdir,
        InitOptions {
            name: args.name,
            force: args.force,
        },
    );

    match pipeline.run().await? {
        Outcome::Completed(info) => {
            output::success(&format!(
                "Project '{}' created from {}",
                info.name, info.template
            ));
            Ok(())
        }
        // Declining the safety check is a normal outcome, not a failure
        Outcome::Declined => {
            output::info("Nothing to do");
            Ok(())
        }
    }
}

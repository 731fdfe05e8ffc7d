//! Whitelist-gated execution of template-declared commands
//!
//! Templates declare their own install/start commands. Only a fixed set of
//! package-manager names may lead such a command; anything else is rejected
//! before a process is ever spawned. Standard I/O is inherited so the
//! manager owns the terminal while it runs.

use std::path::Path;

use tracing::info;

use brokkr_core::utils::host_command;

use crate::error::{Error, Result};

/// Package managers allowed as the leading token of a declared command
pub const COMMAND_WHITELIST: &[&str] = &["npm", "cnpm", "yarn", "pnpm"];

/// Split a declared command line into program and arguments, enforcing the
/// whitelist on the leading token.
pub fn parse_command(line: &str) -> Result<(String, Vec<String>)> {
    let mut parts = line.split_whitespace();
    let program = parts
        .next()
        .ok_or_else(|| Error::command_not_whitelisted(line, COMMAND_WHITELIST))?;

    if !COMMAND_WHITELIST.contains(&program) {
        return Err(Error::command_not_whitelisted(program, COMMAND_WHITELIST));
    }

    Ok((program.to_string(), parts.map(String::from).collect()))
}

/// Run a declared command inside `cwd`, failing on a non-zero exit.
pub async fn exec_command(line: &str, cwd: &Path) -> Result<()> {
    let (program, args) = parse_command(line)?;
    info!("running '{}' in {}", line, cwd.display());

    let status = host_command(&program)
        .args(&args)
        .current_dir(cwd)
        .status()
        .await
        .map_err(|e| Error::command_failed(line, e.to_string()))?;

    if !status.success() {
        return Err(Error::command_failed(line, format!("exited with {status}")));
    }
    Ok(())
}

//! Dispatch of non-builtin commands to their registry packages

use anyhow::{anyhow, Result};
use serde_json::{Map, Value};

use brokkr_core::RuntimeConfig;
use brokkr_packages::CommandDispatcher;

/// Resolve, cache, and execute an external command; returns the child's
/// exit code.
pub(crate) async fn run(argv: Vec<String>, config: &RuntimeConfig) -> Result<i32> {
    let Some((command, rest)) = argv.split_first() else {
        return Err(anyhow!("no command given"));
    };
    let (args, options) = split_invocation(rest);

    let code = CommandDispatcher::new(config)
        .dispatch(command, &args, options)
        .await?;
    Ok(code)
}

/// Split raw argv into positional arguments and a free-form option bag.
///
/// `--key value` and `--key=value` become string options, a bare `--flag`
/// becomes `true`; everything else stays positional.
fn split_invocation(raw: &[String]) -> (Vec<String>, Map<String, Value>) {
    let mut args = Vec::new();
    let mut options = Map::new();
    let mut iter = raw.iter().peekable();

    while let Some(token) = iter.next() {
        let Some(key) = token.strip_prefix("--") else {
            args.push(token.clone());
            continue;
        };
        if let Some((key, value)) = key.split_once('=') {
            options.insert(key.to_string(), Value::String(value.to_string()));
        } else if let Some(value) = iter.next_if(|next| !next.starts_with("--")) {
            options.insert(key.to_string(), Value::String(value.clone()));
        } else {
            options.insert(key.to_string(), Value::Bool(true));
        }
    }
    (args, options)
}

//! Running a namespaced command.

use anyhow::{Context, bail};
use railcar_core::commands::{Dispatcher, InvokeConfig, Outcome};
use serde_json::Value;

/// Namespace run when none is given.
const HELP_NAMESPACE: &str = "help";

/// First arguments that ask for the command listing.
const HELP_ALIASES: [&str; 3] = ["-h", "-?", "--help"];

/// Execute the command named by `namespace`.
///
/// Output goes to stdout. A namespace that does not resolve prints the
/// suggestion message and still succeeds.
pub fn execute(
    dispatcher: &mut Dispatcher,
    namespace: Option<String>,
    args: Vec<String>,
    config: &InvokeConfig,
) -> anyhow::Result<()> {
    let namespace = namespace_or_help(namespace);

    let outcome = dispatcher
        .invoke(&namespace, args, config)
        .with_context(|| format!("Command '{}' failed", namespace))?;

    match outcome {
        Outcome::Completed(output) => {
            if output.ends_with('\n') {
                print!("{}", output);
            } else {
                println!("{}", output);
            }
        }
        Outcome::NotFound { message, .. } => println!("{}", message),
    }

    Ok(())
}

fn namespace_or_help(namespace: Option<String>) -> String {
    match namespace {
        Some(namespace) if !HELP_ALIASES.contains(&namespace.as_str()) => namespace,
        _ => HELP_NAMESPACE.to_string(),
    }
}

/// Parse `KEY=VALUE` pairs into the configuration handed to the command.
pub fn parse_settings(pairs: &[String]) -> anyhow::Result<InvokeConfig> {
    let mut config = InvokeConfig::new();

    for pair in pairs {
        let Some((key, value)) = pair.split_once('=') else {
            bail!("Invalid setting '{}', expected KEY=VALUE", pair);
        };
        let key = key.trim();
        if key.is_empty() {
            bail!("Invalid setting '{}', key is empty", pair);
        }
        config.insert(key.to_string(), Value::String(value.to_string()));
    }

    Ok(config)
}

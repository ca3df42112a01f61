//! Built-in commands shipped with the dispatcher.

use super::descriptor::{Command, CommandDescriptor, CommandType, Invocation};
use super::error::Result;
use super::loader::{LookupPathSpec, NAMESPACE_DELIMITER, StaticModules};
use super::registry::Registry;
use crate::config::DispatchConfig;
use std::sync::Arc;

/// Name of the built-in help command.
pub const HELP_COMMAND: &str = "help";

/// Lists every visible command.
#[derive(Debug, Default)]
pub struct HelpCommand;

impl Command for HelpCommand {
    fn dispatch(&self, mut invocation: Invocation<'_>) -> Result<String> {
        let executable = invocation.dispatcher.config().executable.clone();
        let mut out = format!(
            "Usage:\n  {executable} COMMAND [options]\n\n\
             You must specify a command. All commands can be run with -h\n\
             (or --help) for more information.\n\n\
             In addition to those commands, there are:\n\n"
        );
        out.push_str(&invocation.dispatcher.print_commands());
        Ok(out)
    }
}

/// Module path the help command is registered under.
pub fn help_module_path(spec: &LookupPathSpec, reserved: &str) -> Option<String> {
    let base = spec.lookup_paths().first()?;
    Some(spec.module_path(base, &format!("{reserved}/{HELP_COMMAND}/{HELP_COMMAND}")))
}

/// Built-in modules for the configured command type.
///
/// Only plain commands ship built-ins; generators start empty.
pub fn modules(config: &DispatchConfig) -> StaticModules {
    let mut modules = StaticModules::new();
    if config.command_type != CommandType::Command {
        return modules;
    }

    let Some(path) = help_module_path(&config.lookup_spec(), &config.reserved_namespace) else {
        return modules;
    };
    let namespace = format!("{}{}{}", config.reserved_namespace, NAMESPACE_DELIMITER, HELP_COMMAND);
    modules.insert(path, move |registry: &mut Registry| {
        registry.register(
            CommandDescriptor::new(namespace.clone(), CommandType::Command, Arc::new(HelpCommand))
                .with_description("List available commands"),
        );
        Ok(())
    });
    modules
}

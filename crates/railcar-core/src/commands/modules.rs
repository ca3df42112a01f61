//! Command modules defined as TOML files under load-path roots.
//!
//! A module lives at `<root>/<module path>.toml`, for example
//! `<root>/rails/command/console_command.toml`, and declares one or more
//! commands:
//!
//! ```toml
//! [[command]]
//! name = "Rails::Command::ConsoleCommand"
//! description = "Start the console"
//! template = "console ({{env}}) {{args}}"
//! arguments = [{ name = "environment", required = false }]
//! ```
//!
//! Templates support:
//! - Argument placeholders: `{{args}}`, `{{arg1}}`, etc.
//! - `{{env}}` and `{{namespace}}`
//! - File content injection relative to the module directory: `@{file}`
//!
//! Long-form help is read from `<module dir>/<command name>/USAGE` when present.

use super::descriptor::{ArgumentSpec, Command, CommandDescriptor, CommandType, Invocation};
use super::error::{CommandError, LoadError, Result};
use super::loader::{LookupPathSpec, ModuleSource};
use super::registry::Registry;
use crate::env;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Extension of module files.
pub const MODULE_EXTENSION: &str = "toml";

/// Name of the long-form help file.
pub const USAGE_FILE: &str = "USAGE";

/// Parsed module file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModuleFile {
    /// Commands declared by the module.
    #[serde(default, rename = "command")]
    pub commands: Vec<CommandDefinition>,
}

/// A single command entry in a module file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommandDefinition {
    /// Qualified type name the namespace is derived from.
    #[serde(default)]
    pub name: Option<String>,

    /// Explicit namespace, overriding `name`.
    #[serde(default)]
    pub namespace: Option<String>,

    /// Command description.
    #[serde(default)]
    pub description: String,

    /// Output template.
    #[serde(default)]
    pub template: String,

    /// Positional arguments.
    #[serde(default)]
    pub arguments: Vec<ArgumentSpec>,

    /// Hide from listings and suggestions.
    #[serde(default)]
    pub hidden: bool,
}

/// Command implementation backed by a template.
#[derive(Debug, Clone)]
pub struct TemplateCommand {
    template: String,
    base_dir: PathBuf,
}

impl TemplateCommand {
    /// Creates a template command resolving `@{file}` against `base_dir`.
    pub fn new(template: impl Into<String>, base_dir: impl Into<PathBuf>) -> Self {
        Self { template: template.into(), base_dir: base_dir.into() }
    }

    /// Renders the template for a namespace and argument list.
    ///
    /// # Errors
    /// Returns error if a file injection is unclosed or unreadable.
    pub fn render(&self, namespace: &str, args: &[String]) -> Result<String> {
        let injected = Self::inject_files(&self.template, &self.base_dir)?;
        let mut rendered = Self::substitute_args(&injected, args);
        rendered = rendered.replace("{{env}}", &env::environment());
        rendered = rendered.replace("{{namespace}}", namespace);
        Ok(rendered)
    }

    /// Substitutes argument placeholders.
    fn substitute_args(template: &str, args: &[String]) -> String {
        let mut result = template.to_string();

        if result.contains("{{args}}") {
            result = result.replace("{{args}}", &args.join(" "));
        }

        for (i, arg) in args.iter().enumerate() {
            let placeholder = format!("{{{{arg{}}}}}", i + 1);
            result = result.replace(&placeholder, arg);
        }

        result
    }

    /// Injects file contents in a single pass over the template.
    ///
    /// Injected text is never scanned again, so a file containing `@{...}`
    /// is copied literally.
    fn inject_files(template: &str, base_dir: &Path) -> Result<String> {
        let mut result = String::with_capacity(template.len());
        let mut rest = template;

        while let Some(start) = rest.find("@{") {
            let Some(len) = rest[start + 2..].find('}') else {
                return Err(CommandError::TemplateRender("Unclosed file injection".to_string()));
            };

            let file_path = base_dir.join(&rest[start + 2..start + 2 + len]);
            let content = fs::read_to_string(&file_path).map_err(|e| {
                CommandError::TemplateRender(format!(
                    "Failed to read {}: {}",
                    file_path.display(),
                    e
                ))
            })?;

            result.push_str(&rest[..start]);
            result.push_str(&content);
            rest = &rest[start + 2 + len + 1..];
        }

        result.push_str(rest);
        Ok(result)
    }
}

impl Command for TemplateCommand {
    fn dispatch(&self, invocation: Invocation<'_>) -> Result<String> {
        if invocation.is_help() {
            return Ok(invocation.render_help());
        }
        self.render(invocation.descriptor.namespace(), &invocation.args)
    }
}

/// Module source reading TOML module files from load-path roots.
#[derive(Debug, Clone)]
pub struct FileModules {
    roots: Vec<PathBuf>,
    executable: String,
}

impl FileModules {
    /// Creates a source searching `roots` in order.
    pub fn new<I, P>(roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self { roots: roots.into_iter().map(Into::into).collect(), executable: "rails".to_string() }
    }

    /// Sets the executable name substituted into USAGE files.
    #[must_use]
    pub fn with_executable(mut self, executable: impl Into<String>) -> Self {
        self.executable = executable.into();
        self
    }

    /// Load-path roots.
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// First file backing `path` across the roots.
    fn locate(&self, path: &str) -> Option<PathBuf> {
        self.roots
            .iter()
            .map(|root| root.join(format!("{}.{}", path, MODULE_EXTENSION)))
            .find(|candidate| candidate.is_file())
    }

    /// Parses a module file and registers its commands.
    ///
    /// Every entry is validated before anything is registered.
    ///
    /// # Errors
    /// Returns error if the file cannot be read or parsed, declares no
    /// commands, or an entry has neither `name` nor `namespace`.
    pub fn load_file(
        &self,
        file: &Path,
        command_type: CommandType,
        registry: &mut Registry,
    ) -> Result<usize> {
        let content = fs::read_to_string(file)?;
        let module: ModuleFile = toml::from_str(&content)?;

        if module.commands.is_empty() {
            return Err(CommandError::InvalidDefinition(format!(
                "{} declares no commands",
                file.display()
            )));
        }

        let base_dir = file.parent().unwrap_or_else(|| Path::new("."));
        let descriptors = module
            .commands
            .into_iter()
            .map(|definition| self.build(definition, command_type, base_dir))
            .collect::<Result<Vec<_>>>()?;

        let count = descriptors.len();
        for descriptor in descriptors {
            registry.register(descriptor);
        }

        Ok(count)
    }

    fn build(
        &self,
        definition: CommandDefinition,
        command_type: CommandType,
        base_dir: &Path,
    ) -> Result<CommandDescriptor> {
        let handler: Arc<dyn Command> =
            Arc::new(TemplateCommand::new(definition.template, base_dir));

        let mut descriptor = match (definition.namespace, definition.name) {
            (Some(namespace), _) if !namespace.trim().is_empty() => {
                CommandDescriptor::new(namespace.trim(), command_type, handler)
            }
            (_, Some(name)) if !name.trim().is_empty() => {
                CommandDescriptor::from_type_name(name.trim(), command_type, handler)
            }
            _ => {
                return Err(CommandError::InvalidDefinition(
                    "command needs a name or namespace".to_string(),
                ));
            }
        };

        descriptor = descriptor.with_arguments(definition.arguments);
        if !definition.description.is_empty() {
            descriptor = descriptor.with_description(definition.description);
        }
        if let Some(usage) = self.read_usage(base_dir, &descriptor)? {
            descriptor = descriptor.with_usage(usage);
        }
        if definition.hidden {
            descriptor = descriptor.hidden();
        }

        Ok(descriptor)
    }

    /// Reads `<base_dir>/<command name>/USAGE` if it exists.
    fn read_usage(&self, base_dir: &Path, descriptor: &CommandDescriptor) -> Result<Option<String>> {
        let path = base_dir.join(descriptor.command_name()).join(USAGE_FILE);
        if !path.is_file() {
            return Ok(None);
        }

        let raw = fs::read_to_string(&path)?;
        Ok(Some(
            raw.replace("{{executable}}", &self.executable)
                .replace("{{command_name}}", descriptor.command_name())
                .replace("{{namespace}}", descriptor.namespace()),
        ))
    }
}

/// Command type implied by a module path's suffix.
fn command_type_for(path: &str) -> CommandType {
    let suffix = format!("_{}", CommandType::Generator.suffix());
    if path.ends_with(&suffix) { CommandType::Generator } else { CommandType::Command }
}

/// Module path of `file` relative to `root`, without extension.
fn module_path(root: &Path, file: &Path) -> Option<String> {
    let relative = file.strip_prefix(root).ok()?.with_extension("");
    let parts: Vec<String> = relative
        .components()
        .map(|component| component.as_os_str().to_string_lossy().into_owned())
        .collect();
    if parts.is_empty() { None } else { Some(parts.join("/")) }
}

impl ModuleSource for FileModules {
    fn require(&self, path: &str, registry: &mut Registry) -> std::result::Result<(), LoadError> {
        let file = self.locate(path).ok_or_else(|| LoadError::NotFound(path.to_string()))?;
        tracing::debug!(path = %path, file = %file.display(), "loading module file");

        self.load_file(&file, command_type_for(path), registry)
            .map(|_| ())
            .map_err(|e| LoadError::failed(path, &e))
    }

    fn discover(&self, spec: &LookupPathSpec) -> Vec<String> {
        let mut found = Vec::new();

        for root in &self.roots {
            let escaped = glob::Pattern::escape(&root.to_string_lossy());
            for pattern in spec.discovery_patterns() {
                let full = format!("{}/{}.{}", escaped, pattern, MODULE_EXTENSION);
                let Ok(paths) = glob::glob(&full) else {
                    continue;
                };
                for file in paths.flatten() {
                    if let Some(path) = module_path(root, &file) {
                        if !found.contains(&path) {
                            found.push(path);
                        }
                    }
                }
            }
        }

        found
    }
}

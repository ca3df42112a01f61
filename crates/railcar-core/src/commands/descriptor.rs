//! Command descriptors and the execution contract every command implements.

use super::dispatcher::Dispatcher;
use super::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Configuration map forwarded unmodified to a command.
pub type InvokeConfig = serde_json::Map<String, serde_json::Value>;

/// Category of command, governing the filename suffix and lookup paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandType {
    /// Plain command (`*_command` modules).
    #[default]
    Command,
    /// Code generator (`*_generator` modules).
    Generator,
}

impl CommandType {
    /// Filename suffix for modules of this type.
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Command => "command",
            Self::Generator => "generator",
        }
    }

    /// Module segment stripped from derived namespaces.
    fn module_segment(self) -> &'static str {
        match self {
            Self::Command => "command",
            Self::Generator => "generators",
        }
    }

    /// Type-name suffix stripped when deriving a command name.
    fn type_suffix(self) -> &'static str {
        match self {
            Self::Command => "Command",
            Self::Generator => "Generator",
        }
    }

    /// Lookup bases used when nothing is configured.
    pub fn default_lookup_paths(self) -> Vec<String> {
        match self {
            Self::Command => vec!["rails/command".to_string(), "command".to_string()],
            Self::Generator => vec!["rails/generators".to_string(), "generators".to_string()],
        }
    }
}

impl fmt::Display for CommandType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// Positional argument declared by a command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArgumentSpec {
    /// Argument name.
    pub name: String,

    /// Whether the argument must be supplied.
    #[serde(default)]
    pub required: bool,

    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
}

impl ArgumentSpec {
    /// Creates a required argument.
    pub fn required(name: impl Into<String>) -> Self {
        Self { name: name.into(), required: true, description: None }
    }

    /// Creates an optional argument.
    pub fn optional(name: impl Into<String>) -> Self {
        Self { name: name.into(), required: false, description: None }
    }

    /// Usage fragment: `NAME` when required, `[NAME]` otherwise.
    pub fn usage(&self) -> String {
        let name = self.name.to_uppercase();
        if self.required { name } else { format!("[{}]", name) }
    }
}

/// Execution entry point of a command implementation.
pub trait Command: Send + Sync {
    /// Runs the command and returns its output.
    ///
    /// `invocation.runnable` is `None` when the caller asked for help; the
    /// implementation should then render help instead of running its body.
    ///
    /// # Errors
    /// Any error is returned to the caller of [`Dispatcher::invoke`] unchanged.
    fn dispatch(&self, invocation: Invocation<'_>) -> Result<String>;
}

/// A single call into a command.
pub struct Invocation<'a> {
    /// The resolved descriptor.
    pub descriptor: &'a CommandDescriptor,

    /// Action to run, or `None` for a help request.
    pub runnable: Option<String>,

    /// Fresh copy of the caller's arguments.
    pub args: Vec<String>,

    /// Caller configuration, unmodified.
    pub config: &'a InvokeConfig,

    /// The dispatcher, for commands that list or invoke other commands.
    pub dispatcher: &'a mut Dispatcher,
}

impl Invocation<'_> {
    /// Returns true when this call should render help.
    pub fn is_help(&self) -> bool {
        self.runnable.is_none()
    }

    /// Renders the generic help text for the invoked command.
    pub fn render_help(&self) -> String {
        self.descriptor.help(&self.dispatcher.config().executable)
    }
}

/// A registered command.
#[derive(Clone)]
pub struct CommandDescriptor {
    namespace: String,
    command_name: String,
    command_type: CommandType,
    hidden: bool,
    arguments: Vec<ArgumentSpec>,
    description: Option<String>,
    usage: Option<String>,
    handler: Arc<dyn Command>,
}

impl CommandDescriptor {
    /// Creates a descriptor for an explicit namespace.
    pub fn new(
        namespace: impl Into<String>,
        command_type: CommandType,
        handler: Arc<dyn Command>,
    ) -> Self {
        let namespace = namespace.into();
        let command_name = namespace.rsplit(':').next().unwrap_or_default().to_string();
        Self {
            namespace,
            command_name,
            command_type,
            hidden: false,
            arguments: Vec::new(),
            description: None,
            usage: None,
            handler,
        }
    }

    /// Creates a descriptor whose namespace is derived from a qualified type
    /// name such as `Rails::Command::ConsoleCommand`.
    pub fn from_type_name(
        type_name: &str,
        command_type: CommandType,
        handler: Arc<dyn Command>,
    ) -> Self {
        let mut descriptor =
            Self::new(namespace_from_type_name(type_name, command_type), command_type, handler);
        descriptor.command_name = command_name_from_type_name(type_name, command_type);
        descriptor
    }

    /// Declares the positional arguments.
    #[must_use]
    pub fn with_arguments(mut self, arguments: Vec<ArgumentSpec>) -> Self {
        self.arguments = arguments;
        self
    }

    /// Sets the short description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the long-form usage text.
    #[must_use]
    pub fn with_usage(mut self, usage: impl Into<String>) -> Self {
        self.usage = Some(usage.into());
        self
    }

    /// Marks the command hidden from listings and suggestions.
    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Canonical namespace.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Short name used as the runnable action.
    pub fn command_name(&self) -> &str {
        &self.command_name
    }

    /// Command type.
    pub fn command_type(&self) -> CommandType {
        self.command_type
    }

    /// Whether the command was registered hidden.
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Declared positional arguments.
    pub fn arguments(&self) -> &[ArgumentSpec] {
        &self.arguments
    }

    /// True if any positional argument is required.
    pub fn requires_arguments(&self) -> bool {
        self.arguments.iter().any(|arg| arg.required)
    }

    /// Short description.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Long-form usage text.
    pub fn usage(&self) -> Option<&str> {
        self.usage.as_deref()
    }

    /// Execution entry point.
    pub fn handler(&self) -> &Arc<dyn Command> {
        &self.handler
    }

    /// One-line usage banner.
    pub fn banner(&self, executable: &str) -> String {
        let arguments: Vec<String> = self.arguments.iter().map(ArgumentSpec::usage).collect();
        let raw = format!("{} {} {} [options]", executable, self.command_name, arguments.join(" "));
        raw.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// Generic help text: banner followed by usage or description.
    pub fn help(&self, executable: &str) -> String {
        let mut text = format!("Usage:\n  {}\n", self.banner(executable));
        if let Some(long) = self.usage.as_deref().or(self.description.as_deref()) {
            text.push('\n');
            text.push_str(long.trim_end());
            text.push('\n');
        }
        text
    }
}

impl fmt::Debug for CommandDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandDescriptor")
            .field("namespace", &self.namespace)
            .field("command_name", &self.command_name)
            .field("command_type", &self.command_type)
            .field("hidden", &self.hidden)
            .field("arguments", &self.arguments)
            .finish_non_exhaustive()
    }
}

/// Derives a namespace from a qualified type name.
///
/// `Rails::Command::ConsoleCommand` becomes `rails:console` and
/// `Rails::Generators::ModelGenerator` becomes `rails:model`.
pub fn namespace_from_type_name(type_name: &str, command_type: CommandType) -> String {
    let joined = type_name
        .split("::")
        .filter(|segment| !segment.is_empty())
        .map(underscore)
        .collect::<Vec<_>>()
        .join(":");

    let suffix = format!("_{}", command_type.suffix());
    let trimmed = joined.strip_suffix(&suffix).unwrap_or(&joined);

    let segment = format!(":{}:", command_type.module_segment());
    trimmed.replacen(&segment, ":", 1)
}

/// Derives the short command name from a qualified type name.
///
/// `Rails::Command::TestCommand` becomes `test`.
pub fn command_name_from_type_name(type_name: &str, command_type: CommandType) -> String {
    let last = type_name.rsplit("::").next().unwrap_or(type_name);
    underscore(last.strip_suffix(command_type.type_suffix()).unwrap_or(last))
}

/// Converts `CamelCase` to `snake_case`, keeping acronyms together
/// (`DBConsole` becomes `db_console`).
pub fn underscore(word: &str) -> String {
    let chars: Vec<char> = word.chars().collect();
    let mut out = String::with_capacity(word.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_uppercase() && next_is_lower)
            {
                out.push('_');
            }
        }
        if c == '-' {
            out.push('_');
        } else {
            out.extend(c.to_lowercase());
        }
    }

    out
}

/// Converts `snake_case` to `CamelCase` (`active_record` becomes `ActiveRecord`).
pub fn camelize(word: &str) -> String {
    word.split('_')
        .map(|part| {
            let mut chars = part.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect()
            })
        })
        .collect()
}

//! Command loading and execution error types.

use std::io;

/// Command errors.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// I/O error during command operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Invalid command definition.
    #[error("invalid command definition: {0}")]
    InvalidDefinition(String),

    /// Template rendering error.
    #[error("template rendering error: {0}")]
    TemplateRender(String),

    /// The command itself failed while running.
    #[error("command execution failed: {0}")]
    Execution(String),
}

/// Result type for command operations.
pub type Result<T> = std::result::Result<T, CommandError>;

/// Outcome of requiring a single module path.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// No module source knows the path. Expected during lookup.
    #[error("no such module: {0}")]
    NotFound(String),

    /// The module exists but failed to register its commands.
    #[error("could not load {path}: {reason}")]
    Failed {
        /// Module path that failed.
        path: String,
        /// Underlying failure detail.
        reason: String,
    },
}

impl LoadError {
    /// Wraps a command error raised while loading `path`.
    pub fn failed(path: impl Into<String>, error: &CommandError) -> Self {
        Self::Failed { path: path.into(), reason: error.to_string() }
    }

    /// Returns true for the non-fatal "module absent" case.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

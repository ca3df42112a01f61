//! Dispatch configuration.
//!
//! Configuration precedence (highest first):
//! 1. Explicit overrides from the caller (CLI flags)
//! 2. Environment variables (`RAILCAR_LOAD_PATH`, `RAILCAR_EXECUTABLE`)
//! 3. Local config file (`./.railcarrc`)
//! 4. Global config file (`~/.railcar/config.toml`)
//! 5. Defaults

use crate::commands::{CommandType, LookupPathSpec};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable holding extra load-path roots.
pub const LOAD_PATH_ENV: &str = "RAILCAR_LOAD_PATH";

/// Environment variable overriding the executable name.
pub const EXECUTABLE_ENV: &str = "RAILCAR_EXECUTABLE";

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file not found.
    #[error("Configuration file not found: {0}")]
    NotFound(String),

    /// Failed to read or write a configuration file.
    #[error("Failed to read configuration file: {0}")]
    ReadError(String),

    /// Failed to parse configuration file.
    #[error("Failed to parse configuration file: {0}")]
    ParseError(String),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Lookup bases per command type.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LookupConfig {
    /// Bases for plain commands.
    #[serde(default = "default_command_paths")]
    pub command: Vec<String>,

    /// Bases for generators.
    #[serde(default = "default_generator_paths")]
    pub generator: Vec<String>,
}

fn default_command_paths() -> Vec<String> {
    CommandType::Command.default_lookup_paths()
}

fn default_generator_paths() -> Vec<String> {
    CommandType::Generator.default_lookup_paths()
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self { command: default_command_paths(), generator: default_generator_paths() }
    }
}

/// On-disk configuration. Every field is optional so files can be layered.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ConfigFile {
    /// Executable name used in banners and guidance.
    #[serde(default)]
    pub executable: Option<String>,

    /// Reserved top-level namespace.
    #[serde(default)]
    pub reserved_namespace: Option<String>,

    /// Command type to dispatch.
    #[serde(default)]
    pub command_type: Option<CommandType>,

    /// Load-path roots, appended to earlier layers.
    #[serde(default)]
    pub load_path: Vec<PathBuf>,

    /// Number of suggestions on a miss.
    #[serde(default)]
    pub suggestions: Option<usize>,

    /// Namespaces hidden from listings, appended to earlier layers.
    #[serde(default)]
    pub hidden_namespaces: Vec<String>,

    /// Help trigger tokens.
    #[serde(default)]
    pub help_tokens: Option<Vec<String>>,

    /// Entries always dropped from the reserved group listing.
    #[serde(default)]
    pub reserved_exclusions: Option<Vec<String>>,

    /// Lookup bases.
    #[serde(default)]
    pub lookup: Option<LookupConfig>,
}

impl ConfigFile {
    /// Load configuration from a TOML file.
    pub fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ConfigError::NotFound(path.display().to_string()));
            }
            Err(e) => return Err(ConfigError::ReadError(format!("{}: {}", path.display(), e))),
        };

        toml::from_str(&content)
            .map_err(|e| ConfigError::ParseError(format!("{}: {}", path.display(), e)))
    }
}

/// Resolved dispatch configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchConfig {
    /// Executable name used in banners and guidance.
    pub executable: String,

    /// Reserved top-level namespace tried as a fallback prefix.
    pub reserved_namespace: String,

    /// Command type to dispatch.
    pub command_type: CommandType,

    /// Load-path roots searched for module files.
    pub load_path: Vec<PathBuf>,

    /// Number of suggestions on a miss.
    pub suggestions: usize,

    /// Initially hidden namespaces.
    pub hidden_namespaces: Vec<String>,

    /// First-argument tokens that turn a call into a help request.
    pub help_tokens: Vec<String>,

    /// Entries always dropped from the reserved group listing.
    pub reserved_exclusions: Vec<String>,

    /// Lookup bases per command type.
    pub lookup: LookupConfig,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            executable: "rails".to_string(),
            reserved_namespace: "rails".to_string(),
            command_type: CommandType::Command,
            load_path: Vec::new(),
            suggestions: 3,
            hidden_namespaces: vec!["rails".to_string()],
            help_tokens: ["-h", "-?", "--help", "-D"].iter().map(|s| (*s).to_string()).collect(),
            reserved_exclusions: ["app", "plugin", "help"]
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            lookup: LookupConfig::default(),
        }
    }
}

impl DispatchConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get default global configuration file path.
    pub fn default_global_path() -> PathBuf {
        dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")).join(".railcar").join("config.toml")
    }

    /// Get default local configuration file path.
    pub fn default_local_path() -> PathBuf {
        PathBuf::from(".railcarrc")
    }

    /// Discover and load configuration files, then apply the environment.
    ///
    /// Missing files are skipped. Unparseable files are logged and skipped.
    pub fn discover_and_load() -> Self {
        let mut config = Self::default();

        for path in [Self::default_global_path(), Self::default_local_path()] {
            match ConfigFile::load_from_file(&path) {
                Ok(file) => config.merge(&file),
                Err(ConfigError::NotFound(_)) => {}
                Err(e) => tracing::warn!(error = %e, "ignoring configuration file"),
            }
        }

        config.apply_env();
        config
    }

    /// Merge a configuration file into this one.
    ///
    /// Scalar values override when set; `load_path` and `hidden_namespaces`
    /// are appended.
    pub fn merge(&mut self, other: &ConfigFile) {
        if let Some(ref executable) = other.executable {
            self.executable.clone_from(executable);
        }
        if let Some(ref reserved) = other.reserved_namespace {
            self.reserved_namespace.clone_from(reserved);
        }
        if let Some(command_type) = other.command_type {
            self.command_type = command_type;
        }
        self.load_path.extend(other.load_path.iter().cloned());
        if let Some(suggestions) = other.suggestions {
            self.suggestions = suggestions;
        }
        self.hidden_namespaces.extend(other.hidden_namespaces.iter().cloned());
        if let Some(ref tokens) = other.help_tokens {
            self.help_tokens.clone_from(tokens);
        }
        if let Some(ref exclusions) = other.reserved_exclusions {
            self.reserved_exclusions.clone_from(exclusions);
        }
        if let Some(ref lookup) = other.lookup {
            self.lookup = lookup.clone();
        }
    }

    /// Apply overrides from process environment variables.
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides through a custom variable lookup.
    pub fn apply_env_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(paths) = lookup(LOAD_PATH_ENV) {
            self.load_path.extend(std::env::split_paths(&paths).filter(|p| !p.as_os_str().is_empty()));
        }
        if let Some(executable) = lookup(EXECUTABLE_ENV).filter(|value| !value.is_empty()) {
            self.executable = executable;
        }
    }

    /// Lookup spec for the configured command type.
    pub fn lookup_spec(&self) -> LookupPathSpec {
        let paths = match self.command_type {
            CommandType::Command => self.lookup.command.clone(),
            CommandType::Generator => self.lookup.generator.clone(),
        };
        LookupPathSpec::new(self.command_type, paths)
    }
}

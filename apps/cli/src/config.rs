//! CLI configuration loading and merging.

use anyhow::Context;
use railcar_core::commands::CommandType;
use railcar_core::{ConfigFile, DispatchConfig};
use std::path::{Path, PathBuf};

/// Load and merge dispatch configuration.
///
/// Configuration precedence:
/// 1. CLI arguments (handled by clap, see [`apply_args`])
/// 2. File given with `--config`
/// 3. Environment variables
/// 4. Local config file (./.railcarrc)
/// 5. Global config file (~/.railcar/config.toml)
/// 6. Defaults
pub fn load_config(extra: Option<&Path>) -> anyhow::Result<DispatchConfig> {
    let mut config = DispatchConfig::discover_and_load();

    if let Some(path) = extra {
        let file = ConfigFile::load_from_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
        config.merge(&file);
    }

    Ok(config)
}

/// Apply command-line overrides.
///
/// Load paths given on the command line are searched before configured ones.
pub fn apply_args(config: &mut DispatchConfig, load_path: &[PathBuf], generator: bool) {
    if !load_path.is_empty() {
        let mut roots = load_path.to_vec();
        roots.append(&mut config.load_path);
        config.load_path = roots;
    }
    if generator {
        config.command_type = CommandType::Generator;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_load_paths_come_first() {
        let mut config =
            DispatchConfig { load_path: vec![PathBuf::from("lib")], ..DispatchConfig::default() };
        apply_args(&mut config, &[PathBuf::from("vendor")], false);

        assert_eq!(config.load_path, vec![PathBuf::from("vendor"), PathBuf::from("lib")]);
        assert_eq!(config.command_type, CommandType::Command);
    }

    #[test]
    fn test_generator_flag() {
        let mut config = DispatchConfig::default();
        apply_args(&mut config, &[], true);

        assert_eq!(config.command_type, CommandType::Generator);
        assert!(config.load_path.is_empty());
    }
}

//! Config command - show and initialize the configuration file.

use std::path::Path;

use anyhow::{Context, Result, bail};
use tracing::warn;

use crate::cli::ConfigAction;
use crate::config::Config;

/// Execute a config subcommand against the file at `path`.
pub fn cmd_config(action: ConfigAction, config: &Config, path: &Path) -> Result<()> {
    match action {
        ConfigAction::Show => {
            if let Err(e) = config.validate() {
                warn!("{}", e);
            }
            let content = toml::to_string_pretty(config).context("Failed to serialize config")?;
            if content.trim().is_empty() {
                println!("# {} (defaults)", path.display());
            } else {
                println!("# {}\n{}", path.display(), content);
            }
        }
        ConfigAction::Path => {
            println!("{}", path.display());
        }
        ConfigAction::Init => {
            init_config(path)?;
            println!("Created {}", path.display());
        }
    }
    Ok(())
}

/// Write a default configuration file, refusing to overwrite one.
pub fn init_config(path: &Path) -> Result<()> {
    if path.exists() {
        bail!("Config file already exists: {}", path.display());
    }
    Config::default()
        .save(path)
        .with_context(|| format!("Failed to initialize {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_config_creates_loadable_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ruuvi").join("config.toml");

        init_config(&path).unwrap();
        assert_eq!(Config::load(&path).unwrap(), Config::default());
    }

    #[test]
    fn test_init_config_refuses_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[tags.aliases]\naabbccdd = \"Sauna\"\n").unwrap();

        let err = init_config(&path).unwrap_err();
        assert!(err.to_string().contains("already exists"));
        assert!(std::fs::read_to_string(&path).unwrap().contains("Sauna"));
    }
}

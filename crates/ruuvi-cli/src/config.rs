//! Configuration file management.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use ruuvi_types::{DeviceIdentity, normalize_address, short_id};
use serde::{Deserialize, Serialize};

/// Configuration file structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Cache file settings.
    pub cache: CacheConfig,
    /// Known tags.
    pub tags: TagsConfig,
}

/// Cache file settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Cache file path. Relative paths resolve against the working directory.
    pub path: Option<PathBuf>,
}

/// Known tags.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TagsConfig {
    /// Friendly names, keyed by device address or short id.
    ///
    /// ```toml
    /// [tags.aliases]
    /// "AA:BB:CC:DD:EE:01" = "Sauna"
    /// c8cfe694 = "Fridge"
    /// ```
    pub aliases: BTreeMap<String, String>,
}

impl Config {
    /// Load configuration from `path`, or the defaults if it does not exist.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Read {
            path: path.as_ref().to_path_buf(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.as_ref().to_path_buf(),
            source: e,
        })
    }

    /// Save configuration to a file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self).map_err(ConfigError::Serialize)?;

        if let Some(parent) = path.as_ref().parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Write {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        std::fs::write(path.as_ref(), content).map_err(|e| ConfigError::Write {
            path: path.as_ref().to_path_buf(),
            source: e,
        })
    }

    /// Validate the configuration and return any errors.
    ///
    /// This checks:
    /// - The cache path, when set, is not empty
    /// - Alias keys contain at least one address character
    /// - Alias names are not blank
    /// - No two alias keys normalize to the same device
    ///
    /// # Example
    ///
    /// ```
    /// use ruuvi_cli::config::Config;
    ///
    /// let config = Config::default();
    /// config.validate().expect("Default config should be valid");
    /// ```
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if let Some(path) = &self.cache.path
            && path.as_os_str().is_empty()
        {
            errors.push(ValidationError {
                field: "cache.path".to_string(),
                message: "cache path cannot be empty".to_string(),
            });
        }

        let mut seen = BTreeMap::new();
        for (key, alias) in &self.tags.aliases {
            let field = format!("tags.aliases.\"{}\"", key);
            let normalized = normalize_address(key);
            if normalized.key().is_empty() {
                errors.push(ValidationError {
                    field,
                    message: format!("'{}' contains no address characters", key),
                });
                continue;
            }
            if alias.trim().is_empty() {
                errors.push(ValidationError {
                    field: field.clone(),
                    message: "alias cannot be empty".to_string(),
                });
            }
            if let Some(previous) = seen.insert(normalized.key().to_string(), key) {
                errors.push(ValidationError {
                    field,
                    message: format!("duplicate of alias key '{}'", previous),
                });
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Cache file to use: an explicit path wins over the configured one.
    pub fn cache_path(&self, explicit: Option<&Path>) -> PathBuf {
        explicit
            .map(Path::to_path_buf)
            .or_else(|| self.cache.path.clone())
            .unwrap_or_else(ruuvi_store::default_cache_path)
    }

    /// Alias configured for a device.
    ///
    /// An alias keyed by the full address takes precedence over one keyed
    /// by the short id.
    pub fn alias_for(&self, identity: &DeviceIdentity) -> Option<&str> {
        let lookup = |wanted: &str| {
            self.tags
                .aliases
                .iter()
                .find(|(key, _)| normalize_address(key).key() == wanted)
                .map(|(_, alias)| alias.as_str())
        };
        lookup(identity.key()).or_else(|| lookup(identity.short_id()))
    }

    /// Short ids of all configured tags, sorted and deduplicated.
    pub fn allowed_tags(&self) -> Vec<String> {
        self.tags
            .aliases
            .keys()
            .map(|key| short_id(normalize_address(key).key()).to_string())
            .filter(|id| !id.is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

/// Default configuration file path.
///
/// - Linux: `~/.config/ruuvi/config.toml`
/// - macOS: `~/Library/Application Support/ruuvi/config.toml`
/// - Windows: `C:\Users\<user>\AppData\Roaming\ruuvi\config.toml`
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ruuvi")
        .join("config.toml")
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Failed to serialize config: {0}")]
    Serialize(toml::ser::Error),
    #[error("Failed to write config file {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    Validation(Vec<ValidationError>),
}

/// A single validation error with context.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// The field path (e.g., `cache.path` or `tags.aliases."aabbccdd"`).
    pub field: String,
    /// Description of the validation failure.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| format!("  - {}", e))
        .collect::<Vec<_>>()
        .join("\n")
}

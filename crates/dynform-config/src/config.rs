//! Configuration types and loading for the dynform system.
//!
//! The main entry point is [`DynformConfig`], loaded with [`load_config`].
//! Values are layered: built-in defaults, then the YAML file, then
//! `DYNFORM_` environment variables (nested keys joined with `__`, e.g.
//! `DYNFORM_LOG__LEVEL=debug`).

use std::path::{Path, PathBuf};

use chrono::format::{Item, StrftimeItems};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An explicitly requested config file does not exist.
    #[error("config file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The layered sources could not be merged into a [`DynformConfig`].
    #[error("failed to load config: {0}")]
    Extract(#[from] Box<figment::Error>),

    /// A configuration value was invalid.
    #[error("invalid configuration value for key '{key}': {reason}")]
    InvalidValue {
        /// The configuration key that had an invalid value.
        key: String,
        /// A description of why the value is invalid.
        reason: String,
    },
}

/// A specialized `Result` type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Environment variable prefix for overrides.
const ENV_PREFIX: &str = "DYNFORM_";

/// Level names accepted by `log.level`.
const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "off"];

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// Logging configuration section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Default level for the `dynform` crates. `RUST_LOG` takes precedence.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

/// Output configuration section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// chrono format string used to print date values in text output.
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Print JSON instead of human-readable text.
    #[serde(default)]
    pub json: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            date_format: default_date_format(),
            json: false,
        }
    }
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

// ---------------------------------------------------------------------------
// Main config struct
// ---------------------------------------------------------------------------

/// The full dynform configuration.
///
/// All fields use `serde` defaults so a partial file deserializes with
/// sensible values for everything it leaves out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DynformConfig {
    /// Field catalog to load. Relative paths resolve against the directory
    /// of the config file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog: Option<PathBuf>,

    #[serde(default)]
    pub log: LogConfig,

    #[serde(default)]
    pub output: OutputConfig,

    /// The file this configuration was read from, if any.
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

impl DynformConfig {
    /// The configured catalog path, resolved against the config file's
    /// directory when relative.
    pub fn catalog_path(&self) -> Option<PathBuf> {
        let catalog = self.catalog.as_ref()?;
        if catalog.is_absolute() {
            return Some(catalog.clone());
        }
        let base = self
            .source
            .as_deref()
            .and_then(Path::parent)
            .unwrap_or_else(|| Path::new(""));
        Some(base.join(catalog))
    }

    /// Check values serde cannot check on its own.
    pub fn validate(&self) -> Result<()> {
        let level = self.log.level.to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::InvalidValue {
                key: "log.level".to_string(),
                reason: format!("expected one of {}", LOG_LEVELS.join(", ")),
            });
        }
        let bad_format = self.output.date_format.is_empty()
            || StrftimeItems::new(&self.output.date_format).any(|item| matches!(item, Item::Error));
        if bad_format {
            return Err(ConfigError::InvalidValue {
                key: "output.date_format".to_string(),
                reason: format!("'{}' is not a valid date format", self.output.date_format),
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Load
// ---------------------------------------------------------------------------

/// Load configuration from `path` (if given) layered over defaults, with
/// `DYNFORM_` environment overrides on top.
///
/// # Errors
///
/// Returns [`ConfigError::NotFound`] if `path` is given but missing,
/// [`ConfigError::Extract`] if a source is malformed, and
/// [`ConfigError::InvalidValue`] if a value fails [`DynformConfig::validate`].
pub fn load_config(path: Option<&Path>) -> Result<DynformConfig> {
    let mut figment = Figment::from(Serialized::defaults(DynformConfig::default()));
    if let Some(path) = path {
        if !path.is_file() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        figment = figment.merge(Yaml::file(path));
    }
    figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

    let mut config: DynformConfig = figment.extract().map_err(Box::new)?;
    config.source = path.map(Path::to_path_buf);
    config.validate()?;
    Ok(config)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

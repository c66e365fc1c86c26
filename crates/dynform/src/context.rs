//! Runtime context for command execution.
//!
//! The [`RuntimeContext`] holds what a command handler needs: the loaded
//! configuration, global flags, and catalog resolution.

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

use dynform_config::config::{load_config, DynformConfig};
use dynform_config::project_dir::discover_config;
use dynform_core::catalog::{find_catalog, load_catalog, parse_json, Catalog};

use crate::cli::GlobalArgs;

/// Catalog shipped with the binary, used when nothing else is configured.
const BUNDLED_CATALOG: &str = include_str!("../data/fields.json");

/// Runtime context passed to every command handler.
///
/// Constructed once in `main` after CLI parsing, before command dispatch.
#[derive(Debug)]
pub struct RuntimeContext {
    /// Loaded configuration (defaults if no file was found).
    pub config: DynformConfig,

    /// Catalog name or path given on the command line.
    pub catalog: Option<String>,

    /// Whether to produce JSON output.
    pub json: bool,

    /// Verbose output.
    pub verbose: bool,

    /// Directory catalog names are resolved against.
    pub cwd: PathBuf,
}

impl RuntimeContext {
    /// Build a `RuntimeContext` from parsed global arguments.
    ///
    /// Config file priority: `--config` > `DYNFORM_CONFIG` > discovered
    /// `.dynform/config.yaml` > built-in defaults.
    pub fn from_global_args(global: &GlobalArgs) -> Result<Self> {
        let cwd = env::current_dir().context("failed to read current directory")?;
        let config_path = global.config.clone().or_else(|| discover_config(&cwd));
        let config = load_config(config_path.as_deref()).context("failed to load configuration")?;

        Ok(Self {
            json: global.json || config.output.json,
            verbose: global.verbose,
            catalog: global.catalog.clone(),
            config,
            cwd,
        })
    }

    /// Load the catalog: `--catalog` > config `catalog` > bundled catalog.
    pub fn load_catalog(&self) -> Result<Catalog> {
        if let Some(ref name) = self.catalog {
            let path = find_catalog(name, &self.cwd)?;
            return load_catalog(&path)
                .with_context(|| format!("failed to load catalog {}", path.display()));
        }
        if let Some(path) = self.config.catalog_path() {
            let path = self.cwd.join(path);
            return load_catalog(&path)
                .with_context(|| format!("failed to load catalog {}", path.display()));
        }
        let mut catalog = parse_json(BUNDLED_CATALOG).context("bundled catalog is invalid")?;
        catalog.source = "<bundled>".to_string();
        Ok(catalog)
    }

    /// chrono format for dates in text output.
    pub fn date_format(&self) -> &str {
        &self.config.output.date_format
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_catalog_parses() {
        let catalog = parse_json(BUNDLED_CATALOG).unwrap();
        assert!(catalog.get("ageGroup").is_some());
        assert!(catalog.get("startDate").is_some());
        assert!(catalog.get("endDate").is_some());
    }
}

//! Runtime configuration
//!
//! Settings come from an optional TOML file, normally
//! `<config_dir>/promptdeck/config.toml`:
//!
//! ```toml
//! store_path = "/home/me/prompts/templates.json"
//! seed_defaults = false
//! ```
//!
//! The store path can be overridden by the `PROMPTDECK_STORE` environment variable and
//! by the `--store` flag, in increasing order of precedence.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::core::error::{Error, Result};

pub const APP_DIR: &str = "promptdeck";
pub const CONFIG_FILE: &str = "config.toml";
pub const STORE_FILE: &str = "templates.json";
pub const STORE_ENV: &str = "PROMPTDECK_STORE";

/// Resolved configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Where the template snapshot is kept
    pub store_path: PathBuf,
    /// Seed the bundled defaults when no snapshot exists yet
    pub seed_defaults: bool,
}

/// Contents of `config.toml`; every key is optional
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    store_path: Option<PathBuf>,
    seed_defaults: Option<bool>,
}

/// Inputs to [`Config::resolve`], gathered by the caller
#[derive(Debug, Default, Clone)]
pub struct ConfigSources {
    /// Explicit config file; when `None` the default location is tried
    pub config_file: Option<PathBuf>,
    /// Value of the `PROMPTDECK_STORE` environment variable
    pub env_store: Option<PathBuf>,
    /// Value of the `--store` flag
    pub cli_store: Option<PathBuf>,
}

impl Config {
    pub fn resolve(sources: ConfigSources) -> Result<Self> {
        let file = match &sources.config_file {
            Some(path) => read_config_file(path, true)?,
            None => match default_config_path() {
                Some(path) => read_config_file(&path, false)?,
                None => ConfigFile::default(),
            },
        };

        let store_path = sources
            .cli_store
            .or(sources.env_store)
            .or(file.store_path)
            .or_else(default_store_path)
            .ok_or_else(|| {
                Error::config("no data directory available; pass --store or set PROMPTDECK_STORE")
            })?;

        let config = Self {
            store_path,
            seed_defaults: file.seed_defaults.unwrap_or(true),
        };
        debug!(store = %config.store_path.display(), seed_defaults = config.seed_defaults, "Resolved configuration");
        Ok(config)
    }
}

/// `<config_dir>/promptdeck/config.toml`, if the platform has a config directory
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
}

/// `<data_dir>/promptdeck/templates.json`, if the platform has a data directory
pub fn default_store_path() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join(APP_DIR).join(STORE_FILE))
}

fn read_config_file(path: &Path, required: bool) -> Result<ConfigFile> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == io::ErrorKind::NotFound && !required => {
            return Ok(ConfigFile::default());
        }
        Err(e) => {
            return Err(Error::config(format!(
                "cannot read {}: {e}",
                path.display()
            )));
        }
    };

    toml::from_str(&raw).map_err(|e| Error::config(format!("invalid {}: {e}", path.display())))
}

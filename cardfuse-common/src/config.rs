//! Configuration loading and root folder resolution
//!
//! Bootstrap settings come from a small TOML file. Every setting has a
//! built-in default, so a missing file is never fatal.
//!
//! # Root folder priority
//! 1. Command-line argument (highest priority)
//! 2. Environment variable (`CARDFUSE_ROOT_FOLDER`)
//! 3. TOML config file (`root_folder`)
//! 4. Current working directory (fallback)

use crate::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable consulted for the root folder
pub const ROOT_FOLDER_ENV: &str = "CARDFUSE_ROOT_FOLDER";

/// Bootstrap configuration shared by all cardfuse tools
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    /// Folder holding the source files (optional)
    #[serde(default)]
    pub root_folder: Option<PathBuf>,

    /// Folder receiving the generated artifacts (defaults to the root folder)
    #[serde(default)]
    pub output_folder: Option<PathBuf>,

    /// Downstream locations that receive a copy of the published artifact
    #[serde(default)]
    pub publish_targets: Vec<PathBuf>,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Root folder resolver
///
/// Applies the priority order documented at module level. The TOML value is
/// supplied by the caller so the resolver never touches the filesystem.
#[derive(Debug, Clone)]
pub struct RootFolderResolver {
    env_var_name: String,
}

impl RootFolderResolver {
    pub fn new() -> Self {
        Self {
            env_var_name: ROOT_FOLDER_ENV.to_string(),
        }
    }

    /// Use a different environment variable (tests, embedding tools)
    pub fn with_env_var(env_var_name: impl Into<String>) -> Self {
        Self {
            env_var_name: env_var_name.into(),
        }
    }

    pub fn resolve(&self, cli_arg: Option<&Path>, toml_config: &TomlConfig) -> PathBuf {
        // Priority 1: Command-line argument
        if let Some(path) = cli_arg {
            debug!(path = %path.display(), "Root folder from command line");
            return path.to_path_buf();
        }

        // Priority 2: Environment variable
        if let Ok(path) = std::env::var(&self.env_var_name) {
            if !path.trim().is_empty() {
                debug!(path = %path, env = %self.env_var_name, "Root folder from environment");
                return PathBuf::from(path);
            }
        }

        // Priority 3: TOML config file
        if let Some(path) = &toml_config.root_folder {
            debug!(path = %path.display(), "Root folder from TOML config");
            return path.clone();
        }

        // Priority 4: current directory
        PathBuf::from(".")
    }
}

impl Default for RootFolderResolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Default configuration file path for the platform
///
/// `<config_dir>/cardfuse/config.toml`, e.g. `~/.config/cardfuse/config.toml` on Linux.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("cardfuse").join("config.toml"))
}

/// Read a TOML file into any deserializable config type
///
/// Returns `Ok(None)` when the file does not exist; an unreadable or
/// malformed file is an error.
pub fn load_toml_file<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    if !path.exists() {
        info!("No config file at {}, using defaults", path.display());
        return Ok(None);
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
    let config = toml::from_str(&content)?;
    info!("Loaded config from {}", path.display());
    Ok(Some(config))
}

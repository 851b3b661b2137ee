//! Configuration file loading
//!
//! The floradex-id service reads an optional TOML config file from the
//! platform config directory. Environment variables take priority over the
//! file; resolution order is applied by the service, this module only finds
//! and parses the file.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Optional user configuration, read from `floradex-id.toml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Pl@ntNet API key (lower priority than the PLANTNET_API_KEY env var)
    pub plantnet_api_key: Option<String>,
}

/// Default configuration file path for the platform
///
/// Linux prefers `~/.config/floradex/floradex-id.toml`, then falls back to
/// `/etc/floradex/floradex-id.toml`. macOS and Windows use the platform
/// config directory reported by `dirs`.
pub fn config_file_path() -> Option<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("floradex").join("floradex-id.toml"));

    if cfg!(target_os = "linux") {
        if let Some(path) = &user_config {
            if path.exists() {
                return user_config;
            }
        }
        let system_config = PathBuf::from("/etc/floradex/floradex-id.toml");
        if system_config.exists() {
            return Some(system_config);
        }
        return user_config;
    }

    user_config
}

/// Load configuration from a specific path
///
/// A missing file is not an error (all fields are optional); an unreadable
/// or unparseable file is.
pub fn load_config_from(path: &Path) -> Result<TomlConfig> {
    if !path.exists() {
        return Ok(TomlConfig::default());
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))
}

/// Load configuration from the default platform path
pub fn load_config() -> Result<TomlConfig> {
    match config_file_path() {
        Some(path) => load_config_from(&path),
        None => Ok(TomlConfig::default()),
    }
}

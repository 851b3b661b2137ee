//! Configuration resolution for floradex-id
//!
//! The only required secret is the Pl@ntNet API key, resolved with
//! ENV → TOML priority.

use floradex_common::config::TomlConfig;
use floradex_common::{Error, Result};
use tracing::{info, warn};

/// Environment variable holding the Pl@ntNet API key
pub const API_KEY_ENV_VAR: &str = "PLANTNET_API_KEY";

/// Resolve the Pl@ntNet API key
///
/// **Priority:** environment variable → TOML config file.
pub fn resolve_plantnet_api_key(toml_config: &TomlConfig) -> Result<String> {
    let mut sources = Vec::new();

    let env_key = std::env::var(API_KEY_ENV_VAR).ok();
    if let Some(key) = &env_key {
        if is_valid_key(key) {
            sources.push("environment");
        }
    }

    let toml_key = toml_config.plantnet_api_key.as_ref();
    if let Some(key) = toml_key {
        if is_valid_key(key) {
            sources.push("TOML");
        }
    }

    // Warn if multiple sources (potential misconfiguration)
    if sources.len() > 1 {
        warn!(
            "Pl@ntNet API key found in multiple sources: {}. Using environment (highest priority).",
            sources.join(", ")
        );
    }

    if let Some(key) = env_key {
        if is_valid_key(&key) {
            info!("Pl@ntNet API key loaded from environment variable");
            return Ok(key.trim().to_string());
        }
    }

    if let Some(key) = toml_key {
        if is_valid_key(key) {
            info!("Pl@ntNet API key loaded from TOML config");
            return Ok(key.trim().to_string());
        }
    }

    Err(Error::Config(format!(
        "Pl@ntNet API key not configured. Please configure using one of:\n\
         1. Environment: {}=your-key-here\n\
         2. TOML config: ~/.config/floradex/floradex-id.toml (plantnet_api_key = \"your-key\")\n\
         \n\
         Obtain API key at: https://my.plantnet.org/",
        API_KEY_ENV_VAR
    )))
}

/// Validate API key (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}

//! Configuration file loading
//!
//! Service settings (bind address, database path) come from the command
//! line and environment via clap in the service binary. This module covers
//! the optional TOML tier used as a fallback for catalog credentials and
//! CORS origins.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Optional TOML configuration (`~/.config/sweatlist/sweatlist.toml`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Catalog client id (fallback tier; SPOTIFY_CLIENT_ID wins)
    pub spotify_client_id: Option<String>,
    /// Catalog client secret (fallback tier; SPOTIFY_CLIENT_SECRET wins)
    pub spotify_client_secret: Option<String>,
    /// Extra allowed CORS origin for the frontend
    pub cors_origin: Option<String>,
}

/// Default configuration file path for the platform
pub fn config_file_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("sweatlist").join("sweatlist.toml"))
}

/// Load the TOML config tier. A missing file is not an error: defaults
/// (all `None`) are returned so the ENV tier alone can configure the
/// service.
pub fn load_toml_config(path: Option<&Path>) -> Result<TomlConfig> {
    let path = match path.map(PathBuf::from).or_else(config_file_path) {
        Some(p) => p,
        None => return Ok(TomlConfig::default()),
    };

    if !path.exists() {
        return Ok(TomlConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))
}

//! Catalog credential resolution
//!
//! Priority: environment variables over the TOML config file. Missing
//! credentials degrade the catalog endpoints (503) instead of aborting
//! startup; storage configuration, by contrast, is fatal in `main`.

use sweatlist_common::config::TomlConfig;
use tracing::{error, info, warn};

use crate::services::catalog::CatalogConfig;

pub const CLIENT_ID_ENV: &str = "SPOTIFY_CLIENT_ID";
pub const CLIENT_SECRET_ENV: &str = "SPOTIFY_CLIENT_SECRET";

/// Resolve the catalog configuration from ENV then TOML.
pub fn resolve_catalog_config(toml_config: &TomlConfig) -> CatalogConfig {
    let client_id = resolve_value(
        CLIENT_ID_ENV,
        toml_config.spotify_client_id.as_deref(),
        "client id",
    );
    let client_secret = resolve_value(
        CLIENT_SECRET_ENV,
        toml_config.spotify_client_secret.as_deref(),
        "client secret",
    );

    if client_id.is_none() || client_secret.is_none() {
        error!(
            "{} or {} not configured; catalog search will be unavailable",
            CLIENT_ID_ENV, CLIENT_SECRET_ENV
        );
    }

    CatalogConfig {
        client_id,
        client_secret,
        ..CatalogConfig::default()
    }
}

fn resolve_value(env_name: &str, toml_value: Option<&str>, what: &str) -> Option<String> {
    let env_value = std::env::var(env_name).ok().filter(|v| is_valid_value(v));
    let toml_value = toml_value.filter(|v| is_valid_value(v));

    if env_value.is_some() && toml_value.is_some() {
        warn!(
            "Catalog {} found in both environment and TOML config. Using environment (highest priority).",
            what
        );
    }

    if let Some(value) = env_value {
        info!("Catalog {} loaded from environment variable", what);
        return Some(value);
    }

    if let Some(value) = toml_value {
        info!("Catalog {} loaded from TOML config", what);
        return Some(value.to_string());
    }

    None
}

/// Validate a credential value (non-empty, non-whitespace)
fn is_valid_value(value: &str) -> bool {
    !value.trim().is_empty()
}

//! Application configuration for avsearch.
//!
//! User config lives at `~/.avsearch/avsearch.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AvSearchError, Result};
use crate::types::SortOrder;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "avsearch.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".avsearch";

/// Annotation id of the collection every query is restricted to.
pub const DEFAULT_COLLECTION_ID: &str = "89d15f70-640d-11e4-9803-0800200c9a66";

// ---------------------------------------------------------------------------
// Config structs (matching avsearch.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Search backend settings.
    #[serde(default)]
    pub search: SearchConfig,

    /// Per-variant enrichment options.
    #[serde(default)]
    pub enrichment: EnrichmentConfig,
}

/// `[search]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Base URL of the Elasticsearch cluster.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Index holding the content documents.
    #[serde(default = "default_index")]
    pub index: String,

    /// HTTP timeout for backend requests.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Annotation id used by the mandatory base filter.
    #[serde(default = "default_collection_id")]
    pub collection_id: String,

    /// Name of the env var holding the backend API key (never store the key itself).
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            index: default_index(),
            timeout_secs: default_timeout_secs(),
            collection_id: default_collection_id(),
            api_key_env: default_api_key_env(),
        }
    }
}

fn default_endpoint() -> String {
    "http://localhost:9200".into()
}
fn default_index() -> String {
    "content".into()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_collection_id() -> String {
    DEFAULT_COLLECTION_ID.into()
}
fn default_api_key_env() -> String {
    "AVSEARCH_ES_API_KEY".into()
}

/// `[enrichment]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichmentConfig {
    /// Series size requested for each search result.
    #[serde(default = "default_list_series_size")]
    pub list_series_size: usize,

    /// Series ordering for lookups by uuid.
    #[serde(default = "default_uuid_series_order")]
    pub uuid_series_order: SortOrder,

    /// Series ordering for lookups by url.
    #[serde(default = "default_url_series_order")]
    pub url_series_order: SortOrder,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            list_series_size: default_list_series_size(),
            uuid_series_order: default_uuid_series_order(),
            url_series_order: default_url_series_order(),
        }
    }
}

fn default_list_series_size() -> usize {
    20
}
fn default_uuid_series_order() -> SortOrder {
    SortOrder::Asc
}
fn default_url_series_order() -> SortOrder {
    SortOrder::Desc
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.avsearch/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| AvSearchError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.avsearch/avsearch.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| AvSearchError::io(path, e))?;

    toml::from_str(&content).map_err(|e| {
        AvSearchError::config(format!("failed to parse {}: {e}", path.display()))
    })
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| AvSearchError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| AvSearchError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| AvSearchError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

/// Read the backend API key from the env var named in the config.
/// An unset or empty variable means the backend is used without auth.
pub fn resolve_api_key(config: &AppConfig) -> Option<String> {
    match std::env::var(&config.search.api_key_env) {
        Ok(val) if !val.is_empty() => Some(val),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("collection_id"));
        assert!(toml_str.contains("AVSEARCH_ES_API_KEY"));
        assert!(toml_str.contains(r#"uuid_series_order = "asc""#));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.search.index, "content");
        assert_eq!(parsed.search.collection_id, DEFAULT_COLLECTION_ID);
        assert_eq!(parsed.enrichment.list_series_size, 20);
        assert_eq!(parsed.enrichment.url_series_order, SortOrder::Desc);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let toml_str = r#"
[search]
endpoint = "https://es.internal:9243"

[enrichment]
uuid_series_order = "desc"
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.search.endpoint, "https://es.internal:9243");
        assert_eq!(config.search.timeout_secs, 30);
        assert_eq!(config.enrichment.uuid_series_order, SortOrder::Desc);
        assert_eq!(config.enrichment.list_series_size, 20);
    }

    #[test]
    fn api_key_absent_when_env_unset() {
        let mut config = AppConfig::default();
        // Use a unique env var name to avoid interfering with other tests
        config.search.api_key_env = "AVSEARCH_TEST_NONEXISTENT_KEY_12345".into();
        assert!(resolve_api_key(&config).is_none());
    }
}

//! Shared types, error model, and configuration for avsearch.
//!
//! This crate is the foundation depended on by all other avsearch crates.
//! It provides:
//! - [`AvSearchError`]: the unified error type
//! - Domain types ([`Document`], [`Patch`], [`SearchRequest`], [`SearchResults`])
//! - Configuration ([`AppConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, DEFAULT_COLLECTION_ID, EnrichmentConfig, SearchConfig, config_dir,
    config_file_path, init_config, load_config, load_config_from, resolve_api_key,
};
pub use error::{AvSearchError, Result};
pub use types::{
    Document, EnrichOptions, Patch, SearchHits, SearchRequest, SearchResults, SortOrder,
};

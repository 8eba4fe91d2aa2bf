//! Search index access for avsearch.
//!
//! This crate provides:
//! - [`QueryAdapter`]: wraps caller queries in the mandatory collection/type filter
//! - [`SearchBackend`]: the index contract (`search` + point `get`)
//! - [`ElasticBackend`]: an Elasticsearch HTTP implementation
//! - [`encode_non_ascii`]: URL normalization for `webUrl` wildcard lookups

mod backend;
mod elastic;
mod query;
mod url_match;

pub use backend::SearchBackend;
pub use elastic::{ElasticBackend, ElasticOptions};
pub use query::QueryAdapter;
pub use url_match::encode_non_ascii;

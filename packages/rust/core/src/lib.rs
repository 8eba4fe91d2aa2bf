//! Article enrichment orchestration for avsearch.
//!
//! This crate ties the search backend and the enrichers together:
//! - [`pipeline`]: per-document orchestration and the batch runner
//! - [`articles`]: the public lookups (`search_articles`, by uuid, by url)

pub mod articles;
pub mod pipeline;

pub use articles::{ArticleService, ServiceOptions};
pub use pipeline::{Pipeline, PipelineBuilder};

#[cfg(test)]
pub(crate) mod test_support;

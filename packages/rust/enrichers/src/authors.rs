//! Author list derivation.

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use serde_json::{Value, json};

use avsearch_shared::{Document, EnrichOptions, Patch, Result};

use crate::Enricher;
use crate::annotations::{HAS_AUTHOR, annotations};

/// Sets `authors` from author annotations, or from the free-text `byline`
/// when the document has none.
pub struct AuthorsEnricher;

#[async_trait]
impl Enricher for AuthorsEnricher {
    fn name(&self) -> &'static str {
        "authors"
    }

    async fn enrich(&self, doc: &Document, _opts: &EnrichOptions) -> Result<Patch> {
        let annotated: Vec<Value> = annotations(doc)
            .iter()
            .filter(|a| a.has_predicate(HAS_AUTHOR))
            .map(|a| {
                json!({
                    "id": a.id,
                    "name": a.pref_label,
                    "url": a.stream_url(),
                })
            })
            .collect();

        let authors = if annotated.is_empty() {
            byline_authors(doc.str_field("byline").unwrap_or_default())
        } else {
            annotated
        };

        Ok(Patch::new().with("authors", authors))
    }
}

/// Split a byline like "By A and B, C" into `{name}` entries.
fn byline_authors(byline: &str) -> Vec<Value> {
    static BY_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(?i)^\s*by\s+").expect("valid regex"));
    static SEP_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(?i)\s*(?:,|&|\band\b)\s*").expect("valid regex"));

    let byline = BY_RE.replace(byline, "");
    SEP_RE
        .split(&byline)
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(|name| json!({ "name": name }))
        .collect()
}

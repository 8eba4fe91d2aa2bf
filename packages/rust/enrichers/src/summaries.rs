//! Summary text.

use std::sync::LazyLock;

use async_trait::async_trait;
use scraper::{Html, Selector};
use serde_json::Value;

use avsearch_shared::{Document, EnrichOptions, Patch, Result};

use crate::Enricher;
use crate::text::{collapse_whitespace, truncate_words};

/// Longest summary derived from body text.
const MAX_SUMMARY_CHARS: usize = 300;

/// Sets `summaries`: stored summaries if any, else the standfirst, else the
/// first paragraph of `bodyHTML`.
///
/// Last step of the body chain, so it sees the fully processed body.
pub struct SummariesEnricher;

#[async_trait]
impl Enricher for SummariesEnricher {
    fn name(&self) -> &'static str {
        "summaries"
    }

    async fn enrich(&self, doc: &Document, _opts: &EnrichOptions) -> Result<Patch> {
        let stored: Vec<Value> = doc
            .array_field("summaries")
            .iter()
            .filter(|s| s.as_str().is_some_and(|s| !s.trim().is_empty()))
            .cloned()
            .collect();

        let summaries = if !stored.is_empty() {
            stored
        } else if let Some(standfirst) = doc
            .str_field("standfirst")
            .map(collapse_whitespace)
            .filter(|s| !s.is_empty())
        {
            vec![Value::from(standfirst)]
        } else {
            first_paragraph(doc.str_field("bodyHTML").unwrap_or_default())
                .map(|p| vec![Value::from(truncate_words(&p, MAX_SUMMARY_CHARS))])
                .unwrap_or_default()
        };

        Ok(Patch::new().with("summaries", summaries))
    }
}

/// Text of the first non-empty `<p>` in `html`.
fn first_paragraph(html: &str) -> Option<String> {
    static P_SEL: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("p").expect("valid selector"));

    let fragment = Html::parse_fragment(html);
    fragment
        .select(&P_SEL)
        .map(|p| collapse_whitespace(&p.text().collect::<String>()))
        .find(|text| !text.is_empty())
}

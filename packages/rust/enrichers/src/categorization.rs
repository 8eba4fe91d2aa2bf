//! Content categorization flags.

use async_trait::async_trait;

use avsearch_shared::{Document, EnrichOptions, Patch, Result};

use crate::Enricher;
use crate::annotations::annotations;
use crate::text::{collapse_whitespace, strip_tags};

/// Derives the `categorization` label and the `is*` flags.
///
/// A document can carry several flags; `categorization` is the first
/// matching label in the order video, marketslive, alphachat,
/// furtherreading, guestpost, falling back to `article`.
pub struct CategorizationEnricher;

#[async_trait]
impl Enricher for CategorizationEnricher {
    fn name(&self) -> &'static str {
        "categorization"
    }

    async fn enrich(&self, doc: &Document, _opts: &EnrichOptions) -> Result<Patch> {
        let anns = annotations(doc);
        let labelled = |label: &str| anns.iter().any(|a| a.is_labelled(label));

        let title = collapse_whitespace(&strip_tags(doc.str_field("title").unwrap_or_default()))
            .to_lowercase();
        let byline = doc.str_field("byline").unwrap_or_default().to_lowercase();

        let is_video = doc.str_field("type") == Some("video");
        let is_markets_live = title.starts_with("markets live") || labelled("Markets Live");
        let is_alphachat = title.starts_with("alphachat") || labelled("Alphachat");
        let is_further_reading = title.starts_with("further reading") || labelled("Further reading");
        let is_guest_post = title.starts_with("guest post") || byline.contains("guest post");

        let categorization = [
            (is_video, "video"),
            (is_markets_live, "marketslive"),
            (is_alphachat, "alphachat"),
            (is_further_reading, "furtherreading"),
            (is_guest_post, "guestpost"),
        ]
        .into_iter()
        .find_map(|(flag, label)| flag.then_some(label))
        .unwrap_or("article");

        Ok(Patch::new()
            .with("categorization", categorization)
            .with("isVideo", is_video)
            .with("isMarketsLive", is_markets_live)
            .with("isAlphachat", is_alphachat)
            .with("isFurtherReading", is_further_reading)
            .with("isGuestPost", is_guest_post))
    }
}

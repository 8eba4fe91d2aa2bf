//! Primary theme lookup.

use async_trait::async_trait;
use serde_json::Value;

use avsearch_shared::{Document, EnrichOptions, Patch, Result};

use crate::Enricher;
use crate::annotations::{PRIMARILY_CLASSIFIED_BY, annotations};

/// Sets `primaryTheme` to the concept the document is primarily classified
/// by, or `null`.
pub struct PrimaryThemeEnricher;

#[async_trait]
impl Enricher for PrimaryThemeEnricher {
    fn name(&self) -> &'static str {
        "primary_theme"
    }

    async fn enrich(&self, doc: &Document, _opts: &EnrichOptions) -> Result<Patch> {
        let theme = annotations(doc)
            .iter()
            .find(|a| a.has_predicate(PRIMARILY_CLASSIFIED_BY))
            .map(|a| a.to_concept())
            .unwrap_or(Value::Null);

        Ok(Patch::new().with("primaryTheme", theme))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{doc, fixture_article};
    use serde_json::json;

    #[tokio::test]
    async fn finds_primary_theme() {
        let patch = PrimaryThemeEnricher
            .enrich(&fixture_article(), &EnrichOptions::default())
            .await
            .unwrap();
        let theme = patch.get("primaryTheme").unwrap();
        assert_eq!(theme["prefLabel"], json!("Bond markets"));
        assert_eq!(
            theme["url"],
            json!("https://www.ft.com/stream/d8b3a6a1-3c6e-4f1a-a5a2-3a4a2f0b1c11")
        );
    }

    #[tokio::test]
    async fn null_without_classification() {
        let patch = PrimaryThemeEnricher
            .enrich(&doc(json!({"uuid": "x"})), &EnrichOptions::default())
            .await
            .unwrap();
        assert_eq!(patch.get("primaryTheme"), Some(&Value::Null));
    }
}

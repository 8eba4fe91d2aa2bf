//! Typed view over a document's `annotations` array.

use serde::Deserialize;
use serde_json::{Value, json};

use avsearch_shared::Document;

/// Predicate linking a piece of content to its author.
pub(crate) const HAS_AUTHOR: &str = "hasAuthor";

/// Predicate linking a piece of content to its main theme.
pub(crate) const PRIMARILY_CLASSIFIED_BY: &str = "isPrimarilyClassifiedBy";

/// One concept annotation attached to a document.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Annotation {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub pref_label: String,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub predicate: String,
}

impl Annotation {
    /// Predicates are full ontology URIs; match on the trailing name.
    pub fn has_predicate(&self, name: &str) -> bool {
        self.predicate
            .rsplit('/')
            .next()
            .is_some_and(|last| last == name)
    }

    pub fn is_kind(&self, kind: &str) -> bool {
        self.kind.eq_ignore_ascii_case(kind)
    }

    pub fn is_labelled(&self, label: &str) -> bool {
        self.pref_label.eq_ignore_ascii_case(label)
    }

    /// Public stream page for the concept.
    pub fn stream_url(&self) -> String {
        format!("https://www.ft.com/stream/{}", self.id)
    }

    /// `{id, prefLabel, url}` summary used in enriched output.
    pub fn to_concept(&self) -> Value {
        json!({
            "id": self.id,
            "prefLabel": self.pref_label,
            "url": self.stream_url(),
        })
    }
}

/// Parse the document's annotations, skipping malformed entries.
pub(crate) fn annotations(doc: &Document) -> Vec<Annotation> {
    doc.array_field("annotations")
        .iter()
        .filter_map(|value| Annotation::deserialize(value).ok())
        .collect()
}

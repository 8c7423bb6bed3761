//! Link index ingestion.
//!
//! Link index providers have shipped a few slightly different entry shapes:
//! attributes as `{type, urls: [..]}` or `{type, doc_url}`, forelinks as
//! `{type, url}` or `{type, doc_url}`. All of them collapse into
//! [`DocumentLinks`] here so the net-web builder only sees one form.

use std::collections::HashMap;

use serde::Deserialize;

use crate::types::{DocumentLinks, Reference, ReferenceKind};

/// Per-document outgoing references, keyed by document URL.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(from = "HashMap<String, RawLinkEntry>")]
pub struct LinkIndex {
    /// Normalized entries keyed by source document URL.
    entries: HashMap<String, DocumentLinks>,
}

impl LinkIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        return Self::default();
    }

    /// Record the links of one document, replacing any earlier entry.
    pub fn insert(&mut self, url: impl Into<String>, links: DocumentLinks) {
        self.entries.insert(url.into(), links);
    }

    /// Links reported for a document, if the provider indexed it.
    pub fn lookup(&self, url: &str) -> Option<&DocumentLinks> {
        return self.entries.get(url);
    }

    /// Number of indexed documents.
    pub fn len(&self) -> usize {
        return self.entries.len();
    }

    /// Whether no document has been indexed.
    pub fn is_empty(&self) -> bool {
        return self.entries.is_empty();
    }
}

impl From<HashMap<String, RawLinkEntry>> for LinkIndex {
    fn from(raw: HashMap<String, RawLinkEntry>) -> Self {
        let entries = raw
            .into_iter()
            .map(|(url, entry)| return (url, entry.into_document_links()))
            .collect();
        return Self { entries };
    }
}

/// Attribute entry as emitted by a link index provider.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawAttribute {
    /// Single-target form used by later providers.
    DocUrl {
        /// Resolved target URL.
        doc_url: String,
    },
    /// Multi-target form: one attribute naming several documents.
    Urls {
        /// Target URLs, possibly with anchors.
        urls: Vec<String>,
    },
}

/// Forelink entry as emitted by a link index provider.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawForelink {
    /// Later providers name the resolved document url.
    DocUrl {
        /// Resolved target URL.
        doc_url: String,
    },
    /// Older providers name the link url directly.
    Url {
        /// Target URL, possibly with an anchor.
        url: String,
    },
}

/// One document's entry in a raw link index.
#[derive(Debug, Deserialize)]
pub struct RawLinkEntry {
    /// Typed attribute references.
    #[serde(default)]
    attributes: Vec<RawAttribute>,
    /// Inline link references.
    #[serde(default)]
    forelinks: Vec<RawForelink>,
    /// Names of references that resolved to nothing.
    #[serde(default)]
    missing: Vec<String>,
}

impl RawLinkEntry {
    /// Flatten attributes then forelinks into one ordered reference list.
    fn into_document_links(self) -> DocumentLinks {
        let mut references = Vec::new();

        for attribute in self.attributes {
            match attribute {
                RawAttribute::DocUrl { doc_url } => references.push(Reference {
                    kind: ReferenceKind::Attribute,
                    raw_target: doc_url,
                }),
                RawAttribute::Urls { urls } => {
                    references.extend(urls.into_iter().map(|raw_target| {
                        return Reference { kind: ReferenceKind::Attribute, raw_target };
                    }));
                },
            }
        }

        for forelink in self.forelinks {
            let raw_target = match forelink {
                RawForelink::DocUrl { doc_url } => doc_url,
                RawForelink::Url { url } => url,
            };
            references.push(Reference { kind: ReferenceKind::Forelink, raw_target });
        }

        return DocumentLinks { missing: self.missing, references };
    }
}

#[cfg(test)]
#[allow(
    clippy::arithmetic_side_effects,
    clippy::implicit_return,
    clippy::indexing_slicing,
    clippy::missing_docs_in_private_items,
    clippy::missing_panics_doc,
    clippy::unwrap_used,
    reason = "tests"
)]
mod tests {
    use super::*;

    #[test]
    fn accepts_every_provider_shape() {
        let json = r##"{
            "/a/": {
                "missing": ["ghost"],
                "attributes": [
                    {"type": "related", "urls": ["/b/", "/c/#intro"]},
                    {"type": "parent", "doc_url": "/d/"}
                ],
                "forelinks": [
                    {"type": "wiki", "url": "/e/"},
                    {"type": "wiki", "doc_url": "/f/"}
                ]
            }
        }"##;
        let index: LinkIndex = serde_json::from_str(json).unwrap();
        let links = index.lookup("/a/").unwrap();

        assert_eq!(links.missing, vec!["ghost".to_string()]);
        let targets: Vec<(&str, ReferenceKind)> = links
            .references
            .iter()
            .map(|r| (r.raw_target.as_str(), r.kind))
            .collect();
        assert_eq!(
            targets,
            vec![
                ("/b/", ReferenceKind::Attribute),
                ("/c/#intro", ReferenceKind::Attribute),
                ("/d/", ReferenceKind::Attribute),
                ("/e/", ReferenceKind::Forelink),
                ("/f/", ReferenceKind::Forelink),
            ]
        );
    }

    #[test]
    fn missing_sections_default_to_empty() {
        let index: LinkIndex = serde_json::from_str(r#"{"/a/": {}}"#).unwrap();
        assert_eq!(index.lookup("/a/"), Some(&DocumentLinks::default()));
        assert_eq!(index.lookup("/nope/"), None);
        assert_eq!(index.len(), 1);
    }
}

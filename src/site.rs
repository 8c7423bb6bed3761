//! Site manifest: the documents and link index the host hands over.

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;

use crate::error::Error;
use crate::link_index::LinkIndex;
use crate::tree::ROOT_NAMESPACE;
use crate::types::Document;

/// Everything one generation pass reads.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Site {
    /// Every rendered document, in host order.
    #[serde(default)]
    pub documents: Vec<Document>,
    /// Outgoing references per document. `None` when no link index
    /// provider ran.
    #[serde(default)]
    pub link_index: Option<LinkIndex>,
}

impl Site {
    /// Parse a manifest from JSON content.
    ///
    /// # Errors
    ///
    /// Returns `Error::Json` if the content is not a valid manifest,
    /// or `Error::ManifestCorrupt` if a document has an empty URL.
    pub fn parse(content: &str) -> Result<Self, Error> {
        let site: Self = serde_json::from_str(content)?;
        if let Some(doc) = site.documents.iter().find(|d| return d.url.is_empty()) {
            return Err(Error::ManifestCorrupt {
                reason: format!("document `{}` has an empty url", doc.title),
            });
        }
        warn_on_duplicate_urls(&site.documents);
        return Ok(site);
    }

    /// Read and parse a manifest from disk.
    ///
    /// # Errors
    ///
    /// Returns `Error::ManifestNotFound` if the file doesn't exist,
    /// `Error::Io` for other read failures, or the errors of [`Site::parse`].
    pub fn read(path: &Path) -> Result<Self, Error> {
        let content = match std::fs::read_to_string(path) {
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::ManifestNotFound { path: path.to_path_buf() });
            },
            Err(e) => return Err(Error::Io(e)),
            Ok(c) => c,
        };
        return Self::parse(&content);
    }

    /// The document seeding the tree root: the first whose namespace is `root`.
    pub fn root_document<'a, I>(documents: I) -> Option<&'a Document>
    where
        I: IntoIterator<Item = &'a Document>,
    {
        return documents
            .into_iter()
            .find(|d| return d.namespace.as_deref().map(str::trim) == Some(ROOT_NAMESPACE));
    }
}

/// URLs should be unique; duplicates make references to them ambiguous.
fn warn_on_duplicate_urls(documents: &[Document]) {
    let mut seen = HashSet::new();
    for doc in documents {
        if !seen.insert(doc.url.as_str()) {
            tracing::warn!("duplicate document url {}; references to it will be skipped", doc.url);
        }
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
    fn parses_manifest_with_link_index() {
        let site = Site::parse(
            r#"{
                "documents": [
                    {"url": "/root/", "title": "Root", "type": "notes", "namespace": "root", "extension": ".md"},
                    {"url": "/a/", "title": "A", "type": "pages"}
                ],
                "link_index": {"/a/": {"missing": ["ghost"]}}
            }"#,
        )
        .unwrap();
        assert_eq!(site.documents.len(), 2);
        assert_eq!(site.documents.get(1).unwrap().namespace, None);
        assert!(site.link_index.is_some());
        assert_eq!(Site::root_document(&site.documents).unwrap().url, "/root/");
    }

    #[test]
    fn null_link_index_means_not_supplied() {
        let site = Site::parse(r#"{"documents": [], "link_index": null}"#).unwrap();
        assert!(site.link_index.is_none());
        assert!(Site::root_document(&site.documents).is_none());
    }

    #[test]
    fn empty_url_is_corrupt() {
        let err = Site::parse(r#"{"documents": [{"url": "", "title": "T", "type": "notes"}]}"#).unwrap_err();
        assert!(matches!(err, Error::ManifestCorrupt { .. }));
    }

    #[test]
    fn missing_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let err = Site::read(&dir.path().join("site.json")).unwrap_err();
        assert!(matches!(err, Error::ManifestNotFound { .. }));
    }
}

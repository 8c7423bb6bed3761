/// Core domain types shared by the tree and net-web pipelines.
use std::fmt;

use serde::{Deserialize, Serialize};

/// A rendered site document, as handed over by the host site generator.
/// Read-only to this crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Content-type tag (`pages`, `posts`, a collection name, ...).
    #[serde(rename = "type")]
    pub doc_type: String,
    /// Source file extension including the dot, e.g. `.md`. `None` when the
    /// host already filtered to markdown.
    #[serde(default)]
    pub extension: Option<String>,
    /// Dot-delimited position in the namespace tree, e.g. `a.b.c`.
    /// Documents without one never appear in the tree.
    #[serde(default)]
    pub namespace: Option<String>,
    /// Human-readable title, used as the node label.
    pub title: String,
    /// Site-relative URL. Unique across the working document set.
    pub url: String,
}

/// Which of the two output graphs an operation concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GraphKind {
    /// The reference graph built from cross-document links.
    NetWeb,
    /// The hierarchy built from namespace strings.
    Tree,
}

impl fmt::Display for GraphKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return match self {
            Self::NetWeb => f.write_str("net-web"),
            Self::Tree => f.write_str("tree"),
        };
    }
}

/// One outgoing reference from a document, not yet resolved against known URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    /// Whether the reference came from a typed attribute or an inline link.
    pub kind: ReferenceKind,
    /// Target as written; may carry a `#fragment` and/or the site base url.
    pub raw_target: String,
}

/// The two flavors of reference a link index reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    /// Typed relationship declared as a document attribute.
    Attribute,
    /// Plain inline link in the document body.
    Forelink,
}

/// Link index entry for one document, normalized across provider versions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentLinks {
    /// Reference names that matched no known document at index-build time.
    pub missing: Vec<String>,
    /// Outgoing references, attributes first, in provider order.
    pub references: Vec<Reference>,
}

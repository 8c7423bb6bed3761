//! Net-web graph assembly from documents and their link index entries.
//!
//! Nodes live in an id→position registry so each id is inserted once and the
//! first occurrence wins. Links are appended as found and may repeat.

use std::collections::HashMap;

use serde::Serialize;

use crate::link_index::LinkIndex;
use crate::normalize::{normalize, relative_url};
use crate::types::{Document, ReferenceKind};

/// A directed reference between two net-web nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphLink {
    /// Id of the referring node.
    pub source: String,
    /// Id of the referenced node.
    pub target: String,
}

/// Direct neighbors of a node, filled by [`crate::neighbors::decorate`].
#[allow(clippy::arbitrary_source_item_ordering, reason = "fields follow the JSON key order the client reads")]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Neighbors {
    /// Ids of nodes one link away, in either direction.
    pub nodes: Vec<String>,
    /// Links touching this node.
    pub links: Vec<GraphLink>,
}

/// One net-web node as the browser script consumes it.
#[allow(clippy::arbitrary_source_item_ordering, reason = "fields follow the JSON key order the client reads")]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphNode {
    /// Document URL, or the raw reference text for missing documents.
    pub id: String,
    /// Rendered document URL; empty for missing documents.
    pub url: String,
    /// Document title, or the raw reference text.
    pub label: String,
    /// Adjacency, empty until decorated.
    pub neighbors: Neighbors,
}

impl GraphNode {
    /// Placeholder for a reference whose target document does not exist.
    fn missing(name: &str) -> Self {
        return Self {
            id: name.to_string(),
            url: String::new(),
            label: name.to_string(),
            neighbors: Neighbors::default(),
        };
    }
}

/// The graph written to `graph-net-web.json`.
#[allow(clippy::arbitrary_source_item_ordering, reason = "fields follow the JSON key order the client reads")]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NetWebGraph {
    /// Unique by id, in first-seen order.
    pub nodes: Vec<GraphNode>,
    /// One entry per resolved reference and per newly placed missing node;
    /// resolved duplicates allowed.
    pub links: Vec<GraphLink>,
}

/// Which reference kinds feed the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferenceFilter {
    /// Include attribute references.
    pub attributes: bool,
    /// Include inline link references.
    pub forelinks: bool,
}

impl Default for ReferenceFilter {
    fn default() -> Self {
        return Self { attributes: true, forelinks: true };
    }
}

impl ReferenceFilter {
    /// Whether references of this kind are used.
    const fn allows(self, kind: ReferenceKind) -> bool {
        return match kind {
            ReferenceKind::Attribute => self.attributes,
            ReferenceKind::Forelink => self.forelinks,
        };
    }
}

/// Accumulates nodes and links for one generation pass.
struct NetWebBuilder<'a> {
    /// Site base url, stripped from targets and joined onto node urls.
    base_url: &'a str,
    /// Position of each id in `nodes`.
    index_by_id: HashMap<String, usize>,
    /// Links in discovery order.
    links: Vec<GraphLink>,
    /// Nodes in first-seen order.
    nodes: Vec<GraphNode>,
    /// Known, non-excluded documents by URL. More than one entry means ambiguous.
    targets: HashMap<&'a str, Vec<&'a Document>>,
}

impl<'a> NetWebBuilder<'a> {
    /// Prepare a builder that resolves references against `documents`.
    fn new(documents: &[&'a Document], base_url: &'a str) -> Self {
        let mut targets: HashMap<&str, Vec<&Document>> = HashMap::new();
        for &doc in documents {
            targets.entry(doc.url.as_str()).or_default().push(doc);
        }
        return Self {
            base_url,
            index_by_id: HashMap::new(),
            links: Vec::new(),
            nodes: Vec::new(),
            targets,
        };
    }

    /// Insert a node unless one with the same id already exists.
    /// Returns whether it was inserted.
    fn insert_if_absent(&mut self, node: GraphNode) -> bool {
        if self.index_by_id.contains_key(&node.id) {
            return false;
        }
        self.index_by_id.insert(node.id.clone(), self.nodes.len());
        self.nodes.push(node);
        return true;
    }

    /// Add one document's node and all of its outgoing links.
    fn add_document(&mut self, doc: &Document, index: &LinkIndex, filter: ReferenceFilter) {
        tracing::debug!("processing graph nodes for doc: {}", doc.title);

        let Some(links) = index.lookup(&doc.url) else {
            tracing::debug!("link index has no entry for {}", doc.url);
            self.insert_if_absent(document_node(doc, self.base_url));
            return;
        };

        for name in &links.missing {
            if self.insert_if_absent(GraphNode::missing(name)) {
                tracing::warn!("net-web node missing: {name}, in: {}", doc.title);
                self.links.push(GraphLink {
                    source: doc.url.clone(),
                    target: name.clone(),
                });
            }
        }

        self.insert_if_absent(document_node(doc, self.base_url));

        for reference in links.references.iter().filter(|r| return filter.allows(r.kind)) {
            let target = normalize(&reference.raw_target, self.base_url);
            match self.targets.get(target.as_str()).map(Vec::as_slice) {
                Some([linked]) => self.links.push(GraphLink {
                    source: doc.url.clone(),
                    target: linked.url.clone(),
                }),
                Some(_) | None => {
                    tracing::debug!("skipping reference {} from {}: no unique target", reference.raw_target, doc.url);
                },
            }
        }
    }

    /// Finish the pass.
    fn finish(self) -> NetWebGraph {
        return NetWebGraph { nodes: self.nodes, links: self.links };
    }
}

/// Node for an existing document: id is the raw URL, url is base-relative.
fn document_node(doc: &Document, base_url: &str) -> GraphNode {
    return GraphNode {
        id: doc.url.clone(),
        url: relative_url(base_url, &doc.url),
        label: doc.title.clone(),
        neighbors: Neighbors::default(),
    };
}

/// Assemble the raw net-web graph.
///
/// For each document not rejected by `is_excluded(type)`: a placeholder node
/// and a link for every missing reference not already present as a node, the document's own node, then a
/// link for every allowed reference whose normalized target matches exactly
/// one known, non-excluded document. Anything else is skipped quietly.
pub fn build<F>(
    documents: &[Document],
    index: &LinkIndex,
    is_excluded: F,
    filter: ReferenceFilter,
    base_url: &str,
) -> NetWebGraph
where
    F: Fn(&str) -> bool,
{
    let included: Vec<&Document> = documents.iter().filter(|d| return !is_excluded(&d.doc_type)).collect();
    let mut builder = NetWebBuilder::new(&included, base_url);

    for doc in &included {
        builder.add_document(doc, index, filter);
    }

    return builder.finish();
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
    use crate::types::{DocumentLinks, Reference};

    fn doc(url: &str, title: &str, doc_type: &str) -> Document {
        return Document {
            doc_type: doc_type.to_string(),
            extension: Some(".md".to_string()),
            namespace: None,
            title: title.to_string(),
            url: url.to_string(),
        };
    }

    fn reference(kind: ReferenceKind, target: &str) -> Reference {
        return Reference { kind, raw_target: target.to_string() };
    }

    fn link(source: &str, target: &str) -> GraphLink {
        return GraphLink { source: source.to_string(), target: target.to_string() };
    }

    fn no_exclusions(_: &str) -> bool {
        return false;
    }

    #[test]
    fn missing_reference_synthesizes_node_and_link() {
        let docs = vec![doc("/link/", "Untyped Link", "notes")];
        let mut index = LinkIndex::new();
        index.insert("/link/", DocumentLinks { missing: vec!["no.doc".to_string()], references: Vec::new() });

        let graph = build(&docs, &index, no_exclusions, ReferenceFilter::default(), "");

        let ghost = graph.nodes.iter().find(|n| n.id == "no.doc").unwrap();
        assert_eq!(ghost.url, "");
        assert_eq!(ghost.label, "no.doc");
        assert_eq!(graph.links, vec![link("/link/", "no.doc")]);
    }

    #[test]
    fn resolves_references_after_normalizing() {
        let docs = vec![doc("/a/", "A", "notes"), doc("/b/", "B", "notes"), doc("/c/", "C", "notes")];
        let mut index = LinkIndex::new();
        index.insert(
            "/a/",
            DocumentLinks {
                missing: Vec::new(),
                references: vec![
                    reference(ReferenceKind::Attribute, "/garden/b/#section"),
                    reference(ReferenceKind::Forelink, "/c/"),
                    reference(ReferenceKind::Forelink, "/nowhere/"),
                ],
            },
        );

        let graph = build(&docs, &index, no_exclusions, ReferenceFilter::default(), "/garden");

        assert_eq!(graph.links, vec![link("/a/", "/b/"), link("/a/", "/c/")]);
        let a = graph.nodes.first().unwrap();
        assert_eq!(a.id, "/a/");
        assert_eq!(a.url, "/garden/a/");
        assert_eq!(a.label, "A");
    }

    #[test]
    fn nodes_are_unique_by_id_first_wins() {
        let docs = vec![doc("/a/", "A", "notes"), doc("/b/", "B", "notes"), doc("/a/", "A again", "notes")];
        let mut index = LinkIndex::new();
        index.insert("/a/", DocumentLinks { missing: vec!["ghost".to_string()], references: Vec::new() });
        index.insert(
            "/b/",
            DocumentLinks { missing: vec!["ghost".to_string(), "/a/".to_string()], references: Vec::new() },
        );

        let graph = build(&docs, &index, no_exclusions, ReferenceFilter::default(), "");

        let ids: Vec<&str> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["ghost", "/a/", "/b/"]);
        assert_eq!(graph.nodes.get(1).unwrap().label, "A");
        assert_eq!(graph.links, vec![link("/a/", "ghost")]);
    }

    #[test]
    fn missing_name_already_present_adds_no_link() {
        let docs = vec![doc("/a/", "A", "notes"), doc("/b/", "B", "notes")];
        let mut index = LinkIndex::new();
        index.insert("/a/", DocumentLinks { missing: vec!["ghost".to_string()], references: Vec::new() });
        index.insert(
            "/b/",
            DocumentLinks { missing: vec!["ghost".to_string(), "/a/".to_string()], references: Vec::new() },
        );

        let graph = build(&docs, &index, no_exclusions, ReferenceFilter::default(), "");

        assert_eq!(graph.links, vec![link("/a/", "ghost")]);
        assert_eq!(graph.nodes.iter().filter(|n| n.id == "ghost").count(), 1);
    }

    #[test]
    fn ambiguous_targets_are_skipped() {
        let docs = vec![doc("/a/", "A", "notes"), doc("/dup/", "Dup 1", "notes"), doc("/dup/", "Dup 2", "notes")];
        let mut index = LinkIndex::new();
        index.insert(
            "/a/",
            DocumentLinks { missing: Vec::new(), references: vec![reference(ReferenceKind::Forelink, "/dup/")] },
        );

        let graph = build(&docs, &index, no_exclusions, ReferenceFilter::default(), "");
        assert!(graph.links.is_empty());
    }

    #[test]
    fn excluded_types_never_appear() {
        let docs = vec![doc("/a/", "A", "notes"), doc("/post/", "One Post", "posts")];
        let mut index = LinkIndex::new();
        index.insert(
            "/a/",
            DocumentLinks { missing: Vec::new(), references: vec![reference(ReferenceKind::Forelink, "/post/")] },
        );
        index.insert(
            "/post/",
            DocumentLinks { missing: vec!["ghost".to_string()], references: vec![reference(ReferenceKind::Forelink, "/a/")] },
        );

        let graph = build(&docs, &index, |t| t == "posts", ReferenceFilter::default(), "");

        assert_eq!(graph.nodes.len(), 1);
        assert!(graph.links.is_empty());
    }

    #[test]
    fn reference_kinds_can_be_switched_off() {
        let docs = vec![doc("/a/", "A", "notes"), doc("/b/", "B", "notes"), doc("/c/", "C", "notes")];
        let mut index = LinkIndex::new();
        index.insert(
            "/a/",
            DocumentLinks {
                missing: Vec::new(),
                references: vec![reference(ReferenceKind::Attribute, "/b/"), reference(ReferenceKind::Forelink, "/c/")],
            },
        );

        let attrs_only = ReferenceFilter { attributes: true, forelinks: false };
        let graph = build(&docs, &index, no_exclusions, attrs_only, "");
        assert_eq!(graph.links, vec![link("/a/", "/b/")]);

        let links_only = ReferenceFilter { attributes: false, forelinks: true };
        let graph = build(&docs, &index, no_exclusions, links_only, "");
        assert_eq!(graph.links, vec![link("/a/", "/c/")]);
    }

    #[test]
    fn documents_without_index_entry_still_get_a_node() {
        let docs = vec![doc("/a/", "A", "notes")];
        let graph = build(&docs, &LinkIndex::new(), no_exclusions, ReferenceFilter::default(), "");
        assert_eq!(graph.nodes.len(), 1);
        assert!(graph.links.is_empty());
    }
}

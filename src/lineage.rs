//! Lineage and sibling decoration of a flattened tree.
//!
//! Works purely from the node and edge lists: edges give each node its parent
//! and ordered children, which is all that ancestors, descendants and
//! siblings need.

use std::collections::{HashMap, HashSet};

use crate::tree_graph::{Lineage, TreeEdge, TreeGraph, TreeNodeView};

/// Parent and children lookups derived from an edge list.
struct EdgeIndex<'a> {
    /// Child ids per parent id, in edge order.
    children: HashMap<&'a str, Vec<&'a str>>,
    /// Parent id per child id. The first edge into a node wins.
    parents: HashMap<&'a str, &'a str>,
}

impl<'a> EdgeIndex<'a> {
    /// Index every edge by both endpoints.
    fn new(edges: &'a [TreeEdge]) -> Self {
        let mut children: HashMap<&str, Vec<&str>> = HashMap::new();
        let mut parents: HashMap<&str, &str> = HashMap::new();
        for edge in edges {
            children.entry(edge.source.as_str()).or_default().push(edge.target.as_str());
            parents.entry(edge.target.as_str()).or_insert(edge.source.as_str());
        }
        return Self { children, parents };
    }

    /// Ancestor ids from the root down to the immediate parent.
    fn ancestors(&self, id: &'a str) -> Vec<&'a str> {
        let mut chain = Vec::new();
        let mut seen = HashSet::from([id]);
        let mut current = id;
        while let Some(&parent) = self.parents.get(current) {
            if !seen.insert(parent) {
                break;
            }
            chain.push(parent);
            current = parent;
        }
        chain.reverse();
        return chain;
    }

    /// Descendant ids in depth-first pre-order.
    fn descendants(&self, id: &'a str) -> Vec<&'a str> {
        let mut found = Vec::new();
        let mut seen = HashSet::from([id]);
        let mut stack: Vec<&str> = self.children_of(id).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            if !seen.insert(next) {
                continue;
            }
            found.push(next);
            stack.extend(self.children_of(next).iter().rev());
        }
        return found;
    }

    /// Ordered children of a node; empty for leaves.
    fn children_of(&self, id: &str) -> &[&'a str] {
        return self.children.get(id).map(Vec::as_slice).unwrap_or_default();
    }

    /// Other children of this node's parent; empty for the root.
    fn siblings(&self, id: &str) -> Vec<&'a str> {
        let Some(parent) = self.parents.get(id) else {
            return Vec::new();
        };
        return self
            .children_of(parent)
            .iter()
            .filter(|&&child| return child != id)
            .copied()
            .collect();
    }
}

/// Return copies of `nodes` with lineage and siblings filled in.
///
/// For a node N, `lineage.nodes` holds every ancestor and every descendant
/// of N (never N itself), `lineage.links` the edges with both endpoints in
/// that set plus N, and `siblings` the other children of N's parent.
pub fn decorate(nodes: &[TreeNodeView], edges: &[TreeEdge]) -> Vec<TreeNodeView> {
    let index = EdgeIndex::new(edges);

    return nodes
        .iter()
        .map(|node| {
            let id = node.id.as_str();
            let mut members = index.ancestors(id);
            members.extend(index.descendants(id));

            let in_lineage: HashSet<&str> = members.iter().copied().chain([id]).collect();
            let links = edges
                .iter()
                .filter(|e| return in_lineage.contains(e.source.as_str()) && in_lineage.contains(e.target.as_str()))
                .cloned()
                .collect();

            let mut decorated = node.clone();
            decorated.lineage = Lineage {
                nodes: members.into_iter().map(str::to_string).collect(),
                links,
            };
            decorated.siblings = index.siblings(id).into_iter().map(str::to_string).collect();
            return decorated;
        })
        .collect();
}

/// Decorate a whole tree graph.
pub fn decorate_graph(graph: &TreeGraph) -> TreeGraph {
    return TreeGraph {
        nodes: decorate(&graph.nodes, &graph.links),
        links: graph.links.clone(),
    };
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
    use crate::tree::{ConflictPolicy, NamespaceTree};
    use crate::tree_graph::serialize;
    use crate::types::Document;

    fn doc(url: &str, namespace: &str) -> Document {
        return Document {
            doc_type: "notes".to_string(),
            extension: None,
            namespace: Some(namespace.to_string()),
            title: url.trim_matches('/').to_string(),
            url: url.to_string(),
        };
    }

    fn decorated() -> TreeGraph {
        let root = doc("/root/", "root");
        let docs = vec![
            doc("/a/", "a"),
            doc("/a.b/", "a.b"),
            doc("/a.c/", "a.c"),
            doc("/d/", "d"),
            doc("/a.b.e/", "a.b.e"),
        ];
        let tree = NamespaceTree::build(&root, &docs, ConflictPolicy::Overwrite).unwrap();
        return decorate_graph(&serialize(tree.root(), ""));
    }

    fn node<'a>(graph: &'a TreeGraph, id: &str) -> &'a TreeNodeView {
        return graph.nodes.iter().find(|n| n.id == id).unwrap();
    }

    #[test]
    fn lineage_is_ancestors_then_descendants() {
        let graph = decorated();
        assert_eq!(node(&graph, "/a.b/").lineage.nodes, vec!["/root/", "/a/", "/a.b.e/"]);
        assert_eq!(node(&graph, "/root/").lineage.nodes, vec!["/a/", "/a.b/", "/a.b.e/", "/a.c/", "/d/"]);
        assert_eq!(node(&graph, "/d/").lineage.nodes, vec!["/root/"]);
    }

    #[test]
    fn lineage_links_stay_inside_lineage() {
        let graph = decorated();
        let links: Vec<(&str, &str)> = node(&graph, "/a.b/")
            .lineage
            .links
            .iter()
            .map(|e| (e.source.as_str(), e.target.as_str()))
            .collect();
        assert_eq!(links, vec![("/root/", "/a/"), ("/a/", "/a.b/"), ("/a.b/", "/a.b.e/")]);
        assert_eq!(node(&graph, "/root/").lineage.links.len(), graph.links.len());
    }

    #[test]
    fn lineage_is_symmetric() {
        let graph = decorated();
        for view in &graph.nodes {
            for other in &view.lineage.nodes {
                let other_view = node(&graph, other);
                assert!(
                    other_view.lineage.nodes.contains(&view.id),
                    "{} lists {} but not the other way round",
                    view.id,
                    other
                );
            }
            assert!(!view.lineage.nodes.contains(&view.id));
        }
    }

    #[test]
    fn siblings_share_a_parent() {
        let graph = decorated();
        assert_eq!(node(&graph, "/a/").siblings, vec!["/d/"]);
        assert_eq!(node(&graph, "/a.c/").siblings, vec!["/a.b/"]);
        assert!(node(&graph, "/root/").siblings.is_empty());
        assert!(node(&graph, "/a.b.e/").siblings.is_empty());
    }

    #[test]
    fn decoration_leaves_input_untouched() {
        let root = doc("/root/", "root");
        let tree = NamespaceTree::build(&root, &[doc("/a/", "a")], ConflictPolicy::Overwrite).unwrap();
        let raw = serialize(tree.root(), "");
        let decorated = decorate(&raw.nodes, &raw.links);
        assert!(raw.nodes.iter().all(|n| n.lineage.nodes.is_empty()));
        assert_eq!(decorated.first().unwrap().lineage.nodes, vec!["/a/"]);
    }
}

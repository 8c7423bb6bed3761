//! Tree serialization: flat node list plus parent→child edges, or the legacy
//! nested form.

use serde::Serialize;

use crate::normalize::relative_url;
use crate::tree::TreeNode;

/// A parent→child relationship, by node id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeEdge {
    /// Parent node id.
    pub source: String,
    /// Child node id.
    pub target: String,
}

/// Ancestors plus descendants of a node and the edges among them.
#[allow(clippy::arbitrary_source_item_ordering, reason = "fields follow the JSON key order the client reads")]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Lineage {
    /// Ancestor ids (root first) followed by descendant ids (pre-order).
    pub nodes: Vec<String>,
    /// Edges whose endpoints both lie in the lineage or are the node itself.
    pub links: Vec<TreeEdge>,
}

/// One tree node as the browser script consumes it.
#[allow(clippy::arbitrary_source_item_ordering, reason = "fields follow the JSON key order the client reads")]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeNodeView {
    /// Document URL, or the namespace for placeholders.
    pub id: String,
    /// Title or humanized namespace leaf.
    pub label: String,
    /// Path key, e.g. `root.a.b`.
    pub namespace: String,
    /// Link target rendered against the base url; empty for placeholders.
    pub url: String,
    /// Recursion depth, root = 0.
    #[serde(rename = "level")]
    pub depth: usize,
    /// Parent node id; absent on the root.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    /// Filled by [`crate::lineage::decorate`].
    #[serde(rename = "relatives")]
    pub lineage: Lineage,
    /// Filled by [`crate::lineage::decorate`].
    pub siblings: Vec<String>,
}

/// The flat tree graph written to `graph-tree.json`.
#[allow(clippy::arbitrary_source_item_ordering, reason = "fields follow the JSON key order the client reads")]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TreeGraph {
    /// Nodes in depth-first pre-order.
    pub nodes: Vec<TreeNodeView>,
    /// One edge per non-root node.
    pub links: Vec<TreeEdge>,
}

/// Legacy nested rendering of the same tree.
#[allow(clippy::arbitrary_source_item_ordering, reason = "fields follow the JSON key order the client reads")]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NestedTreeNode {
    /// Same as `url`.
    pub id: String,
    /// Path key.
    pub namespace: String,
    /// Title or humanized namespace leaf.
    pub label: String,
    /// Child nodes in insertion order.
    pub children: Vec<NestedTreeNode>,
    /// Rendered URL; empty for placeholders.
    pub url: String,
}

/// Flatten the tree in one depth-first pre-order pass.
///
/// Each node yields exactly one view, each non-root node exactly one edge
/// `{source: parent.id, target: node.id}`. Placeholders are reported with a
/// warning naming the namespace that has no document.
pub fn serialize(root: &TreeNode, base_url: &str) -> TreeGraph {
    let mut graph = TreeGraph::default();
    let mut stack: Vec<(&TreeNode, Option<&str>)> = vec![(root, None)];

    while let Some((node, parent_id)) = stack.pop() {
        graph.nodes.push(view_of(node, parent_id, base_url));
        if let Some(parent) = parent_id {
            graph.links.push(TreeEdge {
                source: parent.to_string(),
                target: node.id.clone(),
            });
        }
        // Reverse so the first child is popped first.
        for child in node.children.iter().rev() {
            stack.push((child, Some(node.id.as_str())));
        }
    }

    return graph;
}

/// Build the undecorated view of a single node.
fn view_of(node: &TreeNode, parent_id: Option<&str>, base_url: &str) -> TreeNodeView {
    let url = if node.resolved {
        relative_url(base_url, &node.url)
    } else {
        tracing::warn!("document for tree node missing: {}", node.namespace);
        String::new()
    };

    return TreeNodeView {
        id: node.id.clone(),
        label: node.label.clone(),
        namespace: node.namespace.clone(),
        url,
        depth: node.depth,
        parent: parent_id.map(str::to_string),
        lineage: Lineage::default(),
        siblings: Vec::new(),
    };
}

/// Render the tree as nested `{id, namespace, label, children, url}` objects.
pub fn serialize_nested(node: &TreeNode, base_url: &str) -> NestedTreeNode {
    let url = if node.resolved {
        relative_url(base_url, &node.url)
    } else {
        tracing::warn!("document for tree node missing: {}", node.namespace);
        String::new()
    };
    let children = node
        .children
        .iter()
        .map(|child| return serialize_nested(child, base_url))
        .collect();

    return NestedTreeNode {
        id: url.clone(),
        namespace: node.namespace.clone(),
        label: node.label.clone(),
        children,
        url,
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
    use crate::types::Document;

    fn doc(url: &str, title: &str, namespace: &str) -> Document {
        return Document {
            doc_type: "docs_tree".to_string(),
            extension: None,
            namespace: Some(namespace.to_string()),
            title: title.to_string(),
            url: url.to_string(),
        };
    }

    fn sample_tree() -> TreeNode {
        let root = doc("/docs_tree/root/", "Root", "root");
        let docs = vec![
            doc("/docs_tree/second-level/", "Root Second Level", "second-level"),
            doc("/docs_tree/second-level.third-level/", "Third Level", "second-level.third-level"),
            doc("/docs_tree/blank.missing-lvl/", "Missing Level", "blank.missing-lvl"),
        ];
        return NamespaceTree::build(&root, &docs, ConflictPolicy::Overwrite).unwrap().root().clone();
    }

    #[test]
    fn pre_order_nodes_and_parent_edges() {
        let graph = serialize(&sample_tree(), "");
        let ids: Vec<&str> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "/docs_tree/root/",
                "/docs_tree/second-level/",
                "/docs_tree/second-level.third-level/",
                "root.blank",
                "/docs_tree/blank.missing-lvl/",
            ]
        );
        let levels: Vec<usize> = graph.nodes.iter().map(|n| n.depth).collect();
        assert_eq!(levels, vec![0, 1, 2, 1, 2]);

        assert_eq!(graph.links.len(), graph.nodes.len() - 1);
        assert_eq!(
            graph.links.get(2),
            Some(&TreeEdge {
                source: "/docs_tree/root/".to_string(),
                target: "root.blank".to_string(),
            })
        );
        assert_eq!(graph.nodes.first().unwrap().parent, None);
        assert_eq!(graph.nodes.get(3).unwrap().parent.as_deref(), Some("/docs_tree/root/"));
    }

    #[test]
    fn placeholder_view_has_namespace_id_and_empty_url() {
        let graph = serialize(&sample_tree(), "/garden");
        let blank = graph.nodes.iter().find(|n| n.namespace == "root.blank").unwrap();
        assert_eq!(blank.id, "root.blank");
        assert_eq!(blank.label, "blank");
        assert_eq!(blank.url, "");

        let root = graph.nodes.first().unwrap();
        assert_eq!(root.url, "/garden/docs_tree/root/");
        assert_eq!(root.label, "Root");
    }

    #[test]
    fn json_uses_client_field_names() {
        let graph = serialize(&sample_tree(), "");
        let value = serde_json::to_value(&graph).unwrap();
        let root = value["nodes"][0].as_object().unwrap();
        assert!(root.contains_key("level"));
        assert!(root.contains_key("relatives"));
        assert!(root.contains_key("siblings"));
        assert!(!root.contains_key("parent"));
        assert_eq!(serde_json::to_string(&Lineage::default()).unwrap(), r#"{"nodes":[],"links":[]}"#);
    }

    #[test]
    fn nested_form_mirrors_flat_form() {
        let nested = serialize_nested(&sample_tree(), "");
        assert_eq!(nested.id, "/docs_tree/root/");
        assert_eq!(nested.children.len(), 2);
        let blank = nested.children.get(1).unwrap();
        assert_eq!(blank.namespace, "root.blank");
        assert_eq!(blank.id, "");
        assert_eq!(blank.label, "blank");
        assert_eq!(blank.children.first().unwrap().url, "/docs_tree/blank.missing-lvl/");
    }
}

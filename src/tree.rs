//! Namespace tree construction.
//!
//! Every document with a namespace such as `a.b.c` is placed at path key
//! `root.a.b.c`. Intermediate segments without a document of their own get a
//! placeholder node; when that document shows up later the placeholder is
//! promoted in place, keeping the children already hanging off it.

use serde::Deserialize;

use crate::error::Error;
use crate::types::Document;

/// Namespace of the tree root and first segment of every path key.
pub const ROOT_NAMESPACE: &str = "root";

/// What to do when a second document terminates at an already resolved path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictPolicy {
    /// Fail the tree graph with `Error::NamespaceConflict`.
    Error,
    /// Keep the document that claimed the path first.
    KeepFirst,
    /// Last write wins.
    #[default]
    Overwrite,
}

/// A node of the namespace tree. Parents own their children; there are no
/// back-pointers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    /// Children in insertion order.
    pub children: Vec<TreeNode>,
    /// Distance from the root; the root is 0.
    pub depth: usize,
    /// Document URL when resolved, otherwise the namespace itself.
    pub id: String,
    /// Document title, or the humanized last segment for placeholders.
    pub label: String,
    /// Unique path key, e.g. `root.a.b`.
    pub namespace: String,
    /// True iff some document's namespace terminates exactly here.
    pub resolved: bool,
    /// Document URL; empty for placeholders.
    pub url: String,
}

impl TreeNode {
    /// A node holding the place of a namespace segment with no document yet.
    fn placeholder(namespace: String, depth: usize) -> Self {
        return Self {
            children: Vec::new(),
            depth,
            id: namespace.clone(),
            label: placeholder_label(&namespace),
            namespace,
            resolved: false,
            url: String::new(),
        };
    }

    /// Fill this node from its document, promoting a placeholder in place.
    fn fill(&mut self, doc: &Document) {
        doc.url.clone_into(&mut self.id);
        doc.title.clone_into(&mut self.label);
        doc.url.clone_into(&mut self.url);
        self.resolved = true;
    }

    /// Find a node anywhere below (or at) this one by path key.
    #[cfg(test)]
    pub fn find(&self, namespace: &str) -> Option<&Self> {
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            if node.namespace == namespace {
                return Some(node);
            }
            stack.extend(node.children.iter().rev());
        }
        return None;
    }

    /// Number of nodes in this subtree, including this one.
    #[cfg(test)]
    pub fn node_count(&self) -> usize {
        return self.children.iter().fold(1_usize, |count, child| {
            return count.saturating_add(child.node_count());
        });
    }
}

/// A single-rooted tree of namespace nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceTree {
    /// The node with namespace `root`.
    root: TreeNode,
}

impl NamespaceTree {
    /// Build the tree: seed the root from `root_doc`, then walk every other
    /// document's namespace into it, in order.
    ///
    /// Documents whose namespace is absent, empty, or `root` are not inserted.
    ///
    /// # Errors
    ///
    /// Returns `Error::NamespaceConflict` when two documents terminate at the
    /// same path and the policy is [`ConflictPolicy::Error`].
    pub fn build(root_doc: &Document, documents: &[Document], policy: ConflictPolicy) -> Result<Self, Error> {
        let mut root = TreeNode::placeholder(ROOT_NAMESPACE.to_string(), 0);
        root.fill(root_doc);
        let mut tree = Self { root };

        for doc in documents {
            let Some(namespace) = doc.namespace.as_deref() else {
                continue;
            };
            let segments = namespace_segments(namespace);
            if segments.is_empty() {
                continue;
            }
            tree.add_path(doc, &segments, policy)?;
        }

        return Ok(tree);
    }

    /// Walk `segments` down from the root, creating placeholders as needed,
    /// and resolve the terminal node to `doc`.
    ///
    /// # Errors
    ///
    /// Returns `Error::NamespaceConflict` under [`ConflictPolicy::Error`].
    fn add_path(&mut self, doc: &Document, segments: &[&str], policy: ConflictPolicy) -> Result<(), Error> {
        let mut node = &mut self.root;
        let mut path_key = String::from(ROOT_NAMESPACE);

        for (index, segment) in segments.iter().enumerate() {
            path_key.push('.');
            path_key.push_str(segment);
            node = child_or_placeholder(node, &path_key, index.saturating_add(1));
        }

        if node.resolved {
            match policy {
                ConflictPolicy::Error => {
                    return Err(Error::NamespaceConflict {
                        existing: node.url.clone(),
                        incoming: doc.url.clone(),
                        namespace: path_key,
                    });
                },
                ConflictPolicy::KeepFirst => {
                    tracing::debug!("keeping {} at {path_key}, ignoring {}", node.url, doc.url);
                    return Ok(());
                },
                ConflictPolicy::Overwrite => {
                    tracing::debug!("{} replaces {} at {path_key}", doc.url, node.url);
                },
            }
        }

        node.fill(doc);
        return Ok(());
    }

    /// The root node.
    pub const fn root(&self) -> &TreeNode {
        return &self.root;
    }
}

/// Return the child of `parent` with path key `namespace`, attaching a new
/// placeholder at the end of the child list if there is none.
#[allow(clippy::indexing_slicing, reason = "index comes from position() or the push right before it")]
fn child_or_placeholder<'a>(parent: &'a mut TreeNode, namespace: &str, depth: usize) -> &'a mut TreeNode {
    let existing = parent.children.iter().position(|c| return c.namespace == namespace);
    let index = existing.unwrap_or_else(|| {
        parent.children.push(TreeNode::placeholder(namespace.to_string(), depth));
        return parent.children.len().saturating_sub(1);
    });
    return &mut parent.children[index];
}

/// Split a namespace on dots and whitespace.
///
/// Empty segments (from `a..b` or stray spaces) are dropped, and a leading
/// `root` segment is dropped so `root.a` and `a` land on the same node.
pub fn namespace_segments(namespace: &str) -> Vec<&str> {
    let mut segments: Vec<&str> = namespace
        .split(|c: char| return c == '.' || c.is_whitespace())
        .filter(|s| return !s.is_empty())
        .collect();
    if segments.first() == Some(&ROOT_NAMESPACE) {
        segments.remove(0);
    }
    return segments;
}

/// Display label for a node with no document: the last namespace segment,
/// hyphens turned into spaces.
pub fn placeholder_label(namespace: &str) -> String {
    let leaf = namespace.rsplit('.').next().unwrap_or(namespace);
    return leaf.replace('-', " ");
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

    fn doc(url: &str, title: &str, namespace: &str) -> Document {
        return Document {
            doc_type: "notes".to_string(),
            extension: Some(".md".to_string()),
            namespace: Some(namespace.to_string()),
            title: title.to_string(),
            url: url.to_string(),
        };
    }

    fn root_doc() -> Document {
        return doc("/root/", "Root", "root");
    }

    fn child_namespaces(node: &TreeNode) -> Vec<&str> {
        return node.children.iter().map(|c| c.namespace.as_str()).collect();
    }

    #[test]
    fn seeds_root_from_root_document() {
        let tree = NamespaceTree::build(&root_doc(), &[root_doc()], ConflictPolicy::Overwrite).unwrap();
        let root = tree.root();
        assert_eq!(root.namespace, "root");
        assert_eq!(root.id, "/root/");
        assert!(root.resolved);
        assert!(root.children.is_empty());
    }

    #[test]
    fn creates_placeholders_for_missing_levels() {
        let docs = vec![doc("/a.b.c/", "C", "a.b.c")];
        let tree = NamespaceTree::build(&root_doc(), &docs, ConflictPolicy::Overwrite).unwrap();

        let a = tree.root().find("root.a").unwrap();
        assert!(!a.resolved);
        assert_eq!(a.id, "root.a");
        assert_eq!(a.url, "");
        assert_eq!(a.depth, 1);

        let c = tree.root().find("root.a.b.c").unwrap();
        assert!(c.resolved);
        assert_eq!(c.id, "/a.b.c/");
        assert_eq!(c.depth, 3);
    }

    #[test]
    fn promotes_placeholder_in_place() {
        let docs = vec![doc("/a.b.c/", "C", "a.b.c"), doc("/a.b/", "B", "a.b")];
        let tree = NamespaceTree::build(&root_doc(), &docs, ConflictPolicy::Overwrite).unwrap();

        let a = tree.root().find("root.a").unwrap();
        assert_eq!(child_namespaces(a), vec!["root.a.b"]);

        let b = tree.root().find("root.a.b").unwrap();
        assert!(b.resolved);
        assert_eq!(b.id, "/a.b/");
        assert_eq!(b.label, "B");
        assert_eq!(child_namespaces(b), vec!["root.a.b.c"]);
        assert_eq!(tree.root().node_count(), 4);
    }

    #[test]
    fn one_node_per_namespace_and_deterministic() {
        let docs = vec![
            doc("/x/", "X", "x"),
            doc("/x.y/", "Y", "x.y"),
            doc("/x.z/", "Z", "x z"),
            doc("/w/", "W", "w"),
        ];
        let first = NamespaceTree::build(&root_doc(), &docs, ConflictPolicy::Overwrite).unwrap();
        let second = NamespaceTree::build(&root_doc(), &docs, ConflictPolicy::Overwrite).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.root().node_count(), 5);
        assert_eq!(child_namespaces(first.root()), vec!["root.x", "root.w"]);
        assert_eq!(child_namespaces(first.root().find("root.x").unwrap()), vec!["root.x.y", "root.x.z"]);
    }

    #[test]
    fn skips_root_and_namespaceless_documents() {
        let mut loose = doc("/loose/", "Loose", "");
        loose.namespace = None;
        let docs = vec![root_doc(), loose, doc("/empty/", "Empty", " . ")];
        let tree = NamespaceTree::build(&root_doc(), &docs, ConflictPolicy::Overwrite).unwrap();
        assert_eq!(tree.root().node_count(), 1);
    }

    #[test]
    fn leading_root_segment_is_implicit() {
        let docs = vec![doc("/child/", "Child", "root.child")];
        let tree = NamespaceTree::build(&root_doc(), &docs, ConflictPolicy::Overwrite).unwrap();
        assert_eq!(child_namespaces(tree.root()), vec!["root.child"]);
    }

    #[test]
    fn conflict_policies() {
        let docs = vec![doc("/first/", "First", "a"), doc("/second/", "Second", "a")];

        let overwrite = NamespaceTree::build(&root_doc(), &docs, ConflictPolicy::Overwrite).unwrap();
        assert_eq!(overwrite.root().find("root.a").unwrap().id, "/second/");

        let keep = NamespaceTree::build(&root_doc(), &docs, ConflictPolicy::KeepFirst).unwrap();
        assert_eq!(keep.root().find("root.a").unwrap().id, "/first/");

        let err = NamespaceTree::build(&root_doc(), &docs, ConflictPolicy::Error).unwrap_err();
        assert!(matches!(err, Error::NamespaceConflict { ref namespace, .. } if namespace == "root.a"));
    }

    #[test]
    fn placeholder_label_humanizes_leaf() {
        assert_eq!(placeholder_label("root.blank"), "blank");
        assert_eq!(placeholder_label("root.missing-lvl"), "missing lvl");
        assert_eq!(placeholder_label("root"), "root");
    }
}

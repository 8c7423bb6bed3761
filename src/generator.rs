//! One generation pass: select documents, build whichever graphs are enabled.

use crate::config::Config;
use crate::error::Error;
use crate::lineage;
use crate::link_index::LinkIndex;
use crate::neighbors;
use crate::net_web::{self, NetWebGraph, ReferenceFilter};
use crate::site::Site;
use crate::tree::NamespaceTree;
use crate::tree_graph::{self, NestedTreeNode, TreeGraph};
use crate::types::{Document, GraphKind};

/// Output of one pass. `None` means the graph kind is disabled; `Some(Err)`
/// means it was enabled but could not be built. One failing graph never
/// prevents the other.
#[derive(Debug)]
pub struct GeneratedGraphs {
    /// Decorated net-web graph.
    pub net_web: Option<Result<NetWebGraph, Error>>,
    /// Decorated tree graph.
    pub tree: Option<Result<TreeGraph, Error>>,
}

impl GeneratedGraphs {
    /// Errors of the graphs that were enabled but failed.
    pub fn errors(&self) -> Vec<&Error> {
        let net_web = self.net_web.as_ref().and_then(|r| return r.as_ref().err());
        let tree = self.tree.as_ref().and_then(|r| return r.as_ref().err());
        return net_web.into_iter().chain(tree).collect();
    }
}

/// Builds both graphs from one site under one config.
pub struct Generator<'a> {
    /// Settings for this pass.
    config: &'a Config,
}

impl<'a> Generator<'a> {
    /// Create a generator bound to `config`.
    pub const fn new(config: &'a Config) -> Self {
        return Self { config };
    }

    /// Run the pass. Returns `None` when the whole core is disabled.
    pub fn generate(&self, site: &Site) -> Option<GeneratedGraphs> {
        if self.config.is_disabled() {
            tracing::debug!("graph generation disabled");
            return None;
        }

        let documents = self.select_documents(&site.documents);
        if documents.is_empty() {
            tracing::warn!("no documents to process");
        }

        let net_web = self
            .config
            .net_web_enabled()
            .then(|| return self.net_web(&documents, site.link_index.as_ref()));
        let tree = self.config.tree_enabled().then(|| return self.tree(&documents));

        return Some(GeneratedGraphs { net_web, tree });
    }

    /// Markdown documents whose type is not excluded, in host order.
    pub fn select_documents(&self, documents: &[Document]) -> Vec<Document> {
        return documents
            .iter()
            .filter(|d| return self.config.is_markdown(d.extension.as_deref()))
            .filter(|d| return !self.config.is_excluded(&d.doc_type))
            .cloned()
            .collect();
    }

    /// Build and decorate the net-web graph.
    ///
    /// # Errors
    ///
    /// Returns `Error::MissingDependency` if no link index was supplied.
    pub fn net_web(&self, documents: &[Document], link_index: Option<&LinkIndex>) -> Result<NetWebGraph, Error> {
        let index = link_index.ok_or(Error::MissingDependency {
            collaborator: "link index",
            graph: GraphKind::NetWeb,
        })?;
        if index.is_empty() {
            tracing::warn!("link index is empty, net-web graph will have no links");
        }
        tracing::debug!("link index covers {} documents", index.len());
        let filter = ReferenceFilter {
            attributes: self.config.use_attrs(),
            forelinks: self.config.use_links(),
        };

        let raw = net_web::build(
            documents,
            index,
            |doc_type| return self.config.is_excluded(doc_type),
            filter,
            self.config.base_url(),
        );
        tracing::info!("net-web graph: {} nodes, {} links", raw.nodes.len(), raw.links.len());
        return Ok(neighbors::decorate_graph(&raw));
    }

    /// Build, flatten and decorate the tree graph.
    ///
    /// # Errors
    ///
    /// Returns `Error::MissingDependency` if no document has namespace `root`,
    /// or `Error::NamespaceConflict` under the `error` conflict policy.
    pub fn tree(&self, documents: &[Document]) -> Result<TreeGraph, Error> {
        let tree = self.namespace_tree(documents)?;
        let flat = tree_graph::serialize(tree.root(), self.config.base_url());
        tracing::info!("tree graph: {} nodes, {} links", flat.nodes.len(), flat.links.len());
        return Ok(lineage::decorate_graph(&flat));
    }

    /// Build the tree and render it in the legacy nested form.
    ///
    /// # Errors
    ///
    /// Same as [`Generator::tree`].
    pub fn nested_tree(&self, documents: &[Document]) -> Result<NestedTreeNode, Error> {
        let tree = self.namespace_tree(documents)?;
        return Ok(tree_graph::serialize_nested(tree.root(), self.config.base_url()));
    }

    /// Locate the root document and build the namespace tree.
    ///
    /// # Errors
    ///
    /// Same as [`Generator::tree`].
    fn namespace_tree(&self, documents: &[Document]) -> Result<NamespaceTree, Error> {
        let root_doc = Site::root_document(documents).ok_or(Error::MissingDependency {
            collaborator: "root document (namespace `root`)",
            graph: GraphKind::Tree,
        })?;
        return NamespaceTree::build(root_doc, documents, self.config.conflict_policy());
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
    use crate::types::DocumentLinks;

    fn doc(url: &str, title: &str, doc_type: &str, namespace: Option<&str>) -> Document {
        return Document {
            doc_type: doc_type.to_string(),
            extension: Some(".md".to_string()),
            namespace: namespace.map(str::to_string),
            title: title.to_string(),
            url: url.to_string(),
        };
    }

    fn ghost_site() -> Site {
        let mut index = LinkIndex::new();
        index.insert("/child/", DocumentLinks { missing: vec!["ghost".to_string()], references: Vec::new() });
        return Site {
            documents: vec![
                doc("/root/", "Root", "notes", Some("root")),
                doc("/child/", "Child", "notes", Some("root.child")),
            ],
            link_index: Some(index),
        };
    }

    #[test]
    fn end_to_end_root_child_ghost() {
        let config = Config::default();
        let graphs = Generator::new(&config).generate(&ghost_site()).unwrap();

        let tree = graphs.tree.unwrap().unwrap();
        assert_eq!(tree.nodes.len(), 2);
        assert!(tree.nodes.iter().all(|n| !n.url.is_empty()));
        assert_eq!(tree.links.len(), 1);
        let edge = tree.links.first().unwrap();
        assert_eq!((edge.source.as_str(), edge.target.as_str()), ("/root/", "/child/"));

        let web = graphs.net_web.unwrap().unwrap();
        let ghost = web.nodes.iter().find(|n| n.id == "ghost").unwrap();
        assert_eq!((ghost.url.as_str(), ghost.label.as_str()), ("", "ghost"));
        assert!(web.nodes.iter().any(|n| n.id == "/child/"));
        assert_eq!(web.links.len(), 1);
        let link = web.links.first().unwrap();
        assert_eq!((link.source.as_str(), link.target.as_str()), ("/child/", "ghost"));
        assert_eq!(ghost.neighbors.nodes, vec!["/child/"]);
    }

    #[test]
    fn disabled_core_produces_nothing() {
        let config = Config::parse("[graph]\nenabled = false\n").unwrap();
        assert!(Generator::new(&config).generate(&ghost_site()).is_none());
    }

    #[test]
    fn disabled_graph_kind_is_skipped() {
        let config = Config::parse("[graph.tree]\nenabled = false\n").unwrap();
        let graphs = Generator::new(&config).generate(&ghost_site()).unwrap();
        assert!(graphs.tree.is_none());
        assert!(graphs.net_web.unwrap().is_ok());
    }

    #[test]
    fn missing_link_index_fails_only_the_net_web() {
        let mut site = ghost_site();
        site.link_index = None;
        let config = Config::default();
        let graphs = Generator::new(&config).generate(&site).unwrap();

        assert!(matches!(
            graphs.net_web,
            Some(Err(Error::MissingDependency { graph: GraphKind::NetWeb, .. }))
        ));
        assert!(graphs.tree.as_ref().unwrap().is_ok());
        assert_eq!(graphs.errors().len(), 1);
    }

    #[test]
    fn missing_root_fails_only_the_tree() {
        let mut site = ghost_site();
        site.documents.remove(0);
        let config = Config::default();
        let graphs = Generator::new(&config).generate(&site).unwrap();

        assert!(matches!(graphs.tree, Some(Err(Error::MissingDependency { graph: GraphKind::Tree, .. }))));
        assert!(graphs.net_web.unwrap().is_ok());
    }

    #[test]
    fn excluded_types_leave_both_graphs() {
        let mut site = ghost_site();
        site.documents.push(doc("/2020/12/08/one-post/", "One Post", "posts", Some("one-post")));
        site.documents.push(doc("/one-page/", "One Page", "pages", Some("one-page")));
        if let Some(index) = site.link_index.as_mut() {
            index.insert("/2020/12/08/one-post/", DocumentLinks { missing: vec!["elsewhere".to_string()], references: Vec::new() });
        }
        let config = Config::parse("[graph]\nexclude = [\"posts\"]\n").unwrap();
        let graphs = Generator::new(&config).generate(&site).unwrap();

        let post = "/2020/12/08/one-post/";
        let web = graphs.net_web.unwrap().unwrap();
        assert!(web.nodes.iter().all(|n| n.id != post && n.id != "elsewhere"));
        assert!(web.links.iter().all(|l| l.source != post && l.target != post));
        assert!(web.nodes.iter().any(|n| n.id == "/one-page/"));

        let tree = graphs.tree.unwrap().unwrap();
        assert!(tree.nodes.iter().all(|n| n.id != post));
        assert!(tree.links.iter().all(|l| l.source != post && l.target != post));
    }

    #[test]
    fn non_markdown_documents_are_ignored() {
        let mut site = ghost_site();
        let mut feed = doc("/feed.xml", "Feed", "pages", Some("feed"));
        feed.extension = Some(".xml".to_string());
        site.documents.push(feed);
        let config = Config::default();
        let selected = Generator::new(&config).select_documents(&site.documents);
        assert_eq!(selected.len(), 2);
    }

    #[test]
    fn nested_tree_for_legacy_consumers() {
        let config = Config::default();
        let site = ghost_site();
        let nested = Generator::new(&config).nested_tree(&site.documents).unwrap();
        assert_eq!(nested.namespace, "root");
        assert_eq!(nested.children.first().unwrap().id, "/child/");
    }
}

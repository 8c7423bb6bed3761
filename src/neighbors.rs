//! Neighbor decoration of the net-web graph.

use std::collections::HashMap;

use crate::net_web::{GraphLink, GraphNode, NetWebGraph};

/// Return copies of `nodes` with `neighbors` filled in from `links`.
///
/// Every link adds its target to the source's neighbor ids and its source to
/// the target's, and is listed on both endpoints. Duplicate links produce
/// duplicate entries. Links naming an unknown id are ignored.
pub fn decorate(nodes: &[GraphNode], links: &[GraphLink]) -> Vec<GraphNode> {
    let mut decorated = nodes.to_vec();
    let mut position: HashMap<&str, usize> = HashMap::new();
    for (index, node) in nodes.iter().enumerate() {
        position.entry(node.id.as_str()).or_insert(index);
    }

    for link in links {
        let (Some(&source), Some(&target)) =
            (position.get(link.source.as_str()), position.get(link.target.as_str()))
        else {
            tracing::debug!("link {} -> {} names an unknown node", link.source, link.target);
            continue;
        };

        if let Some(node) = decorated.get_mut(source) {
            node.neighbors.nodes.push(link.target.clone());
            node.neighbors.links.push(link.clone());
        }
        if let Some(node) = decorated.get_mut(target) {
            node.neighbors.nodes.push(link.source.clone());
            node.neighbors.links.push(link.clone());
        }
    }

    return decorated;
}

/// Decorate a whole net-web graph.
pub fn decorate_graph(graph: &NetWebGraph) -> NetWebGraph {
    return NetWebGraph {
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
    use crate::net_web::Neighbors;

    fn node(id: &str) -> GraphNode {
        return GraphNode {
            id: id.to_string(),
            url: id.to_string(),
            label: id.to_string(),
            neighbors: Neighbors::default(),
        };
    }

    fn link(source: &str, target: &str) -> GraphLink {
        return GraphLink { source: source.to_string(), target: target.to_string() };
    }

    fn find<'a>(nodes: &'a [GraphNode], id: &str) -> &'a GraphNode {
        return nodes.iter().find(|n| n.id == id).unwrap();
    }

    #[test]
    fn adjacency_is_undirected() {
        let nodes = vec![node("/a/"), node("/b/"), node("/c/")];
        let links = vec![link("/a/", "/b/"), link("/c/", "/a/")];
        let decorated = decorate(&nodes, &links);

        assert_eq!(find(&decorated, "/a/").neighbors.nodes, vec!["/b/", "/c/"]);
        assert_eq!(find(&decorated, "/a/").neighbors.links, links);
        assert_eq!(find(&decorated, "/b/").neighbors.nodes, vec!["/a/"]);
        assert_eq!(find(&decorated, "/c/").neighbors.links, vec![link("/c/", "/a/")]);
    }

    #[test]
    fn every_link_is_symmetric() {
        let nodes = vec![node("/a/"), node("/b/"), node("ghost")];
        let links = vec![link("/a/", "/b/"), link("/b/", "ghost"), link("/a/", "ghost")];
        let decorated = decorate(&nodes, &links);
        for l in &links {
            assert!(find(&decorated, &l.source).neighbors.nodes.contains(&l.target));
            assert!(find(&decorated, &l.target).neighbors.nodes.contains(&l.source));
        }
    }

    #[test]
    fn duplicate_links_duplicate_neighbors() {
        let nodes = vec![node("/a/"), node("/b/")];
        let links = vec![link("/a/", "/b/"), link("/a/", "/b/")];
        let decorated = decorate(&nodes, &links);
        assert_eq!(find(&decorated, "/b/").neighbors.nodes, vec!["/a/", "/a/"]);
        assert_eq!(find(&decorated, "/b/").neighbors.links.len(), 2);
    }

    #[test]
    fn unknown_endpoints_are_ignored_and_input_untouched() {
        let nodes = vec![node("/a/")];
        let decorated = decorate(&nodes, &[link("/a/", "/gone/")]);
        assert!(find(&decorated, "/a/").neighbors.nodes.is_empty());
        assert!(nodes.first().unwrap().neighbors.nodes.is_empty());
    }
}

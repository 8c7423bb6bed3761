//! Graph data for static-site documents.
//!
//! Two independent pipelines over one document set:
//!
//! - **tree**: dotted namespaces (`a.b.c`) become a single-rooted tree with
//!   placeholder nodes for levels that have no document, flattened to nodes
//!   and parent→child edges, then decorated with lineage and siblings.
//! - **net-web**: link index references become a node/link graph with
//!   placeholder nodes for missing targets, then decorated with neighbors.
//!
//! Both run as pure in-memory passes; [`output`] writes the results as
//! `graph-tree.json` and `graph-net-web.json`.

pub mod config;
pub mod error;
pub mod generator;
pub mod lineage;
pub mod link_index;
pub mod neighbors;
pub mod net_web;
pub mod normalize;
pub mod output;
pub mod site;
pub mod tree;
pub mod tree_graph;
pub mod types;

pub use config::Config;
pub use error::Error;
pub use generator::{GeneratedGraphs, Generator};
pub use site::Site;

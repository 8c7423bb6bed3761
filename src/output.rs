//! Writing generated graphs to the site output directory.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::Config;
use crate::error::Error;
use crate::generator::GeneratedGraphs;

/// File name of the net-web graph under the assets path.
pub const NET_WEB_FILE_NAME: &str = "graph-net-web.json";

/// File name of the tree graph under the assets path.
pub const TREE_FILE_NAME: &str = "graph-tree.json";

/// Directory under `out_dir` that mirrors the configured assets path.
pub fn assets_dir(out_dir: &Path, config: &Config) -> PathBuf {
    let assets = config.assets_path();
    return out_dir.join(assets.trim_start_matches('/'));
}

/// Directory under `out_dir` that mirrors the configured scripts path.
pub fn scripts_dir(out_dir: &Path, config: &Config) -> PathBuf {
    let scripts = config.scripts_path();
    return out_dir.join(scripts.trim_start_matches('/'));
}

/// Copy the client renderer script into the scripts directory, keeping its
/// file name. Returns the path written.
///
/// # Errors
///
/// Returns `Error::ScriptNotFound` if `script` is not an existing file,
/// or `Error::Io` if the copy fails.
pub fn install_script(out_dir: &Path, config: &Config, script: &Path) -> Result<PathBuf, Error> {
    let Some(file_name) = script.file_name().filter(|_| return script.is_file()) else {
        return Err(Error::ScriptNotFound { path: script.to_path_buf() });
    };
    let dir = scripts_dir(out_dir, config);
    std::fs::create_dir_all(&dir)?;
    let path = dir.join(file_name);
    std::fs::copy(script, &path)?;
    tracing::debug!("installed {}", path.display());
    return Ok(path);
}

/// Write every successfully built graph as JSON under the assets directory.
/// Graphs that are disabled or failed are skipped. Returns the paths written.
///
/// # Errors
///
/// Returns `Error::Io` if a directory or file cannot be written,
/// or `Error::Json` if serialization fails.
pub fn write_graphs(out_dir: &Path, config: &Config, graphs: &GeneratedGraphs) -> Result<Vec<PathBuf>, Error> {
    let dir = assets_dir(out_dir, config);
    let mut written = Vec::new();

    if let Some(Ok(net_web)) = &graphs.net_web {
        written.push(write_json(&dir, NET_WEB_FILE_NAME, net_web)?);
    }
    if let Some(Ok(tree)) = &graphs.tree {
        written.push(write_json(&dir, TREE_FILE_NAME, tree)?);
    }

    return Ok(written);
}

/// Serialize `value` compactly into `dir/file_name`, creating `dir` as needed.
///
/// # Errors
///
/// Returns `Error::Io` on filesystem failures or `Error::Json` on serialization failure.
pub fn write_json<T: Serialize>(dir: &Path, file_name: &str, value: &T) -> Result<PathBuf, Error> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(file_name);
    let content = serde_json::to_string(value)?;
    std::fs::write(&path, content)?;
    tracing::debug!("wrote {}", path.display());
    return Ok(path);
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
    use crate::net_web::NetWebGraph;
    use crate::tree_graph::TreeGraph;
    use crate::types::GraphKind;

    #[test]
    fn writes_only_successful_graphs() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::parse("[graph.path]\nassets = \"/custom_assets_path\"\n").unwrap();
        let graphs = GeneratedGraphs {
            net_web: Some(Err(Error::MissingDependency { collaborator: "link index", graph: GraphKind::NetWeb })),
            tree: Some(Ok(TreeGraph::default())),
        };

        let written = write_graphs(dir.path(), &config, &graphs).unwrap();

        let tree_path = dir.path().join("custom_assets_path").join(TREE_FILE_NAME);
        assert_eq!(written, vec![tree_path.clone()]);
        assert_eq!(std::fs::read_to_string(tree_path).unwrap(), r#"{"nodes":[],"links":[]}"#);
        assert!(!dir.path().join("custom_assets_path").join(NET_WEB_FILE_NAME).exists());
    }

    #[test]
    fn script_lands_under_scripts_path() {
        let src = tempfile::tempdir().unwrap();
        let script = src.path().join("docgraph.js");
        std::fs::write(&script, "// renderer").unwrap();
        let out = tempfile::tempdir().unwrap();
        let config = Config::parse("[graph.path]\nassets = \"/static\"\nscripts = \"scripts\"\n").unwrap();

        let path = install_script(out.path(), &config, &script).unwrap();

        assert_eq!(path, out.path().join("static/scripts/docgraph.js"));
        assert_eq!(std::fs::read_to_string(path).unwrap(), "// renderer");
    }

    #[test]
    fn missing_script_is_reported() {
        let out = tempfile::tempdir().unwrap();
        let err = install_script(out.path(), &Config::default(), &out.path().join("nope.js")).unwrap_err();
        assert!(matches!(err, Error::ScriptNotFound { .. }));
        assert!(!scripts_dir(out.path(), &Config::default()).exists());
    }

    #[test]
    fn default_assets_location() {
        let dir = tempfile::tempdir().unwrap();
        let graphs = GeneratedGraphs { net_web: Some(Ok(NetWebGraph::default())), tree: None };
        write_graphs(dir.path(), &Config::default(), &graphs).unwrap();
        assert!(dir.path().join("assets").join(NET_WEB_FILE_NAME).exists());
    }
}

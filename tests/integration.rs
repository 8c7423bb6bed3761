#![allow(
    clippy::implicit_return,
    clippy::indexing_slicing,
    clippy::missing_docs_in_private_items,
    clippy::missing_panics_doc,
    clippy::unwrap_used,
    reason = "tests"
)]

use std::path::Path;
use std::process::Command;

use serde_json::Value;

fn build(fixture: &str, out: &Path) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_docgraph"))
        .arg("build")
        .args(["--root", &Path::new("tests/fixtures").join(fixture).to_string_lossy()])
        .args(["--out", &out.to_string_lossy()])
        .output()
        .unwrap()
}

fn read_json(path: &Path) -> Value {
    let content = std::fs::read_to_string(path).unwrap();
    serde_json::from_str(&content).unwrap()
}

fn find<'a>(items: &'a Value, key: &str, value: &str) -> &'a Value {
    items
        .as_array()
        .unwrap()
        .iter()
        .find(|n| n[key] == value)
        .unwrap_or_else(|| panic!("no item with {key} == {value}"))
}

#[test]
fn build_writes_both_graphs() {
    let out = tempfile::tempdir().unwrap();
    let result = build("garden", out.path());
    assert!(
        result.status.success(),
        "build failed: {}",
        String::from_utf8_lossy(&result.stderr)
    );
    assert!(out.path().join("assets/graph-net-web.json").exists());
    assert!(out.path().join("assets/graph-tree.json").exists());
}

#[test]
fn tree_graph_matches_namespaces() {
    let out = tempfile::tempdir().unwrap();
    build("garden", out.path());
    let tree = read_json(&out.path().join("assets/graph-tree.json"));

    let root = find(&tree["nodes"], "namespace", "root");
    assert_eq!(root["id"], "/docs_tree/root/");
    assert_eq!(root["id"], root["url"]);
    assert_eq!(root["label"], "Root");
    assert_eq!(root["level"], 0);
    assert_eq!(
        root["relatives"]["nodes"],
        serde_json::json!([
            "/one-page/",
            "/2020/12/08/one-post/",
            "root.blank",
            "/docs_tree/blank.missing-lvl/",
            "/docs_tree/second-level/",
            "/docs_tree/second-level.third-level/"
        ])
    );
    assert_eq!(root["relatives"]["links"].as_array().unwrap().len(), 6);

    let second = find(&tree["nodes"], "namespace", "root.second-level");
    assert_eq!(second["id"], "/docs_tree/second-level/");
    assert_eq!(second["parent"], "/docs_tree/root/");
    assert_eq!(
        second["siblings"],
        serde_json::json!(["/one-page/", "/2020/12/08/one-post/", "root.blank"])
    );

    let blank = find(&tree["nodes"], "namespace", "root.blank");
    assert_eq!(blank["id"], "root.blank");
    assert_eq!(blank["label"], "blank");
    assert_eq!(blank["url"], "");

    let edge = find(&tree["links"], "target", "/docs_tree/second-level/");
    assert_eq!(edge["source"], "/docs_tree/root/");

    let drafts = tree["nodes"].as_array().unwrap().iter().any(|n| n["id"] == "/drafts/wip/");
    assert!(!drafts, "excluded type leaked into the tree");
}

#[test]
fn net_web_graph_has_links_and_missing_nodes() {
    let out = tempfile::tempdir().unwrap();
    build("garden", out.path());
    let web = read_json(&out.path().join("assets/graph-net-web.json"));

    let link_doc = find(&web["nodes"], "id", "/docs_net_web/link/");
    assert_eq!(link_doc["label"], "Untyped Link");
    assert_eq!(link_doc["url"], "/docs_net_web/link/");
    assert_eq!(link_doc["neighbors"]["nodes"], serde_json::json!(["/docs_net_web/blank.a/"]));
    assert_eq!(
        link_doc["neighbors"]["links"],
        serde_json::json!([{"source": "/docs_net_web/link/", "target": "/docs_net_web/blank.a/"}])
    );

    let missing = find(&web["nodes"], "id", "missing.doc");
    assert_eq!(missing["label"], "missing.doc");
    assert_eq!(missing["url"], "");

    let missing_link = find(&web["links"], "source", "/docs_net_web/link.missing-doc/");
    assert_eq!(missing_link["target"], "missing.doc");

    let nodes = web["nodes"].as_array().unwrap();
    assert!(nodes.iter().all(|n| n["id"] != "/drafts/wip/" && n["id"] != "/feed.xml"));
    assert_eq!(web["links"].as_array().unwrap().len(), 2);
}

#[test]
fn missing_link_index_fails_net_web_but_writes_tree() {
    let out = tempfile::tempdir().unwrap();
    let result = build("unlinked", out.path());
    assert!(!result.status.success());
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(stderr.contains("net-web"), "unexpected stderr: {stderr}");
    assert!(out.path().join("assets/graph-tree.json").exists());
    assert!(!out.path().join("assets/graph-net-web.json").exists());
}

#[test]
fn disabled_config_writes_nothing() {
    let out = tempfile::tempdir().unwrap();
    let result = build("disabled", out.path());
    assert!(result.status.success());
    assert!(!out.path().join("assets").exists());
}

#[test]
fn print_nested_tree() {
    let result = Command::new(env!("CARGO_BIN_EXE_docgraph"))
        .args(["print", "tree", "--nested", "--root", "tests/fixtures/unlinked"])
        .output()
        .unwrap();
    assert!(result.status.success(), "print failed: {}", String::from_utf8_lossy(&result.stderr));
    let nested: Value = serde_json::from_slice(&result.stdout).unwrap();
    assert_eq!(nested["namespace"], "root");
    assert_eq!(nested["children"][0]["id"], "/child/");
    assert_eq!(nested["children"][0]["children"], serde_json::json!([]));
}

#[test]
fn help_lists_commands() {
    let result = Command::new(env!("CARGO_BIN_EXE_docgraph")).arg("--help").output().unwrap();
    let stdout = String::from_utf8_lossy(&result.stdout);
    assert!(stdout.contains("build"));
    assert!(stdout.contains("print"));
}

#[test]
fn explicit_config_overrides_root_config() {
    let out = tempfile::tempdir().unwrap();
    let result = Command::new(env!("CARGO_BIN_EXE_docgraph"))
        .arg("build")
        .args(["--root", "tests/fixtures/disabled"])
        .args(["--config", "tests/fixtures/garden/docgraph.toml"])
        .args(["--out", &out.path().to_string_lossy()])
        .output()
        .unwrap();
    // the disabled fixture's own config would have written nothing
    assert!(out.path().join("assets/graph-tree.json").exists(), "{}", String::from_utf8_lossy(&result.stderr));
}

#[test]
fn missing_explicit_config_is_an_error() {
    let result = Command::new(env!("CARGO_BIN_EXE_docgraph"))
        .args(["print", "tree", "--root", "tests/fixtures/unlinked", "--config", "tests/fixtures/nope.toml"])
        .output()
        .unwrap();
    assert!(!result.status.success());
    assert!(String::from_utf8_lossy(&result.stderr).contains("config not found"));
}

#[test]
fn print_respects_disabled_config() {
    let result = Command::new(env!("CARGO_BIN_EXE_docgraph"))
        .args(["print", "tree", "--root", "tests/fixtures/disabled"])
        .output()
        .unwrap();
    assert!(result.status.success());
    assert!(result.stdout.is_empty(), "unexpected stdout: {}", String::from_utf8_lossy(&result.stdout));
    assert!(String::from_utf8_lossy(&result.stderr).contains("disabled"));
}

#[test]
fn print_respects_disabled_graph_kind() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("docgraph.toml");
    std::fs::write(&config, "[graph.net_web]\nenabled = false\n").unwrap();
    let result = Command::new(env!("CARGO_BIN_EXE_docgraph"))
        .args(["print", "net-web", "--root", "tests/fixtures/garden"])
        .args(["--config", &config.to_string_lossy()])
        .output()
        .unwrap();
    assert!(result.status.success());
    assert!(result.stdout.is_empty());
}

#[test]
fn build_installs_client_script() {
    let src = tempfile::tempdir().unwrap();
    let script = src.path().join("docgraph.js");
    std::fs::write(&script, "// renderer").unwrap();
    let out = tempfile::tempdir().unwrap();
    let result = Command::new(env!("CARGO_BIN_EXE_docgraph"))
        .arg("build")
        .args(["--root", "tests/fixtures/garden"])
        .args(["--out", &out.path().to_string_lossy()])
        .args(["--script", &script.to_string_lossy()])
        .output()
        .unwrap();
    assert!(result.status.success(), "build failed: {}", String::from_utf8_lossy(&result.stderr));
    assert!(out.path().join("assets/js/docgraph.js").exists());
}

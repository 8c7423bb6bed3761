use std::path::Path;

use serde::Deserialize;

use crate::error::Error;
use crate::normalize::join_url_path;
use crate::tree::ConflictPolicy;

/// Config file looked up in the site root.
pub const CONFIG_FILE_NAME: &str = "docgraph.toml";

/// Assets path used when the config names none.
const DEFAULT_ASSETS_PATH: &str = "/assets";

/// Scripts directory, relative to the assets path, used when the config names none.
const DEFAULT_SCRIPTS_DIR: &str = "js";

/// Markdown extensions recognized when the config names none.
const DEFAULT_MARKDOWN_EXT: &str = "markdown,mkdown,mkdn,mkd,md";

/// Generation settings for one pass, loaded from `docgraph.toml`.
/// Built once and handed to every component by reference.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Parsed file contents; accessors apply the defaults.
    raw: DocgraphTomlConfig,
}

/// Raw TOML structure for `docgraph.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
struct DocgraphTomlConfig {
    #[serde(default, alias = "baseurl")]
    base_url: Option<String>,
    #[serde(default)]
    graph: GraphTomlConfig,
    #[serde(default)]
    markdown_ext: Option<String>,
}

/// The `[graph]` table.
#[derive(Debug, Clone, Default, Deserialize)]
struct GraphTomlConfig {
    #[serde(default)]
    assets_path: Option<String>,
    #[serde(default)]
    enabled: Option<bool>,
    #[serde(default)]
    exclude: Vec<String>,
    #[serde(default)]
    net_web: NetWebTomlConfig,
    #[serde(default)]
    path: PathTomlConfig,
    #[serde(default)]
    scripts_path: Option<String>,
    #[serde(default)]
    tree: TreeTomlConfig,
}

/// The `[graph.net_web]` table.
#[derive(Debug, Clone, Default, Deserialize)]
struct NetWebTomlConfig {
    #[serde(default)]
    enabled: Option<bool>,
    #[serde(default)]
    exclude: NetWebExcludeTomlConfig,
}

/// The `[graph.net_web.exclude]` table.
#[derive(Debug, Clone, Default, Deserialize)]
struct NetWebExcludeTomlConfig {
    #[serde(default)]
    attrs: Option<bool>,
    #[serde(default)]
    links: Option<bool>,
}

/// The `[graph.path]` table.
#[derive(Debug, Clone, Default, Deserialize)]
struct PathTomlConfig {
    #[serde(default)]
    assets: Option<String>,
    #[serde(default)]
    scripts: Option<String>,
}

/// The `[graph.tree]` table.
#[derive(Debug, Clone, Default, Deserialize)]
struct TreeTomlConfig {
    #[serde(default)]
    conflict: ConflictPolicy,
    #[serde(default)]
    enabled: Option<bool>,
}

impl Config {
    /// Load config from `docgraph.toml` in the given site root.
    /// Returns defaults (everything enabled) if the file doesn't exist.
    /// Returns an error if the file exists but is malformed; a config the
    /// user wrote is never silently replaced by defaults.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if reading fails (other than not-found),
    /// or `Error::TomlDe` if the TOML is malformed.
    pub fn load(root: &Path) -> Result<Self, Error> {
        let path = root.join(CONFIG_FILE_NAME);
        let content = match std::fs::read_to_string(&path) {
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(Error::Io(e)),
            Ok(c) => c,
        };
        return Self::parse(&content);
    }

    /// Load config from an explicitly named file, which must exist.
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigNotFound` if the file doesn't exist,
    /// `Error::Io` for other read failures, or `Error::TomlDe` if malformed.
    pub fn load_file(path: &Path) -> Result<Self, Error> {
        let content = match std::fs::read_to_string(path) {
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::ConfigNotFound { path: path.to_path_buf() });
            },
            Err(e) => return Err(Error::Io(e)),
            Ok(c) => c,
        };
        return Self::parse(&content);
    }

    /// Parse config from TOML content.
    ///
    /// # Errors
    ///
    /// Returns `Error::TomlDe` if the content is not valid config TOML.
    pub fn parse(content: &str) -> Result<Self, Error> {
        let raw: DocgraphTomlConfig = toml::from_str(content)?;
        if !raw.graph.exclude.is_empty() {
            tracing::debug!("excluded document types in graph: {:?}", raw.graph.exclude);
        }
        return Ok(Self { raw });
    }

    /// Where graph JSON files are written, relative to the output root.
    pub fn assets_path(&self) -> String {
        let custom = self.raw.graph.path.assets.as_ref().or(self.raw.graph.assets_path.as_ref());
        return custom.map_or_else(|| return DEFAULT_ASSETS_PATH.to_string(), Clone::clone);
    }

    /// Site base url; empty when the site is served from the domain root.
    pub fn base_url(&self) -> &str {
        return self.raw.base_url.as_deref().unwrap_or("");
    }

    /// Policy for two documents claiming the same namespace path.
    pub const fn conflict_policy(&self) -> ConflictPolicy {
        return self.raw.graph.tree.conflict;
    }

    /// Whether the whole core is switched off. Only an explicit `false` disables.
    pub fn is_disabled(&self) -> bool {
        return self.raw.graph.enabled == Some(false);
    }

    /// Whether documents of this type tag are left out of both graphs.
    pub fn is_excluded(&self, doc_type: &str) -> bool {
        return self.raw.graph.exclude.iter().any(|t| return t == doc_type);
    }

    /// Whether a document with this extension counts as markdown.
    /// Documents without an extension are assumed to be pre-filtered by the host.
    pub fn is_markdown(&self, extension: Option<&str>) -> bool {
        let Some(ext) = extension else {
            return true;
        };
        let ext = ext.trim_start_matches('.').to_lowercase();
        let list = self.raw.markdown_ext.as_deref().unwrap_or(DEFAULT_MARKDOWN_EXT);
        return list.split(',').any(|candidate| return candidate.trim().trim_start_matches('.') == ext);
    }

    /// Whether the net-web graph should be generated.
    pub fn net_web_enabled(&self) -> bool {
        return !self.is_disabled() && self.raw.graph.net_web.enabled != Some(false);
    }

    /// Where client scripts live. A custom value is joined onto the assets path.
    pub fn scripts_path(&self) -> String {
        let custom = self.raw.graph.path.scripts.as_ref().or(self.raw.graph.scripts_path.as_ref());
        let dir = custom.map_or(DEFAULT_SCRIPTS_DIR, String::as_str);
        return join_url_path(&self.assets_path(), dir);
    }

    /// Whether the tree graph should be generated.
    pub fn tree_enabled(&self) -> bool {
        return !self.is_disabled() && self.raw.graph.tree.enabled != Some(false);
    }

    /// Whether attribute references feed the net-web graph.
    pub fn use_attrs(&self) -> bool {
        return self.raw.graph.net_web.exclude.attrs != Some(true);
    }

    /// Whether inline link references feed the net-web graph.
    pub fn use_links(&self) -> bool {
        return self.raw.graph.net_web.exclude.links != Some(true);
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

    #[test]
    fn defaults_enable_everything() {
        let config = Config::default();
        assert!(!config.is_disabled());
        assert!(config.net_web_enabled());
        assert!(config.tree_enabled());
        assert!(config.use_attrs());
        assert!(config.use_links());
        assert_eq!(config.assets_path(), "/assets");
        assert_eq!(config.scripts_path(), "/assets/js");
        assert_eq!(config.base_url(), "");
        assert_eq!(config.conflict_policy(), ConflictPolicy::Overwrite);
    }

    #[test]
    fn disabled_core_disables_both_graphs() {
        let config = Config::parse("[graph]\nenabled = false\n").unwrap();
        assert!(config.is_disabled());
        assert!(!config.net_web_enabled());
        assert!(!config.tree_enabled());
    }

    #[test]
    fn reads_nested_options() {
        let content = r#"
base_url = "/garden"

[graph]
exclude = ["pages", "posts"]

[graph.path]
assets = "/custom_assets_path"
scripts = "/custom_scripts_path"

[graph.net_web]
enabled = true

[graph.net_web.exclude]
attrs = true

[graph.tree]
enabled = false
conflict = "keep_first"
"#;
        let config = Config::parse(content).unwrap();
        assert_eq!(config.base_url(), "/garden");
        assert!(config.is_excluded("posts"));
        assert!(!config.is_excluded("notes"));
        assert_eq!(config.assets_path(), "/custom_assets_path");
        assert_eq!(config.scripts_path(), "/custom_assets_path/custom_scripts_path");
        assert!(!config.use_attrs());
        assert!(config.use_links());
        assert!(config.net_web_enabled());
        assert!(!config.tree_enabled());
        assert_eq!(config.conflict_policy(), ConflictPolicy::KeepFirst);
    }

    #[test]
    fn flat_path_aliases() {
        let config = Config::parse("[graph]\nassets_path = \"/a\"\nscripts_path = \"s\"\n").unwrap();
        assert_eq!(config.assets_path(), "/a");
        assert_eq!(config.scripts_path(), "/a/s");
    }

    #[test]
    fn markdown_extensions() {
        let config = Config::default();
        assert!(config.is_markdown(Some(".md")));
        assert!(config.is_markdown(Some(".MARKDOWN")));
        assert!(config.is_markdown(None));
        assert!(!config.is_markdown(Some(".html")));

        let custom = Config::parse("markdown_ext = \"txt\"\n").unwrap();
        assert!(custom.is_markdown(Some(".txt")));
        assert!(!custom.is_markdown(Some(".md")));
    }

    #[test]
    fn malformed_toml_is_an_error() {
        assert!(matches!(Config::parse("[graph\n"), Err(Error::TomlDe(_))));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert!(config.tree_enabled());
        assert!(matches!(
            Config::load_file(&dir.path().join("nope.toml")),
            Err(Error::ConfigNotFound { .. })
        ));
    }
}

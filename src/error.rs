/// Crate-level error types for docgraph generation.
use std::path::PathBuf;

use crate::types::GraphKind;

/// Every error names the file, graph, or namespace it concerns so the host
/// can print a useful diagnostic without a debugger.
///
/// Unresolved references and unresolved namespace segments are not errors:
/// they become placeholder nodes and a logged warning.
#[allow(clippy::error_impl_error, reason = "crate-level error type re-exported by the library")]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A config file path was given explicitly but does not exist.
    #[error("config not found: {}", path.display())]
    ConfigNotFound {
        /// Path to the missing config file.
        path: PathBuf,
    },

    /// Underlying I/O error from the filesystem.
    #[error("io: {0}")]
    Io(
        /// The wrapped I/O error.
        #[from]
        std::io::Error,
    ),

    /// JSON (de)serialization failed.
    #[error("json: {0}")]
    Json(
        /// The wrapped JSON error.
        #[from]
        serde_json::Error,
    ),

    /// Site manifest parsed but is not usable.
    #[error("site manifest corrupt: {reason}")]
    ManifestCorrupt {
        /// Description of the problem.
        reason: String,
    },

    /// Site manifest does not exist on disk.
    #[error("site manifest not found: {}", path.display())]
    ManifestNotFound {
        /// Path to the missing manifest.
        path: PathBuf,
    },

    /// A graph kind is enabled but the collaborator it depends on was not supplied.
    /// Fatal for that graph kind only.
    #[error("cannot generate the {graph} graph: {collaborator} was not supplied (supply it or disable the {graph} graph in the config)")]
    MissingDependency {
        /// Name of the missing collaborator.
        collaborator: &'static str,
        /// Graph kind that could not be generated.
        graph: GraphKind,
    },

    /// Two documents terminate at the same namespace path while the
    /// conflict policy is `error`.
    #[error("namespace conflict at `{namespace}`: {existing} and {incoming} both claim it")]
    NamespaceConflict {
        /// URL of the document already holding the node.
        existing: String,
        /// URL of the document that tried to claim it.
        incoming: String,
        /// Full path key, e.g. `root.a.b`.
        namespace: String,
    },

    /// Client script named for installation does not exist.
    #[error("script not found: {}", path.display())]
    ScriptNotFound {
        /// Path to the missing script.
        path: PathBuf,
    },

    /// TOML deserialization failed.
    #[error("toml deserialize: {0}")]
    TomlDe(
        /// The wrapped TOML deserialization error.
        #[from]
        toml::de::Error,
    ),
}

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use docgraph::types::GraphKind;
use docgraph::{Config, Error, Generator, Site, output};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "docgraph", about = "Namespace tree and reference web graphs for site documents")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate graph-tree.json and graph-net-web.json
    Build {
        /// Site root holding docgraph.toml
        #[arg(long, default_value = ".")]
        root: PathBuf,
        /// Config file to use instead of `<root>/docgraph.toml`
        #[arg(long)]
        config: Option<PathBuf>,
        /// Site manifest, relative to the root
        #[arg(long, default_value = "site.json")]
        manifest: PathBuf,
        /// Output directory, relative to the root
        #[arg(long, default_value = "_site")]
        out: PathBuf,
        /// Client renderer script to install under the scripts path
        #[arg(long)]
        script: Option<PathBuf>,
    },
    /// Print one graph as JSON to stdout
    Print {
        /// Config file to use instead of `<root>/docgraph.toml`
        #[arg(long)]
        config: Option<PathBuf>,
        /// Which graph to print
        graph: GraphArg,
        /// Site root holding docgraph.toml
        #[arg(long, default_value = ".")]
        root: PathBuf,
        /// Site manifest, relative to the root
        #[arg(long, default_value = "site.json")]
        manifest: PathBuf,
        /// Print the tree in the nested {id, namespace, label, children, url} form
        #[arg(long)]
        nested: bool,
    },
}

/// Graph selector for `print`.
#[derive(Clone, Copy, ValueEnum)]
enum GraphArg {
    /// The reference graph.
    NetWeb,
    /// The namespace tree.
    Tree,
}

impl GraphArg {
    /// The library graph kind this selector names.
    const fn kind(self) -> GraphKind {
        return match self {
            Self::NetWeb => GraphKind::NetWeb,
            Self::Tree => GraphKind::Tree,
        };
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| return EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Build { config, manifest, out, root, script } => load_config(&root, config.as_deref())
            .and_then(|c| return cmd_build(&c, &root, &manifest, &out, script.as_deref())),
        Commands::Print { config, graph, manifest, nested, root } => {
            load_config(&root, config.as_deref()).and_then(|c| return cmd_print(&c, graph, &root, &manifest, nested))
        },
    };

    return match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        },
    };
}

/// Load the explicit config file if one was named, else `docgraph.toml` in the root.
///
/// # Errors
///
/// Returns `Error::ConfigNotFound` for a named file that doesn't exist,
/// or the errors of [`Config::load`].
fn load_config(root: &Path, explicit: Option<&Path>) -> Result<Config, Error> {
    return match explicit {
        Some(path) => Config::load_file(path),
        None => Config::load(root),
    };
}

/// Generate every enabled graph and write it under the assets path, then
/// install the client script, if one was given, under the scripts path.
///
/// # Errors
///
/// Returns errors from manifest loading, from writing output, or
/// `Error::ScriptNotFound` for a named script that doesn't exist.
fn cmd_build(
    config: &Config,
    root: &Path,
    manifest: &Path,
    out: &Path,
    script: Option<&Path>,
) -> Result<ExitCode, Error> {
    let site = Site::read(&root.join(manifest))?;

    let Some(graphs) = Generator::new(config).generate(&site) else {
        eprintln!("Graph generation disabled, nothing written");
        return Ok(ExitCode::SUCCESS);
    };

    let out_dir = root.join(out);
    let mut written = output::write_graphs(&out_dir, config, &graphs)?;
    if let Some(script) = script {
        written.push(output::install_script(&out_dir, config, script)?);
    }
    for path in &written {
        eprintln!("Wrote {}", path.display());
    }

    let errors = graphs.errors();
    for e in &errors {
        eprintln!("error: {e}");
    }
    if errors.is_empty() {
        return Ok(ExitCode::SUCCESS);
    }
    return Ok(ExitCode::FAILURE);
}

/// Generate one graph and print it as pretty JSON. Prints nothing to stdout
/// when that graph kind is disabled.
///
/// # Errors
///
/// Returns errors from loading, `Error::MissingDependency` if the graph's
/// collaborator is absent, or `Error::Json` if rendering fails.
fn cmd_print(config: &Config, graph: GraphArg, root: &Path, manifest: &Path, nested: bool) -> Result<ExitCode, Error> {
    let enabled = match graph {
        GraphArg::NetWeb => config.net_web_enabled(),
        GraphArg::Tree => config.tree_enabled(),
    };
    if !enabled {
        eprintln!("{} graph disabled, nothing printed", graph.kind());
        return Ok(ExitCode::SUCCESS);
    }

    let site = Site::read(&root.join(manifest))?;
    let generator = Generator::new(config);
    let documents = generator.select_documents(&site.documents);

    let json = match graph {
        GraphArg::NetWeb => serde_json::to_string_pretty(&generator.net_web(&documents, site.link_index.as_ref())?)?,
        GraphArg::Tree if nested => serde_json::to_string_pretty(&generator.nested_tree(&documents)?)?,
        GraphArg::Tree => serde_json::to_string_pretty(&generator.tree(&documents)?)?,
    };
    println!("{json}");
    return Ok(ExitCode::SUCCESS);
}

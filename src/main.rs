use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use pathdiff::diff_paths;
use rayon::prelude::*;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use maestro_links::config::Settings;
use maestro_links::mdast;
use maestro_links::resolver::ResolutionContext;
use maestro_links::transform::transform_tree;
use maestro_links::tree::{read_tree, FileTreeNode, PathIndex};

/// Link file references in markdown documents against a project tree
#[derive(Parser, Debug)]
#[command(name = "maestro-links")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Project directory whose files form the tree
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// JSON file with a prebuilt file tree, used instead of reading --root
    #[arg(long)]
    tree: Option<PathBuf>,

    /// Absolute project root for absolute path mentions (defaults to --root)
    #[arg(long)]
    project_root: Option<String>,

    /// Tree-relative working directory for proximity ranking
    /// (defaults to each file's own directory)
    #[arg(long)]
    cwd: Option<String>,

    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Markdown files to transform
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

/// Directory of `file` relative to `root`, slash separated; empty when the
/// file is not under `root`.
fn cwd_for(root: &Path, file: &Path) -> String {
    file.canonicalize()
        .ok()
        .and_then(|file| file.parent().and_then(|dir| diff_paths(dir, root)))
        .and_then(|dir| dir.to_str().map(|d| d.replace('\\', "/")))
        .filter(|dir| !dir.starts_with(".."))
        .unwrap_or_default()
}

fn load_tree(cli: &Cli, root: &Path, settings: &Settings) -> anyhow::Result<Vec<FileTreeNode>> {
    match &cli.tree {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("Can't read tree file {}", path.display()))?;
            serde_json::from_str(&json)
                .with_context(|| format!("Invalid tree file {}", path.display()))
        }
        None => read_tree(root, settings.ignore_hidden),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let root = cli
        .root
        .canonicalize()
        .with_context(|| format!("Can't resolve root {}", cli.root.display()))?;
    let settings = Settings::new(&root)?;
    let tree = load_tree(&cli, &root, &settings)?;
    let index = PathIndex::new(&tree);

    let project_root = match &cli.project_root {
        Some(project_root) => project_root.clone(),
        None => root
            .to_str()
            .context("Can't convert root to str")?
            .to_string(),
    };

    info!(files = index.len(), root = %project_root, "indexed project tree");

    let documents = cli
        .files
        .par_iter()
        .map(|file| {
            let text = fs::read_to_string(file)
                .with_context(|| format!("Can't read {}", file.display()))?;
            let cwd = cli.cwd.clone().unwrap_or_else(|| cwd_for(&root, file));

            let ctx = ResolutionContext::new(&index, &cwd)
                .with_project_root(&project_root)
                .with_settings(settings.clone());

            let mut node = mdast::parse(&text)?;
            transform_tree(&mut node, &ctx);

            info!(file = %file.display(), cwd = %cwd, "transformed document");

            Ok::<_, anyhow::Error>(serde_json::json!({
                "file": file.display().to_string(),
                "tree": node,
            }))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    for document in documents {
        println!("{}", serde_json::to_string_pretty(&document)?);
    }

    anyhow::Ok(())
}

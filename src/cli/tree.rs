use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use locator_synth::{NodeId, Tree};
use serde::Serialize;
use tokio::fs;
use tracing::warn;

use super::output::{emit_structured, OutputFormat};

/// Attributes worth showing in the outline, most telling first
const OUTLINE_ATTRIBUTES: &[&str] = &[
    "resource-id",
    "id",
    "name",
    "content-desc",
    "label",
    "text",
];

#[derive(Args, Clone, Debug)]
pub struct TreeArgs {
    /// Hierarchy snapshot (XML page source)
    #[arg(short, long, value_name = "FILE")]
    pub source: PathBuf,
}

#[derive(Debug, Serialize)]
struct OutlineNode {
    path: String,
    tag: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    children: Vec<OutlineNode>,
}

pub async fn cmd_tree(args: TreeArgs, output: OutputFormat) -> Result<()> {
    let snapshot = fs::read_to_string(&args.source)
        .await
        .with_context(|| format!("Failed to read snapshot {}", args.source.display()))?;
    let tree = Tree::parse(&snapshot);
    let Some(root) = tree.root() else {
        warn!(source = %args.source.display(), "snapshot has no elements");
        return Ok(());
    };

    if !emit_structured(&outline(&tree, root), output)? {
        for id in tree.iter() {
            println!("{}", outline_line(&tree, id));
        }
    }
    Ok(())
}

fn outline(tree: &Tree, id: NodeId) -> OutlineNode {
    let node = tree.node(id);
    OutlineNode {
        path: node.path().to_string(),
        tag: node.tag().to_string(),
        children: node
            .children()
            .iter()
            .map(|child| outline(tree, *child))
            .collect(),
    }
}

fn outline_line(tree: &Tree, id: NodeId) -> String {
    let node = tree.node(id);
    let depth = if node.path().is_empty() {
        0
    } else {
        node.path().split('.').count()
    };
    let hint = OUTLINE_ATTRIBUTES
        .iter()
        .find_map(|attr| node.attr(attr).map(|value| format!(" {attr}=\"{value}\"")))
        .unwrap_or_default();
    let path = if node.path().is_empty() { "/" } else { node.path() };
    format!("{}{} [{}]{}", "  ".repeat(depth), node.tag(), path, hint)
}

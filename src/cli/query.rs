use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use locator_synth::{Query, Tree};
use serde::Serialize;
use tokio::fs;

use super::output::{emit_structured, OutputFormat};

#[derive(Args, Clone, Debug)]
pub struct QueryArgs {
    /// Hierarchy snapshot (XML page source)
    #[arg(short, long, value_name = "FILE")]
    pub source: PathBuf,

    /// Path query, e.g. //Button[@text="OK"]
    #[arg(short, long)]
    pub expr: String,
}

#[derive(Debug, Serialize)]
struct QueryMatch<'t> {
    path: &'t str,
    tag: &'t str,
    attributes: &'t BTreeMap<String, String>,
}

pub async fn cmd_query(args: QueryArgs, output: OutputFormat) -> Result<()> {
    let snapshot = fs::read_to_string(&args.source)
        .await
        .with_context(|| format!("Failed to read snapshot {}", args.source.display()))?;
    let query = Query::parse(&args.expr)
        .with_context(|| format!("Invalid path query '{}'", args.expr))?;

    let tree = Tree::parse(&snapshot);
    let matches: Vec<QueryMatch<'_>> = query
        .evaluate(&tree)
        .into_iter()
        .map(|id| {
            let node = tree.node(id);
            QueryMatch {
                path: node.path(),
                tag: node.tag(),
                attributes: node.attributes(),
            }
        })
        .collect();

    if !emit_structured(&matches, output)? {
        for found in &matches {
            let path = if found.path.is_empty() { "/" } else { found.path };
            println!("[{}] {}", path, found.tag);
        }
        println!("{} match(es) for {}", matches.len(), query.source());
    }
    Ok(())
}

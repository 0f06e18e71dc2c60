//! Android UiAutomator strategy
//!
//! UiSelector lookups only reach the last window in the dump, so only nodes
//! under the root's last child are addressable. Matching is done on a copy of
//! that subtree.

use tracing::debug;

use super::{quote, target_node};
use crate::errors::LocatorError;
use crate::oracle::Oracle;
use crate::tree::{NodeId, Tree};
use crate::types::{Candidate, LocatorStrategy, StrategyKind};

/// Snapshot attribute to UiSelector method, in search order
pub const UI_SELECTOR_ATTRIBUTES: &[(&str, &str)] = &[
    ("resource-id", "resourceId"),
    ("text", "text"),
    ("content-desc", "description"),
    ("class", "className"),
];

pub fn generate(oracle: &Oracle<'_>, target: NodeId) -> Result<Option<Candidate>, LocatorError> {
    let tree = oracle.tree();
    let node = target_node(tree, target, StrategyKind::ScopedSelector)?;

    let Some(scope) = tree.root().and_then(|root| tree.children(root).last().copied()) else {
        return Ok(None);
    };
    let top_level = node.path().split('.').next().unwrap_or_default();
    if tree.is_root(target) || top_level != tree.node(scope).path() {
        return Ok(None);
    }

    let (subtree, scoped_target) = match scoped(tree, scope, node.path()) {
        Ok(scoped) => scoped,
        Err(err) => {
            debug!(path = node.path(), %err, "node not addressable by UiSelector");
            return Ok(None);
        }
    };
    let scoped_oracle = Oracle::new(&subtree);
    let scoped_node = subtree.node(scoped_target);

    // (selector, matches in the subtree), fewest matches first wins
    let mut best: Option<(String, Vec<NodeId>)> = None;
    for (attr, method) in UI_SELECTOR_ATTRIBUTES {
        let Some(value) = scoped_node.attr(attr) else {
            continue;
        };
        let Some(literal) = quote(value) else {
            continue;
        };
        let matches = scoped_oracle.matches(&format!("//*[@{attr}={literal}]"));
        if !matches.contains(&scoped_target) {
            continue;
        }
        let selector = format!(
            "new UiSelector().{method}(\"{}\")",
            value.replace('\\', "\\\\").replace('"', "\\\"")
        );
        if best
            .as_ref()
            .map_or(true, |(_, fewest)| matches.len() < fewest.len())
        {
            best = Some((selector, matches));
        }
    }

    let Some((selector, matches)) = best else {
        return Ok(None);
    };
    if matches.len() == 1 {
        return Ok(Some(Candidate::unique(LocatorStrategy::UiAutomator, selector)));
    }
    let instance = matches
        .iter()
        .position(|id| *id == scoped_target)
        .unwrap_or_default();
    Ok(Some(Candidate::semi_unique(
        LocatorStrategy::UiAutomator,
        format!("{selector}.instance({instance})"),
        instance + 1,
    )))
}

fn scoped(tree: &Tree, scope: NodeId, path: &str) -> Result<(Tree, NodeId), LocatorError> {
    let subtree = tree.subtree(scope)?;
    let rebased = Tree::rebase_path(path, tree.node(scope).path())?;
    let target = subtree.find_by_path(&rebased)?;
    Ok((subtree, target))
}

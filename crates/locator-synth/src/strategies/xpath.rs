//! Generic path strategy: XPath-like queries, available on every platform
//!
//! Tiers run from most to least specific. The first unique hit is returned;
//! otherwise the first semi-unique hit becomes `(expr)[n]`, and with no hit at
//! all the node is addressed by its absolute position from the root.

use tracing::debug;

use super::{path_segment, quote, target_node};
use crate::errors::LocatorError;
use crate::oracle::{Oracle, Uniqueness};
use crate::tree::{Node, NodeId, Tree};
use crate::types::{Candidate, LocatorStrategy, StrategyKind};

/// Attributes that usually identify a node on their own
pub const LIKELY_UNIQUE_ATTRIBUTES: &[&str] =
    &["name", "content-desc", "id", "resource-id", "accessibility-id"];

/// Attributes that sometimes identify a node
pub const MAYBE_UNIQUE_ATTRIBUTES: &[&str] = &["label", "text", "value"];

pub fn generate(oracle: &Oracle<'_>, target: NodeId) -> Result<Candidate, LocatorError> {
    let tree = oracle.tree();
    let node = target_node(tree, target, StrategyKind::GenericPath)?;
    let tag = node.tag();
    let mut search = TierSearch::new(oracle, target);

    let likely = attribute_queries(node, LIKELY_UNIQUE_ATTRIBUTES);
    if let Some(expr) = search.run(&likely, false) {
        return Ok(Candidate::unique(LocatorStrategy::XPath, expr));
    }

    if search.fallback.is_none() {
        if let Some(expr) = search.run(&pair_queries(node), true) {
            return Ok(Candidate::unique(LocatorStrategy::XPath, expr));
        }
    }

    let maybe = attribute_queries(node, MAYBE_UNIQUE_ATTRIBUTES);
    if let Some(expr) = search.run(&maybe, false) {
        return Ok(Candidate::unique(LocatorStrategy::XPath, expr));
    }

    let tag_only = if tree.is_root(target) {
        format!("/{tag}")
    } else {
        format!("//{tag}")
    };
    if oracle.classify(&tag_only, target).is_unique() {
        return Ok(Candidate::unique(LocatorStrategy::XPath, tag_only));
    }

    if let Some((expr, ordinal)) = search.fallback {
        debug!(path = node.path(), %expr, ordinal, "using semi-unique path query");
        return Ok(Candidate::semi_unique(
            LocatorStrategy::XPath,
            format!("({expr})[{ordinal}]"),
            ordinal,
        ));
    }

    let expr = hierarchical_xpath(tree, target);
    if oracle.classify(&expr, target).is_unique() {
        Ok(Candidate::unique(LocatorStrategy::XPath, expr))
    } else {
        Err(LocatorError::strategy(
            StrategyKind::GenericPath.name(),
            format!("{expr} does not resolve to node {}", node.path()),
        ))
    }
}

/// Absolute `/tag[k]/...` path from the root down to `target`
pub fn hierarchical_xpath(tree: &Tree, target: NodeId) -> String {
    let mut segments = Vec::new();
    let mut current = Some(target);
    while let Some(id) = current {
        segments.push(path_segment(tree, id));
        current = tree.parent(id);
    }
    segments.reverse();
    segments.concat()
}

/// Walks candidate queries, remembering the first semi-unique one
struct TierSearch<'a, 't> {
    oracle: &'a Oracle<'t>,
    target: NodeId,
    /// expression and 1-based ordinal of the target among its matches
    fallback: Option<(String, usize)>,
}

impl<'a, 't> TierSearch<'a, 't> {
    fn new(oracle: &'a Oracle<'t>, target: NodeId) -> Self {
        Self {
            oracle,
            target,
            fallback: None,
        }
    }

    /// First unique query, if any. With `stop_at_fallback` the walk also ends
    /// at the first semi-unique query.
    fn run(&mut self, queries: &[String], stop_at_fallback: bool) -> Option<String> {
        for query in queries {
            match self.oracle.classify(query, self.target) {
                Uniqueness::Unique => return Some(query.clone()),
                Uniqueness::Ambiguous { position, .. } => {
                    if self.fallback.is_none() {
                        self.fallback = Some((query.clone(), position + 1));
                    }
                    if stop_at_fallback {
                        return None;
                    }
                }
                Uniqueness::NoMatch => {}
            }
        }
        None
    }
}

fn attribute_queries(node: &Node, attrs: &[&str]) -> Vec<String> {
    let tag = node.tag();
    attrs
        .iter()
        .filter_map(|attr| {
            let literal = quote(node.attr(attr)?)?;
            Some(format!("//{tag}[@{attr}={literal}]"))
        })
        .collect()
}

fn pair_queries(node: &Node) -> Vec<String> {
    let present: Vec<(&str, String)> = LIKELY_UNIQUE_ATTRIBUTES
        .iter()
        .chain(MAYBE_UNIQUE_ATTRIBUTES)
        .filter_map(|attr| Some((*attr, quote(node.attr(attr)?)?)))
        .collect();

    let tag = node.tag();
    let mut queries = Vec::new();
    for (i, (first, first_value)) in present.iter().enumerate() {
        for (second, second_value) in &present[i + 1..] {
            queries.push(format!(
                "//{tag}[@{first}={first_value} and @{second}={second_value}]"
            ));
        }
    }
    queries
}

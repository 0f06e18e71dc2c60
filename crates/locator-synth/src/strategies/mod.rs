//! Locator generation strategies
//!
//! Simple attributes run for every included node. The complex strategies
//! that apply are a static function of platform and context, see
//! [`PlatformKind::complex_strategies`](crate::platform::PlatformKind::complex_strategies):
//! 1. Predicate combination (iOS predicate string)
//! 2. Class path (iOS class chain)
//! 3. Scoped selector (Android UiSelector)
//! 4. Generic path (XPath-like, everywhere)

pub mod class_chain;
pub mod predicate;
pub mod simple;
pub mod ui_selector;
pub mod xpath;

use crate::errors::LocatorError;
use crate::oracle::Oracle;
use crate::tree::{Node, NodeId, Tree};
use crate::types::{Candidate, StrategyKind};

/// Run one complex strategy for `target`.
///
/// `Ok(None)` means the strategy has nothing to offer for this node; errors
/// are reserved for broken invariants and drop the node upstream.
pub fn generate(
    kind: StrategyKind,
    oracle: &Oracle<'_>,
    target: NodeId,
) -> Result<Option<Candidate>, LocatorError> {
    match kind {
        // produced per attribute by `simple::generate`
        StrategyKind::SimpleAttribute => Ok(None),
        StrategyKind::GenericPath => xpath::generate(oracle, target).map(Some),
        StrategyKind::ClassPath => class_chain::generate(oracle, target),
        StrategyKind::PredicateCombination => predicate::generate(oracle, target),
        StrategyKind::ScopedSelector => ui_selector::generate(oracle, target),
    }
}

pub(crate) fn target_node<'t>(
    tree: &'t Tree,
    target: NodeId,
    kind: StrategyKind,
) -> Result<&'t Node, LocatorError> {
    tree.get(target).ok_or_else(|| {
        LocatorError::strategy(
            kind.name(),
            format!("node #{} is not part of this tree", target.index()),
        )
    })
}

/// Path-query string literal for `value`, or `None` if it holds both quote kinds
pub(crate) fn quote(value: &str) -> Option<String> {
    if !value.contains('"') {
        Some(format!("\"{value}\""))
    } else if !value.contains('\'') {
        Some(format!("'{value}'"))
    } else {
        None
    }
}

/// `/tag`, with `[k]` when the parent has several children with this tag
pub(crate) fn path_segment(tree: &Tree, id: NodeId) -> String {
    let tag = tree.node(id).tag();
    match tree.sibling_ordinal(id) {
        Some(ordinal) => format!("/{tag}[{ordinal}]"),
        None => format!("/{tag}"),
    }
}

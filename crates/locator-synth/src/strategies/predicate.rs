//! iOS predicate string strategy

use super::target_node;
use crate::errors::LocatorError;
use crate::oracle::Oracle;
use crate::tree::NodeId;
use crate::types::{Candidate, LocatorStrategy, StrategyKind};

/// Attributes combined into predicate clauses, in order
pub const PREDICATE_ATTRIBUTES: &[&str] = &["name", "label", "value", "type"];

/// Grow a conjunction one attribute at a time until it is unique
pub fn generate(oracle: &Oracle<'_>, target: NodeId) -> Result<Option<Candidate>, LocatorError> {
    let node = target_node(oracle.tree(), target, StrategyKind::PredicateCombination)?;

    let mut clauses: Vec<String> = Vec::new();
    let mut conditions: Vec<String> = Vec::new();
    for attr in PREDICATE_ATTRIBUTES {
        let Some(value) = node.attr(attr).filter(|value| !value.contains('"')) else {
            continue;
        };
        clauses.push(format!("{attr} == \"{value}\""));
        conditions.push(format!("@{attr}=\"{value}\""));

        let query = format!("//*[{}]", conditions.join(" and "));
        if oracle.classify(&query, target).is_unique() {
            return Ok(Some(Candidate::unique(
                LocatorStrategy::PredicateString,
                clauses.join(" AND "),
            )));
        }
    }
    Ok(None)
}

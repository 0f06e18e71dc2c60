//! Path-query dialect
//!
//! A strict subset of XPath 1.0 location paths, enough to evaluate every
//! expression the strategies generate plus the usual hand-written queries:
//! - `/a/b[2]`, `//a`, `(//a[@x="y"])[3]/b`, `.`, `..`
//! - predicates: positions, `last()`, `@attr`, `@attr="v"`, `@attr!="v"`,
//!   `contains(@attr,"v")`, `starts-with(@attr,"v")`, `and`, `or`, `not(...)`

mod eval;
mod parser;

use crate::errors::QueryError;
use crate::tree::{NodeId, Tree};

/// A parsed path-query expression
#[derive(Debug, Clone)]
pub struct Query {
    source: String,
    expr: parser::PathExpr,
}

impl Query {
    pub fn parse(source: &str) -> Result<Self, QueryError> {
        let expr = parser::parse(source)?;
        Ok(Self {
            source: source.to_string(),
            expr,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Matching nodes in document order, without duplicates
    pub fn evaluate(&self, tree: &Tree) -> Vec<NodeId> {
        eval::evaluate(tree, &self.expr)
    }
}

/// Parse and evaluate in one go
pub fn select(tree: &Tree, source: &str) -> Result<Vec<NodeId>, QueryError> {
    Ok(Query::parse(source)?.evaluate(tree))
}

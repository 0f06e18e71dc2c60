//! Error types for locator synthesis

use thiserror::Error;

/// Locator error enumeration
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LocatorError {
    /// Node id or path does not address a node in the current tree
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    /// A node path could not be parsed or re-based
    #[error("Invalid node path: {0}")]
    InvalidPath(String),

    /// Strategy execution failed
    #[error("Strategy '{strategy}' failed: {reason}")]
    StrategyFailed { strategy: String, reason: String },
}

impl LocatorError {
    /// Build a strategy failure for the given strategy label
    pub fn strategy(strategy: &str, reason: impl Into<String>) -> Self {
        LocatorError::StrategyFailed {
            strategy: strategy.to_string(),
            reason: reason.into(),
        }
    }

    /// Get error severity (0=low, 1=medium, 2=high)
    pub fn severity(&self) -> u8 {
        match self {
            LocatorError::NodeNotFound(_) | LocatorError::InvalidPath(_) => 2,
            LocatorError::StrategyFailed { .. } => 1,
        }
    }
}

/// Path-query syntax error, carrying the byte offset where parsing stopped
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("empty expression")]
    Empty,

    #[error("unexpected character '{found}' at offset {offset}")]
    UnexpectedChar { found: char, offset: usize },

    #[error("unexpected end of expression, expected {expected}")]
    UnexpectedEnd { expected: &'static str },

    #[error("expected {expected} at offset {offset}")]
    Expected {
        expected: &'static str,
        offset: usize,
    },

    #[error("unterminated string literal starting at offset {0}")]
    UnterminatedLiteral(usize),

    #[error("invalid position {0}: positions are 1-based")]
    InvalidPosition(String),

    #[error("unsupported function '{0}'")]
    UnsupportedFunction(String),
}

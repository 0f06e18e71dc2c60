//! Locator synthesis - stable selectors from UI hierarchy snapshots
//!
//! This crate computes, for each element of a mobile accessibility tree, a
//! ranked set of selector expressions that re-identify that element:
//! - Driver-native simple attributes (id, accessibility id, class name)
//! - XPath-like path queries with uniqueness checks
//! - iOS class chains and predicate strings
//! - Android UiSelector expressions scoped to the active window
//!
//! Everything is a pure function of the snapshot and the [`LocatorRequest`].

pub mod errors;
pub mod filter;
pub mod oracle;
pub mod platform;
pub mod query;
pub mod ranker;
pub mod resolver;
pub mod strategies;
pub mod tree;
pub mod types;

pub use errors::*;
pub use filter::FilterConfig;
pub use oracle::{Oracle, Uniqueness};
pub use platform::{AppContext, PlatformKind};
pub use query::{select, Query};
pub use resolver::{generate_locators, LocatorResolver};
pub use tree::{Node, NodeId, Tree};
pub use types::*;

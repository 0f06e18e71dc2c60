//! Uniqueness oracle
//!
//! Answers "does this expression select exactly one node, and if not, where
//! does my target sit among the matches?" Malformed expressions are treated as
//! matching nothing so strategies can move on to their next attempt.

use tracing::debug;

use crate::query::select;
use crate::tree::{NodeId, Tree};

/// Outcome of checking one candidate expression for one target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Uniqueness {
    /// Exactly one match, and it is the target
    Unique,
    /// Several matches including the target; `position` is 0-based
    Ambiguous { position: usize, count: usize },
    /// No match, target not among the matches, or malformed expression
    NoMatch,
}

impl Uniqueness {
    pub fn is_unique(&self) -> bool {
        matches!(self, Uniqueness::Unique)
    }
}

/// Read-only view over one tree
#[derive(Debug, Clone, Copy)]
pub struct Oracle<'t> {
    tree: &'t Tree,
}

impl<'t> Oracle<'t> {
    pub fn new(tree: &'t Tree) -> Self {
        Self { tree }
    }

    pub fn tree(&self) -> &'t Tree {
        self.tree
    }

    /// All matches of `expression`; malformed expressions match nothing
    pub fn matches(&self, expression: &str) -> Vec<NodeId> {
        match select(self.tree, expression) {
            Ok(nodes) => nodes,
            Err(err) => {
                debug!(%expression, %err, "candidate expression rejected");
                Vec::new()
            }
        }
    }

    pub fn count(&self, expression: &str) -> usize {
        self.matches(expression).len()
    }

    /// Classify `expression` with respect to `target`
    pub fn classify(&self, expression: &str, target: NodeId) -> Uniqueness {
        let matches = self.matches(expression);
        match matches.as_slice() {
            [only] if *only == target => Uniqueness::Unique,
            [] | [_] => Uniqueness::NoMatch,
            _ => match matches.iter().position(|id| *id == target) {
                Some(position) => Uniqueness::Ambiguous {
                    position,
                    count: matches.len(),
                },
                None => Uniqueness::NoMatch,
            },
        }
    }

    /// True if fewer than two nodes carry `attr` with exactly `value`.
    ///
    /// `"` is stripped from the value so the query stays well-formed; an empty
    /// tree has no sibling data and answers true.
    pub fn is_attr_value_unique(&self, attr: &str, value: &str) -> bool {
        if self.tree.is_empty() {
            return true;
        }
        let sanitized = value.replace('"', "");
        self.count(&format!(r#"//*[@{attr}="{sanitized}"]"#)) < 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = r#"<hierarchy>
  <Button id="x" text="Go" />
  <Button id="x" text="Stop" />
  <Label text="say &quot;hi&quot;" />
</hierarchy>"#;

    #[test]
    fn test_classify() {
        let tree = Tree::parse(SOURCE);
        let oracle = Oracle::new(&tree);
        let first = tree.find_by_path("0").unwrap();
        let second = tree.find_by_path("1").unwrap();

        assert_eq!(
            oracle.classify(r#"//Button[@text="Go"]"#, first),
            Uniqueness::Unique
        );
        assert_eq!(
            oracle.classify(r#"//Button[@id="x"]"#, second),
            Uniqueness::Ambiguous {
                position: 1,
                count: 2
            }
        );
        // single match that is some other node
        assert_eq!(
            oracle.classify(r#"//Button[@text="Go"]"#, second),
            Uniqueness::NoMatch
        );
        assert_eq!(oracle.classify("//Button[", first), Uniqueness::NoMatch);
    }

    #[test]
    fn test_attr_value_uniqueness() {
        let tree = Tree::parse(SOURCE);
        let oracle = Oracle::new(&tree);
        assert!(!oracle.is_attr_value_unique("id", "x"));
        assert!(oracle.is_attr_value_unique("text", "Go"));
        // quotes are stripped, so this asks for `say hi`, which nobody has
        assert!(oracle.is_attr_value_unique("text", r#"say "hi""#));
    }

    #[test]
    fn test_empty_tree_is_optimistic() {
        let tree = Tree::empty();
        assert!(Oracle::new(&tree).is_attr_value_unique("id", "anything"));
    }
}

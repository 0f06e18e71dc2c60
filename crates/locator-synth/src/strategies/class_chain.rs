//! iOS class chain strategy

use super::{path_segment, target_node};
use crate::errors::LocatorError;
use crate::oracle::{Oracle, Uniqueness};
use crate::platform::IOS_APPLICATION_TAG;
use crate::tree::{Node, NodeId};
use crate::types::{Candidate, LocatorStrategy, StrategyKind};

/// Attributes usable inside a class chain segment
pub const CLASS_CHAIN_ATTRIBUTES: &[&str] = &["name", "label", "value"];

pub fn generate(oracle: &Oracle<'_>, target: NodeId) -> Result<Option<Candidate>, LocatorError> {
    let tree = oracle.tree();
    let node = target_node(tree, target, StrategyKind::ClassPath)?;
    if node.tag() == IOS_APPLICATION_TAG || tree.is_root(target) {
        return Ok(None);
    }

    let mut segments = Vec::new();
    let mut ordinal = None;
    let mut current = target;
    loop {
        let node = tree.node(current);
        if node.tag() == IOS_APPLICATION_TAG || tree.is_root(current) {
            break;
        }
        if let Some(anchor) = anchored_segment(oracle, current, node) {
            if current == target {
                ordinal = anchor.ordinal;
            }
            segments.push(anchor.segment);
            break;
        }
        segments.push(path_segment(tree, current));
        match tree.parent(current) {
            Some(parent) => current = parent,
            None => break,
        }
    }

    segments.reverse();
    let chain = format!("**{}", segments.concat());
    Ok(Some(match ordinal {
        Some(n) => Candidate::semi_unique(LocatorStrategy::ClassChain, chain, n),
        None => Candidate::unique(LocatorStrategy::ClassChain, chain),
    }))
}

struct Anchor {
    segment: String,
    /// 1-based index appended to the segment when the attribute is shared
    ordinal: Option<usize>,
}

/// `/tag[`attr == "value"`]` for the first attribute that pins the node down
/// on its own, else the first shared one with `[n]` appended
fn anchored_segment(oracle: &Oracle<'_>, id: NodeId, node: &Node) -> Option<Anchor> {
    let tag = node.tag();
    let mut fallback = None;
    for attr in CLASS_CHAIN_ATTRIBUTES {
        let Some(value) = node.attr(attr).filter(|value| !value.contains('"')) else {
            continue;
        };
        let segment = format!("/{tag}[`{attr} == \"{value}\"`]");
        match oracle.classify(&format!(r#"//{tag}[@{attr}="{value}"]"#), id) {
            Uniqueness::Unique => {
                return Some(Anchor {
                    segment,
                    ordinal: None,
                })
            }
            Uniqueness::Ambiguous { position, .. } if fallback.is_none() => {
                fallback = Some(Anchor {
                    segment: format!("{segment}[{}]", position + 1),
                    ordinal: Some(position + 1),
                });
            }
            Uniqueness::Ambiguous { .. } | Uniqueness::NoMatch => {}
        }
    }
    fallback
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::Tree;
    use crate::types::MatchClass;

    const SOURCE: &str = r#"<AppiumAUT>
  <XCUIElementTypeApplication name="Settings">
    <XCUIElementTypeWindow>
      <XCUIElementTypeOther>
        <XCUIElementTypeButton name="General" label="General"/>
        <XCUIElementTypeButton label="Back"/>
        <XCUIElementTypeButton label="Back"/>
        <XCUIElementTypeStaticText/>
      </XCUIElementTypeOther>
    </XCUIElementTypeWindow>
  </XCUIElementTypeApplication>
</AppiumAUT>"#;

    fn chain_for(tree: &Tree, path: &str) -> Option<String> {
        let oracle = Oracle::new(tree);
        generate(&oracle, tree.find_by_path(path).unwrap())
            .unwrap()
            .map(|candidate| candidate.expression)
    }

    #[test]
    fn test_unique_attribute_anchors_chain() {
        let tree = Tree::parse(SOURCE);
        assert_eq!(
            chain_for(&tree, "0.0.0.0").as_deref(),
            Some(r#"**/XCUIElementTypeButton[`name == "General"`]"#)
        );
    }

    #[test]
    fn test_semi_unique_attribute_gets_index() {
        let tree = Tree::parse(SOURCE);
        let oracle = Oracle::new(&tree);
        let candidate = generate(&oracle, tree.find_by_path("0.0.0.2").unwrap())
            .unwrap()
            .unwrap();
        assert_eq!(
            candidate.expression,
            r#"**/XCUIElementTypeButton[`label == "Back"`][2]"#
        );
        assert_eq!(candidate.match_class, MatchClass::SemiUnique(2));
    }

    #[test]
    fn test_later_unique_attribute_beats_shared_one() {
        let tree = Tree::parse(
            r#"<AppiumAUT>
  <XCUIElementTypeApplication>
    <XCUIElementTypeCell name="a" label="first"/>
    <XCUIElementTypeCell name="a" label="second"/>
  </XCUIElementTypeApplication>
</AppiumAUT>"#,
        );
        let oracle = Oracle::new(&tree);
        let candidate = generate(&oracle, tree.find_by_path("0.1").unwrap())
            .unwrap()
            .unwrap();
        assert_eq!(
            candidate.expression,
            r#"**/XCUIElementTypeCell[`label == "second"`]"#
        );
        assert!(candidate.is_unique());
    }

    #[test]
    fn test_indexed_ancestor_keeps_chain_unique() {
        let tree = Tree::parse(
            r#"<AppiumAUT>
  <XCUIElementTypeApplication>
    <XCUIElementTypeCell name="row"><XCUIElementTypeImage/></XCUIElementTypeCell>
    <XCUIElementTypeCell name="row"><XCUIElementTypeImage/></XCUIElementTypeCell>
  </XCUIElementTypeApplication>
</AppiumAUT>"#,
        );
        let oracle = Oracle::new(&tree);
        let candidate = generate(&oracle, tree.find_by_path("0.1.0").unwrap())
            .unwrap()
            .unwrap();
        assert_eq!(
            candidate.expression,
            r#"**/XCUIElementTypeCell[`name == "row"`][2]/XCUIElementTypeImage"#
        );
        assert!(candidate.is_unique());
    }

    #[test]
    fn test_walks_up_to_the_application() {
        let tree = Tree::parse(SOURCE);
        assert_eq!(
            chain_for(&tree, "0.0.0.3").as_deref(),
            Some("**/XCUIElementTypeWindow/XCUIElementTypeOther/XCUIElementTypeStaticText")
        );
    }

    #[test]
    fn test_application_and_root_are_skipped() {
        let tree = Tree::parse(SOURCE);
        assert_eq!(chain_for(&tree, "0"), None);
        assert_eq!(chain_for(&tree, ""), None);
    }
}

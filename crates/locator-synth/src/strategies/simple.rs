//! Simple attribute strategy: driver-native lookups by a single attribute

use crate::oracle::Oracle;
use crate::platform::{AppContext, PlatformKind};
use crate::tree::Node;
use crate::types::{Candidate, LocatorStrategy};

/// Attribute to strategy mapping, in priority order. Order matters: the first
/// attribute that yields a unique value claims its label, so `id` shadows
/// `resource-id` and `name` shadows `content-desc`.
pub const SIMPLE_ATTRIBUTE_STRATEGIES: &[(&str, LocatorStrategy)] = &[
    ("name", LocatorStrategy::AccessibilityId),
    ("content-desc", LocatorStrategy::AccessibilityId),
    ("id", LocatorStrategy::Id),
    ("rntestid", LocatorStrategy::Id),
    ("resource-id", LocatorStrategy::Id),
    ("class", LocatorStrategy::ClassName),
    ("type", LocatorStrategy::ClassName),
];

/// One candidate per label whose attribute is present and tree-wide unique.
/// The first attribute that fills a label wins.
pub fn generate(
    oracle: &Oracle<'_>,
    node: &Node,
    platform: PlatformKind,
    context: AppContext,
) -> Vec<Candidate> {
    let accessibility_allowed = context.is_native() && platform.supports_accessibility_id();
    let mut found: Vec<Candidate> = Vec::new();

    for (attr, strategy) in SIMPLE_ATTRIBUTE_STRATEGIES {
        if *strategy == LocatorStrategy::AccessibilityId && !accessibility_allowed {
            continue;
        }
        if found.iter().any(|candidate| candidate.strategy == *strategy) {
            continue;
        }
        let Some(value) = node.attr(attr) else {
            continue;
        };
        if oracle.is_attr_value_unique(attr, value) {
            found.push(Candidate::unique(*strategy, value));
        }
    }

    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::Tree;

    fn labels(candidates: &[Candidate]) -> Vec<(&'static str, &str)> {
        candidates
            .iter()
            .map(|c| (c.strategy.name(), c.expression.as_str()))
            .collect()
    }

    #[test]
    fn test_unique_attributes_are_emitted() {
        let tree = Tree::parse(
            r#"<hierarchy>
  <android.widget.Button resource-id="com.app:id/ok" content-desc="ok" class="android.widget.Button"/>
  <android.widget.Button resource-id="com.app:id/cancel" class="android.widget.Button"/>
</hierarchy>"#,
        );
        let oracle = Oracle::new(&tree);
        let node = tree.node(tree.find_by_path("0").unwrap());
        let found = generate(&oracle, node, PlatformKind::Android, AppContext::Native);
        assert_eq!(
            labels(&found),
            vec![("accessibility id", "ok"), ("id", "com.app:id/ok")]
        );
    }

    #[test]
    fn test_accessibility_id_needs_native_support() {
        let tree = Tree::parse(r#"<hierarchy><Button name="go" id="go-btn"/></hierarchy>"#);
        let oracle = Oracle::new(&tree);
        let node = tree.node(tree.find_by_path("0").unwrap());

        let web = generate(&oracle, node, PlatformKind::Ios, AppContext::Web);
        assert_eq!(labels(&web), vec![("id", "go-btn")]);

        let other = generate(&oracle, node, PlatformKind::Other, AppContext::Native);
        assert_eq!(labels(&other), vec![("id", "go-btn")]);

        let ios = generate(&oracle, node, PlatformKind::Ios, AppContext::Native);
        assert_eq!(labels(&ios), vec![("accessibility id", "go"), ("id", "go-btn")]);
    }

    #[test]
    fn test_first_attribute_fills_label() {
        let tree = Tree::parse(
            r#"<AppiumAUT><XCUIElementTypeButton name="a" type="XCUIElementTypeButton"/></AppiumAUT>"#,
        );
        let oracle = Oracle::new(&tree);
        let node = tree.node(tree.find_by_path("0").unwrap());
        let found = generate(&oracle, node, PlatformKind::Ios, AppContext::Native);
        assert_eq!(
            labels(&found),
            vec![
                ("accessibility id", "a"),
                ("class name", "XCUIElementTypeButton")
            ]
        );
    }

    #[test]
    fn test_id_shadows_resource_id() {
        let tree = Tree::parse(
            r#"<hierarchy><Button id="ok-btn" resource-id="com.app:id/ok"/><Button/></hierarchy>"#,
        );
        let oracle = Oracle::new(&tree);
        let node = tree.node(tree.find_by_path("0").unwrap());
        let found = generate(&oracle, node, PlatformKind::Android, AppContext::Native);
        assert_eq!(labels(&found), vec![("id", "ok-btn")]);
    }

    #[test]
    fn test_shared_id_falls_through_to_resource_id() {
        let tree = Tree::parse(
            r#"<hierarchy><Button id="x" resource-id="com.app:id/ok"/><Button id="x"/></hierarchy>"#,
        );
        let oracle = Oracle::new(&tree);
        let node = tree.node(tree.find_by_path("0").unwrap());
        let found = generate(&oracle, node, PlatformKind::Android, AppContext::Native);
        assert_eq!(labels(&found), vec![("id", "com.app:id/ok")]);
    }

    #[test]
    fn test_duplicate_values_are_skipped() {
        let tree = Tree::parse(r#"<hierarchy><Button id="x"/><Button id="x"/></hierarchy>"#);
        let oracle = Oracle::new(&tree);
        let node = tree.node(tree.find_by_path("1").unwrap());
        assert!(generate(&oracle, node, PlatformKind::Other, AppContext::Native).is_empty());
    }
}

//! Candidate ranking and merging

use indexmap::IndexMap;

use crate::platform::PlatformKind;
use crate::types::{Candidate, LocatorStrategy};

/// Merge one node's candidates into a mapping ordered by platform priority.
///
/// `candidates` must be in discovery order: simple strategies first, then the
/// complex ones in dispatch order. The first candidate for a label is kept.
/// Labels missing from the priority list follow in discovery order.
pub fn rank(
    platform: PlatformKind,
    candidates: Vec<Candidate>,
) -> IndexMap<LocatorStrategy, String> {
    let mut discovered: IndexMap<LocatorStrategy, String> = IndexMap::new();
    for candidate in candidates {
        discovered
            .entry(candidate.strategy)
            .or_insert(candidate.expression);
    }

    let mut ranked = IndexMap::with_capacity(discovered.len());
    for strategy in platform.priority() {
        if let Some(expression) = discovered.shift_remove(strategy) {
            ranked.insert(*strategy, expression);
        }
    }
    ranked.extend(discovered);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(map: &IndexMap<LocatorStrategy, String>) -> Vec<&'static str> {
        map.keys().map(LocatorStrategy::name).collect()
    }

    #[test]
    fn test_ios_priority() {
        let ranked = rank(
            PlatformKind::Ios,
            vec![
                Candidate::unique(LocatorStrategy::AccessibilityId, "done"),
                Candidate::unique(LocatorStrategy::ClassName, "XCUIElementTypeButton"),
                Candidate::unique(LocatorStrategy::Id, "done-button"),
                Candidate::unique(LocatorStrategy::ClassChain, "**/XCUIElementTypeButton"),
                Candidate::unique(LocatorStrategy::XPath, "//XCUIElementTypeButton"),
            ],
        );
        assert_eq!(
            keys(&ranked),
            vec![
                "id",
                "accessibility id",
                "-ios class chain",
                "xpath",
                "class name"
            ]
        );
    }

    #[test]
    fn test_unlisted_labels_follow_in_discovery_order() {
        let ranked = rank(
            PlatformKind::Other,
            vec![
                Candidate::unique(LocatorStrategy::XPath, "//a"),
                Candidate::unique(LocatorStrategy::UiAutomator, "new UiSelector()"),
                Candidate::unique(LocatorStrategy::AccessibilityId, "a"),
                Candidate::unique(LocatorStrategy::Id, "a-id"),
            ],
        );
        assert_eq!(
            keys(&ranked),
            vec!["id", "xpath", "-android uiautomator", "accessibility id"]
        );
    }

    #[test]
    fn test_first_candidate_per_label_wins() {
        let ranked = rank(
            PlatformKind::Android,
            vec![
                Candidate::unique(LocatorStrategy::XPath, "//first"),
                Candidate::unique(LocatorStrategy::XPath, "//second"),
            ],
        );
        assert_eq!(ranked.get(&LocatorStrategy::XPath).unwrap(), "//first");
        assert!(rank(PlatformKind::Android, Vec::new()).is_empty());
    }
}

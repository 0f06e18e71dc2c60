//! Core types for locator synthesis

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::filter::FilterConfig;
use crate::platform::{AppContext, PlatformKind};
use crate::tree::Node;

/// The five strategy generators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyKind {
    /// Single attributes mapped straight onto driver strategies
    SimpleAttribute,
    /// XPath-like path query, applies everywhere
    GenericPath,
    /// iOS class chain
    ClassPath,
    /// iOS predicate string
    PredicateCombination,
    /// Android UiSelector, scoped to the last root child
    ScopedSelector,
}

impl StrategyKind {
    pub fn name(&self) -> &'static str {
        match self {
            StrategyKind::SimpleAttribute => "simple-attribute",
            StrategyKind::GenericPath => "generic-path",
            StrategyKind::ClassPath => "class-path",
            StrategyKind::PredicateCombination => "predicate-combination",
            StrategyKind::ScopedSelector => "scoped-selector",
        }
    }
}

/// Locator strategy label, as used by automation drivers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LocatorStrategy {
    #[serde(rename = "id")]
    Id,
    #[serde(rename = "accessibility id")]
    AccessibilityId,
    #[serde(rename = "class name")]
    ClassName,
    #[serde(rename = "xpath")]
    XPath,
    #[serde(rename = "-ios class chain")]
    ClassChain,
    #[serde(rename = "-ios predicate string")]
    PredicateString,
    #[serde(rename = "-android uiautomator")]
    UiAutomator,
}

impl LocatorStrategy {
    /// Get strategy name as string
    pub fn name(&self) -> &'static str {
        match self {
            LocatorStrategy::Id => "id",
            LocatorStrategy::AccessibilityId => "accessibility id",
            LocatorStrategy::ClassName => "class name",
            LocatorStrategy::XPath => "xpath",
            LocatorStrategy::ClassChain => "-ios class chain",
            LocatorStrategy::PredicateString => "-ios predicate string",
            LocatorStrategy::UiAutomator => "-android uiautomator",
        }
    }

    /// Generator that produces this label
    pub fn kind(&self) -> StrategyKind {
        match self {
            LocatorStrategy::Id | LocatorStrategy::AccessibilityId | LocatorStrategy::ClassName => {
                StrategyKind::SimpleAttribute
            }
            LocatorStrategy::XPath => StrategyKind::GenericPath,
            LocatorStrategy::ClassChain => StrategyKind::ClassPath,
            LocatorStrategy::PredicateString => StrategyKind::PredicateCombination,
            LocatorStrategy::UiAutomator => StrategyKind::ScopedSelector,
        }
    }
}

/// How precisely a candidate pins down its target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MatchClass {
    /// Selects exactly the target
    Unique,
    /// Selects several nodes; the target is the 1-based `n`th match
    SemiUnique(usize),
}

/// One generated selector for one node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub kind: StrategyKind,
    pub strategy: LocatorStrategy,
    pub expression: String,
    pub match_class: MatchClass,
}

impl Candidate {
    pub fn unique(strategy: LocatorStrategy, expression: impl Into<String>) -> Self {
        Self {
            kind: strategy.kind(),
            strategy,
            expression: expression.into(),
            match_class: MatchClass::Unique,
        }
    }

    pub fn semi_unique(
        strategy: LocatorStrategy,
        expression: impl Into<String>,
        ordinal: usize,
    ) -> Self {
        Self {
            kind: strategy.kind(),
            strategy,
            expression: expression.into(),
            match_class: MatchClass::SemiUnique(ordinal),
        }
    }

    pub fn is_unique(&self) -> bool {
        matches!(self.match_class, MatchClass::Unique)
    }
}

/// Read-only summary of the element a result belongs to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementSummary {
    pub tag_name: String,
    pub text: String,
    pub content_description: String,
    pub resource_id: String,
    pub clickable: bool,
    pub enabled: bool,
    pub displayed: bool,
    /// Ordinal path of the node in the snapshot it came from
    pub path: String,
}

impl ElementSummary {
    pub fn from_node(node: &Node) -> Self {
        let first_of = |names: &[&str]| {
            names
                .iter()
                .find_map(|name| node.attr(name))
                .unwrap_or_default()
                .to_string()
        };
        Self {
            tag_name: node.tag().to_string(),
            text: first_of(&["text", "label", "value"]),
            content_description: first_of(&["content-desc", "name"]),
            resource_id: first_of(&["resource-id", "id", "rntestid"]),
            clickable: node.is_truthy("clickable"),
            enabled: node.is_truthy("enabled"),
            displayed: node.is_truthy("displayed") || node.is_truthy("visible"),
            path: node.path().to_string(),
        }
    }
}

/// Ranked locators for one element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocatorResult {
    #[serde(flatten)]
    pub element: ElementSummary,
    pub locators: IndexMap<LocatorStrategy, String>,
}

impl LocatorResult {
    pub fn locator(&self, strategy: LocatorStrategy) -> Option<&str> {
        self.locators.get(&strategy).map(String::as_str)
    }
}

/// Everything one engine invocation needs besides the snapshot
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LocatorRequest {
    pub platform: PlatformKind,
    pub context: AppContext,
    pub filters: FilterConfig,
    /// Evaluate included nodes on the rayon pool
    pub parallel: bool,
}

impl LocatorRequest {
    pub fn new(platform: PlatformKind) -> Self {
        Self {
            platform,
            ..Self::default()
        }
    }

    pub fn with_context(mut self, context: AppContext) -> Self {
        self.context = context;
        self
    }

    pub fn with_filters(mut self, filters: FilterConfig) -> Self {
        self.filters = filters;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::Tree;

    #[test]
    fn test_locator_strategy_names() {
        assert_eq!(LocatorStrategy::Id.name(), "id");
        assert_eq!(LocatorStrategy::AccessibilityId.name(), "accessibility id");
        assert_eq!(LocatorStrategy::UiAutomator.kind(), StrategyKind::ScopedSelector);
        assert_eq!(LocatorStrategy::ClassName.kind(), StrategyKind::SimpleAttribute);
    }

    #[test]
    fn test_summary_from_android_node() {
        let tree = Tree::parse(
            r#"<hierarchy><android.widget.Button text="Sign in" content-desc="sign_in"
                resource-id="com.app:id/login" clickable="true" enabled="true"
                displayed="true"/></hierarchy>"#,
        );
        let node = tree.node(tree.find_by_path("0").unwrap());
        let summary = ElementSummary::from_node(node);
        assert_eq!(summary.tag_name, "android.widget.Button");
        assert_eq!(summary.text, "Sign in");
        assert_eq!(summary.content_description, "sign_in");
        assert_eq!(summary.resource_id, "com.app:id/login");
        assert!(summary.clickable && summary.enabled && summary.displayed);
        assert_eq!(summary.path, "0");
    }

    #[test]
    fn test_summary_from_ios_node() {
        let tree = Tree::parse(
            r#"<AppiumAUT><XCUIElementTypeButton name="done" label="Done"
                enabled="true" visible="true"/></AppiumAUT>"#,
        );
        let node = tree.node(tree.find_by_path("0").unwrap());
        let summary = ElementSummary::from_node(node);
        assert_eq!(summary.text, "Done");
        assert_eq!(summary.content_description, "done");
        assert_eq!(summary.resource_id, "");
        assert!(!summary.clickable);
        assert!(summary.displayed);
    }
}

//! Candidate node filtering

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::platform::PlatformKind;
use crate::tree::Node;

/// Synthetic wrapper tags around the real UI roots
pub const DEFAULT_EXCLUDED_TAGS: &[&str] = &["hierarchy", "AppiumAUT"];

/// Which nodes get locators at all
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FilterConfig {
    /// When non-empty, only these tags are considered
    pub include_tag_names: BTreeSet<String>,
    pub exclude_tag_names: BTreeSet<String>,
    /// When non-empty, at least one of these must be present
    pub require_attributes: BTreeSet<String>,
    pub min_attribute_count: usize,
    pub fetchable_only: bool,
    pub clickable_only: bool,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            include_tag_names: BTreeSet::new(),
            exclude_tag_names: DEFAULT_EXCLUDED_TAGS
                .iter()
                .map(|tag| tag.to_string())
                .collect(),
            require_attributes: BTreeSet::new(),
            min_attribute_count: 0,
            fetchable_only: false,
            clickable_only: false,
        }
    }
}

impl FilterConfig {
    pub fn include_tag(mut self, tag: impl Into<String>) -> Self {
        self.include_tag_names.insert(tag.into());
        self
    }

    pub fn exclude_tag(mut self, tag: impl Into<String>) -> Self {
        self.exclude_tag_names.insert(tag.into());
        self
    }

    pub fn require_attribute(mut self, attr: impl Into<String>) -> Self {
        self.require_attributes.insert(attr.into());
        self
    }

    pub fn with_min_attribute_count(mut self, count: usize) -> Self {
        self.min_attribute_count = count;
        self
    }

    pub fn with_fetchable_only(mut self, fetchable_only: bool) -> Self {
        self.fetchable_only = fetchable_only;
        self
    }

    pub fn with_clickable_only(mut self, clickable_only: bool) -> Self {
        self.clickable_only = clickable_only;
        self
    }

    /// Whether `node` gets locators. Never affects its descendants.
    pub fn should_include(&self, node: &Node, platform: PlatformKind) -> bool {
        let tag = node.tag();
        if !self.include_tag_names.is_empty() && !self.include_tag_names.contains(tag) {
            return false;
        }
        if self.exclude_tag_names.contains(tag) {
            return false;
        }
        if !self.require_attributes.is_empty()
            && !self
                .require_attributes
                .iter()
                .any(|attr| node.attr(attr).is_some())
        {
            return false;
        }
        if node.attributes().len() < self.min_attribute_count {
            return false;
        }
        if self.clickable_only && !node.is_truthy("clickable") {
            return false;
        }
        if self.fetchable_only && !is_interactable(node, platform) {
            return false;
        }
        true
    }
}

fn is_interactable(node: &Node, platform: PlatformKind) -> bool {
    let tag = node.tag();
    platform
        .interactable_tags()
        .iter()
        .any(|fragment| tag.contains(fragment))
        || node.is_truthy("clickable")
        || node.is_truthy("focusable")
}

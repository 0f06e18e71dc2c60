//! Platform kinds and their static tables

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{LocatorStrategy, StrategyKind};

/// Tag of the iOS application container; never an intermediate class-chain node
pub const IOS_APPLICATION_TAG: &str = "XCUIElementTypeApplication";

const ANDROID_INTERACTABLE_TAGS: &[&str] = &[
    "EditText",
    "Button",
    "ImageButton",
    "CheckBox",
    "RadioButton",
    "Switch",
    "ToggleButton",
    "Spinner",
    "SeekBar",
    "CheckedTextView",
];

const IOS_INTERACTABLE_TAGS: &[&str] = &[
    "XCUIElementTypeButton",
    "XCUIElementTypeTextField",
    "XCUIElementTypeSecureTextField",
    "XCUIElementTypeSwitch",
    "XCUIElementTypeSlider",
    "XCUIElementTypeLink",
    "XCUIElementTypeCell",
    "XCUIElementTypeSearchField",
    "XCUIElementTypeTextView",
    "XCUIElementTypeSegmentedControl",
    "XCUIElementTypePickerWheel",
];

const GENERIC_INTERACTABLE_TAGS: &[&str] = &["Button", "TextField", "Link", "Input"];

/// Which automation backend produced the snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformKind {
    /// XCUITest: predicate strings and class chains available
    Ios,
    /// UiAutomator2: scoped UiSelector expressions available
    Android,
    /// Anything else: path queries only
    #[default]
    Other,
}

impl PlatformKind {
    /// Map a platform or automation-name token; unknown tokens are `Other`
    pub fn from_token(token: &str) -> Self {
        match token.trim().to_ascii_lowercase().as_str() {
            "ios" | "xcuitest" | "tvos" => PlatformKind::Ios,
            "android" | "uiautomator2" | "uiautomator" => PlatformKind::Android,
            _ => PlatformKind::Other,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PlatformKind::Ios => "ios",
            PlatformKind::Android => "android",
            PlatformKind::Other => "other",
        }
    }

    /// Whether the accessibility id strategy exists on this platform
    pub fn supports_accessibility_id(&self) -> bool {
        matches!(self, PlatformKind::Ios | PlatformKind::Android)
    }

    /// Output ordering for the locator mapping
    pub fn priority(&self) -> &'static [LocatorStrategy] {
        match self {
            PlatformKind::Ios => &[
                LocatorStrategy::Id,
                LocatorStrategy::AccessibilityId,
                LocatorStrategy::PredicateString,
                LocatorStrategy::ClassChain,
                LocatorStrategy::XPath,
                LocatorStrategy::ClassName,
            ],
            PlatformKind::Android => &[
                LocatorStrategy::Id,
                LocatorStrategy::AccessibilityId,
                LocatorStrategy::XPath,
                LocatorStrategy::UiAutomator,
                LocatorStrategy::ClassName,
            ],
            PlatformKind::Other => &[
                LocatorStrategy::Id,
                LocatorStrategy::ClassName,
                LocatorStrategy::XPath,
            ],
        }
    }

    /// Complex strategies that apply, in the order they run
    pub fn complex_strategies(&self, context: AppContext) -> &'static [StrategyKind] {
        match (self, context) {
            (PlatformKind::Ios, AppContext::Native) => &[
                StrategyKind::PredicateCombination,
                StrategyKind::ClassPath,
                StrategyKind::GenericPath,
            ],
            (PlatformKind::Android, AppContext::Native) => {
                &[StrategyKind::ScopedSelector, StrategyKind::GenericPath]
            }
            _ => &[StrategyKind::GenericPath],
        }
    }

    /// Tag fragments that mark a node as interactable for `fetchableOnly`
    pub fn interactable_tags(&self) -> Vec<&'static str> {
        match self {
            PlatformKind::Ios => IOS_INTERACTABLE_TAGS.to_vec(),
            PlatformKind::Android => ANDROID_INTERACTABLE_TAGS.to_vec(),
            PlatformKind::Other => {
                let mut tags = ANDROID_INTERACTABLE_TAGS.to_vec();
                tags.extend_from_slice(IOS_INTERACTABLE_TAGS);
                for tag in GENERIC_INTERACTABLE_TAGS {
                    if !tags.contains(tag) {
                        tags.push(*tag);
                    }
                }
                tags
            }
        }
    }
}

impl fmt::Display for PlatformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Native app view or embedded web view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppContext {
    #[default]
    Native,
    Web,
}

impl AppContext {
    pub fn from_token(token: &str) -> Self {
        let lower = token.trim().to_ascii_lowercase();
        if lower.starts_with("webview") || lower == "web" {
            AppContext::Web
        } else {
            AppContext::Native
        }
    }

    pub fn is_native(&self) -> bool {
        matches!(self, AppContext::Native)
    }
}

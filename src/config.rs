//! Layered configuration: defaults, then YAML file, then environment
//!
//! Environment overrides use `LOCATOR_SYNTH__<SECTION>__<KEY>`. Path segments
//! match configuration keys case-insensitively with `_` and `-` ignored, so
//! `LOCATOR_SYNTH__FILTERS__CLICKABLE_ONLY=true` sets `filters.clickableOnly`.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use locator_synth::{AppContext, FilterConfig, LocatorRequest, PlatformKind};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

const ENV_PREFIX: &str = "LOCATOR_SYNTH__";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),

    #[error("unknown configuration key '{0}'")]
    UnknownKey(String),
}

/// Engine settings shared by every command
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    pub platform: PlatformKind,
    pub context: AppContext,
    pub parallel: bool,
    pub filters: FilterConfig,
}

impl Config {
    pub fn request(&self) -> LocatorRequest {
        LocatorRequest::new(self.platform)
            .with_context(self.context)
            .with_filters(self.filters.clone())
            .with_parallel(self.parallel)
    }
}

#[derive(Debug, Default)]
pub struct LoadOptions {
    pub paths: Vec<PathBuf>,
    pub include_env: bool,
}

impl LoadOptions {
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            paths: vec![path.into()],
            include_env: true,
        }
    }
}

pub fn load_with_options(options: &LoadOptions) -> Result<Config, ConfigError> {
    let vars: Vec<(String, String)> = if options.include_env {
        env::vars().collect()
    } else {
        Vec::new()
    };
    load_from(&options.paths, vars)
}

/// Apply file overlays, then `vars` overlays, on top of the defaults
pub fn load_from(
    paths: &[PathBuf],
    vars: impl IntoIterator<Item = (String, String)>,
) -> Result<Config, ConfigError> {
    let mut value = serde_json::to_value(Config::default()).map_err(invalid)?;

    for path in paths {
        if path.exists() {
            apply_overlays(&mut value, overlays_from_file(path)?)?;
        }
    }
    apply_overlays(&mut value, overlays_from_env(vars))?;

    serde_json::from_value(value).map_err(invalid)
}

struct Overlay {
    path: Vec<String>,
    value: Value,
}

fn overlays_from_file(path: &Path) -> Result<Vec<Overlay>, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }
    let yaml_value: serde_yaml::Value = serde_yaml::from_str(&content).map_err(invalid)?;
    let json_value = serde_json::to_value(yaml_value).map_err(invalid)?;
    Ok(flatten_value(json_value, Vec::new()))
}

fn overlays_from_env(vars: impl IntoIterator<Item = (String, String)>) -> Vec<Overlay> {
    let mut overlays = Vec::new();
    for (key, raw) in vars {
        let Some(stripped) = key.strip_prefix(ENV_PREFIX) else {
            continue;
        };
        let path: Vec<String> = stripped
            .split("__")
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
            .collect();
        if path.is_empty() {
            continue;
        }
        overlays.push(Overlay {
            path,
            value: parse_env_value(&raw),
        });
    }
    // env::vars order is unspecified
    overlays.sort_by(|a, b| a.path.cmp(&b.path));
    overlays
}

fn parse_env_value(raw: &str) -> Value {
    if raw.is_empty() {
        return Value::Null;
    }
    if let Ok(parsed) = serde_json::from_str::<Value>(raw) {
        return parsed;
    }
    Value::String(raw.to_string())
}

fn flatten_value(value: Value, prefix: Vec<String>) -> Vec<Overlay> {
    match value {
        Value::Object(map) => {
            let mut result = Vec::new();
            for (key, value) in map {
                let mut next = prefix.clone();
                next.push(key);
                result.extend(flatten_value(value, next));
            }
            result
        }
        other if !prefix.is_empty() => vec![Overlay {
            path: prefix,
            value: other,
        }],
        _ => Vec::new(),
    }
}

fn apply_overlays(target: &mut Value, overlays: Vec<Overlay>) -> Result<(), ConfigError> {
    for overlay in overlays {
        let dotted = overlay.path.join(".");
        let slot = locate(target, &overlay.path).ok_or(ConfigError::UnknownKey(dotted))?;
        *slot = coerce(slot, overlay.value);
    }
    Ok(())
}

fn locate<'v>(mut current: &'v mut Value, path: &[String]) -> Option<&'v mut Value> {
    for segment in path {
        let map: &mut Map<String, Value> = current.as_object_mut()?;
        let wanted = normalize_key(segment);
        let key = map.keys().find(|key| normalize_key(key) == wanted)?.clone();
        current = map.get_mut(&key)?;
    }
    Some(current)
}

/// Comma-separated strings fill list fields; null keeps the current value
fn coerce(current: &Value, value: Value) -> Value {
    match (current, value) {
        (_, Value::Null) => current.clone(),
        (Value::Array(_), Value::String(raw)) => Value::Array(
            raw.split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(|item| Value::String(item.to_string()))
                .collect(),
        ),
        (_, value) => value,
    }
}

fn normalize_key(key: &str) -> String {
    key.chars()
        .filter(|ch| !matches!(ch, '_' | '-'))
        .map(|ch| ch.to_ascii_lowercase())
        .collect()
}

fn invalid(err: impl std::fmt::Display) -> ConfigError {
    ConfigError::Invalid(err.to_string())
}

//! Configuration for the asset service and call defaults.
//!
//! A helper instance is configured once with where the asset service lives
//! and the defaults every call falls back to. Configuration comes from an
//! optional `assist.toml` merged over stock defaults, with command-line
//! flags merged over that.
//!
//! ## Configuration Options
//!
//! ```toml
//! assist_url = "https://assist.example.com"  # Base URL of the asset service
//! slug = "my-site"                           # Resource namespace
//!
//! [options]
//! group_size = 2            # Max entities per layout group
//! term_attr = "title"       # Term attribute holding the display label
//! term_parent_depth = 0     # Ancestors listed ahead of each term
//! term_prefix = ""          # Prepended to every term label
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::taxonomy::TermOptions;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Where the asset service lives, plus per-call defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AssistConfig {
    /// Base URL of the asset service, without the slug.
    pub assist_url: String,
    /// Resource namespace under the base URL.
    pub slug: String,
    pub options: Options,
}

impl AssistConfig {
    pub fn new(assist_url: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            assist_url: assist_url.into(),
            slug: slug.into(),
            options: Options::default(),
        }
    }

    /// Validate config values are usable for building URLs.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.assist_url.trim().is_empty() {
            return Err(ConfigError::Validation("assist_url must be set".into()));
        }
        if self.slug.trim().is_empty() {
            return Err(ConfigError::Validation("slug must be set".into()));
        }
        if self.options.group_size == 0 {
            return Err(ConfigError::Validation(
                "options.group_size must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Defaults applied when a call leaves the corresponding argument out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Options {
    pub group_size: usize,
    pub term_attr: String,
    pub term_parent_depth: usize,
    pub term_prefix: String,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            group_size: 2,
            term_attr: "title".to_string(),
            term_parent_depth: 0,
            term_prefix: String::new(),
        }
    }
}

impl Options {
    pub fn term_options(&self) -> TermOptions {
        TermOptions {
            attr: self.term_attr.clone(),
            parent_depth: self.term_parent_depth,
            prefix: self.term_prefix.clone(),
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(AssistConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// Tables merge key-by-key; any other overlay value replaces the base value.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Read a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file doesn't exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<AssistConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: AssistConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load `path` over stock defaults and validate the result.
pub fn load_config(path: &Path) -> Result<AssistConfig, ConfigError> {
    resolve_config(stock_defaults_value(), load_raw_config(path)?)
}

/// A fully-commented stock `assist.toml`, printed by `gen-config`.
pub fn stock_config_toml() -> &'static str {
    r##"# assist-media configuration
# ==========================
# assist_url and slug are required; everything under [options] is optional.
# Unknown keys will cause an error.

# Base URL of the asset service (no trailing slash needed).
assist_url = "https://assist.example.com"

# Resource namespace; every URL is built under {assist_url}/{slug}/.
slug = "my-site"

# ---------------------------------------------------------------------------
# Call defaults
# ---------------------------------------------------------------------------
[options]
# Maximum number of entities laid out in one row group.
group_size = 2

# Term attribute used as the display label.
term_attr = "title"

# Number of ancestor terms listed ahead of each term (0 = none).
term_parent_depth = 0

# Prefix added to every term label, e.g. "tag-".
term_prefix = ""
"##
}

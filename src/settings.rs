//! Transform settings: the key/value directives appended to asset URLs.
//!
//! Settings travel in two shapes. The string form is what templates and
//! config files carry (`"w:800;h:600"`, `"w_800,h_600"`); the mapping form
//! is what the URL builders work with. [`decode`] and [`encode`] convert
//! between them.
//!
//! ## String Grammar
//!
//! ```text
//! settings := token ((',' | ';') token)*
//! token    := key (':' | '_') value
//! ```
//!
//! Later tokens overwrite earlier ones for the same key, keeping the key at
//! the position it was first seen. Empty tokens and tokens with no separator
//! are dropped. The canonical encoded form always uses `:` and `;`.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// A single setting value.
///
/// Values decoded from strings are always [`SettingValue::Text`]; numbers
/// come from JSON/TOML input or from crop coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Flag(bool),
    Number(f64),
    Text(String),
}

impl SettingValue {
    /// Whether the value counts as "set" for directive checks such as a
    /// format override: empty text, zero, NaN and `false` do not.
    pub fn is_truthy(&self) -> bool {
        match self {
            SettingValue::Flag(b) => *b,
            SettingValue::Number(n) => *n != 0.0 && !n.is_nan(),
            SettingValue::Text(s) => !s.is_empty(),
        }
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingValue::Flag(b) => write!(f, "{b}"),
            // f64's Display already drops the fraction for integral values
            SettingValue::Number(n) => write!(f, "{n}"),
            SettingValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for SettingValue {
    fn from(value: &str) -> Self {
        SettingValue::Text(value.to_string())
    }
}

impl From<String> for SettingValue {
    fn from(value: String) -> Self {
        SettingValue::Text(value)
    }
}

impl From<f64> for SettingValue {
    fn from(value: f64) -> Self {
        SettingValue::Number(value)
    }
}

impl From<u32> for SettingValue {
    fn from(value: u32) -> Self {
        SettingValue::Number(f64::from(value))
    }
}

/// An ordered mapping of transform parameters.
///
/// Keys keep their first-insertion position; [`Settings::insert`] on an
/// existing key replaces the value in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Settings(Vec<(String, SettingValue)>);

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&SettingValue> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Insert or overwrite `key`. Overwrites keep the original position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<SettingValue>) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.0.push((key, value)),
        }
    }

    /// Whether `key` is present with a truthy value.
    pub fn is_set(&self, key: &str) -> bool {
        self.get(key).is_some_and(SettingValue::is_truthy)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SettingValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<SettingValue>> FromIterator<(K, V)> for Settings {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut settings = Settings::new();
        for (k, v) in iter {
            settings.insert(k, v);
        }
        settings
    }
}

impl fmt::Display for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(";")?;
            }
            write!(f, "{key}:{value}")?;
        }
        Ok(())
    }
}

impl FromStr for Settings {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(decode(s))
    }
}

impl Serialize for Settings {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (k, v) in &self.0 {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

// Hand-written so document order survives; serde_json's Map sorts keys.
impl<'de> Deserialize<'de> for Settings {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SettingsVisitor;

        impl<'de> Visitor<'de> for SettingsVisitor {
            type Value = Settings;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of transform settings")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Settings, A::Error> {
                let mut settings = Settings::new();
                while let Some((key, value)) = access.next_entry::<String, SettingValue>()? {
                    settings.insert(key, value);
                }
                Ok(settings)
            }
        }

        deserializer.deserialize_map(SettingsVisitor)
    }
}

/// Settings as supplied by a caller: either the string form or a mapping.
///
/// Builders resolve this once at their entry point and never touch the
/// caller's value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingsInput {
    Text(String),
    Map(Settings),
}

impl SettingsInput {
    /// An owned mapping the caller's value can't observe.
    pub fn resolve(&self) -> Settings {
        match self {
            SettingsInput::Text(s) => decode(s),
            SettingsInput::Map(m) => m.clone(),
        }
    }
}

impl Default for SettingsInput {
    fn default() -> Self {
        SettingsInput::Map(Settings::new())
    }
}

impl From<&str> for SettingsInput {
    fn from(value: &str) -> Self {
        SettingsInput::Text(value.to_string())
    }
}

impl From<String> for SettingsInput {
    fn from(value: String) -> Self {
        SettingsInput::Text(value)
    }
}

impl From<Settings> for SettingsInput {
    fn from(value: Settings) -> Self {
        SettingsInput::Map(value)
    }
}

/// Parse the string form into a mapping.
///
/// Each token is split on every `_` or `:`; the first piece is the key and
/// the second the value, so `"a:b:c"` yields `a = "b"`.
pub fn decode(input: &str) -> Settings {
    let mut settings = Settings::new();
    for token in input.split([',', ';']) {
        if token.is_empty() {
            continue;
        }
        let mut parts = token.split(['_', ':']);
        let key = parts.next().unwrap_or_default();
        match parts.next() {
            Some(value) => settings.insert(key, value),
            None => debug!(token, "dropping settings token without a separator"),
        }
    }
    settings
}

/// Render a mapping in canonical `key:value;key:value` form.
pub fn encode(settings: &Settings) -> String {
    settings.to_string()
}

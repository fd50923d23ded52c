use std::collections::BTreeMap;

use crate::error::ConfigError;
use crate::value::{ConfigValue, FromConfigValue};

/// Separator between nested block names and keys, e.g. `method1.type`.
pub const BLOCK_SEPARATOR: char = '.';

#[derive(Debug, Clone)]
pub(crate) struct ConfigEntry {
    pub(crate) value: ConfigValue,
    pub(crate) description: String,
}

/// An ordered mapping from string keys to typed values with human-readable
/// descriptions.
///
/// Every algorithm instance reports its tunable parameters as a `ConfigBlock`
/// and accepts updated parameters from one. Blocks are plain value objects:
/// cloning a block deep-copies all entries and the copies share nothing.
#[derive(Debug, Clone, Default)]
pub struct ConfigBlock {
    entries: BTreeMap<String, ConfigEntry>,
}

impl ConfigBlock {
    /// Create an empty block.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a typed entry together with its description.
    pub fn set_value<V: Into<ConfigValue>>(&mut self, key: &str, value: V, description: &str) {
        self.entries.insert(
            key.to_string(),
            ConfigEntry {
                value: value.into(),
                description: description.to_string(),
            },
        );
    }

    /// Read the value stored under `key` as type `T`.
    ///
    /// Fails with [`ConfigError::NoSuchValue`] when the key is absent and with
    /// [`ConfigError::BadValueCast`] when the stored value does not convert.
    pub fn get_value<T: FromConfigValue>(&self, key: &str) -> Result<T, ConfigError> {
        let entry = self
            .entries
            .get(key)
            .ok_or_else(|| ConfigError::NoSuchValue {
                key: key.to_string(),
            })?;
        T::from_value(&entry.value).ok_or_else(|| ConfigError::BadValueCast {
            key: key.to_string(),
            requested: T::TYPE_NAME,
            stored: entry.value.kind_name(),
        })
    }

    /// Read the value stored under `key` as type `T`, falling back to
    /// `default` when the key is absent or the stored value does not convert.
    pub fn get_value_or<T: FromConfigValue>(&self, key: &str, default: T) -> T {
        self.entries
            .get(key)
            .and_then(|entry| T::from_value(&entry.value))
            .unwrap_or(default)
    }

    /// Whether an entry exists under `key`.
    pub fn has_value(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// The description recorded for `key`, if the key exists.
    pub fn description(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(|e| e.description.as_str())
    }

    /// Iterate over `(key, value, description)` triples in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConfigValue, &str)> {
        self.entries
            .iter()
            .map(|(k, e)| (k.as_str(), &e.value, e.description.as_str()))
    }

    /// All keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the block has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Extract the nested block stored under `name`.
    ///
    /// Returns a block holding every entry whose key starts with
    /// `name` + [`BLOCK_SEPARATOR`], with that prefix stripped.
    pub fn subblock(&self, name: &str) -> ConfigBlock {
        let prefix = format!("{name}{BLOCK_SEPARATOR}");
        let entries = self
            .entries
            .iter()
            .filter_map(|(k, e)| {
                k.strip_prefix(&prefix)
                    .map(|rest| (rest.to_string(), e.clone()))
            })
            .collect();
        ConfigBlock { entries }
    }

    /// Nest every entry of `block` under `name` in this block.
    ///
    /// The inverse of [`ConfigBlock::subblock`] on the nested keys.
    pub fn add_subblock(&mut self, name: &str, block: &ConfigBlock) {
        for (k, e) in &block.entries {
            self.entries
                .insert(format!("{name}{BLOCK_SEPARATOR}{k}"), e.clone());
        }
    }
}

/// Blocks compare by keys and values; descriptions are display-only metadata.
impl PartialEq for ConfigBlock {
    fn eq(&self, other: &Self) -> bool {
        self.entries.len() == other.entries.len()
            && self
                .entries
                .iter()
                .zip(other.entries.iter())
                .all(|((ka, ea), (kb, eb))| ka == kb && ea.value == eb.value)
    }
}

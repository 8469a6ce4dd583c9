//! Typed view over the retry rules document.

use serde_json::Value;

use crate::errors::{ModelError, Result};

/// Retry configuration: named, reusable retry definitions plus per-service
/// retry rules referencing them.
///
/// Constructed from the singleton `_retry` document of shape
/// `{"definitions": {...}, "retry": {"<service>": {...}}}`.
#[derive(Debug, Clone)]
pub struct RetryModel {
    config: Value,
}

impl RetryModel {
    /// Wrap a loaded retry document, validating its top-level shape.
    pub fn new(config: Value) -> Result<Self> {
        for attribute in ["definitions", "retry"] {
            if !config.get(attribute).is_some_and(Value::is_object) {
                return Err(ModelError::MissingModelAttribute { attribute });
            }
        }
        Ok(Self { config })
    }

    /// Names of the reusable retry definitions, sorted.
    pub fn definition_names(&self) -> Vec<&str> {
        Self::sorted_keys(&self.config["definitions"])
    }

    /// One reusable retry definition.
    pub fn definition(&self, name: &str) -> Option<&Value> {
        self.config["definitions"].get(name)
    }

    /// Names of the per-service retry rule sets, sorted. The `__default__`
    /// entry, when present, applies to services without their own rules.
    pub fn retry_names(&self) -> Vec<&str> {
        Self::sorted_keys(&self.config["retry"])
    }

    /// The retry rules for one service.
    pub fn retry_config(&self, name: &str) -> Option<&Value> {
        self.config["retry"].get(name)
    }

    fn sorted_keys(value: &Value) -> Vec<&str> {
        // Both maps are validated objects at construction
        let mut names: Vec<&str> = value
            .as_object()
            .expect("validated object")
            .keys()
            .map(String::as_str)
            .collect();
        names.sort_unstable();
        names
    }
}

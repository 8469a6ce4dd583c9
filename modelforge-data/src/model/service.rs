//! Typed view over a primary service model document.

use serde_json::Value;

use crate::errors::{ModelError, Result};

/// A service-API description: metadata plus a map of named operations.
///
/// Constructed from an already-merged `service-2` document. The view keeps
/// the document intact; lookups borrow from it.
#[derive(Debug, Clone)]
pub struct ServiceModel {
    model: Value,
    service_name: String,
}

impl ServiceModel {
    /// Wrap a loaded service model document.
    pub fn new(model: Value, service_name: impl Into<String>) -> Self {
        Self {
            model,
            service_name: service_name.into(),
        }
    }

    /// The name this model was loaded under (e.g. `ec2`).
    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    /// The serviceId metadata property. Required for request dispatch, so its
    /// absence is an error rather than an empty default.
    pub fn service_id(&self) -> Result<&str> {
        self.metadata_str("serviceId")
            .ok_or_else(|| ModelError::MissingServiceId {
                service_name: self.service_name.clone(),
            })
    }

    /// The API version string from the model metadata, if present.
    pub fn api_version(&self) -> Option<&str> {
        self.metadata_str("apiVersion")
    }

    /// The wire protocol named by the model metadata, if present.
    pub fn protocol(&self) -> Option<&str> {
        self.metadata_str("protocol")
    }

    /// All operation names defined by the model, sorted.
    pub fn operation_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .model
            .get("operations")
            .and_then(Value::as_object)
            .map(|ops| ops.keys().map(String::as_str).collect())
            .unwrap_or_default();
        names.sort_unstable();
        names
    }

    /// The definition of one operation.
    pub fn operation(&self, operation_name: &str) -> Result<&Value> {
        self.model
            .get("operations")
            .and_then(|ops| ops.get(operation_name))
            .ok_or_else(|| ModelError::UnknownOperation {
                operation_name: operation_name.to_string(),
                service_name: self.service_name.clone(),
            })
    }

    fn metadata_str(&self, key: &str) -> Option<&str> {
        self.model
            .get("metadata")
            .and_then(|m| m.get(key))
            .and_then(Value::as_str)
    }
}

//! Typed view over the endpoint partitions document.

use std::fmt;

use serde_json::Value;

use crate::errors::{ModelError, Result};

/// Endpoint partition data: the partitions a service can be addressed in.
///
/// Constructed from the singleton `endpoints` document of shape
/// `{"partitions": [{"partitionName": ...}, ...]}`.
#[derive(Debug, Clone)]
pub struct EndpointModel {
    config: Value,
}

impl EndpointModel {
    /// Wrap a loaded endpoints document, validating its top-level shape.
    pub fn new(config: Value) -> Result<Self> {
        if !config.get("partitions").is_some_and(Value::is_array) {
            return Err(ModelError::MissingModelAttribute {
                attribute: "partitions",
            });
        }
        Ok(Self { config })
    }

    /// Borrowed views over every partition, in document order.
    pub fn partitions(&self) -> Vec<Partition<'_>> {
        self.partition_values().iter().map(Partition::new).collect()
    }

    /// Partition names, in document order.
    pub fn partition_names(&self) -> Vec<&str> {
        self.partitions().iter().filter_map(Partition::name).collect()
    }

    /// The partition a named region belongs to, if any partition lists it.
    pub fn partition_for_region(&self, region: &str) -> Option<Partition<'_>> {
        self.partition_values()
            .iter()
            .map(Partition::new)
            .find(|p| p.has_region(region))
    }

    fn partition_values(&self) -> &[Value] {
        // Validated at construction
        self.config["partitions"].as_array().expect("partitions array")
    }
}

/// One entry of the partitions array.
#[derive(Debug, Clone, Copy)]
pub struct Partition<'a> {
    config: &'a Value,
}

impl<'a> Partition<'a> {
    fn new(config: &'a Value) -> Self {
        Self { config }
    }

    /// The human-readable partition name (`partitionName`).
    pub fn name(&self) -> Option<&'a str> {
        self.config.get("partitionName").and_then(Value::as_str)
    }

    /// The partition key used in ARNs (`partition`), e.g. `aws`.
    pub fn key(&self) -> Option<&'a str> {
        self.config.get("partition").and_then(Value::as_str)
    }

    /// The DNS suffix endpoints in this partition share, if declared.
    pub fn dns_suffix(&self) -> Option<&'a str> {
        self.config.get("dnsSuffix").and_then(Value::as_str)
    }

    fn has_region(&self, region: &str) -> bool {
        self.config
            .get("regions")
            .and_then(Value::as_object)
            .is_some_and(|regions| regions.contains_key(region))
    }
}

impl fmt::Display for Partition<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Partition:{}>", self.name().unwrap_or("unknown"))
    }
}

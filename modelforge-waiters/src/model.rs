//! Validated views over waiter documents.

use std::collections::BTreeMap;
use std::time::Duration;

use serde_json::Value;

use crate::acceptor::Acceptor;
use crate::errors::{Result, WaiterError};

/// The single waiter document schema version this crate understands.
pub const SUPPORTED_WAITER_VERSION: u64 = 2;

/// All waiters of one service, parsed and compiled from a `waiters-2`
/// document.
///
/// Construction is the compatibility gate: a document whose `version` is
/// anything but [`SUPPORTED_WAITER_VERSION`] (including absent) is rejected
/// outright, and every waiter definition, acceptors included, is compiled
/// eagerly, so configuration mistakes surface here rather than mid-poll.
#[derive(Debug, Clone)]
pub struct WaiterModel {
    waiters: BTreeMap<String, WaiterConfig>,
}

impl WaiterModel {
    /// Build a model from a loaded waiter document.
    pub fn new(document: &Value) -> Result<Self> {
        match document.get("version").and_then(Value::as_u64) {
            Some(SUPPORTED_WAITER_VERSION) => {}
            _ => {
                let found = document
                    .get("version")
                    .map_or_else(|| "unknown".to_string(), ToString::to_string);
                return Err(WaiterError::UnsupportedSchemaVersion { found });
            }
        }

        let definitions = document
            .get("waiters")
            .and_then(Value::as_object)
            .ok_or_else(|| WaiterError::InvalidDocument {
                message: "missing 'waiters' object".to_string(),
            })?;

        let mut waiters = BTreeMap::new();
        for (name, definition) in definitions {
            waiters.insert(name.clone(), WaiterConfig::from_value(name, definition)?);
        }

        Ok(Self { waiters })
    }

    /// All waiter names, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.waiters.keys().map(String::as_str).collect()
    }

    /// The configuration of one waiter.
    pub fn get(&self, waiter_name: &str) -> Result<&WaiterConfig> {
        self.waiters
            .get(waiter_name)
            .ok_or_else(|| WaiterError::UnknownWaiter {
                name: waiter_name.to_string(),
            })
    }
}

/// The configuration of a single named waiter.
///
/// `operation`, `delay`, and `maxAttempts` are required by the schema;
/// absence is a construction error, never a default.
#[derive(Debug, Clone)]
pub struct WaiterConfig {
    name: String,
    description: Option<String>,
    operation: String,
    delay: Duration,
    max_attempts: u32,
    acceptors: Vec<Acceptor>,
}

impl WaiterConfig {
    pub(crate) fn from_value(name: &str, definition: &Value) -> Result<Self> {
        let missing = |field: &'static str| WaiterError::MissingField {
            waiter_name: name.to_string(),
            field,
        };
        let invalid = |field: &'static str| WaiterError::InvalidField {
            waiter_name: name.to_string(),
            field,
        };

        let operation = definition
            .get("operation")
            .ok_or_else(|| missing("operation"))?
            .as_str()
            .ok_or_else(|| invalid("operation"))?
            .to_string();

        let delay_seconds = definition
            .get("delay")
            .ok_or_else(|| missing("delay"))?
            .as_f64()
            .filter(|d| d.is_finite() && *d >= 0.0)
            .ok_or_else(|| invalid("delay"))?;

        let max_attempts = definition
            .get("maxAttempts")
            .ok_or_else(|| missing("maxAttempts"))?
            .as_u64()
            .filter(|n| *n > 0)
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(|| invalid("maxAttempts"))?;

        let description = definition
            .get("description")
            .and_then(Value::as_str)
            .map(ToString::to_string);

        let acceptors = definition
            .get("acceptors")
            .and_then(Value::as_array)
            .map(|defs| {
                defs.iter()
                    .map(|def| Acceptor::compile(name, def))
                    .collect::<Result<Vec<_>>>()
            })
            .transpose()?
            .unwrap_or_default();

        Ok(Self {
            name: name.to_string(),
            description,
            operation,
            delay: Duration::from_secs_f64(delay_seconds),
            max_attempts,
            acceptors,
        })
    }

    /// The waiter's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Human-readable description, when the document carries one.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// The operation this waiter polls.
    pub fn operation(&self) -> &str {
        &self.operation
    }

    /// Pause between the end of one attempt and the start of the next.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Inclusive upper bound on the number of attempts.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// The acceptors, in definition order. That order is authoritative: it is
    /// the only tie-break when several acceptors could match one response.
    pub fn acceptors(&self) -> &[Acceptor] {
        &self.acceptors
    }
}

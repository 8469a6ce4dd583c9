//! Native JSON provider implementation built on `serde_json`.
//!
//! Model documents are open-ended, externally versioned JSON trees, so
//! everything parses to a generic [`serde_json::Value`] first; typed views are
//! layered on top by the callers. The crate enables `serde_json`'s
//! `preserve_order` feature, so object keys keep the order they have in the
//! file, which downstream consumers rely on for reproducible merges.

use std::path::Path;

use serde_json::Value;

use crate::errors::{ModelError, Result};

/// Native JSON provider using `serde_json`.
///
/// # Thread Safety
/// This provider is `Send + Sync`; all operations are stateless.
#[derive(Debug, Clone)]
pub struct NativeJsonProvider;

impl NativeJsonProvider {
    /// Parse JSON text into a generic `serde_json::Value`.
    ///
    /// `origin` is the path the text was read from; it is recorded in the
    /// error so a malformed document can be located.
    pub fn parse_to_value(json_str: &str, origin: &Path) -> Result<Value> {
        serde_json::from_str(json_str).map_err(|e| ModelError::json(origin, e))
    }
}

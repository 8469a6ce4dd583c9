//! Discovery, loading, and merging of service-API model data.
//!
//! A model data root is a directory tree with one sub directory per service,
//! one sub directory per available API version inside it, and the model
//! documents for that version inside that:
//!
//! ```text
//! <root>
//!   |-- ec2
//!   |   |-- 2014-01-01
//!   |   |   |-- service-2.json
//!   |   |   |-- waiters-2.json
//!   |   |-- 2015-03-01
//!   |       |-- service-2.json
//!   |       |-- service-2.sdk-extras.json
//!   |       |-- paginators-1.json
//!   |       |-- waiters-2.json
//!   |-- endpoints.json
//!   |-- _retry.json
//! ```
//!
//! The `-1`/`-2` suffix on a model file names the schema version of that
//! document so callers can pick a file without parsing it first. `*-extras`
//! documents hold adjustments that are deep-merged into the primary service
//! model after it is loaded; they never exist on their own.
//!
//! [`ModelStore`] indexes such a tree once at construction and hands out
//! parsed, merged [`serde_json::Value`] documents. The typed views in
//! [`model`] are thin validated projections over those documents.

mod errors;
pub mod merge;
pub mod model;
pub mod providers;
mod store;

pub use errors::{ModelError, Result};
pub use merge::deep_merge;
pub use model::{EndpointModel, Partition, PaginatorModel, RetryModel, ServiceModel};
pub use store::{ModelStore, SERVICE_MODEL_TYPE};

//! Typed, read-only views over loaded model documents.
//!
//! Each view validates the shape it needs at construction and projects the
//! generic JSON tree into structured lookups; none of them mutate or copy the
//! underlying document beyond taking ownership of it.

mod endpoint;
mod paginator;
mod retry;
mod service;

pub use endpoint::{EndpointModel, Partition};
pub use paginator::PaginatorModel;
pub use retry::RetryModel;
pub use service::ServiceModel;

//! Error types and result alias for model data loading.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result type alias for operations that can fail with [`ModelError`].
pub type Result<T> = std::result::Result<T, ModelError>;

/// Errors raised while indexing, loading, or projecting model data.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ModelError {
    /// The requested service is absent from the data root. Carries the sorted
    /// list of services that do exist, for diagnostics.
    #[error("unknown service: '{service_name}'; valid service names are: {known_service_names}")]
    UnknownService {
        service_name: String,
        known_service_names: String,
    },

    /// No backing file exists for the requested data path.
    #[error("unable to load data for: {data_path}")]
    DataNotFound { data_path: String },

    /// A filesystem operation failed.
    #[error("file system error during {operation} on '{path}': {source}")]
    FileSystem {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A model document could not be parsed as JSON.
    #[error("JSON parsing error in '{path}': {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The model for a service is missing the serviceId metadata property,
    /// which is required.
    #[error("the model for service '{service_name}' is missing the serviceId metadata property")]
    MissingServiceId { service_name: String },

    /// A typed view was constructed over a document lacking a required
    /// top-level attribute.
    #[error("model document is missing required attribute '{attribute}'")]
    MissingModelAttribute { attribute: &'static str },

    /// The service model has no operation with the given name.
    #[error("operation '{operation_name}' does not exist for service '{service_name}'")]
    UnknownOperation {
        operation_name: String,
        service_name: String,
    },

    /// No paginator is defined for the given operation.
    #[error("paginator for operation does not exist: {operation_name}")]
    UnknownPaginator { operation_name: String },
}

impl ModelError {
    /// Unknown service error carrying the sorted list of known services.
    pub fn unknown_service(service_name: impl Into<String>, known: &[String]) -> Self {
        Self::UnknownService {
            service_name: service_name.into(),
            known_service_names: known.join(", "),
        }
    }

    /// Data-not-found error for the given data path.
    pub fn data_not_found(data_path: impl Into<String>) -> Self {
        Self::DataNotFound {
            data_path: data_path.into(),
        }
    }

    /// Filesystem error with operation and path context.
    pub fn file_system(operation: &'static str, path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::FileSystem {
            operation,
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// JSON parse error with the originating file path.
    pub fn json(path: impl AsRef<Path>, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

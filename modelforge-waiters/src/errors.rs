//! Error types for waiter configuration and waiter execution.
//!
//! Two distinct families: [`WaiterError`] covers everything wrong with a
//! waiter *document* (schema version, missing fields, unknown matcher kinds)
//! and is raised at model-construction time, before any polling begins.
//! [`WaitError`] covers the terminal outcomes of an actual wait. The split
//! keeps configuration mistakes from ever being confused with runtime
//! results.

use serde_json::Value;
use thiserror::Error;

use crate::model::SUPPORTED_WAITER_VERSION;

/// Result type alias for operations that can fail with [`WaiterError`].
pub type Result<T> = std::result::Result<T, WaiterError>;

/// Errors raised while constructing waiter models and compiling acceptors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum WaiterError {
    /// The document's schema version is not the single supported one. Raised
    /// for any other value, including an absent version key.
    #[error(
        "unsupported waiter version; supported version must be: {supported}, \
         but version of waiter config is: {found}",
        supported = SUPPORTED_WAITER_VERSION
    )]
    UnsupportedSchemaVersion { found: String },

    /// The document has no usable `waiters` map.
    #[error("invalid waiter document: {message}")]
    InvalidDocument { message: String },

    /// No waiter with the given name exists in the model.
    #[error("waiter does not exist: {name}")]
    UnknownWaiter { name: String },

    /// A required field is absent from a waiter definition. The required
    /// fields have no defaults.
    #[error("waiter '{waiter_name}' is missing required field '{field}'")]
    MissingField {
        waiter_name: String,
        field: &'static str,
    },

    /// A field is present but has the wrong type or an unusable value.
    #[error("waiter '{waiter_name}' has an invalid '{field}' value")]
    InvalidField {
        waiter_name: String,
        field: &'static str,
    },

    /// An acceptor entry does not have the required shape (e.g. `state` or
    /// `matcher` absent, or not an object at all).
    #[error("waiter '{waiter_name}' has an invalid acceptor definition: {source}")]
    InvalidAcceptor {
        waiter_name: String,
        #[source]
        source: serde_json::Error,
    },

    /// An acceptor names a state outside success/failure/retry.
    #[error("waiter '{waiter_name}' has an unknown acceptor state: {state}")]
    UnknownState { waiter_name: String, state: String },

    /// An acceptor names a matcher kind outside the five supported ones.
    #[error("waiter '{waiter_name}' has an unknown acceptor matcher: {matcher}")]
    UnknownMatcher { waiter_name: String, matcher: String },

    /// A path matcher is missing its query argument.
    #[error("waiter '{waiter_name}' acceptor matcher '{matcher}' requires an argument")]
    MissingArgument {
        waiter_name: String,
        matcher: &'static str,
    },

    /// A query argument failed to parse.
    #[error("invalid query expression '{expression}': {message}")]
    InvalidExpression { expression: String, message: String },
}

/// Terminal outcomes of a wait, other than success.
///
/// Every variant is final: the engine never retries past these, and the
/// caller decides whether to start a fresh wait.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum WaitError {
    /// An acceptor selected the failure state. Carries the response that
    /// matched it.
    #[error("waiter '{name}' transitioned to failure after {attempts} attempts")]
    StateFailure {
        name: String,
        attempts: u32,
        response: Value,
    },

    /// All attempts were used without any acceptor selecting a terminal
    /// state. Distinct from an operation error: the responses were
    /// well-formed, just never conclusive.
    #[error("waiter '{name}' exhausted all {attempts} attempts")]
    AttemptsExhausted { name: String, attempts: u32 },

    /// The operation produced an error-shaped response that no acceptor
    /// claimed. Carries that response verbatim.
    #[error("waiter '{name}' received an unhandled error from operation '{operation}'")]
    OperationError {
        name: String,
        operation: String,
        response: Value,
    },

    /// The wait was cancelled from outside before reaching a terminal state.
    #[error("waiter '{name}' was cancelled")]
    Cancelled { name: String },
}

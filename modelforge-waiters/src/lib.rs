//! Waiter definitions and the polling engine that drives them.
//!
//! A waiter is a named polling procedure: it repeatedly invokes one operation
//! and evaluates the structured response against an ordered list of acceptors
//! until one of them selects a terminal state, or the configured number of
//! attempts runs out. The pieces:
//!
//! - [`WaiterModel`]: validated view over a `waiters-2` document, as produced
//!   by the `modelforge-data` loader.
//! - [`Acceptor`] / [`Matcher`]: one acceptor definition compiled into a
//!   predicate over a response value.
//! - [`Waiter`]: the attempt/delay loop, generic over an [`OperationClient`]
//!   that executes the named operation and reports results through the
//!   tagged-response contract (errors are values carrying an `"Error"` key,
//!   not a separate channel).
//!
//! Waiters are independent of each other; any number of them can run
//! concurrently against shared models and clients. An in-flight wait can be
//! aborted through a [`tokio_util::sync::CancellationToken`].

mod acceptor;
mod engine;
mod errors;
mod model;
pub mod query;

pub use acceptor::{Acceptor, AcceptorState, Matcher};
pub use engine::{OperationClient, WaitSuccess, Waiter};
pub use errors::{Result, WaitError, WaiterError};
pub use model::{WaiterConfig, WaiterModel, SUPPORTED_WAITER_VERSION};
pub use query::PathExpression;

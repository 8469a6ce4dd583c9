//! The waiter poll loop.

use async_trait::async_trait;
use log::debug;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::acceptor::{is_error_shaped, AcceptorState};
use crate::errors::{WaitError, WaiterError};
use crate::model::{WaiterConfig, WaiterModel};

/// Executes a named operation and reports the result through the tagged
/// contract: the returned value is either a structured success payload or a
/// structured error payload carrying an `"Error"` key (typically
/// `{"Error": {"Code": ...}, "ResponseMetadata": ...}`). Errors are values,
/// never a separate channel, so acceptors can inspect them like any other
/// response.
#[async_trait]
pub trait OperationClient: Send + Sync {
    /// Invoke `operation` with `args` and return the tagged response.
    async fn invoke(&self, operation: &str, args: &Value) -> Value;
}

#[async_trait]
impl<T: OperationClient + ?Sized> OperationClient for std::sync::Arc<T> {
    async fn invoke(&self, operation: &str, args: &Value) -> Value {
        (**self).invoke(operation, args).await
    }
}

/// A successful wait: the response that satisfied a success acceptor, and
/// how many attempts it took.
#[derive(Debug, Clone)]
pub struct WaitSuccess {
    /// Number of operation invocations performed, the final one included.
    pub attempts: u32,
    /// The response the success acceptor matched.
    pub response: Value,
}

/// What one attempt's response means for the wait.
///
/// The "no acceptor matched" cases are explicit outcomes rather than a
/// fallthrough: an unmatched success shape is an implicit retry, an
/// unmatched error shape ends the wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AttemptOutcome {
    Success,
    Failure,
    Retry,
    UnmatchedError,
}

/// Drives one waiter's attempt/delay loop against an operation client.
///
/// Waiters share nothing mutable; any number of them, for the same or
/// different waiter names, can run concurrently.
#[derive(Debug)]
pub struct Waiter<C> {
    config: WaiterConfig,
    client: C,
}

impl<C: OperationClient> Waiter<C> {
    /// Build a waiter from an already-extracted configuration.
    pub fn new(config: WaiterConfig, client: C) -> Self {
        Self { config, client }
    }

    /// Look up `waiter_name` in the model and build a waiter for it.
    pub fn from_model(
        model: &WaiterModel,
        waiter_name: &str,
        client: C,
    ) -> Result<Self, WaiterError> {
        Ok(Self::new(model.get(waiter_name)?.clone(), client))
    }

    /// The configuration this waiter runs.
    pub fn config(&self) -> &WaiterConfig {
        &self.config
    }

    /// Poll until an acceptor selects a terminal state or the attempts run
    /// out. Equivalent to [`Waiter::wait_with_cancellation`] with a token
    /// nobody cancels.
    pub async fn wait(&self, args: &Value) -> Result<WaitSuccess, WaitError> {
        self.wait_with_cancellation(args, &CancellationToken::new())
            .await
    }

    /// Poll until a terminal state, attempt exhaustion, or cancellation.
    ///
    /// Each iteration invokes the waiter's operation, evaluates the acceptors
    /// in definition order, and transitions on the first match. With no match
    /// the attempt counts as an implicit retry, unless the response was
    /// error-shaped, in which case the error ends the wait. The configured
    /// delay runs between the end of one attempt and the start of the next,
    /// never after a terminating attempt.
    ///
    /// Cancelling the token aborts promptly, whether a delay or an invocation
    /// is in flight, and surfaces as [`WaitError::Cancelled`].
    pub async fn wait_with_cancellation(
        &self,
        args: &Value,
        cancel: &CancellationToken,
    ) -> Result<WaitSuccess, WaitError> {
        let config = &self.config;
        let cancelled = || WaitError::Cancelled {
            name: config.name().to_string(),
        };

        let mut attempts: u32 = 0;
        loop {
            // biased: a cancellation that is already in effect must win over
            // starting (or finishing) an invocation
            let response = tokio::select! {
                biased;
                () = cancel.cancelled() => return Err(cancelled()),
                response = self.client.invoke(config.operation(), args) => response,
            };
            attempts += 1;

            let outcome = evaluate_acceptors(config, &response);
            debug!(
                "waiter '{}' attempt {}/{}: {:?}",
                config.name(),
                attempts,
                config.max_attempts(),
                outcome
            );

            match outcome {
                AttemptOutcome::Success => {
                    return Ok(WaitSuccess { attempts, response });
                }
                AttemptOutcome::Failure => {
                    return Err(WaitError::StateFailure {
                        name: config.name().to_string(),
                        attempts,
                        response,
                    });
                }
                AttemptOutcome::UnmatchedError => {
                    return Err(WaitError::OperationError {
                        name: config.name().to_string(),
                        operation: config.operation().to_string(),
                        response,
                    });
                }
                AttemptOutcome::Retry => {}
            }

            if attempts >= config.max_attempts() {
                return Err(WaitError::AttemptsExhausted {
                    name: config.name().to_string(),
                    attempts,
                });
            }

            tokio::select! {
                biased;
                () = cancel.cancelled() => return Err(cancelled()),
                () = tokio::time::sleep(config.delay()) => {}
            }
        }
    }
}

/// First matching acceptor, in definition order, decides the outcome; the
/// order is the only tie-break between acceptors that could both match.
fn evaluate_acceptors(config: &WaiterConfig, response: &Value) -> AttemptOutcome {
    for acceptor in config.acceptors() {
        if acceptor.matches(response) {
            return match acceptor.state() {
                AcceptorState::Success => AttemptOutcome::Success,
                AcceptorState::Failure => AttemptOutcome::Failure,
                AcceptorState::Retry => AttemptOutcome::Retry,
            };
        }
    }

    if is_error_shaped(response) {
        AttemptOutcome::UnmatchedError
    } else {
        AttemptOutcome::Retry
    }
}

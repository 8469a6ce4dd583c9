//! Acceptor compilation and response matching.
//!
//! An acceptor pairs a matcher with the state the waiter transitions to when
//! the matcher fires. Matchers are compiled from their JSON definitions into
//! a closed tagged union, so an unknown matcher kind is a construction error
//! raised before any polling begins, not a runtime fallback.

use serde::Deserialize;
use serde_json::Value;

use crate::errors::{Result, WaiterError};
use crate::query::PathExpression;

/// Raw shape of one acceptor entry as it appears in a waiter document.
/// `state` and `matcher` are mandatory; `expected` and `argument` depend on
/// the matcher kind and are validated during compilation.
#[derive(Debug, Clone, Deserialize)]
struct AcceptorDefinition {
    state: String,
    matcher: String,
    #[serde(default)]
    expected: Value,
    #[serde(default)]
    argument: Option<String>,
}

/// The transition an acceptor selects when its matcher fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcceptorState {
    /// Terminate the wait successfully.
    Success,
    /// Terminate the wait as failed.
    Failure,
    /// Keep polling.
    Retry,
}

impl AcceptorState {
    fn parse(waiter_name: &str, state: &str) -> Result<Self> {
        match state {
            "success" => Ok(Self::Success),
            "failure" => Ok(Self::Failure),
            "retry" => Ok(Self::Retry),
            other => Err(WaiterError::UnknownState {
                waiter_name: waiter_name.to_string(),
                state: other.to_string(),
            }),
        }
    }
}

/// A compiled response matcher. Each variant holds exactly what it needs:
/// the three path kinds carry a compiled query expression, the other two a
/// scalar expectation.
#[derive(Debug, Clone)]
pub enum Matcher {
    /// The queried value equals the expectation exactly (type and value).
    /// Never matches error-shaped responses.
    Path {
        expression: PathExpression,
        expected: Value,
    },
    /// The query must yield a non-empty array whose every element equals the
    /// expectation. Error shapes, non-arrays, and empty arrays never match.
    PathAll {
        expression: PathExpression,
        expected: Value,
    },
    /// Like `PathAll`, but at least one element must equal the expectation.
    PathAny {
        expression: PathExpression,
        expected: Value,
    },
    /// The response metadata status code equals the expectation. Applies to
    /// success and error shapes alike, when a status code is present.
    Status { expected: u64 },
    /// The response is error-shaped and its error code equals the
    /// expectation exactly. Never matches success shapes.
    ErrorCode { expected: String },
}

/// One compiled acceptor: a matcher plus the state it selects.
#[derive(Debug, Clone)]
pub struct Acceptor {
    state: AcceptorState,
    matcher: Matcher,
}

impl Acceptor {
    /// Compile one acceptor definition. Unknown matcher kinds, unknown
    /// states, missing arguments, and unparseable query expressions all fail
    /// here.
    pub(crate) fn compile(waiter_name: &str, value: &Value) -> Result<Self> {
        let definition: AcceptorDefinition =
            serde_json::from_value(value.clone()).map_err(|source| {
                WaiterError::InvalidAcceptor {
                    waiter_name: waiter_name.to_string(),
                    source,
                }
            })?;

        let state = AcceptorState::parse(waiter_name, &definition.state)?;
        let expected = definition.expected;

        let path_expression = |kind: &'static str| -> Result<PathExpression> {
            let argument = definition
                .argument
                .as_deref()
                .filter(|a| !a.is_empty())
                .ok_or_else(|| WaiterError::MissingArgument {
                    waiter_name: waiter_name.to_string(),
                    matcher: kind,
                })?;
            PathExpression::parse(argument)
        };

        let matcher = match definition.matcher.as_str() {
            "path" => Matcher::Path {
                expression: path_expression("path")?,
                expected,
            },
            "pathAll" => Matcher::PathAll {
                expression: path_expression("pathAll")?,
                expected,
            },
            "pathAny" => Matcher::PathAny {
                expression: path_expression("pathAny")?,
                expected,
            },
            "status" => Matcher::Status {
                expected: expected.as_u64().ok_or_else(|| WaiterError::InvalidField {
                    waiter_name: waiter_name.to_string(),
                    field: "expected",
                })?,
            },
            "error" => Matcher::ErrorCode {
                expected: expected
                    .as_str()
                    .ok_or_else(|| WaiterError::InvalidField {
                        waiter_name: waiter_name.to_string(),
                        field: "expected",
                    })?
                    .to_string(),
            },
            other => {
                return Err(WaiterError::UnknownMatcher {
                    waiter_name: waiter_name.to_string(),
                    matcher: other.to_string(),
                })
            }
        };

        Ok(Self { state, matcher })
    }

    /// The state this acceptor selects when it matches.
    pub fn state(&self) -> AcceptorState {
        self.state
    }

    /// The compiled matcher.
    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    /// Whether this acceptor matches the response of one attempt.
    ///
    /// `response` follows the tagged contract: an error-shaped response
    /// carries an `"Error"` key, a success shape does not.
    pub fn matches(&self, response: &Value) -> bool {
        self.matcher.matches(response)
    }
}

impl Matcher {
    pub(crate) fn matches(&self, response: &Value) -> bool {
        match self {
            Self::Path { expression, expected } => {
                !is_error_shaped(response)
                    && expression.search(response).as_ref() == Some(expected)
            }
            Self::PathAll { expression, expected } => {
                !is_error_shaped(response)
                    && matches_elements(expression, response, |elements| {
                        elements.iter().all(|e| e == expected)
                    })
            }
            Self::PathAny { expression, expected } => {
                !is_error_shaped(response)
                    && matches_elements(expression, response, |elements| {
                        elements.iter().any(|e| e == expected)
                    })
            }
            Self::Status { expected } => response
                .get("ResponseMetadata")
                .and_then(|m| m.get("HTTPStatusCode"))
                .and_then(Value::as_u64)
                == Some(*expected),
            Self::ErrorCode { expected } => response
                .get("Error")
                .and_then(|e| e.get("Code"))
                .and_then(Value::as_str)
                == Some(expected.as_str()),
        }
    }
}

/// The tagged-response contract: an `"Error"` key marks the error shape.
pub(crate) fn is_error_shaped(response: &Value) -> bool {
    response.get("Error").is_some()
}

/// The path-sequence rule shared by `pathAll` and `pathAny`: the query must
/// yield a non-empty array before any element test applies.
fn matches_elements(
    expression: &PathExpression,
    response: &Value,
    test: impl Fn(&[Value]) -> bool,
) -> bool {
    match expression.search(response) {
        Some(Value::Array(elements)) if !elements.is_empty() => test(&elements),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn compile(definition: Value) -> Acceptor {
        Acceptor::compile("TestWaiter", &definition).unwrap()
    }

    #[test]
    fn path_matches_on_exact_equality() {
        let acceptor = compile(json!({
            "state": "success", "matcher": "path",
            "argument": "State.Name", "expected": "running"
        }));

        assert!(acceptor.matches(&json!({"State": {"Name": "running"}})));
        assert!(!acceptor.matches(&json!({"State": {"Name": "pending"}})));
        assert!(!acceptor.matches(&json!({"State": {}})));
    }

    #[test]
    fn path_equality_is_type_sensitive() {
        let acceptor = compile(json!({
            "state": "success", "matcher": "path",
            "argument": "Count", "expected": 1
        }));

        assert!(acceptor.matches(&json!({"Count": 1})));
        assert!(!acceptor.matches(&json!({"Count": "1"})));
        assert!(!acceptor.matches(&json!({"Count": true})));
    }

    #[test]
    fn path_never_matches_error_shapes() {
        let acceptor = compile(json!({
            "state": "success", "matcher": "path",
            "argument": "State.Name", "expected": "running"
        }));

        let error_response = json!({
            "Error": {"Code": "Throttling"},
            "State": {"Name": "running"}
        });
        assert!(!acceptor.matches(&error_response));
    }

    #[test]
    fn path_all_requires_every_element_to_match() {
        let acceptor = compile(json!({
            "state": "success", "matcher": "pathAll",
            "argument": "Instances[].State.Name", "expected": "running"
        }));

        assert!(acceptor.matches(&json!({
            "Instances": [{"State": {"Name": "running"}}, {"State": {"Name": "running"}}]
        })));
        assert!(!acceptor.matches(&json!({
            "Instances": [{"State": {"Name": "running"}}, {"State": {"Name": "pending"}}]
        })));
    }

    #[test]
    fn path_all_never_matches_an_empty_sequence() {
        let acceptor = compile(json!({
            "state": "success", "matcher": "pathAll",
            "argument": "Instances[].State.Name", "expected": "OK"
        }));

        assert!(!acceptor.matches(&json!({"Instances": []})));
    }

    #[test]
    fn path_all_never_matches_a_non_sequence() {
        let acceptor = compile(json!({
            "state": "success", "matcher": "pathAll",
            "argument": "State.Name", "expected": "running"
        }));

        // query resolves to a scalar, not a list
        assert!(!acceptor.matches(&json!({"State": {"Name": "running"}})));
    }

    #[test]
    fn path_any_matches_on_a_single_element() {
        let acceptor = compile(json!({
            "state": "failure", "matcher": "pathAny",
            "argument": "Instances[].State.Name", "expected": "terminated"
        }));

        assert!(acceptor.matches(&json!({
            "Instances": [{"State": {"Name": "running"}}, {"State": {"Name": "terminated"}}]
        })));
        assert!(!acceptor.matches(&json!({
            "Instances": [{"State": {"Name": "running"}}]
        })));
        assert!(!acceptor.matches(&json!({"Instances": []})));
    }

    #[test]
    fn status_matches_the_metadata_status_code() {
        let acceptor = compile(json!({
            "state": "success", "matcher": "status", "expected": 200
        }));

        assert!(acceptor.matches(&json!({"ResponseMetadata": {"HTTPStatusCode": 200}})));
        assert!(!acceptor.matches(&json!({"ResponseMetadata": {"HTTPStatusCode": 404}})));
        assert!(!acceptor.matches(&json!({})));
    }

    #[test]
    fn status_applies_to_error_shapes_too() {
        let acceptor = compile(json!({
            "state": "retry", "matcher": "status", "expected": 503
        }));

        assert!(acceptor.matches(&json!({
            "Error": {"Code": "SlowDown"},
            "ResponseMetadata": {"HTTPStatusCode": 503}
        })));
    }

    #[test]
    fn error_matches_the_error_code_exactly() {
        let acceptor = compile(json!({
            "state": "retry", "matcher": "error", "expected": "ResourceNotFoundException"
        }));

        assert!(acceptor.matches(&json!({"Error": {"Code": "ResourceNotFoundException"}})));
        assert!(!acceptor.matches(&json!({"Error": {"Code": "AccessDenied"}})));
        assert!(!acceptor.matches(&json!({"Error": {}})));
    }

    #[test]
    fn error_never_matches_success_shapes() {
        let acceptor = compile(json!({
            "state": "retry", "matcher": "error", "expected": "ResourceNotFoundException"
        }));

        assert!(!acceptor.matches(&json!({"Table": {"TableStatus": "ACTIVE"}})));
    }

    #[test]
    fn unknown_matcher_kind_fails_compilation() {
        let err = Acceptor::compile(
            "TestWaiter",
            &json!({"state": "success", "matcher": "regex", "expected": ".*"}),
        )
        .unwrap_err();

        match err {
            WaiterError::UnknownMatcher { matcher, .. } => assert_eq!(matcher, "regex"),
            other => panic!("expected UnknownMatcher, got: {other}"),
        }
    }

    #[test]
    fn acceptor_without_state_or_matcher_fails_compilation() {
        for incomplete in [
            json!({"matcher": "status", "expected": 200}),
            json!({"state": "success", "expected": 200}),
            json!("not an object"),
        ] {
            let err = Acceptor::compile("TestWaiter", &incomplete).unwrap_err();
            assert!(
                matches!(err, WaiterError::InvalidAcceptor { .. }),
                "expected InvalidAcceptor for {incomplete}"
            );
        }
    }

    #[test]
    fn unknown_state_fails_compilation() {
        let err = Acceptor::compile(
            "TestWaiter",
            &json!({"state": "maybe", "matcher": "status", "expected": 200}),
        )
        .unwrap_err();

        assert!(matches!(err, WaiterError::UnknownState { .. }));
    }

    #[test]
    fn path_matchers_require_an_argument() {
        for kind in ["path", "pathAll", "pathAny"] {
            let err = Acceptor::compile(
                "TestWaiter",
                &json!({"state": "success", "matcher": kind, "expected": "x"}),
            )
            .unwrap_err();
            assert!(
                matches!(err, WaiterError::MissingArgument { .. }),
                "{kind} without argument should fail"
            );

            let err = Acceptor::compile(
                "TestWaiter",
                &json!({"state": "success", "matcher": kind, "expected": "x", "argument": ""}),
            )
            .unwrap_err();
            assert!(
                matches!(err, WaiterError::MissingArgument { .. }),
                "{kind} with empty argument should fail"
            );
        }
    }

    #[test]
    fn status_and_error_ignore_the_argument() {
        // An argument on a status/error matcher is allowed and unused
        let acceptor = compile(json!({
            "state": "success", "matcher": "status",
            "expected": 200, "argument": "ignored"
        }));
        assert!(acceptor.matches(&json!({"ResponseMetadata": {"HTTPStatusCode": 200}})));
    }

    #[test]
    fn bad_expression_fails_compilation() {
        let err = Acceptor::compile(
            "TestWaiter",
            &json!({"state": "success", "matcher": "path",
                    "argument": "State..Name", "expected": "x"}),
        )
        .unwrap_err();

        assert!(matches!(err, WaiterError::InvalidExpression { .. }));
    }
}

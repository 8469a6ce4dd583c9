//! Compiled query expressions for path-based acceptor matchers.
//!
//! Waiter definitions address sub-values of a response with dotted path
//! expressions such as `State.Name` or
//! `Reservations[].Instances[].State.Name`. This module compiles those
//! expressions once, at acceptor-compile time, and evaluates them against
//! structured response values.
//!
//! Supported grammar, which covers what waiter documents actually use:
//!
//! ```text
//! expression := segment ("." segment)*
//! segment    := identifier ( "[" digits "]" | "[]" )*
//! ```
//!
//! `[]` starts a projection: later steps apply to every element, elements
//! that miss a step are dropped, and the final result is collected into an
//! array (possibly empty). A nested `[]` flattens one level of arrays first.
//! Outside a projection, a missing key or index is an explicit no-result.

use std::fmt;

use serde_json::Value;

use crate::errors::{Result, WaiterError};

/// One evaluation step of a compiled expression.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Step {
    /// Object key lookup.
    Field(String),
    /// Array element lookup.
    Index(usize),
    /// Flatten one level and project the remaining steps over the elements.
    Flatten,
}

/// A compiled path expression.
#[derive(Debug, Clone)]
pub struct PathExpression {
    source: String,
    steps: Vec<Step>,
}

impl PathExpression {
    /// Compile an expression, failing on anything outside the supported
    /// grammar.
    pub fn parse(expression: &str) -> Result<Self> {
        let invalid = |message: &str| WaiterError::InvalidExpression {
            expression: expression.to_string(),
            message: message.to_string(),
        };

        if expression.is_empty() {
            return Err(invalid("expression is empty"));
        }

        let mut steps = Vec::new();
        for segment in expression.split('.') {
            let (identifier, mut suffixes) = match segment.find('[') {
                Some(pos) => segment.split_at(pos),
                None => (segment, ""),
            };

            if identifier.is_empty() {
                return Err(invalid("expected an identifier"));
            }
            if !is_identifier(identifier) {
                return Err(invalid("identifiers may contain only letters, digits, and underscores"));
            }
            steps.push(Step::Field(identifier.to_string()));

            while !suffixes.is_empty() {
                let Some(rest) = suffixes.strip_prefix('[') else {
                    return Err(invalid("expected '['"));
                };
                let Some(close) = rest.find(']') else {
                    return Err(invalid("unterminated '['"));
                };
                let (inner, remainder) = rest.split_at(close);
                if inner.is_empty() {
                    steps.push(Step::Flatten);
                } else {
                    let index = inner
                        .parse::<usize>()
                        .map_err(|_| invalid("index must be a non-negative integer"))?;
                    steps.push(Step::Index(index));
                }
                suffixes = &remainder[1..];
            }
        }

        Ok(Self {
            source: expression.to_string(),
            steps,
        })
    }

    /// The expression text this was compiled from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Evaluate against a value. `None` is the explicit no-result marker:
    /// a key or index missed outside any projection.
    pub fn search(&self, data: &Value) -> Option<Value> {
        let mut cursor = Cursor::One(data.clone());

        for step in &self.steps {
            cursor = match (cursor, step) {
                (Cursor::One(value), Step::Field(key)) => Cursor::One(value.get(key)?.clone()),
                (Cursor::One(value), Step::Index(i)) => Cursor::One(value.get(i)?.clone()),
                (Cursor::One(value), Step::Flatten) => match value {
                    Value::Array(items) => Cursor::Many(flatten_one_level(items)),
                    _ => return None,
                },
                (Cursor::Many(values), Step::Field(key)) => Cursor::Many(
                    values
                        .into_iter()
                        .filter_map(|v| v.get(key).cloned())
                        .collect(),
                ),
                (Cursor::Many(values), Step::Index(i)) => Cursor::Many(
                    values
                        .into_iter()
                        .filter_map(|v| v.get(*i).cloned())
                        .collect(),
                ),
                (Cursor::Many(values), Step::Flatten) => Cursor::Many(
                    values
                        .into_iter()
                        .filter_map(|v| match v {
                            Value::Array(items) => Some(flatten_one_level(items)),
                            _ => None,
                        })
                        .flatten()
                        .collect(),
                ),
            };
        }

        match cursor {
            Cursor::One(value) => Some(value),
            Cursor::Many(values) => Some(Value::Array(values)),
        }
    }
}

impl fmt::Display for PathExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Evaluation is either a single value, or a projection over many.
#[derive(Debug)]
enum Cursor {
    One(Value),
    Many(Vec<Value>),
}

fn flatten_one_level(items: Vec<Value>) -> Vec<Value> {
    let mut flat = Vec::with_capacity(items.len());
    for item in items {
        match item {
            Value::Array(inner) => flat.extend(inner),
            other => flat.push(other),
        }
    }
    flat
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

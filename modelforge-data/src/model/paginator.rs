//! Typed view over a pagination rules document.

use serde_json::Value;

use crate::errors::{ModelError, Result};

/// Pagination rules for a service, keyed by operation name.
///
/// Constructed from a `paginators-1` document of shape
/// `{"pagination": {"<OperationName>": {...}}}`.
#[derive(Debug, Clone)]
pub struct PaginatorModel {
    config: Value,
}

impl PaginatorModel {
    /// Wrap a loaded paginator document, validating its top-level shape.
    pub fn new(config: Value) -> Result<Self> {
        if !config.get("pagination").is_some_and(Value::is_object) {
            return Err(ModelError::MissingModelAttribute {
                attribute: "pagination",
            });
        }
        Ok(Self { config })
    }

    /// The operations that have pagination rules, sorted.
    pub fn paginator_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .pagination()
            .keys()
            .map(String::as_str)
            .collect();
        names.sort_unstable();
        names
    }

    /// The pagination rule for one operation.
    pub fn paginator(&self, operation_name: &str) -> Result<&Value> {
        self.pagination()
            .get(operation_name)
            .ok_or_else(|| ModelError::UnknownPaginator {
                operation_name: operation_name.to_string(),
            })
    }

    fn pagination(&self) -> &serde_json::Map<String, Value> {
        // Validated at construction
        self.config["pagination"].as_object().expect("pagination object")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_config() -> Value {
        json!({
            "pagination": {
                "ListTables": {
                    "input_token": "ExclusiveStartTableName",
                    "output_token": "LastEvaluatedTableName",
                    "limit_key": "Limit",
                    "result_key": "TableNames"
                },
                "DescribeInstances": {
                    "input_token": "NextToken",
                    "output_token": "NextToken",
                    "result_key": "Reservations"
                }
            }
        })
    }

    #[test]
    fn names_are_sorted() {
        let model = PaginatorModel::new(sample_config()).unwrap();
        assert_eq!(model.paginator_names(), vec!["DescribeInstances", "ListTables"]);
    }

    #[test]
    fn paginator_lookup_returns_the_rule() {
        let model = PaginatorModel::new(sample_config()).unwrap();
        let rule = model.paginator("ListTables").unwrap();
        assert_eq!(rule["limit_key"], "Limit");
    }

    #[test]
    fn unknown_operation_is_an_error() {
        let model = PaginatorModel::new(sample_config()).unwrap();
        let err = model.paginator("ListGalaxies").unwrap_err();
        assert_eq!(
            err.to_string(),
            "paginator for operation does not exist: ListGalaxies"
        );
    }

    #[test]
    fn document_without_pagination_key_is_rejected() {
        let err = PaginatorModel::new(json!({"version": 1})).unwrap_err();
        assert!(matches!(
            err,
            ModelError::MissingModelAttribute { attribute: "pagination" }
        ));
    }
}

//! SQL query models.
//!
//! Contains the request envelope and the tagged outcome of one execution.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;
use validator::Validate;

use crate::errors::{AppError, AppResult};

/// One result row: column name to value, in select-list order.
pub type Row = Map<String, Value>;

/// Largest integer a JavaScript number represents exactly (2^53 - 1).
pub const MAX_SAFE_INTEGER: u64 = 9_007_199_254_740_991;

/// Request body shared by all query endpoints.
#[derive(Debug, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct QueryRequest {
    /// SQL statement with `?` placeholders.
    #[validate(
        required(message = "No query provided"),
        length(min = 1, message = "No query provided")
    )]
    #[serde(default)]
    pub query: Option<String>,

    /// Values bound to the placeholders, in order.
    #[serde(default)]
    #[schema(value_type = Option<Vec<Object>>)]
    pub params: Option<Vec<Value>>,
}

impl QueryRequest {
    pub fn new(query: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            query: Some(query.into()),
            params: Some(params),
        }
    }

    /// Reads a request body. Bodies that are empty, or not sent as JSON, count
    /// as `{}`; only JSON that fails to parse is rejected.
    pub fn from_body(is_json: bool, body: &[u8]) -> AppResult<Self> {
        if !is_json || body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        serde_json::from_slice(body).map_err(|e| {
            AppError::InvalidBody(format!("Failed to parse the request body as JSON: {e}"))
        })
    }

    /// Splits into statement text and parameters; absent fields become empty.
    pub fn into_parts(self) -> (String, Vec<Value>) {
        (
            self.query.unwrap_or_default(),
            self.params.unwrap_or_default(),
        )
    }
}

/// Counters reported by a statement that produced no result set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MutationSummary {
    pub affected_rows: u64,
    /// Zero when the statement generated no auto-increment value.
    pub insert_id: u64,
}

/// What a single statement produced.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome {
    /// Statement returned a result set (possibly empty).
    Rows(Vec<Row>),
    /// Statement changed data and returned only counters.
    Mutation(MutationSummary),
}

/// How integers are written into JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberFormat {
    /// Emit integers outside the JavaScript-safe range as strings.
    pub big_numbers_as_strings: bool,
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self {
            big_numbers_as_strings: true,
        }
    }
}

impl NumberFormat {
    pub fn signed(&self, n: i64) -> Value {
        if self.big_numbers_as_strings && n.unsigned_abs() > MAX_SAFE_INTEGER {
            Value::String(n.to_string())
        } else {
            Value::from(n)
        }
    }

    pub fn unsigned(&self, n: u64) -> Value {
        if self.big_numbers_as_strings && n > MAX_SAFE_INTEGER {
            Value::String(n.to_string())
        } else {
            Value::from(n)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_params_default_to_empty() {
        let req: QueryRequest = serde_json::from_value(json!({ "query": "SELECT 1" })).unwrap();
        let (query, params) = req.into_parts();
        assert_eq!(query, "SELECT 1");
        assert!(params.is_empty());
    }

    #[test]
    fn test_null_params_default_to_empty() {
        let req: QueryRequest =
            serde_json::from_value(json!({ "query": "SELECT 1", "params": null })).unwrap();
        assert!(req.into_parts().1.is_empty());
    }

    #[test]
    fn test_empty_body_reads_as_empty_request() {
        for body in [&b""[..], &b"  \n"[..]] {
            let req = QueryRequest::from_body(true, body).unwrap();
            assert!(req.query.is_none());
            assert!(req.params.is_none());
        }
    }

    #[test]
    fn test_non_json_body_reads_as_empty_request() {
        let req = QueryRequest::from_body(false, b"query=SELECT+1").unwrap();
        assert!(req.query.is_none());
    }

    #[test]
    fn test_malformed_json_body_is_rejected() {
        let err = QueryRequest::from_body(true, b"{not json").unwrap_err();
        assert!(matches!(err, AppError::InvalidBody(_)));
    }

    #[test]
    fn test_validation_rejects_absent_or_empty_query() {
        let absent: QueryRequest = serde_json::from_value(json!({ "params": [1] })).unwrap();
        assert!(absent.validate().is_err());

        let empty = QueryRequest::new("", vec![]);
        assert!(empty.validate().is_err());

        let present = QueryRequest::new("SELECT 1", vec![]);
        assert!(present.validate().is_ok());
    }

    #[test]
    fn test_big_numbers_become_strings_outside_safe_range() {
        let format = NumberFormat::default();
        assert_eq!(format.unsigned(MAX_SAFE_INTEGER), json!(9_007_199_254_740_991u64));
        assert_eq!(format.unsigned(MAX_SAFE_INTEGER + 1), json!("9007199254740992"));
        assert_eq!(format.signed(-42), json!(-42));
        assert_eq!(format.signed(i64::MIN), json!("-9223372036854775808"));
    }

    #[test]
    fn test_big_numbers_stay_numeric_when_disabled() {
        let format = NumberFormat {
            big_numbers_as_strings: false,
        };
        assert_eq!(format.unsigned(u64::MAX), json!(u64::MAX));
    }
}

//! Response bodies.
//!
//! Each endpoint answers with a bare JSON shape rather than a wrapper envelope,
//! so callers read `insertId`, `scalar` and friends at the top level.

use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

use crate::models::Row;

/// Text returned when a read produced no rows.
pub const NO_DATA_MESSAGE: &str = "No data available";

/// Body of every error response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Readiness check body.
#[derive(Debug, Serialize, ToSchema)]
pub struct ReadyBody {
    pub ready: bool,
}

/// Counters of a write statement, as returned by `/fetchAll`.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResultHeaderBody {
    pub affected_rows: u64,
    #[schema(value_type = Object)]
    pub insert_id: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InsertIdBody {
    /// Number, or a decimal string when beyond the JavaScript-safe range.
    #[schema(value_type = Object)]
    pub insert_id: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AffectedRowsBody {
    pub affected_rows: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ScalarBody {
    /// First column of the first row.
    #[schema(value_type = Object)]
    pub scalar: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct MessageBody {
    pub message: String,
}

impl MessageBody {
    pub fn no_data() -> Self {
        Self {
            message: NO_DATA_MESSAGE.to_string(),
        }
    }
}

/// Any successful query endpoint response.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum GatewayResponse {
    Rows(Vec<Row>),
    ResultHeader(ResultHeaderBody),
    InsertId(InsertIdBody),
    AffectedRows(AffectedRowsBody),
    Scalar(ScalarBody),
    Message(MessageBody),
}

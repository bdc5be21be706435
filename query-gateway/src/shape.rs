//! Response shaping.
//!
//! Each endpoint turns a [`QueryOutcome`] into its response body with a pure
//! function; nothing here touches the database.

use serde_json::Value;

use common::models::{NumberFormat, QueryOutcome, Row};
use common::response::{
    AffectedRowsBody, GatewayResponse, InsertIdBody, MessageBody, ResultHeaderBody, ScalarBody,
};

/// Output policy of a query endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapePolicy {
    /// `/fetchAll`: the result set as-is.
    RawRows,
    /// `/insert`: only the generated id.
    InsertId,
    /// `/execute`: affected rows, the rows, or a no-data message.
    RowsOrMessage,
    /// `/fetchScalar`: affected rows, the first value, or a no-data message.
    Scalar,
}

impl ShapePolicy {
    /// Whether the endpoint rejects a request without a query before executing.
    pub fn requires_query(self) -> bool {
        matches!(self, ShapePolicy::RowsOrMessage | ShapePolicy::Scalar)
    }

    pub fn name(self) -> &'static str {
        match self {
            ShapePolicy::RawRows => "fetchAll",
            ShapePolicy::InsertId => "insert",
            ShapePolicy::RowsOrMessage => "execute",
            ShapePolicy::Scalar => "fetchScalar",
        }
    }

    pub fn shape(self, outcome: QueryOutcome, numbers: NumberFormat) -> GatewayResponse {
        match self {
            ShapePolicy::RawRows => raw_rows(outcome, numbers),
            ShapePolicy::InsertId => insert_id(outcome, numbers),
            ShapePolicy::RowsOrMessage => rows_or_message(outcome),
            ShapePolicy::Scalar => scalar(outcome),
        }
    }
}

pub fn raw_rows(outcome: QueryOutcome, numbers: NumberFormat) -> GatewayResponse {
    match outcome {
        QueryOutcome::Rows(rows) => GatewayResponse::Rows(rows),
        QueryOutcome::Mutation(summary) => GatewayResponse::ResultHeader(ResultHeaderBody {
            affected_rows: summary.affected_rows,
            insert_id: numbers.unsigned(summary.insert_id),
        }),
    }
}

pub fn insert_id(outcome: QueryOutcome, numbers: NumberFormat) -> GatewayResponse {
    let id = match outcome {
        QueryOutcome::Mutation(summary) => summary.insert_id,
        QueryOutcome::Rows(_) => 0,
    };
    GatewayResponse::InsertId(InsertIdBody {
        insert_id: numbers.unsigned(id),
    })
}

pub fn rows_or_message(outcome: QueryOutcome) -> GatewayResponse {
    match outcome {
        QueryOutcome::Mutation(summary) => affected_rows(summary.affected_rows),
        QueryOutcome::Rows(rows) if !rows.is_empty() => GatewayResponse::Rows(rows),
        QueryOutcome::Rows(_) => GatewayResponse::Message(MessageBody::no_data()),
    }
}

pub fn scalar(outcome: QueryOutcome) -> GatewayResponse {
    match outcome {
        QueryOutcome::Mutation(summary) => affected_rows(summary.affected_rows),
        QueryOutcome::Rows(rows) => match rows.into_iter().next() {
            Some(first) => GatewayResponse::Scalar(ScalarBody {
                scalar: first_value(first),
            }),
            None => GatewayResponse::Message(MessageBody::no_data()),
        },
    }
}

fn affected_rows(n: u64) -> GatewayResponse {
    GatewayResponse::AffectedRows(AffectedRowsBody { affected_rows: n })
}

fn first_value(row: Row) -> Value {
    row.into_iter().next().map_or(Value::Null, |(_, v)| v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::models::MutationSummary;
    use serde_json::json;

    fn row(pairs: &[(&str, Value)]) -> Row {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn mutation(affected_rows: u64, insert_id: u64) -> QueryOutcome {
        QueryOutcome::Mutation(MutationSummary {
            affected_rows,
            insert_id,
        })
    }

    fn body(response: GatewayResponse) -> Value {
        serde_json::to_value(response).unwrap()
    }

    #[test]
    fn test_raw_rows_passes_rows_through() {
        let rows = vec![row(&[("id", json!(1)), ("val", json!("a"))])];
        let out = raw_rows(QueryOutcome::Rows(rows), NumberFormat::default());
        assert_eq!(body(out), json!([{ "id": 1, "val": "a" }]));
    }

    #[test]
    fn test_raw_rows_reports_write_header() {
        let out = raw_rows(mutation(3, 12), NumberFormat::default());
        assert_eq!(body(out), json!({ "affectedRows": 3, "insertId": 12 }));
    }

    #[test]
    fn test_insert_id_defaults_to_zero_for_result_sets() {
        let out = insert_id(QueryOutcome::Rows(vec![]), NumberFormat::default());
        assert_eq!(body(out), json!({ "insertId": 0 }));
    }

    #[test]
    fn test_insert_id_large_value_is_string() {
        let out = insert_id(mutation(1, u64::MAX), NumberFormat::default());
        assert_eq!(body(out), json!({ "insertId": "18446744073709551615" }));
    }

    #[test]
    fn test_rows_or_message_prefers_affected_rows() {
        assert_eq!(body(rows_or_message(mutation(1, 0))), json!({ "affectedRows": 1 }));
        // A write that touched nothing still reports its count.
        assert_eq!(body(rows_or_message(mutation(0, 0))), json!({ "affectedRows": 0 }));
    }

    #[test]
    fn test_rows_or_message_empty_result() {
        assert_eq!(
            body(rows_or_message(QueryOutcome::Rows(vec![]))),
            json!({ "message": "No data available" })
        );
    }

    #[test]
    fn test_scalar_takes_first_column_of_first_row() {
        let rows = vec![
            row(&[("val", json!("b")), ("id", json!(1))]),
            row(&[("val", json!("c")), ("id", json!(2))]),
        ];
        assert_eq!(body(scalar(QueryOutcome::Rows(rows))), json!({ "scalar": "b" }));
    }

    #[test]
    fn test_scalar_keeps_null_value() {
        let rows = vec![row(&[("val", Value::Null)])];
        assert_eq!(body(scalar(QueryOutcome::Rows(rows))), json!({ "scalar": null }));
    }

    #[test]
    fn test_scalar_no_rows() {
        assert_eq!(
            body(scalar(QueryOutcome::Rows(vec![]))),
            json!({ "message": "No data available" })
        );
    }

    #[test]
    fn test_only_execute_and_scalar_require_query() {
        assert!(!ShapePolicy::RawRows.requires_query());
        assert!(!ShapePolicy::InsertId.requires_query());
        assert!(ShapePolicy::RowsOrMessage.requires_query());
        assert!(ShapePolicy::Scalar.requires_query());
    }
}

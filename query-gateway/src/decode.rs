//! Conversions between JSON and MySQL values.
//!
//! Parameters arrive as JSON scalars and are bound positionally; result rows
//! leave as JSON objects keyed by column name, in select-list order.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::{json, Number, Value};
use sqlx::mysql::types::MySqlTime;
use sqlx::mysql::{MySql, MySqlArguments, MySqlRow};
use sqlx::query::Query;
use sqlx::types::JsonValue;
use sqlx::{Column, Row, TypeInfo, ValueRef};

use common::models::{NumberFormat, Row as JsonRow};

const ISO_MILLIS: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Binds one JSON parameter to the next `?` placeholder.
pub fn bind_param<'q>(
    query: Query<'q, MySql, MySqlArguments>,
    value: &Value,
) -> Query<'q, MySql, MySqlArguments> {
    match value {
        Value::Null => query.bind(None::<String>),
        Value::Bool(b) => query.bind(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                query.bind(i)
            } else if let Some(u) = n.as_u64() {
                query.bind(u)
            } else {
                match n.as_f64() {
                    Some(f) => query.bind(f),
                    None => query.bind(n.to_string()),
                }
            }
        }
        Value::String(s) => query.bind(s.clone()),
        // Arrays and objects travel as their JSON text.
        other => query.bind(other.to_string()),
    }
}

/// Turns result rows into JSON objects.
#[derive(Debug, Clone, Copy, Default)]
pub struct RowDecoder {
    numbers: NumberFormat,
}

impl RowDecoder {
    pub fn new(numbers: NumberFormat) -> Self {
        Self { numbers }
    }

    pub fn decode_row(&self, row: &MySqlRow) -> Result<JsonRow, sqlx::Error> {
        let mut object = JsonRow::with_capacity(row.columns().len());
        for column in row.columns() {
            let value = self.decode_column(row, column.ordinal(), column.type_info().name())?;
            object.insert(column.name().to_string(), value);
        }
        Ok(object)
    }

    /// Picks the Rust type from the column's declared type; the name already
    /// guarantees compatibility, so decoding skips sqlx's type check.
    fn decode_column(
        &self,
        row: &MySqlRow,
        index: usize,
        type_name: &str,
    ) -> Result<Value, sqlx::Error> {
        if row.try_get_raw(index)?.is_null() {
            return Ok(Value::Null);
        }

        let value = match type_name {
            "BOOLEAN" | "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" => {
                self.numbers.signed(row.try_get_unchecked::<i64, _>(index)?)
            }
            "TINYINT UNSIGNED" | "SMALLINT UNSIGNED" | "MEDIUMINT UNSIGNED" | "INT UNSIGNED"
            | "BIGINT UNSIGNED" => self.numbers.unsigned(row.try_get_unchecked::<u64, _>(index)?),
            "YEAR" => Value::from(row.try_get_unchecked::<u16, _>(index)?),
            "FLOAT" => float_value(row.try_get_unchecked::<f32, _>(index)?),
            "DOUBLE" => double_value(row.try_get_unchecked::<f64, _>(index)?),
            // Exact decimals never go through floating point.
            "DECIMAL" => Value::String(row.try_get_unchecked::<String, _>(index)?),
            "DATE" => row
                .try_get_unchecked::<NaiveDate, _>(index)
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map_or(Value::Null, |dt| naive_datetime_value(&dt)),
            // Zone-less; rendered as UTC wall-clock time.
            "DATETIME" => row
                .try_get_unchecked::<NaiveDateTime, _>(index)
                .map_or(Value::Null, |dt| naive_datetime_value(&dt)),
            "TIMESTAMP" => row
                .try_get_unchecked::<DateTime<Utc>, _>(index)
                .map_or(Value::Null, |dt| Value::String(dt.format(ISO_MILLIS).to_string())),
            // TIME is a signed interval up to 838:59:59, not a time of day.
            "TIME" => time_value(&row.try_get_unchecked::<MySqlTime, _>(index)?),
            "JSON" => row.try_get_unchecked::<JsonValue, _>(index)?,
            "BINARY" | "VARBINARY" | "TINYBLOB" | "BLOB" | "MEDIUMBLOB" | "LONGBLOB" | "BIT"
            | "GEOMETRY" => buffer_value(&row.try_get_unchecked::<Vec<u8>, _>(index)?),
            _ => Value::String(row.try_get_unchecked::<String, _>(index)?),
        };
        Ok(value)
    }
}

fn naive_datetime_value(dt: &NaiveDateTime) -> Value {
    Value::String(dt.format(ISO_MILLIS).to_string())
}

/// `[-]HH:MM:SS[.ffffff]`, as the server prints it.
fn time_value(t: &MySqlTime) -> Value {
    Value::String(t.to_string())
}

/// FLOAT columns use their shortest decimal form, not the widened f64 digits.
fn float_value(f: f32) -> Value {
    f.to_string()
        .parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map_or(Value::Null, Value::Number)
}

fn double_value(f: f64) -> Value {
    Number::from_f64(f).map_or(Value::Null, Value::Number)
}

/// Binary data in the `{type: "Buffer", data: [...]}` form JavaScript clients expect.
fn buffer_value(bytes: &[u8]) -> Value {
    json!({ "type": "Buffer", "data": bytes })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_uses_shortest_form() {
        assert_eq!(float_value(1.1), json!(1.1));
        assert_eq!(float_value(f32::NAN), Value::Null);
    }

    #[test]
    fn test_non_finite_double_is_null() {
        assert_eq!(double_value(f64::INFINITY), Value::Null);
        assert_eq!(double_value(2.5), json!(2.5));
    }

    #[test]
    fn test_buffer_shape() {
        assert_eq!(
            buffer_value(&[0x01, 0xff]),
            json!({ "type": "Buffer", "data": [1, 255] })
        );
    }

    #[test]
    fn test_time_keeps_sign_and_hours_past_a_day() {
        use sqlx::mysql::types::MySqlTimeSign;

        let negative = MySqlTime::new(MySqlTimeSign::Negative, 1, 30, 0, 0).unwrap();
        assert_eq!(time_value(&negative), json!("-01:30:00"));

        let longest = MySqlTime::new(MySqlTimeSign::Positive, 838, 59, 59, 0).unwrap();
        assert_eq!(time_value(&longest), json!("838:59:59"));
    }

    #[test]
    fn test_datetime_renders_iso_utc() {
        let dt = NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_milli_opt(14, 5, 7, 250)
            .unwrap();
        assert_eq!(naive_datetime_value(&dt), json!("2024-03-09T14:05:07.250Z"));
    }
}

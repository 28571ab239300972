use geonames_core::FieldValue;
use rusqlite::types::{Null, ToSql, ToSqlOutput};

/// Binds a [`FieldValue`] as a SQLite parameter.
///
/// Decimals, dates and points are stored as their canonical text so no
/// precision is lost; points use WKT with longitude first.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SqlValue<'a>(pub(crate) &'a FieldValue);

impl ToSql for SqlValue<'_> {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self.0 {
            FieldValue::Integer(value) => ToSqlOutput::from(*value),
            FieldValue::Text(value) => ToSqlOutput::from(value.as_str()),
            FieldValue::Null => ToSqlOutput::from(Null),
            FieldValue::Decimal(_) | FieldValue::Date(_) | FieldValue::Point(_) => {
                ToSqlOutput::from(self.0.to_string())
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use geo::Point;
    use rstest::rstest;
    use rusqlite::Connection;
    use rusqlite::types::Value;
    use rust_decimal::Decimal;

    fn round_trip(value: &FieldValue) -> Value {
        let connection = Connection::open_in_memory().expect("open in-memory database");
        connection
            .query_row("SELECT ?1", [SqlValue(value)], |row| row.get(0))
            .expect("select bound value")
    }

    #[rstest]
    #[case(FieldValue::Integer(42), Value::Integer(42))]
    #[case(FieldValue::from("Oslo"), Value::Text("Oslo".into()))]
    #[case(FieldValue::Null, Value::Null)]
    #[case(FieldValue::Decimal(Decimal::new(-59_125, 3)), Value::Text("-59.125".into()))]
    #[case(
        FieldValue::Date(NaiveDate::from_ymd_opt(2024, 2, 29).expect("valid date")),
        Value::Text("2024-02-29".into())
    )]
    #[case(
        FieldValue::Point(Point::new(10.5, 59.25)),
        Value::Text("POINT(10.5 59.25)".into())
    )]
    fn binds_each_variant(#[case] value: FieldValue, #[case] expected: Value) {
        assert_eq!(round_trip(&value), expected);
    }
}

//! Record-level rewrites applied between decoding and storage.

use geo::Point;
use geonames_core::{FieldValue, Record};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use thiserror::Error;

/// Field populated by [`RecordTransform::GeoPoint`].
pub const POINT_FIELD: &str = "point";

/// Foreign-key columns nulled by [`RecordTransform::ClearEmptyForeignKeys`].
pub const FOREIGN_KEY_FIELDS: [&str; 3] = ["feature_code", "timezone_id", "country_code"];

/// A rewrite applied to every decoded record of a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordTransform {
    /// Synthesise [`POINT_FIELD`] from the `latitude` and `longitude` decimals.
    GeoPoint,
    /// Replace empty foreign-key text with [`FieldValue::Null`].
    ClearEmptyForeignKeys,
}

/// Errors raised when a transform cannot be applied.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransformError {
    /// A coordinate field was absent or not a decimal.
    #[error("record has no decimal `{field}`")]
    MissingCoordinate {
        /// Name of the coordinate field.
        field: &'static str,
    },
    /// A coordinate fell outside the WGS84 range.
    #[error("`{field}` value {value} is outside [-{limit}, {limit}]")]
    CoordinateOutOfRange {
        /// Name of the coordinate field.
        field: &'static str,
        /// Offending value.
        value: Decimal,
        /// Absolute bound for the field.
        limit: u16,
    },
}

impl RecordTransform {
    /// Apply the transform, returning the rewritten record.
    ///
    /// # Errors
    ///
    /// [`RecordTransform::GeoPoint`] fails when a coordinate is missing or
    /// out of range.
    ///
    /// # Examples
    ///
    /// ```
    /// use geonames_core::{FieldValue, Record};
    /// use geonames_data::transform::RecordTransform;
    ///
    /// let record = Record::from(vec![("feature_code", FieldValue::from(""))]);
    /// let cleared = RecordTransform::ClearEmptyForeignKeys.apply(record)?;
    /// assert!(cleared.get("feature_code").is_some_and(FieldValue::is_null));
    /// # Ok::<(), geonames_data::transform::TransformError>(())
    /// ```
    pub fn apply(self, record: Record) -> Result<Record, TransformError> {
        match self {
            Self::GeoPoint => with_point(record),
            Self::ClearEmptyForeignKeys => Ok(clear_empty_foreign_keys(record)),
        }
    }

    /// Apply `transforms` in order.
    ///
    /// # Errors
    ///
    /// Stops at the first failing transform.
    pub fn apply_all(transforms: &[Self], record: Record) -> Result<Record, TransformError> {
        transforms
            .iter()
            .try_fold(record, |current, transform| transform.apply(current))
    }
}

fn with_point(record: Record) -> Result<Record, TransformError> {
    let latitude = coordinate(&record, "latitude", 90)?;
    let longitude = coordinate(&record, "longitude", 180)?;
    Ok(record.with_value(POINT_FIELD, FieldValue::Point(Point::new(longitude, latitude))))
}

fn coordinate(record: &Record, field: &'static str, limit: u16) -> Result<f64, TransformError> {
    let value = record
        .get(field)
        .and_then(FieldValue::as_decimal)
        .ok_or(TransformError::MissingCoordinate { field })?;
    let bound = Decimal::from(limit);
    let out_of_range = TransformError::CoordinateOutOfRange {
        field,
        value,
        limit,
    };
    if value.abs() > bound {
        return Err(out_of_range);
    }
    value.to_f64().ok_or(out_of_range)
}

fn clear_empty_foreign_keys(record: Record) -> Record {
    record
        .into_entries()
        .into_iter()
        .map(|(name, value)| {
            let empty_key = FOREIGN_KEY_FIELDS.contains(&name)
                && value.as_text().is_some_and(str::is_empty);
            if empty_key {
                (name, FieldValue::Null)
            } else {
                (name, value)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use std::str::FromStr;

    fn decimal(raw: &str) -> FieldValue {
        FieldValue::Decimal(Decimal::from_str(raw).expect("valid decimal"))
    }

    #[fixture]
    fn oslo() -> Record {
        Record::from(vec![
            ("geonameid", FieldValue::Integer(3_143_244)),
            ("latitude", decimal("59.91273")),
            ("longitude", decimal("10.74609")),
            ("feature_code", FieldValue::from("PPLC")),
            ("country_code", FieldValue::from("")),
            ("timezone_id", FieldValue::from("Europe/Oslo")),
        ])
    }

    #[rstest]
    fn geo_point_uses_longitude_as_x(oslo: Record) {
        let record = RecordTransform::GeoPoint.apply(oslo).expect("point");

        let Some(FieldValue::Point(point)) = record.get(POINT_FIELD) else {
            panic!("point field missing");
        };
        assert!((point.x() - 10.746_09).abs() < 1e-9);
        assert!((point.y() - 59.912_73).abs() < 1e-9);
        assert_eq!(record.keys().last(), Some(POINT_FIELD));
    }

    #[rstest]
    #[case("latitude", "90.5", 90)]
    #[case("longitude", "-180.0001", 180)]
    fn rejects_out_of_range_coordinates(
        oslo: Record,
        #[case] field: &'static str,
        #[case] raw: &str,
        #[case] limit: u16,
    ) {
        let record = oslo.with_value(field, decimal(raw));
        let err = RecordTransform::GeoPoint
            .apply(record)
            .expect_err("coordinate should be rejected");
        assert!(matches!(
            err,
            TransformError::CoordinateOutOfRange { field: f, limit: l, .. } if f == field && l == limit
        ));
    }

    #[rstest]
    fn missing_coordinates_are_reported(oslo: Record) {
        let record = oslo.with_value("longitude", FieldValue::Null);
        assert_eq!(
            RecordTransform::GeoPoint.apply(record),
            Err(TransformError::MissingCoordinate { field: "longitude" })
        );
    }

    #[rstest]
    fn clears_only_empty_foreign_keys(oslo: Record) {
        let record = RecordTransform::ClearEmptyForeignKeys
            .apply(oslo)
            .expect("never fails");

        assert_eq!(record.get("country_code"), Some(&FieldValue::Null));
        assert_eq!(record.get("feature_code"), Some(&FieldValue::from("PPLC")));
        assert_eq!(record.get("timezone_id"), Some(&FieldValue::from("Europe/Oslo")));
    }

    #[rstest]
    fn applies_transforms_in_order(oslo: Record) {
        let record = RecordTransform::apply_all(
            &[RecordTransform::GeoPoint, RecordTransform::ClearEmptyForeignKeys],
            oslo,
        )
        .expect("transforms apply");

        assert_eq!(record.len(), 7);
        assert!(record.get("country_code").is_some_and(FieldValue::is_null));
    }
}

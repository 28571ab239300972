//! The closed set of decode kinds a field descriptor may name.

use std::{fmt, num::ParseIntError, ops::Range, str::FromStr};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::FieldValue;

/// How the raw text of a cell becomes a [`FieldValue`].
///
/// # Examples
///
/// ```
/// use geonames_core::{DecodeKind, FieldValue};
///
/// assert_eq!(DecodeKind::Integer.decode("42")?, FieldValue::Integer(42));
/// assert_eq!(DecodeKind::OptionalInteger.decode("")?, FieldValue::Null);
/// assert!(DecodeKind::Integer.decode("").is_err());
/// # Ok::<(), geonames_core::DecodeError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecodeKind {
    /// Strict signed integer; empty or malformed text fails.
    Integer,
    /// Best-effort integer; empty or malformed text yields [`FieldValue::Null`].
    OptionalInteger,
    /// Arbitrary-precision decimal in plain or scientific notation.
    Decimal,
    /// Verbatim text.
    Text,
    /// Date in the fixed ten-character `YYYY-MM-DD` layout.
    FixedDate,
}

impl DecodeKind {
    /// Decode `raw` according to this kind.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError`] for strict kinds whose text does not parse.
    pub fn decode(self, raw: &str) -> Result<FieldValue, DecodeError> {
        match self {
            Self::Integer => decode_integer(raw).map(FieldValue::Integer),
            Self::OptionalInteger => {
                Ok(decode_integer(raw).map_or(FieldValue::Null, FieldValue::Integer))
            }
            Self::Decimal => decode_decimal(raw).map(FieldValue::Decimal),
            Self::Text => Ok(FieldValue::Text(raw.to_owned())),
            Self::FixedDate => decode_fixed_date(raw).map(FieldValue::Date),
        }
    }

    /// Short lowercase name used in diagnostics.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::OptionalInteger => "optional integer",
            Self::Decimal => "decimal",
            Self::Text => "text",
            Self::FixedDate => "date",
        }
    }
}

impl fmt::Display for DecodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Errors raised when a cell cannot be decoded.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The cell is not a valid integer.
    #[error("not a valid integer: {source}")]
    Integer {
        /// Parser error from the standard library.
        #[source]
        source: ParseIntError,
    },
    /// The cell is not a valid decimal number.
    #[error("not a valid decimal: {source}")]
    Decimal {
        /// Parser error from `rust_decimal`.
        #[source]
        source: rust_decimal::Error,
    },
    /// The cell does not follow the `YYYY-MM-DD` layout or names no real date.
    #[error("not a date in YYYY-MM-DD layout")]
    Date,
}

fn decode_integer(raw: &str) -> Result<i64, DecodeError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|source| DecodeError::Integer { source })
}

// Plain notation first, then `1E-5` style exponents.
fn decode_decimal(raw: &str) -> Result<Decimal, DecodeError> {
    let trimmed = raw.trim();
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|source| DecodeError::Decimal { source })
}

// Digits at 0..4, 5..7 and 8..10 with dashes at 4 and 7.
fn decode_fixed_date(raw: &str) -> Result<NaiveDate, DecodeError> {
    let bytes = raw.as_bytes();
    if bytes.len() != 10 || bytes.get(4) != Some(&b'-') || bytes.get(7) != Some(&b'-') {
        return Err(DecodeError::Date);
    }
    let year: i32 = date_part(raw, 0..4)?;
    let month: u32 = date_part(raw, 5..7)?;
    let day: u32 = date_part(raw, 8..10)?;
    NaiveDate::from_ymd_opt(year, month, day).ok_or(DecodeError::Date)
}

fn date_part<T: FromStr>(raw: &str, range: Range<usize>) -> Result<T, DecodeError> {
    raw.get(range)
        .filter(|part| part.bytes().all(|byte| byte.is_ascii_digit()))
        .and_then(|part| part.parse().ok())
        .ok_or(DecodeError::Date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("2986043", 2_986_043)]
    #[case(" 17 ", 17)]
    #[case("-5", -5)]
    fn decodes_integers(#[case] raw: &str, #[case] expected: i64) {
        let value = DecodeKind::Integer.decode(raw).expect("integer should decode");
        assert_eq!(value, FieldValue::Integer(expected));
    }

    #[rstest]
    #[case("")]
    #[case("12a")]
    #[case("1.5")]
    fn rejects_malformed_integers(#[case] raw: &str) {
        let err = DecodeKind::Integer
            .decode(raw)
            .expect_err("malformed integer should fail");
        assert!(matches!(err, DecodeError::Integer { .. }));
    }

    #[rstest]
    #[case("", FieldValue::Null)]
    #[case("n/a", FieldValue::Null)]
    #[case("0.44", FieldValue::Null)]
    #[case("1540", FieldValue::Integer(1540))]
    fn optional_integers_fall_back_to_null(#[case] raw: &str, #[case] expected: FieldValue) {
        let value = DecodeKind::OptionalInteger
            .decode(raw)
            .expect("optional integer never fails");
        assert_eq!(value, expected);
    }

    #[rstest]
    fn decimals_keep_their_scale() {
        let value = DecodeKind::Decimal
            .decode("42.50000")
            .expect("decimal should decode");
        let decimal = value.as_decimal().expect("decimal payload");
        assert_eq!(decimal.to_string(), "42.50000");
        assert_eq!(decimal.scale(), 5);
    }

    #[rstest]
    #[case("1E-5", "0.00001")]
    #[case("2.5e3", "2500")]
    fn decimals_accept_exponents(#[case] raw: &str, #[case] expected: &str) {
        let value = DecodeKind::Decimal
            .decode(raw)
            .expect("scientific decimal should decode");
        let decimal = value.as_decimal().expect("decimal payload");
        assert_eq!(decimal.normalize().to_string(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("north")]
    #[case("1E")]
    fn rejects_malformed_decimals(#[case] raw: &str) {
        let err = DecodeKind::Decimal
            .decode(raw)
            .expect_err("malformed decimal should fail");
        assert!(matches!(err, DecodeError::Decimal { .. }));
    }

    #[rstest]
    fn text_is_verbatim() {
        let value = DecodeKind::Text.decode("  Ås ").expect("text never fails");
        assert_eq!(value.as_text(), Some("  Ås "));
    }

    #[rstest]
    fn decodes_fixed_dates() {
        let value = DecodeKind::FixedDate
            .decode("2012-11-30")
            .expect("date should decode");
        assert_eq!(value.as_date(), NaiveDate::from_ymd_opt(2012, 11, 30));
    }

    #[rstest]
    #[case("")]
    #[case("2012-1-30")]
    #[case("2012/11/30")]
    #[case("2012-11-30 ")]
    #[case("2012-13-01")]
    #[case("2012-02-30")]
    #[case("20x2-11-30")]
    fn rejects_malformed_dates(#[case] raw: &str) {
        let err = DecodeKind::FixedDate
            .decode(raw)
            .expect_err("malformed date should fail");
        assert!(matches!(err, DecodeError::Date));
    }
}

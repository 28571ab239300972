//! Typed cell values and the ordered records assembled from them.

use std::fmt;

use chrono::NaiveDate;
use geo::Point;
use rust_decimal::Decimal;

/// A single decoded cell value.
///
/// Decoding only ever yields the first five variants; [`FieldValue::Point`]
/// is synthesised by record transforms downstream of the decoder.
///
/// # Examples
///
/// ```
/// use geonames_core::FieldValue;
///
/// let value = FieldValue::from("Oslo");
/// assert_eq!(value.as_text(), Some("Oslo"));
/// assert_eq!(value.to_string(), "Oslo");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Signed 64-bit integer.
    Integer(i64),
    /// Arbitrary-precision decimal, used for coordinates and offsets.
    Decimal(Decimal),
    /// Verbatim cell text.
    Text(String),
    /// Calendar date parsed from a `YYYY-MM-DD` cell.
    Date(NaiveDate),
    /// Absent value.
    Null,
    /// WGS84 position with `x = longitude` and `y = latitude`.
    Point(Point<f64>),
}

impl FieldValue {
    /// Report whether the value is [`FieldValue::Null`].
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Borrow the text payload, if any.
    #[must_use]
    pub const fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text.as_str()),
            _ => None,
        }
    }

    /// Return the integer payload, if any.
    #[must_use]
    pub const fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(*value),
            _ => None,
        }
    }

    /// Return the decimal payload, if any.
    #[must_use]
    pub const fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Self::Decimal(value) => Some(*value),
            _ => None,
        }
    }

    /// Return the date payload, if any.
    #[must_use]
    pub const fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Date(value) => Some(*value),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(value) => write!(f, "{value}"),
            Self::Decimal(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
            Self::Date(value) => write!(f, "{}", value.format("%Y-%m-%d")),
            Self::Null => Ok(()),
            Self::Point(point) => write!(f, "POINT({} {})", point.x(), point.y()),
        }
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<Decimal> for FieldValue {
    fn from(value: Decimal) -> Self {
        Self::Decimal(value)
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<NaiveDate> for FieldValue {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

/// An ordered mapping from field name to decoded value.
///
/// Records are produced fresh for every accepted row and keep the field order
/// of the schema that decoded them. Transforms derive new records through
/// [`Record::with_value`] rather than mutating in place.
///
/// # Examples
///
/// ```
/// use geonames_core::{FieldValue, Record};
///
/// let record: Record = [("a", FieldValue::Integer(1)), ("b", FieldValue::from("x"))]
///     .into_iter()
///     .collect();
/// assert_eq!(record.keys().collect::<Vec<_>>(), ["a", "b"]);
/// assert_eq!(record.get("a"), Some(&FieldValue::Integer(1)));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    entries: Vec<(&'static str, FieldValue)>,
}

impl Record {
    /// Look up a value by field name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.entries
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value)
    }

    /// Iterate over field names in order.
    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(key, _)| *key)
    }

    /// Iterate over values in field order.
    pub fn values(&self) -> impl Iterator<Item = &FieldValue> + '_ {
        self.entries.iter().map(|(_, value)| value)
    }

    /// Iterate over `(name, value)` pairs in field order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &FieldValue)> + '_ {
        self.entries.iter().map(|(key, value)| (*key, value))
    }

    /// Number of fields held by the record.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Report whether the record holds no fields.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Consume the record and return its ordered entries.
    #[must_use]
    pub fn into_entries(self) -> Vec<(&'static str, FieldValue)> {
        self.entries
    }

    /// Return a record with `name` set to `value`.
    ///
    /// Existing fields keep their position; new fields are appended.
    #[must_use]
    pub fn with_value(mut self, name: &'static str, value: FieldValue) -> Self {
        match self.entries.iter_mut().find(|(key, _)| *key == name) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((name, value)),
        }
        self
    }
}

impl From<Vec<(&'static str, FieldValue)>> for Record {
    fn from(entries: Vec<(&'static str, FieldValue)>) -> Self {
        Self { entries }
    }
}

impl FromIterator<(&'static str, FieldValue)> for Record {
    fn from_iter<I: IntoIterator<Item = (&'static str, FieldValue)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

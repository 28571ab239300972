//! Record schemas for the six GeoNames dump variants.
//!
//! Field lists follow the column layout documented in the GeoNames export
//! readme. Schemas are built once on first use and shared thereafter.

use std::sync::LazyLock;

use geonames_core::{DecodeKind, FieldDescriptor, RecordSchema, RowPreprocess};

use DecodeKind::{Decimal, FixedDate, Integer, OptionalInteger, Text};

const GEONAME_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::new("geonameid", Integer),
    FieldDescriptor::new("name", Text),
    FieldDescriptor::new("asciiname", Text),
    FieldDescriptor::new("alternatenames", Text),
    FieldDescriptor::new("latitude", Decimal),
    FieldDescriptor::new("longitude", Decimal),
    FieldDescriptor::new("feature_class", Text),
    FieldDescriptor::new("feature_code", Text),
    FieldDescriptor::new("country_code", Text),
    FieldDescriptor::new("cc2", Text),
    FieldDescriptor::new("admin1_code", Text),
    FieldDescriptor::new("admin2_code", Text),
    FieldDescriptor::new("admin3_code", Text),
    FieldDescriptor::new("admin4_code", Text),
    FieldDescriptor::new("population", Integer),
    FieldDescriptor::new("elevation", OptionalInteger),
    FieldDescriptor::new("dem", Text),
    FieldDescriptor::new("timezone_id", Text),
    FieldDescriptor::new("modification_date", FixedDate),
];

const FEATURE_CODE_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::new("feature_class", Text),
    FieldDescriptor::new("feature_code", Text),
    FieldDescriptor::new("name", Text),
    FieldDescriptor::new("description", Text),
];

const TIMEZONE_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::new("country_code", Text),
    FieldDescriptor::new("timezone_id", Text),
    FieldDescriptor::new("gmt_offset", Decimal),
    FieldDescriptor::new("dst_offset", Decimal),
    FieldDescriptor::new("raw_offset", Decimal),
];

const COUNTRY_INFO_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::new("iso", Text),
    FieldDescriptor::new("iso3", Text),
    FieldDescriptor::new("iso_numeric", Text),
    FieldDescriptor::new("fips", Text),
    FieldDescriptor::new("country", Text),
    FieldDescriptor::new("capital", Text),
    FieldDescriptor::new("area_in_sq_km", OptionalInteger),
    FieldDescriptor::new("population", Integer),
    FieldDescriptor::new("continent", Text),
    FieldDescriptor::new("tld", Text),
    FieldDescriptor::new("currency_code", Text),
    FieldDescriptor::new("currency_name", Text),
    FieldDescriptor::new("phone", Text),
    FieldDescriptor::new("postal_code_format", Text),
    FieldDescriptor::new("postal_code_regex", Text),
    FieldDescriptor::new("languages", Text),
    FieldDescriptor::new("geonameid", OptionalInteger),
    FieldDescriptor::new("neighbours", Text),
    FieldDescriptor::new("equivalent_fips_code", Text),
];

const HIERARCHY_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::new("parent_id", Integer),
    FieldDescriptor::new("child_id", Integer),
    FieldDescriptor::new("hierarchy_type", Text),
];

const ALTERNATE_NAME_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::new("alternatenameid", Integer),
    FieldDescriptor::new("geonameid", Integer),
    FieldDescriptor::new("isolanguage", Text),
    FieldDescriptor::new("alternate_name", Text),
    FieldDescriptor::new("is_preferred_name", OptionalInteger),
    FieldDescriptor::new("is_short_name", OptionalInteger),
    FieldDescriptor::new("is_colloquial", OptionalInteger),
    FieldDescriptor::new("is_historic", OptionalInteger),
    FieldDescriptor::new("from_period", Text),
    FieldDescriptor::new("to_period", Text),
];

static GEONAME: LazyLock<RecordSchema> = LazyLock::new(|| RecordSchema::new(GEONAME_FIELDS));

// Class and code arrive joined as `A.ADM1`; the trailing `null` entry lacks
// a description and is skipped.
static FEATURE_CODE: LazyLock<RecordSchema> = LazyLock::new(|| {
    RecordSchema::new(FEATURE_CODE_FIELDS)
        .with_skip_short_rows(true)
        .with_preprocess(RowPreprocess::FirstToDelimiter('.'))
});

static TIMEZONE: LazyLock<RecordSchema> =
    LazyLock::new(|| RecordSchema::new(TIMEZONE_FIELDS).with_start_row(1));

static COUNTRY_INFO: LazyLock<RecordSchema> =
    LazyLock::new(|| RecordSchema::new(COUNTRY_INFO_FIELDS));

static HIERARCHY: LazyLock<RecordSchema> =
    LazyLock::new(|| RecordSchema::new(HIERARCHY_FIELDS).with_pad_short_rows(true));

// Older exports stop after `is_historic`.
static ALTERNATE_NAME: LazyLock<RecordSchema> =
    LazyLock::new(|| RecordSchema::new(ALTERNATE_NAME_FIELDS).with_pad_short_rows(true));

/// Schema for `allCountries.txt` and the `citiesN.txt` extracts.
#[must_use]
pub fn geoname() -> &'static RecordSchema {
    &GEONAME
}

/// Schema for `featureCodes_<lang>.txt`.
#[must_use]
pub fn feature_code() -> &'static RecordSchema {
    &FEATURE_CODE
}

/// Schema for `timeZones.txt`, whose first line is a header.
#[must_use]
pub fn timezone() -> &'static RecordSchema {
    &TIMEZONE
}

/// Schema for `countryInfo.txt`, whose preamble is `#` comments.
#[must_use]
pub fn country_info() -> &'static RecordSchema {
    &COUNTRY_INFO
}

/// Schema for `hierarchy.txt`.
#[must_use]
pub fn hierarchy() -> &'static RecordSchema {
    &HIERARCHY
}

/// Schema for `alternateNames.txt`.
#[must_use]
pub fn alternate_name() -> &'static RecordSchema {
    &ALTERNATE_NAME
}

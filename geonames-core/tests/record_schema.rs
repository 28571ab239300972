//! Integration tests for schema declarations and decode kinds.

use geonames_core::{
    DecodeKind, Diagnostic, DiagnosticSink, ExcessCells, FieldDescriptor, FieldValue,
    RecordSchema, RowPreprocess, test_support::RecordingSink,
};
use rstest::{fixture, rstest};

const COUNTRY_LIKE: &[FieldDescriptor] = &[
    FieldDescriptor::new("iso", DecodeKind::Text),
    FieldDescriptor::new("area", DecodeKind::OptionalInteger),
    FieldDescriptor::new("geonameid", DecodeKind::Integer),
];

#[fixture]
fn schema() -> RecordSchema {
    RecordSchema::new(COUNTRY_LIKE)
        .with_start_row(2)
        .with_pad_short_rows(true)
        .with_excess_cells(ExcessCells::Ignore)
}

#[rstest]
fn builder_settings_are_observable(schema: RecordSchema) {
    assert_eq!(schema.start_row(), 2);
    assert!(schema.pads_short_rows());
    assert_eq!(schema.excess_cells(), ExcessCells::Ignore);
    assert_eq!(schema.preprocess(), RowPreprocess::None);
    assert_eq!(schema.fields().len(), schema.field_names().len());
}

#[rstest]
fn decode_kinds_follow_declaration_order(schema: RecordSchema) {
    let cells = ["NO", "", "3144096"];
    let decoded: Vec<FieldValue> = schema
        .decode_kinds()
        .iter()
        .zip(cells)
        .map(|(kind, raw)| kind.decode(raw).expect("cells decode"))
        .collect();

    assert_eq!(
        decoded,
        [
            FieldValue::from("NO"),
            FieldValue::Null,
            FieldValue::Integer(3_144_096),
        ]
    );
}

#[rstest]
fn recording_sink_keeps_arrival_order() {
    let sink = RecordingSink::new();
    sink.record(&Diagnostic::ShortRowSkipped {
        source: "a".to_owned(),
        row: 3,
    });
    sink.record(&Diagnostic::ShortRowSkipped {
        source: "a".to_owned(),
        row: 1,
    });

    let rows: Vec<usize> = sink.diagnostics().iter().map(Diagnostic::row).collect();
    assert_eq!(rows, [3, 1]);
    assert_eq!(sink.len(), 2);
}

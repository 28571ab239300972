//! Property-based tests for the streaming decoder.
//!
//! # Invariants tested
//!
//! - **Key set:** every record carries exactly the schema's field names, in
//!   schema order.
//! - **Padding:** padded short rows fill the missing trailing fields with
//!   empty text and report one shape mismatch per short row.
//! - **Start offset:** lines before the start row never produce records.
//! - **Comments:** comment lines are dropped silently wherever they appear.

use std::io::Cursor;

use geonames_core::test_support::RecordingSink;
use geonames_core::{DecodeKind, FieldDescriptor, FieldValue, Record, RecordSchema};
use geonames_data::reader::RecordReader;
use proptest::prelude::*;

const FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::new("id", DecodeKind::Integer),
    FieldDescriptor::new("name", DecodeKind::Text),
    FieldDescriptor::new("note", DecodeKind::Text),
];

fn decode(schema: &RecordSchema, sink: &RecordingSink, input: String) -> Vec<Record> {
    RecordReader::new(Cursor::new(input), "property.txt", schema, sink)
        .collect::<Result<_, _>>()
        .expect("generated rows should decode")
}

/// Text cells free of delimiters, line breaks and comment markers.
fn cell() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ,.]{0,12}"
}

fn full_row() -> impl Strategy<Value = (i64, String, String)> {
    (any::<i64>(), cell(), cell())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn records_carry_exactly_the_schema_fields(rows in prop::collection::vec(full_row(), 0..20)) {
        let schema = RecordSchema::new(FIELDS);
        let sink = RecordingSink::new();
        let input: String = rows
            .iter()
            .map(|(id, name, note)| format!("{id}\t{name}\t{note}\n"))
            .collect();

        let records = decode(&schema, &sink, input);

        prop_assert_eq!(records.len(), rows.len());
        for (record, (id, name, note)) in records.iter().zip(&rows) {
            prop_assert!(record.keys().eq(schema.field_names().iter().copied()));
            prop_assert_eq!(record.get("id"), Some(&FieldValue::Integer(*id)));
            prop_assert_eq!(record.get("name"), Some(&FieldValue::from(name.as_str())));
            prop_assert_eq!(record.get("note"), Some(&FieldValue::from(note.as_str())));
        }
        prop_assert!(sink.is_empty());
    }

    #[test]
    fn padded_rows_fill_trailing_fields(
        rows in prop::collection::vec((any::<i64>(), 1_usize..=3), 1..20),
    ) {
        let schema = RecordSchema::new(FIELDS).with_pad_short_rows(true);
        let sink = RecordingSink::new();
        let input: String = rows
            .iter()
            .map(|(id, width)| {
                let cells: Vec<String> = std::iter::once(id.to_string())
                    .chain(std::iter::repeat_n("x".to_owned(), width - 1))
                    .collect();
                format!("{}\n", cells.join("\t"))
            })
            .collect();

        let records = decode(&schema, &sink, input);

        prop_assert_eq!(records.len(), rows.len());
        for (record, (_, width)) in records.iter().zip(&rows) {
            prop_assert_eq!(record.len(), FIELDS.len());
            let empty = record
                .values()
                .filter(|value| value.as_text() == Some(""))
                .count();
            prop_assert_eq!(empty, FIELDS.len() - width);
        }
        let short = rows.iter().filter(|(_, width)| *width < FIELDS.len()).count();
        prop_assert_eq!(sink.len(), short);
    }

    #[test]
    fn lines_before_the_start_row_are_ignored(
        rows in prop::collection::vec(full_row(), 0..20),
        start in 0_usize..25,
    ) {
        let schema = RecordSchema::new(FIELDS).with_start_row(start);
        let sink = RecordingSink::new();
        let input: String = rows
            .iter()
            .map(|(id, name, note)| format!("{id}\t{name}\t{note}\n"))
            .collect();

        let records = decode(&schema, &sink, input);

        prop_assert_eq!(records.len(), rows.len().saturating_sub(start));
        if let (Some(first), Some((id, _, _))) = (records.first(), rows.get(start)) {
            prop_assert_eq!(first.get("id"), Some(&FieldValue::Integer(*id)));
        }
    }

    #[test]
    fn comment_lines_are_dropped(
        lines in prop::collection::vec(prop_oneof![full_row().prop_map(Some), cell().prop_map(|_| None)], 0..30),
    ) {
        let schema = RecordSchema::new(FIELDS);
        let sink = RecordingSink::new();
        let input: String = lines
            .iter()
            .map(|line| match line {
                Some((id, name, note)) => format!("{id}\t{name}\t{note}\n"),
                None => "# commentary\twith\ttabs\textra\n".to_owned(),
            })
            .collect();

        let records = decode(&schema, &sink, input);

        prop_assert_eq!(records.len(), lines.iter().flatten().count());
        prop_assert!(sink.is_empty());
    }
}

//! Criterion benchmarks for the streaming decoder.
//!
//! Measures decode throughput for synthetic `geoname` dumps of increasing
//! size, with and without the storage transforms.
//!
//! Run benchmarks with:
//! ```bash
//! cargo bench --package geonames-data
//! ```

// Criterion macros generate code that triggers missing_docs warnings.
#![allow(missing_docs, reason = "Criterion macros generate undocumented code")]

use std::hint::black_box;
use std::io::Cursor;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use geonames_core::LogSink;
use geonames_data::catalog::DatasetKind;
use geonames_data::reader::RecordReader;
use geonames_data::transform::RecordTransform;

/// Row counts to benchmark.
const ROW_COUNTS: &[usize] = &[1_000, 10_000, 50_000];

/// Build a deterministic `cities`-style dump with `rows` lines.
fn synthetic_dump(rows: usize) -> String {
    (0..rows)
        .map(|id| {
            format!(
                "{id}\tPlace {id}\tPlace {id}\tAlias {id},Other {id}\t59.{id:05}\t10.{id:05}\tP\tPPL\tNO\t\t12\t0301\t\t\t{id}\t\t26\tEurope/Oslo\t2024-01-01\n"
            )
        })
        .collect()
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_geonames");
    let kind = DatasetKind::Geoname;

    for &rows in ROW_COUNTS {
        let dump = synthetic_dump(rows);
        group.throughput(Throughput::Bytes(u64::try_from(dump.len()).unwrap_or(u64::MAX)));

        group.bench_with_input(BenchmarkId::new("decode", rows), &dump, |b, input| {
            b.iter(|| {
                let reader =
                    RecordReader::new(Cursor::new(input.as_bytes()), "bench", kind.schema(), &LogSink);
                let decoded = reader.filter(Result::is_ok).count();
                black_box(decoded)
            });
        });

        group.bench_with_input(
            BenchmarkId::new("decode_and_transform", rows),
            &dump,
            |b, input| {
                b.iter(|| {
                    let reader = RecordReader::new(
                        Cursor::new(input.as_bytes()),
                        "bench",
                        kind.schema(),
                        &LogSink,
                    );
                    let transformed = reader
                        .filter_map(Result::ok)
                        .filter_map(|record| {
                            RecordTransform::apply_all(kind.transforms(), record).ok()
                        })
                        .count();
                    black_box(transformed)
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_decode);
criterion_main!(benches);

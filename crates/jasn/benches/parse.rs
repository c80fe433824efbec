//! Benchmark – `jasn::parse` against `serde_json::from_slice`
#![allow(missing_docs)]

use std::{fmt::Write, time::Duration};

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

/// A deterministic array of `records` small objects, mixing every value kind.
fn make_records(records: usize) -> String {
    let mut s = String::from("[");
    for i in 0..records {
        if i > 0 {
            s.push(',');
        }
        write!(
            s,
            r#"{{"id":{i},"name":"user \"{i}\"","score":{}.5,"active":{},"tags":["a","bé"],"parent":null}}"#,
            i % 97,
            i % 2 == 0
        )
        .unwrap();
    }
    s.push(']');
    s
}

/// `depth` nested arrays around a single number.
fn make_nested(depth: usize) -> String {
    let mut s = "[".repeat(depth);
    s.push('0');
    s.push_str(&"]".repeat(depth));
    s
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");

    for &records in &[10usize, 1_000, 10_000] {
        let payload = make_records(records);
        group.throughput(Throughput::Bytes(payload.len() as u64));
        group.bench_with_input(BenchmarkId::new("jasn", records), &payload, |b, p| {
            b.iter(|| {
                let doc = jasn::parse(black_box(p.as_bytes())).unwrap();
                black_box(doc.value_count());
            });
        });
        group.bench_with_input(BenchmarkId::new("serde_json", records), &payload, |b, p| {
            b.iter(|| {
                let value: serde_json::Value = serde_json::from_slice(black_box(p.as_bytes())).unwrap();
                black_box(value);
            });
        });
    }
    group.finish();

    let mut group = c.benchmark_group("nested");
    for &depth in &[100usize, 10_000] {
        let payload = make_nested(depth);
        let options = jasn::ParserOptions {
            max_depth: depth,
            ..Default::default()
        };
        group.bench_with_input(BenchmarkId::new("jasn", depth), &payload, |b, p| {
            b.iter(|| {
                let doc = jasn::parse_with_options(black_box(p.as_bytes()), options).unwrap();
                black_box(doc.value_count());
            });
        });
    }
    group.finish();
}

fn criterion() -> Criterion {
    let mut c = Criterion::default();
    if cfg!(feature = "bench-fast") {
        c = c
            .warm_up_time(Duration::from_millis(10))
            .measurement_time(Duration::from_millis(100))
            .sample_size(10);
    } else {
        c = c
            .warm_up_time(Duration::from_secs(3))
            .measurement_time(Duration::from_secs(5));
    }
    c
}

criterion_group! { name = benches; config = criterion(); targets = bench_parse }
criterion_main!(benches);

//! Benchmarks for the JSON value scanner

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde_json::json;
use webview_bridge::envelope::RpcNamespace;
use webview_bridge::json::{self, Query};

fn bench_envelope_parse(c: &mut Criterion) {
    let rpc = RpcNamespace::new();
    let (_, message) = rpc.call(
        "save",
        &[json!("document.txt"), json!({"lines": 120, "dirty": true}), json!([1, 2, 3])],
    );

    c.bench_function("parse_envelope_method", |b| {
        b.iter(|| json::parse(black_box(&message), black_box("method"), 0))
    });

    c.bench_function("parse_envelope_params", |b| {
        b.iter(|| json::extract_str(black_box(&message), black_box("params"), 0))
    });
}

fn bench_array_index(c: &mut Criterion) {
    let mut group = c.benchmark_group("array_index");

    for len in [10usize, 100, 1000].iter() {
        let items: Vec<_> = (0..*len).map(|i| json!({"n": i, "s": "x"})).collect();
        let text = serde_json::Value::Array(items).to_string();

        group.bench_with_input(BenchmarkId::from_parameter(len), &text, |b, text| {
            b.iter(|| json::extract(black_box(text.as_bytes()), Query::Index(len - 1)))
        });
    }

    group.finish();
}

fn bench_unescape(c: &mut Criterion) {
    let quoted =
        serde_json::Value::String("line\none\ttab \"quoted\" \\ é".repeat(20)).to_string();

    c.bench_function("unescape_400_chars", |b| {
        b.iter(|| json::unescape(black_box(&quoted)))
    });
}

criterion_group!(benches, bench_envelope_parse, bench_array_index, bench_unescape);
criterion_main!(benches);

//! Benchmarks for block tree parsing.

#![allow(clippy::format_push_string)] // Benchmark setup code, performance not critical

use std::sync::Arc;

use bf_blocks::{BlockParser, parse_raw};
use bf_fields::{AssetResolver, FieldNormalizer};
use bf_store::MockStore;
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};

/// Generate a page with `sections` hero blocks, each holding `rows` repeater rows
/// and a nested paragraph.
fn generate_content(sections: usize, rows: usize) -> String {
    let mut content = String::with_capacity(sections * (200 + rows * 60));
    for i in 0..sections {
        let mut attrs = format!(r#"{{"title":"Section {i}","items":{rows},"_items":"hint""#);
        for r in 0..rows {
            attrs.push_str(&format!(r#","items_{r}_label":"Row {r}","items_{r}_image":{}"#, r + 1));
        }
        attrs.push('}');
        content.push_str(&format!("<!-- wp:acme/hero {attrs} -->\n"));
        content.push_str("<!-- wp:paragraph --><p>Body text for the section.</p><!-- /wp:paragraph -->\n");
        content.push_str("<!-- /wp:acme/hero -->\n\n");
    }
    content
}

fn store(rows: usize) -> MockStore {
    (1..=rows as u64).fold(MockStore::new(), |store, id| {
        store.with_asset(id, format!("/uploads/{id}.jpg"))
    })
}

fn bench_parse_raw(c: &mut Criterion) {
    let content = generate_content(20, 5);

    c.bench_function("parse_raw_20_sections", |b| {
        b.iter(|| parse_raw(&content));
    });
}

fn bench_parse_normalized(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_normalized");

    for sections in [5, 20, 80] {
        let content = generate_content(sections, 5);
        let resolver =
            AssetResolver::new(Arc::new(store(5))).with_base_url("https://cdn.example.com");
        let parser = BlockParser::new(FieldNormalizer::new(resolver));

        group.throughput(Throughput::Bytes(content.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(sections), &content, |b, content| {
            b.iter(|| parser.parse(content));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_parse_raw, bench_parse_normalized);
criterion_main!(benches);

//! Performance benchmarks for remap tables.
//!
//! Measures lookup latency and the cost of rebuilding a table.

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use replacements_core::{Identifier, InMemoryRegistry, MissingMapping, RemapTable};

fn id(s: &str) -> Identifier {
    Identifier::parse(s).unwrap()
}

/// Create a table over `size` registered targets and the entries remapping to them.
fn create_table(size: usize) -> (RemapTable<usize>, Vec<String>) {
    let registry: InMemoryRegistry<usize> = (0..size)
        .map(|i| (id(&format!("modb:target_{i}")), i))
        .collect();
    let table = RemapTable::<usize>::new("items", Arc::new(registry));
    let entries = (0..size)
        .map(|i| format!("moda:old_{i}=modb:target_{i}"))
        .collect();
    (table, entries)
}

/// Benchmark full table rebuilds.
fn bench_reload(c: &mut Criterion) {
    let mut group = c.benchmark_group("reload");

    for size in [10, 100, 1000] {
        let (table, entries) = create_table(size);

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("entries", size), &entries, |b, entries| {
            b.iter(|| black_box(table.reload(entries)));
        });
    }

    group.finish();
}

/// Benchmark single lookups, hit and miss.
fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve");

    let (table, entries) = create_table(1000);
    table.reload(&entries);
    let hit = id("moda:old_500");
    let miss = id("moda:never_configured");

    group.throughput(Throughput::Elements(1));
    group.bench_function("hit", |b| {
        b.iter(|| black_box(table.resolve(&hit)));
    });
    group.bench_function("miss", |b| {
        b.iter(|| black_box(table.resolve(&miss)));
    });

    group.finish();
}

/// Benchmark answering a batch of missing mappings.
fn bench_remap_missing(c: &mut Criterion) {
    let mut group = c.benchmark_group("remap_missing");

    let (table, entries) = create_table(1000);
    table.reload(&entries);
    let batch: Vec<MissingMapping<usize>> = (0..1000)
        .map(|i| MissingMapping::new(id(&format!("moda:old_{}", i * 2))))
        .collect();

    group.throughput(Throughput::Elements(batch.len() as u64));
    group.bench_function("batch_1000", |b| {
        b.iter(|| {
            let mut batch = batch.clone();
            black_box(table.remap_missing(&mut batch));
        });
    });

    group.finish();
}

/// Benchmark entry validation.
fn bench_validate(c: &mut Criterion) {
    let (table, _) = create_table(1000);

    c.bench_function("validate", |b| {
        b.iter(|| black_box(table.validate("moda:old_item=modb:target_42")));
    });
}

criterion_group!(benches, bench_reload, bench_resolve, bench_remap_missing, bench_validate);
criterion_main!(benches);

//! Benchmarks for ipgeo lookup performance.
//!
//! Run with: cargo bench
//!
//! This benchmark suite measures:
//! - Floor search throughput over IPv4 and IPv6 tables
//! - Cache hit vs miss performance of the shared store
//! - Table build time from range text

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ipgeo::{SharedStore, StoreConfig, Table, TableBuilder};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// Generate range text with `count` IPv4 /24 ranges and `count` IPv6 /32 ranges,
/// cycling through `distinct` metadata values.
fn generate_ranges(count: u32, distinct: u32) -> String {
    let mut text = String::new();

    for i in 0..count {
        let start = Ipv4Addr::from(0x0100_0000 + (i << 8));
        text.push_str(&format!(
            "{}\t\t\tCountry\tProvince{}\tCity{}\t\tISP\t\t{}\tNULL\tNULL\n",
            start,
            i % distinct,
            i % distinct,
            i % distinct
        ));
    }

    for i in 0..count {
        let start = Ipv6Addr::from((0x2001_0000u128 + i as u128) << 96);
        text.push_str(&format!(
            "{}\t\t\tCountry\tProvince{}\tCity{}\t\tISP\t\t{}\tNULL\tNULL\n",
            start,
            i % distinct,
            i % distinct,
            i % distinct
        ));
    }

    text
}

fn build_table(text: &str) -> Table {
    let mut builder = TableBuilder::default();
    builder.read_from(text.as_bytes(), "bench").unwrap();
    builder.finish()
}

/// Generate query addresses spread across the generated ranges.
fn generate_queries(count: u32, ranges: u32) -> Vec<IpAddr> {
    (0..count)
        .map(|i| {
            let range = (i * 7919) % ranges;
            if i % 2 == 0 {
                IpAddr::V4(Ipv4Addr::from(0x0100_0000 + (range << 8) + (i % 256)))
            } else {
                IpAddr::V6(Ipv6Addr::from(((0x2001_0000u128 + range as u128) << 96) + i as u128))
            }
        })
        .collect()
}

/// Benchmark raw table search.
fn bench_table_search(c: &mut Criterion) {
    let table = build_table(&generate_ranges(50_000, 1_000));
    let queries = generate_queries(1_000, 50_000);

    let mut group = c.benchmark_group("table_search");
    group.throughput(Throughput::Elements(queries.len() as u64));

    group.bench_function("mixed_protocols", |b| {
        b.iter(|| {
            for addr in &queries {
                black_box(table.search(*addr));
            }
        })
    });

    group.bench_function("text_address", |b| {
        b.iter(|| black_box(table.search_str("1.2.3.4")))
    });

    group.finish();
}

/// Benchmark scalability with different table sizes.
fn bench_scalability(c: &mut Criterion) {
    let mut group = c.benchmark_group("scalability");

    for size in [1_000u32, 10_000, 100_000].iter() {
        let table = build_table(&generate_ranges(*size, 1_000));
        let queries = generate_queries(100, *size);

        group.throughput(Throughput::Elements(queries.len() as u64));
        group.bench_with_input(BenchmarkId::new("ranges", size), size, |b, _| {
            b.iter(|| {
                for addr in &queries {
                    black_box(table.search(*addr));
                }
            })
        });
    }

    group.finish();
}

/// Benchmark the shared store with and without its query cache.
fn bench_shared_cache(c: &mut Criterion) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ranges.txt");
    std::fs::write(&path, generate_ranges(50_000, 1_000)).unwrap();

    let cached: SharedStore = SharedStore::with_cache_capacity(10_000);
    cached.load(StoreConfig::new([&path])).unwrap();
    let uncached: SharedStore = SharedStore::with_cache_capacity(0);
    uncached.load(StoreConfig::new([&path])).unwrap();

    let queries = generate_queries(1_000, 50_000);

    // Warm up cache
    for addr in &queries {
        let _ = cached.search_addr(*addr);
    }

    let mut group = c.benchmark_group("shared_store");
    group.throughput(Throughput::Elements(queries.len() as u64));

    group.bench_function("cache_hit", |b| {
        b.iter(|| {
            for addr in &queries {
                black_box(cached.search_addr(*addr));
            }
        })
    });

    group.bench_function("no_cache", |b| {
        b.iter(|| {
            for addr in &queries {
                black_box(uncached.search_addr(*addr));
            }
        })
    });

    group.finish();
}

/// Benchmark building a table from range text.
fn bench_build(c: &mut Criterion) {
    let text = generate_ranges(10_000, 1_000);

    let mut group = c.benchmark_group("build");
    group.throughput(Throughput::Elements(20_000));

    group.bench_function("build_20k_ranges", |b| b.iter(|| black_box(build_table(&text))));

    group.finish();
}

criterion_group!(
    benches,
    bench_table_search,
    bench_scalability,
    bench_shared_cache,
    bench_build,
);

criterion_main!(benches);

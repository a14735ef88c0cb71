//! Benchmarks for boundary location, extraction and discovery.
//!
//! Run with: `cargo bench`
//! Run specific group: `cargo bench --bench locate -- discovery`

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use smsexport::config::DiscoveryConfig;
use smsexport::core::{Direction, WindowDiscoverer, extract, locate};
use smsexport::date::{DateKey, Window};
use smsexport::source::MemorySource;
use smsexport::{Record, core::output::to_csv};

use chrono::{Duration, TimeZone, Utc};

// =============================================================================
// Test Data Generators
// =============================================================================

/// `count` records, three per day, oldest first.
fn generate_records(count: usize) -> Vec<Record> {
    let base = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
    (0..count)
        .map(|i| {
            Record::new(base + Duration::hours(i as i64 * 8))
                .with_from("+15550001111")
                .with_to("+15550002222")
                .with_status("delivered")
                .with_body(format!("Message number {i}"))
                .with_direction("outbound-api")
        })
        .collect()
}

fn generate_keys(count: usize) -> Vec<DateKey> {
    generate_records(count).iter().map(Record::date_key).collect()
}

/// Window covering the middle tenth of the generated history.
fn middle_window(records: &[Record]) -> Window {
    let len = records.len();
    let start = records[len * 45 / 100].date_key();
    let end = records[len * 55 / 100].date_key();
    Window::new(start, end).unwrap()
}

// =============================================================================
// Locate Benchmarks
// =============================================================================

fn bench_locate(c: &mut Criterion) {
    let mut group = c.benchmark_group("locate");

    for size in [1_000, 100_000, 1_000_000] {
        let keys = generate_keys(size);
        let target = keys[size / 3];
        group.bench_with_input(BenchmarkId::new("ceil", size), &keys, |b, keys| {
            b.iter(|| black_box(locate(black_box(keys), target, Direction::Ceil)));
        });
        group.bench_with_input(BenchmarkId::new("floor", size), &keys, |b, keys| {
            b.iter(|| black_box(locate(black_box(keys), target, Direction::Floor)));
        });
    }

    group.finish();
}

// =============================================================================
// Extract Benchmarks
// =============================================================================

fn bench_extract(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract");

    for size in [1_000, 10_000, 100_000] {
        let mut records = generate_records(size);
        let window = middle_window(&records);
        records.reverse();

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &records, |b, records| {
            b.iter(|| black_box(extract(black_box(records.clone()), &window)));
        });
    }

    group.finish();
}

// =============================================================================
// Discovery Benchmarks
// =============================================================================

fn bench_discovery(c: &mut Criterion) {
    let mut group = c.benchmark_group("discovery");

    for size in [1_000, 10_000, 100_000] {
        let records = generate_records(size);
        let start = records[size / 10].date_key();
        let source = MemorySource::new(records);

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &source, |b, source| {
            b.iter(|| {
                let mut discoverer =
                    WindowDiscoverer::new(source.clone(), DiscoveryConfig::default());
                black_box(discoverer.discover(black_box(start)).unwrap())
            });
        });
    }

    group.finish();
}

// =============================================================================
// Output Benchmarks
// =============================================================================

fn bench_csv_output(c: &mut Criterion) {
    let mut group = c.benchmark_group("csv_output");

    for size in [1_000, 10_000] {
        let records = generate_records(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &records, |b, records| {
            b.iter(|| black_box(to_csv(black_box(records)).unwrap()));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_locate,
    bench_extract,
    bench_discovery,
    bench_csv_output
);
criterion_main!(benches);

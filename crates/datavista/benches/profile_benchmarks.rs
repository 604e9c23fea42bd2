//! Loading, profiling and reporting performance benchmarks.

use chrono::{TimeZone, Utc};
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use datavista::{DataType, DataVista, SourceFormat};

/// Generate a sales-like CSV with some gaps and a mixed column.
fn generate_sales_data(rows: usize) -> String {
    let mut data = String::from("order_id,region,units,price,shipped,ordered_on,code\n");

    let regions = ["north", "south", "east", "west"];

    for row in 0..rows {
        data.push_str(&format!("{},", row + 1));
        data.push_str(regions[row % regions.len()]);
        data.push(',');
        if row % 17 != 0 {
            data.push_str(&format!("{}", row % 40));
        }
        data.push(',');
        data.push_str(&format!("{:.2},", 9.5 + (row % 25) as f64 * 0.75));
        data.push_str(if row % 2 == 0 { "True," } else { "False," });
        data.push_str(&format!("2023-{:02}-{:02},", (row % 12) + 1, (row % 28) + 1));
        if row % 50 == 0 {
            data.push_str("n/a-code\n");
        } else {
            data.push_str(&format!("{}\n", row % 300));
        }
    }

    data
}

fn bench_load(c: &mut Criterion) {
    let mut group = c.benchmark_group("load");
    let vista = DataVista::new();

    for rows in [100, 1_000, 10_000] {
        let data = generate_sales_data(rows);
        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(rows), &data, |b, data| {
            b.iter(|| vista.load_bytes(black_box(data.as_bytes()), SourceFormat::Csv))
        });
    }

    group.finish();
}

fn bench_profile(c: &mut Criterion) {
    let mut group = c.benchmark_group("profile");
    let vista = DataVista::new();

    for rows in [100, 1_000, 10_000] {
        let table = vista
            .load_bytes(generate_sales_data(rows).as_bytes(), SourceFormat::Csv)
            .unwrap();
        group.throughput(Throughput::Elements(rows as u64));
        group.bench_with_input(BenchmarkId::from_parameter(rows), &table, |b, table| {
            b.iter(|| vista.profile(black_box(table)))
        });
    }

    group.finish();
}

fn bench_coerce(c: &mut Criterion) {
    let mut group = c.benchmark_group("coerce");
    let vista = DataVista::new();
    let table = vista
        .load_bytes(generate_sales_data(10_000).as_bytes(), SourceFormat::Csv)
        .unwrap();

    group.bench_function("timestamp", |b| {
        b.iter_batched(
            || table.clone(),
            |mut table| vista.coerce(&mut table, "ordered_on", DataType::Timestamp),
            criterion::BatchSize::LargeInput,
        )
    });

    group.bench_function("rejected_integer", |b| {
        b.iter_batched(
            || table.clone(),
            |mut table| vista.coerce(&mut table, "code", DataType::Integer),
            criterion::BatchSize::LargeInput,
        )
    });

    group.finish();
}

fn bench_report(c: &mut Criterion) {
    let vista = DataVista::new();
    let generated_at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

    let header: Vec<String> = (0..200).map(|i| format!("field_{}", i)).collect();
    let values: Vec<String> = (0..200).map(|i| i.to_string()).collect();
    let data = format!("{}\n{}\n", header.join(","), values.join(","));
    let table = vista.load_bytes(data.as_bytes(), SourceFormat::Csv).unwrap();
    let profile = vista.profile(&table).unwrap();

    c.bench_function("report_200_columns", |b| {
        b.iter(|| vista.render_report(black_box(&profile), 1, 200, generated_at))
    });
}

criterion_group!(benches, bench_load, bench_profile, bench_coerce, bench_report);
criterion_main!(benches);

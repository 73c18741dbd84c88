//! Analysis Pipeline Benchmarks
//!
//! **Purpose:** Measure ingest, aggregation, recommendation and export over
//! generated extracts of increasing size
//!
//! **How to Run:**
//! ```bash
//! cargo bench --bench pipeline
//! ```

use cost_optimizer::aggregate::aggregate;
use cost_optimizer::ingest::normalize;
use cost_optimizer::pipeline::{Pipeline, SessionId};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::fmt::Write;
use std::hint::black_box;

const SERVICES: [&str; 5] = ["EC2", "S3", "RDS", "Lambda", "EBS"];

fn extract(rows: usize) -> String {
    let mut csv = String::from(
        "Service,Region,Cost,Date,ResourceId,InstanceType,CpuUtilization,RunningHours,StorageUsed,AccessCount,Attached\n",
    );
    for i in 0..rows {
        let service = SERVICES[i % SERVICES.len()];
        let (kind, cpu, hours, storage, access, attached) = match service {
            "EC2" => ("m5.2xlarge", (i % 60).to_string(), (100 + i % 600).to_string(), String::new(), String::new(), ""),
            "RDS" => ("db.r5.xlarge", (i % 50).to_string(), String::new(), String::new(), String::new(), ""),
            "S3" => ("", String::new(), String::new(), (500 + i % 9000).to_string(), (i % 120).to_string(), ""),
            "Lambda" => ("1024MB", String::new(), String::new(), String::new(), String::new(), ""),
            _ => ("gp2", String::new(), String::new(), String::new(), String::new(), if i % 3 == 0 { "false" } else { "true" }),
        };
        let _ = writeln!(
            csv,
            "{},us-east-1,{}.{:02},2025-{:02},res-{},{},{},{},{},{},{}",
            service,
            50 + i % 900,
            i % 100,
            1 + i % 12,
            i % 200,
            kind,
            cpu,
            hours,
            storage,
            access,
            attached
        );
    }
    csv
}

fn bench_stages(c: &mut Criterion) {
    let mut group = c.benchmark_group("stages");
    for rows in [100, 1_000, 10_000] {
        let csv = extract(rows);
        let records = normalize(&csv).unwrap().records;
        group.throughput(Throughput::Elements(rows as u64));

        group.bench_with_input(BenchmarkId::new("normalize", rows), &csv, |b, csv| {
            b.iter(|| black_box(normalize(black_box(csv))).unwrap());
        });
        group.bench_with_input(BenchmarkId::new("aggregate", rows), &records, |b, records| {
            b.iter(|| black_box(aggregate(black_box(records))));
        });
    }
    group.finish();
}

fn bench_end_to_end(c: &mut Criterion) {
    let mut group = c.benchmark_group("end_to_end");
    for rows in [100, 1_000, 10_000] {
        let csv = extract(rows);
        group.throughput(Throughput::Elements(rows as u64));
        group.bench_with_input(BenchmarkId::new("analyze_and_export", rows), &csv, |b, csv| {
            let pipeline = Pipeline::default();
            let id = SessionId::new("bench");
            b.iter(|| {
                let session = pipeline.analyze(&id, black_box(csv)).unwrap();
                black_box(pipeline.export_config(&session)).unwrap();
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_stages, bench_end_to_end);
criterion_main!(benches);

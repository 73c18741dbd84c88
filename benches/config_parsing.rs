//! Config File Parsing Benchmarks
//!
//! **Purpose:** Measure loading and resolution of `.cost-optimizer.toml`
//!
//! **How to Run:**
//! ```bash
//! cargo bench --bench config_parsing
//! ```
//!
//! **What's Being Measured:**
//! 1. `load config from file` - File I/O + TOML parsing
//! 2. `resolve profile` - Preset lookup, overrides and validation

use cost_optimizer::config::{ConfigLoader, ProfileResolver};
use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use std::fs;
use std::hint::black_box;
use tempfile::TempDir;

const CONFIG: &str = r#"
profile = "conservative"

[thresholds]
min-confidence = 60.0
min-monthly-savings = 10

[heuristics]
ec2-cpu-threshold = 25.0
reserved-services = ["EC2", "RDS"]
"#;

fn config_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(".cost-optimizer.toml"), CONFIG).unwrap();
    dir
}

fn bench_load_config(c: &mut Criterion) {
    c.bench_function("load config from file", |b| {
        b.iter_batched(
            config_dir,
            |dir| {
                black_box(ConfigLoader::load(dir.path())).unwrap();
            },
            BatchSize::SmallInput,
        );
    });
}

fn bench_resolve_profile(c: &mut Criterion) {
    let dir = config_dir();
    let config = ConfigLoader::load(dir.path()).unwrap();
    c.bench_function("resolve profile", |b| {
        b.iter(|| black_box(ProfileResolver::resolve(black_box(&config))).unwrap());
    });
}

criterion_group!(benches, bench_load_config, bench_resolve_profile);
criterion_main!(benches);

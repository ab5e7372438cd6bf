use std::hint::black_box;

use rtofloat::utils::Lfsr;
use rtofloat::{engine, ops, rounder, PrecisionCtx, RoundingMode, SubnormalCtx};

use RoundingMode::NearestEven as rne;

fn inputs() -> Vec<(f64, f64)> {
    let mut lfsr = Lfsr::new();
    (0..1000)
        .map(|_| (lfsr.get_f32() as f64, lfsr.get_f32() as f64))
        .collect()
}

fn test_native_mul(values: &[(f64, f64)]) {
    for &(x, y) in values {
        black_box(black_box(x) * black_box(y));
    }
}

fn test_engine_mul(values: &[(f64, f64)]) {
    for &(x, y) in values {
        black_box(engine::mul(x, y, 53));
    }
}

fn test_rounder(values: &[(f64, f64)]) {
    for &(x, _) in values {
        black_box(rounder::round(x, 24, Some(-150), rne));
    }
}

fn test_ops_mul(values: &[(f64, f64)]) {
    let ctx = PrecisionCtx::new(24, rne);
    for &(x, y) in values {
        black_box(ops::mul(x, y, &ctx));
    }
}

fn test_ops_fma(values: &[(f64, f64)]) {
    let ctx = SubnormalCtx::new(24, -126, rne);
    for &(x, y) in values {
        black_box(ops::fma(x, y, 1.0, &ctx));
    }
}

use criterion::{criterion_group, criterion_main, Criterion};

pub fn criterion_benchmark(c: &mut Criterion) {
    let values = inputs();
    c.bench_function("native_mul", |b| b.iter(|| test_native_mul(&values)));
    c.bench_function("engine_mul", |b| b.iter(|| test_engine_mul(&values)));
    c.bench_function("rounder", |b| b.iter(|| test_rounder(&values)));
    c.bench_function("ops_mul", |b| b.iter(|| test_ops_mul(&values)));
    c.bench_function("ops_fma", |b| b.iter(|| test_ops_fma(&values)));
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);

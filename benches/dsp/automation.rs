//! Benchmarks for evaluating automation curves per sample.

use std::hint::black_box;

use chiptone::dsp::Curve;
use criterion::{BenchmarkId, Criterion};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_automation(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/automation");

    // Exponential segments call powf per sample
    let glide = Curve::starting_at(600.0).exponential_to(300.0, 0.1);
    // Several segments to walk past
    let stepped = Curve::starting_at(200.0)
        .step_to(150.0, 0.2)
        .step_to(100.0, 0.4)
        .linear_to(100.0, 0.6)
        .linear_to(0.0, 1.4);

    for &size in BLOCK_SIZES {
        for (name, curve) in [("exponential", &glide), ("stepped", &stepped)] {
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, &size| {
                b.iter(|| {
                    let mut acc = 0.0f32;
                    for i in 0..size {
                        acc += curve.value_at(black_box(i as f32 / SAMPLE_RATE));
                    }
                    black_box(acc)
                })
            });
        }
    }

    group.finish();
}

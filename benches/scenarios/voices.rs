//! Renderer cost by number of simultaneous voices.

use std::hint::black_box;

use chiptone::{
    backend::{stream, AudioClock},
    dsp::{Curve, Waveform},
    synth::voice::{Bus, Voice},
    EngineConfig,
};
use criterion::{BenchmarkId, Criterion};

use crate::SAMPLE_RATE;

const BLOCK: usize = 256;

fn voice(i: usize) -> Voice {
    let waveform = [
        Waveform::Sine,
        Waveform::Square,
        Waveform::Triangle,
        Waveform::Sawtooth,
    ][i % 4];
    Voice::new(
        Bus::Effects,
        waveform,
        Curve::starting_at(220.0 + i as f32 * 30.0).exponential_to(110.0, 1_000.0),
        Curve::starting_at(0.01).linear_to(0.0, 1_000.0),
        0.0,
        1_000.0,
    )
    .expect("valid voice")
}

pub fn bench_voices(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/voices");

    for count in [1, 8, 32, 128] {
        let config = EngineConfig::default().max_voices(count);
        let (mut handle, mut renderer) = stream::channel(SAMPLE_RATE, &config);
        for i in 0..count {
            handle.schedule(voice(i));
        }
        let mut buffer = vec![0.0f32; BLOCK];
        renderer.render(&mut buffer);

        group.bench_with_input(BenchmarkId::new("block_256", count), &count, |b, _| {
            b.iter(|| renderer.render(black_box(&mut buffer)))
        });
    }

    group.finish();
}

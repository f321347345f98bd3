//! The full engine rendering offline: music running, effects firing.

use std::hint::black_box;

use chiptone::{backend::stream, Effect, Engine, EngineConfig, Flavor, TimerMode};
use criterion::Criterion;

use crate::SAMPLE_RATE;

/// One 25 ms polling tick at 48kHz.
const TICK_FRAMES: usize = 1_200;

pub fn bench_engine(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/engine");

    let config = EngineConfig::default().timer(TimerMode::Manual);
    let (handle, mut renderer) = stream::channel(SAMPLE_RATE, &config);
    let mut engine = Engine::with_stream(config, handle, None);
    engine.start_music();

    let mut buffer = vec![0.0f32; TICK_FRAMES];
    let mut flavor = 0;

    group.bench_function("tick_with_music", |b| {
        b.iter(|| {
            engine.poll();
            renderer.render(black_box(&mut buffer));
        })
    });

    group.bench_function("tick_with_music_and_effect", |b| {
        b.iter(|| {
            flavor = (flavor + 1) % Flavor::ALL.len();
            engine.poll();
            engine.trigger_effect(Effect::BuildItem(Flavor::ALL[flavor]));
            renderer.render(black_box(&mut buffer));
        })
    });

    group.finish();
}

//! Real-world scenario benchmarks.
//!
//! These drive the renderer the way the output callback does, with a
//! realistic number of voices sounding.

mod engine;
mod voices;

pub use engine::bench_engine;
pub use voices::bench_voices;

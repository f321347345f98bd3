//! chiptone - terminal front end for the procedural audio engine
//!
//! Run with: cargo run
//! Logs go to stderr; set RUST_LOG=chiptone=debug to see them.

mod app;
mod ui;

use app::App;
use chiptone::{Engine, EngineConfig};

/// Samples the scope tap can hold between UI frames.
const SCOPE_CAPACITY: usize = 8192;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let (engine, scope) =
        Engine::connect_default_with_scope(EngineConfig::default(), SCOPE_CAPACITY);

    let mut terminal = ratatui::init();
    let result = App::new(engine, scope).run(&mut terminal);
    ratatui::restore();

    result
}

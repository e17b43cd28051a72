//! polytone - play a MIDI keyboard through the tone synth
//!
//! Run with: cargo run

mod app;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    app::run()
}

use anyhow::Result;
use clap::Parser;
use persona_live::{default_personas, Config};
use tracing::info;

#[derive(Parser)]
#[command(name = "persona-live")]
struct Args {
    /// Path to the configuration file (without extension)
    #[arg(long, default_value = "config/persona-live")]
    config: String,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let cfg = Config::load(&args.config)?;

    info!("Persona Live v0.1.0");
    info!("Loaded config: {}", cfg.service.name);
    info!("Speech transport endpoint: {}", cfg.transport.url);
    info!(
        "Audio: {}Hz capture / {}Hz playback, {} samples per frame",
        cfg.audio.capture_sample_rate, cfg.audio.playback_sample_rate, cfg.audio.frame_samples
    );

    for persona in default_personas() {
        info!("Persona available: {} ({})", persona.name, persona.id);
    }

    Ok(())
}

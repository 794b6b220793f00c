use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub audio: AudioConfig,
    pub transport: TransportConfig,
}

#[derive(Debug, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct AudioConfig {
    /// Capture leg sample rate (the speech model expects 16kHz)
    pub capture_sample_rate: u32,
    /// Playback leg sample rate (synthesized audio arrives at 24kHz)
    pub playback_sample_rate: u32,
    /// Samples per capture frame
    pub frame_samples: usize,
}

#[derive(Debug, Deserialize)]
pub struct TransportConfig {
    /// WebSocket endpoint of the speech model
    pub url: String,
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}

use anyhow::{bail, Context, Result};
use base64::Engine;
use serde::{Deserialize, Serialize};

/// Sample rate the speech model expects on the capture leg
pub const CAPTURE_SAMPLE_RATE: u32 = 16_000;
/// Sample rate of synthesized audio on the playback leg
pub const PLAYBACK_SAMPLE_RATE: u32 = 24_000;

/// A block of PCM audio encoded for a text-oriented channel
///
/// Produced by the codec from a captured frame, owned transiently by the
/// duplex session until sent, and discarded after transmission.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MediaBlob {
    /// Base64-encoded PCM16-LE bytes
    pub data: String,
    /// Mime tag identifying rate and encoding, e.g. "audio/pcm;rate=16000"
    pub mime_type: String,
}

/// Mime tag for PCM at the given sample rate
pub fn pcm_mime_type(sample_rate: u32) -> String {
    format!("audio/pcm;rate={}", sample_rate)
}

/// Convert float samples to 16-bit little-endian PCM bytes
///
/// Each sample is clamped to [-1, 1], scaled by 32768 and truncated toward
/// zero. Full-scale positive input saturates at i16::MAX.
pub fn pcm16_from_f32(samples: &[f32]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(samples.len() * 2);
    for &sample in samples {
        let scaled = (sample.clamp(-1.0, 1.0) * 32768.0) as i32;
        let value = scaled.clamp(i16::MIN as i32, i16::MAX as i32) as i16;
        bytes.extend_from_slice(&value.to_le_bytes());
    }
    bytes
}

/// Convert 16-bit little-endian PCM bytes to float samples, de-interleaved
/// per channel
///
/// Inverse of `pcm16_from_f32`: each sample is divided by 32768.0.
pub fn f32_from_pcm16(bytes: &[u8], channels: usize) -> Result<Vec<Vec<f32>>> {
    if channels == 0 {
        bail!("channel count must be at least 1");
    }
    if bytes.len() % (2 * channels) != 0 {
        bail!(
            "PCM payload of {} bytes is not a whole number of {}-channel frames",
            bytes.len(),
            channels
        );
    }

    let frame_count = bytes.len() / (2 * channels);
    let mut out = vec![Vec::with_capacity(frame_count); channels];

    for (i, pair) in bytes.chunks_exact(2).enumerate() {
        let value = i16::from_le_bytes([pair[0], pair[1]]);
        out[i % channels].push(value as f32 / 32768.0);
    }

    Ok(out)
}

/// Encode raw bytes as transport-safe text (base64)
pub fn transport_encode(bytes: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

/// Decode transport text back to raw bytes
pub fn transport_decode(text: &str) -> Result<Vec<u8>> {
    base64::engine::general_purpose::STANDARD
        .decode(text)
        .context("Failed to decode transport audio payload")
}

/// Encode one captured frame as a blob ready for the duplex session
pub fn encode_frame(samples: &[f32], sample_rate: u32) -> MediaBlob {
    MediaBlob {
        data: transport_encode(&pcm16_from_f32(samples)),
        mime_type: pcm_mime_type(sample_rate),
    }
}

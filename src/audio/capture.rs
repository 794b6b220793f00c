use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::codec::{self, MediaBlob};

/// A fixed-duration block of single-channel float samples from the microphone
///
/// Ephemeral: produced by the mic source and consumed within one processing
/// tick of the capture pipeline.
#[derive(Debug, Clone)]
pub struct AudioFrame {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

/// Why microphone access could not be established
#[derive(Debug, Clone, Error)]
pub enum MicError {
    #[error("microphone permission denied")]
    PermissionDenied,

    #[error("microphone permission request dismissed")]
    PermissionDismissed,

    #[error("no microphone found on this device")]
    NoDevice,

    #[error("microphone error: {0}")]
    Other(String),
}

impl MicError {
    /// Text suitable for a system-style chat message
    pub fn user_message(&self) -> String {
        match self {
            MicError::PermissionDenied => {
                "Microphone permission denied. Please allow microphone access and try again."
                    .to_string()
            }
            MicError::PermissionDismissed => {
                "Microphone permission was dismissed. Please start again and allow access when prompted."
                    .to_string()
            }
            MicError::NoDevice => "No microphone found on this device.".to_string(),
            MicError::Other(detail) => format!("Microphone error: {}", detail),
        }
    }
}

/// Microphone input seam
///
/// Platform backends implement this; tests drive the pipeline with a channel
/// standing in for a device.
#[async_trait::async_trait]
pub trait MicSource: Send + Sync {
    /// Request microphone access and start the input stream
    ///
    /// Returns a channel receiver producing fixed-size frames until the
    /// receiver is dropped.
    async fn acquire(&mut self) -> Result<mpsc::Receiver<AudioFrame>, MicError>;

    /// Source name for logging
    fn name(&self) -> &str;
}

/// Pulls frames from the microphone stream, encodes each one, and forwards it
/// toward the duplex session
///
/// Forwarding is fire-and-forget: frames the session is not ready for are
/// dropped, never queued.
pub struct CapturePipeline {
    running: Arc<AtomicBool>,
    task: Option<JoinHandle<()>>,
}

impl CapturePipeline {
    pub fn new() -> Self {
        Self {
            running: Arc::new(AtomicBool::new(false)),
            task: None,
        }
    }

    /// Attach the encoding tap to a frame stream
    pub fn start(
        &mut self,
        mut frames: mpsc::Receiver<AudioFrame>,
        outbound: mpsc::Sender<MediaBlob>,
    ) {
        if self.running.swap(true, Ordering::SeqCst) {
            warn!("Capture pipeline already started");
            return;
        }

        let running = Arc::clone(&self.running);

        let task = tokio::spawn(async move {
            info!("Capture pipeline started");

            while let Some(frame) = frames.recv().await {
                if !running.load(Ordering::SeqCst) {
                    break;
                }

                let blob = codec::encode_frame(&frame.samples, frame.sample_rate);

                // Fire-and-forget: a full or closed channel means the session
                // cannot accept input right now, so the frame is dropped.
                if let Err(e) = outbound.try_send(blob) {
                    debug!("Dropped captured frame: {}", e);
                }
            }

            info!("Capture pipeline stopped");
        });

        self.task = Some(task);
    }

    /// Detach the tap
    ///
    /// Safe to call repeatedly and when never started.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);

        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

impl Default for CapturePipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for CapturePipeline {
    fn drop(&mut self) {
        self.stop();
    }
}

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::transcript::TranscriptSync;
use crate::audio::playback::PlaybackScheduler;
use crate::audio::{codec, MediaBlob, PLAYBACK_SAMPLE_RATE};
use crate::chat::ChatLog;
use crate::transport::{
    ConnectConfig, RealtimeInput, ServerMessage, SpeechTransport, TransportEvent,
};

/// Lifecycle of one duplex connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Connecting,
    Open,
    Closing,
}

/// One duplex streaming connection to the speech model
///
/// Owns the connection's state machine and the routing of inbound messages
/// into playback, transcript, and chat-log actions. Exactly one session is
/// live at a time; the controller tears an old one down before starting a
/// new one.
pub struct DuplexSession {
    state: SessionState,
    events: mpsc::Receiver<TransportEvent>,
    outbound: Option<mpsc::Sender<RealtimeInput>>,
}

impl DuplexSession {
    /// Begin an asynchronous connection attempt
    ///
    /// Returns immediately; the session stays in `Connecting` until the
    /// transport reports `Opened` through `next_event`.
    pub fn connect(transport: &dyn SpeechTransport, config: ConnectConfig) -> Self {
        let events = transport.connect(config);

        Self {
            state: SessionState::Connecting,
            events,
            outbound: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Wait for the next transport event, applying lifecycle transitions
    ///
    /// `None` means the transport task is gone; callers treat it as a close.
    pub async fn next_event(&mut self) -> Option<TransportEvent> {
        let event = self.events.recv().await;

        match &event {
            Some(TransportEvent::Opened(outbound)) => {
                info!("Duplex session open");
                self.outbound = Some(outbound.clone());
                self.state = SessionState::Open;
            }
            Some(TransportEvent::Closed) => {
                info!("Duplex session closed by remote");
                self.outbound = None;
                self.state = SessionState::Idle;
            }
            Some(TransportEvent::Failed(reason)) => {
                warn!("Duplex session failed: {}", reason);
                self.outbound = None;
                self.state = SessionState::Idle;
            }
            Some(TransportEvent::Message(_)) => {}
            None => {
                self.outbound = None;
                self.state = SessionState::Idle;
            }
        }

        event
    }

    /// Send one encoded capture frame
    ///
    /// Valid only while open; otherwise the frame is dropped silently, which
    /// is what discards audio captured before the channel opened.
    pub fn send_frame(&self, blob: MediaBlob) {
        if self.state != SessionState::Open {
            return;
        }

        if let Some(outbound) = &self.outbound {
            if let Err(e) = outbound.try_send(RealtimeInput { media: blob }) {
                debug!("Dropped outbound frame: {}", e);
            }
        }
    }

    /// Route one inbound message to the owning components
    ///
    /// A malformed audio chunk is logged and skipped; it never aborts the
    /// session.
    pub fn handle_server_message(
        &mut self,
        message: ServerMessage,
        scheduler: &mut PlaybackScheduler,
        transcript: &mut TranscriptSync,
        chat: &dyn ChatLog,
    ) {
        let Some(content) = message.server_content else {
            return;
        };

        if let Some(model_turn) = &content.model_turn {
            for part in &model_turn.parts {
                let Some(blob) = &part.inline_data else {
                    continue;
                };

                match decode_audio_chunk(blob) {
                    Ok(samples) => {
                        scheduler.enqueue(samples, PLAYBACK_SAMPLE_RATE);
                    }
                    Err(e) => {
                        warn!("Skipping undecodable audio chunk: {}", e);
                    }
                }
            }
        }

        if content.interrupted == Some(true) {
            info!("Model interrupted by user speech");
            scheduler.interrupt_all();
        }

        if let Some(delta) = &content.input_transcription {
            transcript.push_user(&delta.text);
        }

        if let Some(delta) = &content.output_transcription {
            transcript.push_model(&delta.text);
        }

        if content.turn_complete == Some(true) {
            transcript.flush(chat);
        }
    }

    /// Request graceful shutdown
    ///
    /// Tolerates being called when already closed or never opened. Dropping
    /// the outbound sender lets the transport close its write half; the
    /// session stays in `Closing` until the transport confirms through
    /// `next_event` (`Closed`, `Failed`, or end of stream).
    pub fn close(&mut self) {
        if self.state == SessionState::Idle {
            return;
        }

        self.outbound = None;
        self.state = SessionState::Closing;
        debug!("Duplex session closing");
    }
}

fn decode_audio_chunk(blob: &MediaBlob) -> anyhow::Result<Vec<f32>> {
    let bytes = codec::transport_decode(&blob.data)?;
    let mut channels = codec::f32_from_pcm16(&bytes, 1)?;
    Ok(channels.remove(0))
}

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use super::duplex::DuplexSession;
use super::transcript::TranscriptSync;
use crate::audio::playback::PlaybackScheduler;
use crate::audio::{
    CapturePipeline, MediaBlob, MicSource, SpeakingEvent, SystemClock, TimerSink,
};
use crate::chat::{ChatLog, ChatTurn};
use crate::persona::Persona;
use crate::transport::{ConnectConfig, SessionSetup, SpeechTransport, TransportEvent};

/// Encoded frames buffered between the capture tap and the duplex session
const CAPTURE_QUEUE_DEPTH: usize = 32;

/// Top-level lifecycle of the voice mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    Inactive,
    AcquiringMic,
    Connecting,
    Live,
}

enum ControllerCommand {
    Stop,
}

/// Coordinates microphone, playback, duplex session, and transcript for one
/// voice session at a time
///
/// Owns every transient resource of a live session and guarantees that any
/// failure path, remote close, or explicit stop lands back in `Inactive`
/// with nothing left running.
pub struct SessionController {
    state: ControllerState,
    /// Cleared by the live loop itself when the session dies remotely
    live: Arc<AtomicBool>,
    mic: Box<dyn MicSource>,
    transport: Arc<dyn SpeechTransport>,
    chat: Arc<dyn ChatLog>,
    transport_url: String,
    active_persona: Persona,
    cmd_tx: Option<mpsc::Sender<ControllerCommand>>,
    task: Option<JoinHandle<()>>,
    speaking_rx: Option<mpsc::UnboundedReceiver<SpeakingEvent>>,
}

impl SessionController {
    pub fn new(
        mic: Box<dyn MicSource>,
        transport: Arc<dyn SpeechTransport>,
        chat: Arc<dyn ChatLog>,
        transport_url: String,
        active_persona: Persona,
    ) -> Self {
        Self {
            state: ControllerState::Inactive,
            live: Arc::new(AtomicBool::new(false)),
            mic,
            transport,
            chat,
            transport_url,
            active_persona,
            cmd_tx: None,
            task: None,
            speaking_rx: None,
        }
    }

    pub fn state(&self) -> ControllerState {
        match self.state {
            // The live loop exits on its own when the transport closes or
            // fails; reflect that without waiting for user interaction.
            ControllerState::Live if !self.live.load(Ordering::SeqCst) => ControllerState::Inactive,
            state => state,
        }
    }

    pub fn active_persona(&self) -> &Persona {
        &self.active_persona
    }

    /// Speaking indicator events for the current session, if one was started
    pub fn take_speaking_events(&mut self) -> Option<mpsc::UnboundedReceiver<SpeakingEvent>> {
        self.speaking_rx.take()
    }

    /// Stop if live, otherwise start
    pub async fn toggle(&mut self) -> Result<()> {
        if self.state() == ControllerState::Live {
            self.stop().await;
            Ok(())
        } else {
            self.start().await
        }
    }

    /// Run the start sequence: microphone, clocks, duplex session
    ///
    /// A microphone failure is recovered locally: one system chat message,
    /// no session, no dangling resources, and `Ok` is returned because the
    /// user saw the outcome.
    pub async fn start(&mut self) -> Result<()> {
        if self.state() == ControllerState::Live {
            warn!("Voice session already live");
            return Ok(());
        }

        // Reap a previous session that ended on its own before starting anew.
        self.stop().await;

        info!(
            "Starting voice session for persona '{}'",
            self.active_persona.name
        );
        self.state = ControllerState::AcquiringMic;

        let mic_frames = match self.mic.acquire().await {
            Ok(frames) => frames,
            Err(e) => {
                warn!("Microphone acquisition failed: {}", e);
                self.chat.append(ChatTurn::system(&e.user_message()));
                self.state = ControllerState::Inactive;
                return Ok(());
            }
        };
        info!("Microphone '{}' ready", self.mic.name());

        self.state = ControllerState::Connecting;

        // Output clock and sink for the playback leg.
        let clock = SystemClock::new();
        let (ended_tx, ended_rx) = mpsc::unbounded_channel();
        let sink = TimerSink::new(clock, ended_tx);
        let (scheduler, speaking_rx) = PlaybackScheduler::new(Box::new(clock), Box::new(sink));
        self.speaking_rx = Some(speaking_rx);

        let config = ConnectConfig {
            url: self.transport_url.clone(),
            setup: SessionSetup::for_persona(&self.active_persona),
        };
        let duplex = DuplexSession::connect(self.transport.as_ref(), config);

        let (blob_tx, blob_rx) = mpsc::channel(CAPTURE_QUEUE_DEPTH);
        let (cmd_tx, cmd_rx) = mpsc::channel(1);

        // Encoding starts right away so pre-open audio is consumed in real
        // time; the duplex open gate discards those blobs instead of queueing
        // them for transmission.
        let mut capture = CapturePipeline::new();
        capture.start(mic_frames, blob_tx);

        self.live.store(true, Ordering::SeqCst);

        let live_loop = LiveLoop {
            duplex,
            capture,
            scheduler: Some(scheduler),
            transcript: TranscriptSync::new(),
            chat: Arc::clone(&self.chat),
            blob_rx,
            ended_rx,
            cmd_rx,
            live: Arc::clone(&self.live),
        };

        self.task = Some(tokio::spawn(live_loop.run()));
        self.cmd_tx = Some(cmd_tx);
        self.state = ControllerState::Live;

        Ok(())
    }

    /// Full teardown; idempotent and callable from any state
    pub async fn stop(&mut self) {
        if let Some(cmd_tx) = self.cmd_tx.take() {
            let _ = cmd_tx.send(ControllerCommand::Stop).await;
        }

        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                error!("Live session task panicked: {}", e);
            }
        }

        self.live.store(false, Ordering::SeqCst);
        self.speaking_rx = None;
        self.state = ControllerState::Inactive;
    }

    /// Switch the active persona
    ///
    /// A live session is tied to one persona's configuration and cannot be
    /// hot-swapped, so switching tears the session down first.
    pub async fn set_active_persona(&mut self, persona: Persona) {
        if self.state() == ControllerState::Live {
            info!("Persona switched while live; tearing down session");
            self.stop().await;
        }

        self.active_persona = persona;
    }
}

/// Owns every mutable piece of one live session and runs its event loop
///
/// All mutation of the playback live set and the transcript buffers happens
/// inside this loop, so no callback races user-initiated teardown.
struct LiveLoop {
    duplex: DuplexSession,
    capture: CapturePipeline,
    scheduler: Option<PlaybackScheduler>,
    transcript: TranscriptSync,
    chat: Arc<dyn ChatLog>,
    blob_rx: mpsc::Receiver<MediaBlob>,
    ended_rx: mpsc::UnboundedReceiver<u64>,
    cmd_rx: mpsc::Receiver<ControllerCommand>,
    live: Arc<AtomicBool>,
}

impl LiveLoop {
    async fn run(mut self) {
        loop {
            tokio::select! {
                event = self.duplex.next_event() => {
                    match event {
                        Some(TransportEvent::Opened(_)) => {
                            // Capture has been running since start; from here
                            // its blobs pass the open gate in `send_frame`.
                        }
                        Some(TransportEvent::Message(message)) => {
                            if let Some(scheduler) = self.scheduler.as_mut() {
                                self.duplex.handle_server_message(
                                    message,
                                    scheduler,
                                    &mut self.transcript,
                                    self.chat.as_ref(),
                                );
                            }
                        }
                        Some(TransportEvent::Closed)
                        | Some(TransportEvent::Failed(_))
                        | None => break,
                    }
                }
                Some(blob) = self.blob_rx.recv() => {
                    self.duplex.send_frame(blob);
                }
                Some(unit_id) = self.ended_rx.recv() => {
                    if let Some(scheduler) = self.scheduler.as_mut() {
                        scheduler.unit_ended(unit_id);
                    }
                }
                _ = self.cmd_rx.recv() => break,
            }
        }

        self.teardown();
    }

    fn teardown(mut self) {
        self.capture.stop();
        self.duplex.close();

        if let Some(scheduler) = self.scheduler.take() {
            scheduler.teardown();
        }

        self.live.store(false, Ordering::SeqCst);
        info!("Voice session torn down");
    }
}

//! Duplex channel to the remote speech model
//!
//! The session core only sees the `SpeechTransport` seam and its event
//! stream; `ws` provides the production WebSocket implementation.

pub mod messages;
pub mod ws;

use tokio::sync::mpsc;

pub use messages::{RealtimeInput, ServerContent, ServerMessage, SessionSetup};
pub use ws::WsTransport;

/// Everything needed to open one duplex connection
#[derive(Debug, Clone)]
pub struct ConnectConfig {
    pub url: String,
    pub setup: SessionSetup,
}

/// Lifecycle and traffic events for one connection attempt
#[derive(Debug)]
pub enum TransportEvent {
    /// The channel is open; audio frames can be sent on the returned sender
    Opened(mpsc::Sender<RealtimeInput>),
    /// One inbound message from the speech model
    Message(ServerMessage),
    /// The remote closed the channel
    Closed,
    /// The channel failed; no automatic retry
    Failed(String),
}

/// Factory seam for duplex connections
///
/// `connect` returns immediately with an event stream; the first event is
/// either `Opened` or `Failed`.
pub trait SpeechTransport: Send + Sync {
    fn connect(&self, config: ConnectConfig) -> mpsc::Receiver<TransportEvent>;
}

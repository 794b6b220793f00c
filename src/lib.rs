pub mod audio;
pub mod chat;
pub mod config;
pub mod persona;
pub mod session;
pub mod transport;

pub use audio::{
    AudioFrame, CapturePipeline, MediaBlob, MicError, MicSource, PlaybackScheduler, SpeakingEvent,
    SystemClock, TimerSink, CAPTURE_SAMPLE_RATE, PLAYBACK_SAMPLE_RATE,
};
pub use chat::{ChatLog, ChatTurn, MemoryChatLog, Role, TurnId};
pub use config::Config;
pub use persona::{default_personas, Persona, PersonaTraits};
pub use session::{
    ControllerState, DuplexSession, SessionController, SessionState, TranscriptSync,
};
pub use transport::{
    ConnectConfig, RealtimeInput, ServerMessage, SessionSetup, SpeechTransport, TransportEvent,
    WsTransport,
};

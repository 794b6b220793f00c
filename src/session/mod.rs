//! Voice session management
//!
//! This module provides the live-session core:
//! - `DuplexSession`: lifecycle and message routing for one duplex stream
//! - `TranscriptSync`: per-turn transcription accumulation and flushing
//! - `SessionController`: the top-level start/stop state machine

mod controller;
mod duplex;
mod transcript;

pub use controller::{ControllerState, SessionController};
pub use duplex::{DuplexSession, SessionState};
pub use transcript::{TranscriptSync, EMPTY_TURN_PLACEHOLDER};

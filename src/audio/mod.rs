pub mod capture;
pub mod codec;
pub mod playback;

pub use capture::{AudioFrame, CapturePipeline, MicError, MicSource};
pub use codec::{MediaBlob, CAPTURE_SAMPLE_RATE, PLAYBACK_SAMPLE_RATE};
pub use playback::{
    AudioSink, OutputClock, PlaybackScheduler, PlaybackUnit, SpeakingEvent, SystemClock, TimerSink,
};

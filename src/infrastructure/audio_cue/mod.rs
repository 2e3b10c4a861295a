//! Audio cue adapters

pub mod noop;
pub mod rodio;

pub use noop::NoopAudioCue;
pub use rodio::RodioAudioCue;

//! Infrastructure layer - Adapter implementations
//!
//! Contains concrete implementations of the application ports.

pub mod audio_cue;
pub mod capture;
pub mod config;
pub mod media;
pub mod notification;
pub mod playback;
pub mod transcription;

// Re-export common adapters
pub use audio_cue::{NoopAudioCue, RodioAudioCue};
pub use capture::CpalCaptureDevice;
pub use config::XdgConfigStore;
pub use media::WavProbe;
pub use notification::NotifyRustNotifier;
pub use playback::{RodioPlayer, RodioPlayerFactory};
pub use transcription::HttpTranscriber;

//! Audio cue port interface

use async_trait::async_trait;
use thiserror::Error;

/// Audio cue errors
#[derive(Debug, Clone, Error)]
pub enum AudioCueError {
    #[error("No audio output device available: {0}")]
    DeviceNotAvailable(String),

    #[error("Failed to play cue: {0}")]
    PlaybackFailed(String),
}

/// Cue types for recording feedback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCueType {
    RecordingStart,
    RecordingStop,
}

/// Port for short audio feedback cues
#[async_trait]
pub trait AudioCue: Send + Sync {
    /// Play a cue to completion
    async fn play(&self, cue_type: AudioCueType) -> Result<(), AudioCueError>;
}

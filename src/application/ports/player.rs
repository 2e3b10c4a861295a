//! Note playback port interface

use thiserror::Error;

use crate::domain::notes::PlaybackHandle;

/// Playback errors
#[derive(Debug, Clone, Error)]
pub enum PlaybackError {
    #[error("No audio output device available: {0}")]
    DeviceUnavailable(String),

    #[error("Playback failed: {0}")]
    PlaybackFailed(String),

    #[error("Playback handle has been revoked")]
    HandleRevoked,
}

/// Port for replaying a note through the speakers
pub trait NotePlayer: Send {
    /// Start playing the referenced buffer from the beginning
    fn play(&mut self, handle: &PlaybackHandle) -> Result<(), PlaybackError>;

    /// Pause whatever is playing
    fn pause(&mut self);

    /// Whether something is currently playing
    fn is_playing(&self) -> bool;
}

/// Factory for constructing the player lazily on first use
pub trait PlayerFactory: Send + Sync {
    fn create(&self) -> Result<Box<dyn NotePlayer>, PlaybackError>;
}

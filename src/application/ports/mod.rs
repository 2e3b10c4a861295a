//! Port interfaces (traits) for external systems
//!
//! These traits define the boundaries between the application
//! and infrastructure layers.

pub mod audio_cue;
pub mod capture;
pub mod config;
pub mod media;
pub mod notifier;
pub mod player;
pub mod transcriber;

// Re-export common types
pub use audio_cue::{AudioCue, AudioCueError, AudioCueType};
pub use capture::{CaptureDevice, CaptureError, CaptureSession, CaptureSettings};
pub use config::ConfigStore;
pub use media::{MediaElement, MediaEvent, MediaProbe};
pub use notifier::{NoticeSeverity, NotificationError, Notifier};
pub use player::{NotePlayer, PlaybackError, PlayerFactory};
pub use transcriber::{Transcriber, TranscriptionError};

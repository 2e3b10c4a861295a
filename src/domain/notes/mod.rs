//! Voice note value objects and entities

pub mod clip;
pub mod handle;
pub mod note;

pub use clip::{AudioClip, AudioMimeType, ClipKey};
pub use handle::{ClipReader, PlaybackHandle};
pub use note::{NoteId, VoiceNote};

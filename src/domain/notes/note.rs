//! Voice note entity

use std::fmt;
use std::sync::Arc;

use super::clip::{AudioClip, ClipKey};
use super::handle::PlaybackHandle;

/// Process-unique note identifier. Never reused within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NoteId(u64);

impl NoteId {
    pub(crate) const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "note-{}", self.0)
    }
}

/// A voice note tracked for the life of its buffer.
///
/// Duration starts at zero and accepts exactly one finite positive value;
/// the transcription, once set, is immutable.
#[derive(Debug)]
pub struct VoiceNote {
    id: NoteId,
    clip: AudioClip,
    handle: Arc<PlaybackHandle>,
    duration_secs: f64,
    transcription: Option<String>,
    transcribing: bool,
    probing: bool,
}

impl VoiceNote {
    pub(crate) fn new(id: NoteId, clip: AudioClip) -> Self {
        let handle = Arc::new(PlaybackHandle::for_clip(&clip));
        Self {
            id,
            clip,
            handle,
            duration_secs: 0.0,
            transcription: None,
            transcribing: false,
            probing: false,
        }
    }

    pub fn id(&self) -> NoteId {
        self.id
    }

    pub fn key(&self) -> ClipKey {
        self.clip.key()
    }

    pub fn clip(&self) -> &AudioClip {
        &self.clip
    }

    pub fn handle(&self) -> Arc<PlaybackHandle> {
        Arc::clone(&self.handle)
    }

    pub fn duration_secs(&self) -> f64 {
        self.duration_secs
    }

    /// Render the duration as m:ss (unresolved shows 0:00)
    pub fn format_duration(&self) -> String {
        let total = self.duration_secs.max(0.0).round() as u64;
        format!("{}:{:02}", total / 60, total % 60)
    }

    /// Store a resolved duration.
    ///
    /// Only a finite positive value is accepted, and only once; later
    /// resolutions are ignored. Returns whether the value was stored.
    pub fn resolve_duration(&mut self, secs: f64) -> bool {
        self.probing = false;
        if self.duration_secs > 0.0 || !secs.is_finite() || secs <= 0.0 {
            return false;
        }
        self.duration_secs = secs;
        true
    }

    /// Whether the note still needs duration resolution
    pub fn needs_duration(&self) -> bool {
        self.duration_secs <= 0.0 && !self.probing
    }

    pub(crate) fn begin_probe(&mut self) {
        self.probing = true;
    }

    pub fn transcription(&self) -> Option<&str> {
        self.transcription.as_deref()
    }

    pub fn is_transcribing(&self) -> bool {
        self.transcribing
    }

    /// Mark a transcription call in flight.
    ///
    /// Returns false (no-op) when one is already in flight or the note has
    /// already been transcribed.
    pub fn begin_transcription(&mut self) -> bool {
        if self.transcribing || self.transcription.is_some() {
            return false;
        }
        self.transcribing = true;
        true
    }

    /// Store the transcription text, first write wins.
    pub fn set_transcription(&mut self, text: String) -> bool {
        self.transcribing = false;
        if self.transcription.is_some() {
            return false;
        }
        self.transcription = Some(text);
        true
    }

    /// Clear the in-flight flag after a failed call; the note stays
    /// retryable since no transcription was stored.
    pub fn fail_transcription(&mut self) {
        self.transcribing = false;
    }

    /// Revoke the playback handle when the note leaves the registry.
    pub(crate) fn release(&self) -> bool {
        self.handle.revoke()
    }
}

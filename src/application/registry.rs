//! Voice note registry
//!
//! Derived cache over the caller-owned clip list: one entry per live buffer,
//! in append order. The registry exclusively owns each entry's playback
//! handle and guarantees revocation when the buffer leaves the list.

use crate::domain::notes::{AudioClip, ClipKey, NoteId, VoiceNote};

/// Registry mapping buffer identity to note metadata.
///
/// Owned by the component that created it and injected where needed; never a
/// process-wide singleton, so multiple recorder instances stay isolated.
#[derive(Debug, Default)]
pub struct NoteRegistry {
    notes: Vec<VoiceNote>,
    next_id: u64,
}

impl NoteRegistry {
    pub fn new() -> Self {
        Self {
            notes: Vec::new(),
            next_id: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Notes in append order
    pub fn notes(&self) -> &[VoiceNote] {
        &self.notes
    }

    pub fn contains(&self, key: ClipKey) -> bool {
        self.notes.iter().any(|n| n.key() == key)
    }

    pub fn get(&self, key: ClipKey) -> Option<&VoiceNote> {
        self.notes.iter().find(|n| n.key() == key)
    }

    pub fn get_mut(&mut self, key: ClipKey) -> Option<&mut VoiceNote> {
        self.notes.iter_mut().find(|n| n.key() == key)
    }

    /// Note at a display position (append order)
    pub fn by_index(&self, index: usize) -> Option<&VoiceNote> {
        self.notes.get(index)
    }

    /// Return the note for a buffer, creating it on first sight.
    ///
    /// Idempotent: a buffer seen before keeps its id and handle.
    pub fn get_or_create(&mut self, clip: &AudioClip) -> &VoiceNote {
        let key = clip.key();
        if let Some(pos) = self.notes.iter().position(|n| n.key() == key) {
            return &self.notes[pos];
        }
        let id = NoteId::new(self.next_id);
        self.next_id += 1;
        self.notes.push(VoiceNote::new(id, clip.clone()));
        let pos = self.notes.len() - 1;
        &self.notes[pos]
    }

    /// Resynchronize against the caller-owned list.
    ///
    /// Removals are processed before insertions so a reused buffer identity
    /// can never end up linked to an already-revoked handle. Returns the
    /// keys of entries that still need duration resolution.
    pub fn reconcile(&mut self, current: &[AudioClip]) -> Vec<ClipKey> {
        self.notes.retain(|note| {
            let keep = current.iter().any(|c| c.key() == note.key());
            if !keep {
                note.release();
            }
            keep
        });

        for clip in current {
            self.get_or_create(clip);
        }

        self.notes
            .iter()
            .filter(|n| n.needs_duration())
            .map(|n| n.key())
            .collect()
    }

    /// Revoke every remaining handle and clear the registry.
    pub fn teardown(&mut self) {
        for note in &self.notes {
            note.release();
        }
        self.notes.clear();
    }
}

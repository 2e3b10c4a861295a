//! Transcribe note use case

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Mutex;

use crate::domain::notes::{AudioClip, ClipKey};

use super::ports::{NoticeSeverity, Notifier, Transcriber, TranscriptionError};
use super::registry::NoteRegistry;

/// Callback invoked with the full (clip, transcription) list after a
/// transcription completes.
pub type TranscriptionsCallback =
    Arc<dyn Fn(Vec<(AudioClip, Option<String>)>) + Send + Sync>;

/// Errors from the transcribe use case
#[derive(Debug, Error)]
pub enum TranscribeError {
    #[error("Transcription failed: {0}")]
    Transcription(#[from] TranscriptionError),
}

/// Transcribes one note at a time, first write wins.
///
/// A trigger for a note that is already transcribing or already transcribed
/// is a no-op. One network attempt per trigger: a failure clears the
/// in-flight flag and the user may trigger again manually.
pub struct TranscribeNoteUseCase<T, N>
where
    T: Transcriber,
    N: Notifier,
{
    transcriber: T,
    notifier: N,
    registry: Arc<Mutex<NoteRegistry>>,
    on_transcriptions: Option<TranscriptionsCallback>,
}

impl<T, N> TranscribeNoteUseCase<T, N>
where
    T: Transcriber,
    N: Notifier,
{
    pub fn new(transcriber: T, notifier: N, registry: Arc<Mutex<NoteRegistry>>) -> Self {
        Self {
            transcriber,
            notifier,
            registry,
            on_transcriptions: None,
        }
    }

    /// Register the transcription list callback
    pub fn with_callback(mut self, callback: TranscriptionsCallback) -> Self {
        self.on_transcriptions = Some(callback);
        self
    }

    /// Transcribe the note for a buffer.
    ///
    /// Returns Ok(None) when the trigger was a no-op (unknown or deleted
    /// buffer, transcription in flight, or already transcribed).
    pub async fn execute(&self, key: ClipKey) -> Result<Option<String>, TranscribeError> {
        let clip = {
            let mut registry = self.registry.lock().await;
            let Some(note) = registry.get_mut(key) else {
                return Ok(None);
            };
            if !note.begin_transcription() {
                return Ok(None);
            }
            note.clip().clone()
        };

        match self.transcriber.transcribe(&clip).await {
            Ok(text) => {
                let snapshot = {
                    let mut registry = self.registry.lock().await;
                    // The note may have been deleted while the call was in
                    // flight; a late result must not resurrect it.
                    let Some(note) = registry.get_mut(key) else {
                        return Ok(None);
                    };
                    note.set_transcription(text.clone());
                    registry
                        .notes()
                        .iter()
                        .map(|n| (n.clip().clone(), n.transcription().map(String::from)))
                        .collect::<Vec<_>>()
                };

                let _ = self
                    .notifier
                    .notify("VoxNotes", "Transcription complete", NoticeSeverity::Info)
                    .await;

                if let Some(on_transcriptions) = &self.on_transcriptions {
                    on_transcriptions(snapshot);
                }

                Ok(Some(text))
            }
            Err(e) => {
                {
                    let mut registry = self.registry.lock().await;
                    if let Some(note) = registry.get_mut(key) {
                        note.fail_transcription();
                    }
                }

                let _ = self
                    .notifier
                    .notify(
                        "VoxNotes",
                        &format!("Transcription failed: {}", e),
                        NoticeSeverity::Destructive,
                    )
                    .await;

                Err(e.into())
            }
        }
    }
}

//! Recording use case

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::{mpsc, watch, Mutex};

use crate::domain::notes::AudioClip;
use crate::domain::recording::RecorderSession;

use super::ports::{
    AudioCue, AudioCueType, CaptureDevice, CaptureError, CaptureSession, CaptureSettings,
    NoticeSeverity, Notifier,
};
use super::probe::DurationService;
use super::registry::NoteRegistry;

/// Callback invoked with a fresh copy of the caller-owned note list.
/// The caller's own list is never mutated in place.
pub type NotesCallback = Arc<dyn Fn(Vec<AudioClip>) + Send + Sync>;

/// Errors from the recording use case
#[derive(Debug, Error)]
pub enum RecorderError {
    #[error("Recording failed: {0}")]
    Capture(#[from] CaptureError),

    #[error("Recording produced no audio")]
    EmptyRecording,
}

/// Callbacks for recorder lifecycle updates
#[derive(Default, Clone)]
pub struct RecorderCallbacks {
    /// Called with the updated note list after a successful recording
    pub on_notes: Option<NotesCallback>,
}

struct ActiveCapture {
    session: Box<dyn CaptureSession>,
    chunks: mpsc::UnboundedReceiver<Vec<u8>>,
}

/// Recording controller.
///
/// Owns the start/stop protocol against the capture device. State machine:
/// idle -> recording -> idle; `start` while recording and `stop` while idle
/// are silent no-ops (the UI disables the controls, the controller still
/// guards). A failed finalisation surfaces one destructive notice and
/// creates no note.
pub struct RecorderController<D, N, C>
where
    D: CaptureDevice,
    N: Notifier,
    C: AudioCue,
{
    device: D,
    notifier: N,
    cue: C,
    durations: DurationService,
    registry: Arc<Mutex<NoteRegistry>>,
    session: Arc<Mutex<RecorderSession>>,
    active: Mutex<Option<ActiveCapture>>,
    settings: CaptureSettings,
    grace_delay: Duration,
    callbacks: RecorderCallbacks,
    cues_enabled: bool,
}

impl<D, N, C> RecorderController<D, N, C>
where
    D: CaptureDevice,
    N: Notifier,
    C: AudioCue,
{
    pub fn new(
        device: D,
        notifier: N,
        cue: C,
        durations: DurationService,
        registry: Arc<Mutex<NoteRegistry>>,
        settings: CaptureSettings,
        grace_delay: Duration,
        callbacks: RecorderCallbacks,
    ) -> Self {
        Self {
            device,
            notifier,
            cue,
            durations,
            registry,
            session: Arc::new(Mutex::new(RecorderSession::new())),
            active: Mutex::new(None),
            settings,
            grace_delay,
            callbacks,
            cues_enabled: true,
        }
    }

    /// Disable the start/stop audio cues
    pub fn without_cues(mut self) -> Self {
        self.cues_enabled = false;
        self
    }

    /// Check if currently recording
    pub async fn is_recording(&self) -> bool {
        self.session.lock().await.is_recording()
    }

    /// Latest analysis samples of the live capture, for visualization
    pub async fn analysis(&self) -> Option<watch::Receiver<Vec<f32>>> {
        self.active
            .lock()
            .await
            .as_ref()
            .map(|active| active.session.analysis())
    }

    /// Begin recording.
    ///
    /// Acquires the device with echo cancellation and noise suppression and
    /// periodic chunk delivery, so even the shortest recording produces at
    /// least one chunk. On acquisition failure a destructive notice is
    /// raised and the controller stays idle.
    pub async fn start(&self) -> Result<(), RecorderError> {
        if self.session.lock().await.is_recording() {
            return Ok(());
        }

        let mut capture = match self.device.acquire(self.settings.clone()).await {
            Ok(capture) => capture,
            Err(CaptureError::PermissionDenied) => {
                let _ = self
                    .notifier
                    .notify(
                        "VoxNotes",
                        "Microphone access denied. Check your input device permissions and try again.",
                        NoticeSeverity::Destructive,
                    )
                    .await;
                return Err(RecorderError::Capture(CaptureError::PermissionDenied));
            }
            Err(e) => {
                let _ = self
                    .notifier
                    .notify(
                        "VoxNotes",
                        &format!("Could not start recording: {}", e),
                        NoticeSeverity::Destructive,
                    )
                    .await;
                return Err(RecorderError::Capture(e));
            }
        };

        let chunks = match capture.take_chunks() {
            Some(rx) => rx,
            None => {
                capture.release().await;
                return Err(RecorderError::Capture(CaptureError::StartFailed(
                    "chunk stream unavailable".into(),
                )));
            }
        };

        {
            let mut session = self.session.lock().await;
            if session.start().is_err() {
                // Lost the race against a concurrent start; drop this capture
                capture.release().await;
                return Ok(());
            }
        }

        *self.active.lock().await = Some(ActiveCapture {
            session: capture,
            chunks,
        });

        if self.cues_enabled {
            let _ = self.cue.play(AudioCueType::RecordingStart).await;
        }

        Ok(())
    }

    /// Stop recording and finalize the note.
    ///
    /// Leaves the recording state immediately, then flushes and releases the
    /// device before concatenating the delivered chunks. On success the
    /// caller's list is handed back with the new clip appended and duration
    /// resolution is kicked off; an empty capture raises one destructive
    /// notice and leaves the caller's list untouched.
    pub async fn stop(&self, current: Vec<AudioClip>) -> Result<Option<AudioClip>, RecorderError> {
        {
            let mut session = self.session.lock().await;
            if session.stop().is_err() {
                // Not recording: stopping is a no-op
                return Ok(None);
            }
        }

        let Some(mut active) = self.active.lock().await.take() else {
            return Ok(None);
        };

        // Ask for the final flush before releasing the device; backends
        // without a flush-complete signal get a short grace delay instead,
        // since releasing immediately can drop the last chunk.
        let _ = active.session.flush().await;
        if !active.session.has_flush_signal() {
            tokio::time::sleep(self.grace_delay).await;
        }

        let mime_type = active.session.mime_type();
        active.session.release().await;

        if self.cues_enabled {
            let _ = self.cue.play(AudioCueType::RecordingStop).await;
        }

        let mut buffer = Vec::new();
        while let Some(chunk) = active.chunks.recv().await {
            buffer.extend_from_slice(&chunk);
        }

        if buffer.is_empty() {
            let _ = self
                .notifier
                .notify(
                    "VoxNotes",
                    "Recording failed: no audio was captured.",
                    NoticeSeverity::Destructive,
                )
                .await;
            return Err(RecorderError::EmptyRecording);
        }

        let clip = AudioClip::new(buffer, mime_type);
        let key = {
            let mut registry = self.registry.lock().await;
            registry.get_or_create(&clip).key()
        };

        // The caller owns the note list: hand back a new list with the clip
        // appended rather than mutating anything in place.
        if let Some(on_notes) = &self.callbacks.on_notes {
            let mut next = current;
            next.push(clip.clone());
            on_notes(next);
        }

        self.durations.probe_pending(vec![key]).await;

        Ok(Some(clip))
    }
}

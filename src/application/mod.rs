//! Application layer - Use cases and port interfaces
//!
//! Contains the core business operations and trait definitions
//! for external system interactions.

pub mod note_list;
pub mod ports;
pub mod probe;
pub mod recorder;
pub mod registry;
pub mod transcribe;
pub mod waveform;

// Re-export use cases
pub use note_list::{NoteList, NoteRow};
pub use probe::{resolve_duration, run_probe, DurationService, ProbePhase};
pub use recorder::{NotesCallback, RecorderCallbacks, RecorderController, RecorderError};
pub use registry::NoteRegistry;
pub use transcribe::{TranscribeError, TranscribeNoteUseCase, TranscriptionsCallback};
pub use waveform::{WaveformAnalyzer, BAR_COUNT};

//! VoxNotes - terminal voice notes with AI transcription
//!
//! Records voice notes from the microphone, tracks each note's buffer,
//! playback handle, and duration for exactly as long as it lives, and
//! transcribes individual notes through a remote service.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Core value objects, entities, and errors
//! - **Application**: Use cases and port interfaces (traits)
//! - **Infrastructure**: Adapter implementations (cpal, rodio, HTTP, etc.)
//! - **CLI**: Argument parsing, the interactive studio loop, and presentation

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;

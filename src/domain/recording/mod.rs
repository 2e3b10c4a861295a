//! Recording domain types

pub mod session;

pub use session::{InvalidPhaseTransition, RecorderPhase, RecorderSession};

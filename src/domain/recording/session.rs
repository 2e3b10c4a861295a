//! Recorder session state machine

use std::fmt;
use thiserror::Error;

/// Recorder phases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RecorderPhase {
    #[default]
    Idle,
    Recording,
}

impl RecorderPhase {
    /// Get the string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Recording => "recording",
        }
    }
}

impl fmt::Display for RecorderPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error when an invalid phase transition is attempted
#[derive(Debug, Clone, Error)]
#[error("Invalid phase transition: cannot {action} while {current_phase}")]
pub struct InvalidPhaseTransition {
    pub current_phase: RecorderPhase,
    pub action: String,
}

/// Recorder session entity.
///
/// State machine:
///   IDLE -> RECORDING (start)
///   RECORDING -> IDLE (stop)
///
/// A failed finalisation is an outcome of `stop`, not a phase; the session
/// is always ready to record again afterwards.
#[derive(Debug, Default)]
pub struct RecorderSession {
    phase: RecorderPhase,
}

impl RecorderSession {
    /// Create a new session in the idle phase
    pub fn new() -> Self {
        Self {
            phase: RecorderPhase::Idle,
        }
    }

    /// Get the current phase
    pub fn phase(&self) -> RecorderPhase {
        self.phase
    }

    /// Check if currently idle
    pub fn is_idle(&self) -> bool {
        self.phase == RecorderPhase::Idle
    }

    /// Check if currently recording
    pub fn is_recording(&self) -> bool {
        self.phase == RecorderPhase::Recording
    }

    /// Transition from IDLE to RECORDING
    pub fn start(&mut self) -> Result<(), InvalidPhaseTransition> {
        if self.phase != RecorderPhase::Idle {
            return Err(InvalidPhaseTransition {
                current_phase: self.phase,
                action: "start recording".to_string(),
            });
        }
        self.phase = RecorderPhase::Recording;
        Ok(())
    }

    /// Transition from RECORDING to IDLE
    pub fn stop(&mut self) -> Result<(), InvalidPhaseTransition> {
        if self.phase != RecorderPhase::Recording {
            return Err(InvalidPhaseTransition {
                current_phase: self.phase,
                action: "stop recording".to_string(),
            });
        }
        self.phase = RecorderPhase::Idle;
        Ok(())
    }
}

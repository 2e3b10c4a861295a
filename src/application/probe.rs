//! Asynchronous duration resolution
//!
//! Duration metadata for freshly recorded buffers is not reliably reported
//! by a single decoder event, so resolution is an explicit state machine
//! over probe events with one timer bounding the whole attempt. An
//! unresolved duration is not an error; it renders as 0:00.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;

use super::ports::{MediaElement, MediaEvent, MediaProbe};
use super::registry::NoteRegistry;
use crate::domain::notes::{AudioClip, ClipKey};

/// Phases of one duration probe
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProbePhase {
    AwaitingMetadata,
    Probing,
    Resolved(f64),
    TimedOut,
}

/// Seek target far past the end of any real clip, used to force the decoder
/// to compute the actual length.
const FAR_SEEK_SECS: f64 = 1.0e9;

/// Drive a probe to completion within the time budget.
pub async fn run_probe(element: &mut dyn MediaElement, budget: Duration) -> ProbePhase {
    match tokio::time::timeout(budget, drive(element)).await {
        Ok(phase) => phase,
        Err(_) => ProbePhase::TimedOut,
    }
}

/// Resolve a duration in seconds; anything short of a finite positive
/// resolution yields 0.
pub async fn resolve_duration(element: &mut dyn MediaElement, budget: Duration) -> f64 {
    match run_probe(element, budget).await {
        ProbePhase::Resolved(secs) => secs,
        _ => 0.0,
    }
}

fn usable(duration: Option<f64>) -> Option<f64> {
    duration.filter(|d| d.is_finite() && *d > 0.0)
}

async fn drive(element: &mut dyn MediaElement) -> ProbePhase {
    let mut phase = ProbePhase::AwaitingMetadata;

    while let Some(event) = element.next_event().await {
        let reported = match event {
            MediaEvent::Error => return phase,
            MediaEvent::MetadataLoaded { duration }
            | MediaEvent::DurationChanged { duration }
            | MediaEvent::TimeUpdate { duration } => duration,
        };

        // Any event carrying a usable duration resolves immediately.
        if let Some(secs) = usable(reported) {
            return ProbePhase::Resolved(secs);
        }

        match (phase, event) {
            (ProbePhase::AwaitingMetadata, MediaEvent::MetadataLoaded { .. }) => {
                // Workaround for containers that load metadata without a
                // usable length (typical for freshly recorded buffers):
                // seeking far past the end forces the decoder to compute
                // the real duration, reported on the following time-update.
                element.seek(FAR_SEEK_SECS).await;
                phase = ProbePhase::Probing;
            }
            (ProbePhase::Probing, MediaEvent::TimeUpdate { .. }) => {
                // Duration was checked above and is still unknown; return
                // the position to the start and keep listening.
                element.seek(0.0).await;
            }
            _ => {}
        }
    }

    phase
}

/// Spawns guarded duration probes and reconciles the registry against the
/// caller-owned clip list.
#[derive(Clone)]
pub struct DurationService {
    probe: Arc<dyn MediaProbe>,
    registry: Arc<Mutex<NoteRegistry>>,
    budget: Duration,
}

impl DurationService {
    pub fn new(
        probe: Arc<dyn MediaProbe>,
        registry: Arc<Mutex<NoteRegistry>>,
        budget: Duration,
    ) -> Self {
        Self {
            probe,
            registry,
            budget,
        }
    }

    /// Spawn a probe for each listed entry that still lacks a duration.
    ///
    /// Completions re-check that the buffer is still tracked before writing,
    /// so a probe finishing after deletion cannot resurrect the note.
    pub async fn probe_pending(&self, keys: Vec<ClipKey>) {
        let mut registry = self.registry.lock().await;
        for key in keys {
            let Some(note) = registry.get_mut(key) else {
                continue;
            };
            if !note.needs_duration() {
                continue;
            }
            note.begin_probe();
            let handle = note.handle();

            let probe = Arc::clone(&self.probe);
            let registry = Arc::clone(&self.registry);
            let budget = self.budget;
            tokio::spawn(async move {
                let mut element = probe.open(handle);
                let secs = resolve_duration(element.as_mut(), budget).await;

                let mut registry = registry.lock().await;
                if let Some(note) = registry.get_mut(key) {
                    note.resolve_duration(secs);
                }
            });
        }
    }

    /// Reconcile the registry with the caller-owned list, then probe any
    /// entry still at zero duration.
    pub async fn reconcile(&self, current: &[AudioClip]) {
        let pending = self.registry.lock().await.reconcile(current);
        self.probe_pending(pending).await;
    }
}

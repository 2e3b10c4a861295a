//! Capture device port interfaces

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::{mpsc, watch};

use crate::domain::notes::AudioMimeType;

/// Capture errors
#[derive(Debug, Clone, Error)]
pub enum CaptureError {
    #[error("Microphone access denied")]
    PermissionDenied,

    #[error("Failed to start capture: {0}")]
    StartFailed(String),

    #[error("Capture failed: {0}")]
    CaptureFailed(String),
}

/// Settings for acquiring a capture session
#[derive(Debug, Clone)]
pub struct CaptureSettings {
    pub echo_cancellation: bool,
    pub noise_suppression: bool,
    /// Interval between periodic chunk deliveries
    pub chunk_interval: Duration,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            echo_cancellation: true,
            noise_suppression: true,
            chunk_interval: Duration::from_millis(
                crate::domain::config::DEFAULT_CHUNK_INTERVAL_MS,
            ),
        }
    }
}

/// Port for acquiring a live microphone capture session
#[async_trait]
pub trait CaptureDevice: Send + Sync {
    /// Acquire the device and begin periodic capture.
    ///
    /// # Returns
    /// A live session delivering chunks, or `PermissionDenied` when the
    /// device cannot be acquired.
    async fn acquire(
        &self,
        settings: CaptureSettings,
    ) -> Result<Box<dyn CaptureSession>, CaptureError>;
}

/// One live capture session against an acquired device.
///
/// Chunks arrive on the receiver at the configured interval; concatenating
/// them in delivery order yields the final encoded buffer. The receiver
/// closes once the session is released and the final flush has been
/// delivered.
#[async_trait]
pub trait CaptureSession: Send {
    /// Take the chunk receiver (available exactly once)
    fn take_chunks(&mut self) -> Option<mpsc::UnboundedReceiver<Vec<u8>>>;

    /// Latest raw samples for visualization
    fn analysis(&self) -> watch::Receiver<Vec<f32>>;

    /// Request the final data flush.
    ///
    /// Sessions with a flush signal return once the final chunk has been
    /// handed to the receiver; sessions without one return immediately and
    /// the caller must allow a grace delay before releasing.
    async fn flush(&mut self) -> Result<(), CaptureError>;

    /// Whether `flush` waits for a deterministic flush-complete signal
    fn has_flush_signal(&self) -> bool;

    /// Stop the session and release the device
    async fn release(&mut self);

    /// Container type of the delivered chunks
    fn mime_type(&self) -> AudioMimeType;
}

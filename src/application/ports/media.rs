//! Media probing port interface
//!
//! Duration metadata is not reliably available from a single decoder query
//! across containers, so probing is modelled as an event stream the resolver
//! drives, mirroring how media elements surface metadata incrementally.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::notes::PlaybackHandle;

/// Events emitted while probing a buffer
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MediaEvent {
    /// Container metadata became available; duration may still be unknown
    MetadataLoaded { duration: Option<f64> },
    /// The reported duration changed
    DurationChanged { duration: Option<f64> },
    /// Playback position advanced (emitted after seeks)
    TimeUpdate { duration: Option<f64> },
    /// The buffer cannot be probed
    Error,
}

/// A media element opened over one playback handle
#[async_trait]
pub trait MediaElement: Send {
    /// Next probe event; None once the element has nothing further to report
    async fn next_event(&mut self) -> Option<MediaEvent>;

    /// Seek to a position in seconds
    async fn seek(&mut self, position_secs: f64);
}

/// Port for opening media elements over playback handles
pub trait MediaProbe: Send + Sync {
    fn open(&self, handle: Arc<PlaybackHandle>) -> Box<dyn MediaElement>;
}

//! Transcription port interface

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::notes::AudioClip;

/// Transcription errors
#[derive(Debug, Clone, Error)]
pub enum TranscriptionError {
    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("Rate limit exceeded. Please try again later.")]
    RateLimited,

    #[error("Empty transcription response")]
    EmptyResponse,

    #[error("API request failed: {0}")]
    RequestFailed(String),

    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    #[error("API error: {0}")]
    ApiError(String),
}

/// Port for audio transcription
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe a clip to text.
    ///
    /// One network attempt per call; the adapter handles transport encoding.
    async fn transcribe(&self, clip: &AudioClip) -> Result<String, TranscriptionError>;
}

//! HTTP transcriber adapter
//!
//! Posts base64-encoded audio to the configured transcription endpoint and
//! reads the text back. One attempt per call; retries are the user's choice.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::application::ports::{Transcriber, TranscriptionError};
use crate::domain::notes::AudioClip;

// Request/response types for the transcription API

#[derive(Debug, Serialize)]
struct TranscribeRequest<'a> {
    audio: String,
    mime_type: &'a str,
}

#[derive(Debug, Deserialize)]
struct TranscribeResponse {
    text: Option<String>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

/// Transcriber talking to a remote HTTP service
pub struct HttpTranscriber {
    endpoint: String,
    api_key: String,
    client: reqwest::Client,
}

impl HttpTranscriber {
    /// Create a new transcriber for the given endpoint and API key
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Build the request body
    fn build_request<'a>(&self, clip: &'a AudioClip) -> TranscribeRequest<'a> {
        TranscribeRequest {
            audio: clip.to_base64(),
            mime_type: clip.mime_type().as_str(),
        }
    }
}

#[async_trait]
impl Transcriber for HttpTranscriber {
    async fn transcribe(&self, clip: &AudioClip) -> Result<String, TranscriptionError> {
        let body = self.build_request(clip);

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| TranscriptionError::RequestFailed(e.to_string()))?;

        let status = response.status();

        // Handle HTTP errors
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(TranscriptionError::InvalidApiKey);
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(TranscriptionError::RateLimited);
        }

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(TranscriptionError::ApiError(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        // Parse response
        let response: TranscribeResponse = response
            .json()
            .await
            .map_err(|e| TranscriptionError::ParseError(e.to_string()))?;

        // Check for API error in response body
        if let Some(error) = response.error {
            return Err(TranscriptionError::ApiError(error.message));
        }

        let text = response.text.ok_or(TranscriptionError::EmptyResponse)?;
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(TranscriptionError::EmptyResponse);
        }

        Ok(trimmed.to_string())
    }
}

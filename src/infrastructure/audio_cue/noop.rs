//! No-op audio cue adapter, used when cues are disabled

use async_trait::async_trait;

use crate::application::ports::{AudioCue, AudioCueError, AudioCueType};

/// Audio cue implementation that does nothing
pub struct NoopAudioCue;

impl NoopAudioCue {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NoopAudioCue {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AudioCue for NoopAudioCue {
    async fn play(&self, _cue_type: AudioCueType) -> Result<(), AudioCueError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn play_always_succeeds() {
        let cue = NoopAudioCue::new();
        assert!(cue.play(AudioCueType::RecordingStart).await.is_ok());
        assert!(cue.play(AudioCueType::RecordingStop).await.is_ok());
    }
}

//! Application configuration model

use serde::{Deserialize, Serialize};

/// Default interval between capture chunk deliveries.
/// Frequent enough that even a very short recording yields one chunk.
pub const DEFAULT_CHUNK_INTERVAL_MS: u64 = 250;

/// Default grace delay applied when stopping a capture session that cannot
/// acknowledge its final flush.
pub const DEFAULT_GRACE_DELAY_MS: u64 = 150;

/// Default time budget for resolving a clip's duration.
pub const DEFAULT_PROBE_TIMEOUT_MS: u64 = 2000;

/// Application configuration.
///
/// All fields are optional so that partial configs merge cleanly:
/// defaults < config file < environment < CLI flags.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// API key for the transcription service
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Transcription service endpoint URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// Interval between capture chunk deliveries, in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunk_interval_ms: Option<u64>,

    /// Stop grace delay for capture backends without a flush signal
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grace_delay_ms: Option<u64>,

    /// Duration resolution timeout, in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub probe_timeout_ms: Option<u64>,

    /// Whether to show desktop notifications
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notify: Option<bool>,

    /// Whether to play audio cues on record start/stop
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cues: Option<bool>,
}

impl AppConfig {
    /// An entirely unset config
    pub fn empty() -> Self {
        Self::default()
    }

    /// Built-in defaults for every tunable (credentials stay unset)
    pub fn defaults() -> Self {
        Self {
            api_key: None,
            endpoint: None,
            chunk_interval_ms: Some(DEFAULT_CHUNK_INTERVAL_MS),
            grace_delay_ms: Some(DEFAULT_GRACE_DELAY_MS),
            probe_timeout_ms: Some(DEFAULT_PROBE_TIMEOUT_MS),
            notify: Some(false),
            cues: Some(true),
        }
    }

    /// Merge another config over this one; fields set in `other` win.
    pub fn merge(self, other: AppConfig) -> Self {
        Self {
            api_key: other.api_key.or(self.api_key),
            endpoint: other.endpoint.or(self.endpoint),
            chunk_interval_ms: other.chunk_interval_ms.or(self.chunk_interval_ms),
            grace_delay_ms: other.grace_delay_ms.or(self.grace_delay_ms),
            probe_timeout_ms: other.probe_timeout_ms.or(self.probe_timeout_ms),
            notify: other.notify.or(self.notify),
            cues: other.cues.or(self.cues),
        }
    }

    pub fn chunk_interval_or_default(&self) -> u64 {
        self.chunk_interval_ms.unwrap_or(DEFAULT_CHUNK_INTERVAL_MS)
    }

    pub fn grace_delay_or_default(&self) -> u64 {
        self.grace_delay_ms.unwrap_or(DEFAULT_GRACE_DELAY_MS)
    }

    pub fn probe_timeout_or_default(&self) -> u64 {
        self.probe_timeout_ms.unwrap_or(DEFAULT_PROBE_TIMEOUT_MS)
    }

    pub fn notify_or_default(&self) -> bool {
        self.notify.unwrap_or(false)
    }

    pub fn cues_or_default(&self) -> bool {
        self.cues.unwrap_or(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config = AppConfig::empty();
        assert_eq!(config.chunk_interval_or_default(), 250);
        assert_eq!(config.grace_delay_or_default(), 150);
        assert_eq!(config.probe_timeout_or_default(), 2000);
        assert!(!config.notify_or_default());
        assert!(config.cues_or_default());
    }

    #[test]
    fn merge_prefers_other() {
        let base = AppConfig {
            api_key: Some("base-key".into()),
            chunk_interval_ms: Some(100),
            ..Default::default()
        };
        let over = AppConfig {
            chunk_interval_ms: Some(500),
            notify: Some(true),
            ..Default::default()
        };

        let merged = base.merge(over);
        assert_eq!(merged.api_key.as_deref(), Some("base-key"));
        assert_eq!(merged.chunk_interval_ms, Some(500));
        assert_eq!(merged.notify, Some(true));
    }

    #[test]
    fn merge_chain_matches_precedence() {
        let file = AppConfig {
            endpoint: Some("https://file.example/transcribe".into()),
            notify: Some(true),
            ..Default::default()
        };
        let env = AppConfig {
            api_key: Some("env-key".into()),
            ..Default::default()
        };
        let cli = AppConfig {
            endpoint: Some("https://cli.example/transcribe".into()),
            ..Default::default()
        };

        let merged = AppConfig::defaults().merge(file).merge(env).merge(cli);
        assert_eq!(
            merged.endpoint.as_deref(),
            Some("https://cli.example/transcribe")
        );
        assert_eq!(merged.api_key.as_deref(), Some("env-key"));
        assert_eq!(merged.notify, Some(true));
        assert_eq!(merged.chunk_interval_ms, Some(DEFAULT_CHUNK_INTERVAL_MS));
    }

    #[test]
    fn serializes_without_unset_fields() {
        let config = AppConfig {
            api_key: Some("key".into()),
            ..Default::default()
        };
        let toml = toml::to_string(&config).unwrap();
        assert!(toml.contains("api_key"));
        assert!(!toml.contains("endpoint"));
    }
}

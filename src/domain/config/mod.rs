//! Configuration domain types

pub mod app_config;

pub use app_config::{
    AppConfig, DEFAULT_CHUNK_INTERVAL_MS, DEFAULT_GRACE_DELAY_MS, DEFAULT_PROBE_TIMEOUT_MS,
};

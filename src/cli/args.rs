//! CLI argument parsing

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Terminal voice notes: record, replay, and transcribe
#[derive(Debug, Parser)]
#[command(name = "voxnotes", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Transcription service endpoint URL
    #[arg(long, env = "VOXNOTES_ENDPOINT")]
    pub endpoint: Option<String>,

    /// API key for the transcription service
    #[arg(long, env = "VOXNOTES_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Show desktop notifications
    #[arg(long)]
    pub notify: bool,

    /// Disable the record start/stop audio cues
    #[arg(long)]
    pub no_cues: bool,

    /// Import existing WAV files as notes on startup
    #[arg(long, value_name = "FILE")]
    pub import: Vec<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Create the config file with defaults
    Init,
    /// Print the config file path
    Path,
    /// Show the stored configuration
    List,
    /// Get a config value
    Get { key: String },
    /// Set a config value
    Set { key: String, value: String },
}

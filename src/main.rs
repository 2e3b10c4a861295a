//! VoxNotes CLI entry point

use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;

use voxnotes::cli::{
    app::{load_merged_config, run_studio, StudioOptions, EXIT_ERROR},
    args::{Cli, Commands},
    config_cmd::handle_config_command,
    presenter::Presenter,
};
use voxnotes::domain::config::AppConfig;
use voxnotes::infrastructure::XdgConfigStore;

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let presenter = Presenter::new();

    // Handle subcommands
    if let Some(Commands::Config { action }) = cli.command {
        let store = XdgConfigStore::new();
        if let Err(e) = handle_config_command(action, &store, &presenter).await {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_ERROR);
        }
        return ExitCode::SUCCESS;
    }

    // Build CLI config from args (env-backed flags included)
    let cli_config = AppConfig {
        api_key: cli.api_key.clone(),
        endpoint: cli.endpoint.clone(),
        chunk_interval_ms: None,
        grace_delay_ms: None,
        probe_timeout_ms: None,
        notify: if cli.notify { Some(true) } else { None },
        cues: if cli.no_cues { Some(false) } else { None },
    };

    // Merge config: defaults < file < env/CLI
    let config = load_merged_config(cli_config).await;

    let options = StudioOptions {
        endpoint: config.endpoint.clone(),
        api_key: config.api_key.clone(),
        notify: config.notify_or_default(),
        cues: config.cues_or_default(),
        chunk_interval: Duration::from_millis(config.chunk_interval_or_default()),
        grace_delay: Duration::from_millis(config.grace_delay_or_default()),
        probe_timeout: Duration::from_millis(config.probe_timeout_or_default()),
        imports: cli.import,
    };

    run_studio(options).await
}

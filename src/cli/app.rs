//! Interactive studio app

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::AsyncBufReadExt;
use tokio::sync::Mutex;

use crate::application::ports::{
    CaptureSettings, ConfigStore, NoticeSeverity, NotificationError, Notifier,
};
use crate::application::{
    DurationService, NoteList, NoteRegistry, NotesCallback, RecorderCallbacks,
    RecorderController, TranscribeNoteUseCase, WaveformAnalyzer,
};
use crate::domain::config::AppConfig;
use crate::domain::notes::{AudioClip, AudioMimeType};
use crate::infrastructure::{
    CpalCaptureDevice, HttpTranscriber, NotifyRustNotifier, RodioAudioCue, RodioPlayerFactory,
    WavProbe, XdgConfigStore,
};

use super::presenter::{Presenter, TerminalNotifier};

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;

/// Options for the interactive studio
#[derive(Debug, Clone)]
pub struct StudioOptions {
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    pub notify: bool,
    pub cues: bool,
    pub chunk_interval: Duration,
    pub grace_delay: Duration,
    pub probe_timeout: Duration,
    pub imports: Vec<PathBuf>,
}

/// Notifier fanning out to the terminal and, when enabled, the desktop
struct StudioNotifier {
    terminal: TerminalNotifier,
    desktop: Option<NotifyRustNotifier>,
}

impl StudioNotifier {
    fn new(desktop_enabled: bool) -> Self {
        Self {
            terminal: TerminalNotifier::new(),
            desktop: desktop_enabled.then(NotifyRustNotifier::new),
        }
    }
}

#[async_trait]
impl Notifier for StudioNotifier {
    async fn notify(
        &self,
        title: &str,
        message: &str,
        severity: NoticeSeverity,
    ) -> Result<(), NotificationError> {
        self.terminal.notify(title, message, severity).await?;
        if let Some(desktop) = &self.desktop {
            // Desktop delivery is best-effort; the terminal already showed it
            let _ = desktop.notify(title, message, severity).await;
        }
        Ok(())
    }
}

/// One parsed studio command
#[derive(Debug, PartialEq)]
enum Command {
    Record,
    Stop,
    List,
    Play(usize),
    Transcribe(usize),
    Delete(usize),
    Help,
    Quit,
    Unknown(String),
}

fn parse_command(line: &str) -> Command {
    let mut parts = line.split_whitespace();
    let verb = parts.next().unwrap_or("");
    let index = parts.next().and_then(|raw| raw.parse::<usize>().ok());

    match (verb, index) {
        ("record" | "r", _) => Command::Record,
        ("stop" | "s", _) => Command::Stop,
        ("list" | "l", _) => Command::List,
        ("play" | "p", Some(n)) if n >= 1 => Command::Play(n - 1),
        ("transcribe" | "t", Some(n)) if n >= 1 => Command::Transcribe(n - 1),
        ("delete" | "d", Some(n)) if n >= 1 => Command::Delete(n - 1),
        ("help" | "h" | "?", _) => Command::Help,
        ("quit" | "q" | "exit", _) => Command::Quit,
        _ => Command::Unknown(line.to_string()),
    }
}

const HELP_TEXT: &str = "\
Commands:
  record (r)         start recording a voice note
  stop (s)           stop recording and keep the note
  list (l)           list notes
  play <n> (p)       toggle playback of note n
  transcribe <n> (t) transcribe note n
  delete <n> (d)     delete note n
  help (h)           show this help
  quit (q)           exit";

fn current_notes(notes: &Arc<StdMutex<Vec<AudioClip>>>) -> Vec<AudioClip> {
    notes
        .lock()
        .map(|list| list.clone())
        .unwrap_or_default()
}

/// Run the interactive studio loop
pub async fn run_studio(options: StudioOptions) -> ExitCode {
    let mut presenter = Presenter::new();

    let registry = Arc::new(Mutex::new(NoteRegistry::new()));
    let durations = DurationService::new(
        Arc::new(WavProbe::new()),
        Arc::clone(&registry),
        options.probe_timeout,
    );

    // The studio owns the source-of-truth note list; every component hands
    // back a fresh list through this callback instead of mutating it.
    let notes: Arc<StdMutex<Vec<AudioClip>>> = Arc::new(StdMutex::new(Vec::new()));
    let on_notes: NotesCallback = {
        let notes = Arc::clone(&notes);
        Arc::new(move |list| {
            if let Ok(mut current) = notes.lock() {
                *current = list;
            }
        })
    };

    let mut controller = RecorderController::new(
        CpalCaptureDevice::new(),
        StudioNotifier::new(options.notify),
        RodioAudioCue::new(),
        durations.clone(),
        Arc::clone(&registry),
        CaptureSettings {
            echo_cancellation: true,
            noise_suppression: true,
            chunk_interval: options.chunk_interval,
        },
        options.grace_delay,
        RecorderCallbacks {
            on_notes: Some(Arc::clone(&on_notes)),
        },
    );
    if !options.cues {
        controller = controller.without_cues();
    }

    let mut note_list = NoteList::new(
        Arc::clone(&registry),
        durations.clone(),
        Arc::new(RodioPlayerFactory::new()),
    )
    .with_callback(Arc::clone(&on_notes));

    let transcribe = match (&options.endpoint, &options.api_key) {
        (Some(endpoint), Some(api_key)) => Some(TranscribeNoteUseCase::new(
            HttpTranscriber::new(endpoint, api_key),
            StudioNotifier::new(options.notify),
            Arc::clone(&registry),
        )),
        _ => None,
    };

    // Import existing recordings as notes
    for path in &options.imports {
        match tokio::fs::read(path).await {
            Ok(bytes) => {
                let clip = AudioClip::new(bytes, AudioMimeType::Wav);
                if let Ok(mut list) = notes.lock() {
                    list.push(clip);
                }
                presenter.info(&format!("Imported {}", path.display()));
            }
            Err(e) => presenter.warn(&format!("Cannot import {}: {}", path.display(), e)),
        }
    }
    let snapshot = current_notes(&notes);
    note_list.sync(&snapshot).await;

    presenter.output("VoxNotes ready. Type 'help' for commands.");

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();
    let mut waveform_task: Option<tokio::task::JoinHandle<()>> = None;

    loop {
        presenter.output_inline("> ");
        let line = tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            line = lines.next_line() => match line {
                Ok(Some(line)) => line,
                _ => break,
            },
        };
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        match parse_command(trimmed) {
            Command::Record => {
                if controller.is_recording().await {
                    presenter.info("Already recording.");
                    continue;
                }
                if controller.start().await.is_err() {
                    // The notice already reached the user
                    continue;
                }
                let bar = presenter.start_spinner("Recording…");
                if let Some(mut analysis) = controller.analysis().await {
                    let bar = bar.clone();
                    waveform_task = Some(tokio::spawn(async move {
                        let mut analyzer = WaveformAnalyzer::new();
                        while analysis.changed().await.is_ok() {
                            if bar.is_finished() {
                                break;
                            }
                            let samples = analysis.borrow_and_update().clone();
                            let frame = Presenter::waveform_frame(analyzer.update(&samples));
                            bar.set_message(format!("Recording {}", frame));
                        }
                    }));
                }
            }
            Command::Stop => {
                presenter.stop_spinner();
                if let Some(task) = waveform_task.take() {
                    task.abort();
                }
                match controller.stop(current_notes(&notes)).await {
                    Ok(Some(clip)) => {
                        presenter.success(&format!(
                            "Saved note ({})",
                            clip.human_readable_size()
                        ));
                        presenter.render_notes(&note_list.rows().await);
                    }
                    Ok(None) => presenter.info("Not recording."),
                    Err(_) => {}
                }
            }
            Command::List => {
                note_list.sync(&current_notes(&notes)).await;
                presenter.render_notes(&note_list.rows().await);
            }
            Command::Play(index) => match note_list.key_at(index).await {
                Some(key) => match note_list.toggle_playback(key).await {
                    Ok(true) => presenter.info("Playing…"),
                    Ok(false) => presenter.info("Paused."),
                    Err(e) => presenter.error(&e.to_string()),
                },
                None => presenter.error("No such note."),
            },
            Command::Transcribe(index) => {
                let Some(transcribe) = &transcribe else {
                    presenter.error(
                        "Transcription is not configured. Set 'endpoint' and 'api_key' \
                         via 'voxnotes config set' or the matching flags.",
                    );
                    continue;
                };
                match note_list.key_at(index).await {
                    Some(key) => {
                        let bar = presenter.start_spinner("Transcribing…");
                        let result = transcribe.execute(key).await;
                        bar.finish_and_clear();
                        presenter.stop_spinner();
                        match result {
                            Ok(Some(text)) => presenter.output(&text),
                            Ok(None) => {
                                presenter.info("Already transcribed or in progress.")
                            }
                            Err(_) => {}
                        }
                    }
                    None => presenter.error("No such note."),
                }
            }
            Command::Delete(index) => match note_list.key_at(index).await {
                Some(key) => {
                    note_list.delete(key, current_notes(&notes)).await;
                    presenter.success("Deleted.");
                    presenter.render_notes(&note_list.rows().await);
                }
                None => presenter.error("No such note."),
            },
            Command::Help => presenter.output(HELP_TEXT),
            Command::Quit => break,
            Command::Unknown(input) => {
                presenter.error(&format!("Unknown command: {}", input));
                presenter.output(HELP_TEXT);
            }
        }
    }

    // Teardown: finish any live capture, dispose the player, revoke handles
    presenter.stop_spinner();
    if let Some(task) = waveform_task.take() {
        task.abort();
    }
    if controller.is_recording().await {
        let _ = controller.stop(current_notes(&notes)).await;
    }
    note_list.teardown().await;

    ExitCode::from(EXIT_SUCCESS)
}

/// Load and merge configuration: defaults < file < env/CLI
pub async fn load_merged_config(cli_config: AppConfig) -> AppConfig {
    let store = XdgConfigStore::new();
    let file_config = store.load().await.unwrap_or_else(|_| AppConfig::empty());

    AppConfig::defaults().merge(file_config).merge(cli_config)
}

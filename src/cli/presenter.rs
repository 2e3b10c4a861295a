//! CLI presenter for output formatting

use std::io::{self, Write};

use async_trait::async_trait;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

use crate::application::ports::{NoticeSeverity, NotificationError, Notifier};
use crate::application::NoteRow;

/// Glyphs for waveform levels, quiet to loud
const WAVE_GLYPHS: [char; 8] = [' ', '\u{2581}', '\u{2582}', '\u{2583}', '\u{2584}', '\u{2585}', '\u{2586}', '\u{2587}'];

/// Presenter for CLI output formatting
pub struct Presenter {
    spinner: Option<ProgressBar>,
}

impl Presenter {
    /// Create a new presenter
    pub fn new() -> Self {
        Self { spinner: None }
    }

    /// Start a spinner with message; the handle can be updated from tasks
    pub fn start_spinner(&mut self, message: &str) -> ProgressBar {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
                .template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        self.spinner = Some(spinner.clone());
        spinner
    }

    /// Stop the spinner without status
    pub fn stop_spinner(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }

    /// Mark the spinner as failed and finish
    pub fn spinner_fail(&mut self, message: &str) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_with_message(format!("{} {}", "✗".red(), message));
        }
    }

    /// Print info message to stderr
    pub fn info(&self, message: &str) {
        eprintln!("{} {}", "ℹ".cyan(), message);
    }

    /// Print success message to stderr
    pub fn success(&self, message: &str) {
        eprintln!("{} {}", "✓".green(), message);
    }

    /// Print warning message to stderr
    pub fn warn(&self, message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Print error message to stderr
    pub fn error(&self, message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Output text to stdout
    pub fn output(&self, text: &str) {
        println!("{}", text);
    }

    /// Output text to stdout without newline
    pub fn output_inline(&self, text: &str) {
        print!("{}", text);
        let _ = io::stdout().flush();
    }

    /// Print a key-value pair (for config list)
    pub fn key_value(&self, key: &str, value: &str) {
        println!("{}: {}", key.cyan(), value);
    }

    /// Render the note table
    pub fn render_notes(&self, rows: &[NoteRow]) {
        if rows.is_empty() {
            self.info("No notes yet. Type 'record' to capture one.");
            return;
        }

        for row in rows {
            let marker = if row.playing { "▶".green().to_string() } else { " ".to_string() };
            let status = if row.transcribing {
                "transcribing…".yellow().to_string()
            } else {
                match &row.transcription {
                    Some(text) => preview(text, 48).normal().to_string(),
                    None => "—".dimmed().to_string(),
                }
            };
            println!(
                "{} {:>3}. [{}] {:>6}  {}",
                marker,
                row.index + 1,
                row.duration,
                row.size,
                status
            );
        }
    }

    /// Format one waveform frame from bar magnitudes
    pub fn waveform_frame(bars: &[f32]) -> String {
        bars.iter()
            .map(|&level| {
                let step = (level.clamp(0.0, 1.0) * (WAVE_GLYPHS.len() - 1) as f32).round();
                WAVE_GLYPHS[step as usize]
            })
            .collect()
    }
}

impl Default for Presenter {
    fn default() -> Self {
        Self::new()
    }
}

/// First line of a transcription, shortened for the table
fn preview(text: &str, max_chars: usize) -> String {
    let line = text.lines().next().unwrap_or("");
    if line.chars().count() <= max_chars {
        return line.to_string();
    }
    let cut: String = line.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{}…", cut)
}

/// Terminal notification channel backed by stderr
pub struct TerminalNotifier;

impl TerminalNotifier {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TerminalNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Notifier for TerminalNotifier {
    async fn notify(
        &self,
        _title: &str,
        message: &str,
        severity: NoticeSeverity,
    ) -> Result<(), NotificationError> {
        match severity {
            NoticeSeverity::Info => eprintln!("{} {}", "ℹ".cyan(), message),
            NoticeSeverity::Destructive => eprintln!("{} {}", "✗".red(), message),
        }
        Ok(())
    }
}

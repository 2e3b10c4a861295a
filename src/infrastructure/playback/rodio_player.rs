//! Rodio note player adapter
//!
//! rodio's output stream is not Send, so playback lives on a dedicated
//! thread the adapter talks to over a command channel. The thread holds the
//! stream for the player's whole lifetime and exits when the adapter is
//! dropped, which is how the note list disposes it at teardown.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc as std_mpsc;
use std::sync::Arc;

use rodio::{Decoder, OutputStream, Sink};

use crate::application::ports::{NotePlayer, PlaybackError, PlayerFactory};
use crate::domain::notes::{ClipReader, PlaybackHandle};

enum PlayerCommand {
    Play(ClipReader),
    Pause,
}

/// Note player backed by a dedicated rodio thread
pub struct RodioPlayer {
    commands: std_mpsc::Sender<PlayerCommand>,
    playing: Arc<AtomicBool>,
}

impl RodioPlayer {
    /// Open the output device and start the playback thread.
    pub fn spawn() -> Result<Self, PlaybackError> {
        let (command_tx, command_rx) = std_mpsc::channel::<PlayerCommand>();
        let (ready_tx, ready_rx) = std_mpsc::channel::<Result<(), PlaybackError>>();
        let playing = Arc::new(AtomicBool::new(false));

        let playing_thread = Arc::clone(&playing);
        std::thread::spawn(move || {
            let (_stream, stream_handle) = match OutputStream::try_default() {
                Ok(pair) => pair,
                Err(e) => {
                    let _ = ready_tx.send(Err(PlaybackError::DeviceUnavailable(e.to_string())));
                    return;
                }
            };
            let _ = ready_tx.send(Ok(()));

            let mut sink: Option<Sink> = None;
            while let Ok(command) = command_rx.recv() {
                match command {
                    PlayerCommand::Play(reader) => {
                        if let Some(old) = sink.take() {
                            old.stop();
                        }
                        let source = match Decoder::new(reader) {
                            Ok(source) => source,
                            Err(e) => {
                                eprintln!("Cannot decode note: {}", e);
                                playing_thread.store(false, Ordering::SeqCst);
                                continue;
                            }
                        };
                        match Sink::try_new(&stream_handle) {
                            Ok(new_sink) => {
                                new_sink.append(source);
                                sink = Some(new_sink);
                            }
                            Err(e) => {
                                eprintln!("Cannot open playback sink: {}", e);
                                playing_thread.store(false, Ordering::SeqCst);
                            }
                        }
                    }
                    PlayerCommand::Pause => {
                        if let Some(sink) = &sink {
                            sink.pause();
                        }
                    }
                }
            }
            // Channel closed: the player was disposed
            if let Some(sink) = sink.take() {
                sink.stop();
            }
        });

        match ready_rx.recv() {
            Ok(Ok(())) => Ok(Self {
                commands: command_tx,
                playing,
            }),
            Ok(Err(e)) => Err(e),
            Err(_) => Err(PlaybackError::PlaybackFailed("player thread exited".into())),
        }
    }
}

impl NotePlayer for RodioPlayer {
    fn play(&mut self, handle: &PlaybackHandle) -> Result<(), PlaybackError> {
        let reader = handle.reader().ok_or(PlaybackError::HandleRevoked)?;
        self.commands
            .send(PlayerCommand::Play(reader))
            .map_err(|_| PlaybackError::PlaybackFailed("player thread gone".into()))?;
        self.playing.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn pause(&mut self) {
        let _ = self.commands.send(PlayerCommand::Pause);
        self.playing.store(false, Ordering::SeqCst);
    }

    fn is_playing(&self) -> bool {
        self.playing.load(Ordering::SeqCst)
    }
}

/// Factory handed to the note list so the player thread only exists once
/// something has actually been played.
pub struct RodioPlayerFactory;

impl RodioPlayerFactory {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RodioPlayerFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl PlayerFactory for RodioPlayerFactory {
    fn create(&self) -> Result<Box<dyn NotePlayer>, PlaybackError> {
        Ok(Box::new(RodioPlayer::spawn()?))
    }
}

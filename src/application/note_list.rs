//! Note list use case
//!
//! Presenter-facing view over the registry: ordered rows, playback toggling,
//! deletion, and reconciliation against the caller-owned list. The playback
//! handle is borrowed from the registry only for the duration of each
//! operation; the player itself is constructed lazily on first play and
//! disposed at teardown.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::domain::notes::{AudioClip, ClipKey, NoteId};

use super::ports::{NotePlayer, PlaybackError, PlayerFactory};
use super::probe::DurationService;
use super::recorder::NotesCallback;
use super::registry::NoteRegistry;

/// Render model for one note row
#[derive(Debug, Clone)]
pub struct NoteRow {
    pub id: NoteId,
    pub index: usize,
    pub key: ClipKey,
    pub duration: String,
    pub size: String,
    pub transcription: Option<String>,
    pub transcribing: bool,
    pub playing: bool,
}

/// Ordered note list with playback and deletion
pub struct NoteList {
    registry: Arc<Mutex<NoteRegistry>>,
    durations: DurationService,
    player_factory: Arc<dyn PlayerFactory>,
    player: Option<Box<dyn NotePlayer>>,
    now_playing: Option<ClipKey>,
    on_notes: Option<NotesCallback>,
}

impl NoteList {
    pub fn new(
        registry: Arc<Mutex<NoteRegistry>>,
        durations: DurationService,
        player_factory: Arc<dyn PlayerFactory>,
    ) -> Self {
        Self {
            registry,
            durations,
            player_factory,
            player: None,
            now_playing: None,
            on_notes: None,
        }
    }

    /// Register the note list callback
    pub fn with_callback(mut self, callback: NotesCallback) -> Self {
        self.on_notes = Some(callback);
        self
    }

    /// Reconcile against the caller-owned list and kick off duration
    /// resolution for unresolved entries.
    pub async fn sync(&self, current: &[AudioClip]) {
        self.durations.reconcile(current).await;
    }

    /// Rows in append order
    pub async fn rows(&self) -> Vec<NoteRow> {
        let registry = self.registry.lock().await;
        registry
            .notes()
            .iter()
            .enumerate()
            .map(|(index, note)| NoteRow {
                id: note.id(),
                index,
                key: note.key(),
                duration: note.format_duration(),
                size: note.clip().human_readable_size(),
                transcription: note.transcription().map(String::from),
                transcribing: note.is_transcribing(),
                playing: self.now_playing == Some(note.key()),
            })
            .collect()
    }

    /// Key of the note at a display position
    pub async fn key_at(&self, index: usize) -> Option<ClipKey> {
        self.registry.lock().await.by_index(index).map(|n| n.key())
    }

    /// Toggle playback for a note.
    ///
    /// Returns whether the note is playing after the call. The player is
    /// created on the first play.
    pub async fn toggle_playback(&mut self, key: ClipKey) -> Result<bool, PlaybackError> {
        if self.now_playing == Some(key) {
            if let Some(player) = &mut self.player {
                player.pause();
            }
            self.now_playing = None;
            return Ok(false);
        }

        let handle = {
            let registry = self.registry.lock().await;
            match registry.get(key) {
                Some(note) => note.handle(),
                None => return Err(PlaybackError::HandleRevoked),
            }
        };

        if self.player.is_none() {
            self.player = Some(self.player_factory.create()?);
        }
        let Some(player) = self.player.as_mut() else {
            return Err(PlaybackError::PlaybackFailed("player unavailable".into()));
        };

        player.play(&handle)?;
        self.now_playing = Some(key);
        Ok(true)
    }

    /// Delete a note.
    ///
    /// The caller's list is filtered by buffer identity (never by index,
    /// since positions shift) and handed back through the callback; the
    /// registry entry is removed and its handle revoked by reconciliation.
    pub async fn delete(&mut self, key: ClipKey, current: Vec<AudioClip>) -> Vec<AudioClip> {
        if self.now_playing == Some(key) {
            if let Some(player) = &mut self.player {
                player.pause();
            }
            self.now_playing = None;
        }

        let next: Vec<AudioClip> = current.into_iter().filter(|c| c.key() != key).collect();

        if let Some(on_notes) = &self.on_notes {
            on_notes(next.clone());
        }
        self.durations.reconcile(&next).await;

        next
    }

    /// Stop playback, dispose the player, and release every handle.
    pub async fn teardown(&mut self) {
        if let Some(player) = &mut self.player {
            player.pause();
        }
        self.player = None;
        self.now_playing = None;
        self.registry.lock().await.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{MediaElement, MediaEvent, MediaProbe};
    use crate::domain::notes::{AudioMimeType, PlaybackHandle};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex as StdMutex;
    use std::time::Duration;

    /// Probe whose elements never report anything; durations stay at 0:00.
    struct SilentProbe;

    struct SilentElement;

    #[async_trait]
    impl MediaElement for SilentElement {
        async fn next_event(&mut self) -> Option<MediaEvent> {
            None
        }
        async fn seek(&mut self, _position_secs: f64) {}
    }

    impl MediaProbe for SilentProbe {
        fn open(&self, _handle: Arc<PlaybackHandle>) -> Box<dyn MediaElement> {
            Box::new(SilentElement)
        }
    }

    /// Player recording play/pause counts
    #[derive(Default)]
    struct MockPlayer {
        plays: Arc<AtomicUsize>,
        pauses: Arc<AtomicUsize>,
    }

    impl NotePlayer for MockPlayer {
        fn play(&mut self, handle: &PlaybackHandle) -> Result<(), PlaybackError> {
            if handle.reader().is_none() {
                return Err(PlaybackError::HandleRevoked);
            }
            self.plays.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn pause(&mut self) {
            self.pauses.fetch_add(1, Ordering::SeqCst);
        }

        fn is_playing(&self) -> bool {
            false
        }
    }

    struct MockFactory {
        created: Arc<AtomicUsize>,
        plays: Arc<AtomicUsize>,
        pauses: Arc<AtomicUsize>,
    }

    impl PlayerFactory for MockFactory {
        fn create(&self) -> Result<Box<dyn NotePlayer>, PlaybackError> {
            self.created.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(MockPlayer {
                plays: Arc::clone(&self.plays),
                pauses: Arc::clone(&self.pauses),
            }))
        }
    }

    struct Fixture {
        list: NoteList,
        registry: Arc<Mutex<NoteRegistry>>,
        created: Arc<AtomicUsize>,
        plays: Arc<AtomicUsize>,
        pauses: Arc<AtomicUsize>,
        lists: Arc<StdMutex<Vec<Vec<AudioClip>>>>,
    }

    fn fixture() -> Fixture {
        let registry = Arc::new(Mutex::new(NoteRegistry::new()));
        let durations = DurationService::new(
            Arc::new(SilentProbe),
            Arc::clone(&registry),
            Duration::from_millis(2000),
        );
        let created = Arc::new(AtomicUsize::new(0));
        let plays = Arc::new(AtomicUsize::new(0));
        let pauses = Arc::new(AtomicUsize::new(0));
        let factory = Arc::new(MockFactory {
            created: Arc::clone(&created),
            plays: Arc::clone(&plays),
            pauses: Arc::clone(&pauses),
        });
        let lists: Arc<StdMutex<Vec<Vec<AudioClip>>>> = Arc::new(StdMutex::new(Vec::new()));
        let lists_cb = Arc::clone(&lists);
        let list = NoteList::new(Arc::clone(&registry), durations, factory).with_callback(
            Arc::new(move |notes| {
                lists_cb.lock().unwrap().push(notes);
            }),
        );
        Fixture {
            list,
            registry,
            created,
            plays,
            pauses,
            lists,
        }
    }

    fn clip(len: usize) -> AudioClip {
        AudioClip::new(vec![0u8; len], AudioMimeType::Wav)
    }

    #[tokio::test]
    async fn rows_follow_append_order() {
        let f = fixture();
        let b1 = clip(100);
        let b2 = clip(200);
        f.list.sync(&[b1.clone(), b2.clone()]).await;

        let rows = f.list.rows().await;
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].key, b1.key());
        assert_eq!(rows[1].key, b2.key());
        assert_eq!(rows[0].index, 0);
        assert_eq!(rows[1].index, 1);
        assert_eq!(rows[0].duration, "0:00");
    }

    #[tokio::test]
    async fn player_is_created_lazily_and_only_once() {
        let mut f = fixture();
        let b1 = clip(100);
        let b2 = clip(200);
        f.list.sync(&[b1.clone(), b2.clone()]).await;

        assert_eq!(f.created.load(Ordering::SeqCst), 0);

        assert!(f.list.toggle_playback(b1.key()).await.unwrap());
        assert_eq!(f.created.load(Ordering::SeqCst), 1);

        // Toggling off pauses, toggling another note reuses the player
        assert!(!f.list.toggle_playback(b1.key()).await.unwrap());
        assert!(f.list.toggle_playback(b2.key()).await.unwrap());
        assert_eq!(f.created.load(Ordering::SeqCst), 1);
        assert_eq!(f.plays.load(Ordering::SeqCst), 2);
        assert_eq!(f.pauses.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn delete_filters_by_identity_and_revokes() {
        let mut f = fixture();
        let b1 = clip(100);
        let b2 = clip(200);
        f.list.sync(&[b1.clone(), b2.clone()]).await;

        let handle = f.registry.lock().await.get(b1.key()).unwrap().handle();

        let next = f.list.delete(b1.key(), vec![b1.clone(), b2.clone()]).await;

        assert_eq!(next.len(), 1);
        assert!(next[0].same_buffer(&b2));
        assert!(handle.is_revoked());
        assert!(!f.registry.lock().await.contains(b1.key()));

        // The callback received the filtered list
        let lists = f.lists.lock().unwrap();
        assert_eq!(lists.len(), 1);
        assert_eq!(lists[0].len(), 1);
        assert!(lists[0][0].same_buffer(&b2));
    }

    #[tokio::test]
    async fn deleting_the_playing_note_pauses_it() {
        let mut f = fixture();
        let b = clip(100);
        f.list.sync(&[b.clone()]).await;

        f.list.toggle_playback(b.key()).await.unwrap();
        f.list.delete(b.key(), vec![b.clone()]).await;

        assert_eq!(f.pauses.load(Ordering::SeqCst), 1);
        assert!(f.list.rows().await.is_empty());
    }

    #[tokio::test]
    async fn playback_of_unknown_note_fails() {
        let mut f = fixture();
        let b = clip(100);
        // Never synced: the registry does not know the buffer
        let result = f.list.toggle_playback(b.key()).await;
        assert!(matches!(result, Err(PlaybackError::HandleRevoked)));
    }

    #[tokio::test]
    async fn teardown_disposes_player_and_revokes_handles() {
        let mut f = fixture();
        let b = clip(100);
        f.list.sync(&[b.clone()]).await;
        f.list.toggle_playback(b.key()).await.unwrap();

        let handle = {
            let registry = f.registry.lock().await;
            registry.get(b.key()).unwrap().handle()
        };

        f.list.teardown().await;

        assert_eq!(f.pauses.load(Ordering::SeqCst), 1);
        assert!(handle.is_revoked());
        assert!(f.registry.lock().await.is_empty());
    }
}

//! Revocable playback handle

use std::io::{self, Read, Seek, SeekFrom};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::clip::{AudioClip, AudioMimeType};

/// Revocable reference to a clip's bytes.
///
/// Lets a media player read the buffer without copying it. Once revoked, no
/// new reader can be opened; readers already open keep their shared bytes
/// alive but belong to operations that were in flight at revocation time.
#[derive(Debug)]
pub struct PlaybackHandle {
    bytes: Arc<Vec<u8>>,
    mime_type: AudioMimeType,
    revoked: AtomicBool,
}

impl PlaybackHandle {
    /// Create a handle over a clip's buffer (no byte copy)
    pub fn for_clip(clip: &AudioClip) -> Self {
        Self {
            bytes: clip.share_bytes(),
            mime_type: clip.mime_type(),
            revoked: AtomicBool::new(false),
        }
    }

    /// Revoke the handle.
    ///
    /// Returns true only for the call that performed the revocation.
    pub fn revoke(&self) -> bool {
        !self.revoked.swap(true, Ordering::SeqCst)
    }

    /// Whether the handle has been revoked
    pub fn is_revoked(&self) -> bool {
        self.revoked.load(Ordering::SeqCst)
    }

    /// MIME type of the referenced buffer
    pub fn mime_type(&self) -> AudioMimeType {
        self.mime_type
    }

    /// Size of the referenced buffer in bytes
    pub fn size_bytes(&self) -> usize {
        self.bytes.len()
    }

    /// Open a reader over the bytes. Returns None once revoked.
    pub fn reader(&self) -> Option<ClipReader> {
        if self.is_revoked() {
            return None;
        }
        Some(ClipReader {
            bytes: Arc::clone(&self.bytes),
            pos: 0,
        })
    }
}

/// Seekable reader over a handle's shared bytes
#[derive(Debug)]
pub struct ClipReader {
    bytes: Arc<Vec<u8>>,
    pos: u64,
}

impl Read for ClipReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let data = self.bytes.as_slice();
        let start = (self.pos as usize).min(data.len());
        let n = (data.len() - start).min(buf.len());
        buf[..n].copy_from_slice(&data[start..start + n]);
        self.pos += n as u64;
        Ok(n)
    }
}

impl Seek for ClipReader {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let len = self.bytes.len() as i64;
        let target = match pos {
            SeekFrom::Start(offset) => offset as i64,
            SeekFrom::End(offset) => len + offset,
            SeekFrom::Current(offset) => self.pos as i64 + offset,
        };
        if target < 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "seek before start of clip",
            ));
        }
        self.pos = target as u64;
        Ok(self.pos)
    }
}

//! Audio clip value object

use std::fmt;
use std::sync::Arc;

/// Supported audio MIME types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioMimeType {
    Wav,
    Ogg,
    Mp3,
    Webm,
}

impl AudioMimeType {
    /// Get the MIME type string
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Wav => "audio/wav",
            Self::Ogg => "audio/ogg",
            Self::Mp3 => "audio/mp3",
            Self::Webm => "audio/webm",
        }
    }

    /// Get the file extension
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Wav => "wav",
            Self::Ogg => "ogg",
            Self::Mp3 => "mp3",
            Self::Webm => "webm",
        }
    }
}

impl fmt::Display for AudioMimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Default for AudioMimeType {
    fn default() -> Self {
        Self::Wav
    }
}

/// Identity of a clip's underlying buffer.
///
/// Derived from the allocation, not the contents: two clips with equal bytes
/// are still distinct buffers, while clones of one clip share the key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClipKey(usize);

impl fmt::Display for ClipKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// Value object representing one recorded voice-note buffer.
/// The bytes are immutable once created and shared across clones.
#[derive(Debug, Clone)]
pub struct AudioClip {
    bytes: Arc<Vec<u8>>,
    mime_type: AudioMimeType,
}

impl AudioClip {
    /// Create a clip from raw bytes
    pub fn new(bytes: Vec<u8>, mime_type: AudioMimeType) -> Self {
        Self {
            bytes: Arc::new(bytes),
            mime_type,
        }
    }

    /// Create a clip from a byte slice
    pub fn from_bytes(bytes: &[u8], mime_type: AudioMimeType) -> Self {
        Self::new(bytes.to_vec(), mime_type)
    }

    /// Buffer identity key
    pub fn key(&self) -> ClipKey {
        ClipKey(Arc::as_ptr(&self.bytes) as usize)
    }

    /// Whether both clips reference the same underlying buffer
    pub fn same_buffer(&self, other: &AudioClip) -> bool {
        Arc::ptr_eq(&self.bytes, &other.bytes)
    }

    /// Get the raw audio bytes
    pub fn data(&self) -> &[u8] {
        &self.bytes
    }

    /// Share the underlying allocation without copying
    pub(crate) fn share_bytes(&self) -> Arc<Vec<u8>> {
        Arc::clone(&self.bytes)
    }

    /// Get the MIME type
    pub fn mime_type(&self) -> AudioMimeType {
        self.mime_type
    }

    /// Get the size in bytes
    pub fn size_bytes(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the clip holds no audio at all
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Get human-readable size
    pub fn human_readable_size(&self) -> String {
        let bytes = self.size_bytes();
        if bytes < 1024 {
            format!("{} B", bytes)
        } else if bytes < 1024 * 1024 {
            format!("{:.1} KB", bytes as f64 / 1024.0)
        } else {
            format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
        }
    }

    /// Encode the audio bytes as base64 for transport
    pub fn to_base64(&self) -> String {
        use base64::Engine;
        base64::engine::general_purpose::STANDARD.encode(self.bytes.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_type_as_str() {
        assert_eq!(AudioMimeType::Wav.as_str(), "audio/wav");
        assert_eq!(AudioMimeType::Ogg.as_str(), "audio/ogg");
        assert_eq!(AudioMimeType::Webm.as_str(), "audio/webm");
    }

    #[test]
    fn mime_type_extension() {
        assert_eq!(AudioMimeType::Wav.extension(), "wav");
        assert_eq!(AudioMimeType::Mp3.extension(), "mp3");
    }

    #[test]
    fn default_mime_type_is_wav() {
        assert_eq!(AudioMimeType::default(), AudioMimeType::Wav);
    }

    #[test]
    fn clones_share_identity() {
        let clip = AudioClip::new(vec![1, 2, 3], AudioMimeType::Wav);
        let copy = clip.clone();
        assert_eq!(clip.key(), copy.key());
        assert!(clip.same_buffer(&copy));
    }

    #[test]
    fn equal_contents_are_distinct_buffers() {
        let a = AudioClip::new(vec![1, 2, 3], AudioMimeType::Wav);
        let b = AudioClip::new(vec![1, 2, 3], AudioMimeType::Wav);
        assert_ne!(a.key(), b.key());
        assert!(!a.same_buffer(&b));
    }

    #[test]
    fn clip_size() {
        let clip = AudioClip::new(vec![0u8; 1024], AudioMimeType::Wav);
        assert_eq!(clip.size_bytes(), 1024);
        assert!(!clip.is_empty());
    }

    #[test]
    fn human_readable_size_bytes() {
        let clip = AudioClip::new(vec![0u8; 500], AudioMimeType::Wav);
        assert_eq!(clip.human_readable_size(), "500 B");
    }

    #[test]
    fn human_readable_size_kb() {
        let clip = AudioClip::new(vec![0u8; 2048], AudioMimeType::Wav);
        assert_eq!(clip.human_readable_size(), "2.0 KB");
    }

    #[test]
    fn human_readable_size_mb() {
        let clip = AudioClip::new(vec![0u8; 2 * 1024 * 1024], AudioMimeType::Wav);
        assert_eq!(clip.human_readable_size(), "2.0 MB");
    }

    #[test]
    fn to_base64_round_trip() {
        let clip = AudioClip::new(vec![1, 2, 3, 4], AudioMimeType::Wav);
        let b64 = clip.to_base64();
        use base64::Engine;
        let decoded = base64::engine::general_purpose::STANDARD
            .decode(&b64)
            .unwrap();
        assert_eq!(decoded, vec![1, 2, 3, 4]);
    }
}

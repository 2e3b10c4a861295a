//! WAV duration probe adapter
//!
//! Mirrors how media elements surface duration: header metadata first, then
//! a deep scan when the header cannot be trusted. Buffers written by the
//! streaming capture path carry placeholder chunk sizes, so their headers
//! yield no usable duration and the far-seek scan does the real work by
//! counting decodable samples.

use std::io::{Read, Seek, SeekFrom};
use std::sync::Arc;

use async_trait::async_trait;

use crate::application::ports::{MediaElement, MediaEvent, MediaProbe};
use crate::domain::notes::{AudioMimeType, ClipReader, PlaybackHandle};

/// Probe adapter for WAV buffers
pub struct WavProbe;

impl WavProbe {
    pub fn new() -> Self {
        Self
    }
}

impl Default for WavProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl MediaProbe for WavProbe {
    fn open(&self, handle: Arc<PlaybackHandle>) -> Box<dyn MediaElement> {
        Box::new(WavMediaElement {
            handle,
            metadata_reported: false,
            scanned: None,
        })
    }
}

struct WavMediaElement {
    handle: Arc<PlaybackHandle>,
    metadata_reported: bool,
    /// Result of the deep scan triggered by a far seek
    scanned: Option<Option<f64>>,
}

#[async_trait]
impl MediaElement for WavMediaElement {
    async fn next_event(&mut self) -> Option<MediaEvent> {
        if !self.metadata_reported {
            self.metadata_reported = true;

            if self.handle.mime_type() != AudioMimeType::Wav {
                return Some(MediaEvent::Error);
            }
            let Some(mut reader) = self.handle.reader() else {
                return Some(MediaEvent::Error);
            };
            return match header_duration(&mut reader) {
                Ok(duration) => Some(MediaEvent::MetadataLoaded { duration }),
                Err(_) => Some(MediaEvent::Error),
            };
        }

        // After a far seek the recalculated duration arrives as a
        // time-update; with no scan pending there is nothing left to report.
        self.scanned
            .take()
            .map(|duration| MediaEvent::TimeUpdate { duration })
    }

    async fn seek(&mut self, position_secs: f64) {
        if position_secs <= 0.0 {
            return;
        }

        let handle = Arc::clone(&self.handle);
        let result = tokio::task::spawn_blocking(move || {
            handle.reader().and_then(|reader| scan_duration(reader))
        })
        .await
        .unwrap_or(None);

        self.scanned = Some(result);
    }
}

/// Duration from the header alone.
///
/// Trusted only when the declared data size matches the actual payload; a
/// streaming header (placeholder sizes) or a truncated buffer reports an
/// unknown duration instead of a bogus one.
fn header_duration(reader: &mut ClipReader) -> std::io::Result<Option<f64>> {
    let total_len = reader.seek(SeekFrom::End(0))?;
    reader.seek(SeekFrom::Start(0))?;

    let mut riff = [0u8; 12];
    reader.read_exact(&mut riff)?;
    if &riff[0..4] != b"RIFF" || &riff[8..12] != b"WAVE" {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            "not a RIFF/WAVE buffer",
        ));
    }

    let mut byte_rate: Option<u32> = None;

    loop {
        let mut chunk_header = [0u8; 8];
        if reader.read_exact(&mut chunk_header).is_err() {
            // Ran out of chunks without finding data
            return Ok(None);
        }
        let tag = &chunk_header[0..4];
        let size = u32::from_le_bytes(chunk_header[4..8].try_into().unwrap_or([0; 4]));

        match tag {
            b"fmt " => {
                let mut fmt = vec![0u8; size as usize];
                reader.read_exact(&mut fmt)?;
                if fmt.len() >= 12 {
                    byte_rate = Some(u32::from_le_bytes([fmt[8], fmt[9], fmt[10], fmt[11]]));
                }
            }
            b"data" => {
                let data_offset = reader.stream_position()?;
                let actual = total_len.saturating_sub(data_offset);
                let declared = size as u64;

                let Some(byte_rate) = byte_rate.filter(|&r| r > 0) else {
                    return Ok(None);
                };
                if declared != actual {
                    // Placeholder or stale size: the header lies
                    return Ok(None);
                }
                return Ok(Some(actual as f64 / byte_rate as f64));
            }
            _ => {
                reader.seek(SeekFrom::Current(size as i64))?;
            }
        }
    }
}

/// Deep scan: decode the buffer and count real samples.
fn scan_duration(reader: ClipReader) -> Option<f64> {
    let wav = hound::WavReader::new(reader).ok()?;
    let spec = wav.spec();
    if spec.sample_rate == 0 || spec.channels == 0 {
        return None;
    }

    let count = match spec.sample_format {
        hound::SampleFormat::Int => wav
            .into_samples::<i32>()
            .map_while(Result::ok)
            .count(),
        hound::SampleFormat::Float => wav
            .into_samples::<f32>()
            .map_while(Result::ok)
            .count(),
    };

    let frames = count / spec.channels as usize;
    if frames == 0 {
        return None;
    }
    Some(frames as f64 / spec.sample_rate as f64)
}

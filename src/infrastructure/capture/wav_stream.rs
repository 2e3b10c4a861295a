//! Streaming WAV header
//!
//! The capture session emits one canonical 44-byte header followed by raw
//! PCM chunks, so concatenating the chunks in delivery order yields the
//! final file without patching sizes afterwards. The RIFF and data chunk
//! sizes carry the streaming placeholder value; decoders that trust the
//! declared size get nothing useful from it, which is the case the duration
//! probe's deep scan exists for.

/// Length of the canonical header
pub const WAV_HEADER_LEN: usize = 44;

/// Streaming placeholder for the RIFF and data chunk sizes
pub const STREAMING_SIZE: u32 = u32::MAX;

/// Build a canonical PCM WAV header with streaming placeholder sizes.
pub fn streaming_wav_header(sample_rate: u32, channels: u16, bits_per_sample: u16) -> Vec<u8> {
    let block_align = channels * bits_per_sample / 8;
    let byte_rate = sample_rate * block_align as u32;

    let mut header = Vec::with_capacity(WAV_HEADER_LEN);
    header.extend_from_slice(b"RIFF");
    header.extend_from_slice(&STREAMING_SIZE.to_le_bytes());
    header.extend_from_slice(b"WAVE");
    header.extend_from_slice(b"fmt ");
    header.extend_from_slice(&16u32.to_le_bytes());
    header.extend_from_slice(&1u16.to_le_bytes()); // PCM
    header.extend_from_slice(&channels.to_le_bytes());
    header.extend_from_slice(&sample_rate.to_le_bytes());
    header.extend_from_slice(&byte_rate.to_le_bytes());
    header.extend_from_slice(&block_align.to_le_bytes());
    header.extend_from_slice(&bits_per_sample.to_le_bytes());
    header.extend_from_slice(b"data");
    header.extend_from_slice(&STREAMING_SIZE.to_le_bytes());
    header
}

/// Encode mono i16 samples as little-endian PCM bytes.
pub fn pcm16_bytes(samples: &[i16]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(samples.len() * 2);
    for sample in samples {
        bytes.extend_from_slice(&sample.to_le_bytes());
    }
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_has_canonical_length() {
        let header = streaming_wav_header(16_000, 1, 16);
        assert_eq!(header.len(), WAV_HEADER_LEN);
    }

    #[test]
    fn header_fields_are_little_endian() {
        let header = streaming_wav_header(16_000, 1, 16);
        assert_eq!(&header[0..4], b"RIFF");
        assert_eq!(&header[8..12], b"WAVE");
        assert_eq!(&header[12..16], b"fmt ");
        // Sample rate at offset 24
        assert_eq!(
            u32::from_le_bytes(header[24..28].try_into().unwrap()),
            16_000
        );
        // Block align at offset 32: mono 16-bit = 2
        assert_eq!(u16::from_le_bytes(header[32..34].try_into().unwrap()), 2);
        assert_eq!(&header[36..40], b"data");
    }

    #[test]
    fn header_sizes_are_placeholders() {
        let header = streaming_wav_header(44_100, 2, 16);
        assert_eq!(
            u32::from_le_bytes(header[4..8].try_into().unwrap()),
            STREAMING_SIZE
        );
        assert_eq!(
            u32::from_le_bytes(header[40..44].try_into().unwrap()),
            STREAMING_SIZE
        );
    }

    #[test]
    fn pcm16_round_trips() {
        let bytes = pcm16_bytes(&[0, 1, -1, i16::MAX, i16::MIN]);
        assert_eq!(bytes.len(), 10);
        assert_eq!(i16::from_le_bytes([bytes[2], bytes[3]]), 1);
        assert_eq!(i16::from_le_bytes([bytes[4], bytes[5]]), -1);
    }
}

//! Audio container decoding
//!
//! Decodes the uploaded WAV-like container (fixed-size header followed by
//! 16-bit little-endian PCM) into normalized `f32` samples. Stateless; the
//! structural checks here are the container's, semantic validation belongs
//! to the transcription service.

/// Fixed size of the standard WAV header in bytes
pub const WAV_HEADER_LEN: usize = 44;

/// Width of one PCM sample in bytes (16-bit)
pub const SAMPLE_WIDTH: usize = 2;

/// Structural decoding failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AudioDecodeError {
    #[error("file too small for a WAV header ({len} bytes, need at least {WAV_HEADER_LEN})")]
    TooShort { len: usize },
    #[error("audio body length {len} is not a multiple of the 16-bit sample width")]
    OddLength { len: usize },
}

/// Decode a WAV container body into normalized samples in [-1.0, 1.0]
///
/// Strips the fixed 44-byte header and interprets the remainder as signed
/// 16-bit little-endian PCM, dividing by 32768 to normalize. An empty body
/// decodes to an empty vector; rejecting that is the caller's decision.
pub fn decode_wav_pcm16(raw: &[u8]) -> Result<Vec<f32>, AudioDecodeError> {
    if raw.len() < WAV_HEADER_LEN {
        return Err(AudioDecodeError::TooShort { len: raw.len() });
    }

    let body = &raw[WAV_HEADER_LEN..];
    if body.len() % SAMPLE_WIDTH != 0 {
        return Err(AudioDecodeError::OddLength { len: body.len() });
    }

    Ok(body
        .chunks_exact(SAMPLE_WIDTH)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]) as f32 / 32768.0)
        .collect())
}

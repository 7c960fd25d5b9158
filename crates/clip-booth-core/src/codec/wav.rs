//! RIFF/WAVE container writing.
//!
//! The canonical 44-byte linear PCM 16-bit file used for submissions is laid
//! out by hand. The 32-bit float file used as the native format of captured
//! audio goes through hound.

use crate::{BoothError, CoreResult, capture::CaptureFormat, render::DecodedAudioBuffer};

use std::{io::Cursor, panic::Location};

use error_location::ErrorLocation;
use hound::{SampleFormat, WavSpec, WavWriter};
use tracing::{debug, instrument};

/// MIME type of every container written here.
pub const WAV_MIME_TYPE: &str = "audio/wav";

/// Size of the canonical PCM header.
pub const PCM16_HEADER_LEN: usize = 44;

const FORMAT_PCM: u16 = 1;
const PCM16_BYTES_PER_SAMPLE: u16 = 2;

/// Convert one float sample to signed 16-bit.
///
/// Clamps to `[-1, 1]`; negative values scale by 32768, non-negative by
/// 32767. The cast truncates toward zero and maps NaN to 0.
pub fn sample_to_pcm16(sample: f32) -> i16 {
    let s = sample.clamp(-1.0, 1.0);
    if s < 0.0 {
        (s * 32768.0) as i16
    } else {
        (s * 32767.0) as i16
    }
}

/// Encode a buffer as a linear PCM 16-bit WAV file.
///
/// Samples are interleaved frame by frame in source channel order.
///
/// # Errors
///
/// Returns `EncodeError` if the buffer has no channels or the data length
/// does not fit the 32-bit size fields.
#[track_caller]
#[instrument(skip(buffer), fields(frames = buffer.frames(), channels = buffer.channel_count()))]
pub fn encode_pcm16(buffer: &DecodedAudioBuffer) -> CoreResult<Vec<u8>> {
    let channels = u16::try_from(buffer.channel_count())
        .ok()
        .filter(|&c| c > 0 && c <= u16::MAX / PCM16_BYTES_PER_SAMPLE)
        .ok_or_else(|| BoothError::EncodeError {
            reason: format!("Unsupported channel count: {}", buffer.channel_count()),
            location: ErrorLocation::from(Location::caller()),
        })?;

    let data_len = data_len_u32(
        buffer.frames(),
        channels,
        PCM16_BYTES_PER_SAMPLE,
        PCM16_HEADER_LEN,
    )?;

    let mut out = Vec::with_capacity(PCM16_HEADER_LEN + data_len as usize);
    put_tag(&mut out, b"RIFF");
    put_u32(&mut out, data_len + (PCM16_HEADER_LEN as u32 - 8));
    put_tag(&mut out, b"WAVE");
    put_tag(&mut out, b"fmt ");
    put_u32(&mut out, 16);
    put_u16(&mut out, FORMAT_PCM);
    put_u16(&mut out, channels);
    put_u32(&mut out, buffer.sample_rate());
    put_u32(
        &mut out,
        buffer
            .sample_rate()
            .saturating_mul(u32::from(channels) * u32::from(PCM16_BYTES_PER_SAMPLE)),
    );
    put_u16(&mut out, channels * PCM16_BYTES_PER_SAMPLE);
    put_u16(&mut out, 16);
    put_tag(&mut out, b"data");
    put_u32(&mut out, data_len);

    let planes: Vec<&[f32]> = (0..buffer.channel_count())
        .map(|ch| buffer.channel(ch))
        .collect();
    for frame in 0..buffer.frames() {
        for plane in &planes {
            out.extend_from_slice(&sample_to_pcm16(plane[frame]).to_le_bytes());
        }
    }

    debug!(bytes = out.len(), "Encoded PCM16 container");

    Ok(out)
}

/// Write raw little-endian `f32` interleaved payload chunks as a float WAV file.
///
/// Chunks are joined before reading samples, so a sample may straddle a chunk
/// boundary. A trailing partial frame is dropped.
///
/// # Errors
///
/// Returns `EncodeError` if the container cannot be written.
#[track_caller]
#[instrument(skip(chunks), fields(chunks = chunks.len()))]
pub fn encode_float32(format: CaptureFormat, chunks: &[Vec<u8>]) -> CoreResult<Vec<u8>> {
    let location = Location::caller();
    let channels = format.channels.max(1);
    let spec = WavSpec {
        channels,
        sample_rate: format.sample_rate,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };

    let payload = chunks.concat();
    let samples: Vec<f32> = payload
        .chunks_exact(4)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect();
    let whole = samples.len() - samples.len() % usize::from(channels);

    let to_encode_error = |e: hound::Error| BoothError::EncodeError {
        reason: format!("Failed to write float container: {}", e),
        location: ErrorLocation::from(location),
    };

    let mut bytes = Vec::with_capacity(whole * 4 + 80);
    let mut writer = WavWriter::new(Cursor::new(&mut bytes), spec).map_err(to_encode_error)?;
    for &sample in &samples[..whole] {
        writer.write_sample(sample).map_err(to_encode_error)?;
    }
    writer.finalize().map_err(to_encode_error)?;

    debug!(bytes = bytes.len(), samples = whole, "Encoded float capture container");

    Ok(bytes)
}

/// Serialize interleaved samples as little-endian `f32` payload bytes.
pub fn float32_payload(samples: &[f32]) -> Vec<u8> {
    samples.iter().flat_map(|s| s.to_le_bytes()).collect()
}

#[track_caller]
fn data_len_u32(
    frames: usize,
    channels: u16,
    bytes_per_sample: u16,
    header_len: usize,
) -> CoreResult<u32> {
    frames
        .checked_mul(usize::from(channels) * usize::from(bytes_per_sample))
        .and_then(|len| u32::try_from(len + header_len).ok().map(|_| len as u32))
        .ok_or_else(|| BoothError::EncodeError {
            reason: format!("{} frames exceed the 4 GiB container limit", frames),
            location: ErrorLocation::from(Location::caller()),
        })
}

fn put_tag(out: &mut Vec<u8>, tag: &[u8; 4]) {
    out.extend_from_slice(tag);
}

fn put_u16(out: &mut Vec<u8>, value: u16) {
    out.extend_from_slice(&value.to_le_bytes());
}

fn put_u32(out: &mut Vec<u8>, value: u32) {
    out.extend_from_slice(&value.to_le_bytes());
}

use crate::{BoothError, CoreResult, capture::EncodedBlob, render::DecodedAudioBuffer};

use std::{io::Cursor, panic::Location};

use error_location::ErrorLocation;
use symphonia::core::{
    audio::SampleBuffer,
    codecs::{CODEC_TYPE_NULL, DecoderOptions},
    errors::Error as SymphoniaError,
    formats::FormatOptions,
    io::MediaSourceStream,
    meta::MetadataOptions,
    probe::Hint,
};
use tracing::{debug, info, instrument, warn};

/// Decode a finalized blob into planar float samples.
///
/// Recoverable packet errors are skipped. Everything else fails the whole
/// decode; there is no partial result.
///
/// # Errors
///
/// Returns `DecodeError` if the container is not recognised, carries no
/// audio track, uses an unsupported codec, or cannot be read.
#[track_caller]
#[instrument(skip(blob), fields(bytes = blob.len(), mime_type = blob.mime_type()))]
pub fn decode_blob(blob: &EncodedBlob) -> CoreResult<DecodedAudioBuffer> {
    let location = Location::caller();
    let decode_error = |reason: String| BoothError::DecodeError {
        reason,
        location: ErrorLocation::from(location),
    };

    let mss = MediaSourceStream::new(
        Box::new(Cursor::new(blob.bytes().to_vec())),
        Default::default(),
    );

    let mut hint = Hint::new();
    if !blob.mime_type().is_empty() {
        hint.mime_type(blob.mime_type());
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| decode_error(format!("Unrecognised container: {}", e)))?;
    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| decode_error("No audio track".to_string()))?;
    let track_id = track.id;
    let mut sample_rate = track.codec_params.sample_rate;
    let mut channel_count = track.codec_params.channels.map(|c| c.count());

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| decode_error(format!("Unsupported codec: {}", e)))?;

    let mut interleaved: Vec<f32> = Vec::new();
    let mut sample_buf: Option<SampleBuffer<f32>> = None;
    let mut skipped_packets = 0usize;

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break;
            }
            Err(SymphoniaError::ResetRequired) => break,
            Err(e) => return Err(decode_error(format!("Failed to read packet: {}", e))),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(decoded) => decoded,
            Err(SymphoniaError::DecodeError(e)) => {
                skipped_packets += 1;
                debug!(error = %e, "Skipping undecodable packet");
                continue;
            }
            Err(e) => return Err(decode_error(format!("Decoder failed: {}", e))),
        };

        let spec = *decoded.spec();
        let packet_channels = spec.channels.count();

        match channel_count {
            Some(expected) if expected != packet_channels && !interleaved.is_empty() => {
                return Err(decode_error(format!(
                    "Channel layout changed mid-stream: {} -> {}",
                    expected, packet_channels
                )));
            }
            _ => channel_count = Some(packet_channels),
        }
        sample_rate.get_or_insert(spec.rate);

        let needs_alloc = sample_buf
            .as_ref()
            .is_none_or(|buf| buf.capacity() < decoded.capacity());
        if needs_alloc {
            sample_buf = Some(SampleBuffer::<f32>::new(decoded.capacity() as u64, spec));
        }
        if let Some(buf) = sample_buf.as_mut() {
            buf.copy_interleaved_ref(decoded);
            interleaved.extend_from_slice(buf.samples());
        }
    }

    if skipped_packets > 0 {
        warn!(skipped_packets, "Decoded with skipped packets");
    }

    let sample_rate = sample_rate.ok_or_else(|| decode_error("Unknown sample rate".to_string()))?;
    let channel_count =
        channel_count.ok_or_else(|| decode_error("Unknown channel layout".to_string()))?;

    let buffer = DecodedAudioBuffer::from_interleaved(sample_rate, channel_count, &interleaved)
        .map_err(|e| decode_error(e.to_string()))?;

    info!(
        frames = buffer.frames(),
        sample_rate = buffer.sample_rate(),
        channels = buffer.channel_count(),
        "Recording decoded"
    );

    Ok(buffer)
}

mod buffer;
mod decode;
mod engine;
mod trim;

pub use {
    buffer::{DecodedAudioBuffer, frames_to_ms},
    decode::decode_blob,
    engine::TrimEncodeEngine,
    trim::{TrimSelection, sample_range, slice},
};

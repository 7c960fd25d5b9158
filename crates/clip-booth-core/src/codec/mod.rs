mod wav;

pub use wav::{
    PCM16_HEADER_LEN, WAV_MIME_TYPE, encode_float32, encode_pcm16, float32_payload,
    sample_to_pcm16,
};

use crate::{
    CoreResult,
    capture::EncodedBlob,
    codec::encode_pcm16,
    render::{TrimSelection, decode_blob, slice},
    submission::{EncodedSubmission, SubmissionForm, SubmissionSource},
};

use tracing::{info, instrument};

/// Decode, trim and re-encode a finalized recording for submission.
///
/// The output is always a PCM 16-bit WAV file, whatever the capture format,
/// and the trim is exact to the sample.
#[derive(Debug, Clone, Copy)]
pub struct TrimEncodeEngine {
    source: SubmissionSource,
}

impl TrimEncodeEngine {
    /// Engine that tags its output with `source`.
    pub fn new(source: SubmissionSource) -> Self {
        Self { source }
    }

    /// Render `blob` trimmed to `selection` into a submission.
    ///
    /// Either returns a complete submission or fails without side effects.
    /// The duration field is recomputed from the sliced frame count and
    /// replaces any timer-derived estimate.
    ///
    /// # Errors
    ///
    /// Returns `MissingField` if `form` lacks a required field, `DecodeError`
    /// if the blob cannot be decoded, `EncodeError` if the slice cannot be
    /// written to the container.
    #[track_caller]
    #[instrument(skip(self, blob, form), fields(start = selection.start(), end = selection.end()))]
    pub fn render(
        &self,
        blob: &EncodedBlob,
        selection: TrimSelection,
        form: SubmissionForm,
    ) -> CoreResult<EncodedSubmission> {
        form.validate()?;

        let decoded = decode_blob(blob)?;
        let sliced = slice(&decoded, selection)?;
        let audio = encode_pcm16(&sliced)?;
        let duration_ms = sliced.duration_ms();

        info!(
            source_frames = decoded.frames(),
            frames = sliced.frames(),
            sample_rate = sliced.sample_rate(),
            channels = sliced.channel_count(),
            duration_ms,
            bytes = audio.len(),
            "Recording rendered"
        );

        Ok(EncodedSubmission {
            audio,
            form,
            duration_ms,
            source: self.source,
            frames: sliced.frames(),
            sample_rate: sliced.sample_rate(),
            channels: sliced.channel_count(),
        })
    }
}

impl Default for TrimEncodeEngine {
    fn default() -> Self {
        Self::new(SubmissionSource::Record)
    }
}

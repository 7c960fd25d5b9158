use crate::{BoothError, CoreResult};

use std::panic::Location;

use error_location::ErrorLocation;

/// Planar float audio: one sample vector per channel, all the same length.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedAudioBuffer {
    sample_rate: u32,
    channels: Vec<Vec<f32>>,
}

impl DecodedAudioBuffer {
    /// Build a buffer from per-channel sample vectors.
    ///
    /// # Errors
    ///
    /// Returns `DecodeError` if there are no channels, the sample rate is
    /// zero, or channel lengths differ.
    #[track_caller]
    pub fn new(sample_rate: u32, channels: Vec<Vec<f32>>) -> CoreResult<Self> {
        let location = Location::caller();

        if channels.is_empty() || sample_rate == 0 {
            return Err(BoothError::DecodeError {
                reason: format!(
                    "Invalid layout: {} channels at {} Hz",
                    channels.len(),
                    sample_rate
                ),
                location: ErrorLocation::from(location),
            });
        }

        let frames = channels[0].len();
        if channels.iter().any(|c| c.len() != frames) {
            return Err(BoothError::DecodeError {
                reason: "Channel lengths differ".to_string(),
                location: ErrorLocation::from(location),
            });
        }

        Ok(Self {
            sample_rate,
            channels,
        })
    }

    /// Build a buffer by splitting interleaved samples.
    #[track_caller]
    pub fn from_interleaved(
        sample_rate: u32,
        channel_count: usize,
        interleaved: &[f32],
    ) -> CoreResult<Self> {
        let per_channel = interleaved.len() / channel_count.max(1);
        let mut channels: Vec<Vec<f32>> = (0..channel_count)
            .map(|_| Vec::with_capacity(per_channel))
            .collect();
        for frame in interleaved.chunks_exact(channel_count.max(1)) {
            for (plane, &sample) in channels.iter_mut().zip(frame) {
                plane.push(sample);
            }
        }
        Self::new(sample_rate, channels)
    }

    /// Frames per second.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of channels.
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Samples per channel.
    pub fn frames(&self) -> usize {
        self.channels.first().map_or(0, Vec::len)
    }

    /// Samples of one channel. Empty for an out-of-range index.
    pub fn channel(&self, index: usize) -> &[f32] {
        self.channels.get(index).map_or(&[], Vec::as_slice)
    }

    /// Whole milliseconds of audio: `frames / sample_rate * 1000`, floored.
    pub fn duration_ms(&self) -> u64 {
        frames_to_ms(self.frames(), self.sample_rate)
    }
}

/// Floored millisecond duration of `frames` at `sample_rate`.
pub fn frames_to_ms(frames: usize, sample_rate: u32) -> u64 {
    if sample_rate == 0 {
        return 0;
    }
    (frames as u128 * 1000 / u128::from(sample_rate)) as u64
}

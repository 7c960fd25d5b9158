use crate::{BoothError, CoreResult, render::DecodedAudioBuffer};

use std::{ops::Range, panic::Location};

use error_location::ErrorLocation;

/// Fractional trim bounds over the decoded sample timeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrimSelection {
    start: f64,
    end: f64,
}

impl TrimSelection {
    /// Keep the whole recording.
    pub const FULL: Self = Self {
        start: 0.0,
        end: 1.0,
    };

    /// Validated selection with `0 <= start <= end <= 1`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTrim` for non-finite, out-of-range, or inverted bounds.
    #[track_caller]
    pub fn new(start: f64, end: f64) -> CoreResult<Self> {
        let in_range = |v: f64| v.is_finite() && (0.0..=1.0).contains(&v);
        if !in_range(start) || !in_range(end) || start > end {
            return Err(BoothError::InvalidTrim {
                start,
                end,
                location: ErrorLocation::from(Location::caller()),
            });
        }
        Ok(Self { start, end })
    }

    /// Selection from whole-percent slider positions (0..=100).
    #[track_caller]
    pub fn from_percent(start: u8, end: u8) -> CoreResult<Self> {
        Self::new(f64::from(start) / 100.0, f64::from(end) / 100.0)
    }

    /// Start fraction.
    pub fn start(&self) -> f64 {
        self.start
    }

    /// End fraction.
    pub fn end(&self) -> f64 {
        self.end
    }

    /// Frame range this selection covers in a buffer of `total` frames.
    pub fn frame_range(&self, total: usize) -> Range<usize> {
        sample_range(total, self.start, self.end)
    }
}

impl Default for TrimSelection {
    fn default() -> Self {
        Self::FULL
    }
}

/// `[floor(total * start), floor(total * end))`, empty when inverted.
///
/// Fractions are clamped to `[0, 1]` so the range always lies in the buffer.
pub fn sample_range(total: usize, start: f64, end: f64) -> Range<usize> {
    let bound = |fraction: f64| {
        let f = if fraction.is_nan() {
            0.0
        } else {
            fraction.clamp(0.0, 1.0)
        };
        ((total as f64 * f).floor() as usize).min(total)
    };
    let first = bound(start);
    let last = bound(end).max(first);
    first..last
}

/// Copy the selected frames of every channel into a new buffer.
///
/// Same sample indices on every channel; no resampling and no fades.
#[track_caller]
pub fn slice(
    buffer: &DecodedAudioBuffer,
    selection: TrimSelection,
) -> CoreResult<DecodedAudioBuffer> {
    let range = selection.frame_range(buffer.frames());
    let channels = (0..buffer.channel_count())
        .map(|ch| buffer.channel(ch)[range.clone()].to_vec())
        .collect();
    DecodedAudioBuffer::new(buffer.sample_rate(), channels)
}

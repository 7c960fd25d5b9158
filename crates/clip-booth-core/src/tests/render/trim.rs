use crate::{BoothError, DecodedAudioBuffer, TrimSelection, frames_to_ms, sample_range, slice};

fn stereo_ramp(frames: usize, sample_rate: u32) -> DecodedAudioBuffer {
    let left = (0..frames).map(|i| i as f32 / frames as f32).collect();
    let right = (0..frames).map(|i| -(i as f32) / frames as f32).collect();
    DecodedAudioBuffer::new(sample_rate, vec![left, right]).unwrap()
}

/// WHAT: The full selection returns the buffer unchanged
/// WHY: Submitting without trimming must not alter the audio
#[test]
fn given_full_selection_when_slicing_then_identical_buffer() {
    // Given: A stereo buffer
    let buffer = stereo_ramp(1_000, 8_000);

    // When: Slicing with [0, 1]
    let sliced = slice(&buffer, TrimSelection::FULL).unwrap();

    // Then: Same samples, rate and layout
    assert_eq!(sliced, buffer);
}

/// WHAT: Middle half of an 8s stereo clip is exactly 4s
/// WHY: Trim is sample-exact on every channel
#[test]
fn given_8s_stereo_when_trimming_quarter_to_three_quarters_then_4s_kept() {
    // Given: 8 seconds of 44.1 kHz stereo
    let buffer = stereo_ramp(352_800, 44_100);

    // When: Keeping [0.25, 0.75]
    let selection = TrimSelection::new(0.25, 0.75).unwrap();
    let sliced = slice(&buffer, selection).unwrap();

    // Then: 176_400 frames, 4_000 ms, same indices on both channels
    assert_eq!(sliced.frames(), 176_400);
    assert_eq!(sliced.duration_ms(), 4_000);
    assert_eq!(sliced.channel_count(), 2);
    assert_eq!(sliced.channel(0), &buffer.channel(0)[88_200..264_600]);
    assert_eq!(sliced.channel(1), &buffer.channel(1)[88_200..264_600]);
}

/// WHAT: Range bounds are floored and clamped
/// WHY: Fractional positions must map to valid sample indices
#[test]
fn given_fractional_bounds_when_computing_range_then_floored_and_clamped() {
    assert_eq!(sample_range(10, 0.0, 1.0), 0..10);
    assert_eq!(sample_range(10, 0.15, 0.55), 1..5);
    assert_eq!(sample_range(10, -0.5, 1.5), 0..10);
    assert_eq!(sample_range(10, f64::NAN, 0.3), 0..3);
    assert_eq!(sample_range(0, 0.2, 0.8), 0..0);
}

/// WHAT: Inverted bounds give an empty range
/// WHY: A reversed selection must never read outside the buffer
#[test]
fn given_inverted_bounds_when_computing_range_then_empty() {
    let range = sample_range(100, 0.6, 0.4);

    assert!(range.is_empty());
    assert_eq!(range.start, 60);
}

/// WHAT: Equal bounds slice to a zero-length buffer
/// WHY: An empty selection is valid and keeps the channel layout
#[test]
fn given_equal_bounds_when_slicing_then_zero_frames() {
    // Given: A stereo buffer
    let buffer = stereo_ramp(500, 16_000);

    // When: Selecting [0.5, 0.5]
    let sliced = slice(&buffer, TrimSelection::new(0.5, 0.5).unwrap()).unwrap();

    // Then: No frames, two channels, zero duration
    assert_eq!(sliced.frames(), 0);
    assert_eq!(sliced.channel_count(), 2);
    assert_eq!(sliced.duration_ms(), 0);
}

/// WHAT: Out-of-range, inverted and non-finite bounds are rejected
/// WHY: Slider values are validated before they reach the renderer
#[test]
fn given_invalid_bounds_when_building_selection_then_invalid_trim() {
    for (start, end) in [(0.8, 0.2), (-0.1, 0.5), (0.0, 1.01), (f64::NAN, 1.0)] {
        let result = TrimSelection::new(start, end);
        assert!(
            matches!(result, Err(BoothError::InvalidTrim { .. })),
            "expected InvalidTrim for [{start}, {end}]"
        );
    }
}

/// WHAT: Whole-percent slider positions map to fractions
/// WHY: The console trim command takes percentages
#[test]
fn given_percent_positions_when_building_selection_then_fractions() {
    let selection = TrimSelection::from_percent(25, 75).unwrap();

    assert_eq!(selection.start(), 0.25);
    assert_eq!(selection.end(), 0.75);
    assert!(TrimSelection::from_percent(10, 101).is_err());
}

/// WHAT: Duration is floored to whole milliseconds
/// WHY: durationMs is an integer field derived from the frame count
#[test]
fn given_frame_counts_when_converting_then_floored_milliseconds() {
    assert_eq!(frames_to_ms(44_100, 44_100), 1_000);
    assert_eq!(frames_to_ms(44_099, 44_100), 999);
    assert_eq!(frames_to_ms(1, 48_000), 0);
    assert_eq!(frames_to_ms(10, 0), 0);
}

/// WHAT: Buffers with mismatched channels are rejected
/// WHY: Every channel must share one timeline
#[test]
fn given_uneven_channels_when_building_buffer_then_decode_error() {
    let result = DecodedAudioBuffer::new(8_000, vec![vec![0.0; 4], vec![0.0; 3]]);

    assert!(matches!(result, Err(BoothError::DecodeError { .. })));
    assert!(DecodedAudioBuffer::new(0, vec![vec![0.0]]).is_err());
    assert!(DecodedAudioBuffer::new(8_000, Vec::new()).is_err());
}

/// WHAT: Interleaved samples split into one plane per channel
/// WHY: Each plane is filled independently, frame by frame
#[test]
fn given_interleaved_three_channels_when_splitting_then_planes_in_order() {
    // Given: Two whole frames of three channels and a stray sample
    let interleaved = [0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7];

    // When: Splitting
    let buffer = DecodedAudioBuffer::from_interleaved(16_000, 3, &interleaved).unwrap();

    // Then: Separate planes, partial frame dropped
    assert_eq!(buffer.frames(), 2);
    assert_eq!(buffer.channel(0), &[0.1, 0.4]);
    assert_eq!(buffer.channel(1), &[0.2, 0.5]);
    assert_eq!(buffer.channel(2), &[0.3, 0.6]);
}

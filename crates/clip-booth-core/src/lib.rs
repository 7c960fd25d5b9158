//! Clip-booth Core Library
//!
//! Capture, level metering, pause-aware timing, and sample-exact trim and
//! encode for recorded clips, built on cpal and symphonia.
//!
//! # Example
//!
//! ```no_run
//! use clip_booth_core::{
//!     CaptureController, CoreResult, CpalDevice, SubmissionForm, TrimEncodeEngine, TrimSelection,
//! };
//!
//! use std::{thread::sleep, time::Duration};
//!
//! fn main() -> CoreResult<()> {
//!     let mut controller = CaptureController::new(CpalDevice::new());
//!
//!     controller.start()?;
//!     sleep(Duration::from_secs(3));
//!     let recording = controller.stop()?.clone();
//!
//!     let form = SubmissionForm {
//!         full_name: "Ada Lovelace".to_string(),
//!         title: "Morning notes".to_string(),
//!         category: "Podcast Episode".to_string(),
//!         ..Default::default()
//!     };
//!     let submission = TrimEncodeEngine::default().render(
//!         &recording.blob,
//!         TrimSelection::new(0.1, 0.9)?,
//!         form,
//!     )?;
//!
//!     println!("Rendered {} ms", submission.duration_ms);
//!     Ok(())
//! }
//! ```

mod capture;
mod clock;
mod codec;
mod error;
mod meter;
mod render;
mod submission;
mod timer;

pub use {
    capture::{
        CaptureController, CaptureDevice, CaptureEvent, CaptureFormat, CaptureStream, CpalDevice,
        CpalStream, EncodedBlob, FinalizedRecording, RecordingSession, SessionState, SignalTap,
        TAP_WINDOW,
    },
    clock::{Clock, SystemClock},
    codec::{
        PCM16_HEADER_LEN, WAV_MIME_TYPE, encode_float32, encode_pcm16, float32_payload,
        sample_to_pcm16,
    },
    error::{BoothError, Result as CoreResult},
    meter::{LevelMeter, peak_percent},
    render::{
        DecodedAudioBuffer, TrimEncodeEngine, TrimSelection, decode_blob, frames_to_ms,
        sample_range, slice,
    },
    submission::{ATTACHMENT_NAME, EncodedSubmission, SubmissionForm, SubmissionSource},
    timer::{RecordingTimer, TIMER_INTERVAL, TimerReading, format_clock},
};

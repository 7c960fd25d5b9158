mod controller;
mod cpal_device;
mod device;
mod session;
pub(crate) mod stream_guard;
mod tap;

pub use {
    controller::{CaptureController, FinalizedRecording},
    cpal_device::{CpalDevice, CpalStream},
    device::{CaptureDevice, CaptureEvent, CaptureFormat, CaptureStream, EncodedBlob},
    session::{RecordingSession, SessionState},
    tap::{SignalTap, TAP_WINDOW},
};

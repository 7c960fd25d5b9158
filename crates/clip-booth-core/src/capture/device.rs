use crate::{CoreResult, capture::SignalTap};

use std::sync::mpsc::Receiver;

/// Event delivered from a capture backend to the controller.
#[derive(Debug, Clone, PartialEq)]
pub enum CaptureEvent {
    /// The backend buffered a chunk of encoded capture data.
    DataAvailable(Vec<u8>),
    /// The backend reported a non-fatal stream fault.
    Fault(String),
}

/// Native format of an acquired input stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureFormat {
    /// Frames per second.
    pub sample_rate: u32,
    /// Interleaved channel count.
    pub channels: u16,
}

/// Finalized capture: opaque encoded bytes plus their MIME type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedBlob {
    mime_type: String,
    bytes: Vec<u8>,
}

impl EncodedBlob {
    /// Wrap encoded bytes.
    pub fn new(mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// MIME type used as a decoder hint.
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Encoded bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Encoded length in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// True when no bytes were captured.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// An open input stream on a capture device.
///
/// Data arrives through the event receiver handed out by
/// [`CaptureDevice::acquire`], never through this handle.
pub trait CaptureStream: Send {
    /// Format the backend is delivering.
    fn format(&self) -> CaptureFormat;

    /// Stop emitting chunks while keeping the device open.
    fn pause(&mut self) -> CoreResult<()>;

    /// Resume emitting chunks.
    fn resume(&mut self) -> CoreResult<()>;

    /// Stop every underlying track and close the signal tap.
    ///
    /// Must be idempotent; it also runs from `Drop` of the owning guard.
    fn release(&mut self);

    /// Live signal window for level metering.
    fn signal_tap(&self) -> SignalTap;

    /// Assemble accepted chunks into one self-contained blob.
    fn finalize(&self, chunks: &[Vec<u8>]) -> CoreResult<EncodedBlob>;
}

/// Source of input streams.
pub trait CaptureDevice: Send {
    /// Stream type produced by this device.
    type Stream: CaptureStream;

    /// Open the input and start delivering events.
    ///
    /// # Errors
    ///
    /// Returns `DeviceUnavailable` if permission is denied or no device exists.
    fn acquire(&mut self) -> CoreResult<(Self::Stream, Receiver<CaptureEvent>)>;
}

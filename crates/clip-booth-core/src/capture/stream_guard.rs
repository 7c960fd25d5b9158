use crate::capture::CaptureStream;

/// RAII guard that guarantees a capture stream is released when dropped.
///
/// Owns the stream so every exit path (normal stop, error return, controller
/// drop) stops the device tracks and closes the signal tap.
pub(crate) struct StreamGuard<S: CaptureStream> {
    stream: S,
}

impl<S: CaptureStream> StreamGuard<S> {
    pub(crate) fn new(stream: S) -> Self {
        Self { stream }
    }

    pub(crate) fn stream(&self) -> &S {
        &self.stream
    }

    pub(crate) fn stream_mut(&mut self) -> &mut S {
        &mut self.stream
    }
}

impl<S: CaptureStream> Drop for StreamGuard<S> {
    fn drop(&mut self) {
        self.stream.release();
    }
}

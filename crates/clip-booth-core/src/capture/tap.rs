use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, Ordering},
};

use tracing::error;

/// Samples kept for one meter frame (matches a 2048-point analyser).
pub const TAP_WINDOW: usize = 2048;

/// Shared window onto the live input signal.
///
/// The device callback writes the newest samples; the level meter reads
/// them. Closing the tap ends every meter loop reading from it.
#[derive(Debug, Clone)]
pub struct SignalTap {
    inner: Arc<TapInner>,
}

#[derive(Debug)]
struct TapInner {
    window: Mutex<Vec<f32>>,
    capacity: usize,
    closed: AtomicBool,
}

impl SignalTap {
    /// Open tap holding up to `capacity` samples.
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Arc::new(TapInner {
                window: Mutex::new(Vec::with_capacity(capacity)),
                capacity,
                closed: AtomicBool::new(false),
            }),
        }
    }

    /// Push samples, keeping only the newest `capacity` of them.
    pub fn write(&self, samples: &[f32]) {
        if self.is_closed() {
            return;
        }
        let capacity = self.inner.capacity;
        let mut window = self.inner.window.lock().unwrap_or_else(|e| {
            error!("Signal tap lock poisoned, recovering: {}", e);
            e.into_inner()
        });
        if samples.len() >= capacity {
            window.clear();
            window.extend_from_slice(&samples[samples.len() - capacity..]);
            return;
        }
        let overflow = (window.len() + samples.len()).saturating_sub(capacity);
        window.drain(..overflow);
        window.extend_from_slice(samples);
    }

    /// Copy the current window into `out`. Returns `false` once closed.
    pub fn read_into(&self, out: &mut Vec<f32>) -> bool {
        out.clear();
        if self.is_closed() {
            return false;
        }
        let window = self
            .inner
            .window
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        out.extend_from_slice(&window);
        true
    }

    /// Close the tap. Readers observe `false` from then on.
    pub fn close(&self) {
        self.inner.closed.store(true, Ordering::Release);
    }

    /// True once the owning stream has been released.
    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::Acquire)
    }
}

impl Default for SignalTap {
    fn default() -> Self {
        Self::new(TAP_WINDOW)
    }
}

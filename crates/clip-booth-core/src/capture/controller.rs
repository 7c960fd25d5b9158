use crate::{
    BoothError, CoreResult,
    capture::{
        CaptureDevice, CaptureEvent, CaptureStream, EncodedBlob, RecordingSession, SessionState,
        SignalTap, stream_guard::StreamGuard,
    },
    clock::{Clock, SystemClock},
    render::TrimSelection,
    timer::{RecordingTimer, TimerReading},
};

use std::{
    panic::Location,
    sync::{Arc, mpsc::Receiver},
};

use error_location::ErrorLocation;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// Output of a completed capture.
#[derive(Debug, Clone, PartialEq)]
pub struct FinalizedRecording {
    /// Session that produced the recording.
    pub session_id: Uuid,
    /// Immutable encoded capture.
    pub blob: EncodedBlob,
    /// Timer value at stop, excluding pauses.
    pub recorded_duration_ms: u64,
    /// Number of device chunks that went into the blob.
    pub chunk_count: usize,
}

struct LiveCapture<S: CaptureStream> {
    guard: StreamGuard<S>,
    events: Receiver<CaptureEvent>,
}

/// Record/pause/resume/stop state machine over a capture device.
///
/// One controller serves many attempts; each `start` begins a fresh
/// [`RecordingSession`]. The device stream lives only between `start` and
/// `stop` and is released when the controller is dropped mid-capture.
pub struct CaptureController<D: CaptureDevice> {
    device: D,
    clock: Arc<dyn Clock>,
    session: RecordingSession,
    timer: RecordingTimer,
    live: Option<LiveCapture<D::Stream>>,
    finalized: Option<FinalizedRecording>,
    trim: TrimSelection,
}

impl<D: CaptureDevice> CaptureController<D> {
    /// Controller timed by the system monotonic clock.
    pub fn new(device: D) -> Self {
        Self::with_clock(device, Arc::new(SystemClock::new()))
    }

    /// Controller timed by `clock`.
    pub fn with_clock(device: D, clock: Arc<dyn Clock>) -> Self {
        Self {
            device,
            clock,
            session: RecordingSession::new(),
            timer: RecordingTimer::new(),
            live: None,
            finalized: None,
            trim: TrimSelection::FULL,
        }
    }

    /// Current session state.
    pub fn state(&self) -> SessionState {
        self.session.state()
    }

    /// Current session.
    pub fn session(&self) -> &RecordingSession {
        &self.session
    }

    /// Acquire the device and begin recording.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless idle, or `DeviceUnavailable` if the
    /// device cannot be opened. On error the controller stays idle.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn start(&mut self) -> CoreResult<()> {
        self.require(&[SessionState::Idle], "start")?;

        let (stream, events) = self.device.acquire()?;
        let format = stream.format();

        self.session = RecordingSession::new();
        self.session.begin(self.clock.now_ms());
        self.timer.reset();
        self.finalized = None;
        self.trim = TrimSelection::FULL;
        self.live = Some(LiveCapture {
            guard: StreamGuard::new(stream),
            events,
        });

        info!(
            session_id = %self.session.id(),
            sample_rate = format.sample_rate,
            channels = format.channels,
            "Recording started"
        );

        Ok(())
    }

    /// Stop accepting chunks; the device stays open.
    ///
    /// Chunks the device sent before its pause flag was set are still kept.
    /// The pause instant is committed before returning, so any later timer
    /// tick or `resume` sees it.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn pause(&mut self) -> CoreResult<()> {
        self.require(&[SessionState::Recording], "pause")?;

        // Flag first so a buffer the callback is still sending lands before the drain.
        self.live_mut()?.guard.stream_mut().pause()?;
        self.pump_events();
        self.session.pause(self.clock.now_ms());

        info!(
            session_id = %self.session.id(),
            elapsed_ms = self.elapsed_ms(),
            "Recording paused"
        );

        Ok(())
    }

    /// Accept chunks again after a pause.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn resume(&mut self) -> CoreResult<()> {
        self.require(&[SessionState::Paused], "resume")?;
        self.pump_events();

        self.live_mut()?.guard.stream_mut().resume()?;
        let now = self.clock.now_ms();
        self.session.resume(now);

        info!(
            session_id = %self.session.id(),
            accumulated_pause_ms = self.session.accumulated_pause_ms(now),
            "Recording resumed"
        );

        Ok(())
    }

    /// Finalize the accepted chunks and release the device.
    ///
    /// The device is released even when finalizing fails.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless recording or paused.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn stop(&mut self) -> CoreResult<&FinalizedRecording> {
        self.require(&[SessionState::Recording, SessionState::Paused], "stop")?;
        self.pump_events();

        let now = self.clock.now_ms();
        let recorded_duration_ms = self.timer.freeze(&self.session, now).elapsed_ms;
        let chunks = self.session.finish(now);

        let live = self.live.take().ok_or_else(|| BoothError::DeviceError {
            reason: "Capture stream missing".to_string(),
            location: ErrorLocation::from(Location::caller()),
        })?;
        let finalized = live.guard.stream().finalize(&chunks);
        drop(live);
        let blob = finalized?;

        info!(
            session_id = %self.session.id(),
            recorded_duration_ms,
            chunk_count = chunks.len(),
            bytes = blob.len(),
            "Recording stopped"
        );

        Ok(self.finalized.insert(FinalizedRecording {
            session_id: self.session.id(),
            blob,
            recorded_duration_ms,
            chunk_count: chunks.len(),
        }))
    }

    /// Discard the finalized recording and trim, ready for a new `start`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` while recording or paused.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn re_record(&mut self) -> CoreResult<()> {
        self.require(&[SessionState::Idle, SessionState::Stopped], "re-record")?;

        self.live = None;
        self.finalized = None;
        self.trim = TrimSelection::FULL;
        self.timer.reset();
        self.session = RecordingSession::new();

        info!("Ready to record again");

        Ok(())
    }

    /// Deliver pending device events into the session.
    ///
    /// Chunks are kept only while recording. Returns the number accepted.
    pub fn pump_events(&mut self) -> usize {
        let Some(live) = self.live.as_ref() else {
            return 0;
        };

        let mut accepted = 0;
        while let Ok(event) = live.events.try_recv() {
            match event {
                CaptureEvent::DataAvailable(chunk) => {
                    let len = chunk.len();
                    if self.session.append_chunk(chunk) {
                        accepted += 1;
                    } else {
                        debug!(bytes = len, state = ?self.session.state(), "Chunk dropped");
                    }
                }
                CaptureEvent::Fault(reason) => {
                    warn!(
                        session_id = %self.session.id(),
                        reason = %reason,
                        "Capture stream fault"
                    );
                }
            }
        }
        accepted
    }

    /// Timer tick: deliver pending chunks, then publish a reading if recording.
    pub fn tick_timer(&mut self) -> Option<TimerReading> {
        self.pump_events();
        let now = self.clock.now_ms();
        self.timer.tick(&self.session, now).cloned()
    }

    /// Last published timer reading.
    pub fn last_reading(&self) -> Option<&TimerReading> {
        self.timer.last()
    }

    /// Recorded milliseconds now, excluding pauses.
    pub fn elapsed_ms(&self) -> u64 {
        self.session.elapsed_ms(self.clock.now_ms())
    }

    /// Paused milliseconds now, including an open pause.
    pub fn accumulated_pause_ms(&self) -> u64 {
        self.session.accumulated_pause_ms(self.clock.now_ms())
    }

    /// Live signal for the level meter while a device is open.
    pub fn signal_tap(&self) -> Option<SignalTap> {
        self.live.as_ref().map(|live| live.guard.stream().signal_tap())
    }

    /// The finalized recording, once stopped.
    pub fn finalized(&self) -> Option<&FinalizedRecording> {
        self.finalized.as_ref()
    }

    /// Choose the part of the finalized recording to keep.
    ///
    /// # Errors
    ///
    /// Returns `NoRecording` before a recording has been finalized.
    #[track_caller]
    pub fn set_trim(&mut self, selection: TrimSelection) -> CoreResult<()> {
        if self.finalized.is_none() {
            return Err(BoothError::NoRecording {
                location: ErrorLocation::from(Location::caller()),
            });
        }
        debug!(start = selection.start(), end = selection.end(), "Trim updated");
        self.trim = selection;
        Ok(())
    }

    /// Current trim selection.
    pub fn trim(&self) -> TrimSelection {
        self.trim
    }

    #[track_caller]
    fn require(&self, allowed: &[SessionState], action: &'static str) -> CoreResult<()> {
        let from = self.session.state();
        if allowed.contains(&from) {
            return Ok(());
        }
        Err(BoothError::InvalidTransition {
            from,
            action,
            location: ErrorLocation::from(Location::caller()),
        })
    }

    #[track_caller]
    fn live_mut(&mut self) -> CoreResult<&mut LiveCapture<D::Stream>> {
        self.live.as_mut().ok_or_else(|| BoothError::DeviceError {
            reason: "Capture stream missing".to_string(),
            location: ErrorLocation::from(Location::caller()),
        })
    }
}

use uuid::Uuid;

/// Lifecycle state of a recording session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No capture in progress; ready for `start`.
    Idle,
    /// Device is capturing and chunks are being accepted.
    Recording,
    /// Device stays open but chunks are not accepted.
    Paused,
    /// Capture finished and the chunks were finalized.
    Stopped,
}

/// Per-attempt capture bookkeeping.
///
/// Pure state: no device handles, no clock. Callers pass the current time
/// into every time-dependent operation.
#[derive(Debug)]
pub struct RecordingSession {
    id: Uuid,
    state: SessionState,
    chunks: Vec<Vec<u8>>,
    started_at_ms: u64,
    /// Committed pause total. Open interval lives in `paused_since_ms`.
    accumulated_pause_ms: u64,
    paused_since_ms: Option<u64>,
    stopped_at_ms: Option<u64>,
}

impl RecordingSession {
    /// Fresh idle session.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            state: SessionState::Idle,
            chunks: Vec::new(),
            started_at_ms: 0,
            accumulated_pause_ms: 0,
            paused_since_ms: None,
            stopped_at_ms: None,
        }
    }

    /// Session id for log correlation.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Chunks accepted so far, in arrival order.
    pub fn chunks(&self) -> &[Vec<u8>] {
        &self.chunks
    }

    /// Wall-clock reading captured when recording began.
    pub fn started_at_ms(&self) -> u64 {
        self.started_at_ms
    }

    pub(crate) fn begin(&mut self, now_ms: u64) {
        self.chunks.clear();
        self.accumulated_pause_ms = 0;
        self.paused_since_ms = None;
        self.stopped_at_ms = None;
        self.started_at_ms = now_ms;
        self.state = SessionState::Recording;
    }

    /// Append a device chunk. Only accepted while recording.
    pub(crate) fn append_chunk(&mut self, chunk: Vec<u8>) -> bool {
        if self.state != SessionState::Recording || chunk.is_empty() {
            return false;
        }
        self.chunks.push(chunk);
        true
    }

    pub(crate) fn pause(&mut self, now_ms: u64) {
        self.paused_since_ms = Some(now_ms);
        self.state = SessionState::Paused;
    }

    pub(crate) fn resume(&mut self, now_ms: u64) {
        self.commit_pause(now_ms);
        self.state = SessionState::Recording;
    }

    pub(crate) fn finish(&mut self, now_ms: u64) -> Vec<Vec<u8>> {
        self.commit_pause(now_ms);
        self.stopped_at_ms = Some(now_ms);
        self.state = SessionState::Stopped;
        std::mem::take(&mut self.chunks)
    }

    fn commit_pause(&mut self, now_ms: u64) {
        if let Some(since) = self.paused_since_ms.take() {
            self.accumulated_pause_ms += now_ms.saturating_sub(since);
        }
    }

    /// Total paused time, counting an interval still open at `now_ms`.
    pub fn accumulated_pause_ms(&self, now_ms: u64) -> u64 {
        let open = self
            .paused_since_ms
            .map(|since| now_ms.saturating_sub(since))
            .unwrap_or(0);
        self.accumulated_pause_ms + open
    }

    /// Recorded time excluding pauses. Frozen while paused and after stop.
    pub fn elapsed_ms(&self, now_ms: u64) -> u64 {
        if self.state == SessionState::Idle {
            return 0;
        }
        let now_ms = self.stopped_at_ms.map_or(now_ms, |stopped| stopped.min(now_ms));
        now_ms
            .saturating_sub(self.started_at_ms)
            .saturating_sub(self.accumulated_pause_ms(now_ms))
    }
}

impl Default for RecordingSession {
    fn default() -> Self {
        Self::new()
    }
}

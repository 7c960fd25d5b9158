use clip_booth_core::SessionState;

/// Status line states corresponding to the recording workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusIndicator {
    /// Ready to start recording.
    Ready,
    /// Capturing audio.
    Recording,
    /// Device open, capture paused.
    Paused,
    /// Recording finalized, ready to trim and submit.
    Stopped,
    /// Rendering and sending a submission.
    Submitting,
}

impl StatusIndicator {
    /// Short label at the start of the status line.
    pub fn label(&self) -> &'static str {
        match self {
            StatusIndicator::Ready => "READY",
            StatusIndicator::Recording => "REC",
            StatusIndicator::Paused => "PAUSED",
            StatusIndicator::Stopped => "STOPPED",
            StatusIndicator::Submitting => "SENDING",
        }
    }
}

impl From<SessionState> for StatusIndicator {
    fn from(state: SessionState) -> Self {
        match state {
            SessionState::Idle => StatusIndicator::Ready,
            SessionState::Recording => StatusIndicator::Recording,
            SessionState::Paused => StatusIndicator::Paused,
            SessionState::Stopped => StatusIndicator::Stopped,
        }
    }
}

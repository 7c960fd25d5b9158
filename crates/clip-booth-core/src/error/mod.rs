use crate::capture::SessionState;

use error_location::ErrorLocation;
use thiserror::Error;

/// Capture, trim and encode errors with source location tracking.
#[derive(Error, Debug)]
pub enum BoothError {
    /// Permission denied or no capture device present.
    #[error("Capture device unavailable: {reason} {location}")]
    DeviceUnavailable {
        /// Description of why the device could not be opened.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Capture device operation failed after the device was acquired.
    #[error("Capture device error: {reason} {location}")]
    DeviceError {
        /// Description of the device error.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Operation is not valid in the current session state.
    #[error("Cannot {action} while {from:?} {location}")]
    InvalidTransition {
        /// State the session was in when the operation was attempted.
        from: SessionState,
        /// Name of the rejected operation.
        action: &'static str,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// No finalized recording is available.
    #[error("No finalized recording {location}")]
    NoRecording {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Trim bounds are outside `[0, 1]`, non-finite, or inverted.
    #[error("Invalid trim bounds [{start}, {end}] {location}")]
    InvalidTrim {
        /// Requested start fraction.
        start: f64,
        /// Requested end fraction.
        end: f64,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Finalized recording could not be decoded.
    #[error("Decode failed: {reason} {location}")]
    DecodeError {
        /// Description of the decode failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Buffer cannot be represented in the output container.
    #[error("Encode failed: {reason} {location}")]
    EncodeError {
        /// Description of the encode failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// A required submission form field is blank.
    #[error("Missing required field: {field} {location}")]
    MissingField {
        /// Wire name of the missing field.
        field: &'static str,
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

/// Result type alias using [`BoothError`].
pub type Result<T> = std::result::Result<T, BoothError>;

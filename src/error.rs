//! Unified error handling for the recording engine.
//!
//! Lifecycle commands issued in the wrong state fail with
//! [`RecordingError::InvalidTransition`] and leave the session untouched.
//! Per-sample conditions (bad coordinates, clock going backwards, sampling
//! while paused) are deliberately NOT errors - `accept` reports them through
//! [`AcceptOutcome`](crate::AcceptOutcome) so a racing sample stream never
//! aborts a recording.

use crate::session::SessionState;
use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, RecordingError>;

/// Errors surfaced by the recording engine.
#[derive(Debug, Error)]
pub enum RecordingError {
    /// A lifecycle command was issued in a state that does not permit it.
    /// The session state is unchanged.
    #[error("cannot {command} while session is {state:?}")]
    InvalidTransition {
        /// The command that was attempted (e.g. "start", "lap")
        command: &'static str,
        /// The state the session was in at the time
        state: SessionState,
    },

    /// The track sink failed to persist data. Accumulator state is
    /// unaffected; the engine never retries I/O.
    #[error("track sink I/O failure: {0}")]
    Io(#[from] std::io::Error),

    /// GPX serialization failed while closing the output document.
    #[cfg(feature = "gpx")]
    #[error("failed to write GPX document: {0}")]
    GpxWrite(#[from] gpx::errors::GpxError),
}

impl RecordingError {
    /// Shorthand used by the session's transition guards.
    pub(crate) fn invalid_transition(command: &'static str, state: SessionState) -> Self {
        Self::InvalidTransition { command, state }
    }
}

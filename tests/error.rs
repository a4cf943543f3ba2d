//! Tests for error module

use trackrec::{RecordingError, SessionState};

#[test]
fn test_invalid_transition_display() {
    let err = RecordingError::InvalidTransition {
        command: "lap",
        state: SessionState::Paused,
    };
    let msg = err.to_string();
    assert!(msg.contains("lap"));
    assert!(msg.contains("Paused"));
}

#[test]
fn test_io_error_wraps() {
    let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
    let err: RecordingError = io.into();
    assert!(matches!(err, RecordingError::Io(_)));
    assert!(err.to_string().contains("denied"));
}

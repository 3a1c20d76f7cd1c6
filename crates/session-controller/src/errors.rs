//! Session controller error types.
//!
//! Each error carries a [`Severity`] describing how the controller reacts:
//! only credential issuance and transport start are fatal to a join; most
//! runtime failures are logged and absorbed so that event delivery and
//! teardown always run to completion.

use thiserror::Error;

/// How a failure is handled by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Surfaced to the caller; the session never reaches `Active` and no
    /// automatic retry is attempted.
    FatalToJoin,
    /// Logged; implicitly retried by the next triggering event.
    Recoverable,
    /// Logged only; never blocks the rest of the operation it belongs to.
    BestEffort,
    /// Expected ordering race (e.g. unbind on a removed tile); a no-op.
    Ignorable,
}

/// Session controller error type.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Roster directory (backend) request failed.
    #[error("directory error: {0}")]
    Directory(String),

    /// Transport operation failed.
    #[error("transport error: {0}")]
    Transport(String),

    /// Join credentials were missing from the roster response.
    #[error("no join credentials issued")]
    MissingCredentials,

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Chat input rejected (empty or whitespace-only).
    #[error("chat message rejected: empty")]
    ChatRejected,

    /// Chat transmit failed or timed out; the local echo is kept.
    #[error("chat send failed: {0}")]
    ChatSend(String),

    /// Command issued against a session that is closing or closed.
    #[error("session is closed")]
    SessionClosed,

    /// Internal error (actor channel failures and similar).
    #[error("internal error: {0}")]
    Internal(String),
}

impl SessionError {
    /// Map this error to its handling policy.
    #[must_use]
    pub fn severity(&self) -> Severity {
        match self {
            SessionError::MissingCredentials | SessionError::Config(_) => Severity::FatalToJoin,
            // Directory failures are fatal during join (credential issuance)
            // and recoverable afterwards (roster refetch); callers in the
            // join path surface them, the refetch path logs and moves on.
            SessionError::Directory(_) | SessionError::Transport(_) => Severity::Recoverable,
            SessionError::ChatSend(_) => Severity::BestEffort,
            SessionError::ChatRejected | SessionError::SessionClosed => Severity::Ignorable,
            SessionError::Internal(_) => Severity::Recoverable,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_mapping() {
        assert_eq!(
            SessionError::MissingCredentials.severity(),
            Severity::FatalToJoin
        );
        assert_eq!(
            SessionError::Config("bad value".to_string()).severity(),
            Severity::FatalToJoin
        );
        assert_eq!(
            SessionError::Directory("503".to_string()).severity(),
            Severity::Recoverable
        );
        assert_eq!(
            SessionError::ChatSend("timeout".to_string()).severity(),
            Severity::BestEffort
        );
        assert_eq!(SessionError::ChatRejected.severity(), Severity::Ignorable);
        assert_eq!(SessionError::SessionClosed.severity(), Severity::Ignorable);
    }

    #[test]
    fn test_display_formatting() {
        assert_eq!(
            format!("{}", SessionError::Directory("roster fetch 500".to_string())),
            "directory error: roster fetch 500"
        );
        assert_eq!(
            format!("{}", SessionError::MissingCredentials),
            "no join credentials issued"
        );
        assert_eq!(
            format!("{}", SessionError::ChatRejected),
            "chat message rejected: empty"
        );
    }
}

//! Roster directory client interface.
//!
//! The backend directory is the source of truth for participant metadata.
//! Transport presence events only *trigger* refetches; the reconciler never
//! derives participant identity from them.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::SessionError;
use crate::transport::AttendeeId;

/// Identifies one joinable session at the backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionRef {
    pub session_id: String,
}

impl SessionRef {
    #[must_use]
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
        }
    }
}

impl std::fmt::Display for SessionRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.session_id)
    }
}

/// A roster entry: stable user identity plus profile metadata.
///
/// Immutable once fetched; liveness is derived from presence events by the
/// reconciler, not stored here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub user_id: String,
    pub display_name: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

/// Transport join credentials issued by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinCredentials {
    /// The local (self) attendee id for this session.
    pub attendee_id: AttendeeId,
    /// Opaque token the transport connector consumes.
    pub join_token: String,
}

/// Response of a roster fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterSnapshot {
    /// Present only on the initial join fetch for some backends; refetches
    /// may omit it.
    #[serde(default)]
    pub credentials: Option<JoinCredentials>,
    pub participants: Vec<Participant>,
}

/// Backend operations consumed by the lifecycle controller and reconciler.
#[async_trait]
pub trait RosterDirectory: Send + Sync {
    /// Turn the meeting into a joinable session. Idempotent at the backend.
    async fn start_session(&self, session: &SessionRef) -> Result<(), SessionError>;

    /// Register this caller as a participant of the session.
    async fn join_as_participant(&self, session: &SessionRef) -> Result<(), SessionError>;

    /// Fetch the authoritative roster snapshot (and, on join, credentials).
    async fn get_roster(&self, session: &SessionRef) -> Result<RosterSnapshot, SessionError>;

    /// Best-effort exit notification. Failure is logged by callers, never
    /// surfaced, and never blocks teardown.
    async fn notify_exit(&self, session: &SessionRef) -> Result<(), SessionError>;
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_roster_snapshot_deserializes_without_credentials() {
        let json = r#"{"participants":[{"user_id":"u1","display_name":"Ada"}]}"#;
        let snapshot: RosterSnapshot = serde_json::from_str(json).unwrap();
        assert!(snapshot.credentials.is_none());
        assert_eq!(snapshot.participants.len(), 1);
        assert_eq!(snapshot.participants[0].user_id, "u1");
        assert!(snapshot.participants[0].avatar_url.is_none());
    }

    #[test]
    fn test_roster_snapshot_with_credentials() {
        let json = r#"{
            "credentials": {"attendee_id": "att-self", "join_token": "tok"},
            "participants": []
        }"#;
        let snapshot: RosterSnapshot = serde_json::from_str(json).unwrap();
        let creds = snapshot.credentials.unwrap();
        assert_eq!(creds.attendee_id, "att-self");
        assert_eq!(creds.join_token, "tok");
    }
}

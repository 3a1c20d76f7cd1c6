//! Scriptable roster directory.
//!
//! Queues roster snapshots for successive `get_roster` calls (the last
//! queued snapshot repeats), counts every backend call, and supports
//! per-operation failure injection.

use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use session_controller::directory::{
    JoinCredentials, Participant, RosterDirectory, RosterSnapshot, SessionRef,
};
use session_controller::errors::SessionError;

/// In-memory [`RosterDirectory`] fake.
pub struct FakeDirectory {
    credentials: Mutex<Option<JoinCredentials>>,
    snapshots: Mutex<VecDeque<Vec<Participant>>>,
    last_roster: Mutex<Vec<Participant>>,
    fail_ops: Mutex<HashSet<String>>,
    start_calls: AtomicUsize,
    join_calls: AtomicUsize,
    roster_calls: AtomicUsize,
    exit_calls: AtomicUsize,
}

impl Default for FakeDirectory {
    fn default() -> Self {
        Self {
            credentials: Mutex::new(Some(JoinCredentials {
                attendee_id: "att-self".to_string(),
                join_token: "test-token".to_string(),
            })),
            snapshots: Mutex::new(VecDeque::new()),
            last_roster: Mutex::new(Vec::new()),
            fail_ops: Mutex::new(HashSet::new()),
            start_calls: AtomicUsize::new(0),
            join_calls: AtomicUsize::new(0),
            roster_calls: AtomicUsize::new(0),
            exit_calls: AtomicUsize::new(0),
        }
    }
}

impl FakeDirectory {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Override the credentials issued on the first roster fetch.
    pub fn set_credentials(&self, attendee_id: &str) {
        *self.credentials.lock().unwrap() = Some(JoinCredentials {
            attendee_id: attendee_id.to_string(),
            join_token: "test-token".to_string(),
        });
    }

    /// Script a roster response with no credentials at all.
    pub fn withhold_credentials(&self) {
        *self.credentials.lock().unwrap() = None;
    }

    /// Queue a roster for the next `get_roster` call. The last queued
    /// roster repeats once the queue is drained.
    pub fn push_roster(&self, participants: Vec<Participant>) {
        self.snapshots.lock().unwrap().push_back(participants);
    }

    /// Script the listed operation to fail. Operation names match the
    /// [`RosterDirectory`] method names.
    pub fn fail_on(&self, op: &str) {
        self.fail_ops.lock().unwrap().insert(op.to_string());
    }

    /// Stop failing the listed operation.
    pub fn recover(&self, op: &str) {
        self.fail_ops.lock().unwrap().remove(op);
    }

    pub fn start_session_calls(&self) -> usize {
        self.start_calls.load(Ordering::SeqCst)
    }

    pub fn join_calls(&self) -> usize {
        self.join_calls.load(Ordering::SeqCst)
    }

    pub fn roster_calls(&self) -> usize {
        self.roster_calls.load(Ordering::SeqCst)
    }

    pub fn exit_calls(&self) -> usize {
        self.exit_calls.load(Ordering::SeqCst)
    }

    fn check(&self, op: &str) -> Result<(), SessionError> {
        if self.fail_ops.lock().unwrap().contains(op) {
            Err(SessionError::Directory(format!("injected failure: {op}")))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl RosterDirectory for FakeDirectory {
    async fn start_session(&self, _session: &SessionRef) -> Result<(), SessionError> {
        self.start_calls.fetch_add(1, Ordering::SeqCst);
        self.check("start_session")
    }

    async fn join_as_participant(&self, _session: &SessionRef) -> Result<(), SessionError> {
        self.join_calls.fetch_add(1, Ordering::SeqCst);
        self.check("join_as_participant")
    }

    async fn get_roster(&self, _session: &SessionRef) -> Result<RosterSnapshot, SessionError> {
        let call = self.roster_calls.fetch_add(1, Ordering::SeqCst);
        self.check("get_roster")?;

        let participants = match self.snapshots.lock().unwrap().pop_front() {
            Some(next) => next,
            None => self.last_roster.lock().unwrap().clone(),
        };
        *self.last_roster.lock().unwrap() = participants.clone();

        // Credentials are issued only on the initial join fetch.
        let credentials = if call == 0 {
            self.credentials.lock().unwrap().clone()
        } else {
            None
        };

        Ok(RosterSnapshot {
            credentials,
            participants,
        })
    }

    async fn notify_exit(&self, _session: &SessionRef) -> Result<(), SessionError> {
        self.exit_calls.fetch_add(1, Ordering::SeqCst);
        self.check("notify_exit")
    }
}

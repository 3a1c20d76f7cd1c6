//! Presence & roster reconciler.
//!
//! Transport presence events are the *trigger* for roster refetches, not
//! the source of truth: participant identity and metadata always come from
//! the directory. The visible set is derived entirely from the most
//! recently completed fetch, never from an incremental ledger of events,
//! which makes reconciliation idempotent under duplicate or out-of-order
//! presence delivery and commutative with respect to fetch completion
//! order.
//!
//! Merge policy (no flicker, eventual removal): entries whose ids remain in
//! the new snapshot are kept in place with refreshed metadata; entries
//! absent from the snapshot are dropped; new ids are appended. An attendee
//! the UI still has a tile for is therefore never dropped before a refetch
//! actually stops reporting them.

use std::collections::HashSet;

use tracing::debug;

use crate::directory::Participant;
use crate::transport::AttendeeId;

/// Derives the visible participant set from presence triggers and completed
/// roster fetches.
pub struct RosterReconciler {
    self_attendee: AttendeeId,
    visible: Vec<Participant>,
    present: HashSet<AttendeeId>,
}

impl RosterReconciler {
    #[must_use]
    pub fn new(self_attendee: AttendeeId) -> Self {
        Self {
            self_attendee,
            visible: Vec::new(),
            present: HashSet::new(),
        }
    }

    /// Record a presence change. Returns whether a roster refetch should be
    /// triggered.
    ///
    /// The self attendee's presence-false is ignored entirely: it can occur
    /// transiently without meaning the session ended, and must drive
    /// neither the roster nor teardown.
    pub fn note_presence(&mut self, attendee_id: &AttendeeId, present: bool) -> bool {
        if !present && *attendee_id == self.self_attendee {
            debug!(
                target: "sc.roster",
                "ignoring self presence-false"
            );
            return false;
        }

        if present {
            self.present.insert(attendee_id.clone());
        } else {
            self.present.remove(attendee_id);
        }
        true
    }

    /// Apply a completed roster fetch.
    pub fn apply_snapshot(&mut self, snapshot: Vec<Participant>) {
        let incoming: HashSet<&str> = snapshot.iter().map(|p| p.user_id.as_str()).collect();

        let mut merged: Vec<Participant> = self
            .visible
            .iter()
            .filter(|p| incoming.contains(p.user_id.as_str()))
            .map(|prev| {
                // Refresh metadata from the snapshot while keeping order.
                snapshot
                    .iter()
                    .find(|n| n.user_id == prev.user_id)
                    .cloned()
                    .unwrap_or_else(|| prev.clone())
            })
            .collect();

        let kept: HashSet<&str> = merged.iter().map(|p| p.user_id.as_str()).collect();
        let mut appended: Vec<Participant> = snapshot
            .iter()
            .filter(|p| !kept.contains(p.user_id.as_str()))
            .cloned()
            .collect();
        merged.append(&mut appended);

        debug!(
            target: "sc.roster",
            visible = merged.len(),
            "applied roster snapshot"
        );
        self.visible = merged;
    }

    /// The reconciled, authoritative participant list.
    #[must_use]
    pub fn participants(&self) -> &[Participant] {
        &self.visible
    }

    /// Attendee ids with a presence-true more recent than any
    /// presence-false.
    #[must_use]
    pub fn present_attendees(&self) -> &HashSet<AttendeeId> {
        &self.present
    }

    #[must_use]
    pub fn is_present(&self, attendee_id: &AttendeeId) -> bool {
        self.present.contains(attendee_id)
    }
}

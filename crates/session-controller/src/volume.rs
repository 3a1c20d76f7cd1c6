//! Audio volume & mic state tracking.
//!
//! One volume-indicator subscription is held per present attendee; the
//! derived mic map carries `!muted` whenever the transport reports a
//! definite mute flag. Malformed (indeterminate) mute values are ignored.
//! Entries and subscriptions are dropped together when the attendee leaves
//! presence, so no callback can outlive its attendee.

use std::collections::HashMap;

use crate::events::Subscription;
use crate::transport::{AttendeeId, VolumeEvent};

/// Per-attendee mic state derived from volume-indicator events.
#[derive(Default)]
pub struct MicTracker {
    mic_states: HashMap<AttendeeId, bool>,
    subscriptions: HashMap<AttendeeId, Subscription>,
}

impl MicTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Hold the volume subscription for a newly-present attendee. A
    /// replacement (duplicate presence-true) cancels the previous one.
    pub fn track(&mut self, attendee_id: AttendeeId, subscription: Subscription) {
        self.subscriptions.insert(attendee_id, subscription);
    }

    /// Apply a volume-indicator update. Indeterminate mute flags are
    /// ignored rather than clearing known state.
    pub fn apply(&mut self, event: &VolumeEvent) {
        if let Some(muted) = event.muted {
            self.mic_states.insert(event.attendee_id.clone(), !muted);
        }
    }

    /// Drop the subscription and mic entry for a departed attendee.
    pub fn untrack(&mut self, attendee_id: &AttendeeId) {
        self.subscriptions.remove(attendee_id);
        self.mic_states.remove(attendee_id);
    }

    /// Force an attendee's mic state. Used for the local fail-safe default
    /// (muted on join until explicitly toggled on).
    pub fn set(&mut self, attendee_id: &AttendeeId, on: bool) {
        self.mic_states.insert(attendee_id.clone(), on);
    }

    #[must_use]
    pub fn mic_states(&self) -> &HashMap<AttendeeId, bool> {
        &self.mic_states
    }

    #[must_use]
    pub fn is_mic_on(&self, attendee_id: &AttendeeId) -> bool {
        self.mic_states.get(attendee_id).copied().unwrap_or(false)
    }

    #[must_use]
    pub fn tracked_count(&self) -> usize {
        self.subscriptions.len()
    }

    /// Release every held subscription (teardown).
    pub fn clear(&mut self) {
        self.subscriptions.clear();
        self.mic_states.clear();
    }
}

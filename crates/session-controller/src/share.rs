//! Content-share arbitration.
//!
//! Tracks which remote attendee (if any) currently owns the shared-content
//! tile. The local user's own share toggle is independent state owned by
//! the session actor; this type only guarantees a well-defined, singular
//! remote owner for rendering purposes.

use tracing::debug;

use crate::transport::{AttendeeId, TileId, TileUpdate};

/// Nullable remote content-share owner.
#[derive(Debug, Default)]
pub struct ContentShareArbitrator {
    owner: Option<(TileId, AttendeeId)>,
}

impl ContentShareArbitrator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a content tile update. Self-owned content tiles (the local
    /// share's echo) never become the remote owner.
    pub fn on_content_tile(&mut self, update: &TileUpdate, self_attendee: &AttendeeId) {
        if update.attendee_id == *self_attendee {
            return;
        }
        debug!(
            target: "sc.share",
            tile_id = update.tile_id,
            attendee_id = %update.attendee_id,
            "remote content share started"
        );
        self.owner = Some((update.tile_id, update.attendee_id.clone()));
    }

    /// Clear the owner if this tile carried the share.
    pub fn on_tile_removed(&mut self, tile_id: TileId) {
        if matches!(self.owner, Some((owned, _)) if owned == tile_id) {
            debug!(target: "sc.share", tile_id, "remote content share ended");
            self.owner = None;
        }
    }

    /// Clear the owner if this attendee left presence.
    pub fn on_presence_lost(&mut self, attendee_id: &AttendeeId) {
        if matches!(&self.owner, Some((_, owner)) if owner == attendee_id) {
            debug!(
                target: "sc.share",
                attendee_id = %attendee_id,
                "content share owner left"
            );
            self.owner = None;
        }
    }

    #[must_use]
    pub fn owner(&self) -> Option<&AttendeeId> {
        self.owner.as_ref().map(|(_, attendee)| attendee)
    }

    #[must_use]
    pub fn owned_tile(&self) -> Option<TileId> {
        self.owner.as_ref().map(|(tile_id, _)| *tile_id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn content_update(tile_id: TileId, attendee: &str) -> TileUpdate {
        TileUpdate {
            tile_id,
            attendee_id: attendee.to_string(),
            is_content: true,
            active: true,
            has_bound_stream: true,
        }
    }

    #[test]
    fn test_remote_owner_set_and_cleared_on_tile_removal() {
        let mut arb = ContentShareArbitrator::new();
        arb.on_content_tile(&content_update(9, "A"), &"att-self".to_string());
        assert_eq!(arb.owner(), Some(&"A".to_string()));
        assert_eq!(arb.owned_tile(), Some(9));

        arb.on_tile_removed(9);
        assert!(arb.owner().is_none());
    }

    #[test]
    fn test_unrelated_tile_removal_keeps_owner() {
        let mut arb = ContentShareArbitrator::new();
        arb.on_content_tile(&content_update(9, "A"), &"att-self".to_string());
        arb.on_tile_removed(4);
        assert_eq!(arb.owner(), Some(&"A".to_string()));
    }

    #[test]
    fn test_owner_cleared_on_presence_lost() {
        let mut arb = ContentShareArbitrator::new();
        arb.on_content_tile(&content_update(9, "A"), &"att-self".to_string());

        arb.on_presence_lost(&"B".to_string());
        assert_eq!(arb.owner(), Some(&"A".to_string()));

        arb.on_presence_lost(&"A".to_string());
        assert!(arb.owner().is_none());
    }

    #[test]
    fn test_self_content_tile_never_becomes_remote_owner() {
        let mut arb = ContentShareArbitrator::new();
        arb.on_content_tile(&content_update(2, "att-self"), &"att-self".to_string());
        assert!(arb.owner().is_none());
    }

    #[test]
    fn test_new_owner_replaces_previous() {
        let mut arb = ContentShareArbitrator::new();
        arb.on_content_tile(&content_update(1, "A"), &"att-self".to_string());
        arb.on_content_tile(&content_update(2, "B"), &"att-self".to_string());
        assert_eq!(arb.owner(), Some(&"B".to_string()));

        // Removing the stale tile does not clear the new owner.
        arb.on_tile_removed(1);
        assert_eq!(arb.owner(), Some(&"B".to_string()));
    }
}

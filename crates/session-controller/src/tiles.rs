//! Video tile manager.
//!
//! Tracks ephemeral tile-to-attendee bindings and per-attendee video-on
//! state. The tile map is a single owned arena keyed by `tileId`, mutated
//! only through [`TileManager::apply_update`] and [`TileManager::remove`];
//! nothing else aliases it. Tile ids may be reused by the transport after
//! removal, and a reused id is simply a new tile.

use std::collections::HashMap;

use tracing::debug;

use crate::transport::{AttendeeId, TileId, TileUpdate};

/// One live tile binding. Content tiles never land here; they are routed to
/// the content-share arbitrator instead of the gallery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileBinding {
    pub tile_id: TileId,
    pub attendee_id: AttendeeId,
}

/// Where a tile update was routed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileRouting {
    /// Inserted into (or already present in) the gallery tile map.
    Gallery,
    /// A content-share tile; the caller hands it to the arbitrator.
    Content,
}

/// Derived video-on state for one attendee given a tile update.
///
/// The self attendee's state is driven purely by the local toggle (the
/// local preview renders through a dedicated binding, not the gallery);
/// remote attendees are on when the tile is active or has a bound stream.
#[must_use]
pub fn video_on(update: &TileUpdate, is_self: bool, local_toggle: bool) -> bool {
    if is_self {
        local_toggle
    } else {
        update.active || update.has_bound_stream
    }
}

/// Owned mapping from tile id to binding, plus derived per-attendee video
/// state.
#[derive(Debug, Default)]
pub struct TileManager {
    tiles: HashMap<TileId, TileBinding>,
    video_states: HashMap<AttendeeId, bool>,
}

impl TileManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a tile-update event.
    ///
    /// Content tiles are routed to the caller untouched. Gallery inserts
    /// are idempotent: a second update for a live tile id only refreshes
    /// the attendee's video state.
    pub fn apply_update(
        &mut self,
        update: &TileUpdate,
        self_attendee: &AttendeeId,
        local_video_on: bool,
    ) -> TileRouting {
        if update.is_content {
            return TileRouting::Content;
        }

        self.tiles.entry(update.tile_id).or_insert_with(|| {
            debug!(
                target: "sc.tiles",
                tile_id = update.tile_id,
                attendee_id = %update.attendee_id,
                "tile bound"
            );
            TileBinding {
                tile_id: update.tile_id,
                attendee_id: update.attendee_id.clone(),
            }
        });

        let is_self = update.attendee_id == *self_attendee;
        self.video_states.insert(
            update.attendee_id.clone(),
            video_on(update, is_self, local_video_on),
        );

        TileRouting::Gallery
    }

    /// Apply a tile-removed event. Returns the attendee the tile belonged
    /// to, or `None` when the tile was unknown (removal races are no-ops).
    pub fn remove(&mut self, tile_id: TileId) -> Option<AttendeeId> {
        let binding = self.tiles.remove(&tile_id)?;
        let attendee_id = binding.attendee_id;

        let has_other_tile = self
            .tiles
            .values()
            .any(|t| t.attendee_id == attendee_id);
        if !has_other_tile {
            self.video_states.insert(attendee_id.clone(), false);
        }

        debug!(
            target: "sc.tiles",
            tile_id,
            attendee_id = %attendee_id,
            "tile removed"
        );
        Some(attendee_id)
    }

    /// Drop all state for an attendee that left presence.
    pub fn remove_attendee(&mut self, attendee_id: &AttendeeId) {
        self.tiles.retain(|_, t| t.attendee_id != *attendee_id);
        self.video_states.remove(attendee_id);
    }

    /// Force an attendee's video state (used for the local toggle).
    pub fn set_video_state(&mut self, attendee_id: &AttendeeId, on: bool) {
        self.video_states.insert(attendee_id.clone(), on);
    }

    #[must_use]
    pub fn contains(&self, tile_id: TileId) -> bool {
        self.tiles.contains_key(&tile_id)
    }

    /// Live bindings, ordered by tile id for stable presentation.
    #[must_use]
    pub fn bindings(&self) -> Vec<TileBinding> {
        let mut tiles: Vec<TileBinding> = self.tiles.values().cloned().collect();
        tiles.sort_by_key(|t| t.tile_id);
        tiles
    }

    #[must_use]
    pub fn video_states(&self) -> &HashMap<AttendeeId, bool> {
        &self.video_states
    }

    #[must_use]
    pub fn is_video_on(&self, attendee_id: &AttendeeId) -> bool {
        self.video_states.get(attendee_id).copied().unwrap_or(false)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn update(tile_id: TileId, attendee: &str) -> TileUpdate {
        TileUpdate {
            tile_id,
            attendee_id: attendee.to_string(),
            is_content: false,
            active: true,
            has_bound_stream: false,
        }
    }

    const SELF_ID: &str = "att-self";

    fn self_id() -> AttendeeId {
        SELF_ID.to_string()
    }

    #[test]
    fn test_tile_lifecycle_round_trip() {
        let mut tiles = TileManager::new();
        tiles.apply_update(&update(7, "A"), &self_id(), false);
        assert!(tiles.contains(7));
        assert!(tiles.is_video_on(&"A".to_string()));

        let removed = tiles.remove(7);
        assert_eq!(removed, Some("A".to_string()));
        assert!(!tiles.contains(7));
        assert_eq!(tiles.video_states().get("A"), Some(&false));
    }

    #[test]
    fn test_content_tile_routed_away_from_gallery() {
        let mut tiles = TileManager::new();
        let mut content = update(3, "B");
        content.is_content = true;

        let routing = tiles.apply_update(&content, &self_id(), false);
        assert_eq!(routing, TileRouting::Content);
        assert!(!tiles.contains(3));
        assert!(!tiles.is_video_on(&"B".to_string()));
    }

    #[test]
    fn test_duplicate_update_is_noop_insert() {
        let mut tiles = TileManager::new();
        tiles.apply_update(&update(1, "A"), &self_id(), false);
        tiles.apply_update(&update(1, "A"), &self_id(), false);
        assert_eq!(tiles.bindings().len(), 1);
    }

    #[test]
    fn test_remove_unknown_tile_is_noop() {
        let mut tiles = TileManager::new();
        assert_eq!(tiles.remove(99), None);
    }

    #[test]
    fn test_video_off_only_when_last_tile_removed() {
        let mut tiles = TileManager::new();
        tiles.apply_update(&update(1, "A"), &self_id(), false);
        tiles.apply_update(&update(2, "A"), &self_id(), false);

        tiles.remove(1);
        assert!(tiles.is_video_on(&"A".to_string()));

        tiles.remove(2);
        assert!(!tiles.is_video_on(&"A".to_string()));
    }

    #[test]
    fn test_self_video_follows_local_toggle() {
        let mut inactive = update(5, SELF_ID);
        inactive.active = false;
        inactive.has_bound_stream = false;

        assert!(video_on(&inactive, true, true));
        assert!(!video_on(&inactive, true, false));

        let mut tiles = TileManager::new();
        tiles.apply_update(&inactive, &self_id(), false);
        assert!(!tiles.is_video_on(&self_id()));
    }

    #[test]
    fn test_remote_video_from_active_or_stream() {
        let mut u = update(5, "A");
        u.active = false;
        u.has_bound_stream = false;
        assert!(!video_on(&u, false, false));

        u.active = true;
        assert!(video_on(&u, false, false));

        u.active = false;
        u.has_bound_stream = true;
        assert!(video_on(&u, false, false));
    }

    #[test]
    fn test_tile_id_reuse_is_new_tile() {
        let mut tiles = TileManager::new();
        tiles.apply_update(&update(4, "A"), &self_id(), false);
        tiles.remove(4);

        tiles.apply_update(&update(4, "B"), &self_id(), false);
        let bindings = tiles.bindings();
        assert_eq!(bindings.len(), 1);
        assert_eq!(bindings[0].attendee_id, "B");
    }

    #[test]
    fn test_remove_attendee_drops_tiles_and_state() {
        let mut tiles = TileManager::new();
        tiles.apply_update(&update(1, "A"), &self_id(), false);
        tiles.apply_update(&update(2, "B"), &self_id(), false);

        tiles.remove_attendee(&"A".to_string());
        assert!(!tiles.contains(1));
        assert!(tiles.contains(2));
        assert!(tiles.video_states().get("A").is_none());
    }
}

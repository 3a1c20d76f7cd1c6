//! Message types for the session actor mailbox.
//!
//! Everything that can change session state arrives here: transport
//! callbacks (forwarded by subscription handlers), completed roster
//! fetches (posted back by spawned fetch tasks), and presentation-layer
//! commands. The single mailbox serializes all of it, so no handler ever
//! observes partially-updated state.

use std::collections::HashMap;

use tokio::sync::oneshot;

use crate::chat::ChatMessage;
use crate::directory::Participant;
use crate::errors::SessionError;
use crate::lifecycle::ExitTrigger;
use crate::tiles::TileBinding;
use crate::transport::{
    AttendeeId, DataMessage, PresenceEvent, SurfaceId, TileId, TileRemoved, TileUpdate,
    VolumeEvent,
};

/// Session connection status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Joining,
    Active,
    Closing,
    Closed,
}

/// One mailbox entry.
pub enum SessionMessage {
    Event(SessionEvent),
    Command(SessionCommand),
}

/// Asynchronous inputs: transport events and fetch completions.
#[derive(Debug)]
pub enum SessionEvent {
    Presence(PresenceEvent),
    TileUpdated(TileUpdate),
    TileRemoved(TileRemoved),
    Volume(VolumeEvent),
    ChatReceived(DataMessage),
    RecordingStatus(DataMessage),
    /// A roster refetch completed (successfully or not).
    RosterFetched(Result<Vec<Participant>, SessionError>),
}

/// Presentation-layer commands.
pub enum SessionCommand {
    SendChat {
        text: String,
        respond_to: oneshot::Sender<Result<(), SessionError>>,
    },
    SetMicEnabled {
        on: bool,
        respond_to: oneshot::Sender<Result<(), SessionError>>,
    },
    SetVideoEnabled {
        on: bool,
        respond_to: oneshot::Sender<Result<(), SessionError>>,
    },
    SetContentShare {
        on: bool,
        respond_to: oneshot::Sender<Result<(), SessionError>>,
    },
    /// Bind a tile to a rendering surface once the surface exists. Safe to
    /// issue repeatedly or after the tile is gone.
    BindTile {
        tile_id: TileId,
        surface: SurfaceId,
    },
    UnbindTile {
        tile_id: TileId,
    },
    SetFocus {
        attendee_id: Option<AttendeeId>,
    },
    Snapshot {
        respond_to: oneshot::Sender<SessionSnapshot>,
    },
    Teardown {
        trigger: ExitTrigger,
        respond_to: Option<oneshot::Sender<()>>,
    },
}

/// Derived state published to the presentation layer.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub status: SessionStatus,
    pub self_attendee_id: AttendeeId,
    /// Reconciled, authoritative participant list.
    pub roster: Vec<Participant>,
    /// Live gallery tile bindings, ordered by tile id.
    pub tiles: Vec<TileBinding>,
    pub video_states: HashMap<AttendeeId, bool>,
    pub mic_states: HashMap<AttendeeId, bool>,
    pub messages: Vec<ChatMessage>,
    /// Remote attendee currently sharing content, if any.
    pub content_share_owner: Option<AttendeeId>,
    pub is_audio_on: bool,
    pub is_video_on: bool,
    pub is_sharing: bool,
    pub is_recording: bool,
    pub focused_attendee: Option<AttendeeId>,
}

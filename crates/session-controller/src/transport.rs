//! Transport adapter capability.
//!
//! Thin wrapper over the real-time transport, treated as an injected
//! interface. The controller never touches the underlying media engine;
//! everything it needs is expressed as capability methods and
//! [`EventSource`]-style subscriptions here.
//!
//! Wire protocol and media internals are out of scope; implementations
//! adapt a concrete SDK (or a fake) to this surface.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;

use crate::directory::JoinCredentials;
use crate::errors::SessionError;
use crate::events::Subscription;

/// Transport-level ephemeral identity of one connected participant.
pub type AttendeeId = String;

/// Ephemeral id of one renderable video (or content-share) stream.
///
/// Unique only while bound; the transport may reuse an id after removal,
/// and consumers must treat a reused id as a new tile.
pub type TileId = u32;

/// Media input device identifier.
pub type DeviceId = String;

/// Opaque handle to a rendering surface owned by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SurfaceId(pub String);

impl SurfaceId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

/// An attendee joined (`present == true`) or left the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresenceEvent {
    pub attendee_id: AttendeeId,
    pub present: bool,
}

/// A video tile was created or changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileUpdate {
    pub tile_id: TileId,
    pub attendee_id: AttendeeId,
    /// Content-share stream rather than a camera stream.
    pub is_content: bool,
    pub active: bool,
    pub has_bound_stream: bool,
}

/// A video tile was removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileRemoved {
    pub tile_id: TileId,
}

/// Volume indicator update for one attendee.
#[derive(Debug, Clone, PartialEq)]
pub struct VolumeEvent {
    pub attendee_id: AttendeeId,
    pub volume: f32,
    /// `None` when the transport reports an indeterminate mute state;
    /// consumers ignore those.
    pub muted: Option<bool>,
}

/// A payload received on the transport's data channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataMessage {
    pub topic: String,
    pub sender_id: AttendeeId,
    pub payload: Bytes,
}

/// A media input device reported by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaDevice {
    pub device_id: DeviceId,
    pub label: String,
}

/// Capability set the controller consumes from the real-time transport.
///
/// Unbind/stop calls against an already-removed tile or already-stopped
/// device are expected ordering races and must be treated as no-ops by
/// implementations.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Start the transport session (media connection).
    async fn start(&self) -> Result<(), SessionError>;

    /// Stop the transport session.
    async fn stop(&self) -> Result<(), SessionError>;

    /// Route session audio to the default output.
    async fn bind_audio_output(&self) -> Result<(), SessionError>;

    /// Stop the local camera tile, if any.
    async fn stop_local_video(&self) -> Result<(), SessionError>;

    /// Start publishing the local camera.
    async fn start_local_video(&self) -> Result<(), SessionError>;

    /// Bind a tile's stream to a rendering surface. Safe to call repeatedly
    /// or after the tile is gone.
    fn bind_video_surface(&self, tile_id: TileId, surface: &SurfaceId);

    /// Unbind a tile from its surface. No-op for unknown tiles.
    fn unbind_video_surface(&self, tile_id: TileId);

    async fn mute_local_audio(&self) -> Result<(), SessionError>;

    async fn unmute_local_audio(&self) -> Result<(), SessionError>;

    /// Subscribe to attendee presence changes.
    fn subscribe_presence(
        &self,
        handler: Box<dyn Fn(PresenceEvent) + Send + Sync>,
    ) -> Subscription;

    /// Subscribe to tile updates and removals.
    fn subscribe_tiles(
        &self,
        on_update: Box<dyn Fn(TileUpdate) + Send + Sync>,
        on_removed: Box<dyn Fn(TileRemoved) + Send + Sync>,
    ) -> (Subscription, Subscription);

    /// Subscribe to one attendee's volume indicator.
    fn subscribe_volume(
        &self,
        attendee_id: &AttendeeId,
        handler: Box<dyn Fn(VolumeEvent) + Send + Sync>,
    ) -> Subscription;

    /// Subscribe to data messages on a topic.
    fn subscribe_data_messages(
        &self,
        topic: &str,
        handler: Box<dyn Fn(DataMessage) + Send + Sync>,
    ) -> Subscription;

    /// Send a payload on a topic with a bounded timeout.
    async fn send_data_message(
        &self,
        topic: &str,
        payload: Bytes,
        timeout: Duration,
    ) -> Result<(), SessionError>;

    async fn start_content_share(&self) -> Result<(), SessionError>;

    async fn stop_content_share(&self) -> Result<(), SessionError>;

    async fn list_audio_inputs(&self) -> Result<Vec<MediaDevice>, SessionError>;

    async fn list_video_inputs(&self) -> Result<Vec<MediaDevice>, SessionError>;

    async fn start_audio_input(&self, device_id: &DeviceId) -> Result<(), SessionError>;

    async fn start_video_input(&self, device_id: &DeviceId) -> Result<(), SessionError>;

    /// Release the stream acquired for a device. No-op if already stopped.
    async fn stop_input_device(&self, device_id: &DeviceId) -> Result<(), SessionError>;
}

/// Builds a transport session from backend-issued join credentials.
///
/// A connect failure is fatal to the join; the controller surfaces it and
/// does not retry.
#[async_trait]
pub trait TransportConnector: Send + Sync {
    async fn connect(
        &self,
        credentials: &JoinCredentials,
    ) -> Result<Arc<dyn Transport>, SessionError>;
}

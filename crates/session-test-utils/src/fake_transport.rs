//! Scriptable in-memory transport.
//!
//! Records every capability call, lets tests emit events into the
//! controller's subscriptions, and supports per-operation failure
//! injection.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;

use session_controller::directory::JoinCredentials;
use session_controller::errors::SessionError;
use session_controller::events::{EventSource, Subscription};
use session_controller::transport::{
    AttendeeId, DataMessage, DeviceId, MediaDevice, PresenceEvent, SurfaceId, TileId,
    TileRemoved, TileUpdate, Transport, TransportConnector, VolumeEvent,
};

/// In-memory [`Transport`] fake.
///
/// Construct, script devices and failures, hand it to a [`FakeConnector`],
/// then drive events with the `emit_*` methods and assert on recorded
/// calls.
#[derive(Default)]
pub struct FakeTransport {
    calls: Mutex<Vec<String>>,
    fail_ops: Mutex<HashSet<String>>,
    presence: EventSource<PresenceEvent>,
    tile_updates: EventSource<TileUpdate>,
    tile_removals: EventSource<TileRemoved>,
    volume_sources: Mutex<HashMap<AttendeeId, EventSource<VolumeEvent>>>,
    data_sources: Mutex<HashMap<String, EventSource<DataMessage>>>,
    sent_messages: Mutex<Vec<(String, Bytes)>>,
    bound_surfaces: Mutex<HashMap<TileId, SurfaceId>>,
    audio_inputs: Mutex<Vec<MediaDevice>>,
    video_inputs: Mutex<Vec<MediaDevice>>,
    started_inputs: Mutex<Vec<DeviceId>>,
    stopped_devices: Mutex<Vec<DeviceId>>,
}

impl FakeTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Script the listed operation to fail. Operation names match the
    /// [`Transport`] method names.
    pub fn fail_on(&self, op: &str) {
        self.fail_ops.lock().unwrap().insert(op.to_string());
    }

    /// Stop failing the listed operation.
    pub fn recover(&self, op: &str) {
        self.fail_ops.lock().unwrap().remove(op);
    }

    /// Script the audio input devices returned by enumeration.
    pub fn set_audio_inputs(&self, devices: Vec<MediaDevice>) {
        *self.audio_inputs.lock().unwrap() = devices;
    }

    /// Script the video input devices returned by enumeration.
    pub fn set_video_inputs(&self, devices: Vec<MediaDevice>) {
        *self.video_inputs.lock().unwrap() = devices;
    }

    /// Emit a presence event into the controller's subscription.
    pub fn emit_presence(&self, attendee_id: &str, present: bool) {
        self.presence.emit(PresenceEvent {
            attendee_id: attendee_id.to_string(),
            present,
        });
    }

    pub fn emit_tile_update(&self, update: TileUpdate) {
        self.tile_updates.emit(update);
    }

    pub fn emit_tile_removed(&self, tile_id: TileId) {
        self.tile_removals.emit(TileRemoved { tile_id });
    }

    /// Emit a volume event to the subscriber for one attendee, if any.
    pub fn emit_volume(&self, attendee_id: &str, volume: f32, muted: Option<bool>) {
        let source = self
            .volume_sources
            .lock()
            .unwrap()
            .get(attendee_id)
            .cloned();
        if let Some(source) = source {
            source.emit(VolumeEvent {
                attendee_id: attendee_id.to_string(),
                volume,
                muted,
            });
        }
    }

    /// Emit a data message to the subscribers of its topic, if any.
    pub fn emit_data(&self, topic: &str, sender_id: &str, payload: &[u8]) {
        let source = self.data_sources.lock().unwrap().get(topic).cloned();
        if let Some(source) = source {
            source.emit(DataMessage {
                topic: topic.to_string(),
                sender_id: sender_id.to_string(),
                payload: Bytes::copy_from_slice(payload),
            });
        }
    }

    /// All recorded capability calls, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of recorded calls to one operation.
    pub fn call_count(&self, op: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| *c == op).count()
    }

    /// Payloads sent on a topic.
    pub fn sent_on(&self, topic: &str) -> Vec<Bytes> {
        self.sent_messages
            .lock()
            .unwrap()
            .iter()
            .filter(|(t, _)| t == topic)
            .map(|(_, payload)| payload.clone())
            .collect()
    }

    /// Currently bound tile surfaces.
    pub fn bound_surfaces(&self) -> HashMap<TileId, SurfaceId> {
        self.bound_surfaces.lock().unwrap().clone()
    }

    /// Devices started via `start_audio_input` / `start_video_input`.
    pub fn started_inputs(&self) -> Vec<DeviceId> {
        self.started_inputs.lock().unwrap().clone()
    }

    /// Devices whose streams were released via `stop_input_device`.
    pub fn stopped_devices(&self) -> Vec<DeviceId> {
        self.stopped_devices.lock().unwrap().clone()
    }

    pub fn volume_subscriber_count(&self, attendee_id: &str) -> usize {
        self.volume_sources
            .lock()
            .unwrap()
            .get(attendee_id)
            .map_or(0, EventSource::subscriber_count)
    }

    fn record(&self, op: &str) -> Result<(), SessionError> {
        self.calls.lock().unwrap().push(op.to_string());
        if self.fail_ops.lock().unwrap().contains(op) {
            Err(SessionError::Transport(format!("injected failure: {op}")))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn start(&self) -> Result<(), SessionError> {
        self.record("start")
    }

    async fn stop(&self) -> Result<(), SessionError> {
        self.record("stop")
    }

    async fn bind_audio_output(&self) -> Result<(), SessionError> {
        self.record("bind_audio_output")
    }

    async fn stop_local_video(&self) -> Result<(), SessionError> {
        self.record("stop_local_video")
    }

    async fn start_local_video(&self) -> Result<(), SessionError> {
        self.record("start_local_video")
    }

    fn bind_video_surface(&self, tile_id: TileId, surface: &SurfaceId) {
        let _ = self.record("bind_video_surface");
        self.bound_surfaces
            .lock()
            .unwrap()
            .insert(tile_id, surface.clone());
    }

    fn unbind_video_surface(&self, tile_id: TileId) {
        let _ = self.record("unbind_video_surface");
        self.bound_surfaces.lock().unwrap().remove(&tile_id);
    }

    async fn mute_local_audio(&self) -> Result<(), SessionError> {
        self.record("mute_local_audio")
    }

    async fn unmute_local_audio(&self) -> Result<(), SessionError> {
        self.record("unmute_local_audio")
    }

    fn subscribe_presence(
        &self,
        handler: Box<dyn Fn(PresenceEvent) + Send + Sync>,
    ) -> Subscription {
        self.presence.subscribe(move |e| handler(e))
    }

    fn subscribe_tiles(
        &self,
        on_update: Box<dyn Fn(TileUpdate) + Send + Sync>,
        on_removed: Box<dyn Fn(TileRemoved) + Send + Sync>,
    ) -> (Subscription, Subscription) {
        (
            self.tile_updates.subscribe(move |e| on_update(e)),
            self.tile_removals.subscribe(move |e| on_removed(e)),
        )
    }

    fn subscribe_volume(
        &self,
        attendee_id: &AttendeeId,
        handler: Box<dyn Fn(VolumeEvent) + Send + Sync>,
    ) -> Subscription {
        self.volume_sources
            .lock()
            .unwrap()
            .entry(attendee_id.clone())
            .or_default()
            .subscribe(move |e| handler(e))
    }

    fn subscribe_data_messages(
        &self,
        topic: &str,
        handler: Box<dyn Fn(DataMessage) + Send + Sync>,
    ) -> Subscription {
        self.data_sources
            .lock()
            .unwrap()
            .entry(topic.to_string())
            .or_default()
            .subscribe(move |e| handler(e))
    }

    async fn send_data_message(
        &self,
        topic: &str,
        payload: Bytes,
        _timeout: Duration,
    ) -> Result<(), SessionError> {
        self.record("send_data_message")?;
        self.sent_messages
            .lock()
            .unwrap()
            .push((topic.to_string(), payload));
        Ok(())
    }

    async fn start_content_share(&self) -> Result<(), SessionError> {
        self.record("start_content_share")
    }

    async fn stop_content_share(&self) -> Result<(), SessionError> {
        self.record("stop_content_share")
    }

    async fn list_audio_inputs(&self) -> Result<Vec<MediaDevice>, SessionError> {
        self.record("list_audio_inputs")?;
        Ok(self.audio_inputs.lock().unwrap().clone())
    }

    async fn list_video_inputs(&self) -> Result<Vec<MediaDevice>, SessionError> {
        self.record("list_video_inputs")?;
        Ok(self.video_inputs.lock().unwrap().clone())
    }

    async fn start_audio_input(&self, device_id: &DeviceId) -> Result<(), SessionError> {
        self.record("start_audio_input")?;
        self.started_inputs.lock().unwrap().push(device_id.clone());
        Ok(())
    }

    async fn start_video_input(&self, device_id: &DeviceId) -> Result<(), SessionError> {
        self.record("start_video_input")?;
        self.started_inputs.lock().unwrap().push(device_id.clone());
        Ok(())
    }

    async fn stop_input_device(&self, device_id: &DeviceId) -> Result<(), SessionError> {
        self.record("stop_input_device")?;
        self.stopped_devices.lock().unwrap().push(device_id.clone());
        Ok(())
    }
}

/// [`TransportConnector`] returning a pre-built [`FakeTransport`].
pub struct FakeConnector {
    transport: Arc<FakeTransport>,
    fail: Mutex<bool>,
    connected_with: Mutex<Vec<JoinCredentials>>,
}

impl FakeConnector {
    pub fn new(transport: Arc<FakeTransport>) -> Arc<Self> {
        Arc::new(Self {
            transport,
            fail: Mutex::new(false),
            connected_with: Mutex::new(Vec::new()),
        })
    }

    /// Script the next connect to fail.
    pub fn fail_connect(&self) {
        *self.fail.lock().unwrap() = true;
    }

    /// Credentials each connect was called with.
    pub fn connected_with(&self) -> Vec<JoinCredentials> {
        self.connected_with.lock().unwrap().clone()
    }
}

#[async_trait]
impl TransportConnector for FakeConnector {
    async fn connect(
        &self,
        credentials: &JoinCredentials,
    ) -> Result<Arc<dyn Transport>, SessionError> {
        self.connected_with.lock().unwrap().push(credentials.clone());
        if *self.fail.lock().unwrap() {
            return Err(SessionError::Transport(
                "injected failure: connect".to_string(),
            ));
        }
        Ok(Arc::clone(&self.transport) as Arc<dyn Transport>)
    }
}

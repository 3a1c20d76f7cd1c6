//! `SessionActor` - the session lifecycle controller.
//!
//! One actor per live session. It owns every piece of mutable session
//! state (roster, tiles, content-share owner, mic map, chat log) and the
//! exclusively-held resources (transport session, acquired device
//! streams). All inputs are serialized through a single mailbox, so
//! interleaved transport callbacks and user commands can never observe
//! partial updates.
//!
//! # Teardown
//!
//! Three independent host signals (explicit close, back navigation,
//! unload) plus explicit [`SessionHandle::teardown`] calls all funnel into
//! the same release sequence, guarded by a consumed flag: stop the local
//! video tile, stop the transport, best-effort release every acquired
//! device stream, then best-effort notify the backend. The sequence runs
//! exactly once per session regardless of how many triggers fire.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use super::messages::{
    SessionCommand, SessionEvent, SessionMessage, SessionSnapshot, SessionStatus,
};
use crate::chat::{self, ChatLog, ChatMessage};
use crate::config::Config;
use crate::directory::{RosterDirectory, SessionRef};
use crate::errors::SessionError;
use crate::events::{EventSource, Subscription};
use crate::lifecycle::{ExitTrigger, LifecycleHost};
use crate::roster::RosterReconciler;
use crate::share::ContentShareArbitrator;
use crate::tiles::{TileManager, TileRouting};
use crate::transport::{
    AttendeeId, DataMessage, PresenceEvent, SurfaceId, TileId, TileRemoved, TileUpdate,
    Transport, TransportConnector, VolumeEvent,
};
use crate::volume::MicTracker;

/// Injected collaborators for one session.
pub struct SessionDeps {
    pub directory: Arc<dyn RosterDirectory>,
    pub connector: Arc<dyn TransportConnector>,
    pub host: Arc<dyn LifecycleHost>,
}

/// Handle to a running [`SessionActor`].
#[derive(Clone)]
pub struct SessionHandle {
    sender: mpsc::Sender<SessionMessage>,
    cancel_token: CancellationToken,
    session_ref: SessionRef,
    self_attendee_id: AttendeeId,
    chat_cue: EventSource<ChatMessage>,
}

impl SessionHandle {
    /// The session this handle controls.
    #[must_use]
    pub fn session_ref(&self) -> &SessionRef {
        &self.session_ref
    }

    /// The local attendee id issued at join.
    #[must_use]
    pub fn self_attendee_id(&self) -> &AttendeeId {
        &self.self_attendee_id
    }

    /// Send a chat message. Empty/whitespace-only input is rejected; a
    /// transmit failure is returned (and logged) but the local echo is
    /// kept.
    pub async fn send_chat(&self, text: impl Into<String>) -> Result<(), SessionError> {
        let (tx, rx) = oneshot::channel();
        self.command(SessionCommand::SendChat {
            text: text.into(),
            respond_to: tx,
        })
        .await?;
        rx.await.map_err(|_| SessionError::SessionClosed)?
    }

    /// Toggle the local microphone.
    pub async fn set_mic_enabled(&self, on: bool) -> Result<(), SessionError> {
        let (tx, rx) = oneshot::channel();
        self.command(SessionCommand::SetMicEnabled { on, respond_to: tx })
            .await?;
        rx.await.map_err(|_| SessionError::SessionClosed)?
    }

    /// Toggle the local camera.
    pub async fn set_video_enabled(&self, on: bool) -> Result<(), SessionError> {
        let (tx, rx) = oneshot::channel();
        self.command(SessionCommand::SetVideoEnabled { on, respond_to: tx })
            .await?;
        rx.await.map_err(|_| SessionError::SessionClosed)?
    }

    /// Toggle the local content share. Independent of any remote owner.
    pub async fn set_content_share(&self, on: bool) -> Result<(), SessionError> {
        let (tx, rx) = oneshot::channel();
        self.command(SessionCommand::SetContentShare { on, respond_to: tx })
            .await?;
        rx.await.map_err(|_| SessionError::SessionClosed)?
    }

    /// Bind a tile to a rendering surface. Race-tolerant: a stale tile id
    /// is a no-op.
    pub async fn bind_tile(&self, tile_id: TileId, surface: SurfaceId) -> Result<(), SessionError> {
        self.command(SessionCommand::BindTile { tile_id, surface })
            .await
    }

    /// Unbind a tile from its surface. No-op for unknown tiles.
    pub async fn unbind_tile(&self, tile_id: TileId) -> Result<(), SessionError> {
        self.command(SessionCommand::UnbindTile { tile_id }).await
    }

    /// Set or clear the focused attendee.
    pub async fn set_focus(&self, attendee_id: Option<AttendeeId>) -> Result<(), SessionError> {
        self.command(SessionCommand::SetFocus { attendee_id }).await
    }

    /// Current derived state for the presentation layer.
    pub async fn snapshot(&self) -> Result<SessionSnapshot, SessionError> {
        let (tx, rx) = oneshot::channel();
        self.command(SessionCommand::Snapshot { respond_to: tx })
            .await?;
        rx.await.map_err(|_| SessionError::SessionClosed)
    }

    /// Tear the session down. Idempotent: repeated calls (or calls racing
    /// a host exit trigger) succeed without repeating the release
    /// sequence.
    pub async fn teardown(&self) -> Result<(), SessionError> {
        let (tx, rx) = oneshot::channel();
        let sent = self
            .sender
            .send(SessionMessage::Command(SessionCommand::Teardown {
                trigger: ExitTrigger::CloseRequested,
                respond_to: Some(tx),
            }))
            .await;
        if sent.is_err() {
            // Actor already gone: teardown has run.
            return Ok(());
        }
        // A dropped responder likewise means teardown completed.
        let _ = rx.await;
        Ok(())
    }

    /// Notification cue for received chat messages.
    pub fn subscribe_chat_cue<F>(&self, handler: F) -> Subscription
    where
        F: Fn(ChatMessage) + Send + Sync + 'static,
    {
        self.chat_cue.subscribe(handler)
    }

    /// Resolves once the session is fully closed.
    pub async fn closed(&self) {
        self.cancel_token.cancelled().await;
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.cancel_token.is_cancelled()
    }

    async fn command(&self, command: SessionCommand) -> Result<(), SessionError> {
        self.sender
            .send(SessionMessage::Command(command))
            .await
            .map_err(|_| SessionError::SessionClosed)
    }
}

/// The `SessionActor` implementation.
pub struct SessionActor {
    session_ref: SessionRef,
    self_attendee: AttendeeId,
    receiver: mpsc::Receiver<SessionMessage>,
    /// Clone of the mailbox sender, handed to subscription handlers and
    /// refetch tasks.
    sender: mpsc::Sender<SessionMessage>,
    cancel_token: CancellationToken,
    config: Config,
    directory: Arc<dyn RosterDirectory>,
    transport: Arc<dyn Transport>,
    status: SessionStatus,
    roster: RosterReconciler,
    tiles: TileManager,
    share: ContentShareArbitrator,
    mic: MicTracker,
    chat: ChatLog,
    /// Held transport/host subscriptions; dropping them unregisters every
    /// callback so nothing fires after disposal.
    subscriptions: Vec<Subscription>,
    local_audio_on: bool,
    local_video_on: bool,
    is_sharing: bool,
    is_recording: bool,
    focused_attendee: Option<AttendeeId>,
    teardown_done: bool,
}

impl SessionActor {
    /// Join a session and spawn its actor.
    ///
    /// The join sequence: ask the backend to start the session, register
    /// as a participant, fetch the roster snapshot (which must carry join
    /// credentials), connect the transport, bind audio output, start the
    /// first available audio input, mute the local mic (fail-safe
    /// default), and start the transport connection. Credential issuance
    /// and transport start failures are fatal and surfaced; device setup
    /// failures are logged and absorbed.
    pub async fn join(
        session_ref: SessionRef,
        deps: SessionDeps,
        config: Config,
    ) -> Result<(SessionHandle, JoinHandle<()>), SessionError> {
        let SessionDeps {
            directory,
            connector,
            host,
        } = deps;

        directory.start_session(&session_ref).await?;
        directory.join_as_participant(&session_ref).await?;

        let snapshot = directory.get_roster(&session_ref).await?;
        let credentials = snapshot
            .credentials
            .clone()
            .ok_or(SessionError::MissingCredentials)?;
        let self_attendee = credentials.attendee_id.clone();

        let transport = connector.connect(&credentials).await?;

        if let Err(error) = transport.bind_audio_output().await {
            warn!(
                target: "sc.actor.session",
                session_id = %session_ref,
                %error,
                "failed to bind audio output"
            );
        }

        Self::start_audio_input(transport.as_ref(), &config).await;

        // Fail-safe default: never join hot-mic.
        if let Err(error) = transport.mute_local_audio().await {
            warn!(
                target: "sc.actor.session",
                session_id = %session_ref,
                %error,
                "failed to apply initial mute"
            );
        }

        if let Err(error) = transport.start().await {
            // Release anything acquired before the failed start; there is
            // no actor yet to do it.
            release_input_streams(transport.as_ref(), &session_ref).await;
            return Err(error);
        }

        let (sender, receiver) = mpsc::channel(config.mailbox_buffer);
        let cancel_token = CancellationToken::new();

        let mut roster = RosterReconciler::new(self_attendee.clone());
        roster.apply_snapshot(snapshot.participants);

        let mut mic = MicTracker::new();
        mic.set(&self_attendee, false);

        let chat = ChatLog::new();
        let chat_cue = chat.incoming_source();

        let mut actor = Self {
            session_ref: session_ref.clone(),
            self_attendee: self_attendee.clone(),
            receiver,
            sender: sender.clone(),
            cancel_token: cancel_token.clone(),
            config,
            directory,
            transport,
            status: SessionStatus::Joining,
            roster,
            tiles: TileManager::new(),
            share: ContentShareArbitrator::new(),
            mic,
            chat,
            subscriptions: Vec::new(),
            local_audio_on: false,
            local_video_on: false,
            is_sharing: false,
            is_recording: false,
            focused_attendee: None,
            teardown_done: false,
        };

        actor.wire_subscriptions(host.as_ref());

        let task_handle = tokio::spawn(actor.run());

        let handle = SessionHandle {
            sender,
            cancel_token,
            session_ref,
            self_attendee_id: self_attendee,
            chat_cue,
        };

        Ok((handle, task_handle))
    }

    /// Discover and start an audio input. Non-fatal: a session without a
    /// working input still joins, muted.
    async fn start_audio_input(transport: &dyn Transport, config: &Config) {
        let devices = match transport.list_audio_inputs().await {
            Ok(devices) => devices,
            Err(error) => {
                warn!(
                    target: "sc.actor.session",
                    %error,
                    "audio input enumeration failed"
                );
                return;
            }
        };

        let chosen = config
            .preferred_audio_input
            .as_ref()
            .filter(|wanted| devices.iter().any(|d| d.device_id == **wanted))
            .cloned()
            .or_else(|| devices.first().map(|d| d.device_id.clone()));

        match chosen {
            Some(device_id) => {
                if let Err(error) = transport.start_audio_input(&device_id).await {
                    warn!(
                        target: "sc.actor.session",
                        device_id = %device_id,
                        %error,
                        "failed to start audio input"
                    );
                }
            }
            None => {
                warn!(
                    target: "sc.actor.session",
                    "no audio input device available"
                );
            }
        }
    }

    /// Register every transport/host subscription, forwarding into the
    /// mailbox. Handlers never block and never propagate errors; a full
    /// mailbox defers delivery (see [`forward`]), and a full mailbox on an
    /// exit trigger falls back to token cancellation.
    fn wire_subscriptions(&mut self, host: &dyn LifecycleHost) {
        let tx = self.sender.clone();
        self.subscriptions.push(self.transport.subscribe_presence(Box::new(
            move |event: PresenceEvent| {
                forward(&tx, SessionEvent::Presence(event));
            },
        )));

        let tx_update = self.sender.clone();
        let tx_removed = self.sender.clone();
        let (updates, removals) = self.transport.subscribe_tiles(
            Box::new(move |event: TileUpdate| {
                forward(&tx_update, SessionEvent::TileUpdated(event));
            }),
            Box::new(move |event: TileRemoved| {
                forward(&tx_removed, SessionEvent::TileRemoved(event));
            }),
        );
        self.subscriptions.push(updates);
        self.subscriptions.push(removals);

        let tx = self.sender.clone();
        self.subscriptions.push(self.transport.subscribe_data_messages(
            &self.config.chat_topic,
            Box::new(move |message: DataMessage| {
                forward(&tx, SessionEvent::ChatReceived(message));
            }),
        ));

        let tx = self.sender.clone();
        self.subscriptions.push(self.transport.subscribe_data_messages(
            &self.config.recording_topic,
            Box::new(move |message: DataMessage| {
                forward(&tx, SessionEvent::RecordingStatus(message));
            }),
        ));

        let tx = self.sender.clone();
        let cancel = self.cancel_token.clone();
        self.subscriptions
            .push(host.on_exit_requested(Box::new(move |trigger| {
                let message = SessionMessage::Command(SessionCommand::Teardown {
                    trigger,
                    respond_to: None,
                });
                // An exit trigger must never be lost: if the mailbox is
                // full (or already closed) fall back to cancellation,
                // which the run loop funnels into the same teardown.
                if tx.try_send(message).is_err() {
                    cancel.cancel();
                }
            })));
    }

    /// Run the actor message loop.
    #[instrument(skip_all, name = "sc.actor.session", fields(session_id = %self.session_ref))]
    async fn run(mut self) {
        self.status = SessionStatus::Active;
        info!(
            target: "sc.actor.session",
            session_id = %self.session_ref,
            self_attendee = %self.self_attendee,
            "session active"
        );

        loop {
            tokio::select! {
                () = self.cancel_token.cancelled() => {
                    self.teardown(None).await;
                    break;
                }

                msg = self.receiver.recv() => {
                    match msg {
                        Some(message) => {
                            if self.handle_message(message).await {
                                break;
                            }
                        }
                        None => {
                            self.teardown(None).await;
                            break;
                        }
                    }
                }
            }
        }

        info!(
            target: "sc.actor.session",
            session_id = %self.session_ref,
            messages = self.chat.messages().len(),
            "session closed"
        );
    }

    /// Handle a single message. Returns true if the actor should exit.
    async fn handle_message(&mut self, message: SessionMessage) -> bool {
        match message {
            SessionMessage::Event(event) => {
                self.handle_event(event);
                false
            }
            SessionMessage::Command(command) => self.handle_command(command).await,
        }
    }

    fn handle_event(&mut self, event: SessionEvent) {
        if self.status != SessionStatus::Active {
            return;
        }
        match event {
            SessionEvent::Presence(event) => self.handle_presence(event),
            SessionEvent::TileUpdated(update) => self.handle_tile_update(&update),
            SessionEvent::TileRemoved(removed) => self.handle_tile_removed(removed),
            SessionEvent::Volume(event) => self.mic.apply(&event),
            SessionEvent::ChatReceived(message) => {
                self.chat.append_remote(message.sender_id, &message.payload);
            }
            SessionEvent::RecordingStatus(message) => self.handle_recording(&message),
            SessionEvent::RosterFetched(result) => match result {
                Ok(participants) => self.roster.apply_snapshot(participants),
                Err(error) => {
                    // Recoverable: the next presence event refetches.
                    warn!(
                        target: "sc.actor.session",
                        session_id = %self.session_ref,
                        %error,
                        "roster refetch failed"
                    );
                }
            },
        }
    }

    /// Returns true if the actor should exit.
    async fn handle_command(&mut self, command: SessionCommand) -> bool {
        match command {
            SessionCommand::SendChat { text, respond_to } => {
                let result = self.handle_send_chat(text).await;
                let _ = respond_to.send(result);
                false
            }
            SessionCommand::SetMicEnabled { on, respond_to } => {
                let result = self.handle_set_mic(on).await;
                let _ = respond_to.send(result);
                false
            }
            SessionCommand::SetVideoEnabled { on, respond_to } => {
                let result = self.handle_set_video(on).await;
                let _ = respond_to.send(result);
                false
            }
            SessionCommand::SetContentShare { on, respond_to } => {
                let result = self.handle_set_share(on).await;
                let _ = respond_to.send(result);
                false
            }
            SessionCommand::BindTile { tile_id, surface } => {
                self.handle_bind_tile(tile_id, &surface);
                false
            }
            SessionCommand::UnbindTile { tile_id } => {
                // Ignorable by contract, even for unknown tiles.
                self.transport.unbind_video_surface(tile_id);
                false
            }
            SessionCommand::SetFocus { attendee_id } => {
                self.focused_attendee = attendee_id;
                false
            }
            SessionCommand::Snapshot { respond_to } => {
                let _ = respond_to.send(self.snapshot());
                false
            }
            SessionCommand::Teardown {
                trigger,
                respond_to,
            } => {
                self.teardown(Some(trigger)).await;
                if let Some(respond_to) = respond_to {
                    let _ = respond_to.send(());
                }
                true
            }
        }
    }

    fn handle_presence(&mut self, event: PresenceEvent) {
        if !self.roster.note_presence(&event.attendee_id, event.present) {
            return;
        }

        if event.present {
            let tx = self.sender.clone();
            let subscription = self.transport.subscribe_volume(
                &event.attendee_id,
                Box::new(move |volume: VolumeEvent| {
                    forward(&tx, SessionEvent::Volume(volume));
                }),
            );
            self.mic.track(event.attendee_id.clone(), subscription);
        } else {
            self.mic.untrack(&event.attendee_id);
            self.tiles.remove_attendee(&event.attendee_id);
            self.share.on_presence_lost(&event.attendee_id);
        }

        // Presence is only the trigger; metadata comes from the refetch.
        self.spawn_roster_refetch();
    }

    fn spawn_roster_refetch(&self) {
        let directory = Arc::clone(&self.directory);
        let session_ref = self.session_ref.clone();
        let tx = self.sender.clone();
        tokio::spawn(async move {
            let result = directory
                .get_roster(&session_ref)
                .await
                .map(|snapshot| snapshot.participants);
            let _ = tx
                .send(SessionMessage::Event(SessionEvent::RosterFetched(result)))
                .await;
        });
    }

    fn handle_tile_update(&mut self, update: &TileUpdate) {
        match self
            .tiles
            .apply_update(update, &self.self_attendee, self.local_video_on)
        {
            TileRouting::Content => self.share.on_content_tile(update, &self.self_attendee),
            TileRouting::Gallery => {}
        }
    }

    fn handle_tile_removed(&mut self, removed: TileRemoved) {
        let was_share = self.share.owned_tile() == Some(removed.tile_id);
        self.share.on_tile_removed(removed.tile_id);
        if self.tiles.remove(removed.tile_id).is_some() || was_share {
            self.transport.unbind_video_surface(removed.tile_id);
        }
    }

    fn handle_recording(&mut self, message: &DataMessage) {
        match message.payload.as_ref() {
            b"start" => self.is_recording = true,
            b"stop" => self.is_recording = false,
            other => {
                debug!(
                    target: "sc.actor.session",
                    session_id = %self.session_ref,
                    payload_len = other.len(),
                    "ignoring malformed recording status"
                );
            }
        }
    }

    async fn handle_send_chat(&mut self, text: String) -> Result<(), SessionError> {
        if self.status != SessionStatus::Active {
            return Err(SessionError::SessionClosed);
        }
        let Some(normalized) = chat::normalize(&text) else {
            return Err(SessionError::ChatRejected);
        };

        // Optimistic local echo; kept even if the transmit fails.
        self.chat
            .append_local(&self.self_attendee, normalized.clone());

        let payload = bytes::Bytes::from(normalized.into_bytes());
        if let Err(error) = self
            .transport
            .send_data_message(&self.config.chat_topic, payload, self.config.chat_send_timeout)
            .await
        {
            warn!(
                target: "sc.actor.session",
                session_id = %self.session_ref,
                %error,
                "chat send failed"
            );
            return Err(SessionError::ChatSend(error.to_string()));
        }
        Ok(())
    }

    async fn handle_set_mic(&mut self, on: bool) -> Result<(), SessionError> {
        if self.status != SessionStatus::Active {
            return Err(SessionError::SessionClosed);
        }
        if on {
            self.transport.unmute_local_audio().await?;
        } else {
            self.transport.mute_local_audio().await?;
        }
        self.local_audio_on = on;
        self.mic.set(&self.self_attendee, on);
        Ok(())
    }

    async fn handle_set_video(&mut self, on: bool) -> Result<(), SessionError> {
        if self.status != SessionStatus::Active {
            return Err(SessionError::SessionClosed);
        }
        if on {
            self.transport.start_local_video().await?;
        } else {
            self.transport.stop_local_video().await?;
        }
        self.local_video_on = on;
        self.tiles.set_video_state(&self.self_attendee, on);
        Ok(())
    }

    async fn handle_set_share(&mut self, on: bool) -> Result<(), SessionError> {
        if self.status != SessionStatus::Active {
            return Err(SessionError::SessionClosed);
        }
        if on {
            self.transport.start_content_share().await?;
        } else {
            self.transport.stop_content_share().await?;
        }
        self.is_sharing = on;
        Ok(())
    }

    fn handle_bind_tile(&mut self, tile_id: TileId, surface: &SurfaceId) {
        let known =
            self.tiles.contains(tile_id) || self.share.owned_tile() == Some(tile_id);
        if known {
            self.transport.bind_video_surface(tile_id, surface);
        } else {
            // Bind raced tile removal; by contract a no-op.
            debug!(
                target: "sc.actor.session",
                session_id = %self.session_ref,
                tile_id,
                "bind requested for unknown tile"
            );
        }
    }

    fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            status: self.status,
            self_attendee_id: self.self_attendee.clone(),
            roster: self.roster.participants().to_vec(),
            tiles: self.tiles.bindings(),
            video_states: self.tiles.video_states().clone(),
            mic_states: self.mic.mic_states().clone(),
            messages: self.chat.messages().to_vec(),
            content_share_owner: self.share.owner().cloned(),
            is_audio_on: self.local_audio_on,
            is_video_on: self.local_video_on,
            is_sharing: self.is_sharing,
            is_recording: self.is_recording,
            focused_attendee: self.focused_attendee.clone(),
        }
    }

    /// Run the release sequence exactly once. Subsequent triggers are
    /// no-ops.
    async fn teardown(&mut self, trigger: Option<ExitTrigger>) {
        if self.teardown_done {
            debug!(
                target: "sc.actor.session",
                session_id = %self.session_ref,
                trigger = ?trigger,
                "teardown already performed"
            );
            return;
        }
        self.teardown_done = true;
        self.status = SessionStatus::Closing;

        info!(
            target: "sc.actor.session",
            session_id = %self.session_ref,
            trigger = ?trigger,
            "tearing down session"
        );

        if let Err(error) = self.transport.stop_local_video().await {
            debug!(
                target: "sc.actor.session",
                session_id = %self.session_ref,
                %error,
                "stop local video during teardown"
            );
        }

        if let Err(error) = self.transport.stop().await {
            warn!(
                target: "sc.actor.session",
                session_id = %self.session_ref,
                %error,
                "transport stop failed"
            );
        }

        self.release_devices().await;

        // Best-effort: an exit-notify failure is logged, never surfaced,
        // and never blocks local cleanup.
        if let Err(error) = self.directory.notify_exit(&self.session_ref).await {
            warn!(
                target: "sc.actor.session",
                session_id = %self.session_ref,
                %error,
                "exit notification failed"
            );
        }

        self.subscriptions.clear();
        self.mic.clear();
        self.status = SessionStatus::Closed;
        self.cancel_token.cancel();
    }

    async fn release_devices(&self) {
        release_input_streams(self.transport.as_ref(), &self.session_ref).await;
    }
}

/// Release every acquired device stream, each independently: one failing
/// device never prevents the others from stopping.
async fn release_input_streams(transport: &dyn Transport, session_ref: &SessionRef) {
    let mut devices = Vec::new();
    match transport.list_audio_inputs().await {
        Ok(found) => devices.extend(found),
        Err(error) => {
            warn!(
                target: "sc.actor.session",
                session_id = %session_ref,
                %error,
                "audio input enumeration failed during teardown"
            );
        }
    }
    match transport.list_video_inputs().await {
        Ok(found) => devices.extend(found),
        Err(error) => {
            warn!(
                target: "sc.actor.session",
                session_id = %session_ref,
                %error,
                "video input enumeration failed during teardown"
            );
        }
    }

    for device in devices {
        if let Err(error) = transport.stop_input_device(&device.device_id).await {
            warn!(
                target: "sc.actor.session",
                session_id = %session_ref,
                device_id = %device.device_id,
                %error,
                "device stream stop failed"
            );
        }
    }
}

/// Forward an event into the mailbox from a synchronous callback.
///
/// Handlers must not block, so delivery is attempted with `try_send`; a
/// full mailbox defers the event to a spawned send instead of dropping
/// it, since tile removals (unlike presence, which is refetch-driven)
/// have no recovery trigger. Deferred events may land out of order
/// relative to later ones during a burst.
fn forward(tx: &mpsc::Sender<SessionMessage>, event: SessionEvent) {
    match tx.try_send(SessionMessage::Event(event)) {
        Ok(()) => {}
        // Closed means the session is gone; nothing left to update.
        Err(mpsc::error::TrySendError::Closed(_)) => {}
        Err(mpsc::error::TrySendError::Full(message)) => {
            warn!(
                target: "sc.actor.session",
                "session mailbox full, deferring event"
            );
            let tx = tx.clone();
            tokio::spawn(async move {
                let _ = tx.send(message).await;
            });
        }
    }
}

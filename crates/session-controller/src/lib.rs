//! Session Controller Library
//!
//! This library provides the client-side control plane for a live
//! multi-party session - joining, reconciling, rendering coordination,
//! and guaranteed teardown:
//!
//! - Join orchestration against the backend roster directory (credential
//!   issuance, transport connect, audio device setup, fail-safe mute)
//! - Presence-triggered roster reconciliation: transport events trigger
//!   refetches, the directory stays the source of truth
//! - Video tile and content-share stream coordination for the
//!   presentation layer
//! - Chat relay with local echo and bounded-timeout sends
//! - Exactly-once resource teardown across every exit path
//!
//! # Architecture
//!
//! A single state-owning actor per session:
//!
//! ```text
//! SessionActor (one per joined session)
//! ├── owns roster, tiles, share owner, mic map, chat log
//! ├── owns the transport session and acquired device streams
//! ├── mailbox <- transport subscriptions (presence, tiles, volume, data)
//! ├── mailbox <- spawned roster refetch completions
//! └── mailbox <- SessionHandle commands and host exit triggers
//! ```
//!
//! # Key Design Decisions
//!
//! - **Single mailbox**: every input is serialized; no handler observes
//!   partially-updated state
//! - **Refetch over ledger**: the visible roster is always the last
//!   completed directory snapshot merged for stability, never an
//!   incremental presence ledger
//! - **Teardown funnel**: host exit triggers, explicit teardown calls,
//!   and mailbox closure all reach one consumed-flag-guarded release
//!   sequence
//! - **Fail-safe join**: missing audio devices degrade the session, a
//!   missing credential or transport failure aborts it
//!
//! # Modules
//!
//! - [`actors`] - The session actor, its mailbox types, and the handle
//! - [`config`] - Controller configuration from environment
//! - [`errors`] - Error types with severity classification

pub mod actors;
pub mod chat;
pub mod config;
pub mod directory;
pub mod errors;
pub mod events;
pub mod lifecycle;
pub mod roster;
pub mod share;
pub mod tiles;
pub mod transport;
pub mod volume;

pub use actors::{SessionActor, SessionDeps, SessionHandle, SessionSnapshot, SessionStatus};
pub use config::Config;
pub use directory::{JoinCredentials, Participant, RosterDirectory, RosterSnapshot, SessionRef};
pub use errors::{SessionError, Severity};
pub use lifecycle::{ExitTrigger, LifecycleHost};
pub use transport::{Transport, TransportConnector};

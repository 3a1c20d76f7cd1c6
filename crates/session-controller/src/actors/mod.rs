//! Actor implementation for the session controller.
//!
//! One state-owning actor per live session, fed by a single mailbox.
//! Transport callbacks, completed roster fetches, and presentation-layer
//! commands are all serialized through it.

pub mod messages;
pub mod session;

pub use messages::{SessionCommand, SessionEvent, SessionMessage, SessionSnapshot, SessionStatus};
pub use session::{SessionActor, SessionDeps, SessionHandle};

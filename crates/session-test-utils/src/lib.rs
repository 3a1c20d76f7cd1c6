//! # Session Test Utilities
//!
//! Shared test utilities for the Roundtable session controller.
//!
//! This crate provides fake implementations and test fixtures for isolated
//! controller testing without a real backend or media transport.
//!
//! ## Modules
//!
//! - `fake_transport` - Scriptable in-memory transport (events, call
//!   recording, failure injection)
//! - `fake_directory` - Scriptable roster directory with queued snapshots
//! - `fixtures` - Pre-configured test data (participants, credentials)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use session_test_utils::*;
//!
//! #[tokio::test]
//! async fn test_example() {
//!     let transport = FakeTransport::new();
//!     let directory = FakeDirectory::new()
//!         .with_credentials("att-self")
//!         .with_roster(vec![fixtures::participant("u-a", "Ada")]);
//!
//!     // Join through the controller, then drive events:
//!     transport.emit_presence("att-a", true);
//! }
//! ```

pub mod fake_directory;
pub mod fake_transport;
pub mod fixtures;

pub use fake_directory::FakeDirectory;
pub use fake_transport::{FakeConnector, FakeTransport};

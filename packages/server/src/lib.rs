//! Collaborative drawing relay server.
//!
//! Clients join a named room over WebSocket; drawing events from one member
//! are fanned out to the other members, and a late joiner receives the room's
//! last reported canvas snapshot instead of replaying history.

pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

// Re-export entry points
pub use error::ServerError;
pub use ui::{ServerConfig, run as run_server};

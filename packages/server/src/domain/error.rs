//! Domain layer error definitions.

use thiserror::Error;

use super::value_object::ConnectionId;

/// Errors related to Value Objects validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueObjectError {
    /// ConnectionId validation error
    #[error("ConnectionId cannot be empty")]
    ConnectionIdEmpty,

    /// RoomId validation error
    #[error("RoomId cannot be empty")]
    RoomIdEmpty,

    /// RoomId too long error
    #[error("RoomId cannot exceed {max} bytes (got {actual})")]
    RoomIdTooLong { max: usize, actual: usize },

    /// CanvasSnapshot validation error
    #[error("CanvasSnapshot cannot be blank")]
    CanvasSnapshotEmpty,
}

/// Errors raised while handing an outbound event to a single connection
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PushError {
    /// The target connection is not (or no longer) registered
    #[error("Connection '{0}' is not registered")]
    ConnectionNotFound(ConnectionId),

    /// The connection's outbound channel has been closed
    #[error("Outbound channel for connection '{0}' is closed")]
    ChannelClosed(ConnectionId),

    /// The event could not be encoded for the wire
    #[error("Failed to encode outbound event: {0}")]
    Encode(String),
}

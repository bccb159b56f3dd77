//! UseCase 層のエラー定義

use thiserror::Error;

use crate::domain::ValueObjectError;

/// Errors raised while turning an inbound frame into an event.
///
/// None of these abort the session: the offending frame is dropped.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EventError {
    /// Not JSON, unknown event name, or `data` of the wrong shape
    #[error("Malformed event frame: {0}")]
    Malformed(String),

    #[error("Event '{0}' is missing roomId")]
    MissingRoomId(&'static str),

    #[error("Invalid roomId: {0}")]
    InvalidRoomId(#[from] ValueObjectError),
}

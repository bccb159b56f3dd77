//! Domain layer for the drawing relay.
//!
//! This module contains the room model and protocol rules, independent of
//! data transfer objects (DTOs) and infrastructure concerns.

pub mod entity;
pub mod error;
pub mod event;
pub mod factory;
pub mod message_pusher;
pub mod registry;
pub mod repository;
pub mod value_object;

pub use entity::Room;
pub use error::{PushError, ValueObjectError};
pub use event::{InboundEvent, OutboundEvent, RelayKind};
pub use factory::ConnectionIdFactory;
pub use message_pusher::MessagePusher;
#[cfg(test)]
pub use message_pusher::MockMessagePusher;
pub use registry::{MembershipChange, RoomRegistry};
pub use repository::{JoinedRoom, RoomDeparture, RoomRepository};
pub use value_object::{CanvasSnapshot, ConnectionId, RoomId, Timestamp};

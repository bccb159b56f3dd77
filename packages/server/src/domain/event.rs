//! Inbound and outbound event kinds of the relay protocol.

use super::value_object::RoomId;

/// Drawing event kinds that are relayed verbatim to the rest of a room
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelayKind {
    DrawStart,
    Drawing,
    DrawEnd,
    DrawShape,
}

impl RelayKind {
    /// Event name on the wire
    pub fn event_name(&self) -> &'static str {
        match self {
            Self::DrawStart => "draw-start",
            Self::Drawing => "drawing",
            Self::DrawEnd => "draw-end",
            Self::DrawShape => "draw-shape",
        }
    }
}

/// A validated event received from one connection
#[derive(Debug, Clone, PartialEq)]
pub enum InboundEvent {
    /// Join a room (created on first join)
    JoinRoom { room_id: RoomId },
    /// Drawing event to forward to every other member of the room
    Relay {
        kind: RelayKind,
        room_id: RoomId,
        payload: serde_json::Value,
    },
    /// Full canvas state: stored for late joiners and forwarded to the room.
    ///
    /// `image_data` is `null` when the report carried none; a blank value
    /// clears the stored snapshot.
    CanvasState {
        room_id: RoomId,
        image_data: serde_json::Value,
    },
}

/// An event delivered to one or more connections
#[derive(Debug, Clone, PartialEq)]
pub enum OutboundEvent {
    /// Current number of members in the room
    UserCount(usize),
    /// Canvas state, either the stored snapshot on join or another member's report
    CanvasState(serde_json::Value),
    /// Drawing payload relayed unchanged
    Relay {
        kind: RelayKind,
        payload: serde_json::Value,
    },
}

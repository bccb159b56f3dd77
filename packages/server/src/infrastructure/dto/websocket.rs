//! WebSocket message DTOs for the drawing relay.
//!
//! Every frame is a JSON text frame of the form `{"event": <name>, "data": <json>}`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    domain::{InboundEvent, OutboundEvent, RelayKind, RoomId},
    usecase::EventError,
};

/// Event sent by a client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ClientEvent {
    /// `data` is the room id string
    JoinRoom(String),
    DrawStart(Value),
    Drawing(Value),
    DrawEnd(Value),
    DrawShape(Value),
    /// `data` is `{roomId, imageData}`
    CanvasState(Value),
}

/// Event sent by the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ServerEvent {
    UserCount(usize),
    CanvasState(Value),
    DrawStart(Value),
    Drawing(Value),
    DrawEnd(Value),
    DrawShape(Value),
}

impl From<OutboundEvent> for ServerEvent {
    fn from(event: OutboundEvent) -> Self {
        match event {
            OutboundEvent::UserCount(count) => Self::UserCount(count),
            OutboundEvent::CanvasState(image_data) => Self::CanvasState(image_data),
            OutboundEvent::Relay { kind, payload } => match kind {
                RelayKind::DrawStart => Self::DrawStart(payload),
                RelayKind::Drawing => Self::Drawing(payload),
                RelayKind::DrawEnd => Self::DrawEnd(payload),
                RelayKind::DrawShape => Self::DrawShape(payload),
            },
        }
    }
}

impl TryFrom<ClientEvent> for InboundEvent {
    type Error = EventError;

    fn try_from(event: ClientEvent) -> Result<Self, Self::Error> {
        match event {
            ClientEvent::JoinRoom(room_id) => Ok(Self::JoinRoom {
                room_id: RoomId::new(room_id)?,
            }),
            ClientEvent::DrawStart(payload) => relay(RelayKind::DrawStart, payload),
            ClientEvent::Drawing(payload) => relay(RelayKind::Drawing, payload),
            ClientEvent::DrawEnd(payload) => relay(RelayKind::DrawEnd, payload),
            ClientEvent::DrawShape(payload) => relay(RelayKind::DrawShape, payload),
            ClientEvent::CanvasState(payload) => {
                let room_id = room_id_of("canvas-state", &payload)?;
                let image_data = payload.get("imageData").cloned().unwrap_or(Value::Null);
                Ok(Self::CanvasState {
                    room_id,
                    image_data,
                })
            }
        }
    }
}

fn relay(kind: RelayKind, payload: Value) -> Result<InboundEvent, EventError> {
    let room_id = room_id_of(kind.event_name(), &payload)?;
    Ok(InboundEvent::Relay {
        kind,
        room_id,
        payload,
    })
}

fn room_id_of(event_name: &'static str, payload: &Value) -> Result<RoomId, EventError> {
    let room_id = payload
        .get("roomId")
        .and_then(Value::as_str)
        .ok_or(EventError::MissingRoomId(event_name))?;
    Ok(RoomId::new(room_id.to_string())?)
}

/// Parse a text frame into a validated inbound event
pub fn parse_client_event(text: &str) -> Result<InboundEvent, EventError> {
    let event: ClientEvent =
        serde_json::from_str(text).map_err(|e| EventError::Malformed(e.to_string()))?;
    InboundEvent::try_from(event)
}

/// Encode an outbound event as a text frame
pub fn encode_server_event(event: OutboundEvent) -> Result<String, serde_json::Error> {
    serde_json::to_string(&ServerEvent::from(event))
}

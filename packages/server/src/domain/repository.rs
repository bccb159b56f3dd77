//! Repository trait for room state.
//!
//! The domain defines the interface; `infrastructure::repository` provides the
//! implementation (dependency inversion). Each method is one atomic step with
//! respect to every other method.

use async_trait::async_trait;

use super::{
    entity::Room,
    registry::MembershipChange,
    value_object::{CanvasSnapshot, ConnectionId, RoomId},
};

/// Room state observed right after a join
#[derive(Debug, Clone, PartialEq)]
pub struct JoinedRoom {
    /// Member count after the join
    pub member_count: usize,
    /// Every member of the room, the joining connection included
    pub members: Vec<ConnectionId>,
    /// Snapshot cached for the room, if any
    pub snapshot: Option<CanvasSnapshot>,
}

/// One room affected by a connection leaving
#[derive(Debug, Clone, PartialEq)]
pub struct RoomDeparture {
    pub room_id: RoomId,
    pub change: MembershipChange,
    /// Members left behind (empty when the room was removed)
    pub remaining_members: Vec<ConnectionId>,
}

#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// Add the connection to the room and read back its members and snapshot
    async fn join_room(&self, room_id: RoomId, connection_id: ConnectionId) -> JoinedRoom;

    /// Remove the connection from one room
    async fn leave_room(
        &self,
        connection_id: &ConnectionId,
        room_id: &RoomId,
    ) -> Option<RoomDeparture>;

    /// Remove the connection from every room it belongs to
    async fn leave_all_rooms(&self, connection_id: &ConnectionId) -> Vec<RoomDeparture>;

    /// Store (or clear, with `None`) the snapshot of an existing room.
    /// Returns `false` for unknown rooms.
    async fn set_snapshot(&self, room_id: &RoomId, snapshot: Option<CanvasSnapshot>) -> bool;

    async fn get_snapshot(&self, room_id: &RoomId) -> Option<CanvasSnapshot>;

    /// Members of the room other than `excluded`
    async fn get_members_except(
        &self,
        room_id: &RoomId,
        excluded: &ConnectionId,
    ) -> Vec<ConnectionId>;

    async fn get_room(&self, room_id: &RoomId) -> Option<Room>;

    async fn list_rooms(&self) -> Vec<Room>;
}

//! Room registry: the mapping from room key to room state.
//!
//! Pure data-structure logic with no I/O and no locking. Callers that share a
//! registry across tasks wrap it in a single mutex (see
//! `InMemoryRoomRepository`), so every operation here is applied atomically.
//!
//! Invariant: a room is present if and only if it has at least one member.
//! Every operation that removes a member deletes the room in the same call
//! when the member set becomes empty.

use std::collections::HashMap;

use super::{
    entity::Room,
    value_object::{CanvasSnapshot, ConnectionId, RoomId, Timestamp},
};

/// Result of removing a connection from one room
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembershipChange {
    /// The room still exists with this many members
    Remaining(usize),
    /// The last member left and the room was deleted
    RoomRemoved,
}

/// Process-wide room table
#[derive(Debug, Default)]
pub struct RoomRegistry {
    rooms: HashMap<RoomId, Room>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `connection_id` to `room_id`, creating the room if it is unknown.
    ///
    /// Joining a room twice has no additional effect.
    ///
    /// # Returns
    ///
    /// The member count after the join
    pub fn join(&mut self, room_id: RoomId, connection_id: ConnectionId, now: Timestamp) -> usize {
        let room = self.rooms.entry(room_id.clone()).or_insert_with(|| {
            tracing::info!("Room '{}' created", room_id);
            Room::new(room_id, now)
        });
        room.add_member(connection_id);
        room.member_count()
    }

    /// Remove `connection_id` from `room_id`.
    ///
    /// # Returns
    ///
    /// * `Some(MembershipChange)` - The connection was a member and has been removed
    /// * `None` - The room is unknown or the connection was not a member; nothing changed
    pub fn leave(
        &mut self,
        connection_id: &ConnectionId,
        room_id: &RoomId,
    ) -> Option<MembershipChange> {
        let room = self.rooms.get_mut(room_id)?;
        if !room.remove_member(connection_id) {
            return None;
        }

        if room.is_empty() {
            self.rooms.remove(room_id);
            tracing::info!("Room '{}' deleted (empty)", room_id);
            Some(MembershipChange::RoomRemoved)
        } else {
            Some(MembershipChange::Remaining(room.member_count()))
        }
    }

    /// Remove `connection_id` from every room it belongs to.
    ///
    /// Rooms not containing the connection are untouched. Calling this for a
    /// connection that is in no room returns an empty list.
    ///
    /// # Returns
    ///
    /// One entry per affected room, ordered by room id
    pub fn leave_all(&mut self, connection_id: &ConnectionId) -> Vec<(RoomId, MembershipChange)> {
        let mut joined: Vec<RoomId> = self
            .rooms
            .values()
            .filter(|room| room.has_member(connection_id))
            .map(|room| room.id.clone())
            .collect();
        joined.sort();

        joined
            .into_iter()
            .filter_map(|room_id| {
                self.leave(connection_id, &room_id)
                    .map(|change| (room_id, change))
            })
            .collect()
    }

    /// Replace the snapshot of `room_id`, or clear it with `None`.
    ///
    /// Unknown rooms are not resurrected: the snapshot is dropped.
    ///
    /// # Returns
    ///
    /// `true` if the room exists and its snapshot was replaced
    pub fn set_snapshot(&mut self, room_id: &RoomId, snapshot: Option<CanvasSnapshot>) -> bool {
        match self.rooms.get_mut(room_id) {
            Some(room) => {
                room.set_snapshot(snapshot);
                true
            }
            None => false,
        }
    }

    pub fn get_snapshot(&self, room_id: &RoomId) -> Option<&CanvasSnapshot> {
        self.rooms.get(room_id).and_then(Room::snapshot)
    }

    pub fn get(&self, room_id: &RoomId) -> Option<&Room> {
        self.rooms.get(room_id)
    }

    /// Member set of `room_id` at the time of the call (empty for unknown rooms)
    pub fn members(&self, room_id: &RoomId) -> Vec<ConnectionId> {
        self.rooms
            .get(room_id)
            .map(Room::member_ids)
            .unwrap_or_default()
    }

    /// Members of `room_id` other than `excluded`
    pub fn members_except(&self, room_id: &RoomId, excluded: &ConnectionId) -> Vec<ConnectionId> {
        self.rooms
            .get(room_id)
            .map(|room| room.member_ids_except(excluded))
            .unwrap_or_default()
    }

    pub fn rooms(&self) -> impl Iterator<Item = &Room> {
        self.rooms.values()
    }

    pub fn contains(&self, room_id: &RoomId) -> bool {
        self.rooms.contains_key(room_id)
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}

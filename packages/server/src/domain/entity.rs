//! Core domain models for the drawing relay.

use std::collections::HashSet;

use super::value_object::{CanvasSnapshot, ConnectionId, RoomId, Timestamp};

/// A named broadcast group of connections sharing one drawing surface
#[derive(Debug, Clone)]
pub struct Room {
    /// Room identifier
    pub id: RoomId,
    /// Connections currently joined to the room
    members: HashSet<ConnectionId>,
    /// Last canvas state reported for the room, cached for late joiners
    snapshot: Option<CanvasSnapshot>,
    /// Timestamp when the room was created
    pub created_at: Timestamp,
}

impl Room {
    /// Create a new room with no members and no snapshot
    pub fn new(id: RoomId, created_at: Timestamp) -> Self {
        Self {
            id,
            members: HashSet::new(),
            snapshot: None,
            created_at,
        }
    }

    /// Add a member to the room.
    ///
    /// Returns `false` if the connection was already a member.
    pub fn add_member(&mut self, connection_id: ConnectionId) -> bool {
        self.members.insert(connection_id)
    }

    /// Remove a member from the room.
    ///
    /// Returns `false` if the connection was not a member.
    pub fn remove_member(&mut self, connection_id: &ConnectionId) -> bool {
        self.members.remove(connection_id)
    }

    pub fn has_member(&self, connection_id: &ConnectionId) -> bool {
        self.members.contains(connection_id)
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Copy of the current member set, sorted for stable output
    pub fn member_ids(&self) -> Vec<ConnectionId> {
        let mut ids: Vec<ConnectionId> = self.members.iter().cloned().collect();
        ids.sort();
        ids
    }

    /// Copy of the current member set without `excluded`
    pub fn member_ids_except(&self, excluded: &ConnectionId) -> Vec<ConnectionId> {
        self.members
            .iter()
            .filter(|id| *id != excluded)
            .cloned()
            .collect()
    }

    pub fn snapshot(&self) -> Option<&CanvasSnapshot> {
        self.snapshot.as_ref()
    }

    /// Replace the cached snapshot (last writer wins). `None` clears it.
    pub fn set_snapshot(&mut self, snapshot: Option<CanvasSnapshot>) {
        self.snapshot = snapshot;
    }
}

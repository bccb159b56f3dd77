//! InMemory Room Repository 実装
//!
//! ドメイン層が定義する RoomRepository trait の具体的な実装。
//! `RoomRegistry` を単一の Mutex で保護し、各操作を他の操作に対して原子的に実行します。
//!
//! プロセス再起動で全てのルームは破棄されます（永続化なし）。

use std::sync::Arc;

use async_trait::async_trait;
use sketchroom_shared::time::get_utc_timestamp;
use tokio::sync::Mutex;

use crate::domain::{
    CanvasSnapshot, ConnectionId, JoinedRoom, MembershipChange, Room, RoomDeparture,
    RoomRegistry, RoomId, RoomRepository, Timestamp,
};

/// インメモリ Room Repository 実装
///
/// ドメイン層の RoomRepository trait を実装します（依存性の逆転）。
pub struct InMemoryRoomRepository {
    /// ルームレジストリ（全操作で共有される唯一のロック）
    registry: Arc<Mutex<RoomRegistry>>,
}

impl InMemoryRoomRepository {
    /// 新しい InMemoryRoomRepository を作成
    pub fn new(registry: Arc<Mutex<RoomRegistry>>) -> Self {
        Self { registry }
    }
}

impl Default for InMemoryRoomRepository {
    fn default() -> Self {
        Self::new(Arc::new(Mutex::new(RoomRegistry::new())))
    }
}

fn departure(registry: &RoomRegistry, room_id: RoomId, change: MembershipChange) -> RoomDeparture {
    let remaining_members = match change {
        MembershipChange::Remaining(_) => registry.members(&room_id),
        MembershipChange::RoomRemoved => Vec::new(),
    };
    RoomDeparture {
        room_id,
        change,
        remaining_members,
    }
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    async fn join_room(&self, room_id: RoomId, connection_id: ConnectionId) -> JoinedRoom {
        let mut registry = self.registry.lock().await;
        let now = Timestamp::new(get_utc_timestamp());
        let member_count = registry.join(room_id.clone(), connection_id, now);

        JoinedRoom {
            member_count,
            members: registry.members(&room_id),
            snapshot: registry.get_snapshot(&room_id).cloned(),
        }
    }

    async fn leave_room(
        &self,
        connection_id: &ConnectionId,
        room_id: &RoomId,
    ) -> Option<RoomDeparture> {
        let mut registry = self.registry.lock().await;
        let change = registry.leave(connection_id, room_id)?;
        Some(departure(&registry, room_id.clone(), change))
    }

    async fn leave_all_rooms(&self, connection_id: &ConnectionId) -> Vec<RoomDeparture> {
        let mut registry = self.registry.lock().await;
        let changes = registry.leave_all(connection_id);
        changes
            .into_iter()
            .map(|(room_id, change)| departure(&registry, room_id, change))
            .collect()
    }

    async fn set_snapshot(&self, room_id: &RoomId, snapshot: Option<CanvasSnapshot>) -> bool {
        let mut registry = self.registry.lock().await;
        registry.set_snapshot(room_id, snapshot)
    }

    async fn get_snapshot(&self, room_id: &RoomId) -> Option<CanvasSnapshot> {
        let registry = self.registry.lock().await;
        registry.get_snapshot(room_id).cloned()
    }

    async fn get_members_except(
        &self,
        room_id: &RoomId,
        excluded: &ConnectionId,
    ) -> Vec<ConnectionId> {
        let registry = self.registry.lock().await;
        registry.members_except(room_id, excluded)
    }

    async fn get_room(&self, room_id: &RoomId) -> Option<Room> {
        let registry = self.registry.lock().await;
        registry.get(room_id).cloned()
    }

    async fn list_rooms(&self) -> Vec<Room> {
        let registry = self.registry.lock().await;
        let mut rooms: Vec<Room> = registry.rooms().cloned().collect();
        rooms.sort_by(|a, b| a.id.cmp(&b.id));
        rooms
    }
}

//! Session coordination for one connection.
//!
//! Every inbound event of a connection goes through [`SessionCoordinator::dispatch`],
//! which updates room state through the repository and names the delivery
//! targets for the message pusher:
//!
//! | Inbound          | Outbound                                                       |
//! |------------------|----------------------------------------------------------------|
//! | `join-room`      | `user-count` to the whole room, `canvas-state` to joiner only  |
//! | drawing events   | same event, verbatim, to the room minus the sender             |
//! | `canvas-state`   | stored (cleared if blank), then relayed to the room minus sender |
//! | disconnect       | `user-count` to each room that still has members               |

use std::sync::Arc;

use serde_json::Value;

use super::{
    disconnect_connection::DisconnectConnectionUseCase, join_room::JoinRoomUseCase,
    relay_drawing::RelayDrawingUseCase, update_canvas::UpdateCanvasUseCase,
};
use crate::domain::{
    ConnectionId, InboundEvent, MembershipChange, MessagePusher, OutboundEvent, RelayKind, RoomId,
    RoomRepository,
};

pub struct SessionCoordinator {
    repository: Arc<dyn RoomRepository>,
    pusher: Arc<dyn MessagePusher>,
}

impl SessionCoordinator {
    pub fn new(repository: Arc<dyn RoomRepository>, pusher: Arc<dyn MessagePusher>) -> Self {
        Self { repository, pusher }
    }

    /// Handle one inbound event from `connection_id`
    pub async fn dispatch(&self, connection_id: &ConnectionId, event: InboundEvent) {
        match event {
            InboundEvent::JoinRoom { room_id } => self.on_join_room(connection_id, room_id).await,
            InboundEvent::Relay {
                kind,
                room_id,
                payload,
            } => self.on_relay(connection_id, &room_id, kind, payload).await,
            InboundEvent::CanvasState {
                room_id,
                image_data,
            } => {
                self.on_canvas_state(connection_id, &room_id, image_data)
                    .await
            }
        }
    }

    pub async fn on_join_room(&self, connection_id: &ConnectionId, room_id: RoomId) {
        let joined = JoinRoomUseCase::new(self.repository.clone())
            .execute(connection_id.clone(), room_id)
            .await;

        self.pusher
            .broadcast(&joined.members, OutboundEvent::UserCount(joined.member_count))
            .await;

        // Existing members already have the canvas; only the joiner catches up
        if let Some(snapshot) = joined.snapshot
            && let Err(e) = self
                .pusher
                .push_to(
                    connection_id,
                    OutboundEvent::CanvasState(snapshot.into_value()),
                )
                .await
        {
            tracing::warn!("Failed to send canvas state to '{}': {}", connection_id, e);
        }
    }

    pub async fn on_relay(
        &self,
        connection_id: &ConnectionId,
        room_id: &RoomId,
        kind: RelayKind,
        payload: Value,
    ) {
        let targets = RelayDrawingUseCase::new(self.repository.clone())
            .execute(connection_id, room_id)
            .await;

        let delivered = self
            .pusher
            .broadcast(&targets, OutboundEvent::Relay { kind, payload })
            .await;
        tracing::trace!(
            "Relayed '{}' from '{}' in room '{}' to {} connection(s)",
            kind.event_name(),
            connection_id,
            room_id,
            delivered
        );
    }

    pub async fn on_canvas_state(
        &self,
        connection_id: &ConnectionId,
        room_id: &RoomId,
        image_data: Value,
    ) {
        let update = UpdateCanvasUseCase::new(self.repository.clone())
            .execute(connection_id, room_id, &image_data)
            .await;

        let delivered = self
            .pusher
            .broadcast(&update.targets, OutboundEvent::CanvasState(image_data))
            .await;

        if !update.stored {
            tracing::debug!(
                "Canvas state from '{}' for unknown room '{}' was not stored",
                connection_id,
                room_id
            );
        } else if update.cleared {
            tracing::debug!(
                "Canvas snapshot of room '{}' cleared by '{}'",
                room_id,
                connection_id
            );
        }
        tracing::trace!(
            "Relayed canvas state from '{}' in room '{}' to {} connection(s)",
            connection_id,
            room_id,
            delivered
        );
    }

    /// Remove the connection from every room and tell the remaining members.
    ///
    /// Runs to completion before the connection's outbound channel is dropped.
    pub async fn on_disconnect(&self, connection_id: &ConnectionId) {
        let departures = DisconnectConnectionUseCase::new(self.repository.clone())
            .execute(connection_id)
            .await;

        for departure in departures {
            match departure.change {
                MembershipChange::Remaining(count) => {
                    self.pusher
                        .broadcast(&departure.remaining_members, OutboundEvent::UserCount(count))
                        .await;
                }
                MembershipChange::RoomRemoved => {
                    tracing::debug!("No one left to notify in room '{}'", departure.room_id);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{CanvasSnapshot, MockMessagePusher, Timestamp},
        infrastructure::{
            message_pusher::WebSocketMessagePusher, repository::InMemoryRoomRepository,
        },
    };
    use serde_json::json;
    use tokio::sync::mpsc::{self, UnboundedReceiver, error::TryRecvError};

    fn room_id(id: &str) -> RoomId {
        RoomId::new(id.to_string()).unwrap()
    }

    fn conn(id: &str) -> ConnectionId {
        ConnectionId::new(id.to_string()).unwrap()
    }

    fn snapshot(value: &str) -> CanvasSnapshot {
        CanvasSnapshot::new(json!(value)).unwrap()
    }

    // ========================================
    // mockall による配送先の検証
    // ========================================

    #[tokio::test]
    async fn test_join_without_snapshot_sends_only_count() {
        // テスト項目: スナップショットの無いルームへの参加では user-count だけが全員に送られる
        // given (前提条件):
        let repository = Arc::new(InMemoryRoomRepository::default());
        repository.join_room(room_id("lobby"), conn("alice")).await;

        let mut pusher = MockMessagePusher::new();
        pusher
            .expect_broadcast()
            .withf(|targets, event| {
                targets.to_vec() == vec![conn("alice"), conn("bob")]
                    && matches!(event, OutboundEvent::UserCount(2))
            })
            .times(1)
            .returning(|targets, _| targets.len());
        pusher.expect_push_to().times(0);

        let coordinator = SessionCoordinator::new(repository, Arc::new(pusher));

        // when (操作):
        coordinator.on_join_room(&conn("bob"), room_id("lobby")).await;

        // then (期待する結果): モックの期待値は drop 時に検証される
    }

    #[tokio::test]
    async fn test_join_with_snapshot_sends_snapshot_to_joiner_only() {
        // テスト項目: スナップショットは参加者本人にのみ送られ、既存メンバーには送られない
        // given (前提条件):
        let repository = Arc::new(InMemoryRoomRepository::default());
        repository.join_room(room_id("lobby"), conn("alice")).await;
        repository
            .set_snapshot(&room_id("lobby"), Some(snapshot("X")))
            .await;

        let mut pusher = MockMessagePusher::new();
        pusher
            .expect_broadcast()
            .withf(|_, event| matches!(event, OutboundEvent::UserCount(2)))
            .times(1)
            .returning(|targets, _| targets.len());
        pusher
            .expect_push_to()
            .withf(|target, event| {
                target.as_str() == "bob"
                    && matches!(event, OutboundEvent::CanvasState(data) if data == &json!("X"))
            })
            .times(1)
            .returning(|_, _| Ok(()));

        let coordinator = SessionCoordinator::new(repository, Arc::new(pusher));

        // when (操作):
        coordinator.on_join_room(&conn("bob"), room_id("lobby")).await;
    }

    #[tokio::test]
    async fn test_relay_never_targets_sender() {
        // テスト項目: 描画イベントの中継先に送信者は含まれない
        // given (前提条件):
        let repository = Arc::new(InMemoryRoomRepository::default());
        for id in ["alice", "bob", "charlie"] {
            repository.join_room(room_id("lobby"), conn(id)).await;
        }

        let mut pusher = MockMessagePusher::new();
        pusher
            .expect_broadcast()
            .withf(|targets, event| {
                targets.len() == 2
                    && !targets.contains(&conn("alice"))
                    && matches!(
                        event,
                        OutboundEvent::Relay {
                            kind: RelayKind::Drawing,
                            ..
                        }
                    )
            })
            .times(1)
            .returning(|targets, _| targets.len());

        let coordinator = SessionCoordinator::new(repository, Arc::new(pusher));

        // when (操作):
        coordinator
            .on_relay(
                &conn("alice"),
                &room_id("lobby"),
                RelayKind::Drawing,
                json!({"roomId": "lobby", "x": 1}),
            )
            .await;
    }

    #[tokio::test]
    async fn test_disconnect_from_removed_room_sends_nothing() {
        // テスト項目: ルームが削除された場合は誰にも通知しない
        let repository = Arc::new(InMemoryRoomRepository::default());
        repository.join_room(room_id("lobby"), conn("alice")).await;

        let mut pusher = MockMessagePusher::new();
        pusher.expect_broadcast().times(0);
        pusher.expect_push_to().times(0);

        let coordinator = SessionCoordinator::new(repository.clone(), Arc::new(pusher));

        coordinator.on_disconnect(&conn("alice")).await;

        assert!(repository.get_room(&room_id("lobby")).await.is_none());
    }

    // ========================================
    // 実際の送信チャンネルを使ったシナリオ検証
    // ========================================

    struct Harness {
        repository: Arc<InMemoryRoomRepository>,
        pusher: Arc<WebSocketMessagePusher>,
        coordinator: SessionCoordinator,
    }

    impl Harness {
        fn new() -> Self {
            let repository = Arc::new(InMemoryRoomRepository::default());
            let pusher = Arc::new(WebSocketMessagePusher::default());
            let coordinator = SessionCoordinator::new(repository.clone(), pusher.clone());
            Self {
                repository,
                pusher,
                coordinator,
            }
        }

        async fn connect(&self, id: &str) -> UnboundedReceiver<String> {
            let (tx, rx) = mpsc::unbounded_channel();
            self.pusher.register(conn(id), tx, Timestamp::new(0)).await;
            rx
        }

        async fn join(&self, id: &str, room: &str) {
            self.coordinator
                .dispatch(&conn(id), InboundEvent::JoinRoom {
                    room_id: room_id(room),
                })
                .await;
        }
    }

    fn next_frame(rx: &mut UnboundedReceiver<String>) -> serde_json::Value {
        let text = rx.try_recv().expect("expected a frame");
        serde_json::from_str(&text).unwrap()
    }

    fn assert_no_frame(rx: &mut UnboundedReceiver<String>) {
        assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));
    }

    #[tokio::test]
    async fn test_second_join_updates_count_for_both() {
        // テスト項目: B が参加すると A と B の両方が user-count = 2 を受け取り、スナップショットは送られない
        // given (前提条件):
        let harness = Harness::new();
        let mut rx_a = harness.connect("a").await;
        let mut rx_b = harness.connect("b").await;
        harness.join("a", "r").await;
        assert_eq!(next_frame(&mut rx_a), json!({"event": "user-count", "data": 1}));

        // when (操作):
        harness.join("b", "r").await;

        // then (期待する結果):
        assert_eq!(next_frame(&mut rx_a), json!({"event": "user-count", "data": 2}));
        assert_eq!(next_frame(&mut rx_b), json!({"event": "user-count", "data": 2}));
        assert_no_frame(&mut rx_a);
        assert_no_frame(&mut rx_b);
    }

    #[tokio::test]
    async fn test_drawing_relayed_verbatim_to_others() {
        // テスト項目: A の drawing は B と C にそのまま届き、A には届かない
        // given (前提条件):
        let harness = Harness::new();
        let mut rx_a = harness.connect("a").await;
        let mut rx_b = harness.connect("b").await;
        let mut rx_c = harness.connect("c").await;
        for id in ["a", "b", "c"] {
            harness.join(id, "r").await;
        }
        while rx_a.try_recv().is_ok() {}
        while rx_b.try_recv().is_ok() {}
        while rx_c.try_recv().is_ok() {}

        // when (操作):
        let payload = json!({"roomId": "r", "x0": 1, "y0": 2, "x1": 3, "y1": 4, "width": 2});
        harness
            .coordinator
            .dispatch(&conn("a"), InboundEvent::Relay {
                kind: RelayKind::Drawing,
                room_id: room_id("r"),
                payload: payload.clone(),
            })
            .await;

        // then (期待する結果):
        let expected = json!({"event": "drawing", "data": payload});
        assert_eq!(next_frame(&mut rx_b), expected);
        assert_eq!(next_frame(&mut rx_c), expected);
        assert_no_frame(&mut rx_a);
    }

    #[tokio::test]
    async fn test_late_joiner_receives_stored_canvas_state() {
        // テスト項目: canvas-state (X) の後に参加した D は canvas-state として X を受け取る
        // given (前提条件):
        let harness = Harness::new();
        let mut rx_a = harness.connect("a").await;
        let mut rx_b = harness.connect("b").await;
        harness.join("a", "r").await;
        harness.join("b", "r").await;
        harness
            .coordinator
            .dispatch(&conn("a"), InboundEvent::CanvasState {
                room_id: room_id("r"),
                image_data: json!("X"),
            })
            .await;
        while rx_a.try_recv().is_ok() {}
        let frames_b: Vec<String> = std::iter::from_fn(|| rx_b.try_recv().ok()).collect();
        assert!(frames_b.iter().any(|f| f.contains("canvas-state")));

        // when (操作):
        let mut rx_d = harness.connect("d").await;
        harness.join("d", "r").await;

        // then (期待する結果):
        assert_eq!(next_frame(&mut rx_d), json!({"event": "user-count", "data": 3}));
        assert_eq!(next_frame(&mut rx_d), json!({"event": "canvas-state", "data": "X"}));
        assert_no_frame(&mut rx_d);
        assert_eq!(next_frame(&mut rx_a), json!({"event": "user-count", "data": 3}));
        assert_no_frame(&mut rx_a);
    }

    #[tokio::test]
    async fn test_blank_canvas_state_clears_snapshot_for_late_joiner() {
        // テスト項目: X を保存した後に null / 空文字の canvas-state が届くと、
        //            他のメンバーには中継され、後から参加した D には canvas-state が送られない
        for blank in [json!(null), json!("")] {
            // given (前提条件):
            let harness = Harness::new();
            let mut rx_a = harness.connect("a").await;
            let mut rx_b = harness.connect("b").await;
            harness.join("a", "r").await;
            harness.join("b", "r").await;
            harness
                .coordinator
                .on_canvas_state(&conn("a"), &room_id("r"), json!("X"))
                .await;
            while rx_a.try_recv().is_ok() {}
            while rx_b.try_recv().is_ok() {}

            // when (操作):
            harness
                .coordinator
                .dispatch(&conn("a"), InboundEvent::CanvasState {
                    room_id: room_id("r"),
                    image_data: blank.clone(),
                })
                .await;
            let mut rx_d = harness.connect("d").await;
            harness.join("d", "r").await;

            // then (期待する結果):
            assert_eq!(
                next_frame(&mut rx_b),
                json!({"event": "canvas-state", "data": blank})
            );
            assert_eq!(next_frame(&mut rx_d), json!({"event": "user-count", "data": 3}));
            assert_no_frame(&mut rx_d);
            assert_eq!(harness.repository.get_snapshot(&room_id("r")).await, None);
        }
    }

    #[tokio::test]
    async fn test_disconnect_notifies_remaining_member() {
        // テスト項目: 二人のうち一人が切断すると残りのメンバーが user-count = 1 を受け取る
        // given (前提条件):
        let harness = Harness::new();
        let _rx_a = harness.connect("a").await;
        let mut rx_b = harness.connect("b").await;
        harness.join("a", "r").await;
        harness.join("b", "r").await;
        while rx_b.try_recv().is_ok() {}

        // when (操作):
        harness.coordinator.on_disconnect(&conn("a")).await;

        // then (期待する結果):
        assert_eq!(next_frame(&mut rx_b), json!({"event": "user-count", "data": 1}));
        let room = harness.repository.get_room(&room_id("r")).await.unwrap();
        assert_eq!(room.member_count(), 1);
    }

    #[tokio::test]
    async fn test_sole_member_disconnect_discards_room_and_snapshot() {
        // テスト項目: 唯一のメンバーが切断するとルームとスナップショットが破棄され、再作成時は空
        // given (前提条件):
        let harness = Harness::new();
        let _rx_a = harness.connect("a").await;
        harness.join("a", "r").await;
        harness
            .coordinator
            .on_canvas_state(&conn("a"), &room_id("r"), json!("old"))
            .await;

        // when (操作):
        harness.coordinator.on_disconnect(&conn("a")).await;
        let mut rx_e = harness.connect("e").await;
        harness.join("e", "r").await;

        // then (期待する結果):
        assert_eq!(next_frame(&mut rx_e), json!({"event": "user-count", "data": 1}));
        assert_no_frame(&mut rx_e);
    }

    #[tokio::test]
    async fn test_multi_room_membership_is_cleaned_up() {
        // テスト項目: 複数ルームに参加した接続の切断で全ルームが更新される
        // given (前提条件):
        let harness = Harness::new();
        let _rx_a = harness.connect("a").await;
        let mut rx_b = harness.connect("b").await;
        let mut rx_c = harness.connect("c").await;
        harness.join("a", "r1").await;
        harness.join("b", "r1").await;
        harness.join("a", "r2").await;
        harness.join("c", "r2").await;
        while rx_b.try_recv().is_ok() {}
        while rx_c.try_recv().is_ok() {}

        // when (操作):
        harness.coordinator.on_disconnect(&conn("a")).await;

        // then (期待する結果):
        assert_eq!(next_frame(&mut rx_b), json!({"event": "user-count", "data": 1}));
        assert_eq!(next_frame(&mut rx_c), json!({"event": "user-count", "data": 1}));
        assert_eq!(harness.repository.list_rooms().await.len(), 2);
    }
}

//! UseCase: ルーム参加処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinRoomUseCase::execute() メソッド
//! - ルームの遅延作成、メンバー追加、参加直後のスナップショット取得
//!
//! ### なぜこのテストが必要か
//! - user-count の通知対象（参加者自身を含む全員）がこの結果で決まる
//! - 途中参加者へのスナップショット配送の有無がこの結果で決まる
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規ルームへの参加、既存ルームへの参加
//! - エッジケース：同じ接続による二重参加、スナップショットありのルームへの参加

use std::sync::Arc;

use crate::domain::{ConnectionId, JoinedRoom, RoomId, RoomRepository};

/// ルーム参加のユースケース
pub struct JoinRoomUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
}

impl JoinRoomUseCase {
    /// 新しい JoinRoomUseCase を作成
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    /// ルーム参加を実行
    ///
    /// # Arguments
    ///
    /// * `connection_id` - 参加する接続の ID
    /// * `room_id` - 参加先のルーム ID（未知の場合は作成される）
    ///
    /// # Returns
    ///
    /// 参加後のメンバー数・メンバー一覧・キャッシュ済みスナップショット
    pub async fn execute(&self, connection_id: ConnectionId, room_id: RoomId) -> JoinedRoom {
        let joined = self
            .repository
            .join_room(room_id.clone(), connection_id.clone())
            .await;

        tracing::info!(
            "Connection '{}' joined room '{}' ({} member(s))",
            connection_id,
            room_id,
            joined.member_count
        );

        joined
    }
}

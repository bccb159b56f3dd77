//! UseCase: 接続切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectConnectionUseCase::execute() メソッド
//! - 切断した接続を全ルームから削除し、影響を受けたルームごとの結果を返す
//!
//! ### なぜこのテストが必要か
//! - 残りメンバーへの user-count 通知の対象と人数がこの結果で決まる
//! - 空になったルームが残らないことを保証する
//!
//! ### どのような状況を想定しているか
//! - 正常系：他のメンバーが残るルームからの切断
//! - エッジケース：最後のメンバーの切断（ルーム削除、通知対象なし）
//! - エッジケース：どのルームにも参加していない接続の切断

use std::sync::Arc;

use crate::domain::{ConnectionId, RoomDeparture, RoomRepository};

/// 接続切断のユースケース
pub struct DisconnectConnectionUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
}

impl DisconnectConnectionUseCase {
    /// 新しい DisconnectConnectionUseCase を作成
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    /// 接続切断を実行
    ///
    /// # Returns
    ///
    /// 影響を受けたルームごとの退出結果（ルーム ID 順）
    pub async fn execute(&self, connection_id: &ConnectionId) -> Vec<RoomDeparture> {
        let departures = self.repository.leave_all_rooms(connection_id).await;
        tracing::info!(
            "Connection '{}' removed from {} room(s)",
            connection_id,
            departures.len()
        );
        departures
    }
}

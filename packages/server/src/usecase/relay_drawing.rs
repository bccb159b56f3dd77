//! UseCase: 描画イベントの中継先決定
//!
//! draw-start / drawing / draw-end / draw-shape のペイロードは解釈せず、
//! 送信者を除くルームの全メンバーへそのまま転送する。

use std::sync::Arc;

use crate::domain::{ConnectionId, RoomId, RoomRepository};

/// 描画イベント中継のユースケース
pub struct RelayDrawingUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
}

impl RelayDrawingUseCase {
    /// 新しい RelayDrawingUseCase を作成
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    /// 中継先を取得
    ///
    /// # Returns
    ///
    /// 送信者以外のルームメンバー（ルームが存在しない場合は空）
    pub async fn execute(&self, sender: &ConnectionId, room_id: &RoomId) -> Vec<ConnectionId> {
        self.repository.get_members_except(room_id, sender).await
    }
}

//! UseCase: キャンバス状態の更新
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - UpdateCanvasUseCase::execute() メソッド
//! - スナップショットの保存（後から参加する接続向け）と中継先の決定
//!
//! ### どのような状況を想定しているか
//! - 正常系：既存ルームへのスナップショット保存と中継
//! - 正常系：空の imageData（null・空文字など）による保存済みスナップショットの消去
//! - エッジケース：存在しないルーム（保存されず、ルームも作成されない）
//! - エッジケース：同時更新（最後に書き込んだ値が残る）

use std::sync::Arc;

use serde_json::Value;

use crate::domain::{CanvasSnapshot, ConnectionId, RoomId, RoomRepository};

/// Outcome of a canvas-state report
#[derive(Debug, Clone, PartialEq)]
pub struct CanvasUpdate {
    /// Whether the room existed and its snapshot was replaced or cleared
    pub stored: bool,
    /// Whether the report was blank and cleared the snapshot
    pub cleared: bool,
    /// Members to forward the report to (sender excluded)
    pub targets: Vec<ConnectionId>,
}

/// キャンバス状態更新のユースケース
pub struct UpdateCanvasUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
}

impl UpdateCanvasUseCase {
    /// 新しい UpdateCanvasUseCase を作成
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    /// スナップショットを保存（空の値なら消去）し、中継先を返す
    pub async fn execute(
        &self,
        sender: &ConnectionId,
        room_id: &RoomId,
        image_data: &Value,
    ) -> CanvasUpdate {
        let snapshot = CanvasSnapshot::new(image_data.clone()).ok();
        let cleared = snapshot.is_none();
        let stored = self.repository.set_snapshot(room_id, snapshot).await;

        let targets = self.repository.get_members_except(room_id, sender).await;
        CanvasUpdate {
            stored,
            cleared,
            targets,
        }
    }
}

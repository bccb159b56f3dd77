//! WebSocket MessagePusher 実装
//!
//! 接続ごとの送信チャンネル（`mpsc::UnboundedSender<String>`）を保持し、
//! ドメインの `OutboundEvent` を JSON テキストフレームに変換して配送します。
//! 実際のソケットへの書き込みは接続ごとの送信タスクが行います。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::{Mutex, mpsc::UnboundedSender};

use crate::{
    domain::{ConnectionId, MessagePusher, OutboundEvent, PushError, Timestamp},
    infrastructure::dto::websocket::encode_server_event,
    ui::state::ClientInfo,
};

/// WebSocket 向け MessagePusher 実装
pub struct WebSocketMessagePusher {
    /// 接続中のクライアント情報（WebSocket sender を含む）
    connected_clients: Arc<Mutex<HashMap<ConnectionId, ClientInfo>>>,
}

impl WebSocketMessagePusher {
    /// 新しい WebSocketMessagePusher を作成
    pub fn new(connected_clients: Arc<Mutex<HashMap<ConnectionId, ClientInfo>>>) -> Self {
        Self { connected_clients }
    }

    /// 接続の送信チャンネルを登録
    pub async fn register(
        &self,
        connection_id: ConnectionId,
        sender: UnboundedSender<String>,
        connected_at: Timestamp,
    ) {
        let mut clients = self.connected_clients.lock().await;
        clients.insert(
            connection_id,
            ClientInfo {
                sender,
                connected_at,
            },
        );
    }

    /// 接続の送信チャンネルを登録解除し、登録時の情報を返す
    ///
    /// 登録されていなかった場合は `None` を返す
    pub async fn unregister(&self, connection_id: &ConnectionId) -> Option<ClientInfo> {
        let mut clients = self.connected_clients.lock().await;
        clients.remove(connection_id)
    }

    /// 接続中のクライアント数
    pub async fn count_connected_clients(&self) -> usize {
        let clients = self.connected_clients.lock().await;
        clients.len()
    }
}

impl Default for WebSocketMessagePusher {
    fn default() -> Self {
        Self::new(Arc::new(Mutex::new(HashMap::new())))
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn push_to(&self, target: &ConnectionId, event: OutboundEvent) -> Result<(), PushError> {
        let text = encode_server_event(event).map_err(|e| PushError::Encode(e.to_string()))?;

        let clients = self.connected_clients.lock().await;
        let client_info = clients
            .get(target)
            .ok_or_else(|| PushError::ConnectionNotFound(target.clone()))?;
        client_info
            .sender
            .send(text)
            .map_err(|_| PushError::ChannelClosed(target.clone()))
    }

    async fn broadcast(&self, targets: &[ConnectionId], event: OutboundEvent) -> usize {
        if targets.is_empty() {
            return 0;
        }

        let text = match encode_server_event(event) {
            Ok(text) => text,
            Err(e) => {
                tracing::error!("Failed to encode outbound event: {}", e);
                return 0;
            }
        };

        // 送信先ごとの失敗は他の送信先への配送を妨げない
        let clients = self.connected_clients.lock().await;
        let mut delivered = 0;
        for target_id in targets {
            match clients.get(target_id) {
                Some(client_info) if client_info.sender.send(text.clone()).is_ok() => {
                    delivered += 1;
                }
                Some(_) => {
                    tracing::warn!("Failed to send message to connection '{}'", target_id);
                }
                None => {
                    tracing::warn!("Connection '{}' is not registered, skipping", target_id);
                }
            }
        }
        delivered
    }
}

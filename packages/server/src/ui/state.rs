//! Server state and connection management.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::{
    domain::{MessagePusher, RoomRepository, Timestamp},
    infrastructure::{
        message_pusher::WebSocketMessagePusher, repository::InMemoryRoomRepository,
    },
    usecase::SessionCoordinator,
};

/// Client connection information
pub struct ClientInfo {
    /// Message sender channel
    pub sender: mpsc::UnboundedSender<String>,
    /// Unix timestamp when connected (UTC, milliseconds)
    pub connected_at: Timestamp,
}

/// Shared application state
pub struct AppState {
    /// Repository（データアクセス層の抽象化）
    pub repository: Arc<dyn RoomRepository>,
    /// Outbound channels of every live connection
    pub pusher: Arc<WebSocketMessagePusher>,
}

impl AppState {
    pub fn new(repository: Arc<dyn RoomRepository>, pusher: Arc<WebSocketMessagePusher>) -> Self {
        Self { repository, pusher }
    }

    /// Coordinator wired to this state's repository and pusher
    pub fn session_coordinator(&self) -> SessionCoordinator {
        let pusher: Arc<dyn MessagePusher> = self.pusher.clone();
        SessionCoordinator::new(self.repository.clone(), pusher)
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(
            Arc::new(InMemoryRoomRepository::default()),
            Arc::new(WebSocketMessagePusher::default()),
        )
    }
}

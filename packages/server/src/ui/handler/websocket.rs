//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use sketchroom_shared::time::get_utc_timestamp;
use tokio::sync::mpsc;

use crate::{
    domain::{ConnectionId, ConnectionIdFactory, Timestamp},
    infrastructure::dto::websocket::parse_client_event,
    ui::state::AppState,
    usecase::SessionCoordinator,
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let connection_id = match ConnectionIdFactory::generate() {
        Ok(id) => id,
        Err(e) => {
            tracing::error!("Failed to assign connection id: {}", e);
            return;
        }
    };

    // Create a channel for this connection to receive outbound events
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();
    state
        .pusher
        .register(
            connection_id.clone(),
            tx,
            Timestamp::new(get_utc_timestamp()),
        )
        .await;
    tracing::info!("Connection '{}' opened", connection_id);

    let (mut sender, mut receiver) = socket.split();
    let coordinator = Arc::new(state.session_coordinator());

    let recv_connection_id = connection_id.clone();
    let recv_coordinator = coordinator.clone();

    // Spawn a task to receive events from this connection
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::warn!("WebSocket error on '{}': {}", recv_connection_id, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    handle_text(&recv_coordinator, &recv_connection_id, text.as_str()).await;
                }
                Message::Close(_) => {
                    tracing::info!("Connection '{}' requested close", recv_connection_id);
                    break;
                }
                Message::Binary(_) => {
                    tracing::debug!("Ignoring binary frame from '{}'", recv_connection_id);
                }
                // Ping/pong is handled automatically by the WebSocket protocol
                _ => {}
            }
        }
    });

    // Spawn a task to forward queued outbound events to this connection
    let mut send_task = tokio::spawn(async move {
        while let Some(text) = rx.recv().await {
            if sender.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    // Room cleanup completes before the connection's channel is discarded
    coordinator.on_disconnect(&connection_id).await;
    match state.pusher.unregister(&connection_id).await {
        Some(client_info) => tracing::info!(
            "Connection '{}' closed after {} ms",
            connection_id,
            get_utc_timestamp() - client_info.connected_at.value()
        ),
        None => tracing::warn!("Connection '{}' was already unregistered", connection_id),
    }
}

async fn handle_text(
    coordinator: &SessionCoordinator,
    connection_id: &ConnectionId,
    text: &str,
) {
    match parse_client_event(text) {
        Ok(event) => coordinator.dispatch(connection_id, event).await,
        Err(e) => {
            // A bad frame is dropped; the session continues
            tracing::warn!("Dropping frame from '{}': {}", connection_id, e);
        }
    }
}

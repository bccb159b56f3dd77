//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use sketchroom_shared::time::timestamp_to_rfc3339;

use crate::{
    domain::{Room, RoomId},
    infrastructure::dto::http::{RoomDetailDto, RoomSummaryDto},
    ui::state::AppState,
};

/// Health check endpoint
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let connected_clients = state.pusher.count_connected_clients().await;
    Json(serde_json::json!({"status": "ok", "connected_clients": connected_clients}))
}

/// Get list of rooms
pub async fn get_rooms(State(state): State<Arc<AppState>>) -> Json<Vec<RoomSummaryDto>> {
    let rooms = state.repository.list_rooms().await;

    let summaries = rooms
        .iter()
        .map(|room| RoomSummaryDto {
            id: room.id.as_str().to_string(),
            member_count: room.member_count(),
            has_snapshot: room.snapshot().is_some(),
            created_at: timestamp_to_rfc3339(room.created_at.value()),
        })
        .collect();

    Json(summaries)
}

/// Get room detail by ID
pub async fn get_room_detail(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> Result<Json<RoomDetailDto>, StatusCode> {
    let room_id = RoomId::try_from(room_id).map_err(|_| StatusCode::NOT_FOUND)?;
    let room = state
        .repository
        .get_room(&room_id)
        .await
        .ok_or(StatusCode::NOT_FOUND)?;

    Ok(Json(room_detail(&room)))
}

fn room_detail(room: &Room) -> RoomDetailDto {
    RoomDetailDto {
        id: room.id.as_str().to_string(),
        members: room
            .member_ids()
            .into_iter()
            .map(|id| id.into_string())
            .collect(),
        has_snapshot: room.snapshot().is_some(),
        created_at: timestamp_to_rfc3339(room.created_at.value()),
    }
}

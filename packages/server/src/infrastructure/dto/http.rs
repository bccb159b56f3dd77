//! HTTP API response DTOs for the drawing relay.

use serde::{Deserialize, Serialize};

/// Room summary for list endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomSummaryDto {
    pub id: String,
    pub member_count: usize,
    pub has_snapshot: bool,
    pub created_at: String, // RFC 3339
}

/// Room detail for detail endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomDetailDto {
    pub id: String,
    pub members: Vec<String>,
    pub has_snapshot: bool,
    pub created_at: String, // RFC 3339
}

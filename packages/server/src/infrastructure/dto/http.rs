//! HTTP API response DTOs.

use serde::Serialize;

/// Summary of a room for the rooms list endpoint
#[derive(Debug, Serialize)]
pub struct RoomSummaryDto {
    pub name: String,
    pub members: Vec<String>,
    pub created_at: String,
}

/// Member detail for the room detail endpoint
#[derive(Debug, Serialize)]
pub struct MemberDetailDto {
    pub name: String,
    pub joined_at: String,
}

/// Room detail for the room detail endpoint
#[derive(Debug, Serialize)]
pub struct RoomDetailDto {
    pub name: String,
    pub members: Vec<MemberDetailDto>,
    pub created_at: String,
    pub message_count: usize,
}

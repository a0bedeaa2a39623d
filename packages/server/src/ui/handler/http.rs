//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    domain::RoomName,
    infrastructure::dto::http::{MemberDetailDto, RoomDetailDto, RoomSummaryDto},
    ui::state::AppState,
    usecase::GetRoomDetailError,
};
use idobata_shared::time::timestamp_to_rfc3339;

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Get list of rooms
pub async fn get_rooms(State(state): State<Arc<AppState>>) -> Json<Vec<RoomSummaryDto>> {
    let rooms = state.get_rooms_usecase.execute().await;

    // Domain Model から DTO への変換
    let room_summaries: Vec<RoomSummaryDto> = rooms
        .into_iter()
        .map(|room| RoomSummaryDto {
            name: room.name.as_str().to_string(),
            members: room
                .members
                .iter()
                .map(|m| m.name.as_str().to_string())
                .collect(),
            created_at: timestamp_to_rfc3339(room.created_at.value()),
        })
        .collect();

    Json(room_summaries)
}

/// Get room detail by name
pub async fn get_room_detail(
    State(state): State<Arc<AppState>>,
    Path(room): Path<String>,
) -> Result<Json<RoomDetailDto>, StatusCode> {
    match state
        .get_room_detail_usecase
        .execute(&RoomName::parse(room))
        .await
    {
        Ok((room, history)) => {
            // Domain Model から DTO への変換
            let room_detail = RoomDetailDto {
                name: room.name.as_str().to_string(),
                members: room
                    .members
                    .iter()
                    .map(|m| MemberDetailDto {
                        name: m.name.as_str().to_string(),
                        joined_at: timestamp_to_rfc3339(m.joined_at.value()),
                    })
                    .collect(),
                created_at: timestamp_to_rfc3339(room.created_at.value()),
                message_count: history.len(),
            };
            Ok(Json(room_detail))
        }
        Err(GetRoomDetailError::RoomNotFound) => Err(StatusCode::NOT_FOUND),
    }
}

/// Debug endpoint to get current room state and history (for testing purposes)
pub async fn debug_room_state(
    State(state): State<Arc<AppState>>,
    Path(room): Path<String>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    match state
        .get_room_detail_usecase
        .execute(&RoomName::parse(room))
        .await
    {
        Ok((room, history)) => Ok(Json(serde_json::json!({
            "room": room,
            "history": history,
        }))),
        Err(GetRoomDetailError::RoomNotFound) => Err(StatusCode::NOT_FOUND),
    }
}

//! Conversion logic between DTOs and domain entities.

use crate::domain::ChatMessage;
use crate::infrastructure::dto::websocket as dto;

// ========================================
// Domain Entity → DTO
// ========================================

impl From<ChatMessage> for dto::WireMessage {
    fn from(model: ChatMessage) -> Self {
        Self {
            message: model.body.into_string(),
            name: model.sender.into_string(),
            timestamp: Some(model.timestamp.value()),
        }
    }
}

impl From<&ChatMessage> for dto::WireMessage {
    fn from(model: &ChatMessage) -> Self {
        model.clone().into()
    }
}

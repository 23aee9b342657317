//! Conversion logic between DTOs and domain types.

use crate::domain::Message;
use crate::infrastructure::dto::websocket as dto;

// ========================================
// DTO → Domain
// ========================================

impl From<dto::MessageDto> for Message {
    fn from(dto: dto::MessageDto) -> Self {
        Message::new(dto.sender, dto.text)
    }
}

// ========================================
// Domain → DTO
// ========================================

impl From<Message> for dto::MessageDto {
    fn from(model: Message) -> Self {
        let (sender, text) = model.into_parts();
        Self { sender, text }
    }
}

//! Domain model for chat.

mod error;
mod ids;
mod message;
mod room;

pub use error::ChatDomainError;
pub use ids::{ChatMessageId, RoomId};
pub use message::ChatMessage;
pub use room::ChatRoom;

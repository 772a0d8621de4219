//! Chat orchestration services.

mod rooms;

pub use rooms::{
    ChatService, ChatServiceError, ChatServiceResult, CreateRoomRequest, RoomSummary, RoomView,
};

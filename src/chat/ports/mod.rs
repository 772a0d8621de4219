//! Port contracts for chat.

mod repository;

pub use repository::{ChatRepository, ChatRepositoryError, ChatRepositoryResult};

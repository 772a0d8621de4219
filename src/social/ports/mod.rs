//! Port contracts for issue engagement.

mod repository;

pub use repository::{EngagementRepository, EngagementRepositoryError, EngagementRepositoryResult};

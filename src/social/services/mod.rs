//! Engagement orchestration services.

mod engagement;

pub use engagement::{EngagementService, SocialServiceError, SocialServiceResult};

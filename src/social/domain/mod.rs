//! Domain model for issue engagement.

mod comment;
mod error;
mod ids;
mod mention;
mod toggle;

pub use comment::{Comment, CommentBody, CommentThread};
pub use error::SocialDomainError;
pub use ids::CommentId;
pub use mention::extract_mentions;
pub use toggle::{EngagementSnapshot, LikeToggle};

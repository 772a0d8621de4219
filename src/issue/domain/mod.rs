//! Domain model for issues, leaders and hashtags.
//!
//! All resolution rules live here and are free of persistence concerns.

mod error;
mod hashtag;
mod ids;
mod issue;
mod leader;
mod location;
mod status;

pub use error::{IssueDomainError, ParseIssueStatusError};
pub use hashtag::{Hashtag, HashtagName, extract_hashtags};
pub use ids::{IssueId, LeaderId};
pub use issue::{Issue, IssueDraft, IssueTitle, PersistedIssueData};
pub use leader::{Leader, PersistedLeaderData};
pub use location::Location;
pub use status::{IssueStatus, ResolutionFlags, StatusTransition};

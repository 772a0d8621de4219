//! Port contracts for issue reporting and resolution.
//!
//! Issues, leaders and hashtags share one store because resolving an issue
//! must update the issue and credit its leader in a single write.

pub mod repository;

pub use repository::{
    HashtagRepository, IssueRepository, IssueRepositoryError, IssueRepositoryResult,
    IssueStore, LeaderRepository,
};

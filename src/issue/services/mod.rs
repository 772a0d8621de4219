//! Issue orchestration services.

mod error;
mod leaders;
mod reporting;
mod resolution;

pub use error::{IssueServiceError, IssueServiceResult};
pub use leaders::{LeaderService, RegisterLeaderRequest};
pub use reporting::{FlagOutcome, HashtagIssues, IssueReportingService, SubmitIssueRequest};
pub use resolution::{ResolutionOutcome, ResolutionService};

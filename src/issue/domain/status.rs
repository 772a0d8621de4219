//! Resolution status and its derivation from the confirmation flags.

use super::ParseIssueStatusError;
use serde::{Deserialize, Serialize};

/// Issue resolution status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueStatus {
    /// Reported and awaiting the tagged leader.
    Open,
    /// Resolved by the leader, awaiting the citizen's confirmation.
    PendingConfirm,
    /// Resolved and confirmed.
    Solved,
}

impl IssueStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::PendingConfirm => "pending_confirm",
            Self::Solved => "solved",
        }
    }

    /// Returns the human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::PendingConfirm => "Pending Confirmation",
            Self::Solved => "Solved",
        }
    }
}

impl TryFrom<&str> for IssueStatus {
    type Error = ParseIssueStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "open" => Ok(Self::Open),
            "pending_confirm" => Ok(Self::PendingConfirm),
            "solved" => Ok(Self::Solved),
            _ => Err(ParseIssueStatusError(value.to_owned())),
        }
    }
}

/// The two independent confirmations that drive resolution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResolutionFlags {
    /// Set once the tagged leader marks the issue resolved.
    pub leader_resolved: bool,
    /// Set once the reporting citizen confirms the resolution.
    pub user_confirmed: bool,
}

impl ResolutionFlags {
    /// Derives the status implied by the flags.
    ///
    /// Solved requires both flags; a citizen confirmation on its own leaves
    /// the issue open.
    #[must_use]
    pub const fn derive_status(self) -> IssueStatus {
        match (self.leader_resolved, self.user_confirmed) {
            (true, true) => IssueStatus::Solved,
            (true, false) => IssueStatus::PendingConfirm,
            (false, _) => IssueStatus::Open,
        }
    }
}

/// A change of status produced by a flag update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusTransition {
    /// Status before the update.
    pub from: IssueStatus,
    /// Status after the update.
    pub to: IssueStatus,
}

impl StatusTransition {
    /// Returns `true` when this transition enters [`IssueStatus::Solved`],
    /// which is the only point where the tagged leader is credited.
    #[must_use]
    pub const fn is_solve(self) -> bool {
        matches!(self.to, IssueStatus::Solved) && !matches!(self.from, IssueStatus::Solved)
    }
}

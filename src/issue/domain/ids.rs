//! Identifier types for the issue domain.

crate::id::uuid_id! {
    /// Unique identifier for a reported issue.
    IssueId
}

crate::id::uuid_id! {
    /// Unique identifier for a civic leader.
    LeaderId
}

//! Identifier types for the account domain.

crate::id::uuid_id! {
    /// Unique identifier for a registered user account.
    UserId
}

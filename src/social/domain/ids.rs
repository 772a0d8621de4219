//! Identifier types for the social layer.

crate::id::uuid_id! {
    /// Unique comment identifier.
    CommentId
}

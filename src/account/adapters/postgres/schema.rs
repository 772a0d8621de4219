//! Diesel schema for account persistence.

diesel::table! {
    /// Registered users.
    users (id) {
        /// User identifier.
        id -> Uuid,
        /// Login name as registered.
        #[max_length = 150]
        username -> Varchar,
        /// Case-folded login name, unique across users.
        username_key -> Text,
        /// Optional email address.
        email -> Nullable<Text>,
        /// Registration timestamp.
        joined_at -> Timestamptz,
    }
}

diesel::table! {
    /// Citizen profiles, one per user.
    profiles (user_id) {
        /// Owning user.
        user_id -> Uuid,
        /// Display name.
        real_name -> Text,
        /// Contact address.
        contact_email -> Text,
        /// Free-text biography.
        #[max_length = 500]
        bio -> Varchar,
        /// Reputation score.
        reputation -> Int8,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Follow relations.
    follows (follower_id, followee_id) {
        /// Following user.
        follower_id -> Uuid,
        /// Followed user.
        followee_id -> Uuid,
    }
}

diesel::joinable!(profiles -> users (user_id));
diesel::allow_tables_to_appear_in_same_query!(users, profiles, follows);

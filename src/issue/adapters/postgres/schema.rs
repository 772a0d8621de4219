//! Diesel schema for issue persistence.

diesel::table! {
    /// Civic leaders and their solved counters.
    leaders (id) {
        /// Leader identifier.
        id -> Uuid,
        /// Display name.
        #[max_length = 100]
        name -> Varchar,
        /// Office held.
        #[max_length = 100]
        designation -> Varchar,
        /// Solved issue counter.
        solved_problems -> Int8,
        /// Profile picture URL.
        profile_picture -> Nullable<Text>,
        /// Linked login account.
        account_id -> Nullable<Uuid>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Reported issues.
    issues (id) {
        /// Issue identifier.
        id -> Uuid,
        /// Title.
        #[max_length = 200]
        title -> Varchar,
        /// Description.
        description -> Text,
        /// Optional image URL.
        image_url -> Nullable<Text>,
        /// Latitude in degrees.
        latitude -> Float8,
        /// Longitude in degrees.
        longitude -> Float8,
        /// Reporting user.
        reporter_id -> Uuid,
        /// Tagged leader.
        leader_id -> Uuid,
        /// Derived status, stored for querying.
        #[max_length = 20]
        status -> Varchar,
        /// Leader confirmation flag.
        is_leader_resolved -> Bool,
        /// Reporter confirmation flag.
        is_user_confirmed -> Bool,
        /// Community flag counter.
        flag_count -> Int8,
        /// Users whose flag was counted.
        flagged_by -> Array<Uuid>,
        /// Optimistic concurrency version.
        version -> Int8,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Hashtag usage counters.
    hashtags (name) {
        /// Case-folded name without `#`.
        #[max_length = 100]
        name -> Varchar,
        /// Number of distinct tagged issues.
        usage_count -> Int8,
    }
}

diesel::table! {
    /// Hashtag to issue pairings.
    issue_hashtags (hashtag, issue_id) {
        /// Hashtag name.
        #[max_length = 100]
        hashtag -> Varchar,
        /// Tagged issue.
        issue_id -> Uuid,
    }
}

diesel::joinable!(issues -> leaders (leader_id));
diesel::joinable!(issue_hashtags -> issues (issue_id));
diesel::joinable!(issue_hashtags -> hashtags (hashtag));
diesel::allow_tables_to_appear_in_same_query!(leaders, issues, hashtags, issue_hashtags);

//! `PostgreSQL` adapter for issue, leader and hashtag persistence.

mod models;
mod repository;
mod schema;

pub use repository::{IssuePgPool, PostgresIssueStore};

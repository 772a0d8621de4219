//! `PostgreSQL` notification adapter.

mod models;
mod repository;
mod schema;

pub use repository::{NotificationPgPool, PostgresNotificationRepository};

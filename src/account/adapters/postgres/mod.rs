//! `PostgreSQL` adapter for users, profiles and follow relationships.

mod models;
mod repository;
mod schema;

pub use repository::{AccountPgPool, PostgresAccountRepository};

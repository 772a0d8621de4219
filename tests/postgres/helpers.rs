//! Shared test helpers for `PostgreSQL` integration tests.

pub use super::cluster::{PostgresCluster, postgres_cluster};
use civic_resolve::issue::adapters::postgres::IssuePgPool;
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use eyre::{Result, WrapErr};
use mockable::DefaultClock;
use rstest::fixture;
use std::sync::Arc;
use tokio::runtime::Runtime;
use uuid::Uuid;

/// SQL creating the issue, leader and hashtag tables.
pub const CREATE_ISSUE_TABLES_SQL: &str =
    include_str!("../../migrations/2026-10-16-000000_create_issue_tables/up.sql");

/// SQL creating the account and notification tables.
pub const CREATE_ACCOUNT_TABLES_SQL: &str = include_str!(
    "../../migrations/2026-10-16-000001_create_account_and_notification_tables/up.sql"
);

/// Template database name for the pre-migrated schema.
pub const TEMPLATE_DB: &str = "civic_resolve_test_template";

/// Builds the single-threaded runtime the synchronous tests drive.
pub fn test_runtime() -> Result<Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("build test runtime")
}

fn apply_migrations(url: &str) -> Result<()> {
    let mut conn = PgConnection::establish(url).wrap_err("connect to template")?;
    conn.batch_execute(CREATE_ISSUE_TABLES_SQL)
        .wrap_err("create issue tables")?;
    conn.batch_execute(CREATE_ACCOUNT_TABLES_SQL)
        .wrap_err("create account tables")?;
    Ok(())
}

/// Drops the per-test database when the test ends.
pub struct CleanupGuard {
    cluster: PostgresCluster,
    db_name: String,
}

impl Drop for CleanupGuard {
    fn drop(&mut self) {
        drop(self.cluster.drop_database(&self.db_name));
    }
}

/// A freshly migrated database with a pool and a runtime to drive it.
pub struct PgContext {
    /// Pool over the per-test database.
    pub pool: IssuePgPool,
    /// Runtime for `block_on`.
    pub rt: Runtime,
    /// Clock shared with domain constructors.
    pub clock: Arc<DefaultClock>,
    _guard: CleanupGuard,
}

/// Provides a per-test database cloned from the migrated template, or
/// `None` when no cluster is available.
#[fixture]
pub fn pg_context(postgres_cluster: Option<PostgresCluster>) -> Result<Option<PgContext>> {
    let Some(cluster) = postgres_cluster else {
        return Ok(None);
    };
    cluster.ensure_template_exists(TEMPLATE_DB, apply_migrations)?;
    let db_name = format!("test_{}", Uuid::new_v4().simple());
    cluster.create_database_from_template(&db_name, TEMPLATE_DB)?;
    let guard = CleanupGuard {
        cluster,
        db_name: db_name.clone(),
    };
    let manager = ConnectionManager::<PgConnection>::new(cluster.database_url(&db_name));
    let pool = Pool::builder()
        .max_size(2)
        .build(manager)
        .wrap_err("build connection pool")?;
    Ok(Some(PgContext {
        pool,
        rt: test_runtime()?,
        clock: Arc::new(DefaultClock),
        _guard: guard,
    }))
}

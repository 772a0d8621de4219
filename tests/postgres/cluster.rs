//! Cluster lifecycle helpers for `PostgreSQL` integration tests.

use super::helpers::test_runtime;
use crate::test_helpers::EnvVarGuard;
use cap_std::ambient_authority;
use cap_std::fs::Dir;
use diesel::prelude::*;
use eyre::{OptionExt, Result, WrapErr};
use pg_embedded_setup_unpriv::worker_process_test_api::{
    WorkerOperation, WorkerRequest, WorkerRequestArgs, run as run_worker,
};
use pg_embedded_setup_unpriv::{ExecutionPrivileges, TestBootstrapSettings, bootstrap_for_tests};
use postgresql_embedded::{PostgreSQL, Settings, Status};
use rstest::fixture;
use std::ffi::{OsStr, OsString};
use std::net::TcpListener;
use std::path::Path;
use std::sync::{Mutex, OnceLock};
use std::time::Duration;
use tokio::runtime::Runtime;

static SHARED_CLUSTER: OnceLock<Option<ManagedCluster>> = OnceLock::new();
static TEMPLATE_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

/// Shared `PostgreSQL` cluster handle for integration tests.
pub type PostgresCluster = &'static ManagedCluster;

/// Managed embedded `PostgreSQL` cluster for test lifecycles.
pub struct ManagedCluster {
    bootstrap: TestBootstrapSettings,
    env_vars: Vec<(String, Option<String>)>,
    runtime: Option<Runtime>,
    postgres: Option<PostgreSQL>,
}

impl ManagedCluster {
    fn new() -> Result<Self> {
        let port_env = port_env_changes()?;
        let port_guard = EnvVarGuard::set_many(&port_env);
        let mut bootstrap = bootstrap_for_tests().wrap_err("bootstrap embedded cluster")?;
        drop(port_guard);
        sync_password_from_file(&mut bootstrap.settings)?;
        let env_vars = bootstrap.environment.to_env();
        let mut cluster = Self {
            bootstrap,
            env_vars,
            runtime: None,
            postgres: None,
        };
        cluster.start()?;
        Ok(cluster)
    }

    /// Returns the connection URL for `database`.
    #[must_use]
    pub fn database_url(&self, database: &str) -> String {
        self.bootstrap.settings.url(database)
    }

    /// Clones `template` into a new database.
    pub fn create_database_from_template(&self, db_name: &str, template: &str) -> Result<()> {
        let sql = format!(
            "CREATE DATABASE {} TEMPLATE {}",
            quote_identifier(db_name),
            quote_identifier(template),
        );
        self.execute_admin_sql(&sql)
    }

    /// Drops `db_name`, closing any connections still open on it.
    pub fn drop_database(&self, db_name: &str) -> Result<()> {
        let sql = format!(
            "DROP DATABASE IF EXISTS {} WITH (FORCE)",
            quote_identifier(db_name)
        );
        self.execute_admin_sql(&sql)
    }

    /// Creates and migrates `template` once per cluster.
    pub fn ensure_template_exists<F>(&self, template: &str, migrate: F) -> Result<()>
    where
        F: FnOnce(&str) -> Result<()>,
    {
        let lock = TEMPLATE_LOCK.get_or_init(|| Mutex::new(()));
        let _guard = lock
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        if self.database_exists(template)? {
            return Ok(());
        }

        self.create_database(template)?;
        if let Err(err) = migrate(&self.database_url(template)) {
            self.drop_database(template)?;
            return Err(err);
        }
        Ok(())
    }

    fn start(&mut self) -> Result<()> {
        match self.bootstrap.privileges {
            ExecutionPrivileges::Root => self.start_via_worker(),
            ExecutionPrivileges::Unprivileged => self.start_in_process(),
        }
    }

    fn start_in_process(&mut self) -> Result<()> {
        let runtime = test_runtime()?;
        let env_guard = EnvVarGuard::set_many(&env_vars_to_os(&self.env_vars));
        let mut postgres = PostgreSQL::new(self.bootstrap.settings.clone());
        runtime.block_on(async {
            postgres.setup().await.wrap_err("install PostgreSQL")?;
            if !matches!(postgres.status(), Status::Started) {
                postgres.start().await.wrap_err("start PostgreSQL")?;
            }
            Ok::<(), eyre::Report>(())
        })?;
        drop(env_guard);
        self.bootstrap.settings = postgres.settings().clone();
        sync_port_from_pid(&mut self.bootstrap.settings)?;
        self.runtime = Some(runtime);
        self.postgres = Some(postgres);
        Ok(())
    }

    fn start_via_worker(&mut self) -> Result<()> {
        self.run_worker_operation(WorkerOperation::Setup, self.bootstrap.setup_timeout)?;
        self.run_worker_operation(WorkerOperation::Start, self.bootstrap.start_timeout)?;
        sync_port_from_pid(&mut self.bootstrap.settings)?;
        Ok(())
    }

    fn run_worker_operation(&self, operation: WorkerOperation, timeout: Duration) -> Result<()> {
        let worker = self
            .bootstrap
            .worker_binary
            .as_ref()
            .ok_or_eyre("PG_EMBEDDED_WORKER must name the worker binary when running as root")?;
        let args = WorkerRequestArgs {
            worker: worker.as_path(),
            settings: &self.bootstrap.settings,
            env_vars: &self.env_vars,
            operation,
            timeout,
        };
        run_worker(&WorkerRequest::new(args)).wrap_err("run PostgreSQL worker")?;
        Ok(())
    }

    fn execute_admin_sql(&self, sql: &str) -> Result<()> {
        let mut conn = PgConnection::establish(&self.database_url("postgres"))
            .wrap_err("connect to admin database")?;
        diesel::sql_query(sql)
            .execute(&mut conn)
            .wrap_err_with(|| format!("execute `{sql}`"))?;
        Ok(())
    }

    fn create_database(&self, db_name: &str) -> Result<()> {
        let sql = format!("CREATE DATABASE {}", quote_identifier(db_name));
        self.execute_admin_sql(&sql)
    }

    fn database_exists(&self, db_name: &str) -> Result<bool> {
        #[derive(diesel::QueryableByName)]
        struct ExistsRow {
            #[diesel(sql_type = diesel::sql_types::Bool)]
            exists: bool,
        }

        let mut conn = PgConnection::establish(&self.database_url("postgres"))
            .wrap_err("connect to admin database")?;
        let row = diesel::sql_query(
            "SELECT EXISTS (SELECT 1 FROM pg_database WHERE datname = $1) AS exists",
        )
        .bind::<diesel::sql_types::Text, _>(db_name)
        .get_result::<ExistsRow>(&mut conn)?;
        Ok(row.exists)
    }
}

impl Drop for ManagedCluster {
    fn drop(&mut self) {
        let (Some(postgres), Some(runtime)) = (self.postgres.take(), &self.runtime) else {
            return;
        };
        drop(runtime.block_on(postgres.stop()));
    }
}

/// Provides the shared cluster, or `None` when it cannot be started here.
#[fixture]
pub fn postgres_cluster() -> Option<PostgresCluster> {
    SHARED_CLUSTER
        .get_or_init(|| match ManagedCluster::new() {
            Ok(cluster) => Some(cluster),
            Err(err) => {
                report_unavailable(&err);
                None
            }
        })
        .as_ref()
}

#[expect(clippy::print_stderr, reason = "skipped suites must say why")]
fn report_unavailable(err: &eyre::Report) {
    eprintln!("PostgreSQL tests skipped: {err:#}");
}

fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn env_vars_to_os(env_vars: &[(String, Option<String>)]) -> Vec<(OsString, Option<OsString>)> {
    env_vars
        .iter()
        .map(|(key, value)| (OsString::from(key), value.as_ref().map(OsString::from)))
        .collect()
}

fn port_env_changes() -> Result<Vec<(OsString, Option<OsString>)>> {
    if std::env::var_os("PG_PORT").is_some() {
        return Ok(Vec::new());
    }
    let listener = TcpListener::bind(("127.0.0.1", 0))?;
    let port = listener.local_addr()?.port();
    drop(listener);
    Ok(vec![(
        OsString::from("PG_PORT"),
        Some(OsString::from(port.to_string())),
    )])
}

fn open_ambient_dir(path: &Path) -> Result<Dir> {
    Dir::open_ambient_dir(path, ambient_authority())
        .wrap_err_with(|| format!("open {}", path.display()))
}

fn open_parent_dir(path: &Path) -> Result<(Dir, &OsStr)> {
    let file_name = path.file_name().ok_or_eyre("path must include a file name")?;
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    Ok((open_ambient_dir(parent)?, file_name))
}

fn sync_password_from_file(settings: &mut Settings) -> Result<()> {
    let password_file = settings.password_file.clone();
    let (dir, file_name) = open_parent_dir(&password_file)?;
    match dir.read_to_string(file_name) {
        Ok(contents) => {
            let password = contents.trim_end();
            if !password.is_empty() {
                password.clone_into(&mut settings.password);
            }
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
        Err(err) => return Err(err.into()),
    }
    Ok(())
}

fn sync_port_from_pid(settings: &mut Settings) -> Result<()> {
    let data_dir = open_ambient_dir(&settings.data_dir)?;
    let contents = match data_dir.read_to_string("postmaster.pid") {
        Ok(contents) => contents,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(err) => return Err(err.into()),
    };

    // The fourth line of postmaster.pid holds the listening port.
    let Some(Ok(port)) = contents.lines().nth(3).map(|line| line.trim().parse::<u16>()) else {
        return Ok(());
    };
    settings.port = port;
    Ok(())
}

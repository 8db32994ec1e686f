//! Database handle with a one-time connect-and-migrate setup.
//!
//! `Database` is built explicitly at startup and shared through the HTTP state.
//! The first `connection()` call runs setup; concurrent callers wait for it and
//! then see the finished connection.

use std::future::Future;
use std::time::Duration;

use migration::MigratorTrait;
use sea_orm::{ConnectOptions, DatabaseConnection};
use tokio::sync::OnceCell;
use tracing::{info, warn};

use crate::errors::ModelError;

pub use configs::DatabaseConfig;

pub async fn connect_with_config(cfg: &DatabaseConfig) -> Result<DatabaseConnection, ModelError> {
    let mut opt = ConnectOptions::new(cfg.url.clone());
    opt.max_connections(cfg.max_connections)
        .min_connections(cfg.min_connections)
        .connect_timeout(Duration::from_secs(cfg.connect_timeout_secs))
        .acquire_timeout(Duration::from_secs(cfg.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(cfg.idle_timeout_secs))
        .max_lifetime(Duration::from_secs(cfg.max_lifetime_secs))
        .sqlx_logging(cfg.sqlx_logging);
    Ok(sea_orm::Database::connect(opt).await?)
}

/// Runs an async setup routine at most once to completion.
///
/// Backed by `tokio::sync::OnceCell`, whose internal semaphore serializes the
/// check-then-create sequence. A failed setup leaves the gate empty.
pub struct SetupGate<T> {
    cell: OnceCell<T>,
}

impl<T> SetupGate<T> {
    pub const fn new() -> Self {
        Self { cell: OnceCell::const_new() }
    }

    pub async fn get_or_setup<F, Fut, E>(&self, setup: F) -> Result<&T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        self.cell.get_or_try_init(setup).await
    }

    pub fn get(&self) -> Option<&T> {
        self.cell.get()
    }
}

impl<T> Default for SetupGate<T> {
    fn default() -> Self {
        Self::new()
    }
}

pub struct Database {
    config: DatabaseConfig,
    gate: SetupGate<DatabaseConnection>,
}

impl Database {
    pub fn new(config: DatabaseConfig) -> Self {
        Self { config, gate: SetupGate::new() }
    }

    /// Shared connection, running connect + migrate on first use.
    pub async fn connection(&self) -> Result<&DatabaseConnection, ModelError> {
        self.gate
            .get_or_setup(|| async {
                info!(event = "db_setup_start", max_connections = self.config.max_connections, "connecting to database");
                let conn = connect_with_config(&self.config).await.map_err(|e| {
                    warn!(event = "db_setup_failed", error = %e, "database connect failed");
                    e
                })?;
                if self.config.run_migrations {
                    migration::Migrator::up(&conn, None).await?;
                    info!(event = "db_migrated", "migrations applied");
                }
                info!(event = "db_setup_done", "database ready");
                Ok::<_, ModelError>(conn)
            })
            .await
    }

    #[cfg(test)]
    fn is_initialized(&self) -> bool {
        self.gate.get().is_some()
    }
}

//! Connection pool setup, schema migrations, and liveness checks.

use std::time::Duration;

use oppfinder_core::AppConfig;
use sqlx::{migrate::Migrator, postgres::PgPoolOptions, PgPool};

use crate::DbError;

// Relative to crates/oppfinder-db/Cargo.toml.
static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// Sizing for the shared Postgres pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolConfig {
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: 10,
            min_connections: 1,
            acquire_timeout_secs: 10,
        }
    }
}

impl PoolConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            max_connections: config.db_max_connections,
            min_connections: config.db_min_connections,
            acquire_timeout_secs: config.db_acquire_timeout_secs,
        }
    }

    /// Pool options for this sizing. The pool always allows one connection,
    /// and the idle floor never exceeds the ceiling.
    #[must_use]
    pub fn options(&self) -> PgPoolOptions {
        let max = self.max_connections.max(1);
        PgPoolOptions::new()
            .max_connections(max)
            .min_connections(self.min_connections.min(max))
            .acquire_timeout(Duration::from_secs(self.acquire_timeout_secs))
    }
}

/// Open a pool against `database_url`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if no connection can be established.
pub async fn connect_pool(database_url: &str, config: PoolConfig) -> Result<PgPool, DbError> {
    let pool = config.options().connect(database_url).await?;
    tracing::debug!(
        max = config.max_connections,
        min = config.min_connections,
        "postgres pool ready"
    );
    Ok(pool)
}

/// Apply every embedded migration the database has not recorded yet.
///
/// Returns how many were pending before the run.
///
/// # Errors
///
/// Returns [`DbError::Migration`] if a migration fails or the recorded
/// history conflicts with the embedded files.
pub async fn run_migrations(pool: &PgPool) -> Result<usize, DbError> {
    // A fresh database has no _sqlx_migrations table yet.
    let recorded = sqlx::query_scalar::<_, i64>("SELECT version FROM _sqlx_migrations WHERE success")
        .fetch_all(pool)
        .await
        .unwrap_or_default();
    let pending = pending_migrations(embedded_versions(), &recorded);

    MIGRATOR.run(pool).await?;
    Ok(pending)
}

/// Round-trip a trivial query to prove the pool can reach Postgres.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn health_check(pool: &PgPool) -> Result<(), DbError> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

fn embedded_versions() -> impl Iterator<Item = i64> {
    MIGRATOR
        .iter()
        .filter(|m| !m.migration_type.is_down_migration())
        .map(|m| m.version)
}

fn pending_migrations(embedded: impl IntoIterator<Item = i64>, recorded: &[i64]) -> usize {
    embedded
        .into_iter()
        .filter(|version| !recorded.contains(version))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_sizing() {
        assert_eq!(
            PoolConfig::default(),
            PoolConfig {
                max_connections: 10,
                min_connections: 1,
                acquire_timeout_secs: 10,
            }
        );
    }

    #[test]
    fn options_cap_idle_floor_at_ceiling() {
        let options = PoolConfig {
            max_connections: 2,
            min_connections: 5,
            acquire_timeout_secs: 3,
        }
        .options();

        assert_eq!(options.get_max_connections(), 2);
        assert_eq!(options.get_min_connections(), 2);
        assert_eq!(options.get_acquire_timeout(), Duration::from_secs(3));
    }

    #[test]
    fn options_allow_at_least_one_connection() {
        let options = PoolConfig {
            max_connections: 0,
            min_connections: 0,
            acquire_timeout_secs: 1,
        }
        .options();

        assert_eq!(options.get_max_connections(), 1);
        assert_eq!(options.get_min_connections(), 0);
    }

    #[test]
    fn fresh_database_has_every_migration_pending() {
        let embedded: Vec<i64> = embedded_versions().collect();

        assert!(embedded.contains(&20_240_601_000_000));
        assert_eq!(pending_migrations(embedded.clone(), &[]), embedded.len());
        assert_eq!(pending_migrations(embedded.clone(), &embedded), 0);
    }

    #[test]
    fn only_unrecorded_versions_count_as_pending() {
        assert_eq!(pending_migrations([1, 2, 3], &[1, 3, 99]), 1);
    }
}

//! Postgres storage for scored opportunities and raw pain-point signals.

use thiserror::Error;

pub mod opportunities;
pub mod pain_points;
mod pool;
pub mod repository;

pub use opportunities::{get_opportunity, insert_opportunity, list_opportunities, OpportunityRow};
pub use pain_points::{insert_pain_point, list_recent_pain_points, PainPointRow};
pub use pool::{connect_pool, health_check, run_migrations, PoolConfig};
pub use repository::PgOpportunityRepository;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("record not found")]
    NotFound,
    #[error("stored row {id} is not a valid opportunity: {reason}")]
    Decode { id: i64, reason: String },
    #[error("opportunity already saved with id {0}")]
    AlreadySaved(i64),
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
    #[error(transparent)]
    Migration(#[from] sqlx::migrate::MigrateError),
}

//! Database operations for the `pain_points` table.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::DbError;

/// A row from the `pain_points` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PainPointRow {
    pub id: i64,
    pub source: String,
    pub text: String,
    pub url: Option<String>,
    /// The schema defines this as `INTEGER NOT NULL DEFAULT 1`.
    pub mentions: i32,
    pub created_at: DateTime<Utc>,
}

/// Append a raw pain point and return its generated id. No deduplication.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn insert_pain_point(
    pool: &PgPool,
    source: &str,
    text: &str,
    url: Option<&str>,
) -> Result<i64, DbError> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO pain_points (source, text, url) \
         VALUES ($1, $2, $3) \
         RETURNING id",
    )
    .bind(source)
    .bind(text)
    .bind(url)
    .fetch_one(pool)
    .await?;

    Ok(id)
}

/// List the most recent pain points, newest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_recent_pain_points(
    pool: &PgPool,
    limit: i64,
) -> Result<Vec<PainPointRow>, DbError> {
    let rows = sqlx::query_as::<_, PainPointRow>(
        "SELECT id, source, text, url, mentions, created_at \
         FROM pain_points \
         ORDER BY created_at DESC, id DESC \
         LIMIT $1",
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

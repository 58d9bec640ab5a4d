//! Database operations for the `opportunities` table.

use chrono::{DateTime, Utc};
use oppfinder_core::{BuildComplexity, Opportunity, OpportunityRecord};
use serde_json::Value;
use sqlx::PgPool;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row type
// ---------------------------------------------------------------------------

/// A row from the `opportunities` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OpportunityRow {
    pub id: i64,
    pub title: String,
    pub problem: String,
    /// `SMALLINT` constrained to 0..=100 by the schema.
    pub score: i16,
    pub mentions: i64,
    pub revenue: String,
    pub revenue_amount: i64,
    pub competitors: i64,
    pub competition_level: String,
    pub build_complexity: String,
    /// JSON array of source labels, in theme order.
    pub sources: Value,
    pub example: String,
    pub validated: bool,
    pub recommendation: String,
    pub market_size: String,
    pub created_at: DateTime<Utc>,
}

impl OpportunityRow {
    /// Decode the row, re-checking every opportunity invariant.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Decode`] if a label, the score, or the sources
    /// column is malformed, or the derived fields disagree.
    pub fn into_opportunity(self) -> Result<Opportunity, DbError> {
        let id = self.id;
        let decode = |reason: String| DbError::Decode { id, reason };

        let score = u8::try_from(self.score).map_err(|e| decode(e.to_string()))?;
        let sources: Vec<String> =
            serde_json::from_value(self.sources).map_err(|e| decode(e.to_string()))?;
        let competition_level = self
            .competition_level
            .parse()
            .map_err(|e: oppfinder_core::CoreError| decode(e.to_string()))?;
        let recommendation = self
            .recommendation
            .parse()
            .map_err(|e: oppfinder_core::CoreError| decode(e.to_string()))?;

        let record = OpportunityRecord {
            id: Some(self.id),
            title: self.title,
            problem: self.problem,
            score,
            mentions: self.mentions,
            revenue_amount: self.revenue_amount,
            revenue: self.revenue,
            competitors: self.competitors,
            competition_level,
            build_complexity: BuildComplexity::from_label(&self.build_complexity),
            sources,
            example: self.example,
            validated: self.validated,
            recommendation,
            market_size: self.market_size,
            created_at: self.created_at,
        };
        Opportunity::try_from(record).map_err(|e| decode(e.to_string()))
    }
}

const SELECT_COLUMNS: &str = "id, title, problem, score, mentions, revenue, revenue_amount, \
     competitors, competition_level, build_complexity, sources, example, validated, \
     recommendation, market_size, created_at";

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Insert an unsaved opportunity and return its generated id.
///
/// # Errors
///
/// Returns [`DbError::AlreadySaved`] if the opportunity already has an id,
/// or [`DbError::Sqlx`] if the insert fails.
pub async fn insert_opportunity(pool: &PgPool, opportunity: &Opportunity) -> Result<i64, DbError> {
    if let Some(existing) = opportunity.id() {
        return Err(DbError::AlreadySaved(existing));
    }

    let id: i64 = sqlx::query_scalar(
        "INSERT INTO opportunities \
             (title, problem, score, mentions, revenue, revenue_amount, competitors, \
              competition_level, build_complexity, sources, example, validated, \
              recommendation, market_size, created_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15) \
         RETURNING id",
    )
    .bind(opportunity.title())
    .bind(opportunity.problem())
    .bind(i16::from(opportunity.score()))
    .bind(opportunity.mentions())
    .bind(opportunity.revenue())
    .bind(opportunity.revenue_amount())
    .bind(opportunity.competitors())
    .bind(opportunity.competition_level().label())
    .bind(opportunity.build_complexity().label())
    .bind(Value::from(opportunity.sources().to_vec()))
    .bind(opportunity.example())
    .bind(opportunity.validated())
    .bind(opportunity.recommendation().label())
    .bind(opportunity.market_size())
    .bind(opportunity.created_at())
    .fetch_one(pool)
    .await?;

    Ok(id)
}

/// List every opportunity, highest score first, ties in insertion order.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_opportunities(pool: &PgPool) -> Result<Vec<OpportunityRow>, DbError> {
    let rows = sqlx::query_as::<_, OpportunityRow>(&format!(
        "SELECT {SELECT_COLUMNS} FROM opportunities ORDER BY score DESC, id ASC"
    ))
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Fetch one opportunity by id, or `None` if it does not exist.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_opportunity(pool: &PgPool, id: i64) -> Result<Option<OpportunityRow>, DbError> {
    let row = sqlx::query_as::<_, OpportunityRow>(&format!(
        "SELECT {SELECT_COLUMNS} FROM opportunities WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

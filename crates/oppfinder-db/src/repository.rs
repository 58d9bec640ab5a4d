//! [`OpportunityRepository`] backed by Postgres.

use async_trait::async_trait;
use oppfinder_core::{Opportunity, OpportunityRepository, RepositoryError};
use sqlx::PgPool;

use crate::opportunities::{get_opportunity, insert_opportunity, list_opportunities};
use crate::pain_points::insert_pain_point;
use crate::DbError;

/// Ids come from the `opportunities` `BIGSERIAL`, so concurrent scans never
/// share or reuse one.
#[derive(Debug, Clone)]
pub struct PgOpportunityRepository {
    pool: PgPool,
}

impl PgOpportunityRepository {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl From<DbError> for RepositoryError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::AlreadySaved(id) => RepositoryError::AlreadySaved(id),
            other => RepositoryError::Backend(Box::new(other)),
        }
    }
}

#[async_trait]
impl OpportunityRepository for PgOpportunityRepository {
    async fn save(&self, opportunity: &Opportunity) -> Result<i64, RepositoryError> {
        let id = insert_opportunity(&self.pool, opportunity).await?;
        tracing::debug!(id, title = opportunity.title(), "inserted opportunity");
        Ok(id)
    }

    async fn get_all(&self) -> Result<Vec<Opportunity>, RepositoryError> {
        let rows = list_opportunities(&self.pool).await?;
        let opportunities = rows
            .into_iter()
            .map(crate::OpportunityRow::into_opportunity)
            .collect::<Result<Vec<_>, DbError>>()?;
        Ok(opportunities)
    }

    async fn get(&self, id: i64) -> Result<Option<Opportunity>, RepositoryError> {
        match get_opportunity(&self.pool, id).await? {
            Some(row) => Ok(Some(row.into_opportunity()?)),
            None => Ok(None),
        }
    }

    async fn save_pain_point(
        &self,
        source: &str,
        text: &str,
        url: Option<&str>,
    ) -> Result<(), RepositoryError> {
        insert_pain_point(&self.pool, source, text, url).await?;
        Ok(())
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        crate::health_check(&self.pool).await?;
        Ok(())
    }
}

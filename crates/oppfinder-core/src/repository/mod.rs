//! Storage contract for opportunities and raw pain points.

mod memory;

pub use memory::{InMemoryOpportunityRepository, RecordedPainPoint};

use async_trait::async_trait;
use thiserror::Error;

use crate::opportunity::Opportunity;
use crate::CoreError;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("opportunity invariant violated: {0}")]
    Invariant(#[from] CoreError),

    #[error("opportunity already saved with id {0}")]
    AlreadySaved(i64),

    #[error("repository lock poisoned")]
    Poisoned,

    #[error("storage backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Persistence for scored opportunities.
///
/// Implementations assign ids that are unique and never reused, and return
/// [`OpportunityRepository::get_all`] sorted by score descending with ties
/// kept in save order.
#[async_trait]
pub trait OpportunityRepository: Send + Sync {
    /// Persist an unsaved opportunity and return its new id.
    ///
    /// # Errors
    ///
    /// Fails if the opportunity already carries an id or the backend rejects
    /// the write.
    async fn save(&self, opportunity: &Opportunity) -> Result<i64, RepositoryError>;

    async fn get_all(&self) -> Result<Vec<Opportunity>, RepositoryError>;

    async fn get(&self, id: i64) -> Result<Option<Opportunity>, RepositoryError>;

    /// Append a raw pain point. No deduplication.
    async fn save_pain_point(
        &self,
        source: &str,
        text: &str,
        url: Option<&str>,
    ) -> Result<(), RepositoryError>;

    /// Liveness check backing the health endpoint.
    async fn ping(&self) -> Result<(), RepositoryError>;
}

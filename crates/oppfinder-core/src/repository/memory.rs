//! In-memory [`OpportunityRepository`] for tests and storage-less runs.
//!
//! A single `Mutex` guards the id counter and both collections, so ids stay
//! unique under concurrent saves.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::opportunity::Opportunity;

use super::{OpportunityRepository, RepositoryError};

/// A pain point as appended by [`OpportunityRepository::save_pain_point`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedPainPoint {
    pub source: String,
    pub text: String,
    pub url: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Default)]
struct State {
    last_id: i64,
    opportunities: Vec<Opportunity>,
    pain_points: Vec<RecordedPainPoint>,
}

#[derive(Default)]
pub struct InMemoryOpportunityRepository {
    state: Mutex<State>,
}

impl InMemoryOpportunityRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every pain point appended so far, in append order.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Poisoned`] if a writer panicked.
    pub fn pain_points(&self) -> Result<Vec<RecordedPainPoint>, RepositoryError> {
        Ok(self.lock()?.pain_points.clone())
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>, RepositoryError> {
        self.state.lock().map_err(|_| RepositoryError::Poisoned)
    }
}

#[async_trait]
impl OpportunityRepository for InMemoryOpportunityRepository {
    async fn save(&self, opportunity: &Opportunity) -> Result<i64, RepositoryError> {
        if let Some(existing) = opportunity.id() {
            return Err(RepositoryError::AlreadySaved(existing));
        }
        let mut state = self.lock()?;
        let id = state.last_id + 1;
        let stored = opportunity.clone().with_id(id)?;
        state.last_id = id;
        state.opportunities.push(stored);
        tracing::debug!(id, title = opportunity.title(), "stored opportunity in memory");
        Ok(id)
    }

    async fn get_all(&self) -> Result<Vec<Opportunity>, RepositoryError> {
        let mut all = self.lock()?.opportunities.clone();
        // Stable sort keeps save order for equal scores.
        all.sort_by(|a, b| b.score().cmp(&a.score()));
        Ok(all)
    }

    async fn get(&self, id: i64) -> Result<Option<Opportunity>, RepositoryError> {
        Ok(self
            .lock()?
            .opportunities
            .iter()
            .find(|o| o.id() == Some(id))
            .cloned())
    }

    async fn save_pain_point(
        &self,
        source: &str,
        text: &str,
        url: Option<&str>,
    ) -> Result<(), RepositoryError> {
        self.lock()?.pain_points.push(RecordedPainPoint {
            source: source.to_string(),
            text: text.to_string(),
            url: url.map(str::to_string),
            created_at: Utc::now(),
        });
        Ok(())
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        self.lock().map(|_| ())
    }
}

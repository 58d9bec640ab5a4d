//! The persisted opportunity and its wire/record shape.

use chrono::{DateTime, DurationRound, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::scoring::{
    competition_level_for, is_validated, recommendation_for, CompetitionLevel, Recommendation,
    ScoreCard, MAX_SCORE,
};
use crate::types::{BuildComplexity, Theme, ValidationResult};
use crate::CoreError;

/// Flat record shape used for JSON export, the HTTP API, and storage rows.
///
/// Decoding a record into an [`Opportunity`] re-checks every derived field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpportunityRecord {
    pub id: Option<i64>,
    pub title: String,
    pub problem: String,
    pub score: u8,
    pub mentions: i64,
    pub revenue_amount: i64,
    pub revenue: String,
    pub competitors: i64,
    pub competition_level: CompetitionLevel,
    pub build_complexity: BuildComplexity,
    pub sources: Vec<String>,
    pub example: String,
    pub validated: bool,
    pub recommendation: Recommendation,
    pub market_size: String,
    pub created_at: DateTime<Utc>,
}

/// A scored, validated opportunity.
///
/// Fields are private so the derived values (validated flag, competition
/// level, recommendation) can never drift from the inputs they derive from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "OpportunityRecord", into = "OpportunityRecord")]
pub struct Opportunity {
    id: Option<i64>,
    title: String,
    problem: String,
    score: u8,
    mentions: i64,
    revenue_amount: i64,
    revenue: String,
    competitors: i64,
    competition_level: CompetitionLevel,
    build_complexity: BuildComplexity,
    sources: Vec<String>,
    example: String,
    validated: bool,
    recommendation: Recommendation,
    market_size: String,
    created_at: DateTime<Utc>,
}

impl Opportunity {
    /// Build an unsaved opportunity from a theme and its validation facts.
    ///
    /// `created_at` is truncated to microseconds so storage round trips are
    /// lossless.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::EmptySources`] when the theme has no sources.
    pub fn assemble(
        theme: &Theme,
        validation: &ValidationResult,
        created_at: DateTime<Utc>,
    ) -> Result<Self, CoreError> {
        let sources = theme.unique_sources();
        if sources.is_empty() {
            return Err(CoreError::EmptySources(theme.title.clone()));
        }
        let card = ScoreCard::for_theme(theme, validation);

        Ok(Self {
            id: None,
            title: theme.title.clone(),
            problem: theme.problem.clone(),
            score: card.score,
            mentions: theme.mentions,
            revenue_amount: validation.estimated_revenue,
            revenue: card.revenue_label,
            competitors: validation.competitors,
            competition_level: card.competition_level,
            build_complexity: theme.build_complexity.clone(),
            sources,
            example: validation.examples.join(", "),
            validated: card.validated,
            recommendation: card.recommendation,
            market_size: validation.market_size.clone(),
            created_at: truncate_to_micros(created_at),
        })
    }

    /// Record the storage id. Ids are assigned once.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::IdAlreadyAssigned`] if an id is already set.
    pub fn assign_id(&mut self, id: i64) -> Result<(), CoreError> {
        if let Some(existing) = self.id {
            return Err(CoreError::IdAlreadyAssigned {
                existing,
                attempted: id,
            });
        }
        self.id = Some(id);
        Ok(())
    }

    /// Consuming form of [`Opportunity::assign_id`].
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::IdAlreadyAssigned`] if an id is already set.
    pub fn with_id(mut self, id: i64) -> Result<Self, CoreError> {
        self.assign_id(id)?;
        Ok(self)
    }

    #[must_use]
    pub fn id(&self) -> Option<i64> {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn problem(&self) -> &str {
        &self.problem
    }

    #[must_use]
    pub fn score(&self) -> u8 {
        self.score
    }

    #[must_use]
    pub fn mentions(&self) -> i64 {
        self.mentions
    }

    #[must_use]
    pub fn revenue_amount(&self) -> i64 {
        self.revenue_amount
    }

    /// Display label, e.g. `£5,000 MRR`.
    #[must_use]
    pub fn revenue(&self) -> &str {
        &self.revenue
    }

    #[must_use]
    pub fn competitors(&self) -> i64 {
        self.competitors
    }

    #[must_use]
    pub fn competition_level(&self) -> CompetitionLevel {
        self.competition_level
    }

    #[must_use]
    pub fn build_complexity(&self) -> &BuildComplexity {
        &self.build_complexity
    }

    #[must_use]
    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    #[must_use]
    pub fn example(&self) -> &str {
        &self.example
    }

    #[must_use]
    pub fn validated(&self) -> bool {
        self.validated
    }

    #[must_use]
    pub fn recommendation(&self) -> Recommendation {
        self.recommendation
    }

    #[must_use]
    pub fn market_size(&self) -> &str {
        &self.market_size
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub fn to_record(&self) -> OpportunityRecord {
        OpportunityRecord::from(self.clone())
    }
}

impl From<Opportunity> for OpportunityRecord {
    fn from(o: Opportunity) -> Self {
        Self {
            id: o.id,
            title: o.title,
            problem: o.problem,
            score: o.score,
            mentions: o.mentions,
            revenue_amount: o.revenue_amount,
            revenue: o.revenue,
            competitors: o.competitors,
            competition_level: o.competition_level,
            build_complexity: o.build_complexity,
            sources: o.sources,
            example: o.example,
            validated: o.validated,
            recommendation: o.recommendation,
            market_size: o.market_size,
            created_at: o.created_at,
        }
    }
}

impl TryFrom<OpportunityRecord> for Opportunity {
    type Error = CoreError;

    fn try_from(r: OpportunityRecord) -> Result<Self, Self::Error> {
        if r.score > MAX_SCORE {
            return Err(CoreError::ScoreOutOfRange(r.score));
        }
        if r.sources.is_empty() {
            return Err(CoreError::EmptySources(r.title));
        }
        let inconsistent = |reason: String| CoreError::Inconsistent {
            title: r.title.clone(),
            reason,
        };
        if r.validated != is_validated(r.score) {
            return Err(inconsistent(format!(
                "validated={} does not match score {}",
                r.validated, r.score
            )));
        }
        let expected_level = competition_level_for(r.competitors);
        if r.competition_level != expected_level {
            return Err(inconsistent(format!(
                "competition level {} does not match {} competitors",
                r.competition_level, r.competitors
            )));
        }
        let expected_recommendation = recommendation_for(r.score);
        if r.recommendation != expected_recommendation {
            return Err(inconsistent(format!(
                "recommendation '{}' does not match score {}",
                r.recommendation, r.score
            )));
        }

        Ok(Self {
            id: r.id,
            title: r.title,
            problem: r.problem,
            score: r.score,
            mentions: r.mentions,
            revenue_amount: r.revenue_amount,
            revenue: r.revenue,
            competitors: r.competitors,
            competition_level: r.competition_level,
            build_complexity: r.build_complexity,
            sources: r.sources,
            example: r.example,
            validated: r.validated,
            recommendation: r.recommendation,
            market_size: r.market_size,
            created_at: r.created_at,
        })
    }
}

fn truncate_to_micros(ts: DateTime<Utc>) -> DateTime<Utc> {
    ts.duration_trunc(TimeDelta::microseconds(1)).unwrap_or(ts)
}

//! Opportunity pipeline orchestration.

use std::sync::Arc;

use chrono::Utc;
use oppfinder_core::scoring::HIGH_SCORE_THRESHOLD;
use oppfinder_core::{
    Opportunity, OpportunityRepository, PainPointSignal, ThemeAggregator, ValidationAdapter,
};

/// Counters for one pipeline run, logged when the run ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanSummary {
    pub signals: usize,
    pub pain_points_failed: usize,
    pub themes: usize,
    /// Themes dropped because no paid solution exists.
    pub rejected: usize,
    /// Themes lost to validation, assembly, or save failures.
    pub failed: usize,
    pub persisted: usize,
    pub high_score: usize,
}

/// Signals in, persisted opportunities out.
///
/// Collaborators are injected so the same pipeline runs against fixtures,
/// in-memory storage, or Postgres.
#[derive(Clone)]
pub struct OpportunityPipeline {
    aggregator: Arc<dyn ThemeAggregator>,
    validator: Arc<dyn ValidationAdapter>,
    repository: Arc<dyn OpportunityRepository>,
}

impl OpportunityPipeline {
    #[must_use]
    pub fn new(
        aggregator: Arc<dyn ThemeAggregator>,
        validator: Arc<dyn ValidationAdapter>,
        repository: Arc<dyn OpportunityRepository>,
    ) -> Self {
        Self {
            aggregator,
            validator,
            repository,
        }
    }

    /// Run one scan over `signals`.
    ///
    /// 1. Append every signal as a pain point.
    /// 2. Aggregate signals into themes.
    /// 3. Validate each theme, in aggregator order.
    /// 4. Drop themes without paid solutions.
    /// 5. Score, assemble, and save the rest.
    ///
    /// Never fails: collaborator and storage errors are logged and the
    /// affected theme is skipped. Results keep processing order.
    pub async fn run(&self, signals: &[PainPointSignal]) -> Vec<Opportunity> {
        self.run_with_summary(signals).await.0
    }

    /// [`OpportunityPipeline::run`] plus the run's counters.
    pub async fn run_with_summary(
        &self,
        signals: &[PainPointSignal],
    ) -> (Vec<Opportunity>, ScanSummary) {
        let mut summary = ScanSummary {
            signals: signals.len(),
            ..ScanSummary::default()
        };

        // Step 1: Record raw pain points.
        for signal in signals {
            if let Err(e) = self
                .repository
                .save_pain_point(&signal.source, &signal.text, signal.url.as_deref())
                .await
            {
                summary.pain_points_failed += 1;
                tracing::warn!(source = %signal.source, error = %e, "failed to save pain point");
            }
        }

        // Step 2: Aggregate.
        let themes = match self.aggregator.aggregate(signals).await {
            Ok(themes) => themes,
            Err(e) => {
                tracing::error!(error = %e, "theme aggregation failed; scan produced nothing");
                log_summary(&summary);
                return (Vec::new(), summary);
            }
        };
        summary.themes = themes.len();

        // Steps 3-5: Validate, gate, score, persist.
        let mut opportunities = Vec::new();
        for theme in &themes {
            let validation = match self.validator.validate(&theme.problem).await {
                Ok(v) => v,
                Err(e) => {
                    summary.failed += 1;
                    tracing::warn!(theme = %theme.title, error = %e, "validation failed");
                    continue;
                }
            };

            if !validation.has_paid_solutions {
                summary.rejected += 1;
                tracing::debug!(theme = %theme.title, "no paid solutions found; skipping");
                continue;
            }

            let mut opportunity = match Opportunity::assemble(theme, &validation, Utc::now()) {
                Ok(o) => o,
                Err(e) => {
                    summary.failed += 1;
                    tracing::warn!(theme = %theme.title, error = %e, "could not assemble opportunity");
                    continue;
                }
            };

            let id = match self.repository.save(&opportunity).await {
                Ok(id) => id,
                Err(e) => {
                    summary.failed += 1;
                    tracing::warn!(theme = %theme.title, error = %e, "failed to save opportunity");
                    continue;
                }
            };
            if let Err(e) = opportunity.assign_id(id) {
                summary.failed += 1;
                tracing::warn!(theme = %theme.title, error = %e, "could not record opportunity id");
                continue;
            }

            tracing::info!(
                theme = %theme.title,
                id,
                score = opportunity.score(),
                recommendation = %opportunity.recommendation(),
                "opportunity scored"
            );
            opportunities.push(opportunity);
        }

        summary.persisted = opportunities.len();
        summary.high_score = opportunities
            .iter()
            .filter(|o| o.score() >= HIGH_SCORE_THRESHOLD)
            .count();
        log_summary(&summary);

        (opportunities, summary)
    }
}

fn log_summary(summary: &ScanSummary) {
    tracing::info!(
        signals = summary.signals,
        pain_points_failed = summary.pain_points_failed,
        themes = summary.themes,
        rejected = summary.rejected,
        failed = summary.failed,
        persisted = summary.persisted,
        high_score = summary.high_score,
        "scan complete"
    );
}

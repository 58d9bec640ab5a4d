//! Integration tests for `OpportunityPipeline::run`.
//!
//! Collaborators are small in-test stubs; storage is the in-memory
//! repository, optionally wrapped to inject failures.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use oppfinder_core::{
    BuildComplexity, CollaboratorError, CompetitionLevel, InMemoryOpportunityRepository,
    Opportunity, OpportunityRepository, PainPointSignal, Recommendation, RepositoryError, Theme,
    ThemeAggregator, ValidationAdapter, ValidationResult,
};
use oppfinder_pipeline::{fixture_signals, OpportunityPipeline};

struct StaticThemes(Vec<Theme>);

#[async_trait]
impl ThemeAggregator for StaticThemes {
    async fn aggregate(&self, _: &[PainPointSignal]) -> Result<Vec<Theme>, CollaboratorError> {
        Ok(self.0.clone())
    }
}

struct BrokenAggregator;

#[async_trait]
impl ThemeAggregator for BrokenAggregator {
    async fn aggregate(&self, _: &[PainPointSignal]) -> Result<Vec<Theme>, CollaboratorError> {
        Err(CollaboratorError::Aggregation("clustering backend down".to_string()))
    }
}

/// Facts keyed by problem; unknown problems fail validation.
struct FactTable(HashMap<String, ValidationResult>);

#[async_trait]
impl ValidationAdapter for FactTable {
    async fn validate(&self, problem: &str) -> Result<ValidationResult, CollaboratorError> {
        self.0
            .get(problem)
            .cloned()
            .ok_or_else(|| CollaboratorError::Validation {
                problem: problem.to_string(),
                reason: "no market data".to_string(),
            })
    }
}

/// Delegates to the in-memory store but refuses to save listed titles.
struct FlakyRepository {
    inner: InMemoryOpportunityRepository,
    fail_titles: Vec<String>,
    fail_pain_points: bool,
}

#[async_trait]
impl OpportunityRepository for FlakyRepository {
    async fn save(&self, opportunity: &Opportunity) -> Result<i64, RepositoryError> {
        if self.fail_titles.iter().any(|t| t == opportunity.title()) {
            return Err(RepositoryError::Backend("disk full".into()));
        }
        self.inner.save(opportunity).await
    }

    async fn get_all(&self) -> Result<Vec<Opportunity>, RepositoryError> {
        self.inner.get_all().await
    }

    async fn get(&self, id: i64) -> Result<Option<Opportunity>, RepositoryError> {
        self.inner.get(id).await
    }

    async fn save_pain_point(
        &self,
        source: &str,
        text: &str,
        url: Option<&str>,
    ) -> Result<(), RepositoryError> {
        if self.fail_pain_points {
            return Err(RepositoryError::Backend("pain point table locked".into()));
        }
        self.inner.save_pain_point(source, text, url).await
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        self.inner.ping().await
    }
}

fn theme(title: &str, mentions: i64, complexity: BuildComplexity) -> Theme {
    Theme {
        title: title.to_string(),
        problem: format!("{title} problem"),
        mentions,
        build_complexity: complexity,
        sources: vec!["r/SaaS".to_string()],
    }
}

fn facts(has_paid: bool, competitors: i64, revenue: i64) -> ValidationResult {
    ValidationResult {
        has_paid_solutions: has_paid,
        competitors,
        estimated_revenue: revenue,
        examples: vec!["Example SaaS".to_string()],
        market_size: "Small to Medium".to_string(),
    }
}

fn fact_table(entries: &[(&Theme, ValidationResult)]) -> FactTable {
    FactTable(
        entries
            .iter()
            .map(|(t, v)| (t.problem.clone(), v.clone()))
            .collect(),
    )
}

fn pipeline(
    themes: Vec<Theme>,
    validator: FactTable,
    repository: Arc<dyn OpportunityRepository>,
) -> OpportunityPipeline {
    OpportunityPipeline::new(Arc::new(StaticThemes(themes)), Arc::new(validator), repository)
}

#[tokio::test]
async fn high_demand_theme_scores_85_and_builds_immediately() {
    let t = theme("Testimonial Collection Tool", 67, BuildComplexity::Low);
    let validator = fact_table(&[(&t, facts(true, 4, 5000))]);
    let repo = Arc::new(InMemoryOpportunityRepository::new());

    let out = pipeline(vec![t], validator, repo.clone())
        .run(&fixture_signals())
        .await;

    assert_eq!(out.len(), 1);
    let opp = &out[0];
    assert_eq!(opp.score(), 85);
    assert_eq!(opp.recommendation(), Recommendation::BuildImmediately);
    assert!(opp.validated());
    assert_eq!(opp.competition_level(), CompetitionLevel::Low);
    assert_eq!(opp.revenue(), "£5,000 MRR");
    assert!(opp.id().is_some());
    assert_eq!(repo.get_all().await.unwrap(), out);
}

#[tokio::test]
async fn crowded_theme_without_revenue_scores_40() {
    let t = theme("Time Tracking for Freelancers", 31, BuildComplexity::Low);
    let validator = fact_table(&[(&t, facts(true, 50, 0))]);
    let repo = Arc::new(InMemoryOpportunityRepository::new());

    let out = pipeline(vec![t], validator, repo).run(&[]).await;

    assert_eq!(out.len(), 1);
    assert_eq!(out[0].score(), 40);
    assert_eq!(out[0].recommendation(), Recommendation::HighRiskNeedAngle);
    assert!(!out[0].validated());
    assert_eq!(out[0].competition_level(), CompetitionLevel::VeryHigh);
}

#[tokio::test]
async fn themes_without_paid_solutions_are_dropped() {
    let gated = theme("Free Everything", 100, BuildComplexity::Low);
    let kept = theme("Paid Niche", 25, BuildComplexity::Medium);
    let validator = fact_table(&[
        (&gated, facts(false, 0, 50_000)),
        (&kept, facts(true, 12, 1_000)),
    ]);
    let repo = Arc::new(InMemoryOpportunityRepository::new());

    let out = pipeline(vec![gated, kept], validator, repo.clone())
        .run(&[])
        .await;

    let titles: Vec<&str> = out.iter().map(Opportunity::title).collect();
    assert_eq!(titles, ["Paid Niche"]);
    let stored = repo.get_all().await.unwrap();
    assert!(stored.iter().all(|o| o.title() != "Free Everything"));
}

#[tokio::test]
async fn competition_boundary_between_two_and_three() {
    let two = theme("Two Rivals", 10, BuildComplexity::High);
    let three = theme("Three Rivals", 10, BuildComplexity::High);
    let validator = fact_table(&[(&two, facts(true, 2, 0)), (&three, facts(true, 3, 0))]);
    let repo = Arc::new(InMemoryOpportunityRepository::new());

    let out = pipeline(vec![two, three], validator, repo).run(&[]).await;

    assert_eq!(out[0].competition_level(), CompetitionLevel::VeryLow);
    assert_eq!(out[1].competition_level(), CompetitionLevel::Low);
}

#[tokio::test]
async fn results_keep_processing_order_but_storage_sorts_by_score() {
    let low = theme("Low", 0, BuildComplexity::VeryHigh);
    let high = theme("High", 80, BuildComplexity::Low);
    let validator = fact_table(&[(&low, facts(true, 30, 0)), (&high, facts(true, 1, 20_000))]);
    let repo = Arc::new(InMemoryOpportunityRepository::new());

    let out = pipeline(vec![low, high], validator, repo.clone())
        .run(&[])
        .await;

    let run_order: Vec<&str> = out.iter().map(Opportunity::title).collect();
    assert_eq!(run_order, ["Low", "High"]);
    let stored: Vec<String> = repo
        .get_all()
        .await
        .unwrap()
        .iter()
        .map(|o| o.title().to_string())
        .collect();
    assert_eq!(stored, ["High", "Low"]);
}

#[tokio::test]
async fn every_persisted_opportunity_is_validated_iff_score_at_least_60() {
    let themes: Vec<Theme> = (0..8)
        .map(|i| theme(&format!("t{i}"), i * 10, BuildComplexity::Medium))
        .collect();
    let entries: Vec<(&Theme, ValidationResult)> = themes
        .iter()
        .enumerate()
        .map(|(i, t)| {
            let i = i64::try_from(i).unwrap();
            (t, facts(true, i * 3, i * 1_500))
        })
        .collect();
    let validator = fact_table(&entries);
    let repo = Arc::new(InMemoryOpportunityRepository::new());

    let out = pipeline(themes.clone(), validator, repo.clone())
        .run(&[])
        .await;

    assert_eq!(out.len(), 8);
    for opp in repo.get_all().await.unwrap() {
        assert!(opp.score() <= 100);
        assert_eq!(opp.validated(), opp.score() >= 60, "{}", opp.title());
    }
}

#[tokio::test]
async fn validation_failure_skips_only_that_theme() {
    let known = theme("Known", 55, BuildComplexity::Low);
    let unknown = theme("Unknown", 55, BuildComplexity::Low);
    let validator = fact_table(&[(&known, facts(true, 4, 5000))]);
    let repo = Arc::new(InMemoryOpportunityRepository::new());

    let out = pipeline(vec![unknown, known], validator, repo).run(&[]).await;

    let titles: Vec<&str> = out.iter().map(Opportunity::title).collect();
    assert_eq!(titles, ["Known"]);
}

#[tokio::test]
async fn save_failure_yields_partial_result() {
    let a = theme("A", 60, BuildComplexity::Low);
    let b = theme("B", 60, BuildComplexity::Low);
    let c = theme("C", 60, BuildComplexity::Low);
    let validator = fact_table(&[
        (&a, facts(true, 1, 1_000)),
        (&b, facts(true, 1, 1_000)),
        (&c, facts(true, 1, 1_000)),
    ]);
    let repo = Arc::new(FlakyRepository {
        inner: InMemoryOpportunityRepository::new(),
        fail_titles: vec!["B".to_string()],
        fail_pain_points: false,
    });

    let out = pipeline(vec![a, b, c], validator, repo.clone())
        .run(&[])
        .await;

    let titles: Vec<&str> = out.iter().map(Opportunity::title).collect();
    assert_eq!(titles, ["A", "C"]);
    assert_eq!(repo.get_all().await.unwrap().len(), 2);
}

#[tokio::test]
async fn pain_point_failures_do_not_stop_the_run() {
    let t = theme("Still Scored", 30, BuildComplexity::Low);
    let validator = fact_table(&[(&t, facts(true, 4, 5000))]);
    let repo = Arc::new(FlakyRepository {
        inner: InMemoryOpportunityRepository::new(),
        fail_titles: vec![],
        fail_pain_points: true,
    });

    let (out, summary) = pipeline(vec![t], validator, repo)
        .run_with_summary(&fixture_signals())
        .await;

    assert_eq!(out.len(), 1);
    assert_eq!(summary.pain_points_failed, 2);
}

#[tokio::test]
async fn every_signal_is_recorded_as_pain_point() {
    let repo = Arc::new(InMemoryOpportunityRepository::new());
    let signals = fixture_signals();

    pipeline(vec![], FactTable(HashMap::new()), repo.clone())
        .run(&signals)
        .await;

    let recorded = repo.pain_points().unwrap();
    assert_eq!(recorded.len(), signals.len());
    assert_eq!(recorded[0].source, "r/Entrepreneur");
    assert_eq!(
        recorded[1].url.as_deref(),
        Some("https://reddit.com/r/freelance/mock2")
    );
}

#[tokio::test]
async fn aggregation_failure_returns_empty() {
    let repo = Arc::new(InMemoryOpportunityRepository::new());
    let pipeline = OpportunityPipeline::new(
        Arc::new(BrokenAggregator),
        Arc::new(FactTable(HashMap::new())),
        repo.clone(),
    );

    let out = pipeline.run(&fixture_signals()).await;

    assert!(out.is_empty());
    assert!(repo.get_all().await.unwrap().is_empty());
    // Pain points were recorded before aggregation.
    assert_eq!(repo.pain_points().unwrap().len(), 2);
}

#[tokio::test]
async fn theme_without_sources_is_skipped() {
    let mut orphan = theme("Orphan", 70, BuildComplexity::Low);
    orphan.sources.clear();
    let ok = theme("Sourced", 70, BuildComplexity::Low);
    let validator = fact_table(&[(&orphan, facts(true, 1, 1_000)), (&ok, facts(true, 1, 1_000))]);
    let repo = Arc::new(InMemoryOpportunityRepository::new());

    let (out, summary) = pipeline(vec![orphan, ok], validator, repo)
        .run_with_summary(&[])
        .await;

    assert_eq!(out.len(), 1);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.rejected, 0);
}

#[tokio::test]
async fn summary_counts_gate_rejections_and_high_scores() {
    let a = theme("Rejected", 90, BuildComplexity::Low);
    let b = theme("Strong", 90, BuildComplexity::Low);
    let c = theme("Weak", 0, BuildComplexity::VeryHigh);
    let validator = fact_table(&[
        (&a, facts(false, 1, 1_000)),
        (&b, facts(true, 1, 10_000)),
        (&c, facts(true, 40, 0)),
    ]);
    let repo = Arc::new(InMemoryOpportunityRepository::new());

    let (_, summary) = pipeline(vec![a, b, c], validator, repo)
        .run_with_summary(&[])
        .await;

    assert_eq!(summary.themes, 3);
    assert_eq!(summary.rejected, 1);
    assert_eq!(summary.persisted, 2);
    assert_eq!(summary.high_score, 1);
}

#[tokio::test]
async fn persisted_record_round_trips_through_json() {
    let t = theme("Round Trip", 67, BuildComplexity::Unrecognized("Trivial".to_string()));
    let validator = fact_table(&[(&t, facts(true, 4, 5000))]);
    let repo = Arc::new(InMemoryOpportunityRepository::new());

    let out = pipeline(vec![t], validator, repo).run(&[]).await;

    let json = serde_json::to_string(&out[0]).unwrap();
    let back: Opportunity = serde_json::from_str(&json).unwrap();
    assert_eq!(back, out[0]);
}

//! `scan` command handlers.

use std::fmt::Write as _;
use std::sync::Arc;

use oppfinder_core::{
    load_fixtures_or_builtin, AppConfig, OpportunityRepository, PainPointSignal, Theme,
    ThemeAggregator,
};
use oppfinder_pipeline::{
    collaborators_from, collect_pain_points, RedditEndpoints, ScanOutcome, ScanService,
};

/// Collect, score, and persist one scan, then print what was saved.
///
/// # Errors
///
/// Returns an error if the fixture file exists but cannot be loaded.
/// Collector and per-theme failures are logged by the pipeline, not returned.
pub(crate) async fn run_scan(
    config: &AppConfig,
    repository: Arc<dyn OpportunityRepository>,
) -> anyhow::Result<()> {
    tracing::info!(
        reddit = config.reddit_credentials.is_some(),
        fixtures = %config.fixtures_path.display(),
        "starting scan"
    );
    let service = ScanService::from_config(config, repository)?;
    let outcome = service.run_scan(None).await;
    if outcome.opportunities.is_empty() {
        tracing::warn!(
            signals = outcome.summary.signals,
            themes = outcome.summary.themes,
            "scan persisted no opportunities"
        );
    }
    print!("{}", render_outcome(&outcome));
    Ok(())
}

/// Collect signals and aggregate themes without scoring or writing anything.
///
/// # Errors
///
/// Returns an error if fixtures cannot be loaded or aggregation fails.
pub(crate) async fn run_scan_dry_run(config: &AppConfig) -> anyhow::Result<()> {
    let fixtures = load_fixtures_or_builtin(&config.fixtures_path)?;
    let (aggregator, _) = collaborators_from(fixtures);

    let signals = collect_pain_points(
        config.reddit_credentials.as_ref(),
        &config.reddit,
        &RedditEndpoints::default(),
    )
    .await;
    if signals.is_empty() {
        tracing::warn!("dry-run collected no signals");
    }
    let themes = aggregator.aggregate(&signals).await?;
    tracing::info!(
        signals = signals.len(),
        themes = themes.len(),
        "dry-run: nothing scored or written"
    );

    print!("{}", render_dry_run(&signals, &themes));
    Ok(())
}

fn render_outcome(outcome: &ScanOutcome) -> String {
    let summary = &outcome.summary;
    let mut out = format!(
        "scan complete: {} signals, {} themes, {} saved, {} rejected, {} failed\n",
        summary.signals, summary.themes, summary.persisted, summary.rejected, summary.failed
    );
    for o in &outcome.opportunities {
        let id = o.id().map_or_else(|| "-".to_string(), |id| id.to_string());
        let _ = writeln!(out, "  #{id} {} ({}/100) {}", o.title(), o.score(), o.recommendation());
    }
    out
}

fn render_dry_run(signals: &[PainPointSignal], themes: &[Theme]) -> String {
    let mut out = format!("dry-run: collected {} signals\n", signals.len());
    for signal in signals {
        let snippet: String = signal.text.chars().take(80).collect();
        let _ = writeln!(out, "  [{}] {snippet}", signal.source);
    }
    let _ = writeln!(out, "dry-run: {} themes", themes.len());
    for theme in themes {
        let _ = writeln!(
            out,
            "  {} ({} mentions, {} build) from {}",
            theme.title,
            theme.mentions,
            theme.build_complexity,
            theme.unique_sources().join(", ")
        );
    }
    out
}

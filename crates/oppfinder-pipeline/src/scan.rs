//! End-to-end scan: collect signals, then run the pipeline.

use std::sync::Arc;

use oppfinder_core::fixtures::load_fixtures_or_builtin;
use oppfinder_core::{
    AppConfig, FixtureError, Opportunity, OpportunityRepository, PainPointSignal,
    RedditCredentials, RedditSettings,
};

use crate::fixture::collaborators_from;
use crate::pipeline::{OpportunityPipeline, ScanSummary};
use crate::sources::{collect_pain_points, RedditEndpoints};

#[derive(Debug, Clone)]
pub struct ScanOutcome {
    pub opportunities: Vec<Opportunity>,
    pub summary: ScanSummary,
}

/// Owns a pipeline plus the collector settings used to feed it.
#[derive(Clone)]
pub struct ScanService {
    pipeline: OpportunityPipeline,
    credentials: Option<RedditCredentials>,
    settings: RedditSettings,
    endpoints: RedditEndpoints,
}

impl ScanService {
    #[must_use]
    pub fn new(
        pipeline: OpportunityPipeline,
        credentials: Option<RedditCredentials>,
        settings: RedditSettings,
    ) -> Self {
        Self {
            pipeline,
            credentials,
            settings,
            endpoints: RedditEndpoints::default(),
        }
    }

    /// Wire fixture collaborators from `config.fixtures_path` around `repository`.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError`] if an existing fixture file is unreadable or invalid.
    pub fn from_config(
        config: &AppConfig,
        repository: Arc<dyn OpportunityRepository>,
    ) -> Result<Self, FixtureError> {
        let fixtures = load_fixtures_or_builtin(&config.fixtures_path)?;
        let (aggregator, validator) = collaborators_from(fixtures);
        let pipeline = OpportunityPipeline::new(Arc::new(aggregator), Arc::new(validator), repository);
        Ok(Self::new(
            pipeline,
            config.reddit_credentials.clone(),
            config.reddit.clone(),
        ))
    }

    #[must_use]
    pub fn with_endpoints(mut self, endpoints: RedditEndpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    #[must_use]
    pub fn pipeline(&self) -> &OpportunityPipeline {
        &self.pipeline
    }

    /// Collect signals without running the pipeline.
    ///
    /// `credentials` overrides the configured Reddit credentials for this call.
    pub async fn collect(&self, credentials: Option<&RedditCredentials>) -> Vec<PainPointSignal> {
        let credentials = credentials.or(self.credentials.as_ref());
        collect_pain_points(credentials, &self.settings, &self.endpoints).await
    }

    /// Collect signals and run them through the pipeline.
    pub async fn run_scan(&self, credentials: Option<&RedditCredentials>) -> ScanOutcome {
        let signals = self.collect(credentials).await;
        let (opportunities, summary) = self.pipeline.run_with_summary(&signals).await;
        ScanOutcome {
            opportunities,
            summary,
        }
    }
}

//! Collaborators backed by precomputed fixture facts.

use async_trait::async_trait;
use oppfinder_core::{
    CollaboratorError, FixtureFile, PainPointSignal, Theme, ThemeAggregator, ValidationAdapter,
    ValidationFixtures, ValidationResult,
};

/// Returns the configured themes in file order.
///
/// Signals are not inspected; the themes are facts computed elsewhere.
#[derive(Debug, Clone)]
pub struct FixtureAggregator {
    themes: Vec<Theme>,
}

impl FixtureAggregator {
    #[must_use]
    pub fn new(themes: Vec<Theme>) -> Self {
        Self { themes }
    }
}

#[async_trait]
impl ThemeAggregator for FixtureAggregator {
    async fn aggregate(
        &self,
        signals: &[PainPointSignal],
    ) -> Result<Vec<Theme>, CollaboratorError> {
        tracing::debug!(
            signals = signals.len(),
            themes = self.themes.len(),
            "aggregating fixture themes"
        );
        Ok(self.themes.clone())
    }
}

/// Looks up validation facts by problem statement, falling back to a default.
#[derive(Debug, Clone)]
pub struct FixtureValidator {
    facts: ValidationFixtures,
}

impl FixtureValidator {
    #[must_use]
    pub fn new(facts: ValidationFixtures) -> Self {
        Self { facts }
    }
}

#[async_trait]
impl ValidationAdapter for FixtureValidator {
    async fn validate(&self, problem: &str) -> Result<ValidationResult, CollaboratorError> {
        Ok(self.facts.for_problem(problem).clone())
    }
}

/// Split a fixture file into its two collaborators.
#[must_use]
pub fn collaborators_from(fixtures: FixtureFile) -> (FixtureAggregator, FixtureValidator) {
    (
        FixtureAggregator::new(fixtures.themes),
        FixtureValidator::new(fixtures.validation),
    )
}

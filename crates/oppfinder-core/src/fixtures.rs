//! Fixture themes and validation facts loaded from YAML.
//!
//! Theme aggregation and market validation are supplied as precomputed facts;
//! this file format is how those facts reach the pipeline.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{BuildComplexity, Theme, ValidationResult};

#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("failed to read fixture file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse fixture file: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("invalid fixture: {0}")]
    Validation(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationFixtures {
    /// Facts returned for any problem without an override.
    pub default: ValidationResult,
    /// Per-problem facts keyed by the exact problem statement.
    #[serde(default)]
    pub overrides: HashMap<String, ValidationResult>,
}

impl ValidationFixtures {
    #[must_use]
    pub fn for_problem(&self, problem: &str) -> &ValidationResult {
        self.overrides.get(problem).unwrap_or(&self.default)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixtureFile {
    #[serde(default)]
    pub themes: Vec<Theme>,
    pub validation: ValidationFixtures,
}

impl FixtureFile {
    /// The two sample themes and default market facts used when no fixture
    /// file is present.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            themes: vec![
                Theme {
                    title: "Testimonial Collection Tool".to_string(),
                    problem: "Businesses struggle to collect customer testimonials efficiently"
                        .to_string(),
                    mentions: 67,
                    build_complexity: BuildComplexity::Low,
                    sources: vec!["r/Entrepreneur".to_string(), "r/smallbusiness".to_string()],
                },
                Theme {
                    title: "Time Tracking for Freelancers".to_string(),
                    problem: "Freelancers waste time tracking hours across multiple tools"
                        .to_string(),
                    mentions: 31,
                    build_complexity: BuildComplexity::Low,
                    sources: vec!["r/freelance".to_string()],
                },
            ],
            validation: ValidationFixtures {
                default: ValidationResult {
                    has_paid_solutions: true,
                    competitors: 4,
                    estimated_revenue: 5000,
                    examples: vec!["Example SaaS".to_string()],
                    market_size: "Small to Medium".to_string(),
                },
                overrides: HashMap::new(),
            },
        }
    }
}

/// Load and validate fixtures from a YAML file.
///
/// # Errors
///
/// Returns `FixtureError` if the file cannot be read, parsed, or fails validation.
pub fn load_fixtures(path: &Path) -> Result<FixtureFile, FixtureError> {
    let content = std::fs::read_to_string(path).map_err(|e| FixtureError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_fixtures(&content)
}

/// Like [`load_fixtures`], but a missing file yields [`FixtureFile::builtin`].
///
/// # Errors
///
/// Returns `FixtureError` for unreadable, malformed, or invalid files.
pub fn load_fixtures_or_builtin(path: &Path) -> Result<FixtureFile, FixtureError> {
    if !path.exists() {
        tracing::info!(path = %path.display(), "fixture file not found; using built-in fixtures");
        return Ok(FixtureFile::builtin());
    }
    load_fixtures(path)
}

/// Parse and validate fixtures from YAML text.
///
/// # Errors
///
/// Returns `FixtureError` if the text is not valid YAML or fails validation.
pub fn parse_fixtures(content: &str) -> Result<FixtureFile, FixtureError> {
    let fixtures: FixtureFile = serde_yaml::from_str(content)?;
    validate_fixtures(&fixtures)?;
    Ok(fixtures)
}

fn validate_fixtures(fixtures: &FixtureFile) -> Result<(), FixtureError> {
    let mut seen_titles = HashSet::new();
    for theme in &fixtures.themes {
        if theme.title.trim().is_empty() {
            return Err(FixtureError::Validation(
                "theme title must be non-empty".to_string(),
            ));
        }
        if theme.problem.trim().is_empty() {
            return Err(FixtureError::Validation(format!(
                "theme '{}' has an empty problem statement",
                theme.title
            )));
        }
        if !seen_titles.insert(theme.title.to_lowercase()) {
            return Err(FixtureError::Validation(format!(
                "duplicate theme title: '{}'",
                theme.title
            )));
        }
    }
    Ok(())
}

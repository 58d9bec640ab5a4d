//! Domain model, scoring rules, and storage contracts for the opportunity finder.
//!
//! Everything in this crate is free of I/O except configuration and fixture
//! loading; the pipeline, database, and HTTP layers depend on it.

pub mod app_config;
pub mod collaborators;
pub mod config;
pub mod fixtures;
pub mod opportunity;
pub mod query;
pub mod repository;
pub mod scoring;
pub mod stats;
pub mod types;

use thiserror::Error;

pub use app_config::{AppConfig, Environment, RedditCredentials, RedditSettings};
pub use collaborators::{CollaboratorError, ThemeAggregator, ValidationAdapter};
pub use config::{load_app_config, load_app_config_from_env};
pub use fixtures::{
    load_fixtures, load_fixtures_or_builtin, parse_fixtures, FixtureError, FixtureFile,
    ValidationFixtures,
};
pub use opportunity::{Opportunity, OpportunityRecord};
pub use query::{OpportunityQuery, SortKey};
pub use repository::{
    InMemoryOpportunityRepository, OpportunityRepository, RecordedPainPoint, RepositoryError,
};
pub use scoring::{
    calculate_score, competition_level_for, format_revenue_label, recommendation_for,
    CompetitionLevel, Recommendation, ScoreCard,
};
pub use stats::OpportunityStats;
pub use types::{BuildComplexity, PainPointSignal, Theme, ValidationResult};

/// Violations of the opportunity invariants.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("opportunity already has id {existing}; refusing to assign {attempted}")]
    IdAlreadyAssigned { existing: i64, attempted: i64 },

    #[error("opportunity '{0}' has no sources")]
    EmptySources(String),

    #[error("score {0} is outside 0..=100")]
    ScoreOutOfRange(u8),

    #[error("inconsistent opportunity '{title}': {reason}")]
    Inconsistent { title: String, reason: String },

    #[error("unknown {kind} label: {label}")]
    UnknownLabel { kind: &'static str, label: String },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

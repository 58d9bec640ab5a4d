//! Contracts for the two external collaborators the pipeline consults.
//!
//! Neither contract says how the facts are produced; fixture, heuristic, and
//! remote implementations are all interchangeable behind these traits.

use async_trait::async_trait;
use thiserror::Error;

use crate::types::{PainPointSignal, Theme, ValidationResult};

#[derive(Debug, Error)]
pub enum CollaboratorError {
    #[error("theme aggregation failed: {0}")]
    Aggregation(String),

    #[error("validation failed for '{problem}': {reason}")]
    Validation { problem: String, reason: String },
}

/// Groups raw signals into candidate themes.
#[async_trait]
pub trait ThemeAggregator: Send + Sync {
    /// Themes in the order the pipeline should process them. May be empty.
    async fn aggregate(&self, signals: &[PainPointSignal]) -> Result<Vec<Theme>, CollaboratorError>;
}

/// Supplies market facts for a problem statement.
#[async_trait]
pub trait ValidationAdapter: Send + Sync {
    async fn validate(&self, problem: &str) -> Result<ValidationResult, CollaboratorError>;
}

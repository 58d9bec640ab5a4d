//! Scan pipeline for the opportunity finder.
//!
//! Collects pain-point signals (Reddit or built-in samples), groups them into
//! themes, validates each theme's market, scores it, and persists the
//! survivors through an [`oppfinder_core::OpportunityRepository`].

pub mod error;
pub mod fixture;
pub mod pipeline;
pub mod scan;
pub mod sources;

pub use error::CollectorError;
pub use fixture::{collaborators_from, FixtureAggregator, FixtureValidator};
pub use pipeline::{OpportunityPipeline, ScanSummary};
pub use scan::{ScanOutcome, ScanService};
pub use sources::{
    collect_pain_points, fixture_signals, RedditClient, RedditEndpoints, PAIN_KEYWORDS,
    SUBREDDITS,
};

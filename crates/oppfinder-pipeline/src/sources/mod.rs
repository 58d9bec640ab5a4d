//! Pain-point signal sources.

mod reddit;
mod reddit_helpers;

pub use reddit::{RedditClient, RedditEndpoints};

use oppfinder_core::{PainPointSignal, RedditCredentials, RedditSettings};

/// Subreddits scanned for pain points, in scan order.
pub const SUBREDDITS: &[&str] = &[
    "Entrepreneur",
    "smallbusiness",
    "freelance",
    "SaaS",
    "startups",
    "indiehackers",
    "productivity",
];

/// Phrases that mark a post as describing a pain point.
pub const PAIN_KEYWORDS: &[&str] = &[
    "looking for a tool",
    "need software for",
    "wish there was",
    "hate that i have to",
    "tired of manually",
    "paying too much for",
    "can't find a simple",
    "frustrated with",
    "how do i automate",
    "is there a way to",
];

/// Only the leading keywords are searched; the rest just filter results.
pub(crate) const SEARCH_KEYWORD_COUNT: usize = 3;

/// Sample posts used when no Reddit credentials are configured.
#[must_use]
pub fn fixture_signals() -> Vec<PainPointSignal> {
    vec![
        PainPointSignal {
            source: "r/Entrepreneur".to_string(),
            text: "Looking for a tool to collect customer testimonials easily \
                   Running a small agency and manually asking clients for testimonials via \
                   email. Half dont respond. Need something automated."
                .to_string(),
            url: Some("https://reddit.com/r/entrepreneur/mock1".to_string()),
            external_score: 45,
            comment_count: 23,
        },
        PainPointSignal {
            source: "r/freelance".to_string(),
            text: "Tired of manually tracking time across projects \
                   I have 5 clients and switching between tools is killing my productivity. \
                   Looking for something simple."
                .to_string(),
            url: Some("https://reddit.com/r/freelance/mock2".to_string()),
            external_score: 67,
            comment_count: 31,
        },
    ]
}

/// Collect pain points from Reddit when credentials are present, otherwise
/// return [`fixture_signals`].
///
/// A failed token exchange is logged and yields no signals.
pub async fn collect_pain_points(
    credentials: Option<&RedditCredentials>,
    settings: &RedditSettings,
    endpoints: &RedditEndpoints,
) -> Vec<PainPointSignal> {
    let Some(credentials) = credentials else {
        tracing::info!("no Reddit credentials configured; using sample signals");
        return fixture_signals();
    };

    match RedditClient::connect(credentials, settings, endpoints).await {
        Ok(client) => {
            let signals = client.collect_pain_points(settings).await;
            tracing::info!(count = signals.len(), "collected Reddit pain points");
            signals
        }
        Err(e) => {
            tracing::error!(source = "reddit", error = %e, "Reddit authentication failed");
            Vec::new()
        }
    }
}

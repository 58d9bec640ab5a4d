//! Reddit API pain-point collector (client-credentials OAuth).

use std::collections::HashSet;
use std::time::Duration;

use oppfinder_core::{PainPointSignal, RedditCredentials, RedditSettings};
use serde::Deserialize;

use crate::error::CollectorError;

use super::reddit_helpers::{search_params, to_signal};
use super::{PAIN_KEYWORDS, SEARCH_KEYWORD_COUNT, SUBREDDITS};

const DEFAULT_TOKEN_URL: &str = "https://www.reddit.com/api/v1/access_token";
const DEFAULT_API_BASE: &str = "https://oauth.reddit.com";
/// Reddit rejects search pages larger than this.
const MAX_PAGE_LIMIT: u32 = 100;

/// Where the client authenticates and searches. Overridable for tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedditEndpoints {
    pub token_url: String,
    pub api_base: String,
}

impl Default for RedditEndpoints {
    fn default() -> Self {
        Self {
            token_url: DEFAULT_TOKEN_URL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }
}

/// Reddit OAuth token response.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Reddit search listing wrapper.
#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    children: Vec<Post>,
}

#[derive(Debug, Deserialize)]
pub(super) struct Post {
    pub(super) data: PostData,
}

#[derive(Debug, Deserialize)]
pub(super) struct PostData {
    pub(super) title: Option<String>,
    pub(super) selftext: Option<String>,
    pub(super) permalink: Option<String>,
    pub(super) score: Option<i64>,
    pub(super) num_comments: Option<i64>,
}

/// Reddit API client with a valid access token.
pub struct RedditClient {
    client: reqwest::Client,
    token: String,
    user_agent: String,
    api_base: String,
}

impl RedditClient {
    /// Create a client by exchanging client credentials for a token.
    ///
    /// # Errors
    ///
    /// Returns [`CollectorError`] if the HTTP client cannot be built or the
    /// token exchange fails.
    pub async fn connect(
        credentials: &RedditCredentials,
        settings: &RedditSettings,
        endpoints: &RedditEndpoints,
    ) -> Result<Self, CollectorError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| CollectorError::Reddit(format!("failed to build HTTP client: {e}")))?;
        let token = Self::fetch_token(&client, credentials, &endpoints.token_url).await?;

        Ok(Self {
            client,
            token,
            user_agent: credentials.user_agent.clone(),
            api_base: endpoints.api_base.trim_end_matches('/').to_string(),
        })
    }

    async fn fetch_token(
        client: &reqwest::Client,
        credentials: &RedditCredentials,
        token_url: &str,
    ) -> Result<String, CollectorError> {
        let response = client
            .post(token_url)
            .header("User-Agent", &credentials.user_agent)
            .basic_auth(&credentials.client_id, Some(&credentials.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(CollectorError::Reddit(format!(
                "token exchange failed with status {}",
                response.status()
            )));
        }

        let token_resp: TokenResponse = response
            .json()
            .await
            .map_err(|e| CollectorError::Reddit(format!("token parse error: {e}")))?;

        Ok(token_resp.access_token)
    }

    /// Search one subreddit for a keyword over the past month and keep posts
    /// that read like a pain point.
    ///
    /// # Errors
    ///
    /// Returns [`CollectorError`] if the request fails or the listing cannot
    /// be parsed.
    pub async fn search_subreddit(
        &self,
        subreddit: &str,
        keyword: &str,
        limit: u32,
    ) -> Result<Vec<PainPointSignal>, CollectorError> {
        let endpoint = format!("{}/r/{subreddit}/search", self.api_base);
        let response = self
            .client
            .get(endpoint)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("User-Agent", &self.user_agent)
            .query(&search_params(keyword, limit.min(MAX_PAGE_LIMIT)))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(CollectorError::Reddit(format!(
                "search in r/{subreddit} failed with status {}",
                response.status()
            )));
        }

        let listing: Listing = response
            .json()
            .await
            .map_err(|e| CollectorError::Reddit(format!("Reddit response parse error: {e}")))?;

        Ok(listing
            .data
            .children
            .iter()
            .filter_map(|post| to_signal(post, subreddit))
            .collect())
    }

    /// Scan every tracked subreddit with the leading pain keywords.
    ///
    /// A subreddit that errors is logged and skipped; signals it produced
    /// before the error are kept. Posts matched by several keywords are
    /// collected once.
    pub async fn collect_pain_points(&self, settings: &RedditSettings) -> Vec<PainPointSignal> {
        let mut signals = Vec::new();
        let delay = Duration::from_millis(settings.request_delay_ms);

        for (index, subreddit) in SUBREDDITS.iter().enumerate() {
            if index > 0 && !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }

            let mut seen_urls = HashSet::new();
            let mut collected = 0_usize;
            for keyword in PAIN_KEYWORDS.iter().take(SEARCH_KEYWORD_COUNT) {
                match self
                    .search_subreddit(subreddit, keyword, settings.limit_per_subreddit)
                    .await
                {
                    Ok(page) => {
                        for signal in page {
                            let fresh = signal
                                .url
                                .as_ref()
                                .is_none_or(|url| seen_urls.insert(url.clone()));
                            if fresh {
                                collected += 1;
                                signals.push(signal);
                            }
                        }
                    }
                    Err(e) => {
                        tracing::warn!(
                            source = %format!("r/{subreddit}"),
                            keyword = *keyword,
                            error = %e,
                            "Reddit search failed; skipping rest of subreddit"
                        );
                        break;
                    }
                }
            }

            tracing::debug!(
                source = %format!("r/{subreddit}"),
                count = collected,
                "collected Reddit pain points"
            );
        }

        signals
    }
}

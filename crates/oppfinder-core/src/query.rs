//! Filtering and ordering of stored opportunities for listings.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::opportunity::Opportunity;

/// Listing sort order. Every key sorts descending.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Score,
    Revenue,
    Mentions,
}

impl SortKey {
    /// Lenient parse; unknown keys fall back to [`SortKey::Score`].
    #[must_use]
    pub fn parse_or_default(raw: &str) -> Self {
        raw.parse().unwrap_or_default()
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Score => "score",
            Self::Revenue => "revenue",
            Self::Mentions => "mentions",
        }
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "score" => Ok(Self::Score),
            "revenue" => Ok(Self::Revenue),
            "mentions" => Ok(Self::Mentions),
            other => Err(format!("unknown sort key: {other}")),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OpportunityQuery {
    /// Inclusive lower bound on score.
    pub min_score: Option<u8>,
    /// Case-insensitive substring matched against title or problem.
    pub search: Option<String>,
    pub sort: SortKey,
    pub limit: Option<usize>,
}

impl OpportunityQuery {
    #[must_use]
    pub fn matches(&self, opportunity: &Opportunity) -> bool {
        if let Some(min) = self.min_score {
            if opportunity.score() < min {
                return false;
            }
        }
        match self.search.as_deref().map(str::trim) {
            Some(needle) if !needle.is_empty() => {
                let needle = needle.to_lowercase();
                opportunity.title().to_lowercase().contains(&needle)
                    || opportunity.problem().to_lowercase().contains(&needle)
            }
            _ => true,
        }
    }

    /// Filter, then stable-sort descending by the chosen key, then truncate.
    ///
    /// Input order breaks ties, so feeding `get_all()` output keeps save order
    /// among equal keys.
    #[must_use]
    pub fn apply(&self, opportunities: Vec<Opportunity>) -> Vec<Opportunity> {
        let mut out: Vec<Opportunity> = opportunities
            .into_iter()
            .filter(|o| self.matches(o))
            .collect();
        match self.sort {
            SortKey::Score => out.sort_by(|a, b| b.score().cmp(&a.score())),
            SortKey::Revenue => out.sort_by(|a, b| b.revenue_amount().cmp(&a.revenue_amount())),
            SortKey::Mentions => out.sort_by(|a, b| b.mentions().cmp(&a.mentions())),
        }
        if let Some(limit) = self.limit {
            out.truncate(limit);
        }
        out
    }
}

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A raw pain-point post collected from a community source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PainPointSignal {
    /// Origin label, e.g. `r/Entrepreneur`.
    pub source: String,
    pub text: String,
    pub url: Option<String>,
    /// Upvote-style score reported by the source.
    #[serde(default)]
    pub external_score: i64,
    #[serde(default)]
    pub comment_count: i64,
}

/// Effort needed to build a solution for a theme.
///
/// Labels outside the closed set are kept verbatim in `Unrecognized` so they
/// survive a round trip; they score zero complexity points.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BuildComplexity {
    Low,
    Medium,
    High,
    VeryHigh,
    Unrecognized(String),
}

impl BuildComplexity {
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::VeryHigh => "Very High",
            Self::Unrecognized(label) => label,
        }
    }

    /// Parse a wire label. Matching is exact; anything else is `Unrecognized`.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label {
            "Low" => Self::Low,
            "Medium" => Self::Medium,
            "High" => Self::High,
            "Very High" => Self::VeryHigh,
            other => Self::Unrecognized(other.to_string()),
        }
    }
}

impl fmt::Display for BuildComplexity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

impl From<String> for BuildComplexity {
    fn from(label: String) -> Self {
        Self::from_label(&label)
    }
}

impl From<BuildComplexity> for String {
    fn from(value: BuildComplexity) -> Self {
        match value {
            BuildComplexity::Unrecognized(label) => label,
            known => known.label().to_string(),
        }
    }
}

/// A candidate opportunity grouped from related pain points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    pub title: String,
    pub problem: String,
    pub mentions: i64,
    pub build_complexity: BuildComplexity,
    pub sources: Vec<String>,
}

impl Theme {
    /// Sources with duplicates removed, first-seen order preserved.
    #[must_use]
    pub fn unique_sources(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.sources
            .iter()
            .filter(|source| seen.insert(source.as_str()))
            .cloned()
            .collect()
    }
}

/// Market facts for a theme's problem statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub has_paid_solutions: bool,
    pub competitors: i64,
    pub estimated_revenue: i64,
    #[serde(default)]
    pub examples: Vec<String>,
    pub market_size: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complexity_labels_round_trip() {
        for label in ["Low", "Medium", "High", "Very High"] {
            assert_eq!(BuildComplexity::from_label(label).label(), label);
        }
    }

    #[test]
    fn complexity_unknown_label_is_kept_verbatim() {
        let parsed = BuildComplexity::from_label("Trivial");
        assert_eq!(parsed, BuildComplexity::Unrecognized("Trivial".to_string()));
        assert_eq!(String::from(parsed), "Trivial");
    }

    #[test]
    fn complexity_label_match_is_case_sensitive() {
        assert!(matches!(
            BuildComplexity::from_label("low"),
            BuildComplexity::Unrecognized(_)
        ));
    }

    #[test]
    fn complexity_serializes_as_plain_string() {
        let json = serde_json::to_string(&BuildComplexity::VeryHigh).unwrap();
        assert_eq!(json, "\"Very High\"");
        let back: BuildComplexity = serde_json::from_str(&json).unwrap();
        assert_eq!(back, BuildComplexity::VeryHigh);
    }

    #[test]
    fn unique_sources_preserves_first_seen_order() {
        let theme = Theme {
            title: "t".to_string(),
            problem: "p".to_string(),
            mentions: 1,
            build_complexity: BuildComplexity::Low,
            sources: vec![
                "r/SaaS".to_string(),
                "r/freelance".to_string(),
                "r/SaaS".to_string(),
            ],
        };
        assert_eq!(theme.unique_sources(), vec!["r/SaaS", "r/freelance"]);
    }

    #[test]
    fn signal_counts_default_to_zero() {
        let signal: PainPointSignal =
            serde_json::from_str(r#"{"source":"r/SaaS","text":"hi","url":null}"#).unwrap();
        assert_eq!(signal.external_score, 0);
        assert_eq!(signal.comment_count, 0);
    }
}

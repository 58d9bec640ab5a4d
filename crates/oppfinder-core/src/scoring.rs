//! Opportunity scoring rules.
//!
//! The score is additive over four factors, each banded highest-first with
//! inclusive lower bounds. Factor maxima sum to exactly 100 and the total is
//! clamped anyway. Negative inputs fall into the lowest band of their factor.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::types::{BuildComplexity, Theme, ValidationResult};
use crate::CoreError;

pub const MAX_SCORE: u8 = 100;
/// Scores at or above this are marked validated.
pub const VALIDATION_THRESHOLD: u8 = 60;
/// Scores at or above this count as high-score in stats.
pub const HIGH_SCORE_THRESHOLD: u8 = 70;

const DEMAND_BANDS: &[(i64, u8)] = &[(50, 25), (30, 15), (20, 10)];
const REVENUE_BANDS: &[(i64, u8)] = &[(10_000, 35), (5_000, 25), (2_000, 15), (1_000, 10)];
const COMPETITION_BANDS: &[(i64, u8)] = &[(2, 20), (5, 15), (10, 10)];
const COMPETITION_FLOOR: u8 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompetitionLevel {
    #[serde(rename = "Very Low")]
    VeryLow,
    Low,
    Medium,
    High,
    #[serde(rename = "Very High")]
    VeryHigh,
}

impl CompetitionLevel {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::VeryLow => "Very Low",
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::VeryHigh => "Very High",
        }
    }
}

impl fmt::Display for CompetitionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

impl FromStr for CompetitionLevel {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Very Low" => Ok(Self::VeryLow),
            "Low" => Ok(Self::Low),
            "Medium" => Ok(Self::Medium),
            "High" => Ok(Self::High),
            "Very High" => Ok(Self::VeryHigh),
            other => Err(CoreError::UnknownLabel {
                kind: "competition level",
                label: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Recommendation {
    #[serde(rename = "Build immediately")]
    BuildImmediately,
    #[serde(rename = "Validate with landing page first")]
    ValidateLandingPageFirst,
    #[serde(rename = "High risk - need unique angle")]
    HighRiskNeedAngle,
    #[serde(rename = "Reject - insufficient validation")]
    Reject,
}

impl Recommendation {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::BuildImmediately => "Build immediately",
            Self::ValidateLandingPageFirst => "Validate with landing page first",
            Self::HighRiskNeedAngle => "High risk - need unique angle",
            Self::Reject => "Reject - insufficient validation",
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

impl FromStr for Recommendation {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Build immediately" => Ok(Self::BuildImmediately),
            "Validate with landing page first" => Ok(Self::ValidateLandingPageFirst),
            "High risk - need unique angle" => Ok(Self::HighRiskNeedAngle),
            "Reject - insufficient validation" => Ok(Self::Reject),
            other => Err(CoreError::UnknownLabel {
                kind: "recommendation",
                label: other.to_string(),
            }),
        }
    }
}

/// Everything the scoring rules derive for one theme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreCard {
    pub score: u8,
    pub competition_level: CompetitionLevel,
    pub recommendation: Recommendation,
    pub validated: bool,
    pub revenue_label: String,
}

impl ScoreCard {
    #[must_use]
    pub fn for_theme(theme: &Theme, validation: &ValidationResult) -> Self {
        let score = calculate_score(
            theme.mentions,
            validation.estimated_revenue,
            validation.competitors,
            &theme.build_complexity,
        );
        Self {
            score,
            competition_level: competition_level_for(validation.competitors),
            recommendation: recommendation_for(score),
            validated: is_validated(score),
            revenue_label: format_revenue_label(validation.estimated_revenue),
        }
    }
}

fn band_points(value: i64, bands: &[(i64, u8)]) -> u8 {
    bands
        .iter()
        .find(|(lower, _)| value >= *lower)
        .map_or(0, |(_, points)| *points)
}

fn competition_points(competitors: i64) -> u8 {
    if competitors < 0 {
        return COMPETITION_FLOOR;
    }
    COMPETITION_BANDS
        .iter()
        .find(|(upper, _)| competitors <= *upper)
        .map_or(COMPETITION_FLOOR, |(_, points)| *points)
}

fn complexity_points(complexity: &BuildComplexity) -> u8 {
    match complexity {
        BuildComplexity::Low => 20,
        BuildComplexity::Medium => 15,
        BuildComplexity::High => 10,
        BuildComplexity::VeryHigh | BuildComplexity::Unrecognized(_) => 0,
    }
}

/// Compute the 0–100 opportunity score.
#[must_use]
pub fn calculate_score(
    mentions: i64,
    revenue_amount: i64,
    competitors: i64,
    complexity: &BuildComplexity,
) -> u8 {
    let total = band_points(mentions, DEMAND_BANDS)
        + band_points(revenue_amount, REVENUE_BANDS)
        + competition_points(competitors)
        + complexity_points(complexity);
    total.min(MAX_SCORE)
}

/// Classify how crowded a market is. Negative counts classify as `VeryHigh`.
#[must_use]
pub fn competition_level_for(competitors: i64) -> CompetitionLevel {
    match competitors {
        0..=2 => CompetitionLevel::VeryLow,
        3..=5 => CompetitionLevel::Low,
        6..=10 => CompetitionLevel::Medium,
        11..=20 => CompetitionLevel::High,
        _ => CompetitionLevel::VeryHigh,
    }
}

#[must_use]
pub fn recommendation_for(score: u8) -> Recommendation {
    match score {
        80.. => Recommendation::BuildImmediately,
        60..=79 => Recommendation::ValidateLandingPageFirst,
        40..=59 => Recommendation::HighRiskNeedAngle,
        _ => Recommendation::Reject,
    }
}

#[must_use]
pub fn is_validated(score: u8) -> bool {
    score >= VALIDATION_THRESHOLD
}

/// Render a monthly revenue figure as `£5,000 MRR`.
#[must_use]
pub fn format_revenue_label(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if amount < 0 { "-" } else { "" };
    format!("£{sign}{grouped} MRR")
}

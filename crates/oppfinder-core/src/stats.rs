use serde::{Deserialize, Serialize};

use crate::opportunity::Opportunity;
use crate::scoring::HIGH_SCORE_THRESHOLD;

/// Dashboard counters over a set of opportunities.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpportunityStats {
    pub total: usize,
    pub validated: usize,
    pub high_score: usize,
    /// Mean score rounded half-to-even; 0 when there are no opportunities.
    pub avg_score: u8,
}

impl OpportunityStats {
    #[must_use]
    pub fn from_opportunities(opportunities: &[Opportunity]) -> Self {
        if opportunities.is_empty() {
            return Self::default();
        }
        let total = opportunities.len();
        let sum: u64 = opportunities.iter().map(|o| u64::from(o.score())).sum();
        #[allow(clippy::cast_precision_loss)]
        let mean = sum as f64 / total as f64;
        // Mean of values in 0..=100 stays in 0..=100.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let avg_score = mean.round_ties_even() as u8;

        Self {
            total,
            validated: opportunities.iter().filter(|o| o.validated()).count(),
            high_score: opportunities
                .iter()
                .filter(|o| o.score() >= HIGH_SCORE_THRESHOLD)
                .count(),
            avg_score,
        }
    }
}

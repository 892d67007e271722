use serde::{Deserialize, Serialize};

/// Tier boundaries and rule switches applied by the classifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Red-flag count at which a candidate is rejected outright.
    pub max_red_flags: u32,
    pub minimum_score: u32,
    /// When true a score equal to `minimum_score` passes.
    pub minimum_inclusive: bool,
    pub elite_score: u32,
    /// When true a score equal to `elite_score` is elite.
    pub elite_inclusive: bool,
    /// Reject whenever a critical question carries a red-flag answer.
    pub critical_override: bool,
}

impl ClassifierConfig {
    pub fn below_minimum(&self, score: u32) -> bool {
        if self.minimum_inclusive {
            score < self.minimum_score
        } else {
            score <= self.minimum_score
        }
    }

    pub fn is_elite(&self, score: u32) -> bool {
        if self.elite_inclusive {
            score >= self.elite_score
        } else {
            score > self.elite_score
        }
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            max_red_flags: 2,
            minimum_score: 98,
            minimum_inclusive: true,
            elite_score: 105,
            elite_inclusive: true,
            critical_override: true,
        }
    }
}

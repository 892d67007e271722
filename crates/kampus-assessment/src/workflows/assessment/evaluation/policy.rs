use serde::{Deserialize, Serialize};

use super::super::domain::{QuestionId, Tier};
use super::config::ClassifierConfig;

/// Why a candidate landed in the rejected tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RejectionReason {
    RedFlags { count: u32, limit: u32 },
    BelowMinimum { score: u32, minimum: u32 },
    CriticalRedFlag { questions: Vec<u8> },
}

impl RejectionReason {
    pub fn summary(&self) -> String {
        match self {
            RejectionReason::RedFlags { count, limit } => {
                format!("rejected for {count} red flag(s) (limit {limit})")
            }
            RejectionReason::BelowMinimum { score, minimum } => {
                format!("rejected for score {score} below minimum {minimum}")
            }
            RejectionReason::CriticalRedFlag { questions } => {
                let labels: Vec<String> = questions.iter().map(|index| format!("Q{index}")).collect();
                format!("rejected for red flag on critical {}", labels.join(", "))
            }
        }
    }
}

/// Apply the tier rules in order; the first rule that matches decides.
pub(crate) fn decide_tier(
    config: &ClassifierConfig,
    score: u32,
    red_flag_count: u32,
    critical_failures: &[QuestionId],
) -> (Tier, Option<RejectionReason>) {
    if red_flag_count >= config.max_red_flags {
        return (
            Tier::Rejected,
            Some(RejectionReason::RedFlags {
                count: red_flag_count,
                limit: config.max_red_flags,
            }),
        );
    }

    if config.below_minimum(score) {
        return (
            Tier::Rejected,
            Some(RejectionReason::BelowMinimum {
                score,
                minimum: config.minimum_score,
            }),
        );
    }

    if config.critical_override && !critical_failures.is_empty() {
        return (
            Tier::Rejected,
            Some(RejectionReason::CriticalRedFlag {
                questions: critical_failures.iter().map(|q| q.index()).collect(),
            }),
        );
    }

    if config.is_elite(score) {
        (Tier::Tier1, None)
    } else {
        (Tier::Tier2, None)
    }
}

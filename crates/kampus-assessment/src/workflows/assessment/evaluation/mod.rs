mod config;
mod key;
mod policy;
mod rules;

pub use config::ClassifierConfig;
pub use key::{AnswerKey, AnswerKeyError, CriticalQuestions, RedFlagTable, ScoringTable};
pub use policy::RejectionReason;

use std::sync::Arc;

use super::domain::{AnswerSet, Tier};
use policy::decide_tier;
use serde::{Deserialize, Serialize};

/// Stateless evaluator applying the answer key and tier rules to an answer set.
#[derive(Debug, Clone)]
pub struct Evaluator {
    key: Arc<AnswerKey>,
    config: ClassifierConfig,
}

impl Evaluator {
    pub fn new(key: Arc<AnswerKey>, config: ClassifierConfig) -> Self {
        Self { key, config }
    }

    pub fn key(&self) -> &AnswerKey {
        &self.key
    }

    pub fn score(&self, answers: &AnswerSet) -> u32 {
        rules::score_answers(&self.key, answers)
    }

    pub fn count_red_flags(&self, answers: &AnswerSet) -> u32 {
        rules::count_red_flags(&self.key, answers)
    }

    pub fn classify(&self, score: u32, red_flag_count: u32, answers: &AnswerSet) -> Tier {
        let critical = rules::critical_failures(&self.key, answers);
        decide_tier(&self.config, score, red_flag_count, &critical).0
    }

    pub fn evaluate(&self, answers: &AnswerSet) -> EvaluationResult {
        let score = self.score(answers);
        let red_flag_count = self.count_red_flags(answers);
        let critical = rules::critical_failures(&self.key, answers);
        let (tier, rejection) = decide_tier(&self.config, score, red_flag_count, &critical);

        EvaluationResult {
            score,
            red_flag_count,
            tier,
            rejection,
        }
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new(Arc::new(AnswerKey::standard()), ClassifierConfig::default())
    }
}

/// The single authoritative outcome of one submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub score: u32,
    pub red_flag_count: u32,
    pub tier: Tier,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejection: Option<RejectionReason>,
}

impl EvaluationResult {
    pub fn summary(&self) -> String {
        match &self.rejection {
            Some(reason) => reason.summary(),
            None => format!("{} with score {}", self.tier.label(), self.score),
        }
    }
}

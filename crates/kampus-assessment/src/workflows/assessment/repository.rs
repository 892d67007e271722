use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{AnswerSet, CandidateIdentity, SubmissionId};
use super::evaluation::EvaluationResult;

/// Stored submission: identity, raw answers, and the one evaluation made for them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionRecord {
    pub submission_id: SubmissionId,
    pub identity: CandidateIdentity,
    pub answers: AnswerSet,
    pub evaluation: EvaluationResult,
    pub submitted_at: DateTime<Utc>,
}

impl SubmissionRecord {
    pub fn result_view(&self) -> SubmissionResultView {
        SubmissionResultView {
            submission_id: self.submission_id.clone(),
            name: self.identity.name.clone(),
            email: self.identity.email.clone(),
            position: self.identity.position.clone(),
            score: self.evaluation.score,
            red_flag_count: self.evaluation.red_flag_count,
            tier: self.evaluation.tier.label(),
            decision_rationale: self.evaluation.summary(),
            submitted_at: self.submitted_at,
            answers: self
                .answers
                .listing()
                .into_iter()
                .map(|(question, choice)| AnswerView {
                    question: question.label(),
                    answer: choice.map(|choice| choice.letter()).unwrap_or("N/A"),
                })
                .collect(),
        }
    }
}

/// Append-only storage for submissions.
pub trait SubmissionRepository: Send + Sync {
    fn append(&self, record: SubmissionRecord) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &SubmissionId) -> Result<Option<SubmissionRecord>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("submission already recorded")]
    Conflict,
    #[error("submission not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
    #[error("stored submission is corrupt: {0}")]
    Corrupt(String),
}

/// HR-facing view of a stored result.
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionResultView {
    pub submission_id: SubmissionId,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    pub score: u32,
    pub red_flag_count: u32,
    pub tier: &'static str,
    pub decision_rationale: String,
    pub submitted_at: DateTime<Utc>,
    pub answers: Vec<AnswerView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnswerView {
    pub question: String,
    pub answer: &'static str,
}

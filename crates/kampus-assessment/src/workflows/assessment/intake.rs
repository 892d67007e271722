use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::domain::{AnswerSet, CandidateIdentity, Choice, QuestionId};

/// Validation errors raised while normalizing a submitted form.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum IntakeViolation {
    #[error("candidate name is required")]
    MissingName,
    #[error("candidate email is required")]
    MissingEmail,
    #[error("'{0}' is not a valid email address")]
    InvalidEmail(String),
}

/// Raw form fields exactly as posted by the browser.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawSubmission {
    fields: HashMap<String, String>,
}

impl RawSubmission {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }
}

impl From<HashMap<String, String>> for RawSubmission {
    fn from(fields: HashMap<String, String>) -> Self {
        Self { fields }
    }
}

/// Normalized submission ready for evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedSubmission {
    pub identity: CandidateIdentity,
    pub answers: AnswerSet,
}

/// Guard responsible for turning raw form fields into a normalized submission.
#[derive(Debug, Clone, Default)]
pub struct IntakeGuard;

impl IntakeGuard {
    pub fn normalize(
        &self,
        submission: &RawSubmission,
    ) -> Result<NormalizedSubmission, IntakeViolation> {
        let identity = self.identity(submission)?;
        let answers = self.answers(submission);
        Ok(NormalizedSubmission { identity, answers })
    }

    fn identity(&self, submission: &RawSubmission) -> Result<CandidateIdentity, IntakeViolation> {
        let name = trimmed(submission.field("name")).ok_or(IntakeViolation::MissingName)?;
        let email = trimmed(submission.field("email")).ok_or(IntakeViolation::MissingEmail)?;
        if !looks_like_email(&email) {
            return Err(IntakeViolation::InvalidEmail(email));
        }
        let position = trimmed(submission.field("position"));

        Ok(CandidateIdentity {
            name,
            email,
            position,
        })
    }

    /// Missing `q<i>` fields and values other than A-D stay unanswered.
    fn answers(&self, submission: &RawSubmission) -> AnswerSet {
        QuestionId::all()
            .filter_map(|question| {
                submission
                    .field(&question.field_name())
                    .and_then(Choice::parse)
                    .map(|choice| (question, choice))
            })
            .collect()
    }
}

fn trimmed(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn looks_like_email(value: &str) -> bool {
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !value.chars().any(char::is_whitespace)
        }
        None => false,
    }
}

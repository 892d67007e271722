use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of questions on the assessment.
pub const QUESTION_COUNT: u8 = 30;

/// Opaque identifier handed out per submission, used for the HR lookup link.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubmissionId(pub String);

impl SubmissionId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }
}

impl fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Question index on the assessment, always within `1..=QUESTION_COUNT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct QuestionId(u8);

impl QuestionId {
    pub fn new(index: u8) -> Option<Self> {
        (1..=QUESTION_COUNT).contains(&index).then_some(Self(index))
    }

    pub const fn index(self) -> u8 {
        self.0
    }

    /// Every question in order, `Q1` through `Q30`.
    pub fn all() -> impl Iterator<Item = QuestionId> {
        (1..=QUESTION_COUNT).map(QuestionId)
    }

    /// Name of the inbound form field carrying this question's answer.
    pub fn field_name(self) -> String {
        format!("q{}", self.0)
    }

    pub fn label(self) -> String {
        format!("Q{}", self.0)
    }
}

impl TryFrom<u8> for QuestionId {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        QuestionId::new(value)
            .ok_or_else(|| format!("question index {value} outside 1..={QUESTION_COUNT}"))
    }
}

impl From<QuestionId> for u8 {
    fn from(value: QuestionId) -> Self {
        value.0
    }
}

/// Multiple-choice letter a candidate can select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Choice {
    A,
    B,
    C,
    D,
}

impl Choice {
    pub const fn ordered() -> [Self; 4] {
        [Self::A, Self::B, Self::C, Self::D]
    }

    pub const fn letter(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
        }
    }

    /// Parse a submitted form value. Only the exact letters `A`-`D` count;
    /// lowercase, padded, or other values are treated as no answer.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "A" => Some(Self::A),
            "B" => Some(Self::B),
            "C" => Some(Self::C),
            "D" => Some(Self::D),
            _ => None,
        }
    }
}

/// Answers for one submission. Questions without an entry are unanswered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerSet {
    answers: BTreeMap<QuestionId, Choice>,
}

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, question: QuestionId, choice: Choice) -> Self {
        self.answers.insert(question, choice);
        self
    }

    pub fn answer(&self, question: QuestionId) -> Option<Choice> {
        self.answers.get(&question).copied()
    }

    pub fn answered(&self) -> usize {
        self.answers.len()
    }

    /// Build an answer set from positional letters, `answers[0]` being Q1.
    /// Blank or unrecognised entries stay unanswered.
    pub fn from_letters<'a, I>(letters: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let answers = QuestionId::all()
            .zip(letters)
            .filter_map(|(question, raw)| Choice::parse(raw).map(|choice| (question, choice)))
            .collect();
        Self { answers }
    }

    /// Per-question listing in question order with `None` for unanswered.
    pub fn listing(&self) -> Vec<(QuestionId, Option<Choice>)> {
        QuestionId::all()
            .map(|question| (question, self.answer(question)))
            .collect()
    }
}

impl FromIterator<(QuestionId, Choice)> for AnswerSet {
    fn from_iter<T: IntoIterator<Item = (QuestionId, Choice)>>(iter: T) -> Self {
        Self {
            answers: iter.into_iter().collect(),
        }
    }
}

/// Identity fields captured alongside the answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateIdentity {
    pub name: String,
    pub email: String,
    pub position: Option<String>,
}

/// Final classification bucket for a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Rejected,
    Tier1,
    Tier2,
}

impl Tier {
    pub const fn label(self) -> &'static str {
        match self {
            Tier::Rejected => "Rejected",
            Tier::Tier1 => "Tier 1 (Elite)",
            Tier::Tier2 => "Tier 2 (Strong)",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        [Tier::Rejected, Tier::Tier1, Tier::Tier2]
            .into_iter()
            .find(|tier| tier.label() == label)
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

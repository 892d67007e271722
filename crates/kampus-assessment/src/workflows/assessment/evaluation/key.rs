use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::super::domain::{Choice, QuestionId};

/// Points awarded per question and choice. Choices without an entry score 0.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoringTable(BTreeMap<QuestionId, BTreeMap<Choice, u32>>);

impl ScoringTable {
    pub fn points(&self, question: QuestionId, choice: Choice) -> u32 {
        self.0
            .get(&question)
            .and_then(|choices| choices.get(&choice))
            .copied()
            .unwrap_or(0)
    }

    /// Highest scoring entry for the question, if it scores at all.
    pub fn best_choice(&self, question: QuestionId) -> Option<(Choice, u32)> {
        self.0.get(&question).and_then(|choices| {
            choices
                .iter()
                .max_by(|left, right| left.1.cmp(right.1).then(right.0.cmp(left.0)))
                .map(|(choice, points)| (*choice, *points))
        })
    }
}

impl<const N: usize> From<[(u8, &[(Choice, u32)]); N]> for ScoringTable {
    fn from(entries: [(u8, &[(Choice, u32)]); N]) -> Self {
        Self(
            entries
                .into_iter()
                .filter_map(|(index, choices)| {
                    QuestionId::new(index)
                        .map(|question| (question, choices.iter().copied().collect()))
                })
                .collect(),
        )
    }
}

/// Choices that indicate poor fit for a question regardless of their points.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RedFlagTable(BTreeMap<QuestionId, BTreeSet<Choice>>);

impl RedFlagTable {
    pub fn is_red_flag(&self, question: QuestionId, choice: Choice) -> bool {
        self.0
            .get(&question)
            .map(|flags| flags.contains(&choice))
            .unwrap_or(false)
    }

    pub fn has_entries(&self, question: QuestionId) -> bool {
        self.0
            .get(&question)
            .map(|flags| !flags.is_empty())
            .unwrap_or(false)
    }
}

impl<const N: usize> From<[(u8, &[Choice]); N]> for RedFlagTable {
    fn from(entries: [(u8, &[Choice]); N]) -> Self {
        Self(
            entries
                .into_iter()
                .filter_map(|(index, choices)| {
                    QuestionId::new(index)
                        .map(|question| (question, choices.iter().copied().collect()))
                })
                .collect(),
        )
    }
}

/// Questions whose red-flag answer rejects the candidate on its own.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CriticalQuestions(BTreeSet<QuestionId>);

impl CriticalQuestions {
    pub fn iter(&self) -> impl Iterator<Item = QuestionId> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<QuestionId> for CriticalQuestions {
    fn from_iter<T: IntoIterator<Item = QuestionId>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Scoring, red-flag, and critical-question tables loaded once at startup.
///
/// The critical override and the red-flag counter both read `red_flags`, so the
/// two can never disagree about what counts as a red flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerKey {
    pub scores: ScoringTable,
    pub red_flags: RedFlagTable,
    pub critical: CriticalQuestions,
}

/// Problems found while loading or validating an answer key.
#[derive(Debug, thiserror::Error)]
pub enum AnswerKeyError {
    #[error("failed to read answer key: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid answer key JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("critical question {0} has no red-flag choices, so the override can never fire")]
    CriticalWithoutRedFlags(u8),
    #[error("question {0} awards no points for any choice")]
    UnscoredQuestion(u8),
}

impl AnswerKey {
    /// The Kampus HR psychometric key.
    pub fn standard() -> Self {
        use Choice::{A, B, C, D};

        let scores = ScoringTable::from([
            (1, &[(B, 4)][..]),
            (2, &[(C, 4), (B, 1)][..]),
            (3, &[(C, 4), (B, 1), (D, 1)][..]),
            (4, &[(C, 4), (B, 1)][..]),
            (5, &[(B, 4)][..]),
            (6, &[(C, 4)][..]),
            (7, &[(C, 4)][..]),
            (8, &[(C, 4), (D, 1)][..]),
            (9, &[(A, 4)][..]),
            (10, &[(C, 4)][..]),
            (11, &[(B, 4)][..]),
            (12, &[(C, 4)][..]),
            (13, &[(A, 4), (B, 1)][..]),
            (14, &[(B, 4), (C, 2)][..]),
            (15, &[(A, 4), (B, 2)][..]),
            (16, &[(A, 4), (C, 1)][..]),
            (17, &[(B, 4)][..]),
            (18, &[(B, 4)][..]),
            (19, &[(B, 4)][..]),
            (20, &[(B, 4)][..]),
            (21, &[(B, 4)][..]),
            (22, &[(A, 4)][..]),
            (23, &[(A, 4), (B, 1), (D, 1)][..]),
            (24, &[(B, 4)][..]),
            (25, &[(B, 4)][..]),
            (26, &[(B, 4)][..]),
            (27, &[(B, 4)][..]),
            (28, &[(B, 4), (A, 1)][..]),
            (29, &[(A, 4), (B, 3)][..]),
            (30, &[(A, 4), (B, 1)][..]),
        ]);

        let red_flags = RedFlagTable::from([
            (1, &[A, C, D][..]),
            (2, &[A, D][..]),
            (4, &[A, D][..]),
            (5, &[A, C, D][..]),
            (10, &[A, B, D][..]),
            (13, &[C, D][..]),
            (15, &[C, D][..]),
            (18, &[A, C, D][..]),
            (19, &[A, C, D][..]),
            (20, &[A, C, D][..]),
            (22, &[B, C, D][..]),
            (23, &[C][..]),
            (24, &[A, C, D][..]),
            (25, &[A, C, D][..]),
            (26, &[A, C, D][..]),
            (27, &[A, C, D][..]),
            (28, &[C, D][..]),
            (29, &[C, D][..]),
            (30, &[C, D][..]),
        ]);

        let critical = [1, 10, 15, 30]
            .into_iter()
            .filter_map(QuestionId::new)
            .collect();

        Self {
            scores,
            red_flags,
            critical,
        }
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, AnswerKeyError> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, AnswerKeyError> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    /// Sum of each question's best entry, saturating at `u32::MAX`.
    pub fn max_score(&self) -> u32 {
        QuestionId::all()
            .filter_map(|question| self.scores.best_choice(question))
            .map(|(_, points)| points)
            .fold(0u32, u32::saturating_add)
    }

    /// Report table drift: critical questions without red-flag entries and
    /// questions that cannot score.
    pub fn validate(&self) -> Vec<AnswerKeyError> {
        let mut problems: Vec<AnswerKeyError> = self
            .critical
            .iter()
            .filter(|question| !self.red_flags.has_entries(*question))
            .map(|question| AnswerKeyError::CriticalWithoutRedFlags(question.index()))
            .collect();

        problems.extend(
            QuestionId::all()
                .filter(|question| {
                    self.scores
                        .best_choice(*question)
                        .map(|(_, points)| points == 0)
                        .unwrap_or(true)
                })
                .map(|question| AnswerKeyError::UnscoredQuestion(question.index())),
        );

        problems
    }
}

impl Default for AnswerKey {
    fn default() -> Self {
        Self::standard()
    }
}

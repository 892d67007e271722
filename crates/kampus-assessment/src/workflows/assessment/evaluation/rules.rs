use super::super::domain::{AnswerSet, QuestionId};
use super::key::AnswerKey;

/// Saturates at `u32::MAX` so oversized custom tables cannot wrap the total.
pub(crate) fn score_answers(key: &AnswerKey, answers: &AnswerSet) -> u32 {
    QuestionId::all()
        .filter_map(|question| {
            answers
                .answer(question)
                .map(|choice| key.scores.points(question, choice))
        })
        .fold(0u32, u32::saturating_add)
}

pub(crate) fn count_red_flags(key: &AnswerKey, answers: &AnswerSet) -> u32 {
    QuestionId::all()
        .filter(|question| {
            answers
                .answer(*question)
                .map(|choice| key.red_flags.is_red_flag(*question, choice))
                .unwrap_or(false)
        })
        .count() as u32
}

/// Critical questions answered with one of their own red-flag choices.
pub(crate) fn critical_failures(key: &AnswerKey, answers: &AnswerSet) -> Vec<QuestionId> {
    key.critical
        .iter()
        .filter(|question| {
            answers
                .answer(*question)
                .map(|choice| key.red_flags.is_red_flag(*question, choice))
                .unwrap_or(false)
        })
        .collect()
}

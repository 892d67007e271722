use super::common::*;
use crate::workflows::assessment::domain::Choice;
use crate::workflows::assessment::intake::{IntakeGuard, IntakeViolation, RawSubmission};

#[test]
fn normalize_defaults_missing_answers_to_unanswered() {
    let raw = raw_submission(&["B", "", "z", "C"]);
    let normalized = IntakeGuard.normalize(&raw).expect("valid submission");

    assert_eq!(normalized.answers.answer(q(1)), Some(Choice::B));
    assert_eq!(normalized.answers.answer(q(2)), None);
    assert_eq!(normalized.answers.answer(q(3)), None);
    assert_eq!(normalized.answers.answer(q(4)), Some(Choice::C));
    assert_eq!(normalized.answers.answer(q(30)), None);
    assert_eq!(normalized.answers.answered(), 2);
}

#[test]
fn lowercase_or_padded_letters_stay_unanswered() {
    let raw = raw_submission(&[]).with_field("q1", "b").with_field("q5", " B ");
    let normalized = IntakeGuard.normalize(&raw).expect("valid submission");

    assert_eq!(normalized.answers.answered(), 0);
    let result = evaluator().evaluate(&normalized.answers);
    assert_eq!(result.score, 0);
    assert_eq!(result.red_flag_count, 0);
}

#[test]
fn normalize_ignores_fields_beyond_question_thirty() {
    let raw = raw_submission(&[]).with_field("q31", "A").with_field("q0", "B");
    let normalized = IntakeGuard.normalize(&raw).expect("valid submission");

    assert_eq!(normalized.answers.answered(), 0);
}

#[test]
fn normalize_trims_identity_and_drops_blank_position() {
    let raw = RawSubmission::default()
        .with_field("name", "  Jane Doe ")
        .with_field("email", " jane@example.com")
        .with_field("position", "   ");
    let normalized = IntakeGuard.normalize(&raw).expect("valid submission");

    assert_eq!(normalized.identity.name, "Jane Doe");
    assert_eq!(normalized.identity.email, "jane@example.com");
    assert_eq!(normalized.identity.position, None);
}

#[test]
fn normalize_requires_name_and_valid_email() {
    let missing_name = RawSubmission::default().with_field("email", "jane@example.com");
    assert_eq!(
        IntakeGuard.normalize(&missing_name),
        Err(IntakeViolation::MissingName)
    );

    let missing_email = RawSubmission::default().with_field("name", "Jane");
    assert_eq!(
        IntakeGuard.normalize(&missing_email),
        Err(IntakeViolation::MissingEmail)
    );

    for bad in ["jane", "@example.com", "jane@", "ja ne@example.com", "a@b@c"] {
        let raw = RawSubmission::default()
            .with_field("name", "Jane")
            .with_field("email", bad);
        assert_eq!(
            IntakeGuard.normalize(&raw),
            Err(IntakeViolation::InvalidEmail(bad.to_string())),
            "{bad} should be rejected"
        );
    }
}

//! Psychometric assessment intake, scoring, persistence, and notification.
//!
//! Submissions flow one way: raw form fields are normalized by the intake guard,
//! scored once by the [`Evaluator`], appended to a [`SubmissionRepository`], and
//! then rendered into a spreadsheet and mailed through a [`Notifier`].

pub mod domain;
pub mod evaluation;
pub mod intake;
pub mod notify;
pub mod report;
pub mod repository;
pub mod router;
pub mod service;
pub mod store;
pub mod views;

#[cfg(test)]
mod tests;

pub use domain::{
    AnswerSet, CandidateIdentity, Choice, QuestionId, SubmissionId, Tier, QUESTION_COUNT,
};
pub use evaluation::{
    AnswerKey, AnswerKeyError, ClassifierConfig, EvaluationResult, Evaluator, RejectionReason,
};
pub use intake::{IntakeGuard, IntakeViolation, NormalizedSubmission, RawSubmission};
pub use notify::{
    LogNotifier, Notification, NotificationKind, NotificationTemplates, Notifier, NotifyError,
    SmtpNotifier,
};
pub use report::{ReportArtifact, ReportError, ReportRenderer, XlsxReportRenderer};
pub use repository::{
    RepositoryError, SubmissionRecord, SubmissionRepository, SubmissionResultView,
};
pub use router::assessment_router;
pub use service::{
    AssessmentService, AssessmentServiceError, DeliveryIssue, DeliveryStage, SubmissionOutcome,
};
pub use store::CsvSubmissionLog;

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};

use super::domain::SubmissionId;
use super::evaluation::Evaluator;
use super::intake::{IntakeGuard, IntakeViolation, RawSubmission};
use super::notify::{NotificationKind, NotificationTemplates, Notifier, NotifyError};
use super::report::{ReportError, ReportRenderer};
use super::repository::{RepositoryError, SubmissionRecord, SubmissionRepository};

/// Service composing intake, evaluation, storage, report rendering, and notification.
pub struct AssessmentService<R, N, G> {
    guard: IntakeGuard,
    evaluator: Arc<Evaluator>,
    repository: Arc<R>,
    notifier: Arc<N>,
    renderer: Arc<G>,
    templates: NotificationTemplates,
}

impl<R, N, G> AssessmentService<R, N, G>
where
    R: SubmissionRepository + 'static,
    N: Notifier + 'static,
    G: ReportRenderer + 'static,
{
    pub fn new(
        evaluator: Arc<Evaluator>,
        repository: Arc<R>,
        notifier: Arc<N>,
        renderer: Arc<G>,
        templates: NotificationTemplates,
    ) -> Self {
        Self {
            guard: IntakeGuard,
            evaluator,
            repository,
            notifier,
            renderer,
            templates,
        }
    }

    pub fn templates(&self) -> &NotificationTemplates {
        &self.templates
    }

    /// Evaluate a raw submission once, persist it, then render and notify from
    /// that same result. Storage failures abort; delivery failures are reported
    /// on the outcome.
    pub fn submit(
        &self,
        submission: RawSubmission,
    ) -> Result<SubmissionOutcome, AssessmentServiceError> {
        let normalized = self.guard.normalize(&submission)?;
        let evaluation = self.evaluator.evaluate(&normalized.answers);

        let record = SubmissionRecord {
            submission_id: SubmissionId::generate(),
            identity: normalized.identity,
            answers: normalized.answers,
            evaluation,
            submitted_at: Utc::now(),
        };

        self.repository.append(record.clone())?;
        info!(
            submission_id = %record.submission_id,
            tier = record.evaluation.tier.label(),
            score = record.evaluation.score,
            red_flags = record.evaluation.red_flag_count,
            "assessment recorded"
        );

        let delivery_issues = self.deliver(&record);
        Ok(SubmissionOutcome {
            record,
            delivery_issues,
        })
    }

    /// Fetch a stored submission for the HR result view.
    pub fn get(&self, id: &SubmissionId) -> Result<SubmissionRecord, AssessmentServiceError> {
        let record = self.repository.fetch(id)?.ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    fn deliver(&self, record: &SubmissionRecord) -> Vec<DeliveryIssue> {
        let mut issues = Vec::new();

        let attachment = match self.renderer.render(record) {
            Ok(artifact) => Some(artifact),
            Err(err) => {
                warn!(submission_id = %record.submission_id, error = %err, "report rendering failed");
                issues.push(DeliveryIssue::report(&err));
                None
            }
        };

        let messages = [
            self.templates.hr_message(record, attachment),
            self.templates.candidate_message(record),
        ];
        for message in &messages {
            if let Err(err) = self.notifier.send(message) {
                warn!(
                    submission_id = %record.submission_id,
                    kind = message.kind.label(),
                    error = %err,
                    "notification failed"
                );
                issues.push(DeliveryIssue::notification(message.kind, &err));
            }
        }

        issues
    }
}

/// A non-fatal failure after the submission was stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeliveryIssue {
    pub stage: DeliveryStage,
    pub detail: String,
}

impl DeliveryIssue {
    fn report(err: &ReportError) -> Self {
        Self {
            stage: DeliveryStage::Report,
            detail: err.to_string(),
        }
    }

    fn notification(kind: NotificationKind, err: &NotifyError) -> Self {
        let stage = match kind {
            NotificationKind::HumanResources => DeliveryStage::HumanResourcesMail,
            NotificationKind::Candidate => DeliveryStage::CandidateMail,
        };
        Self {
            stage,
            detail: err.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStage {
    Report,
    HumanResourcesMail,
    CandidateMail,
}

/// Result of a stored submission plus anything that went wrong delivering it.
#[derive(Debug, Clone)]
pub struct SubmissionOutcome {
    pub record: SubmissionRecord,
    pub delivery_issues: Vec<DeliveryIssue>,
}

impl SubmissionOutcome {
    pub fn fully_delivered(&self) -> bool {
        self.delivery_issues.is_empty()
    }
}

/// Error raised by the assessment service.
#[derive(Debug, thiserror::Error)]
pub enum AssessmentServiceError {
    #[error(transparent)]
    Intake(#[from] IntakeViolation),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

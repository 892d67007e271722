use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::workflows::assessment::domain::{AnswerSet, Choice, QuestionId, SubmissionId};
use crate::workflows::assessment::evaluation::{AnswerKey, ClassifierConfig, Evaluator};
use crate::workflows::assessment::intake::RawSubmission;
use crate::workflows::assessment::notify::{
    Notification, NotificationTemplates, Notifier, NotifyError,
};
use crate::workflows::assessment::report::{
    ReportArtifact, ReportError, ReportRenderer, XlsxReportRenderer,
};
use crate::workflows::assessment::repository::{
    RepositoryError, SubmissionRecord, SubmissionRepository,
};
use crate::workflows::assessment::service::AssessmentService;

/// Highest scoring, red-flag free choice for every question of the standard key.
pub(super) const BEST_LETTERS: [&str; 30] = [
    "B", "C", "C", "C", "B", "C", "C", "C", "A", "C", "B", "C", "A", "B", "A", "A", "B", "B", "B",
    "B", "B", "A", "A", "B", "B", "B", "B", "B", "A", "A",
];

pub(super) fn q(index: u8) -> QuestionId {
    QuestionId::new(index).expect("valid question index")
}

pub(super) fn answers(pairs: &[(u8, Choice)]) -> AnswerSet {
    pairs
        .iter()
        .map(|(index, choice)| (q(*index), *choice))
        .collect()
}

pub(super) fn best_answers() -> AnswerSet {
    AnswerSet::from_letters(BEST_LETTERS)
}

pub(super) fn evaluator() -> Evaluator {
    Evaluator::default()
}

pub(super) fn evaluator_with(config: ClassifierConfig) -> Evaluator {
    Evaluator::new(Arc::new(AnswerKey::standard()), config)
}

pub(super) fn templates(disclose_score: bool) -> NotificationTemplates {
    NotificationTemplates::new(
        "Kampus HR",
        vec!["hr@kampushr.com".to_string(), "lead@kampushr.com".to_string()],
        disclose_score,
    )
}

pub(super) fn raw_submission(letters: &[&str]) -> RawSubmission {
    let mut raw = RawSubmission::default()
        .with_field("name", "Jane Doe")
        .with_field("email", "jane@example.com")
        .with_field("position", "Operations Analyst");
    for (question, letter) in QuestionId::all().zip(letters) {
        raw = raw.with_field(question.field_name(), *letter);
    }
    raw
}

pub(super) type MemoryService = AssessmentService<MemoryRepository, MemoryNotifier, XlsxReportRenderer>;

pub(super) fn build_service() -> (MemoryService, Arc<MemoryRepository>, Arc<MemoryNotifier>) {
    let repository = Arc::new(MemoryRepository::default());
    let notifier = Arc::new(MemoryNotifier::default());
    let service = AssessmentService::new(
        Arc::new(evaluator()),
        repository.clone(),
        notifier.clone(),
        Arc::new(XlsxReportRenderer),
        templates(false),
    );
    (service, repository, notifier)
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<HashMap<SubmissionId, SubmissionRecord>>>,
}

impl MemoryRepository {
    pub(super) fn len(&self) -> usize {
        self.records.lock().expect("repository mutex poisoned").len()
    }
}

impl SubmissionRepository for MemoryRepository {
    fn append(&self, record: SubmissionRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.submission_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.submission_id.clone(), record);
        Ok(())
    }

    fn fetch(&self, id: &SubmissionId) -> Result<Option<SubmissionRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }
}

pub(super) struct UnavailableRepository;

impl SubmissionRepository for UnavailableRepository {
    fn append(&self, _record: SubmissionRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &SubmissionId) -> Result<Option<SubmissionRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryNotifier {
    sent: Arc<Mutex<Vec<Notification>>>,
}

impl MemoryNotifier {
    pub(super) fn sent(&self) -> Vec<Notification> {
        self.sent.lock().expect("notifier mutex poisoned").clone()
    }
}

impl Notifier for MemoryNotifier {
    fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        self.sent
            .lock()
            .expect("notifier mutex poisoned")
            .push(notification.clone());
        Ok(())
    }
}

pub(super) struct OfflineNotifier;

impl Notifier for OfflineNotifier {
    fn send(&self, _notification: &Notification) -> Result<(), NotifyError> {
        Err(NotifyError::Transport("connection refused".to_string()))
    }
}

pub(super) struct BrokenRenderer;

impl ReportRenderer for BrokenRenderer {
    fn render(&self, _record: &SubmissionRecord) -> Result<ReportArtifact, ReportError> {
        Err(ReportError::Spreadsheet(
            rust_xlsxwriter::XlsxError::ParameterError("forced failure".to_string()),
        ))
    }
}

pub(super) async fn read_body(response: Response) -> String {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    String::from_utf8(body.to_vec()).expect("utf8 body")
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = read_body(response).await;
    serde_json::from_str(&body).expect("json payload")
}

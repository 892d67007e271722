use kampus_assessment::config::{AssessmentConfig, MailConfig};
use kampus_assessment::workflows::assessment::{
    CsvSubmissionLog, LogNotifier, Notification, Notifier, NotifyError, RepositoryError,
    SmtpNotifier, SubmissionId, SubmissionRecord, SubmissionRepository,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemorySubmissionRepository {
    records: Arc<Mutex<HashMap<SubmissionId, SubmissionRecord>>>,
}

impl SubmissionRepository for InMemorySubmissionRepository {
    fn append(&self, record: SubmissionRecord) -> Result<(), RepositoryError> {
        let mut guard = self
            .records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("repository mutex poisoned".to_string()))?;
        if guard.contains_key(&record.submission_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.submission_id.clone(), record);
        Ok(())
    }

    fn fetch(&self, id: &SubmissionId) -> Result<Option<SubmissionRecord>, RepositoryError> {
        let guard = self
            .records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("repository mutex poisoned".to_string()))?;
        Ok(guard.get(id).cloned())
    }
}

/// Storage picked at startup: the CSV log when a path is configured, memory otherwise.
pub(crate) enum SubmissionStore {
    Memory(InMemorySubmissionRepository),
    Csv(CsvSubmissionLog),
}

impl SubmissionStore {
    pub(crate) fn from_config(config: &AssessmentConfig) -> Self {
        match &config.store_path {
            Some(path) => SubmissionStore::Csv(CsvSubmissionLog::new(path)),
            None => SubmissionStore::Memory(InMemorySubmissionRepository::default()),
        }
    }

    pub(crate) fn describe(&self) -> String {
        match self {
            SubmissionStore::Memory(_) => "memory".to_string(),
            SubmissionStore::Csv(log) => format!("csv:{}", log.path().display()),
        }
    }
}

impl SubmissionRepository for SubmissionStore {
    fn append(&self, record: SubmissionRecord) -> Result<(), RepositoryError> {
        match self {
            SubmissionStore::Memory(store) => store.append(record),
            SubmissionStore::Csv(store) => store.append(record),
        }
    }

    fn fetch(&self, id: &SubmissionId) -> Result<Option<SubmissionRecord>, RepositoryError> {
        match self {
            SubmissionStore::Memory(store) => store.fetch(id),
            SubmissionStore::Csv(store) => store.fetch(id),
        }
    }
}

/// Outbound mail: SMTP when a server is configured, log-only otherwise.
pub(crate) enum Mailer {
    Smtp(SmtpNotifier),
    Log(LogNotifier),
}

impl Mailer {
    pub(crate) fn from_config(config: &MailConfig) -> Result<Self, NotifyError> {
        if config.enabled() {
            Ok(Mailer::Smtp(SmtpNotifier::from_config(config)?))
        } else {
            Ok(Mailer::Log(LogNotifier))
        }
    }

    pub(crate) fn describe(&self) -> &'static str {
        match self {
            Mailer::Smtp(_) => "smtp",
            Mailer::Log(_) => "log",
        }
    }
}

impl Notifier for Mailer {
    fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        match self {
            Mailer::Smtp(notifier) => notifier.send(notification),
            Mailer::Log(notifier) => notifier.send(notification),
        }
    }
}

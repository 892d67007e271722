use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{CandidateIdentity, SubmissionId, Tier};
use super::evaluation::{EvaluationResult, RejectionReason};
use super::repository::{RepositoryError, SubmissionRecord, SubmissionRepository};

/// Flat row layout of the submission log. Answers are kept as JSON so the log
/// stays one row per submission.
#[derive(Debug, Serialize, Deserialize)]
struct LogRow {
    submission_id: String,
    submitted_at: DateTime<Utc>,
    name: String,
    email: String,
    position: String,
    score: u32,
    red_flags: u32,
    tier: String,
    answers: String,
    rejection: String,
}

impl LogRow {
    fn from_record(record: &SubmissionRecord) -> Result<Self, RepositoryError> {
        let answers = serde_json::to_string(&record.answers)
            .map_err(|err| RepositoryError::Corrupt(err.to_string()))?;
        let rejection = match &record.evaluation.rejection {
            Some(reason) => serde_json::to_string(reason)
                .map_err(|err| RepositoryError::Corrupt(err.to_string()))?,
            None => String::new(),
        };

        Ok(Self {
            submission_id: record.submission_id.0.clone(),
            submitted_at: record.submitted_at,
            name: record.identity.name.clone(),
            email: record.identity.email.clone(),
            position: record.identity.position.clone().unwrap_or_default(),
            score: record.evaluation.score,
            red_flags: record.evaluation.red_flag_count,
            tier: record.evaluation.tier.label().to_string(),
            answers,
            rejection,
        })
    }

    fn into_record(self) -> Result<SubmissionRecord, RepositoryError> {
        let tier = Tier::from_label(&self.tier)
            .ok_or_else(|| RepositoryError::Corrupt(format!("unknown tier '{}'", self.tier)))?;
        let answers = serde_json::from_str(&self.answers)
            .map_err(|err| RepositoryError::Corrupt(err.to_string()))?;
        let rejection = if self.rejection.is_empty() {
            None
        } else {
            Some(
                serde_json::from_str::<RejectionReason>(&self.rejection)
                    .map_err(|err| RepositoryError::Corrupt(err.to_string()))?,
            )
        };

        Ok(SubmissionRecord {
            submission_id: SubmissionId(self.submission_id),
            identity: CandidateIdentity {
                name: self.name,
                email: self.email,
                position: (!self.position.is_empty()).then_some(self.position),
            },
            answers,
            evaluation: EvaluationResult {
                score: self.score,
                red_flag_count: self.red_flags,
                tier,
                rejection,
            },
            submitted_at: self.submitted_at,
        })
    }
}

/// Append-only CSV log of submissions on local disk.
#[derive(Debug)]
pub struct CsvSubmissionLog {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl CsvSubmissionLog {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn unavailable(err: impl std::fmt::Display) -> RepositoryError {
        RepositoryError::Unavailable(err.to_string())
    }
}

impl SubmissionRepository for CsvSubmissionLog {
    fn append(&self, record: SubmissionRecord) -> Result<(), RepositoryError> {
        let row = LogRow::from_record(&record)?;
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| RepositoryError::Unavailable("submission log lock poisoned".to_string()))?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(Self::unavailable)?;
        let needs_header = file.metadata().map_err(Self::unavailable)?.len() == 0;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(needs_header)
            .from_writer(file);
        writer.serialize(row).map_err(Self::unavailable)?;
        writer.flush().map_err(Self::unavailable)?;
        Ok(())
    }

    fn fetch(&self, id: &SubmissionId) -> Result<Option<SubmissionRecord>, RepositoryError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(Self::unavailable(err)),
        };

        let mut reader = csv::Reader::from_reader(file);
        for row in reader.deserialize::<LogRow>() {
            let row = row.map_err(|err| RepositoryError::Corrupt(err.to_string()))?;
            if row.submission_id == id.0 {
                return row.into_record().map(Some);
            }
        }
        Ok(None)
    }
}

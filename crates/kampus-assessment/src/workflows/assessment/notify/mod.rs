//! Outbound notifications for completed assessments.
//!
//! Every submission produces two messages: the HR summary with the spreadsheet
//! attached, and a plain acknowledgment to the candidate. Transport is behind
//! [`Notifier`] so the service can run against SMTP, a log sink, or a test double.

mod smtp;
mod templates;

pub use smtp::{LogNotifier, SmtpNotifier};
pub use templates::NotificationTemplates;

use serde::Serialize;

use super::report::ReportArtifact;

/// Who a notification is meant for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    HumanResources,
    Candidate,
}

impl NotificationKind {
    pub const fn label(self) -> &'static str {
        match self {
            NotificationKind::HumanResources => "hr",
            NotificationKind::Candidate => "candidate",
        }
    }
}

/// Fully rendered message handed to a [`Notifier`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub recipients: Vec<String>,
    pub subject: String,
    pub body: String,
    pub attachment: Option<ReportArtifact>,
}

/// Transport for rendered notifications.
pub trait Notifier: Send + Sync {
    fn send(&self, notification: &Notification) -> Result<(), NotifyError>;
}

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("invalid mail address '{address}': {reason}")]
    Address { address: String, reason: String },
    #[error("could not build message: {0}")]
    Message(String),
    #[error("mail transport unavailable: {0}")]
    Transport(String),
}

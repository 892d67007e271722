use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use tracing::info;

use super::{Notification, Notifier, NotifyError};
use crate::config::MailConfig;

/// Blocking SMTP delivery through `lettre`.
pub struct SmtpNotifier {
    transport: SmtpTransport,
    sender: Mailbox,
}

impl SmtpNotifier {
    pub fn from_config(config: &MailConfig) -> Result<Self, NotifyError> {
        let server = config
            .server
            .as_deref()
            .ok_or_else(|| NotifyError::Transport("MAIL_SERVER is not configured".to_string()))?;

        let builder = if config.use_tls {
            SmtpTransport::starttls_relay(server)
                .map_err(|err| NotifyError::Transport(err.to_string()))?
        } else {
            SmtpTransport::builder_dangerous(server)
        };
        let mut builder = builder.port(config.port);

        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        let sender = parse_mailbox(&config.sender)?;

        Ok(Self {
            transport: builder.build(),
            sender,
        })
    }

    fn build_message(&self, notification: &Notification) -> Result<Message, NotifyError> {
        let mut builder = Message::builder()
            .from(self.sender.clone())
            .subject(notification.subject.clone());
        for recipient in &notification.recipients {
            builder = builder.to(parse_mailbox(recipient)?);
        }

        let text = SinglePart::plain(notification.body.clone());
        let message = match &notification.attachment {
            Some(artifact) => {
                let content_type = ContentType::parse(&artifact.content_type)
                    .map_err(|err| NotifyError::Message(err.to_string()))?;
                let attachment = Attachment::new(artifact.file_name.clone())
                    .body(artifact.bytes.clone(), content_type);
                builder.multipart(MultiPart::mixed().singlepart(text).singlepart(attachment))
            }
            None => builder.singlepart(text),
        };

        message.map_err(|err| NotifyError::Message(err.to_string()))
    }
}

impl std::fmt::Debug for SmtpNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpNotifier")
            .field("sender", &self.sender.to_string())
            .finish_non_exhaustive()
    }
}

impl Notifier for SmtpNotifier {
    fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        if notification.recipients.is_empty() {
            return Err(NotifyError::Message("notification has no recipients".to_string()));
        }
        let message = self.build_message(notification)?;
        self.transport
            .send(&message)
            .map_err(|err| NotifyError::Transport(err.to_string()))?;
        info!(
            kind = notification.kind.label(),
            recipients = notification.recipients.len(),
            "notification delivered"
        );
        Ok(())
    }
}

/// Notifier used when no SMTP server is configured; messages are only logged.
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        info!(
            kind = notification.kind.label(),
            recipients = ?notification.recipients,
            subject = %notification.subject,
            attachment = notification
                .attachment
                .as_ref()
                .map(|artifact| artifact.file_name.as_str()),
            "mail transport disabled, notification logged only"
        );
        Ok(())
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, NotifyError> {
    address.parse().map_err(|err: lettre::address::AddressError| NotifyError::Address {
        address: address.to_string(),
        reason: err.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::assessment::notify::NotificationKind;
    use crate::workflows::assessment::report::{ReportArtifact, XLSX_CONTENT_TYPE};

    fn mail_config() -> MailConfig {
        MailConfig {
            server: Some("smtp.example.com".to_string()),
            port: 587,
            use_tls: false,
            username: None,
            password: None,
            sender: "Kampus HR <hr@kampushr.com>".to_string(),
        }
    }

    fn notification(attachment: Option<ReportArtifact>) -> Notification {
        Notification {
            kind: NotificationKind::HumanResources,
            recipients: vec!["hr@kampushr.com".to_string(), "lead@kampushr.com".to_string()],
            subject: "[Kampus HR] Assessment – Jane".to_string(),
            body: "Candidate: Jane".to_string(),
            attachment,
        }
    }

    #[test]
    fn builds_multipart_message_with_attachment() {
        let notifier = SmtpNotifier::from_config(&mail_config()).expect("notifier builds");
        let message = notifier
            .build_message(&notification(Some(ReportArtifact {
                file_name: "Jane_assessment.xlsx".to_string(),
                content_type: XLSX_CONTENT_TYPE.to_string(),
                bytes: vec![0x50, 0x4b, 0x03, 0x04],
            })))
            .expect("message builds");

        let formatted = String::from_utf8(message.formatted()).expect("utf8 headers");
        assert!(formatted.contains("multipart/mixed"));
        assert!(formatted.contains("Jane_assessment.xlsx"));
        assert_eq!(message.envelope().to().len(), 2);
    }

    #[test]
    fn rejects_invalid_recipient() {
        let notifier = SmtpNotifier::from_config(&mail_config()).expect("notifier builds");
        let mut bad = notification(None);
        bad.recipients = vec!["not-an-address".to_string()];

        match notifier.build_message(&bad) {
            Err(NotifyError::Address { address, .. }) => assert_eq!(address, "not-an-address"),
            other => panic!("expected address error, got {other:?}"),
        }
    }

    #[test]
    fn requires_a_server() {
        let mut config = mail_config();
        config.server = None;
        assert!(matches!(
            SmtpNotifier::from_config(&config),
            Err(NotifyError::Transport(_))
        ));
    }
}

use super::{Notification, NotificationKind};
use crate::workflows::assessment::report::ReportArtifact;
use crate::workflows::assessment::repository::SubmissionRecord;

/// Renders the HR and candidate messages for a stored submission.
#[derive(Debug, Clone)]
pub struct NotificationTemplates {
    company_name: String,
    hr_recipients: Vec<String>,
    disclose_score: bool,
}

impl NotificationTemplates {
    pub fn new(
        company_name: impl Into<String>,
        hr_recipients: Vec<String>,
        disclose_score: bool,
    ) -> Self {
        Self {
            company_name: company_name.into(),
            hr_recipients,
            disclose_score,
        }
    }

    pub fn company_name(&self) -> &str {
        &self.company_name
    }

    pub fn hr_message(
        &self,
        record: &SubmissionRecord,
        attachment: Option<ReportArtifact>,
    ) -> Notification {
        let identity = &record.identity;
        let result = &record.evaluation;
        let body = format!(
            "Candidate: {name}\n\
             Email: {email}\n\
             Position: {position}\n\
             Total Score: {score}\n\
             Tier: {tier}\n\
             Red Flags: {flags}\n\
             Decision: {decision}\n\
             Submission ID: {id}\n",
            name = identity.name,
            email = identity.email,
            position = identity.position.as_deref().unwrap_or("N/A"),
            score = result.score,
            tier = result.tier.label(),
            flags = result.red_flag_count,
            decision = result.summary(),
            id = record.submission_id,
        );

        Notification {
            kind: NotificationKind::HumanResources,
            recipients: self.hr_recipients.clone(),
            subject: format!("[{}] Assessment – {}", self.company_name, identity.name),
            body,
            attachment,
        }
    }

    /// Candidate acknowledgment. The score is only included when disclosure is enabled.
    pub fn candidate_message(&self, record: &SubmissionRecord) -> Notification {
        let company = &self.company_name;
        let mut body = format!(
            "Dear {name},\n\n\
             Thank you for completing the {company} Psychometric Test.\n\
             Our HR team will review your results and contact you shortly.\n",
            name = record.identity.name,
        );
        if self.disclose_score {
            body.push_str(&format!(
                "\nYour total score: {} ({})\n",
                record.evaluation.score,
                record.evaluation.tier.label()
            ));
        }
        body.push_str(&format!("\nBest regards,\nHR Team\n{company}\n"));

        Notification {
            kind: NotificationKind::Candidate,
            recipients: vec![record.identity.email.clone()],
            subject: format!("Thank you for completing the assessment – {company}"),
            body,
            attachment: None,
        }
    }
}

use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};

use super::repository::SubmissionRecord;

pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

pub const SUMMARY_SHEET: &str = "Summary";
pub const ANSWERS_SHEET: &str = "Answers";

pub const SUMMARY_HEADERS: [&str; 6] = [
    "Candidate Name",
    "Email",
    "Position",
    "Total Score",
    "Red Flags",
    "Tier",
];

pub const ANSWER_HEADERS: [&str; 2] = ["Question", "Answer"];

/// A single spreadsheet value; numbers stay numeric so the sheet can sort them.
#[derive(Debug, Clone, PartialEq)]
pub enum ReportCell {
    Text(String),
    Number(f64),
}

impl ReportCell {
    fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }
}

/// The data row under [`SUMMARY_HEADERS`].
pub fn summary_row(record: &SubmissionRecord) -> Vec<ReportCell> {
    let identity = &record.identity;
    vec![
        ReportCell::text(identity.name.as_str()),
        ReportCell::text(identity.email.as_str()),
        ReportCell::text(identity.position.as_deref().unwrap_or("")),
        ReportCell::Number(f64::from(record.evaluation.score)),
        ReportCell::Number(f64::from(record.evaluation.red_flag_count)),
        ReportCell::text(record.evaluation.tier.label()),
    ]
}

/// One `[Q<i>, letter]` row per question, `N/A` when unanswered.
pub fn answer_rows(record: &SubmissionRecord) -> Vec<[String; 2]> {
    record
        .answers
        .listing()
        .into_iter()
        .map(|(question, choice)| {
            [
                question.label(),
                choice.map(|choice| choice.letter()).unwrap_or("N/A").to_string(),
            ]
        })
        .collect()
}

/// Binary report ready to be attached to a notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportArtifact {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("spreadsheet generation failed: {0}")]
    Spreadsheet(#[from] XlsxError),
}

/// Produces the report artifact for a stored submission.
pub trait ReportRenderer: Send + Sync {
    fn render(&self, record: &SubmissionRecord) -> Result<ReportArtifact, ReportError>;
}

/// Two-sheet workbook: a one-row summary and the 30-row answer listing.
#[derive(Debug, Clone, Default)]
pub struct XlsxReportRenderer;

impl XlsxReportRenderer {
    fn write_headers(sheet: &mut Worksheet, headers: &[&str]) -> Result<(), XlsxError> {
        let bold = Format::new().set_bold();
        for (col, title) in headers.iter().enumerate() {
            sheet.write_string_with_format(0, col as u16, *title, &bold)?;
        }
        Ok(())
    }

    fn write_summary(sheet: &mut Worksheet, record: &SubmissionRecord) -> Result<(), XlsxError> {
        Self::write_headers(sheet, &SUMMARY_HEADERS)?;
        for (col, cell) in summary_row(record).into_iter().enumerate() {
            let col = col as u16;
            match cell {
                ReportCell::Text(value) => sheet.write_string(1, col, value)?,
                ReportCell::Number(value) => sheet.write_number(1, col, value)?,
            };
        }
        sheet.set_column_width(0, 28)?;
        sheet.set_column_width(1, 32)?;
        sheet.set_column_width(5, 18)?;
        Ok(())
    }

    fn write_answers(sheet: &mut Worksheet, record: &SubmissionRecord) -> Result<(), XlsxError> {
        Self::write_headers(sheet, &ANSWER_HEADERS)?;
        for (row, [question, answer]) in answer_rows(record).into_iter().enumerate() {
            let row = row as u32 + 1;
            sheet.write_string(row, 0, question)?;
            sheet.write_string(row, 1, answer)?;
        }
        Ok(())
    }
}

impl ReportRenderer for XlsxReportRenderer {
    fn render(&self, record: &SubmissionRecord) -> Result<ReportArtifact, ReportError> {
        let mut workbook = Workbook::new();

        let summary = workbook.add_worksheet();
        summary.set_name(SUMMARY_SHEET)?;
        Self::write_summary(summary, record)?;

        let answers = workbook.add_worksheet();
        answers.set_name(ANSWERS_SHEET)?;
        Self::write_answers(answers, record)?;

        let bytes = workbook.save_to_buffer()?;

        Ok(ReportArtifact {
            file_name: report_file_name(&record.identity.name),
            content_type: XLSX_CONTENT_TYPE.to_string(),
            bytes,
        })
    }
}

/// `<name>_assessment.xlsx`, with characters unsafe in attachment names replaced.
pub fn report_file_name(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|ch| {
            if ch.is_alphanumeric() || matches!(ch, ' ' | '-' | '_' | '.') {
                ch
            } else {
                '_'
            }
        })
        .collect();
    let stem = if cleaned.is_empty() {
        "candidate"
    } else {
        cleaned.as_str()
    };
    format!("{stem}_assessment.xlsx")
}

use chrono::Utc;
use clap::Args;
use kampus_assessment::config::AppConfig;
use kampus_assessment::error::AppError;
use kampus_assessment::workflows::assessment::{
    AnswerKey, AnswerSet, CandidateIdentity, Choice, EvaluationResult, Evaluator, QuestionId,
    ReportRenderer, SubmissionId, SubmissionRecord, XlsxReportRenderer, QUESTION_COUNT,
};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct EvaluateArgs {
    /// Comma separated letters in question order, e.g. "B,C,,A" (blank = unanswered)
    #[arg(
        long,
        conflicts_with = "answers_file",
        required_unless_present = "answers_file"
    )]
    pub(crate) answers: Option<String>,
    /// JSON file holding either a letter array or a {"q1": "B", ...} object
    #[arg(long)]
    pub(crate) answers_file: Option<PathBuf>,
    /// Write the xlsx report for this evaluation to the given path
    #[arg(long)]
    pub(crate) report: Option<PathBuf>,
    /// Candidate name shown in the report
    #[arg(long, default_value = "Offline Candidate")]
    pub(crate) name: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AnswerFile {
    Letters(Vec<String>),
    Fields(HashMap<String, String>),
}

impl AnswerFile {
    fn into_answers(self) -> AnswerSet {
        match self {
            AnswerFile::Letters(letters) => {
                AnswerSet::from_letters(letters.iter().map(String::as_str))
            }
            AnswerFile::Fields(fields) => QuestionId::all()
                .filter_map(|question| {
                    fields
                        .get(&question.field_name())
                        .and_then(|raw| Choice::parse(raw))
                        .map(|choice| (question, choice))
                })
                .collect(),
        }
    }
}

pub(crate) fn run_evaluate(args: EvaluateArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let key = config.assessment.answer_key()?;
    let evaluator = Evaluator::new(Arc::new(key), config.assessment.classifier.clone());

    let answers = load_answers(&args)?;
    let evaluation = evaluator.evaluate(&answers);
    print!(
        "{}",
        render_evaluation(&evaluation, &answers, evaluator.key().max_score())
    );

    if let Some(path) = args.report.as_deref() {
        let record = SubmissionRecord {
            submission_id: SubmissionId::generate(),
            identity: CandidateIdentity {
                name: args.name.clone(),
                email: String::new(),
                position: None,
            },
            answers,
            evaluation,
            submitted_at: Utc::now(),
        };
        write_report(&record, path)?;
        println!("Report written to {}", path.display());
    }

    Ok(())
}

pub(crate) fn run_check_key(path: &Path) -> Result<(), AppError> {
    let key = AnswerKey::from_path(path)?;
    print!("{}", render_key_check(&key));
    Ok(())
}

pub(crate) fn load_answers(args: &EvaluateArgs) -> Result<AnswerSet, AppError> {
    if let Some(inline) = args.answers.as_deref() {
        return Ok(AnswerSet::from_letters(inline.split(',')));
    }

    match args.answers_file.as_deref() {
        Some(path) => {
            let reader = BufReader::new(File::open(path)?);
            let file: AnswerFile = serde_json::from_reader(reader)?;
            Ok(file.into_answers())
        }
        None => Ok(AnswerSet::new()),
    }
}

pub(crate) fn write_report(record: &SubmissionRecord, path: &Path) -> Result<(), AppError> {
    let artifact = XlsxReportRenderer.render(record)?;
    std::fs::write(path, artifact.bytes)?;
    Ok(())
}

pub(crate) fn render_evaluation(
    evaluation: &EvaluationResult,
    answers: &AnswerSet,
    max_score: u32,
) -> String {
    let mut output = String::from("Assessment result\n");
    output.push_str(&format!(
        "- Answered: {} of {}\n",
        answers.answered(),
        QUESTION_COUNT
    ));
    output.push_str(&format!("- Score: {} / {}\n", evaluation.score, max_score));
    output.push_str(&format!("- Red flags: {}\n", evaluation.red_flag_count));
    output.push_str(&format!("- Tier: {}\n", evaluation.tier.label()));
    output.push_str(&format!("- Decision: {}\n", evaluation.summary()));
    output
}

pub(crate) fn render_key_check(key: &AnswerKey) -> String {
    let problems = key.validate();
    let critical: Vec<String> = key.critical.iter().map(|question| question.label()).collect();

    let mut output = String::from("Answer key check\n");
    output.push_str(&format!("- Maximum score: {}\n", key.max_score()));
    output.push_str(&format!("- Critical questions: {}\n", critical.join(", ")));
    if problems.is_empty() {
        output.push_str("- No problems found\n");
    } else {
        output.push_str(&format!("- {} problem(s):\n", problems.len()));
        for problem in problems {
            output.push_str(&format!("  - {}\n", problem));
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use kampus_assessment::workflows::assessment::Tier;
    use std::io::Write;

    const BEST: &str = "B,C,C,C,B,C,C,C,A,C,B,C,A,B,A,A,B,B,B,B,B,A,A,B,B,B,B,B,A,A";

    fn inline(answers: &str) -> EvaluateArgs {
        EvaluateArgs {
            answers: Some(answers.to_string()),
            ..EvaluateArgs::default()
        }
    }

    #[test]
    fn inline_answers_keep_blank_positions_unanswered() {
        let answers = load_answers(&inline("B,,C")).expect("answers load");
        let q = |index| QuestionId::new(index).expect("valid question");

        assert_eq!(answers.answer(q(1)), Some(Choice::B));
        assert_eq!(answers.answer(q(2)), None);
        assert_eq!(answers.answer(q(3)), Some(Choice::C));
        assert_eq!(answers.answered(), 2);
    }

    #[test]
    fn answer_file_accepts_field_objects() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, r#"{{"q1": "b", "q30": "A", "name": "ignored"}}"#).expect("write");
        let args = EvaluateArgs {
            answers_file: Some(file.path().to_path_buf()),
            ..EvaluateArgs::default()
        };

        let answers = load_answers(&args).expect("answers load");
        assert_eq!(answers.answered(), 1);
        assert_eq!(
            answers.answer(QuestionId::new(1).expect("valid question")),
            None,
            "lowercase letters stay unanswered"
        );
    }

    #[test]
    fn answer_file_accepts_letter_arrays() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, r#"["B", "C", "C"]"#).expect("write");
        let args = EvaluateArgs {
            answers_file: Some(file.path().to_path_buf()),
            ..EvaluateArgs::default()
        };

        let answers = load_answers(&args).expect("answers load");
        assert_eq!(Evaluator::default().score(&answers), 12);
    }

    #[test]
    fn malformed_answer_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, "not json").expect("write");
        let args = EvaluateArgs {
            answers_file: Some(file.path().to_path_buf()),
            ..EvaluateArgs::default()
        };

        assert!(matches!(load_answers(&args), Err(AppError::Input(_))));
    }

    #[test]
    fn evaluation_output_lists_score_and_tier() {
        let answers = load_answers(&inline(BEST)).expect("answers load");
        let evaluator = Evaluator::default();
        let evaluation = evaluator.evaluate(&answers);
        assert_eq!(evaluation.tier, Tier::Tier1);

        let output = render_evaluation(&evaluation, &answers, evaluator.key().max_score());
        assert!(output.contains("- Answered: 30 of 30"));
        assert!(output.contains("- Score: 120 / 120"));
        assert!(output.contains("- Red flags: 0"));
        assert!(output.contains("- Tier: Tier 1 (Elite)"));
    }

    #[test]
    fn report_is_written_to_disk() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("offline.xlsx");
        let answers = load_answers(&inline(BEST)).expect("answers load");
        let record = SubmissionRecord {
            submission_id: SubmissionId::generate(),
            identity: CandidateIdentity {
                name: "Offline Candidate".to_string(),
                email: String::new(),
                position: None,
            },
            evaluation: Evaluator::default().evaluate(&answers),
            answers,
            submitted_at: Utc::now(),
        };

        write_report(&record, &path).expect("report written");
        let bytes = std::fs::read(&path).expect("report readable");
        assert!(bytes.starts_with(b"PK"));
    }

    #[test]
    fn key_check_reports_drift() {
        let mut key = AnswerKey::standard();
        assert!(render_key_check(&key).contains("- No problems found"));

        key.critical = [QuestionId::new(3).expect("valid question")]
            .into_iter()
            .collect();
        let output = render_key_check(&key);
        assert!(output.contains("- Critical questions: Q3"));
        assert!(output.contains("1 problem(s)"));
        assert!(output.contains("critical question 3 has no red-flag choices"));
    }
}

use crate::offline::{run_check_key, run_evaluate, EvaluateArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use kampus_assessment::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Kampus Assessment",
    about = "Serve the Kampus HR psychometric assessment and score answers offline",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Score a set of answers without storing or mailing anything
    Evaluate(EvaluateArgs),
    /// Load an answer key file and report table problems
    CheckKey {
        /// Path to the answer key JSON
        path: PathBuf,
    },
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Evaluate(args) => run_evaluate(args),
        Command::CheckKey { path } => run_check_key(&path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["kampus-assessment"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn evaluate_accepts_inline_answers() {
        let cli = Cli::try_parse_from(["kampus-assessment", "evaluate", "--answers", "B,C,C"])
            .expect("parses");
        match cli.command {
            Some(Command::Evaluate(args)) => {
                assert_eq!(args.answers.as_deref(), Some("B,C,C"));
                assert!(args.answers_file.is_none());
            }
            other => panic!("expected evaluate command, got {other:?}"),
        }
    }

    #[test]
    fn evaluate_rejects_both_answer_sources() {
        let parsed = Cli::try_parse_from([
            "kampus-assessment",
            "evaluate",
            "--answers",
            "B",
            "--answers-file",
            "answers.json",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn check_key_takes_a_path() {
        let cli = Cli::try_parse_from(["kampus-assessment", "check-key", "key.json"])
            .expect("parses");
        match cli.command {
            Some(Command::CheckKey { path }) => assert_eq!(path, PathBuf::from("key.json")),
            other => panic!("expected check-key command, got {other:?}"),
        }
    }
}

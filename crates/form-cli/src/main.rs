use clap::{Parser, Subcommand};
use form_spec::{
    AnswerMap, Document, EngineOptions, HiddenPolicy, SubmissionOutcome, answers_schema,
    display_label, document_schema, evaluate_submission, split_pages, validate_page,
};
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Environment variable holding the log filter directives.
const LOG_ENV: &str = "FORMKIT_LOG";

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Form submission checker",
    long_about = "Evaluates conditional logic and validates answer files against form documents"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate answers against a form document.
    Validate {
        /// Path to the document JSON.
        #[arg(long, value_name = "DOCUMENT", env = "FORMKIT_DOCUMENT")]
        document: PathBuf,
        /// Path to the answers JSON file.
        #[arg(long, value_name = "ANSWERS", env = "FORMKIT_ANSWERS")]
        answers: PathBuf,
        /// Also validate blocks hidden by conditional logic.
        #[arg(long)]
        validate_hidden: bool,
        /// Only validate the given page (0-based).
        #[arg(long, value_name = "INDEX")]
        page: Option<usize>,
    },
    /// Print the visibility and requirement of every block.
    Visibility {
        #[arg(long, value_name = "DOCUMENT", env = "FORMKIT_DOCUMENT")]
        document: PathBuf,
        #[arg(long, value_name = "ANSWERS", env = "FORMKIT_ANSWERS")]
        answers: PathBuf,
    },
    /// List pages and the blocks on each.
    Pages {
        #[arg(long, value_name = "DOCUMENT", env = "FORMKIT_DOCUMENT")]
        document: PathBuf,
    },
    /// Report conditional rules that reference unanswerable blocks.
    Lint {
        #[arg(long, value_name = "DOCUMENT", env = "FORMKIT_DOCUMENT")]
        document: PathBuf,
    },
    /// Print the document JSON Schema, or the answers schema for a document.
    Schema {
        /// Document whose answers schema should be printed.
        #[arg(long, value_name = "DOCUMENT", requires = "answers")]
        answers_for: Option<PathBuf>,
        /// Current answers used to resolve visibility.
        #[arg(long, value_name = "ANSWERS", requires = "answers_for")]
        answers: Option<PathBuf>,
    },
}

fn main() -> CliResult<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Command::Validate {
            document,
            answers,
            validate_hidden,
            page,
        } => run_validate(document, answers, validate_hidden, page),
        Command::Visibility { document, answers } => run_visibility(document, answers),
        Command::Pages { document } => run_pages(document),
        Command::Lint { document } => run_lint(document),
        Command::Schema {
            answers_for,
            answers,
        } => run_schema(answers_for, answers),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_document(path: &Path) -> CliResult<Document> {
    let json = fs::read_to_string(path)?;
    let document = Document::from_json(&json)?;
    debug!(path = %path.display(), blocks = document.blocks.len(), "loaded document");
    Ok(document)
}

fn load_answers(path: &Path) -> CliResult<AnswerMap> {
    let json = fs::read_to_string(path)?;
    match serde_json::from_str::<Value>(&json)? {
        Value::Object(map) => Ok(map),
        _ => Err(format!("answers in {} must be a JSON object", path.display()).into()),
    }
}

fn print_json<T: Serialize>(value: &T) -> CliResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run_validate(
    document_path: PathBuf,
    answers_path: PathBuf,
    validate_hidden: bool,
    page: Option<usize>,
) -> CliResult<()> {
    let document = load_document(&document_path)?;
    let answers = load_answers(&answers_path)?;
    let options = EngineOptions {
        hidden: if validate_hidden {
            HiddenPolicy::Validate
        } else {
            HiddenPolicy::Skip
        },
    };

    let outcome = match page {
        Some(index) => validate_page(&document, index, &answers, &options),
        None => evaluate_submission(&document, &answers, &options),
    };
    info!(valid = outcome.is_valid, errors = outcome.errors.len(), "validation finished");

    print_json(&outcome)?;
    describe_errors(&document, &outcome);

    if outcome.is_valid {
        Ok(())
    } else {
        Err("validation failed".into())
    }
}

fn describe_errors(document: &Document, outcome: &SubmissionOutcome) {
    eprintln!(
        "Validation result: {}",
        if outcome.is_valid { "valid" } else { "invalid" }
    );
    if outcome.errors.is_empty() {
        return;
    }
    eprintln!("Errors:");
    for (id, message) in &outcome.errors {
        let label = document.resolve(id).map(display_label).unwrap_or_default();
        if label.is_empty() {
            eprintln!("  {id} - {message}");
        } else {
            eprintln!("  {id} ({label}) - {message}");
        }
    }
}

fn run_visibility(document_path: PathBuf, answers_path: PathBuf) -> CliResult<()> {
    let document = load_document(&document_path)?;
    let answers = load_answers(&answers_path)?;
    let outcome = evaluate_submission(&document, &answers, &EngineOptions::default());
    print_json(&outcome.blocks)
}

#[derive(Serialize)]
struct PageSummary<'a> {
    index: usize,
    blocks: Vec<BlockSummary<'a>>,
}

#[derive(Serialize)]
struct BlockSummary<'a> {
    id: &'a str,
    #[serde(rename = "type")]
    kind: &'static str,
    label: &'a str,
}

fn run_pages(document_path: PathBuf) -> CliResult<()> {
    let document = load_document(&document_path)?;
    let summaries: Vec<PageSummary<'_>> = split_pages(&document)
        .into_iter()
        .map(|page| PageSummary {
            index: page.index,
            blocks: page
                .blocks
                .into_iter()
                .map(|block| BlockSummary {
                    id: &block.id,
                    kind: block.kind.as_str(),
                    label: display_label(block),
                })
                .collect(),
        })
        .collect();
    print_json(&summaries)
}

fn run_lint(document_path: PathBuf) -> CliResult<()> {
    let document = load_document(&document_path)?;
    let issues = document.rule_issues();
    if issues.is_empty() {
        println!("No rule issues found.");
        return Ok(());
    }
    println!("Rule issues:");
    for issue in &issues {
        println!("  {issue}");
    }
    Err(format!("{} rule issue(s) found", issues.len()).into())
}

fn run_schema(document_path: Option<PathBuf>, answers_path: Option<PathBuf>) -> CliResult<()> {
    match (document_path, answers_path) {
        (Some(document_path), Some(answers_path)) => {
            let document = load_document(&document_path)?;
            let answers = load_answers(&answers_path)?;
            let outcome = evaluate_submission(&document, &answers, &EngineOptions::default());
            print_json(&answers_schema(&document, &outcome))
        }
        _ => print_json(&document_schema()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;
    use tempfile::TempDir;

    #[test]
    fn load_answers_rejects_non_objects() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("answers.json");
        fs::write(&path, "[1, 2]").unwrap();
        let err = load_answers(&path).unwrap_err();
        assert!(err.to_string().contains("must be a JSON object"));
    }

    #[test]
    fn load_document_reports_duplicate_ids() {
        let temp = assert_fs::TempDir::new().unwrap();
        let file = temp.child("doc.json");
        file.write_str(r#"[{"id":"a","type":"email"},{"id":"a","type":"number"}]"#)
            .unwrap();
        let err = load_document(file.path()).unwrap_err();
        assert!(err.to_string().contains("used more than once"));
    }

    #[test]
    fn schema_answers_requires_document() {
        let parsed = Cli::try_parse_from(["formkit", "schema", "--answers", "answers.json"]);
        assert!(parsed.is_err());
        let parsed = Cli::try_parse_from([
            "formkit",
            "schema",
            "--answers-for",
            "doc.json",
            "--answers",
            "answers.json",
        ]);
        assert!(parsed.is_ok());
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}

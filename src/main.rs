mod controller;
mod error;
mod history;
mod models;
mod repository;
mod session;
mod tui;
mod view;

use clap::{Parser, Subcommand};
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use controller::Controller;
use error::QcmError;
use history::ResultLog;
use models::{JsonOutput, OptionKey};
use repository::QuestionRepository;

const DEFAULT_QUESTIONS_DIR: &str = "questions";
const DEFAULT_RESULTS_DIR: &str = "results";
const LOG_FILE_NAME: &str = "qcm.log";

#[derive(Parser)]
#[command(name = "qcm")]
#[command(about = "Multiple-choice quizzes in the terminal, with learning and test modes")]
#[command(version)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Directory holding <TestName>.json question sets
    #[arg(long, global = true, value_name = "DIR")]
    questions_dir: Option<PathBuf>,

    /// Directory holding test_history.json
    #[arg(long, global = true, value_name = "DIR")]
    results_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List available tests
    Tests,

    /// Show recent test results
    History {
        /// Number of results to show
        #[arg(long, short, default_value_t = 5)]
        limit: usize,
    },

    /// Print the questions of a test
    Show {
        /// Test name (file name without .json)
        test: String,
    },

    /// Launch interactive terminal UI
    Tui,
}

fn resolve_dir(flag: Option<PathBuf>, env_var: &str, default: &str) -> PathBuf {
    if let Some(path) = flag {
        return path;
    }
    if let Ok(path) = std::env::var(env_var) {
        return PathBuf::from(path);
    }
    PathBuf::from(default)
}

fn get_questions_dir(flag: Option<PathBuf>) -> PathBuf {
    resolve_dir(flag, "QCM_QUESTIONS_DIR", DEFAULT_QUESTIONS_DIR)
}

fn get_results_dir(flag: Option<PathBuf>) -> PathBuf {
    resolve_dir(flag, "QCM_RESULTS_DIR", DEFAULT_RESULTS_DIR)
}

fn get_log_path() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("qcm")
        .join(LOG_FILE_NAME)
}

fn open_log_file(path: &Path) -> std::io::Result<File> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

// The TUI owns the terminal, so its logs go to a file instead of stderr
fn init_logging(to_file: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    if to_file {
        let path = get_log_path();
        match open_log_file(&path) {
            Ok(file) => tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init(),
            Err(e) => eprintln!(
                "Warning: logging disabled, cannot open {}: {}",
                path.display(),
                e
            ),
        }
        return;
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(matches!(cli.command, Commands::Tui));

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let repository = QuestionRepository::new(get_questions_dir(cli.questions_dir));
    let log = ResultLog::in_dir(get_results_dir(cli.results_dir));

    match cli.command {
        Commands::Tests => {
            let catalog = repository.load_available_tests()?;
            if cli.json {
                let tests: Vec<_> = catalog
                    .values()
                    .map(|set| {
                        serde_json::json!({
                            "name": set.name,
                            "question_count": set.len()
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string(&JsonOutput::ok(tests))?);
            } else if catalog.is_empty() {
                println!("No tests found in {}.", repository.dir().display());
            } else {
                println!("{:<40} QUESTIONS", "TEST");
                println!("{}", "-".repeat(50));
                for set in catalog.values() {
                    println!("{:<40} {}", set.name, set.len());
                }
            }
        }

        Commands::History { limit } => {
            let results = log.recent(limit)?;
            if cli.json {
                println!("{}", serde_json::to_string(&JsonOutput::ok(&results))?);
            } else if results.is_empty() {
                println!("No test history yet in {}.", log.path().display());
            } else {
                println!("{:<17} {:<30} {:<9} {:<8} SCORE", "DATE", "TEST", "MODE", "CORRECT");
                println!("{}", "-".repeat(75));
                for result in results.iter().rev() {
                    println!(
                        "{:<17} {:<30} {:<9} {:<8} {:.1}%",
                        result.display_date(),
                        result.test_name,
                        result.mode.as_str(),
                        format!("{}/{}", result.correct_count(), result.answers.len()),
                        result.score
                    );
                }
            }
        }

        Commands::Show { test } => match repository.load_test(&test) {
            Ok(set) => {
                if cli.json {
                    println!(
                        "{}",
                        serde_json::to_string(&JsonOutput::ok(serde_json::json!({
                            "name": set.name,
                            "questions": set.questions
                        })))?
                    );
                } else {
                    println!("=== {} ({} questions) ===", set.name, set.len());
                    for (id, question) in &set.questions {
                        println!();
                        println!("[{}] {}", id, question.question);
                        for key in OptionKey::ALL {
                            let marker = if key == question.correct_answer { "*" } else { " " };
                            println!(" {} {}. {}", marker, key.as_str(), question.option(key));
                        }
                    }
                }
            }
            Err(QcmError::UnknownTest(name)) if cli.json => {
                let msg = format!("Test '{}' not found", name);
                println!("{}", serde_json::to_string(&JsonOutput::<()>::err(msg))?);
            }
            Err(e) => return Err(e.into()),
        },

        Commands::Tui => {
            let controller = Controller::open(repository, log)?;
            tui::run(controller)?;
        }
    }

    Ok(())
}

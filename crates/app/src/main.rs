use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use dotenv::dotenv;
use quiz_core::model::QuizMode;
use services::{Clock, QuizLoopService};
use storage::{JsonQuestionBank, QuestionBank};
use tracing::level_filters::LevelFilter;
use tracing::info;
use tracing_subscriber::FmtSubscriber;
use ui::{UiApp, build_app_context};

mod terminal;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidMode { raw: String },
    InvalidSeed { raw: String },
    InvalidLogLevel { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidMode { raw } => write!(f, "invalid --mode value: {raw}"),
            ArgsError::InvalidSeed { raw } => write!(f, "invalid --seed value: {raw}"),
            ArgsError::InvalidLogLevel { raw } => write!(f, "invalid QUIZ_LOG value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

struct TerminalApp {
    mode: QuizMode,
    quiz_loop: Arc<QuizLoopService>,
}

impl UiApp for TerminalApp {
    fn initial_mode(&self) -> QuizMode {
        self.mode
    }

    fn quiz_loop(&self) -> Arc<QuizLoopService> {
        Arc::clone(&self.quiz_loop)
    }
}

#[derive(Debug)]
struct Args {
    bank: Option<PathBuf>,
    mode: QuizMode,
    seed: Option<u64>,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- run   [--bank <file.json>] [--mode exam|practice] [--seed <n>]");
    eprintln!("  cargo run -p app -- check [--bank <file.json>]");
    eprintln!();
    eprintln!("Defaults for run:");
    eprintln!("  bundled question bank, exam mode, random order");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_BANK, QUIZ_MODE, QUIZ_SEED, QUIZ_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Run,
    Check,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "run" => Some(Self::Run),
            "check" => Some(Self::Check),
            _ => None,
        }
    }
}

fn parse_mode(raw: String) -> Result<QuizMode, ArgsError> {
    raw.parse().map_err(|_| ArgsError::InvalidMode { raw })
}

fn parse_seed(raw: String) -> Result<u64, ArgsError> {
    raw.trim().parse().map_err(|_| ArgsError::InvalidSeed { raw })
}

impl Args {
    fn from_env() -> Result<Self, ArgsError> {
        let bank = std::env::var("QUIZ_BANK")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);
        let mode = std::env::var("QUIZ_MODE")
            .ok()
            .map(parse_mode)
            .transpose()?
            .unwrap_or_default();
        let seed = std::env::var("QUIZ_SEED").ok().map(parse_seed).transpose()?;
        Ok(Self { bank, mode, seed })
    }

    fn parse(args: &mut impl Iterator<Item = String>, base: Self) -> Result<Self, ArgsError> {
        let mut parsed = base;
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--bank" => parsed.bank = Some(PathBuf::from(require_value(args, "--bank")?)),
                "--mode" => parsed.mode = parse_mode(require_value(args, "--mode")?)?,
                "--seed" => parsed.seed = Some(parse_seed(require_value(args, "--seed")?)?),
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }
        Ok(parsed)
    }

    fn question_bank(&self) -> Arc<dyn QuestionBank> {
        match &self.bank {
            Some(path) => Arc::new(JsonQuestionBank::from_path(path.clone())),
            None => Arc::new(JsonQuestionBank::bundled()),
        }
    }
}

fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    let level = match std::env::var("QUIZ_LOG") {
        Ok(raw) => raw
            .parse::<LevelFilter>()
            .map_err(|_| ArgsError::InvalidLogLevel { raw })?,
        Err(_) => LevelFilter::WARN,
    };

    // Stdout belongs to the quiz itself.
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    init_logging()?;

    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // Default behavior: start a quiz when no subcommand is provided.
    let cmd = match argv.first().map(String::as_str) {
        None => Command::Run,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Run,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let mut iter = argv.into_iter();
    let parsed = Args::from_env()
        .and_then(|base| Args::parse(&mut iter, base))
        .map_err(|e| {
            eprintln!("{e}");
            print_usage();
            e
        })?;

    let bank = parsed.question_bank();
    let quiz_loop = QuizLoopService::new(Clock::default(), bank).with_seed(parsed.seed);

    match cmd {
        Command::Run => {
            let app: Arc<dyn UiApp> = Arc::new(TerminalApp {
                mode: parsed.mode,
                quiz_loop: Arc::new(quiz_loop),
            });
            let context = build_app_context(&app);
            terminal::run_quiz(&context).await
        }
        Command::Check => {
            let questions = quiz_loop.load_bank().await?;
            let total_points: u64 = questions.iter().map(|q| u64::from(q.points())).sum();
            info!(questions = questions.len(), total_points, "question bank is valid");
            println!(
                "{}: {} questions, {} points",
                parsed.question_bank().describe(),
                questions.len(),
                total_points
            );
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args, ArgsError> {
        let base = Args {
            bank: None,
            mode: QuizMode::Exam,
            seed: None,
        };
        let mut iter = args.iter().map(|a| (*a).to_owned());
        Args::parse(&mut iter, base)
    }

    #[test]
    fn flags_override_defaults() {
        let args = parse(&["--mode", "Practice", "--seed", "42", "--bank", "q.json"]).unwrap();
        assert_eq!(args.mode, QuizMode::Practice);
        assert_eq!(args.seed, Some(42));
        assert_eq!(args.bank, Some(PathBuf::from("q.json")));
    }

    #[test]
    fn bad_flags_are_reported() {
        assert!(matches!(
            parse(&["--mode", "quiz"]),
            Err(ArgsError::InvalidMode { .. })
        ));
        assert!(matches!(
            parse(&["--seed", "-1"]),
            Err(ArgsError::InvalidSeed { .. })
        ));
        assert!(matches!(
            parse(&["--seed"]),
            Err(ArgsError::MissingValue { flag: "--seed" })
        ));
        assert!(matches!(parse(&["--db"]), Err(ArgsError::UnknownArg(_))));
    }
}

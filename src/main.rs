use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use quiz_keeper::{
    CatalogSource, Config, FileStore, KeyValueStore, MemoryStore, ProgressStore, Quiz, QuizError,
};
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// JSON file to load the questions from (built-in sample set if omitted)
    #[arg(short, long)]
    questions: Option<PathBuf>,

    /// File progress is saved to between runs
    #[arg(short, long)]
    progress: Option<PathBuf>,

    /// Keep progress in memory only
    #[arg(long)]
    no_persist: bool,

    /// Clear saved progress before starting
    #[arg(long)]
    reset: bool,

    /// Configuration file (defaults to ./quiz-keeper.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let config = match Config::load(args.config.as_deref()) {
        Ok(config) => apply_args(config, &args),
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let _log_guard = init_logging(&config.log_file, args.verbose);
    info!(?config, "starting quiz-keeper");

    match run(config, args.reset).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "quiz exited with an error");
            eprintln!("Error running quiz: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn apply_args(mut config: Config, args: &Args) -> Config {
    if let Some(questions) = &args.questions {
        config.questions = Some(questions.clone());
    }
    if let Some(progress) = &args.progress {
        config.progress_file = progress.clone();
    }
    if args.no_persist {
        config.persist = false;
    }
    config
}

async fn run(config: Config, reset: bool) -> Result<(), QuizError> {
    let store: Box<dyn KeyValueStore> = if config.persist {
        Box::new(FileStore::open(&config.progress_file))
    } else {
        Box::new(MemoryStore::new())
    };

    let mut progress = ProgressStore::with_keys(store, config.keys);
    if reset {
        progress.clear()?;
        info!("cleared saved progress");
    }

    Quiz::loading(CatalogSource::from_path(config.questions), progress)
        .run()
        .await
}

/// Logs go to a file; the terminal belongs to the quiz UI.
fn init_logging(log_file: &Path, verbose: u8) -> WorkerGuard {
    let filter = match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    let directory = log_file
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = log_file
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_else(|| "quiz-keeper.log".into());

    let appender = tracing_appender::rolling::never(directory, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .with_target(false)
        .init();

    guard
}

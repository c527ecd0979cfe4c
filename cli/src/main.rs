//! quizclock CLI - binary entry point.
//!
//! # Architecture
//!
//! The CLI wires [`quizclock_config`] settings into the HTTP clients from
//! [`quizclock_providers`], hands them to a [`TimerSession`] from
//! [`quizclock_engine`] and renders through [`quizclock_tui`].
//!
//! ```text
//! main() -> Settings::resolve() -> watch | time | run
//!                                    |
//!                                    v
//!            TimerSession::spawn() -> Expired(submit result) | Stopped
//! ```
//!
//! Logs go to a file, never to the terminal the countdown is drawn on.

mod terminal;

use std::{
    fs::{self, OpenOptions},
    path::{Path, PathBuf},
    process::ExitCode,
    sync::{Arc, Mutex},
};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use quizclock_config::{QuizClockConfig, Settings, config_dir};
use quizclock_engine::{SessionOutcome, SessionSettings, TimerSession};
use quizclock_providers::{ApiClient, CodeRunner, QuizSubmitter, RetryConfig, TimeRemainingClient};
use quizclock_types::{Language, QuizId, RunRequest, SubmissionId, TestVerdict, format_clock};

/// Exit status for a session stopped by Ctrl-C.
const EXIT_INTERRUPTED: u8 = 130;

#[derive(Parser)]
#[command(name = "quizclock", version)]
#[command(about = "Quiz countdown with server resync, auto-submit and remote code runs")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Count down a submission's remaining time and submit when it runs out
    Watch {
        #[arg(long)]
        quiz: QuizId,
        #[arg(long)]
        submission: SubmissionId,
        /// Initial seconds; fetched from the server when omitted
        #[arg(long)]
        remaining: Option<u32>,
        /// Do not submit the quiz on expiry
        #[arg(long)]
        no_submit: bool,
    },
    /// Print the server's remaining time for a submission
    Time {
        #[arg(long)]
        submission: SubmissionId,
    },
    /// Run a source file on the code-execution service
    Run {
        /// Source file; the language is inferred from its extension
        file: PathBuf,
        #[arg(long)]
        language: Option<Language>,
        /// File whose contents are passed as stdin
        #[arg(long)]
        stdin: Option<PathBuf>,
        /// Expected output; prints PASS or FAIL
        #[arg(long)]
        expect: Option<PathBuf>,
    },
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let (log_file, init_warnings) = open_log_file();

    if let Some((log_path, file)) = log_file {
        tracing_subscriber::registry()
            .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
            .with(env_filter)
            .init();

        tracing::info!(path = %log_path.display(), "Logging initialized");
        for warning in init_warnings {
            tracing::warn!("{warning}");
        }
        return;
    }

    // Without a log file, stay silent rather than draw over the countdown.
    tracing_subscriber::registry().with(env_filter).init();
}

fn open_log_file() -> (Option<(PathBuf, std::fs::File)>, Vec<String>) {
    let mut warnings = Vec::new();

    for candidate in log_file_candidates() {
        if let Some(parent) = candidate.parent()
            && let Err(e) = fs::create_dir_all(parent)
        {
            warnings.push(format!(
                "Failed to create log dir {}: {e}",
                parent.display()
            ));
            continue;
        }

        match OpenOptions::new().create(true).append(true).open(&candidate) {
            Ok(file) => return (Some((candidate, file)), warnings),
            Err(e) => {
                warnings.push(format!(
                    "Failed to open log file {}: {e}",
                    candidate.display()
                ));
            }
        }
    }

    (None, warnings)
}

fn log_file_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    // Primary: ~/.quizclock/logs/quizclock.log
    if let Some(dir) = config_dir() {
        candidates.push(dir.join("logs").join("quizclock.log"));
    }

    // Fallback: ./.quizclock/logs/quizclock.log
    candidates.push(PathBuf::from(".quizclock").join("logs").join("quizclock.log"));

    candidates
}

fn load_settings() -> Settings {
    let config = match QuizClockConfig::load() {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(path = %err.path().display(), "Ignoring config file: {err}");
            None
        }
    };
    let settings = Settings::resolve(config.as_ref());
    tracing::debug!(?settings, "Resolved settings");
    settings
}

fn api_client(settings: &Settings) -> Result<ApiClient> {
    ApiClient::new(
        &settings.base_url,
        settings.session_cookie.clone(),
        settings.request_timeout,
    )
    .context("invalid server settings")
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();
    let settings = load_settings();

    let result = match cli.command {
        Commands::Watch {
            quiz,
            submission,
            remaining,
            no_submit,
        } => watch(&settings, quiz, submission, remaining, no_submit).await,
        Commands::Time { submission } => time(&settings, submission).await,
        Commands::Run {
            file,
            language,
            stdin,
            expect,
        } => run(&settings, &file, language, stdin.as_deref(), expect.as_deref()).await,
    };

    match result {
        Ok(code) => code,
        Err(err) => {
            tracing::error!("{err:#}");
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn watch(
    settings: &Settings,
    quiz: QuizId,
    submission: SubmissionId,
    remaining: Option<u32>,
    no_submit: bool,
) -> Result<ExitCode> {
    let api = api_client(settings)?;
    let source = Arc::new(TimeRemainingClient::new(api.clone()));

    let initial = match remaining {
        Some(seconds) => seconds,
        None => source
            .fetch(submission)
            .await
            .with_context(|| format!("fetching remaining time for submission {submission}"))?,
    };

    let expiry = (!no_submit).then(|| {
        QuizSubmitter::new(api, quiz, submission)
            .with_retry(RetryConfig::default().with_max_retries(settings.submit_max_retries))
    });
    let sink = terminal::clock_sink(
        quizclock_tui::palette(settings.high_contrast),
        format!("Quiz {quiz} / submission {submission}"),
    )?;
    let session_settings = SessionSettings {
        tick: settings.tick,
        resync_period: settings.resync_period,
    };

    let handle =
        TimerSession::new(submission, initial, session_settings, source, expiry, sink).spawn();

    let cancel = handle.cancel_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupted; stopping timer session");
            cancel.cancel();
        }
    });

    match handle.join().await.context("timer session panicked")? {
        SessionOutcome::Expired(Ok(())) if no_submit => {
            println!("Time expired.");
            Ok(ExitCode::SUCCESS)
        }
        SessionOutcome::Expired(Ok(())) => {
            println!("Time expired. Quiz submitted.");
            Ok(ExitCode::SUCCESS)
        }
        SessionOutcome::Expired(Err(err)) => {
            eprintln!("Time expired, but the quiz could not be submitted: {err}");
            Ok(ExitCode::FAILURE)
        }
        SessionOutcome::Stopped => {
            println!("Stopped.");
            Ok(ExitCode::from(EXIT_INTERRUPTED))
        }
    }
}

async fn time(settings: &Settings, submission: SubmissionId) -> Result<ExitCode> {
    let client = TimeRemainingClient::new(api_client(settings)?);
    let seconds = client
        .fetch(submission)
        .await
        .with_context(|| format!("fetching remaining time for submission {submission}"))?;
    println!("{}", format_clock(seconds));
    Ok(ExitCode::SUCCESS)
}

async fn run(
    settings: &Settings,
    file: &Path,
    language: Option<Language>,
    stdin: Option<&Path>,
    expect: Option<&Path>,
) -> Result<ExitCode> {
    let Some(language) = language.or_else(|| Language::from_path(file)) else {
        bail!(
            "cannot infer the language of {}; pass --language",
            file.display()
        );
    };
    let code = read_file(file)?;
    let mut request = RunRequest::new(language, code);
    if let Some(path) = stdin {
        request = request.with_stdin(read_file(path)?);
    }
    let expected = expect.map(read_file).transpose()?;

    let runner = CodeRunner::new(api_client(settings)?);
    let response = match runner.run(&request).await {
        Ok(response) => response,
        Err(err) => {
            tracing::warn!("Run request failed: {err}");
            println!("{}", err.display_text());
            return Ok(ExitCode::FAILURE);
        }
    };

    println!("{}", response.display_text().trim_end_matches('\n'));
    if let Some(execution_time) = response.execution_time {
        tracing::info!(execution_time, language = language.as_str(), "Run finished");
    }

    let Some(expected) = expected else {
        return Ok(if response.success {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        });
    };

    match response.verdict(&expected) {
        TestVerdict::Passed => {
            println!("PASS");
            Ok(ExitCode::SUCCESS)
        }
        TestVerdict::Failed { reason } => {
            println!("FAIL: {reason}");
            Ok(ExitCode::FAILURE)
        }
    }
}

fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

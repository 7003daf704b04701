mod cli;
mod config;
mod engine;
mod error;
mod refresh;
mod report;
mod sources;
mod types;
mod watch;

use crate::engine::ReadinessEngine;
use crate::error::ReadinessError;
use crate::sources::files::{parse_timestamp, FileSource};
use crate::types::config::ReadinessConfig;
use crate::watch::WatchLoop;
use chrono::{DateTime, Utc};
use clap::Parser;
use std::path::Path;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const WARNINGS: i32 = 1;
    pub const RUNTIME_FAILURE: i32 = 3;
}

fn init_tracing(verbose: u8, quiet: bool) {
    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

struct Workspace {
    config: ReadinessConfig,
    configured: bool,
    source: FileSource,
}

fn open_workspace(path: &Path) -> Result<Workspace, ReadinessError> {
    if !path.is_dir() {
        return Err(ReadinessError::DataDirNotFound(path.display().to_string()));
    }
    let loaded = config::load_config(path)?;
    let configured = loaded.is_some();
    let config = loaded.unwrap_or_default();
    let source = FileSource::new(path, config.source_paths());
    Ok(Workspace {
        config,
        configured,
        source,
    })
}

fn resolve_now(arg: Option<&str>) -> Result<DateTime<Utc>, ReadinessError> {
    match arg {
        Some(text) => {
            parse_timestamp(text).ok_or_else(|| ReadinessError::InvalidTimestamp(text.to_string()))
        }
        None => Ok(Utc::now()),
    }
}

fn output_format(format: &cli::ReportFormat) -> report::OutputFormat {
    match format {
        cli::ReportFormat::Json => report::OutputFormat::Json,
        cli::ReportFormat::Md => report::OutputFormat::Md,
    }
}

fn run() -> Result<i32, ReadinessError> {
    let cli = cli::Cli::parse();
    init_tracing(cli.verbose, cli.quiet);
    let warn_user = |message: String| {
        if !cli.quiet {
            eprintln!("warning: {message}");
        }
    };

    match &cli.command {
        cli::Commands::Score(cmd) => {
            let workspace = open_workspace(&cmd.path)?;
            let now = resolve_now(cmd.now.as_deref())?;
            let engine = ReadinessEngine::new(workspace.config.scoring_params());
            let mut readiness = engine.score_all(&workspace.source, now);

            if let Some(id) = &cmd.interview {
                readiness
                    .interviews
                    .retain(|score| &score.interview_id == id);
                if readiness.interviews.is_empty() {
                    return Err(ReadinessError::InterviewNotFound(id.clone()));
                }
            }

            let rendered = report::render(&readiness, output_format(&cmd.format))?;
            println!("{rendered}");

            if !workspace.configured {
                warn_user(format!(
                    "no {} found in {}, using defaults",
                    config::DEFAULT_CONFIG_FILE,
                    cmd.path.display()
                ));
            }
            if readiness.interviews.is_empty() {
                warn_user("no scheduled interviews to score".to_string());
            }

            if !workspace.configured || readiness.interviews.is_empty() {
                Ok(exit_code::WARNINGS)
            } else {
                Ok(exit_code::SUCCESS)
            }
        }
        cli::Commands::Check(cmd) => {
            let workspace = open_workspace(&cmd.path)?;
            let params = workspace.config.scoring_params();
            let health = workspace.source.health();

            println!(
                "config: {}",
                if workspace.configured {
                    config::DEFAULT_CONFIG_FILE
                } else {
                    "defaults"
                }
            );
            println!(
                "scoring: offer_rate={:.3} window_days={} practice_ceiling={}min mock_decay={:.2}",
                params.historical_offer_rate,
                params.window_days,
                params.practice_ceiling_minutes,
                params.mock_decay
            );

            let mut degraded = false;
            for stats in &health.sources {
                let state = if let Some(error) = &stats.error {
                    degraded = true;
                    format!("ERROR {error}")
                } else if stats.missing {
                    "missing".to_string()
                } else {
                    format!("{} loaded, {} skipped", stats.loaded, stats.skipped)
                };
                if stats.skipped > 0 {
                    degraded = true;
                }
                println!("- {}: {} ({})", stats.name, state, stats.path);
            }
            println!(
                "scheduled interviews: {} (checklists found: {})",
                health.scheduled_interviews, health.checklists_found
            );

            if !workspace.configured {
                warn_user(format!(
                    "no {} found in {}",
                    config::DEFAULT_CONFIG_FILE,
                    cmd.path.display()
                ));
            }

            if degraded || !workspace.configured || health.scheduled_interviews == 0 {
                Ok(exit_code::WARNINGS)
            } else {
                Ok(exit_code::SUCCESS)
            }
        }
        cli::Commands::Watch(cmd) => {
            let workspace = open_workspace(&cmd.path)?;
            let format = output_format(&cmd.format);
            let mut watch = WatchLoop::new(
                ReadinessEngine::new(workspace.config.scoring_params()),
                workspace.source,
                Duration::from_secs(workspace.config.staleness_secs()),
            );

            let mut cycle: u32 = 0;
            loop {
                if let Some(latest) = watch.rescore_if_stale(Utc::now()) {
                    println!("{}", report::render(&latest, format)?);
                }

                cycle += 1;
                if cmd.max_cycles.is_some_and(|max| cycle >= max) {
                    break;
                }

                std::thread::sleep(Duration::from_secs(cmd.interval_secs));
                watch.poll_changes();
            }
            watch.finish();
            Ok(exit_code::SUCCESS)
        }
    }
}

fn main() {
    match run() {
        Ok(code) => {
            if code != 0 {
                std::process::exit(code);
            }
        }
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(exit_code::RUNTIME_FAILURE);
        }
    }
}

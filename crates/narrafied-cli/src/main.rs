//! Narrafied CLI - a terminal client for the Narrafied audiobook platform.
//!
//! This binary signs users up and in, keeps their session between runs,
//! and shows their profile, library, subscription and listening stats.

mod cli;
mod commands;
mod format;
mod view;

use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context as _, Result};
use clap::Parser;
use narrafied_core::auth::{FileTokenStore, KeyringTokenStore};
use narrafied_core::{ApiClient, Config, Session, TokenStorage};
use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::Cli;
use commands::Context;
use view::{NoticeKind, Screen};

/// Exit code for local failures (config, prompts, storage setup)
const EXIT_LOCAL_FAILURE: u8 = 2;

/// Initialize the tracing subscriber for logging.
///
/// The returned guard must be held until exit so buffered file logs are flushed.
fn init_tracing(verbose: u8, log_file: Option<&Path>) -> Option<WorkerGuard> {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug);
    // otherwise -v flags raise the default
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    let (file_layer, guard) = match log_file {
        Some(path) => {
            let dir = match path.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
                _ => PathBuf::from("."),
            };
            let file_name = path
                .file_name()
                .map(|n| n.to_os_string())
                .unwrap_or_else(|| "narrafied.log".into());
            let appender = tracing_appender::rolling::never(dir, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().with_writer(writer).with_ansi(false)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(file_layer)
        .with(filter)
        .init();

    guard
}

/// Build the session for this run; `None` storage means in-memory only
fn build_session(config: &Config, ephemeral: bool) -> Result<(Session, Option<TokenStorage>)> {
    if ephemeral {
        return Ok((Session::in_memory(), None));
    }
    let session = match config.token_storage {
        TokenStorage::File => Session::new(Arc::new(FileTokenStore::new(config.data_dir()?))),
        TokenStorage::Keyring => Session::new(Arc::new(KeyringTokenStore::new())),
    };
    Ok((session, Some(config.token_storage)))
}

async fn run(cli: Cli) -> Result<Screen> {
    let mut config = Config::load().context("Failed to load config")?;
    config.apply_env_overrides()?;
    if let Some(env) = cli.env {
        config.environment = env.into();
    }
    if let Some(api_base) = cli.api_base {
        config.api_base_url = Some(api_base);
    }

    let (session, storage) = build_session(&config, cli.ephemeral)?;
    let mut api = ApiClient::from_config(&config, session)?;
    match api.initialize() {
        Ok(true) => info!("Restored saved session"),
        Ok(false) => {}
        // An unreadable session is treated as signed out
        Err(e) => warn!(error = %e, "Failed to load saved session"),
    }

    let mut ctx = Context {
        api,
        config,
        storage,
    };
    commands::execute(cli.command, &mut ctx).await
}

/// Write a screen to the terminal
fn present(screen: &Screen, json: bool) {
    if let Some(ref notice) = screen.notice {
        let marker = match notice.kind {
            NoticeKind::Success => "✓",
            NoticeKind::Error => "✗",
        };
        eprintln!("{} {}", marker, notice.message);
    }

    match (&screen.data, json) {
        (Some(data), true) => match serde_json::to_string_pretty(data) {
            Ok(text) => println!("{}", text),
            Err(e) => eprintln!("Failed to encode output: {}", e),
        },
        _ => {
            for line in &screen.lines {
                if screen.is_error() {
                    eprintln!("{}", line);
                } else {
                    println!("{}", line);
                }
            }
        }
    }

    if let Some(hint) = screen.route.and_then(|r| r.hint()) {
        eprintln!("{}", hint);
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let _log_guard = init_tracing(cli.verbose, cli.log_file.as_deref());
    let json = cli.json;

    match run(cli).await {
        Ok(screen) => {
            present(&screen, json);
            if screen.is_error() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            error!(error = %e, "Command failed");
            eprintln!("Error: {:#}", e);
            ExitCode::from(EXIT_LOCAL_FAILURE)
        }
    }
}

//! Command handlers.
//!
//! Each handler calls into the core client and hands the result to a
//! `view` function. Server failures become error screens; only local
//! problems (prompting, config I/O) are returned as `Err`.

pub mod account;
pub mod auth;
pub mod library;
pub mod stats;
pub mod subscription;

use std::io::{self, BufRead, Write};

use anyhow::{Context as _, Result};
use narrafied_core::{ApiClient, Config, TokenStorage};

use crate::cli::{Command, StatsCommand, SubscriptionCommand};
use crate::view::{self, Route, Screen};

/// Everything a command needs: the client, the loaded config and where the
/// session is persisted (`None` for an ephemeral session).
pub struct Context {
    pub api: ApiClient,
    pub config: Config,
    pub storage: Option<TokenStorage>,
}

pub async fn execute(command: Command, ctx: &mut Context) -> Result<Screen> {
    let screen = match command {
        Command::Signup(args) => auth::signup(ctx, args).await?,
        Command::Login(args) => auth::login(ctx, args).await?,
        Command::Logout => auth::logout(ctx),
        Command::Status => auth::status(ctx)?,
        Command::Profile => library::profile(ctx).await,
        Command::Library => library::library(ctx).await,
        Command::RemoveBook(args) => library::remove_book(ctx, args.id).await,
        Command::Subscription(SubscriptionCommand::Status) => subscription::status(ctx).await,
        Command::Subscription(SubscriptionCommand::Cancel) => subscription::cancel(ctx).await,
        Command::Stats(StatsCommand::MostPlayed { limit }) => stats::most_played(ctx, limit).await,
        Command::Stats(StatsCommand::Genres) => stats::genres(ctx).await,
        Command::DeleteAccount(args) => account::delete(ctx, args).await?,
    };

    // Follow the redirect after sign-in
    if screen.route == Some(Route::Library) {
        let next = library::library(ctx).await;
        return Ok(screen.then(next));
    }
    Ok(screen)
}

/// Local missing-session check; yields the signed-out screen without a
/// network round trip.
fn require_session(ctx: &Context) -> Option<Screen> {
    ctx.api
        .require_session()
        .err()
        .map(|e| view::api_error(&e, ""))
}

fn password_or_prompt(given: Option<String>) -> Result<String> {
    match given {
        Some(password) => Ok(password),
        None => rpassword::prompt_password("Password: ").context("Failed to read password"),
    }
}

fn prompt_line(label: &str) -> Result<String> {
    let mut stderr = io::stderr();
    write!(stderr, "{}", label)?;
    stderr.flush()?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read input")?;
    Ok(line.trim().to_string())
}

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use narrafied_core::Environment;

#[derive(Parser)]
#[command(
    name = "narrafied",
    version,
    about = "Narrafied audiobook platform from the terminal",
    long_about = "Sign up, sign in and browse your Narrafied library, listening stats and subscription.\n\
                  The session token is kept between runs; use `narrafied logout` to forget it."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Backend environment (overrides NARRAFIED_ENV and the config file)
    #[arg(long, value_enum, global = true)]
    pub env: Option<EnvArg>,

    /// API base URL (overrides NARRAFIED_API_BASE and the config file)
    #[arg(long, global = true)]
    pub api_base: Option<String>,

    /// Keep the session in memory only; nothing is read from or written to storage
    #[arg(long, global = true)]
    pub ephemeral: bool,

    /// Print decoded payloads as JSON instead of formatted text
    #[arg(long, global = true)]
    pub json: bool,

    /// Also write logs to this file
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum EnvArg {
    Local,
    Production,
}

impl From<EnvArg> for Environment {
    fn from(arg: EnvArg) -> Self {
        match arg {
            EnvArg::Local => Environment::Local,
            EnvArg::Production => Environment::Production,
        }
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Create a new account
    Signup(SignupArgs),
    /// Sign in and remember the session
    Login(LoginArgs),
    /// Forget the stored session
    Logout,
    /// Show environment and session state
    Status,
    /// Show the profile dashboard (profile, subscription, library summary)
    Profile,
    /// List the books in your library
    Library,
    /// Remove a book from your library
    RemoveBook(RemoveBookArgs),
    /// Subscription status and cancellation
    #[command(subcommand)]
    Subscription(SubscriptionCommand),
    /// Listening statistics
    #[command(subcommand)]
    Stats(StatsCommand),
    /// Permanently delete your account
    DeleteAccount(DeleteAccountArgs),
}

#[derive(Args)]
pub struct SignupArgs {
    #[arg(long)]
    pub username: String,

    #[arg(long)]
    pub email: String,

    /// Region (state) code, e.g. CA
    #[arg(long)]
    pub region: String,

    /// Password (prompted for when omitted)
    #[arg(long)]
    pub password: Option<String>,
}

#[derive(Args)]
pub struct LoginArgs {
    /// Username (defaults to the last one used)
    #[arg(long)]
    pub username: Option<String>,

    /// Password (prompted for when omitted)
    #[arg(long)]
    pub password: Option<String>,
}

#[derive(Args)]
pub struct RemoveBookArgs {
    /// Book ID as shown by `narrafied library`
    pub id: i64,
}

#[derive(Subcommand)]
pub enum SubscriptionCommand {
    /// Show the current plan and billing period
    Status,
    /// Cancel at the end of the current billing period
    Cancel,
}

#[derive(Subcommand)]
pub enum StatsCommand {
    /// Most played books
    MostPlayed {
        /// Number of books to show
        #[arg(long, default_value_t = narrafied_core::api::client::DEFAULT_MOST_PLAYED_LIMIT)]
        limit: u32,
    },
    /// Listening time by genre
    Genres,
}

#[derive(Args)]
pub struct DeleteAccountArgs {
    /// Why you are leaving (shared with the team)
    #[arg(long, default_value = "")]
    pub reason: String,

    /// Password (prompted for when omitted)
    #[arg(long)]
    pub password: Option<String>,

    /// Confirm permanent deletion
    #[arg(long)]
    pub yes: bool,
}

//! Application configuration management.
//!
//! This module handles loading and saving the client configuration: which
//! backend environment to talk to, where the session token is persisted,
//! and the last username used to sign in.
//!
//! Configuration is stored at `~/.config/narrafied/config.json`. The
//! `NARRAFIED_ENV` and `NARRAFIED_API_BASE` environment variables override
//! the file.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Application name used for config/data directory paths
const APP_NAME: &str = "narrafied";

/// Config file name
const CONFIG_FILE: &str = "config.json";

const LOCAL_API_BASE: &str = "http://localhost:8080";
const PRODUCTION_API_BASE: &str = "https://narrafied.com";

/// Selects the backend environment (`local` or `production`)
pub const ENV_VAR_ENVIRONMENT: &str = "NARRAFIED_ENV";

/// Overrides the API base URL outright
pub const ENV_VAR_API_BASE: &str = "NARRAFIED_API_BASE";

/// Backend environment the client talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Local,
    #[default]
    Production,
}

impl Environment {
    pub fn base_url(&self) -> &'static str {
        match self {
            Environment::Local => LOCAL_API_BASE,
            Environment::Production => PRODUCTION_API_BASE,
        }
    }
}

impl FromStr for Environment {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" | "localhost" | "dev" => Ok(Environment::Local),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(anyhow::anyhow!(
                "Unknown environment '{}' (expected 'local' or 'production')",
                other
            )),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Local => write!(f, "local"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Where the session token is persisted between runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenStorage {
    /// `session.json` in the app data directory
    #[default]
    File,
    /// OS keychain
    Keyring,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub environment: Environment,
    pub api_base_url: Option<String>,
    pub token_storage: TokenStorage,
    /// No timeout is applied unless this is set
    pub request_timeout_secs: Option<u64>,
    pub last_username: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse config file {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Record the last username in the config file.
    ///
    /// The file is re-read so that run-time overrides (flags and
    /// environment variables) merged into an in-memory `Config` are never
    /// written back.
    pub fn remember_username(username: &str) -> Result<()> {
        Self::remember_username_at(&Self::config_path()?, username)
    }

    pub fn remember_username_at(path: &Path, username: &str) -> Result<()> {
        let mut stored = Self::load_from(path)?;
        stored.last_username = Some(username.to_string());
        stored.save_to(path)
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Directory holding the persisted session
    pub fn data_dir(&self) -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?;
        Ok(data_dir.join(APP_NAME))
    }

    /// Base URL for all API calls, without a trailing slash
    pub fn api_base(&self) -> String {
        match self.api_base_url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => url.trim_end_matches('/').to_string(),
            _ => self.environment.base_url().to_string(),
        }
    }

    /// Apply `NARRAFIED_ENV` / `NARRAFIED_API_BASE` from the process environment
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides(
            std::env::var(ENV_VAR_ENVIRONMENT).ok(),
            std::env::var(ENV_VAR_API_BASE).ok(),
        )
    }

    pub fn apply_overrides(
        &mut self,
        environment: Option<String>,
        api_base_url: Option<String>,
    ) -> Result<()> {
        if let Some(env) = environment.filter(|e| !e.trim().is_empty()) {
            self.environment = env
                .parse()
                .with_context(|| format!("Invalid {}", ENV_VAR_ENVIRONMENT))?;
        }
        if let Some(url) = api_base_url.filter(|u| !u.trim().is_empty()) {
            self.api_base_url = Some(url);
        }
        Ok(())
    }
}

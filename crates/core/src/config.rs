//! Startup configuration
//!
//! Reads the bot token, database and backend settings from the environment,
//! optionally merged from a `.env` file first. The record is built once in
//! `main` and handed to every consumer; nothing mutates it afterwards.

use crate::error::{ConfigError, ConfigResult};
use std::collections::HashSet;
use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use url::Url;

pub const BOT_TOKEN_VAR: &str = "BOT_TOKEN";
pub const DATABASE_URL_VAR: &str = "DATABASE_URL";
pub const BACKEND_API_URL_VAR: &str = "BACKEND_API_URL";
pub const BACKEND_API_KEY_VAR: &str = "BACKEND_API_KEY";

pub const DEFAULT_DATABASE_URL: &str = "sqlite:///bot_database.db";
pub const DEFAULT_BACKEND_API_URL: &str = "http://localhost:8000";

/// Chat id of the primary administrator. Not configurable from the environment.
pub const ADMIN_CHAT_ID: i64 = 125_691_222;

/// Bot configuration
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    /// Telegram bot token, never empty
    pub bot_token: String,

    /// Primary administrator chat
    pub admin_chat_id: i64,

    /// Every chat allowed admin actions, always contains `admin_chat_id`
    pub admin_ids: HashSet<i64>,

    /// Database connection URL, passed through uninspected
    pub database_url: String,

    /// Backend API base URL, passed through uninspected
    pub backend_api_url: String,

    /// Backend API key, empty when the backend needs no auth
    pub backend_api_key: String,
}

impl Config {
    /// Merge `.env` from the working directory, then load from the environment
    ///
    /// Call before any other thread is started: merging writes to the process
    /// environment.
    ///
    /// # Errors
    /// Returns [`ConfigError::MissingRequiredConfiguration`] when `BOT_TOKEN`
    /// is unset or empty after the merge.
    pub fn load() -> ConfigResult<Self> {
        report_dotenv(&load_dotenv());
        Self::from_env()
    }

    /// Merge the given `.env` file, then load from the environment
    ///
    /// # Errors
    /// Same as [`Config::load`].
    pub fn load_from(path: impl AsRef<Path>) -> ConfigResult<Self> {
        report_dotenv(&load_dotenv_from(path));
        Self::from_env()
    }

    /// Load configuration from the process environment
    ///
    /// Variables that are not valid Unicode are treated as unset.
    ///
    /// # Errors
    /// Returns [`ConfigError::MissingRequiredConfiguration`] when `BOT_TOKEN`
    /// is unset or empty.
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_vars(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    ///
    /// Values are taken literally: no trimming or case changes.
    ///
    /// # Errors
    /// Returns [`ConfigError::MissingRequiredConfiguration`] when `BOT_TOKEN`
    /// is unset or empty.
    pub fn from_vars<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var_or = |name: &'static str, default: &str| {
            lookup(name).unwrap_or_else(|| {
                tracing::debug!(variable = name, default, "Variable not set, using default");
                default.to_string()
            })
        };

        let bot_token = lookup(BOT_TOKEN_VAR).unwrap_or_default();
        if bot_token.is_empty() {
            return Err(ConfigError::MissingRequiredConfiguration(BOT_TOKEN_VAR));
        }

        let database_url = var_or(DATABASE_URL_VAR, DEFAULT_DATABASE_URL);
        let backend_api_url = var_or(BACKEND_API_URL_VAR, DEFAULT_BACKEND_API_URL);
        let backend_api_key = lookup(BACKEND_API_KEY_VAR).unwrap_or_default();
        if backend_api_key.is_empty() {
            tracing::debug!("{BACKEND_API_KEY_VAR} not set, backend requests go unauthenticated");
        }

        Ok(Self {
            bot_token,
            admin_chat_id: ADMIN_CHAT_ID,
            admin_ids: HashSet::from([ADMIN_CHAT_ID]),
            database_url,
            backend_api_url,
            backend_api_key,
        })
    }

    /// Whether backend requests should carry an API key
    pub fn has_backend_api_key(&self) -> bool {
        !self.backend_api_key.is_empty()
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let api_key = if self.has_backend_api_key() {
            "[REDACTED]"
        } else {
            ""
        };

        f.debug_struct("Config")
            .field("bot_token", &"[REDACTED]")
            .field("admin_chat_id", &self.admin_chat_id)
            .field("admin_ids", &self.admin_ids)
            .field("database_url", &redact_url_credentials(&self.database_url))
            .field("backend_api_url", &redact_url_credentials(&self.backend_api_url))
            .field("backend_api_key", &api_key)
            .finish()
    }
}

/// Hide the password part of a connection URL
///
/// Strings that do not parse as a URL are hidden entirely, since their
/// credential layout is unknown.
pub fn redact_url_credentials(raw: &str) -> String {
    let Ok(mut url) = Url::parse(raw) else {
        return "[REDACTED]".to_string();
    };

    if url.password().is_some() && url.set_password(Some("***")).is_err() {
        return "[REDACTED]".to_string();
    }

    url.to_string()
}

/// Outcome of merging a `.env` file: the file applied, or `None` when there was none
pub type DotenvResult = Result<Option<PathBuf>, dotenvy::Error>;

/// Merge `.env` from the working directory or its parents into the process environment
///
/// Same rules as [`load_dotenv_from`].
pub fn load_dotenv() -> DotenvResult {
    let Ok(cwd) = env::current_dir() else {
        return Ok(None);
    };

    match cwd.ancestors().map(|dir| dir.join(".env")).find(|p| p.is_file()) {
        Some(path) => load_dotenv_from(path),
        None => Ok(None),
    }
}

/// Merge the given `.env` file into the process environment
///
/// The whole file is parsed before anything is applied, so a malformed file
/// changes nothing. Variables already set in the process are kept. A missing
/// file yields `Ok(None)`.
pub fn load_dotenv_from(path: impl AsRef<Path>) -> DotenvResult {
    let path = path.as_ref();
    let vars = match dotenvy::from_path_iter(path) {
        Ok(iter) => iter.collect::<Result<Vec<_>, _>>()?,
        Err(e) if e.not_found() => return Ok(None),
        Err(e) => return Err(e),
    };

    for (key, value) in vars {
        if env::var_os(&key).is_none() {
            set_env_var(&key, &value);
        }
    }

    Ok(Some(path.to_path_buf()))
}

#[allow(unsafe_code)]
fn set_env_var(key: &str, value: &str) {
    // SAFETY: `.env` merging only runs during startup, before the async runtime
    // or any other environment-reading thread exists.
    unsafe {
        env::set_var(key, value);
    }
}

/// Log the outcome of a `.env` merge
///
/// Kept apart from loading so binaries can merge before tracing is up and
/// report afterwards.
pub fn report_dotenv(result: &DotenvResult) {
    match result {
        Ok(Some(path)) => tracing::debug!("Loaded environment from {}", path.display()),
        Ok(None) => tracing::debug!("No .env file found, using process environment only"),
        Err(e) => tracing::warn!("Ignoring .env file: {}", e),
    }
}

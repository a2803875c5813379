use serde::Deserialize;
use std::collections::HashSet;
use std::fmt;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use teloxide::types::ChatId;

use crate::helper::Delivery;
use crate::helper::typing::DEFAULT_FRAME_INTERVAL;

/// Environment variable consulted when the config file has no bot token.
pub const TOKEN_ENV_VAR: &str = "TELEGRAM_BOT_TOKEN";

/// Errors that can occur when loading configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to read the config file.
    ReadFile { path: PathBuf, source: std::io::Error },
    /// Failed to parse JSON.
    ParseJson { path: PathBuf, source: serde_json::Error },
    /// Invalid HTTP listen address.
    InvalidAddr { addr: String, source: std::net::AddrParseError },
    /// Validation error.
    Validation(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReadFile { path, source } => {
                write!(f, "failed to read config file '{}': {}", path.display(), source)
            }
            Self::ParseJson { path, source } => {
                write!(f, "failed to parse config file '{}': {}", path.display(), source)
            }
            Self::InvalidAddr { addr, source } => {
                write!(f, "invalid http_addr '{}': {}", addr, source)
            }
            Self::Validation(msg) => write!(f, "config validation error: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ReadFile { source, .. } => Some(source),
            Self::ParseJson { source, .. } => Some(source),
            Self::InvalidAddr { source, .. } => Some(source),
            Self::Validation(_) => None,
        }
    }
}

#[derive(Deserialize)]
struct ConfigFile {
    /// Enables the Telegram front door. Falls back to TELEGRAM_BOT_TOKEN.
    telegram_bot_token: Option<String>,
    /// Enables the HTTP front door, e.g. "127.0.0.1:3000".
    http_addr: Option<String>,
    /// Chats the bot answers in (empty = all).
    #[serde(default)]
    allowed_chats: Vec<i64>,
    /// JSON catalog replacing the built-in Git topics.
    catalog_path: Option<String>,
    #[serde(default)]
    typing_animation: bool,
    #[serde(default = "default_typing_interval_ms")]
    typing_interval_ms: u64,
    #[serde(default = "default_typing_words_per_frame")]
    typing_words_per_frame: usize,
    log_chat_id: Option<i64>,
    /// Directory for state files (logs). Defaults to current directory.
    data_dir: Option<String>,
}

fn default_typing_interval_ms() -> u64 {
    DEFAULT_FRAME_INTERVAL.as_millis() as u64
}

fn default_typing_words_per_frame() -> usize {
    1
}

pub struct Config {
    pub telegram_bot_token: Option<String>,
    pub http_addr: Option<SocketAddr>,
    pub allowed_chats: HashSet<ChatId>,
    pub catalog_path: Option<PathBuf>,
    pub delivery: Delivery,
    pub log_chat_id: Option<ChatId>,
    /// Directory for state files (logs).
    pub data_dir: PathBuf,
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Self::load_with_token_fallback(path, std::env::var(TOKEN_ENV_VAR).ok())
    }

    /// Load the config file, using `env_token` when it has no bot token.
    pub fn load_with_token_fallback<P: AsRef<Path>>(
        path: P,
        env_token: Option<String>,
    ) -> Result<Self, ConfigError> {
        let config_path = path.as_ref().to_path_buf();
        let content = std::fs::read_to_string(&config_path)
            .map_err(|e| ConfigError::ReadFile { path: config_path.clone(), source: e })?;
        let file: ConfigFile = serde_json::from_str(&content)
            .map_err(|e| ConfigError::ParseJson { path: config_path.clone(), source: e })?;

        let telegram_bot_token = file
            .telegram_bot_token
            .or(env_token)
            .filter(|t| !t.is_empty());
        if let Some(ref token) = telegram_bot_token {
            validate_token(token)?;
        }

        let http_addr = file
            .http_addr
            .map(|addr| {
                addr.parse::<SocketAddr>()
                    .map_err(|e| ConfigError::InvalidAddr { addr, source: e })
            })
            .transpose()?;

        if telegram_bot_token.is_none() && http_addr.is_none() {
            return Err(ConfigError::Validation(
                "nothing to serve: set telegram_bot_token (or TELEGRAM_BOT_TOKEN) and/or http_addr".into(),
            ));
        }
        if file.log_chat_id.is_some() && telegram_bot_token.is_none() {
            return Err(ConfigError::Validation(
                "log_chat_id requires telegram_bot_token".into(),
            ));
        }
        if file.typing_interval_ms == 0 {
            return Err(ConfigError::Validation("typing_interval_ms must be positive".into()));
        }
        if file.typing_words_per_frame == 0 {
            return Err(ConfigError::Validation("typing_words_per_frame must be positive".into()));
        }

        let delivery = if file.typing_animation {
            Delivery::Animated {
                frame_interval: Duration::from_millis(file.typing_interval_ms),
                words_per_frame: file.typing_words_per_frame,
            }
        } else {
            Delivery::Plain
        };

        let data_dir = file
            .data_dir
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));

        Ok(Self {
            telegram_bot_token,
            http_addr,
            allowed_chats: file.allowed_chats.into_iter().map(ChatId).collect(),
            catalog_path: file.catalog_path.map(PathBuf::from),
            delivery,
            log_chat_id: file.log_chat_id.map(ChatId),
            data_dir,
        })
    }

    /// Whether the bot may answer in `chat_id`.
    pub fn is_allowed_chat(&self, chat_id: ChatId) -> bool {
        self.allowed_chats.is_empty() || self.allowed_chats.contains(&chat_id)
    }
}

/// Telegram tokens are formatted as {bot_id}:{secret} where bot_id is numeric.
fn validate_token(token: &str) -> Result<(), ConfigError> {
    match token.split_once(':') {
        Some((id, secret)) if id.parse::<u64>().is_ok() && !secret.is_empty() && !secret.contains(':') => Ok(()),
        _ => Err(ConfigError::Validation(
            "telegram_bot_token appears invalid (expected format: 123456789:ABCdefGHI...)".into(),
        )),
    }
}

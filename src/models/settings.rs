//! Application settings structures.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// HTTP listener settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Basic credentials guarding the trigger endpoint
    #[serde(default)]
    pub auth: AuthConfig,

    /// Email provider settings
    #[serde(default)]
    pub email: EmailConfig,

    /// LeetCode statistics API settings
    #[serde(default)]
    pub leetcode: LeetCodeConfig,

    /// Users file location
    #[serde(default)]
    pub storage: StorageConfig,

    /// Log output settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load settings, or return defaults if the file does not exist.
    ///
    /// A file that exists but does not parse is still an error.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Validate settings values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.server.host.trim().is_empty() {
            return Err(AppError::validation("server.host is empty"));
        }
        if self.auth.username.is_empty() {
            return Err(AppError::validation("auth.username is empty"));
        }
        if self.email.from.trim().is_empty() {
            return Err(AppError::validation("email.from is empty"));
        }
        if self.email.max_concurrent == 0 {
            return Err(AppError::validation("email.max_concurrent must be > 0"));
        }
        if self.email.timeout_secs == 0 {
            return Err(AppError::validation("email.timeout_secs must be > 0"));
        }
        if self.leetcode.base_url.trim().is_empty() {
            return Err(AppError::validation("leetcode.base_url is empty"));
        }
        if self.leetcode.timeout_secs == 0 {
            return Err(AppError::validation("leetcode.timeout_secs must be > 0"));
        }
        if self.leetcode.max_concurrent == 0 {
            return Err(AppError::validation("leetcode.max_concurrent must be > 0"));
        }
        if self.storage.users_file.trim().is_empty() {
            return Err(AppError::validation("storage.users_file is empty"));
        }

        if self.auth.password.is_empty() {
            tracing::warn!("CRON_PASSWORD is empty; the trigger endpoint accepts a blank password");
        }
        if self.email.api_key.is_empty() {
            tracing::warn!("RESEND_API_KEY is empty; every email send will be rejected");
        }
        Ok(())
    }

    /// Socket address string the server binds to.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "defaults::host")]
    pub host: String,

    #[serde(default = "defaults::port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: defaults::host(),
            port: defaults::port(),
        }
    }
}

/// Credentials an external scheduler presents to `/trigger-update`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default = "defaults::auth_username")]
    pub username: String,

    #[serde(default)]
    pub password: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            username: defaults::auth_username(),
            password: String::new(),
        }
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Transactional email provider settings.
#[derive(Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    /// Resend API key
    #[serde(default)]
    pub api_key: String,

    /// Base URL of the Resend API
    #[serde(default = "defaults::email_api_base")]
    pub api_base: String,

    /// Sender address
    #[serde(default = "defaults::from_email")]
    pub from: String,

    /// Subject line for every digest
    #[serde(default = "defaults::subject")]
    pub subject: String,

    /// Maximum sends in flight
    #[serde(default = "defaults::max_concurrent")]
    pub max_concurrent: usize,

    /// User-Agent header for provider requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_base: defaults::email_api_base(),
            from: defaults::from_email(),
            subject: defaults::subject(),
            max_concurrent: defaults::max_concurrent(),
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
        }
    }
}

impl fmt::Debug for EmailConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmailConfig")
            .field("api_key", &"<redacted>")
            .field("api_base", &self.api_base)
            .field("from", &self.from)
            .field("subject", &self.subject)
            .field("max_concurrent", &self.max_concurrent)
            .field("user_agent", &self.user_agent)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// LeetCode statistics API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeetCodeConfig {
    /// Base URL of the statistics API
    #[serde(default = "defaults::leetcode_base_url")]
    pub base_url: String,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Maximum users fetched concurrently
    #[serde(default = "defaults::max_concurrent")]
    pub max_concurrent: usize,
}

impl Default for LeetCodeConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::leetcode_base_url(),
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            max_concurrent: defaults::max_concurrent(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// YAML file holding the tracked users
    #[serde(default = "defaults::users_file")]
    pub users_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            users_file: defaults::users_file(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset
    #[serde(default = "defaults::log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable console output
    #[serde(default)]
    pub json: bool,

    /// Application log file, appended to. Empty disables it.
    #[serde(default = "defaults::log_file")]
    pub file: String,

    /// Run history file holding only `leetmail::runs` events. Empty disables it.
    #[serde(default = "defaults::runs_log_file")]
    pub runs_file: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::log_level(),
            json: false,
            file: defaults::log_file(),
            runs_file: defaults::runs_log_file(),
        }
    }
}

mod defaults {
    // Server defaults
    pub fn host() -> String {
        "0.0.0.0".into()
    }
    pub fn port() -> u16 {
        8000
    }

    pub fn auth_username() -> String {
        "admin".into()
    }

    // Email defaults
    pub fn email_api_base() -> String {
        "https://api.resend.com".into()
    }
    pub fn from_email() -> String {
        "updates@leetmail.com".into()
    }
    pub fn subject() -> String {
        "LeetCode: Your Daily LeetCode Progress Update".into()
    }

    // LeetCode API defaults
    pub fn leetcode_base_url() -> String {
        "https://alfa-leetcode-api.onrender.com".into()
    }
    pub fn user_agent() -> String {
        concat!("leetmail/", env!("CARGO_PKG_VERSION")).into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn max_concurrent() -> usize {
        4
    }

    pub fn users_file() -> String {
        "config.yml".into()
    }

    pub fn log_level() -> String {
        "info".into()
    }
    pub fn log_file() -> String {
        "leetmail.log".into()
    }
    pub fn runs_log_file() -> String {
        "leetmail_runs.log".into()
    }
}

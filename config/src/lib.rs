//! Configuration for quizclock.
//!
//! The file lives at `~/.quizclock/config.toml` (or wherever `QUIZCLOCK_CONFIG`
//! points). Every section is optional; [`Settings::resolve`] folds the file,
//! environment overrides and built-in defaults into one value.
//!
//! ```toml
//! [server]
//! base_url = "http://127.0.0.1:5000"
//! session_cookie = "${QUIZCLOCK_SESSION}"
//! request_timeout_secs = 10
//!
//! [timer]
//! tick_ms = 1000
//! resync_secs = 30
//!
//! [submit]
//! max_retries = 2
//!
//! [app]
//! high_contrast = false
//! ```

use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_TICK: Duration = Duration::from_secs(1);
pub const DEFAULT_RESYNC_PERIOD: Duration = Duration::from_secs(30);
pub const DEFAULT_SUBMIT_RETRIES: u32 = 2;
/// Upper bound for `tick_ms` and `resync_secs`.
pub const MAX_PERIOD: Duration = Duration::from_secs(24 * 60 * 60);
pub const MAX_REQUEST_TIMEOUT: Duration = Duration::from_secs(10 * 60);

pub const CONFIG_PATH_ENV: &str = "QUIZCLOCK_CONFIG";
pub const BASE_URL_ENV: &str = "QUIZCLOCK_BASE_URL";
pub const SESSION_ENV: &str = "QUIZCLOCK_SESSION";

#[derive(Debug, Default, Deserialize)]
pub struct QuizClockConfig {
    pub server: Option<ServerConfig>,
    pub timer: Option<TimerConfig>,
    pub submit: Option<SubmitConfig>,
    pub app: Option<AppConfig>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl ConfigError {
    pub fn path(&self) -> &PathBuf {
        match self {
            ConfigError::Read { path, .. } | ConfigError::Parse { path, .. } => path,
        }
    }
}

#[derive(Default, Deserialize)]
pub struct ServerConfig {
    pub base_url: Option<String>,
    /// Value of the quiz site's login session cookie. `${VAR}` is expanded.
    pub session_cookie: Option<String>,
    pub request_timeout_secs: Option<u64>,
}

// Manual Debug impl to keep the session cookie out of logs.
impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("base_url", &self.base_url)
            .field("session_cookie", &redact(self.session_cookie.as_deref()))
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct TimerConfig {
    /// Countdown tick period in milliseconds. Default: 1000.
    pub tick_ms: Option<u64>,
    /// Server resync period in seconds. Default: 30.
    pub resync_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SubmitConfig {
    /// Retries for the auto-submit request (not counting the first attempt).
    pub max_retries: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AppConfig {
    /// Use a high-contrast palette for the clock.
    #[serde(default)]
    pub high_contrast: bool,
}

fn redact(value: Option<&str>) -> &'static str {
    if value.is_some() { "[REDACTED]" } else { "None" }
}

/// Replace `${VAR}` references with the variable's value (empty when unset).
pub fn expand_env_vars(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            out.push_str(&rest[start..]);
            return out;
        };
        let var = &after[..end];
        if !var.is_empty() {
            out.push_str(&env::var(var).unwrap_or_default());
        }
        rest = &after[end + 1..];
    }

    out.push_str(rest);
    out
}

impl QuizClockConfig {
    /// Load the config file if one exists. `Ok(None)` means "use defaults".
    pub fn load() -> Result<Option<Self>, ConfigError> {
        let Some(path) = config_path() else {
            return Ok(None);
        };
        if !path.exists() {
            return Ok(None);
        }
        Self::load_from(&path).map(Some)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

pub fn config_path() -> Option<PathBuf> {
    if let Ok(explicit) = env::var(CONFIG_PATH_ENV)
        && !explicit.trim().is_empty()
    {
        return Some(PathBuf::from(explicit));
    }
    config_dir().map(|dir| dir.join("config.toml"))
}

/// `~/.quizclock`, the home of the config file and logs.
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".quizclock"))
}

/// Fully resolved runtime settings.
#[derive(Clone, PartialEq, Eq)]
pub struct Settings {
    pub base_url: String,
    pub session_cookie: Option<String>,
    pub request_timeout: Duration,
    pub tick: Duration,
    pub resync_period: Duration,
    pub submit_max_retries: u32,
    pub high_contrast: bool,
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("base_url", &self.base_url)
            .field("session_cookie", &redact(self.session_cookie.as_deref()))
            .field("request_timeout", &self.request_timeout)
            .field("tick", &self.tick)
            .field("resync_period", &self.resync_period)
            .field("submit_max_retries", &self.submit_max_retries)
            .field("high_contrast", &self.high_contrast)
            .finish()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            session_cookie: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            tick: DEFAULT_TICK,
            resync_period: DEFAULT_RESYNC_PERIOD,
            submit_max_retries: DEFAULT_SUBMIT_RETRIES,
            high_contrast: false,
        }
    }
}

impl Settings {
    /// Resolve settings from the config file and the process environment.
    #[must_use]
    pub fn resolve(config: Option<&QuizClockConfig>) -> Self {
        Self::resolve_with(config, |name| env::var(name).ok())
    }

    /// Like [`Settings::resolve`] with an explicit environment lookup.
    ///
    /// Precedence: `QUIZCLOCK_BASE_URL` beats the file's `base_url`; the
    /// file's `session_cookie` beats `QUIZCLOCK_SESSION`.
    pub fn resolve_with<F>(config: Option<&QuizClockConfig>, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();
        let lookup_nonempty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let server = config.and_then(|c| c.server.as_ref());
        if let Some(url) = server.and_then(|s| s.base_url.as_deref()) {
            settings.base_url = url.trim().to_string();
        }
        if let Some(url) = lookup_nonempty(BASE_URL_ENV) {
            settings.base_url = url.trim().to_string();
        }
        settings.base_url = settings.base_url.trim_end_matches('/').to_string();

        settings.session_cookie = server
            .and_then(|s| s.session_cookie.as_deref())
            .map(expand_env_vars)
            .filter(|v| !v.trim().is_empty())
            .or_else(|| lookup_nonempty(SESSION_ENV));

        if let Some(secs) = server.and_then(|s| s.request_timeout_secs) {
            settings.request_timeout = bounded_duration(
                Duration::from_secs(secs),
                DEFAULT_REQUEST_TIMEOUT,
                MAX_REQUEST_TIMEOUT,
                "request_timeout_secs",
            );
        }

        if let Some(timer) = config.and_then(|c| c.timer.as_ref()) {
            if let Some(ms) = timer.tick_ms {
                settings.tick =
                    bounded_duration(Duration::from_millis(ms), DEFAULT_TICK, MAX_PERIOD, "tick_ms");
            }
            if let Some(secs) = timer.resync_secs {
                settings.resync_period = bounded_duration(
                    Duration::from_secs(secs),
                    DEFAULT_RESYNC_PERIOD,
                    MAX_PERIOD,
                    "resync_secs",
                );
            }
        }

        if let Some(retries) = config.and_then(|c| c.submit.as_ref()).and_then(|s| s.max_retries) {
            settings.submit_max_retries = retries;
        }

        settings.high_contrast = config
            .and_then(|c| c.app.as_ref())
            .is_some_and(|app| app.high_contrast);

        settings
    }
}

fn bounded_duration(value: Duration, fallback: Duration, max: Duration, field: &str) -> Duration {
    if value.is_zero() {
        tracing::warn!("Config value {field} must be positive; using {fallback:?}");
        fallback
    } else if value > max {
        tracing::warn!("Config value {field} exceeds {max:?}; using {fallback:?}");
        fallback
    } else {
        value
    }
}

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::AppError;

pub const DEFAULT_API_BASE: &str = "https://api.malaysiabdmartshop.com/api";
pub const DEFAULT_STATE_DIR: &str = ".notifyseat";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_ROUTINE_POLL_SECS: u64 = 60;

#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub api_base: String,
    pub routine_url: Option<String>,
    pub state_dir: PathBuf,
    pub request_timeout: Duration,
    pub routine_poll_interval: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            routine_url: None,
            state_dir: PathBuf::from(DEFAULT_STATE_DIR),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            routine_poll_interval: Duration::from_secs(DEFAULT_ROUTINE_POLL_SECS),
        }
    }
}

impl ClientConfig {
    pub fn new_from_env() -> Result<Self, AppError> {
        let api_base = env::var("NOTIFYSEAT_API_BASE")
            .unwrap_or_else(|_| DEFAULT_API_BASE.to_string())
            .trim_end_matches('/')
            .to_string();
        let routine_url = env::var("NOTIFYSEAT_ROUTINE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty());
        let state_dir = env::var("NOTIFYSEAT_STATE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_STATE_DIR));
        let request_timeout = Duration::from_secs(secs_from_env(
            "NOTIFYSEAT_REQUEST_TIMEOUT_SECS",
            DEFAULT_REQUEST_TIMEOUT_SECS,
        )?);
        let routine_poll_interval = Duration::from_secs(secs_from_env(
            "NOTIFYSEAT_ROUTINE_POLL_SECS",
            DEFAULT_ROUTINE_POLL_SECS,
        )?);

        Ok(Self {
            api_base,
            routine_url,
            state_dir,
            request_timeout,
            routine_poll_interval,
        })
    }

    pub fn token_path(&self) -> PathBuf {
        self.state_dir.join("token")
    }
}

fn secs_from_env(key: &str, default: u64) -> Result<u64, AppError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .ok()
            .filter(|secs| *secs > 0)
            .ok_or_else(|| AppError::Config(format!("{} must be a positive integer, got {:?}", key, raw))),
        Err(_) => Ok(default),
    }
}

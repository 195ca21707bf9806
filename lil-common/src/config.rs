// lil-common/src/config.rs
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use tracing::debug;

use super::error::{LilError, Result};

pub const API_KEY_ENV: &str = "LINEAR_API_KEY";
pub const DEFAULT_API_URL: &str = "https://api.linear.app/graphql";
const DEFAULT_CACHE_FILENAME: &str = "lil_issues_cache.json";
const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(5 * 60);
const MIN_REFRESH_INTERVAL: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: Option<String>,
    pub api_url: String,
    pub cache_file: PathBuf,
    pub refresh_interval: Duration,
    pub log_dir: PathBuf,
}

impl Config {
    pub fn load() -> Result<Self> {
        debug!("Loading lil configuration from environment");
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = get(API_KEY_ENV);
        if api_key.is_none() {
            debug!("{} is not set", API_KEY_ENV);
        }

        let api_url = get("LIL_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let cache_file = get("LIL_CACHE_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| env::temp_dir().join(DEFAULT_CACHE_FILENAME));

        let refresh_interval = match get("LIL_REFRESH_INTERVAL") {
            Some(raw) => {
                let parsed = humantime::parse_duration(raw.trim()).map_err(|e| {
                    LilError::Config(format!("Invalid LIL_REFRESH_INTERVAL '{raw}': {e}"))
                })?;
                if parsed < MIN_REFRESH_INTERVAL {
                    debug!(
                        "Refresh interval {:?} is below the minimum, using {:?}",
                        parsed, MIN_REFRESH_INTERVAL
                    );
                    MIN_REFRESH_INTERVAL
                } else {
                    parsed
                }
            }
            None => DEFAULT_REFRESH_INTERVAL,
        };

        let log_dir = get("LIL_LOG_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(default_log_dir);

        debug!(
            "Configuration loaded: api_url={}, cache_file={}, refresh_interval={}",
            api_url,
            cache_file.display(),
            humantime::format_duration(refresh_interval)
        );
        Ok(Self {
            api_key,
            api_url,
            cache_file,
            refresh_interval,
            log_dir,
        })
    }

    /// The Linear API key, or `MissingApiKey` when none was configured.
    pub fn api_key(&self) -> Result<&str> {
        self.api_key.as_deref().ok_or(LilError::MissingApiKey)
    }

    pub fn cache_file(&self) -> &Path {
        &self.cache_file
    }

    pub fn logs_dir(&self) -> &Path {
        &self.log_dir
    }
}

fn default_log_dir() -> PathBuf {
    ProjectDirs::from("app", "linear", "lil")
        .map(|dirs| dirs.data_local_dir().join("logs"))
        .unwrap_or_else(|| env::temp_dir().join("lil_logs"))
}

// lil-common/src/cache.rs
// Keeps the last fetched issue list so the menu can be shown before the first refresh.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use super::error::{LilError, Result};
use crate::model::Issue;
use crate::Config;

pub struct IssueCache {
    path: PathBuf,
}

impl IssueCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.cache_file())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes the issues as JSON, replacing any previous cache.
    pub fn store(&self, issues: &[Issue]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        let data = serde_json::to_vec(issues)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, data)?;
        fs::rename(&tmp, &self.path)?;
        tracing::debug!("Cached {} issues at {}", issues.len(), self.path.display());
        Ok(())
    }

    /// Loads cached issues. A missing cache file is not an error.
    pub fn load(&self) -> Result<Option<Vec<Issue>>> {
        let data = match fs::read(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("No issue cache at {}", self.path.display());
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };
        let issues: Vec<Issue> = serde_json::from_slice(&data).map_err(|e| {
            LilError::Cache(format!(
                "Failed to parse issue cache {}: {e}",
                self.path.display()
            ))
        })?;
        tracing::debug!("Loaded {} issues from {}", issues.len(), self.path.display());
        Ok(Some(issues))
    }

    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Time since the cache was last written, if it exists.
    pub fn age(&self) -> Result<Option<Duration>> {
        let metadata = match fs::metadata(&self.path) {
            Ok(m) => m,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let modified = metadata.modified()?;
        let age = SystemTime::now()
            .duration_since(modified)
            .map_err(|e| LilError::Cache(format!("System time error: {e}")))?;
        Ok(Some(age))
    }
}

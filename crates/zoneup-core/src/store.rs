//! Configuration store
//!
//! Owns the persisted config file. Loaded once at startup, saved back
//! after setup. Writes go through a temp-file-then-rename so a failed
//! save never leaves a half-written file where the config used to be.

use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::config::Config;
use crate::error::{Error, Result};

/// File-backed store for the single process-wide [`Config`]
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    /// Create a store for the given config file path. Nothing is read
    /// until [`ConfigStore::load`].
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path this store reads and writes
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse the config file.
    ///
    /// A missing file and an unparseable file are the same condition
    /// for callers: the operator has to bootstrap or fix the file
    /// before anything else can run.
    pub async fn load(&self) -> Result<Config> {
        let content = fs::read_to_string(&self.path).await.map_err(|e| {
            Error::config_unreadable(format!("{}: {}", self.path.display(), e))
        })?;

        let config: Config = serde_json::from_str(&content).map_err(|e| {
            Error::config_unreadable(format!("{}: {}", self.path.display(), e))
        })?;

        tracing::debug!(
            path = %self.path.display(),
            domains = config.domains.len(),
            "config loaded"
        );
        Ok(config)
    }

    /// Serialize the full config back to disk, pretty-printed for
    /// hand editing.
    ///
    /// The document is written to a sibling temp file first and then
    /// renamed over the target, so the previous file survives a
    /// failed write intact.
    pub async fn save(&self, config: &Config) -> Result<()> {
        let json = serde_json::to_string_pretty(config)
            .map_err(|e| Error::config_write(format!("serialize config: {e}")))?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent).await.map_err(|e| {
                Error::config_write(format!("create {}: {}", parent.display(), e))
            })?;
        }

        let temp_path = self.temp_path();
        {
            let mut file = fs::File::create(&temp_path).await.map_err(|e| {
                Error::config_write(format!("create {}: {}", temp_path.display(), e))
            })?;

            file.write_all(json.as_bytes()).await.map_err(|e| {
                Error::config_write(format!("write {}: {}", temp_path.display(), e))
            })?;

            file.flush().await.map_err(|e| {
                Error::config_write(format!("flush {}: {}", temp_path.display(), e))
            })?;
        }

        fs::rename(&temp_path, &self.path).await.map_err(|e| {
            Error::config_write(format!(
                "rename {} to {}: {}",
                temp_path.display(),
                self.path.display(),
                e
            ))
        })?;

        tracing::debug!(path = %self.path.display(), "config saved");
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut temp = self.path.clone();
        temp.set_extension("tmp");
        temp
    }
}

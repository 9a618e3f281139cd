//! Deploy writer and its directory layout.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use bridge_config::BridgeConfig;
use chrono::{Local, NaiveDateTime};
use tokio::sync::Mutex;
use tracing::debug;

use crate::naming::{backup_file_name, format_timestamp, layout_file_name, logic_file_name};
use crate::{Deploy, DeployReceipt, StoreError};

/// Output directories for deploys, with the synchronous writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorePaths {
    pub layouts_dir: PathBuf,
    pub teams_dir: PathBuf,
    pub history_dir: PathBuf,
}

impl StorePaths {
    pub fn from_config(config: &BridgeConfig) -> Self {
        Self {
            layouts_dir: config.layouts_dir(),
            teams_dir: config.teams_dir(),
            history_dir: config.history_dir(),
        }
    }

    /// Writes `layout` as pretty-printed JSON to `layouts/{code}.json`.
    pub fn write_layout(&self, code: &str, layout: &serde_json::Value) -> Result<PathBuf, StoreError> {
        ensure_dir(&self.layouts_dir)?;
        let path = self.layouts_dir.join(layout_file_name(code));
        let json = serde_json::to_string_pretty(layout)?;
        fs::write(&path, json).map_err(|e| StoreError::io(&path, e))?;
        Ok(path)
    }

    /// Writes the logic script to `teams/bt{file_num}.js`.
    pub fn write_logic(&self, file_num: &str, content: &str) -> Result<PathBuf, StoreError> {
        ensure_dir(&self.teams_dir)?;
        let path = self.teams_dir.join(logic_file_name(file_num));
        fs::write(&path, content).map_err(|e| StoreError::io(&path, e))?;
        Ok(path)
    }

    /// Creates a new backup under `teams/history/`.
    ///
    /// Existing backups are never overwritten: a name already taken gets a
    /// numeric suffix instead.
    pub fn write_backup(
        &self,
        file_num: &str,
        content: &str,
        at: &NaiveDateTime,
    ) -> Result<PathBuf, StoreError> {
        ensure_dir(&self.history_dir)?;
        let timestamp = format_timestamp(at);
        let mut attempt = 0;
        loop {
            let path = self.history_dir.join(backup_file_name(file_num, &timestamp, attempt));
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(mut file) => {
                    file.write_all(content.as_bytes())
                        .map_err(|e| StoreError::io(&path, e))?;
                    return Ok(path);
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    debug!(path = %path.display(), "backup name taken, retrying");
                    attempt += 1;
                }
                Err(e) => return Err(StoreError::io(&path, e)),
            }
        }
    }

    /// Performs the three writes of a deploy in order: layout, logic, backup.
    ///
    /// No rollback: a failure leaves earlier files of the same deploy in place.
    pub fn write_deploy(&self, deploy: &Deploy, at: &NaiveDateTime) -> Result<DeployReceipt, StoreError> {
        let layout_path = self.write_layout(&deploy.code, &deploy.layout)?;
        let logic_path = self.write_logic(&deploy.file_num, &deploy.js_content)?;
        let backup_path = self.write_backup(&deploy.file_num, &deploy.js_content, at)?;
        Ok(DeployReceipt {
            layout_path,
            logic_path,
            backup_path,
        })
    }
}

fn ensure_dir(dir: &Path) -> Result<(), StoreError> {
    fs::create_dir_all(dir).map_err(|e| StoreError::io(dir, e))
}

/// Serialized deploy writer.
///
/// Every deploy holds one global lock for the duration of its writes, so
/// concurrent requests never interleave on disk. The guard is owned by the
/// blocking write task, so a cancelled request keeps the lock until its
/// writes have finished.
#[derive(Debug)]
pub struct DeployStore {
    paths: StorePaths,
    write_lock: Arc<Mutex<()>>,
}

impl DeployStore {
    pub fn new(config: &BridgeConfig) -> Self {
        Self::with_paths(StorePaths::from_config(config))
    }

    pub fn with_paths(paths: StorePaths) -> Self {
        Self {
            paths,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn paths(&self) -> &StorePaths {
        &self.paths
    }

    /// Writes a deploy, stamping its backup with the current local time.
    pub async fn deploy(&self, deploy: Deploy) -> Result<DeployReceipt, StoreError> {
        let guard = Arc::clone(&self.write_lock).lock_owned().await;
        let paths = self.paths.clone();
        let at = Local::now().naive_local();
        tokio::task::spawn_blocking(move || {
            let _guard = guard;
            paths.write_deploy(&deploy, &at)
        })
        .await?
    }
}

//! Filesystem persistence for layout bridge deploys.
//!
//! A [`Deploy`] is written as three files:
//!
//! - the layout as pretty-printed JSON, overwritten on every deploy
//! - the team logic script, overwritten on every deploy
//! - a timestamped copy of the logic script, never overwritten or removed
//!
//! [`DeployStore`] serializes deploys behind one lock so no two deploys
//! interleave their writes.
//!
//! ```rust,ignore
//! use bridge_config::BridgeConfig;
//! use bridge_store::{Deploy, DeployStore};
//!
//! let store = DeployStore::new(&BridgeConfig::default());
//! let receipt = store.deploy(deploy).await?;
//! println!("backup at {}", receipt.backup_path.display());
//! ```

mod error;
mod naming;
mod store;

use std::path::PathBuf;

pub use error::StoreError;
pub use naming::{backup_file_name, format_timestamp, layout_file_name, logic_file_name, TIMESTAMP_FORMAT};
pub use store::{DeployStore, StorePaths};

/// One editor submission: a layout plus the logic generated from it.
#[derive(Debug, Clone, PartialEq)]
pub struct Deploy {
    /// Team code, names the layout file.
    pub code: String,
    /// Team slot, names the logic file and its backups.
    pub file_num: String,
    /// Editor layout, opaque to the bridge.
    pub layout: serde_json::Value,
    /// Generated logic script.
    pub js_content: String,
}

/// Paths written by a successful deploy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployReceipt {
    pub layout_path: PathBuf,
    pub logic_path: PathBuf,
    pub backup_path: PathBuf,
}

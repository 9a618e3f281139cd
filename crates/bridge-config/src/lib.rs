//! Startup configuration for the layout bridge.
//!
//! [`BridgeConfig`] holds everything the server needs at startup: the base
//! directory deploys are written under and the address to listen on. Values
//! come from built-in defaults, an optional JSON file, and finally
//! [`ConfigOverrides`] collected from the environment and command line.
//!
//! # Output layout
//!
//! | Path | Contents |
//! |------|----------|
//! | `{base_dir}/layouts/{code}.json` | Editor layout, pretty-printed |
//! | `{base_dir}/teams/bt{fileNum}.js` | Team logic |
//! | `{base_dir}/teams/history/bt{fileNum}_{ts}.js` | Logic backups |
//!
//! # Loading from JSON
//!
//! ```rust
//! use bridge_config::BridgeConfig;
//!
//! let config = BridgeConfig::from_json(r#"{ "port": 9090 }"#).unwrap();
//! assert_eq!(config.port, 9090);
//! assert_eq!(config.host.to_string(), "0.0.0.0");
//! ```

use std::fs;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Port the bridge listens on unless configured otherwise.
pub const DEFAULT_PORT: u16 = 8080;

/// Directory under the base directory holding layout JSON files.
pub const LAYOUTS_DIR: &str = "layouts";

/// Directory under the base directory holding team logic files.
pub const TEAMS_DIR: &str = "teams";

/// Directory under the teams directory holding logic backups.
pub const HISTORY_DIR: &str = "history";

/// Errors that can occur when loading a configuration file.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// Failed to read a configuration file.
    #[error("Failed to read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse JSON configuration.
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ConfigError {
    /// Creates an IO error with path context.
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }
}

/// Bridge server configuration.
///
/// Missing fields in a JSON file fall back to [`BridgeConfig::default`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Root directory that `layouts/` and `teams/` live under.
    pub base_dir: PathBuf,
    /// Interface to bind.
    pub host: IpAddr,
    /// TCP port to bind.
    pub port: u16,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("."),
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
        }
    }
}

impl BridgeConfig {
    /// Loads a configuration from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::io(path.display().to_string(), e))?;
        Self::from_json(&content)
    }

    /// Parses a configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serializes this configuration to a JSON string.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Returns a copy rooted at `base_dir`.
    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = base_dir.into();
        self
    }

    /// Applies every override that is set.
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(base_dir) = overrides.base_dir {
            self.base_dir = base_dir;
        }
        if let Some(host) = overrides.host {
            self.host = host;
        }
        if let Some(port) = overrides.port {
            self.port = port;
        }
        self
    }

    /// Directory holding `{code}.json` layout files.
    pub fn layouts_dir(&self) -> PathBuf {
        self.base_dir.join(LAYOUTS_DIR)
    }

    /// Directory holding `bt{fileNum}.js` logic files.
    pub fn teams_dir(&self) -> PathBuf {
        self.base_dir.join(TEAMS_DIR)
    }

    /// Directory holding timestamped logic backups.
    pub fn history_dir(&self) -> PathBuf {
        self.teams_dir().join(HISTORY_DIR)
    }

    /// Address the server binds to.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Individually optional settings layered over a [`BridgeConfig`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub base_dir: Option<PathBuf>,
    pub host: Option<IpAddr>,
    pub port: Option<u16>,
}

//! # Node Configuration
//!
//! Two separate pieces of configuration:
//!
//! - [`JoinCredentials`]: read-only OTAA join parameters, parsed once at
//!   boot from a TOML settings file. The three identifiers are hex-encoded
//!   strings:
//!
//!   ```toml
//!   dev_eui = "0011223344556677"
//!   app_eui = "7066554433221100"
//!   app_key = "000102030405060708090a0b0c0d0e0f"
//!   ```
//!
//! - [`NodeConfig`] + [`ConfigStore`]: the one tunable parameter (the
//!   sleep interval between acquisition cycles), persisted as a small JSON
//!   mapping (`{"sleep_time": 60}`) so it survives power cycles. This file
//!   is rewritten whenever a downlink is processed. A missing or corrupt
//!   file falls back to defaults and is recreated; that path never fails
//!   the boot sequence.
//!
//! Access is single-threaded: the acquisition loop is the only writer.

use std::{
    fs,
    path::{Path, PathBuf},
};

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// Default sleep interval in seconds, used until a downlink reconfigures
/// the node.
pub const DEFAULT_SLEEP_TIME: u16 = 60;

/// OTAA join credentials. Opaque inputs, supplied externally; the node
/// neither generates nor validates them beyond their length.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct JoinCredentials {
    /// Device EUI (8 bytes)
    #[serde(deserialize_with = "hex::serde::deserialize")]
    pub dev_eui: [u8; 8],
    /// Application EUI (8 bytes)
    #[serde(deserialize_with = "hex::serde::deserialize")]
    pub app_eui: [u8; 8],
    /// Application key (16 bytes)
    #[serde(deserialize_with = "hex::serde::deserialize")]
    pub app_key: [u8; 16],
}

impl JoinCredentials {
    /// Parse credentials from TOML settings source.
    pub fn from_toml(source: &str) -> Result<Self, StoreError> {
        Ok(toml::from_str(source)?)
    }

    /// Read and parse a TOML settings file.
    pub fn from_file(path: &Path) -> Result<Self, StoreError> {
        Self::from_toml(&fs::read_to_string(path)?)
    }
}

/// The persisted tunable configuration.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Seconds to sleep between acquisition cycles.
    pub sleep_time: u16,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            sleep_time: DEFAULT_SLEEP_TIME,
        }
    }
}

/// Durable backing store for [`NodeConfig`].
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Load the persisted config.
    ///
    /// A missing, unreadable, or corrupt file yields the default config
    /// and rewrites the file so the next boot finds it. Never fails.
    pub fn load(&self) -> NodeConfig {
        match self.try_load() {
            Ok(config) => config,
            Err(e) => {
                warn!("config not readable ({}), recreating with defaults", e);
                let config = NodeConfig::default();
                if let Err(e) = self.save(&config) {
                    warn!("could not recreate config file: {}", e);
                }
                config
            }
        }
    }

    fn try_load(&self) -> Result<NodeConfig, StoreError> {
        let raw = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write the config durably.
    ///
    /// Failure is reported but non-fatal for the caller: the in-memory
    /// value is still honored for the current cycle.
    pub fn save(&self, config: &NodeConfig) -> Result<(), StoreError> {
        fs::write(&self.path, serde_json::to_string(config)?)?;
        Ok(())
    }
}

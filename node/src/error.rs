//! Error taxonomy.
//!
//! Everything except join-retry exhaustion is transient and gets absorbed
//! at the smallest possible scope (per sensor, per send, per save), so one
//! failing subsystem never stops telemetry from the others.

use thiserror::Error;

/// A single sensor read failed. The affected fields are sentineled and
/// the cycle continues.
#[derive(Debug, Error)]
pub enum SensorError {
    #[error("bus error: {0}")]
    Bus(String),
    #[error("device not responding")]
    NoResponse,
    #[error("measurement not ready")]
    NotReady,
}

/// A radio operation failed. Logged; the next cycle retries with fresh
/// data.
#[derive(Debug, Error)]
pub enum LinkError {
    #[error("not joined to the network")]
    NotJoined,
    #[error("transmit failed: {0}")]
    Tx(String),
    #[error("receive failed: {0}")]
    Rx(String),
    #[error("modem error: {0}")]
    Modem(String),
}

/// Config persistence failed. The caller falls back to defaults or keeps
/// honoring the in-memory value; never fatal.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("config i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config format error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("settings parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// The join retry ceiling was exceeded. The only fatal condition: the
/// session terminates and recovery (reset or deep sleep) is up to the
/// surrounding power management.
#[derive(Debug, Error)]
pub enum JoinError {
    #[error("no join after {attempts} attempts")]
    RetriesExhausted { attempts: u32 },
}

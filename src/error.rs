//! Unified error types for Chronoscape with fail-open recovery.
//!
//! No operation in the progression core is fatal: persistence and event
//! errors are logged and recovered with safe defaults, so the worst-case
//! failure mode is "state does not advance", never a crash.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::core::lens::LensKind;

/// The main error type for Chronoscape operations.
#[derive(Error, Debug)]
pub enum ChronoscapeError {
    /// I/O errors from the persistence store.
    #[error("storage error at {path}: {source}")]
    Storage {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Malformed persisted state (JSON parse failure reading stored values).
    ///
    /// Recovered locally by falling back to an empty collection.
    #[error("malformed persisted state: {message}")]
    Serde { message: String },

    /// Scene configuration loading errors.
    #[error("config error: {message}")]
    Config { message: String },

    /// Switching to a lens that has not been unlocked yet.
    #[error("lens not unlocked: {lens}")]
    InvalidLens { lens: LensKind },

    /// An event referenced a zone id absent from the scene configuration.
    #[error("unknown zone: {zone_id}")]
    UnknownZone { zone_id: String },
}

/// A specialized Result type for Chronoscape operations.
pub type Result<T> = std::result::Result<T, ChronoscapeError>;

impl ChronoscapeError {
    /// Create a storage error from an I/O error.
    pub fn storage(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Storage {
            path: path.into(),
            source,
        }
    }

    /// Create a malformed-persisted-state error.
    pub fn serde(message: impl Into<String>) -> Self {
        Self::Serde {
            message: message.into(),
        }
    }

    /// Create a config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an invalid-lens error.
    pub fn invalid_lens(lens: LensKind) -> Self {
        Self::InvalidLens { lens }
    }

    /// Create an unknown-zone error.
    pub fn unknown_zone(zone_id: impl Into<String>) -> Self {
        Self::UnknownZone {
            zone_id: zone_id.into(),
        }
    }
}

impl From<io::Error> for ChronoscapeError {
    fn from(err: io::Error) -> Self {
        Self::Storage {
            path: PathBuf::new(),
            source: err,
        }
    }
}

impl From<serde_json::Error> for ChronoscapeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde {
            message: err.to_string(),
        }
    }
}

/// Trait for fail-open error handling.
///
/// Infrastructure errors never block the player: log a warning and carry on
/// with a safe default.
pub trait FailOpen<T> {
    /// Handle an error by logging a warning and returning the default value.
    fn fail_open_default(self, context: &str) -> T
    where
        T: Default;

    /// Handle an error by logging a warning and returning the provided fallback.
    fn fail_open_with(self, context: &str, fallback: T) -> T;
}

impl<T> FailOpen<T> for Result<T> {
    fn fail_open_default(self, context: &str) -> T
    where
        T: Default,
    {
        match self {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!("{}: {} (fail-open: using default)", context, err);
                T::default()
            }
        }
    }

    fn fail_open_with(self, context: &str, fallback: T) -> T {
        match self {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!("{}: {} (fail-open: using fallback)", context, err);
                fallback
            }
        }
    }
}

/// Exit codes for the CLI.
pub mod exit_codes {
    /// The event was applied (or the answer accepted).
    pub const SUCCESS: i32 = 0;

    /// The event was rejected: gated content, wrong answer, locked lens.
    pub const REJECTED: i32 = 1;

    /// Usage or infrastructure error.
    pub const ERROR: i32 = 2;
}

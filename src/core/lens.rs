//! Lens state for Chronoscape.
//!
//! The lens is a player-selectable optical mode that determines which hidden
//! zones respond to the pointer. The set of unlocked lenses only grows;
//! unlock *conditions* live in scene configuration and are evaluated by the
//! progression controller, never here.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ChronoscapeError, Result};

/// The available lens modes.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum LensKind {
    /// The ordinary view every session starts with.
    #[default]
    Default,
    /// Ultraviolet lens, revealed partway through the hunt.
    Uv,
}

impl fmt::Display for LensKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LensKind::Default => write!(f, "default"),
            LensKind::Uv => write!(f, "uv"),
        }
    }
}

impl std::str::FromStr for LensKind {
    type Err = ChronoscapeError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "default" => Ok(LensKind::Default),
            "uv" => Ok(LensKind::Uv),
            other => Err(ChronoscapeError::config(format!("unknown lens: {other}"))),
        }
    }
}

/// Currently equipped lens plus the set of unlocked lens modes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LensState {
    /// The lens the player has equipped.
    pub current: LensKind,
    /// Lenses available for switching. Monotonic except on full reset.
    pub unlocked: BTreeSet<LensKind>,
}

impl Default for LensState {
    fn default() -> Self {
        Self {
            current: LensKind::Default,
            unlocked: BTreeSet::from([LensKind::Default]),
        }
    }
}

impl LensState {
    /// Create the initial lens state (default lens only).
    pub fn new() -> Self {
        Self::default()
    }

    /// Unlock a lens. Idempotent; returns whether the lens was newly unlocked.
    pub fn unlock(&mut self, lens: LensKind) -> bool {
        self.unlocked.insert(lens)
    }

    /// Check whether a lens is available for switching.
    pub fn is_unlocked(&self, lens: LensKind) -> bool {
        self.unlocked.contains(&lens)
    }

    /// Equip a lens.
    ///
    /// Fails with [`ChronoscapeError::InvalidLens`] if the lens has not been
    /// unlocked; state is unchanged on failure.
    pub fn switch_to(&mut self, lens: LensKind) -> Result<()> {
        if !self.unlocked.contains(&lens) {
            return Err(ChronoscapeError::invalid_lens(lens));
        }
        self.current = lens;
        Ok(())
    }
}

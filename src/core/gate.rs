//! Prerequisite gates for Chronoscape.
//!
//! Gated content (ink reveals, lens zones, riddles, the final challenge)
//! declares a prerequisite over the session's accumulated state. Evaluation
//! is a pure function of a state snapshot: no side effects, deterministic,
//! recomputed on every read.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::core::lens::LensKind;

/// What a count-threshold prerequisite counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CountSource {
    /// Number of regions currently lit.
    LitRegions,
    /// Number of riddles solved.
    SolvedRiddles,
}

/// A prerequisite over accumulated session state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Prerequisite {
    /// Active iff every required id has been discovered.
    Subset { required: BTreeSet<String> },
    /// Active iff the given lens is currently equipped.
    ///
    /// This is only the lens-type half of a lens zone's condition; spatial
    /// pointer containment is supplied by the caller, not evaluated here.
    Lens { lens: LensKind },
    /// Active iff the referenced count has reached `min`.
    CountThreshold { min: usize, of: CountSource },
}

/// Read-only view of the state a gate can depend on.
#[derive(Debug, Clone, Copy)]
pub struct GateSnapshot<'a> {
    /// Hover-discovered item ids.
    pub discovered: &'a BTreeSet<String>,
    /// Number of lit regions.
    pub lit_regions: usize,
    /// Number of solved riddles.
    pub solved_riddles: usize,
    /// Currently equipped lens.
    pub lens: LensKind,
}

/// Evaluate a prerequisite against a snapshot.
pub fn is_active(prerequisite: &Prerequisite, snapshot: &GateSnapshot<'_>) -> bool {
    match prerequisite {
        Prerequisite::Subset { required } => required.is_subset(snapshot.discovered),
        Prerequisite::Lens { lens } => snapshot.lens == *lens,
        Prerequisite::CountThreshold { min, of } => {
            let count = match of {
                CountSource::LitRegions => snapshot.lit_regions,
                CountSource::SolvedRiddles => snapshot.solved_riddles,
            };
            count >= *min
        }
    }
}

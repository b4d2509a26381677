//! Session state types for Chronoscape.
//!
//! These types hold the accumulated, persisted progress of one discovery
//! session: which regions are lit, which items have been found, and the
//! final challenge latch. Progress is monotonic — nothing here shrinks
//! except through an explicit full reset.
//!
//! The hover-discovery channel ([`DiscoverySet`]) and the region channel
//! ([`RegionRegistry`]) are deliberately separate sets and are never merged.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::lens::{LensKind, LensState};

/// Lit-region registry: region id → when it first lit up.
///
/// Lighting is idempotent and monotonic; `lit_at` is set once and never
/// cleared except by a full reset.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionRegistry {
    lit: BTreeMap<String, DateTime<Utc>>,
}

impl RegionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Light a region. Returns whether this call caused a new illumination.
    pub fn light_up(&mut self, region_id: &str) -> bool {
        if self.lit.contains_key(region_id) {
            return false;
        }
        self.lit.insert(region_id.to_string(), Utc::now());
        true
    }

    /// Check whether a region is lit.
    pub fn is_lit(&self, region_id: &str) -> bool {
        self.lit.contains_key(region_id)
    }

    /// When a region first lit up, if it has.
    pub fn lit_at(&self, region_id: &str) -> Option<DateTime<Utc>> {
        self.lit.get(region_id).copied()
    }

    /// Number of lit regions.
    pub fn len(&self) -> usize {
        self.lit.len()
    }

    /// Whether no region is lit.
    pub fn is_empty(&self) -> bool {
        self.lit.is_empty()
    }

    /// The lit map, region id → first-lit timestamp.
    pub fn lit_regions(&self) -> &BTreeMap<String, DateTime<Utc>> {
        &self.lit
    }

    /// Extinguish everything. Only called from a full session reset.
    pub fn clear(&mut self) {
        self.lit.clear();
    }
}

/// Monotonic set of hover-discovered item ids (the planet channel).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DiscoverySet {
    items: BTreeSet<String>,
}

impl DiscoverySet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a discovery. Returns whether the item was newly discovered.
    pub fn record(&mut self, item_id: &str) -> bool {
        self.items.insert(item_id.to_string())
    }

    /// Check whether an item has been discovered.
    pub fn contains(&self, item_id: &str) -> bool {
        self.items.contains(item_id)
    }

    /// Number of discovered items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether nothing has been discovered.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The discovered ids.
    pub fn items(&self) -> &BTreeSet<String> {
        &self.items
    }

    /// Forget everything. Only called from a full session reset.
    pub fn clear(&mut self) {
        self.items.clear();
    }
}

/// Final text challenge latch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FinalChallenge {
    /// Latches true on the first correct answer and never reverts.
    pub completed: bool,
}

/// Coarse-grained derived phase of the session.
///
/// Always recomputed from accumulated state, never stored independently, so
/// it cannot drift from the state it summarizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Nothing discovered yet.
    Init,
    /// Discovery under way, no gated content active yet.
    Exploring,
    /// Gated content has started activating.
    Gated,
    /// A non-default lens has been unlocked.
    LensUnlocked,
    /// The final challenge is open.
    Challenge,
    /// The final challenge has been answered.
    Complete,
}

/// Derived activity flags for one piece of gated content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatedStatus {
    /// Content id (ink zone, lens zone, or riddle).
    pub id: String,
    /// Region the content belongs to.
    pub region: String,
    /// Whether the prerequisite currently holds. Recomputed on every read.
    pub activated: bool,
    /// Whether the content's one-shot completion has fired (ink reveals,
    /// solved riddles). Persisted; never reverts.
    pub completed: bool,
}

/// Read-only projection of the whole session, consumed by presentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    /// Derived session stage.
    pub stage: Stage,
    /// Hover-discovered item ids.
    pub discovered: BTreeSet<String>,
    /// Lit regions with their first-lit timestamps.
    pub lit_regions: BTreeMap<String, DateTime<Utc>>,
    /// Solved riddle ids.
    pub solved_riddles: BTreeSet<String>,
    /// Lens state (current + unlocked).
    pub lens: LensState,
    /// Per-gated-content activity flags.
    pub gated: Vec<GatedStatus>,
    /// Whether the final challenge accepts submissions.
    pub challenge_open: bool,
    /// Whether the final challenge has been completed.
    pub challenge_completed: bool,
}

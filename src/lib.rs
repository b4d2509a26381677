//! Chronoscape - Discovery progression engine
//!
//! Chronoscape drives a single-session discovery puzzle: ordered hover
//! sequences light regions, lit regions and discoveries open gated content,
//! lenses reveal hidden zones, and a final text challenge closes the hunt.
//! Progress is monotonic, persisted through pluggable stores, and fully
//! derivable into a coarse session stage.

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod storage;

pub use config::{FinalChallengeConfig, HoverZoneDef, InkZoneDef, LensZoneDef, RiddleDef, SceneConfig};
pub use core::{
    answers_match, is_active, CountSource, DiscoverySet, FinalOutcome, GateSnapshot, GatedStatus,
    HoverOutcome, InkOutcome, LensKind, LensRevealOutcome, LensState, Observation, Prerequisite,
    ProgressionController, RegionRegistry, RiddleLedger, RiddleOutcome, SequenceTracker, Snapshot,
    Stage,
};
pub use error::{ChronoscapeError, Result};
pub use storage::{FileStateStore, MemoryStateStore, StateStore};

// CLI commands
pub use cli::{
    AnswerCommand, HoverCommand, InkCommand, LensCommand, ResetCommand, RevealCommand,
    RiddleCommand, StatusCommand,
};

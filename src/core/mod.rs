//! Core types and logic for Chronoscape.
//!
//! This module contains the fundamental types for the discovery session:
//! sequence tracking, prerequisite gates, lenses, riddles, accumulated state,
//! and the progression controller that ties them together.

pub mod gate;
pub mod lens;
pub mod progress;
pub mod riddle;
pub mod sequence;
pub mod state;

pub use gate::{is_active, CountSource, GateSnapshot, Prerequisite};
pub use lens::{LensKind, LensState};
pub use progress::{
    FinalOutcome, HoverOutcome, InkOutcome, LensRevealOutcome, ProgressionController,
};
pub use riddle::{answers_match, RiddleLedger, RiddleOutcome};
pub use sequence::{Observation, SequenceTracker};
pub use state::{
    DiscoverySet, FinalChallenge, GatedStatus, RegionRegistry, Snapshot, Stage,
};

//! Riddle ledger and answer matching for Chronoscape.
//!
//! Riddles are gated text challenges. The ledger only records which riddles
//! have been solved; gating and the lighting of associated regions are the
//! progression controller's job. Wrong answers never mutate state and carry
//! no penalty.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Outcome of a riddle submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiddleOutcome {
    /// The answer matched; the riddle is now solved.
    Correct,
    /// The answer did not match. No state change, unlimited retries.
    Incorrect,
    /// The riddle's prerequisite is not yet met. No state change.
    Gated,
}

/// Monotonic set of solved riddle ids.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RiddleLedger {
    solved: BTreeSet<String>,
}

impl RiddleLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a riddle as solved. Returns whether it was newly solved.
    pub fn record_solved(&mut self, riddle_id: &str) -> bool {
        self.solved.insert(riddle_id.to_string())
    }

    /// Check whether a riddle has been solved.
    pub fn is_solved(&self, riddle_id: &str) -> bool {
        self.solved.contains(riddle_id)
    }

    /// Number of solved riddles.
    pub fn len(&self) -> usize {
        self.solved.len()
    }

    /// Whether no riddles have been solved.
    pub fn is_empty(&self) -> bool {
        self.solved.is_empty()
    }

    /// The solved ids.
    pub fn solved_ids(&self) -> &BTreeSet<String> {
        &self.solved
    }

    /// Forget everything. Only called from a full session reset.
    pub fn clear(&mut self) {
        self.solved.clear();
    }
}

/// Compare a submitted answer against the expected one.
///
/// Matching is whitespace-trimmed and case-insensitive; that is the entire
/// normalization, there is no fuzzy matching.
pub fn answers_match(submitted: &str, expected: &str) -> bool {
    submitted.trim().eq_ignore_ascii_case(expected.trim())
}

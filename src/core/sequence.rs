//! Ordered hover-sequence tracking for Chronoscape.
//!
//! Hover zones belong to clusters, and each cluster is an independent
//! ordered-sequence puzzle: zones must be hovered in ascending sequence
//! order. An out-of-order hover restarts the cluster's attempt at the
//! offending zone; reaching the configured length completes the cluster and
//! clears the attempt so a new cycle can begin.
//!
//! Attempts are transient, in-memory state. They are never persisted and are
//! discarded wholesale on reset.

use std::collections::HashMap;

/// One accepted step of an in-progress attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
struct SequenceStep {
    zone_id: String,
    sequence: u32,
}

/// Result of observing a hover event.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Observation {
    /// Whether the zone entered the attempt (false for duplicates).
    pub accepted: bool,
    /// Whether this observation completed the cluster's sequence.
    pub completed: bool,
    /// The attempt as it stands after this observation.
    pub attempt: Vec<String>,
}

/// Tracks one in-progress ordered attempt per cluster key.
#[derive(Debug, Clone)]
pub struct SequenceTracker {
    attempts: HashMap<String, Vec<SequenceStep>>,
    required_len: usize,
}

impl SequenceTracker {
    /// Create a tracker that completes a cluster after `required_len`
    /// in-order hovers.
    pub fn new(required_len: usize) -> Self {
        Self {
            attempts: HashMap::new(),
            required_len: required_len.max(1),
        }
    }

    /// Observe a hover on `zone_id` with the given cluster and sequence index.
    ///
    /// Rules, in order:
    /// - a zone already present in the attempt is a no-op;
    /// - an empty attempt, or a sequence index exactly one past the previous
    ///   step's, appends the zone;
    /// - anything else restarts the attempt at the observed zone.
    ///
    /// Out-of-order detection compares against the immediately preceding
    /// step only, not the whole attempt.
    pub fn observe(&mut self, zone_id: &str, cluster: &str, sequence: u32) -> Observation {
        let attempt = self.attempts.entry(cluster.to_string()).or_default();

        if attempt.iter().any(|step| step.zone_id == zone_id) {
            return Observation {
                accepted: false,
                completed: false,
                attempt: attempt.iter().map(|s| s.zone_id.clone()).collect(),
            };
        }

        let in_order = match attempt.last() {
            None => true,
            Some(last) => sequence == last.sequence + 1,
        };

        if !in_order {
            attempt.clear();
        }
        attempt.push(SequenceStep {
            zone_id: zone_id.to_string(),
            sequence,
        });

        let completed = attempt.len() >= self.required_len;
        let snapshot: Vec<String> = attempt.iter().map(|s| s.zone_id.clone()).collect();
        if completed {
            attempt.clear();
        }

        Observation {
            accepted: true,
            completed,
            attempt: snapshot,
        }
    }

    /// Current attempt for a cluster, in observation order.
    pub fn attempt(&self, cluster: &str) -> Vec<String> {
        self.attempts
            .get(cluster)
            .map(|a| a.iter().map(|s| s.zone_id.clone()).collect())
            .unwrap_or_default()
    }

    /// Discard all in-progress attempts.
    pub fn clear(&mut self) {
        self.attempts.clear();
    }
}

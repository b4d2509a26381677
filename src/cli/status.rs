//! Status command for Chronoscape.
//!
//! Prints a projection of the whole session: stage, discoveries, lit
//! regions, lens state, gated content, and the final challenge.

use serde::Serialize;

use crate::config::SceneConfig;
use crate::core::{ProgressionController, Snapshot};
use crate::storage::StateStore;

/// Options for the status command.
#[derive(Debug, Clone, Default)]
pub struct StatusOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
}

/// Output format for the status command.
#[derive(Debug, Clone, Serialize)]
pub struct StatusOutput {
    /// Whether the snapshot was produced.
    pub success: bool,
    /// The session snapshot.
    #[serde(flatten)]
    pub snapshot: Snapshot,
}

/// The status command implementation.
pub struct StatusCommand<S: StateStore> {
    controller: ProgressionController<S>,
}

impl<S: StateStore> StatusCommand<S> {
    /// Create a new status command.
    pub fn new(store: S, scene: SceneConfig) -> Self {
        Self {
            controller: ProgressionController::new(scene, store),
        }
    }

    /// Run the status command.
    pub fn run(&self) -> StatusOutput {
        StatusOutput {
            success: true,
            snapshot: self.controller.snapshot(),
        }
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &StatusOutput, options: &StatusOptions) -> String {
        if options.quiet {
            return String::new();
        }

        if options.json {
            serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string())
        } else {
            self.format_human_readable(output)
        }
    }

    /// Format output as human-readable text.
    fn format_human_readable(&self, output: &StatusOutput) -> String {
        let s = &output.snapshot;
        let mut lines = Vec::new();

        lines.push(format!("Stage: {:?}", s.stage));
        lines.push(format!(
            "Discovered: {} ({})",
            s.discovered.len(),
            s.discovered
                .iter()
                .cloned()
                .collect::<Vec<_>>()
                .join(", ")
        ));
        lines.push(format!(
            "Lit regions: {} ({})",
            s.lit_regions.len(),
            s.lit_regions.keys().cloned().collect::<Vec<_>>().join(", ")
        ));
        lines.push(format!(
            "Lens: {} (unlocked: {})",
            s.lens.current,
            s.lens
                .unlocked
                .iter()
                .map(|l| l.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        ));

        for gate in &s.gated {
            let state = if gate.completed {
                "done"
            } else if gate.activated {
                "active"
            } else {
                "gated"
            };
            lines.push(format!("  {} [{}] -> {}", gate.id, state, gate.region));
        }

        let challenge = if s.challenge_completed {
            "completed"
        } else if s.challenge_open {
            "open"
        } else {
            "gated"
        };
        lines.push(format!("Final challenge: {}", challenge));

        lines.join("\n") + "\n"
    }
}

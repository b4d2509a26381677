//! Lens command for Chronoscape.
//!
//! Switches the equipped lens, or lists the unlocked lenses.

use serde::Serialize;

use crate::config::SceneConfig;
use crate::core::{LensKind, ProgressionController};
use crate::storage::StateStore;

/// Options for the lens command.
#[derive(Debug, Clone, Default)]
pub struct LensOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
}

/// Output format for the lens command.
#[derive(Debug, Clone, Serialize)]
pub struct LensOutput {
    /// Whether the switch succeeded.
    pub success: bool,
    /// The lens equipped after the command.
    pub current: LensKind,
    /// Every unlocked lens.
    pub unlocked: Vec<LensKind>,
    /// Error message if the switch was rejected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// The lens command implementation.
pub struct LensCommand<S: StateStore> {
    controller: ProgressionController<S>,
}

impl<S: StateStore> LensCommand<S> {
    /// Create a new lens command.
    pub fn new(store: S, scene: SceneConfig) -> Self {
        Self {
            controller: ProgressionController::new(scene, store),
        }
    }

    /// Switch to the given lens.
    pub fn run(&mut self, lens: LensKind) -> LensOutput {
        let result = self.controller.switch_lens(lens);
        let snapshot = self.controller.snapshot();
        LensOutput {
            success: result.is_ok(),
            current: snapshot.lens.current,
            unlocked: snapshot.lens.unlocked.iter().copied().collect(),
            error: result.err().map(|e| e.to_string()),
        }
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &LensOutput, options: &LensOptions) -> String {
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
    fn format_human_readable(&self, output: &LensOutput) -> String {
        if output.success {
            format!("Lens switched to {}.\n", output.current)
        } else {
            format!(
                "Lens switch failed: {}\n",
                output.error.as_deref().unwrap_or("unknown error")
            )
        }
    }
}

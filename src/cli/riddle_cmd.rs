//! Riddle command for Chronoscape.
//!
//! Submits an answer to a gated riddle.

use serde::Serialize;

use crate::config::SceneConfig;
use crate::core::{ProgressionController, RiddleOutcome};
use crate::storage::StateStore;

/// Options for the riddle command.
#[derive(Debug, Clone, Default)]
pub struct RiddleOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
}

/// Output format for the riddle command.
#[derive(Debug, Clone, Serialize)]
pub struct RiddleOutput {
    /// Whether the answer was accepted.
    pub success: bool,
    /// The riddle submitted to.
    pub riddle_id: String,
    /// The submission outcome.
    pub outcome: RiddleOutcome,
    /// Error message if the riddle does not exist.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// The riddle command implementation.
pub struct RiddleCommand<S: StateStore> {
    controller: ProgressionController<S>,
}

impl<S: StateStore> RiddleCommand<S> {
    /// Create a new riddle command.
    pub fn new(store: S, scene: SceneConfig) -> Self {
        Self {
            controller: ProgressionController::new(scene, store),
        }
    }

    /// Submit an answer to a riddle.
    pub fn run(&mut self, riddle_id: &str, answer: &str) -> RiddleOutput {
        if self.controller.scene().riddle(riddle_id).is_none() {
            return RiddleOutput {
                success: false,
                riddle_id: riddle_id.to_string(),
                outcome: RiddleOutcome::Gated,
                error: Some(format!("unknown riddle: {riddle_id}")),
            };
        }

        let outcome = self.controller.submit_riddle(riddle_id, answer);
        RiddleOutput {
            success: outcome == RiddleOutcome::Correct,
            riddle_id: riddle_id.to_string(),
            outcome,
            error: None,
        }
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &RiddleOutput, options: &RiddleOptions) -> String {
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
    fn format_human_readable(&self, output: &RiddleOutput) -> String {
        if let Some(error) = &output.error {
            return format!("Riddle submission failed: {}\n", error);
        }

        match output.outcome {
            RiddleOutcome::Correct => format!("{}: correct.\n", output.riddle_id),
            RiddleOutcome::Incorrect => {
                format!("{}: incorrect, try again.\n", output.riddle_id)
            }
            RiddleOutcome::Gated => {
                format!("{} is not answerable yet.\n", output.riddle_id)
            }
        }
    }
}

//! Answer command for Chronoscape.
//!
//! Submits an answer to the final challenge.

use serde::Serialize;

use crate::config::SceneConfig;
use crate::core::{FinalOutcome, ProgressionController, Stage};
use crate::storage::StateStore;

/// Options for the answer command.
#[derive(Debug, Clone, Default)]
pub struct AnswerOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
}

/// Output format for the answer command.
#[derive(Debug, Clone, Serialize)]
pub struct AnswerOutput {
    /// Whether the answer was accepted.
    pub success: bool,
    /// The submission outcome.
    pub outcome: FinalOutcome,
    /// The session stage after the submission.
    pub stage: Stage,
}

/// The answer command implementation.
pub struct AnswerCommand<S: StateStore> {
    controller: ProgressionController<S>,
}

impl<S: StateStore> AnswerCommand<S> {
    /// Create a new answer command.
    pub fn new(store: S, scene: SceneConfig) -> Self {
        Self {
            controller: ProgressionController::new(scene, store),
        }
    }

    /// Submit an answer to the final challenge.
    pub fn run(&mut self, answer: &str) -> AnswerOutput {
        let outcome = self.controller.submit_final_answer(answer);
        AnswerOutput {
            success: outcome == FinalOutcome::Correct,
            outcome,
            stage: self.controller.stage(),
        }
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &AnswerOutput, options: &AnswerOptions) -> String {
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
    fn format_human_readable(&self, output: &AnswerOutput) -> String {
        match output.outcome {
            FinalOutcome::Correct => "Correct. The hunt is complete.\n".to_string(),
            FinalOutcome::Incorrect => "Incorrect, try again.\n".to_string(),
            FinalOutcome::Gated => "The final challenge is not open yet.\n".to_string(),
        }
    }
}

//! Reset command for Chronoscape.
//!
//! Wipes all session progress, in memory and in the store.

use serde::Serialize;

use crate::config::SceneConfig;
use crate::core::ProgressionController;
use crate::storage::StateStore;

/// Options for the reset command.
#[derive(Debug, Clone, Default)]
pub struct ResetOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
}

/// Output format for the reset command.
#[derive(Debug, Clone, Serialize)]
pub struct ResetOutput {
    /// Whether the reset ran.
    pub success: bool,
}

/// The reset command implementation.
pub struct ResetCommand<S: StateStore> {
    controller: ProgressionController<S>,
}

impl<S: StateStore> ResetCommand<S> {
    /// Create a new reset command.
    pub fn new(store: S, scene: SceneConfig) -> Self {
        Self {
            controller: ProgressionController::new(scene, store),
        }
    }

    /// Run the reset command.
    pub fn run(&mut self) -> ResetOutput {
        self.controller.reset_all();
        ResetOutput { success: true }
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &ResetOutput, options: &ResetOptions) -> String {
        if options.quiet {
            return String::new();
        }

        if options.json {
            serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string())
        } else if output.success {
            "Session reset.\n".to_string()
        } else {
            "Reset failed.\n".to_string()
        }
    }
}

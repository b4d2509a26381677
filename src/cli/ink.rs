//! Ink command for Chronoscape.
//!
//! Records a pointer hover on an ink zone. The message reveals once the
//! zone's required discoveries are all present.

use serde::Serialize;

use crate::config::SceneConfig;
use crate::core::ProgressionController;
use crate::storage::StateStore;

/// Options for the ink command.
#[derive(Debug, Clone, Default)]
pub struct InkOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
}

/// Output format for the ink command.
#[derive(Debug, Clone, Serialize)]
pub struct InkOutput {
    /// Whether the zone exists and the event was processed.
    pub success: bool,
    /// The hovered ink zone.
    pub zone_id: String,
    /// Whether the ink is revealed.
    pub revealed: bool,
    /// Whether this hover performed the one-shot reveal.
    pub newly_revealed: bool,
    /// The revealed message, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Region newly lit by this reveal, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region_lit: Option<String>,
    /// Error message if the event was rejected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl InkOutput {
    /// Create a failed output.
    pub fn failure(zone_id: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            zone_id: zone_id.into(),
            revealed: false,
            newly_revealed: false,
            message: None,
            region_lit: None,
            error: Some(error.into()),
        }
    }
}

/// The ink command implementation.
pub struct InkCommand<S: StateStore> {
    controller: ProgressionController<S>,
}

impl<S: StateStore> InkCommand<S> {
    /// Create a new ink command.
    pub fn new(store: S, scene: SceneConfig) -> Self {
        Self {
            controller: ProgressionController::new(scene, store),
        }
    }

    /// Run the ink command for a zone.
    pub fn run(&mut self, zone_id: &str) -> InkOutput {
        if self.controller.scene().ink_zone(zone_id).is_none() {
            return InkOutput::failure(zone_id, format!("unknown ink zone: {zone_id}"));
        }

        let outcome = self.controller.record_ink_hover(zone_id);
        InkOutput {
            success: true,
            zone_id: zone_id.to_string(),
            revealed: outcome.revealed,
            newly_revealed: outcome.newly_revealed,
            message: outcome.message,
            region_lit: outcome.region_lit,
            error: None,
        }
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &InkOutput, options: &InkOptions) -> String {
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
    fn format_human_readable(&self, output: &InkOutput) -> String {
        if !output.success {
            return format!(
                "Ink hover failed: {}\n",
                output.error.as_deref().unwrap_or("unknown error")
            );
        }

        if !output.revealed {
            return format!("{} stays hidden.\n", output.zone_id);
        }

        let mut line = format!(
            "{}: \"{}\"",
            output.zone_id,
            output.message.as_deref().unwrap_or("")
        );
        if let Some(region) = &output.region_lit {
            line.push_str(&format!(" ({} lit up)", region));
        }
        line.push('\n');
        line
    }
}

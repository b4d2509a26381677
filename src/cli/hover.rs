//! Hover command for Chronoscape.
//!
//! Records a pointer hover on an ordered zone and reports what it changed.

use serde::Serialize;

use crate::config::SceneConfig;
use crate::core::ProgressionController;
use crate::storage::StateStore;

/// Options for the hover command.
#[derive(Debug, Clone, Default)]
pub struct HoverOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
}

/// Output format for the hover command.
#[derive(Debug, Clone, Serialize)]
pub struct HoverOutput {
    /// Whether the zone exists and the event was processed.
    pub success: bool,
    /// The hovered zone.
    pub zone_id: String,
    /// Whether the zone was discovered for the first time.
    pub newly_discovered: bool,
    /// Whether this hover completed the cluster's sequence.
    pub sequence_completed: bool,
    /// Region newly lit by this hover, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region_lit: Option<String>,
    /// Error message if the event was rejected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl HoverOutput {
    /// Create a failed output.
    pub fn failure(zone_id: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            zone_id: zone_id.into(),
            newly_discovered: false,
            sequence_completed: false,
            region_lit: None,
            error: Some(error.into()),
        }
    }
}

/// The hover command implementation.
pub struct HoverCommand<S: StateStore> {
    controller: ProgressionController<S>,
}

impl<S: StateStore> HoverCommand<S> {
    /// Create a new hover command.
    pub fn new(store: S, scene: SceneConfig) -> Self {
        Self {
            controller: ProgressionController::new(scene, store),
        }
    }

    /// Run the hover command for a zone.
    pub fn run(&mut self, zone_id: &str) -> HoverOutput {
        if self.controller.scene().hover_zone(zone_id).is_none() {
            return HoverOutput::failure(zone_id, format!("unknown zone: {zone_id}"));
        }

        let outcome = self.controller.record_hover(zone_id);
        HoverOutput {
            success: true,
            zone_id: zone_id.to_string(),
            newly_discovered: outcome.newly_discovered,
            sequence_completed: outcome.sequence_completed,
            region_lit: outcome.region_lit,
            error: None,
        }
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &HoverOutput, options: &HoverOptions) -> String {
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
    fn format_human_readable(&self, output: &HoverOutput) -> String {
        if !output.success {
            return format!(
                "Hover failed: {}\n",
                output.error.as_deref().unwrap_or("unknown error")
            );
        }

        let mut line = format!("Hovered {}", output.zone_id);
        if output.newly_discovered {
            line.push_str(" (new discovery)");
        }
        if let Some(region) = &output.region_lit {
            line.push_str(&format!("; sequence complete, {} lit up", region));
        } else if output.sequence_completed {
            line.push_str("; sequence complete");
        }
        line.push('\n');
        line
    }
}

//! Reveal command for Chronoscape.
//!
//! Reports whether a lens zone is uncovered under the currently equipped
//! lens, simulating the pointer resting over the zone.

use serde::Serialize;

use crate::config::SceneConfig;
use crate::core::ProgressionController;
use crate::storage::StateStore;

/// Options for the reveal command.
#[derive(Debug, Clone, Default)]
pub struct RevealOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
    /// Treat the pointer as outside the zone.
    pub outside: bool,
}

/// Output format for the reveal command.
#[derive(Debug, Clone, Serialize)]
pub struct RevealOutput {
    /// Whether the zone exists and the event was processed.
    pub success: bool,
    /// The lens zone.
    pub zone_id: String,
    /// Whether the zone is currently uncovered.
    pub uncovered: bool,
    /// The uncovered message, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Region newly lit by this reveal, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region_lit: Option<String>,
    /// Error message if the event was rejected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RevealOutput {
    /// Create a failed output.
    pub fn failure(zone_id: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            zone_id: zone_id.into(),
            uncovered: false,
            message: None,
            region_lit: None,
            error: Some(error.into()),
        }
    }
}

/// The reveal command implementation.
pub struct RevealCommand<S: StateStore> {
    controller: ProgressionController<S>,
}

impl<S: StateStore> RevealCommand<S> {
    /// Create a new reveal command.
    pub fn new(store: S, scene: SceneConfig) -> Self {
        Self {
            controller: ProgressionController::new(scene, store),
        }
    }

    /// Run the reveal command for a zone.
    pub fn run(&mut self, zone_id: &str, options: &RevealOptions) -> RevealOutput {
        if self.controller.scene().lens_zone(zone_id).is_none() {
            return RevealOutput::failure(zone_id, format!("unknown lens zone: {zone_id}"));
        }

        let outcome = self.controller.record_lens_reveal(zone_id, !options.outside);
        RevealOutput {
            success: true,
            zone_id: zone_id.to_string(),
            uncovered: outcome.uncovered,
            message: outcome.message,
            region_lit: outcome.region_lit,
            error: None,
        }
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &RevealOutput, options: &RevealOptions) -> String {
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
    fn format_human_readable(&self, output: &RevealOutput) -> String {
        if !output.success {
            return format!(
                "Reveal failed: {}\n",
                output.error.as_deref().unwrap_or("unknown error")
            );
        }

        if !output.uncovered {
            return format!("{} stays covered.\n", output.zone_id);
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStateStore;

    fn command() -> RevealCommand<MemoryStateStore> {
        RevealCommand::new(MemoryStateStore::new(), SceneConfig::default())
    }

    #[test]
    fn test_default_lens_uncovers_its_zone() {
        let mut cmd = command();
        let output = cmd.run("lens1", &RevealOptions::default());
        assert!(output.uncovered);
        assert_eq!(output.region_lit.as_deref(), Some("region6"));
    }

    #[test]
    fn test_uv_zone_stays_covered_under_default_lens() {
        let mut cmd = command();
        let output = cmd.run("lens2", &RevealOptions::default());
        assert!(output.success);
        assert!(!output.uncovered);
        assert!(output.message.is_none());
    }

    #[test]
    fn test_pointer_outside_keeps_zone_covered() {
        let mut cmd = command();
        let options = RevealOptions {
            outside: true,
            ..Default::default()
        };
        let output = cmd.run("lens1", &options);
        assert!(!output.uncovered);
    }

    #[test]
    fn test_unknown_zone_fails() {
        let mut cmd = command();
        let output = cmd.run("lens9", &RevealOptions::default());
        assert!(!output.success);
    }

    #[test]
    fn test_format_output_covered() {
        let mut cmd = command();
        let output = cmd.run("lens2", &RevealOptions::default());
        let formatted = cmd.format_output(&output, &RevealOptions::default());
        assert!(formatted.contains("stays covered"));
    }
}

//! The progression controller for Chronoscape.
//!
//! One controller owns the whole session: the scene configuration, the
//! persistence store, and every accumulated state channel. All player input
//! flows through its event methods, which mutate state, write the changed
//! channels through to the store, and re-evaluate lens unlock conditions.
//!
//! Persistence is fail-open: a store that cannot be written is logged and
//! the session continues in memory. Loading tolerates missing or malformed
//! values per channel, falling back to that channel's initial state.

use std::collections::BTreeSet;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::config::{InkZoneDef, SceneConfig};
use crate::core::gate::{self, GateSnapshot};
use crate::core::lens::{LensKind, LensState};
use crate::core::riddle::{answers_match, RiddleLedger, RiddleOutcome};
use crate::core::sequence::SequenceTracker;
use crate::core::state::{
    DiscoverySet, FinalChallenge, GatedStatus, RegionRegistry, Snapshot, Stage,
};
use crate::error::{FailOpen, Result};
use crate::storage::{keys, StateStore};

/// Outcome of a hover event on an ordered zone.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct HoverOutcome {
    /// Whether this hover discovered the zone for the first time.
    pub newly_discovered: bool,
    /// Whether this hover completed the cluster's ordered sequence.
    pub sequence_completed: bool,
    /// Region newly lit by this hover, if any.
    pub region_lit: Option<String>,
}

/// Outcome of a hover event on an ink zone.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct InkOutcome {
    /// Whether the ink is revealed (now or from an earlier hover).
    pub revealed: bool,
    /// Whether this hover performed the one-shot reveal.
    pub newly_revealed: bool,
    /// The revealed message, present whenever `revealed` is true.
    pub message: Option<String>,
    /// Region newly lit by this reveal, if any.
    pub region_lit: Option<String>,
}

/// Outcome of a pointer update over a lens zone.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct LensRevealOutcome {
    /// Whether the zone is currently uncovered (right lens, pointer inside).
    pub uncovered: bool,
    /// The zone's message, present whenever `uncovered` is true.
    pub message: Option<String>,
    /// Region newly lit by this reveal, if any.
    pub region_lit: Option<String>,
}

/// Outcome of a final challenge submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinalOutcome {
    /// The answer matched (or the challenge was already completed).
    Correct,
    /// The answer did not match. No state change, unlimited retries.
    Incorrect,
    /// The challenge's prerequisite is not yet met. No state change.
    Gated,
}

/// Owns and advances one discovery session.
pub struct ProgressionController<S: StateStore> {
    scene: SceneConfig,
    store: S,
    tracker: SequenceTracker,
    discovered: DiscoverySet,
    regions: RegionRegistry,
    riddles: RiddleLedger,
    lens: LensState,
    revealed: BTreeSet<String>,
    challenge: FinalChallenge,
}

impl<S: StateStore> ProgressionController<S> {
    /// Create a controller, restoring any persisted progress from the store.
    ///
    /// Each channel loads independently; a missing or malformed value falls
    /// back to that channel's initial state with a logged warning.
    pub fn new(scene: SceneConfig, store: S) -> Self {
        let discovered: DiscoverySet =
            load_channel(&store, keys::DISCOVERED_ITEMS).unwrap_or_default();
        let regions: RegionRegistry = load_channel(&store, keys::LIT_REGIONS).unwrap_or_default();
        let riddles: RiddleLedger = load_channel(&store, keys::SOLVED_RIDDLES).unwrap_or_default();
        let revealed: BTreeSet<String> =
            load_channel(&store, keys::REVEALED_CONTENT).unwrap_or_default();
        let completed: bool = load_channel(&store, keys::FINAL_COMPLETED).unwrap_or_default();

        let mut lens = LensState::new();
        if let Some(unlocked) = load_channel::<BTreeSet<LensKind>, S>(&store, keys::UNLOCKED_LENSES)
        {
            lens.unlocked.extend(unlocked);
        }
        if let Some(current) = load_channel::<LensKind, S>(&store, keys::CURRENT_LENS) {
            if lens.is_unlocked(current) {
                lens.current = current;
            } else {
                tracing::warn!("persisted lens {} is not unlocked, keeping default", current);
            }
        }

        let tracker = SequenceTracker::new(scene.sequence_length);

        let mut controller = Self {
            scene,
            store,
            tracker,
            discovered,
            regions,
            riddles,
            lens,
            revealed,
            challenge: FinalChallenge { completed },
        };
        // Restored state may already satisfy unlock conditions the persisted
        // lens set predates.
        controller.evaluate_lens_unlocks();
        controller
    }

    /// The scene this controller runs.
    pub fn scene(&self) -> &SceneConfig {
        &self.scene
    }

    // ========================================================================
    // Events
    // ========================================================================

    /// Record a pointer hover on an ordered zone.
    ///
    /// An accepted hover discovers the zone; completing the cluster's
    /// sequence lights the cluster's region. An unknown zone id is logged
    /// and ignored.
    pub fn record_hover(&mut self, zone_id: &str) -> HoverOutcome {
        let Some(zone) = self.scene.hover_zone(zone_id) else {
            tracing::warn!("hover on unknown zone: {}", zone_id);
            return HoverOutcome::default();
        };
        let region = zone.region.clone();
        let cluster = zone.cluster_key().to_string();
        let sequence = zone.sequence;

        let observation = self.tracker.observe(zone_id, &cluster, sequence);

        let mut outcome = HoverOutcome::default();
        if observation.accepted {
            outcome.newly_discovered = self.discovered.record(zone_id);
            if outcome.newly_discovered {
                self.persist(keys::DISCOVERED_ITEMS, &self.discovered);
            }
        }
        if observation.completed {
            outcome.sequence_completed = true;
            if self.regions.light_up(&region) {
                self.persist(keys::LIT_REGIONS, &self.regions);
                outcome.region_lit = Some(region);
            }
        }

        self.evaluate_lens_unlocks();
        outcome
    }

    /// Record a pointer hover on an ink zone.
    ///
    /// The reveal is one-shot: the first hover after every required item has
    /// been discovered reveals the message permanently and lights the zone's
    /// region. Hovers before that do nothing.
    pub fn record_ink_hover(&mut self, zone_id: &str) -> InkOutcome {
        let Some(zone) = self.scene.ink_zone(zone_id) else {
            tracing::warn!("ink hover on unknown zone: {}", zone_id);
            return InkOutcome::default();
        };
        let zone = zone.clone();

        if self.revealed.contains(&zone.id) {
            return InkOutcome {
                revealed: true,
                newly_revealed: false,
                message: Some(zone.message),
                region_lit: None,
            };
        }

        if !self.ink_active(&zone) {
            return InkOutcome::default();
        }

        self.revealed.insert(zone.id.clone());
        self.persist(keys::REVEALED_CONTENT, &self.revealed);

        let region_lit = if self.regions.light_up(&zone.region) {
            self.persist(keys::LIT_REGIONS, &self.regions);
            Some(zone.region.clone())
        } else {
            None
        };

        self.evaluate_lens_unlocks();
        InkOutcome {
            revealed: true,
            newly_revealed: true,
            message: Some(zone.message),
            region_lit,
        }
    }

    /// Record a pointer update over a lens zone.
    ///
    /// The zone is uncovered while the pointer is inside it and the matching
    /// lens is equipped; both halves of the condition are re-evaluated on
    /// every call. The first uncovering lights the zone's region, which then
    /// stays lit regardless of later pointer or lens changes.
    pub fn record_lens_reveal(&mut self, zone_id: &str, pointer_over_zone: bool) -> LensRevealOutcome {
        let Some(zone) = self.scene.lens_zone(zone_id) else {
            tracing::warn!("lens reveal on unknown zone: {}", zone_id);
            return LensRevealOutcome::default();
        };
        let zone = zone.clone();

        let uncovered = pointer_over_zone && self.lens.current == zone.lens;
        if !uncovered {
            return LensRevealOutcome::default();
        }

        let region_lit = if self.regions.light_up(&zone.region) {
            self.persist(keys::LIT_REGIONS, &self.regions);
            Some(zone.region.clone())
        } else {
            None
        };

        self.evaluate_lens_unlocks();
        LensRevealOutcome {
            uncovered: true,
            message: Some(zone.message),
            region_lit,
        }
    }

    /// Submit an answer to a riddle.
    ///
    /// Rejected while the riddle's prerequisite is unmet. A correct answer
    /// marks the riddle solved and lights its region; wrong answers change
    /// nothing and may be retried without limit. An unknown riddle id is
    /// logged and treated as gated.
    pub fn submit_riddle(&mut self, riddle_id: &str, answer: &str) -> RiddleOutcome {
        let Some(riddle) = self.scene.riddle(riddle_id) else {
            tracing::warn!("submission for unknown riddle: {}", riddle_id);
            return RiddleOutcome::Gated;
        };
        let riddle = riddle.clone();

        if !gate::is_active(&riddle.prerequisite, &self.gate_snapshot()) {
            return RiddleOutcome::Gated;
        }

        if !answers_match(answer, &riddle.answer) {
            return RiddleOutcome::Incorrect;
        }

        if self.riddles.record_solved(&riddle.id) {
            self.persist(keys::SOLVED_RIDDLES, &self.riddles);
            if self.regions.light_up(&riddle.region) {
                self.persist(keys::LIT_REGIONS, &self.regions);
            }
            self.evaluate_lens_unlocks();
        }
        RiddleOutcome::Correct
    }

    /// Submit an answer to the final challenge.
    ///
    /// Rejected while the challenge's prerequisite is unmet. A correct
    /// answer latches completion permanently; once latched, every further
    /// submission reports `Correct` without re-checking the text.
    pub fn submit_final_answer(&mut self, answer: &str) -> FinalOutcome {
        if self.challenge.completed {
            return FinalOutcome::Correct;
        }

        let prerequisite = self.scene.final_challenge.prerequisite.clone();
        if !gate::is_active(&prerequisite, &self.gate_snapshot()) {
            return FinalOutcome::Gated;
        }

        if !answers_match(answer, &self.scene.final_challenge.answer) {
            return FinalOutcome::Incorrect;
        }

        self.challenge.completed = true;
        self.persist(keys::FINAL_COMPLETED, &true);
        FinalOutcome::Correct
    }

    /// Equip a lens.
    ///
    /// Fails if the lens has not been unlocked; state is unchanged on
    /// failure.
    pub fn switch_lens(&mut self, lens: LensKind) -> Result<()> {
        self.lens.switch_to(lens)?;
        self.persist(keys::CURRENT_LENS, &lens);
        Ok(())
    }

    /// Reset the whole session to its initial state.
    ///
    /// Clears every state channel, discards in-progress sequence attempts,
    /// and removes all persisted keys. After a reset the session is
    /// indistinguishable from a brand new one.
    pub fn reset_all(&mut self) {
        self.discovered = DiscoverySet::new();
        self.regions = RegionRegistry::new();
        self.riddles = RiddleLedger::new();
        self.lens = LensState::new();
        self.revealed.clear();
        self.challenge = FinalChallenge::default();
        self.tracker.clear();

        for key in keys::ALL {
            self.store
                .remove(key)
                .fail_open_default(&format!("removing persisted key {key}"));
        }
    }

    // ========================================================================
    // Views
    // ========================================================================

    /// Derive the session stage from accumulated state.
    pub fn stage(&self) -> Stage {
        if self.challenge.completed {
            return Stage::Complete;
        }
        let snapshot = self.gate_snapshot();
        if gate::is_active(&self.scene.final_challenge.prerequisite, &snapshot) {
            return Stage::Challenge;
        }
        if self.lens.unlocked.len() > 1 {
            return Stage::LensUnlocked;
        }

        let any_gate_open = self
            .scene
            .ink_zones
            .iter()
            .any(|z| self.revealed.contains(&z.id) || self.ink_active(z))
            || self
                .scene
                .riddles
                .iter()
                .any(|r| self.riddles.is_solved(&r.id) || gate::is_active(&r.prerequisite, &snapshot));
        if any_gate_open {
            return Stage::Gated;
        }

        if !self.discovered.is_empty() || !self.regions.is_empty() {
            return Stage::Exploring;
        }
        Stage::Init
    }

    /// Produce a read-only projection of the whole session.
    pub fn snapshot(&self) -> Snapshot {
        let snap = self.gate_snapshot();

        let mut gated = Vec::new();
        for zone in &self.scene.ink_zones {
            gated.push(GatedStatus {
                id: zone.id.clone(),
                region: zone.region.clone(),
                activated: self.ink_active(zone),
                completed: self.revealed.contains(&zone.id),
            });
        }
        for zone in &self.scene.lens_zones {
            gated.push(GatedStatus {
                id: zone.id.clone(),
                region: zone.region.clone(),
                activated: self.lens.current == zone.lens,
                completed: self.regions.is_lit(&zone.region),
            });
        }
        for riddle in &self.scene.riddles {
            gated.push(GatedStatus {
                id: riddle.id.clone(),
                region: riddle.region.clone(),
                activated: gate::is_active(&riddle.prerequisite, &snap),
                completed: self.riddles.is_solved(&riddle.id),
            });
        }

        let challenge_open = gate::is_active(&self.scene.final_challenge.prerequisite, &snap);

        Snapshot {
            stage: self.stage(),
            discovered: self.discovered.items().clone(),
            lit_regions: self.regions.lit_regions().clone(),
            solved_riddles: self.riddles.solved_ids().clone(),
            lens: self.lens.clone(),
            gated,
            challenge_open,
            challenge_completed: self.challenge.completed,
        }
    }

    /// The in-progress hover attempt for a cluster, in observation order.
    pub fn current_attempt(&self, cluster: &str) -> Vec<String> {
        self.tracker.attempt(cluster)
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn gate_snapshot(&self) -> GateSnapshot<'_> {
        GateSnapshot {
            discovered: self.discovered.items(),
            lit_regions: self.regions.len(),
            solved_riddles: self.riddles.len(),
            lens: self.lens.current,
        }
    }

    fn ink_active(&self, zone: &InkZoneDef) -> bool {
        zone.required.is_subset(self.discovered.items())
    }

    /// Unlock every lens whose condition now holds.
    fn evaluate_lens_unlocks(&mut self) {
        let snapshot = self.gate_snapshot();
        let newly: Vec<LensKind> = self
            .scene
            .lens_unlocks
            .iter()
            .filter(|u| !self.lens.is_unlocked(u.lens) && gate::is_active(&u.prerequisite, &snapshot))
            .map(|u| u.lens)
            .collect();

        if newly.is_empty() {
            return;
        }
        for lens in newly {
            self.lens.unlock(lens);
            tracing::debug!("lens unlocked: {}", lens);
        }
        self.persist(keys::UNLOCKED_LENSES, &self.lens.unlocked);
    }

    /// Write one channel through to the store, fail-open.
    fn persist<T: Serialize>(&self, key: &str, value: &T) {
        let result = serde_json::to_string(value)
            .map_err(crate::error::ChronoscapeError::from)
            .and_then(|json| self.store.set(key, &json));
        if let Err(err) = result {
            tracing::warn!("persisting {}: {} (progress kept in memory)", key, err);
        }
    }
}

/// Load one channel from the store. Missing and malformed values both yield
/// `None`; malformed values are logged.
fn load_channel<T: DeserializeOwned, S: StateStore>(store: &S, key: &str) -> Option<T> {
    let raw = store
        .get(key)
        .fail_open_default(&format!("reading persisted key {key}"))?;
    serde_json::from_str(&raw)
        .map_err(crate::error::ChronoscapeError::from)
        .map(Some)
        .fail_open_default(&format!("parsing persisted key {key}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LensUnlock, RiddleDef};
    use crate::core::gate::{CountSource, Prerequisite};
    use crate::storage::MemoryStateStore;
    use std::sync::Arc;

    fn controller() -> ProgressionController<MemoryStateStore> {
        ProgressionController::new(SceneConfig::default(), MemoryStateStore::new())
    }

    /// Discover mercury, venus, earth in order (lights region1 on venus).
    fn discover_inner_planets<S: StateStore>(c: &mut ProgressionController<S>) {
        c.record_hover("mercury");
        c.record_hover("venus");
        c.record_hover("earth");
    }

    // ========================================================================
    // Hover and sequence
    // ========================================================================

    #[test]
    fn test_first_hover_discovers() {
        let mut c = controller();
        let outcome = c.record_hover("mercury");
        assert!(outcome.newly_discovered);
        assert!(!outcome.sequence_completed);
        assert!(outcome.region_lit.is_none());
        assert_eq!(c.stage(), Stage::Exploring);
    }

    #[test]
    fn test_in_order_pair_completes_cluster() {
        let mut c = controller();
        c.record_hover("mercury");
        let outcome = c.record_hover("venus");
        assert!(outcome.sequence_completed);
        assert_eq!(outcome.region_lit.as_deref(), Some("region1"));
    }

    #[test]
    fn test_out_of_order_hover_restarts_attempt() {
        let mut c = controller();
        c.record_hover("venus");
        // mercury is sequence 0, not venus + 1, so the attempt restarts.
        let outcome = c.record_hover("mercury");
        assert!(outcome.newly_discovered);
        assert!(!outcome.sequence_completed);
        assert_eq!(c.current_attempt("region1"), vec!["mercury"]);

        // Both zones were still discovered.
        let snapshot = c.snapshot();
        assert!(snapshot.discovered.contains("mercury"));
        assert!(snapshot.discovered.contains("venus"));
    }

    #[test]
    fn test_duplicate_hover_is_a_no_op() {
        let mut c = controller();
        c.record_hover("mercury");
        let outcome = c.record_hover("mercury");
        assert!(!outcome.newly_discovered);
        assert!(!outcome.sequence_completed);
        assert_eq!(c.current_attempt("region1"), vec!["mercury"]);
    }

    #[test]
    fn test_relighting_a_region_reports_nothing_new() {
        let mut c = controller();
        c.record_hover("mercury");
        c.record_hover("venus");

        // A second completion of the same cluster finds the region already lit.
        c.record_hover("venus");
        let outcome = c.record_hover("earth");
        assert!(outcome.sequence_completed);
        assert!(outcome.region_lit.is_none());

        let snapshot = c.snapshot();
        assert!(snapshot.lit_regions.contains_key("region1"));
        assert_eq!(snapshot.lit_regions.len(), 1);
    }

    #[test]
    fn test_unknown_zone_is_ignored() {
        let mut c = controller();
        let outcome = c.record_hover("nibiru");
        assert_eq!(outcome, HoverOutcome::default());
        assert_eq!(c.stage(), Stage::Init);
    }

    #[test]
    fn test_clusters_progress_independently() {
        let mut c = controller();
        c.record_hover("mercury");
        let outcome = c.record_hover("mars");
        assert!(outcome.newly_discovered);
        assert_eq!(c.current_attempt("region1"), vec!["mercury"]);
        assert_eq!(c.current_attempt("region2"), vec!["mars"]);
    }

    // ========================================================================
    // Ink reveals
    // ========================================================================

    #[test]
    fn test_ink_does_not_reveal_before_requirements() {
        let mut c = controller();
        c.record_hover("mercury");
        let outcome = c.record_ink_hover("ink1");
        assert!(!outcome.revealed);
        assert!(outcome.message.is_none());
    }

    #[test]
    fn test_ink_reveals_once_requirements_met() {
        let mut c = controller();
        discover_inner_planets(&mut c);

        let outcome = c.record_ink_hover("ink1");
        assert!(outcome.revealed);
        assert!(outcome.newly_revealed);
        assert_eq!(outcome.message.as_deref(), Some("The hunter watches from"));
        assert_eq!(outcome.region_lit.as_deref(), Some("region4"));
    }

    #[test]
    fn test_ink_reveal_is_one_shot() {
        let mut c = controller();
        discover_inner_planets(&mut c);
        c.record_ink_hover("ink1");

        let outcome = c.record_ink_hover("ink1");
        assert!(outcome.revealed);
        assert!(!outcome.newly_revealed);
        assert!(outcome.region_lit.is_none());
        // The message remains available on later hovers.
        assert!(outcome.message.is_some());
    }

    #[test]
    fn test_unknown_ink_zone_is_ignored() {
        let mut c = controller();
        let outcome = c.record_ink_hover("ink9");
        assert_eq!(outcome, InkOutcome::default());
    }

    // ========================================================================
    // Lens zones and lens switching
    // ========================================================================

    #[test]
    fn test_lens_zone_needs_pointer_and_lens() {
        let mut c = controller();

        // Pointer outside: covered even with the right lens.
        let outcome = c.record_lens_reveal("lens1", false);
        assert!(!outcome.uncovered);

        // Pointer inside with the default lens: lens1 uncovers.
        let outcome = c.record_lens_reveal("lens1", true);
        assert!(outcome.uncovered);
        assert_eq!(outcome.region_lit.as_deref(), Some("region6"));

        // lens2 needs the UV lens.
        let outcome = c.record_lens_reveal("lens2", true);
        assert!(!outcome.uncovered);
    }

    #[test]
    fn test_lens_zone_region_stays_lit_after_pointer_leaves() {
        let mut c = controller();
        c.record_lens_reveal("lens1", true);
        let outcome = c.record_lens_reveal("lens1", false);
        assert!(!outcome.uncovered);
        assert!(c.snapshot().lit_regions.contains_key("region6"));
    }

    #[test]
    fn test_lens_reveal_is_idempotent() {
        let mut c = controller();
        c.record_lens_reveal("lens1", true);
        let outcome = c.record_lens_reveal("lens1", true);
        assert!(outcome.uncovered);
        assert!(outcome.region_lit.is_none());
    }

    #[test]
    fn test_switch_to_locked_lens_fails() {
        let mut c = controller();
        let result = c.switch_lens(LensKind::Uv);
        assert!(result.is_err());
        assert_eq!(c.snapshot().lens.current, LensKind::Default);
    }

    #[test]
    fn test_uv_lens_unlocks_at_three_lit_regions() {
        let mut c = controller();
        // region1 via the cluster, region4 via ink1, region6 via lens1.
        discover_inner_planets(&mut c);
        c.record_ink_hover("ink1");
        assert!(!c.snapshot().lens.unlocked.contains(&LensKind::Uv));

        c.record_lens_reveal("lens1", true);
        assert!(c.snapshot().lens.unlocked.contains(&LensKind::Uv));
        assert_eq!(c.stage(), Stage::LensUnlocked);

        c.switch_lens(LensKind::Uv).unwrap();
        let outcome = c.record_lens_reveal("lens2", true);
        assert!(outcome.uncovered);
        assert_eq!(outcome.region_lit.as_deref(), Some("region7"));
    }

    // ========================================================================
    // Riddles
    // ========================================================================

    #[test]
    fn test_riddle_gated_before_prerequisite() {
        let mut c = controller();
        assert_eq!(c.submit_riddle("riddle-belt", "Rigel"), RiddleOutcome::Gated);
        assert!(c.snapshot().solved_riddles.is_empty());
    }

    #[test]
    fn test_riddle_wrong_answer_is_retryable() {
        let mut c = controller();
        discover_inner_planets(&mut c);

        assert_eq!(
            c.submit_riddle("riddle-belt", "Betelgeuse"),
            RiddleOutcome::Incorrect
        );
        assert_eq!(
            c.submit_riddle("riddle-belt", " rigel "),
            RiddleOutcome::Correct
        );
    }

    #[test]
    fn test_correct_riddle_lights_its_region() {
        let mut c = controller();
        discover_inner_planets(&mut c);
        c.submit_riddle("riddle-belt", "RIGEL");

        let snapshot = c.snapshot();
        assert!(snapshot.solved_riddles.contains("riddle-belt"));
        assert!(snapshot.lit_regions.contains_key("region8"));
    }

    #[test]
    fn test_resubmitting_a_solved_riddle_changes_nothing() {
        let mut c = controller();
        discover_inner_planets(&mut c);
        c.submit_riddle("riddle-belt", "Rigel");
        let before = c.snapshot();

        assert_eq!(c.submit_riddle("riddle-belt", "Rigel"), RiddleOutcome::Correct);
        assert_eq!(c.snapshot(), before);
    }

    #[test]
    fn test_unknown_riddle_is_gated() {
        let mut c = controller();
        assert_eq!(c.submit_riddle("riddle-void", "x"), RiddleOutcome::Gated);
    }

    #[test]
    fn test_riddle_count_can_gate_a_lens() {
        // A scene where solving one riddle unlocks UV.
        let mut scene = SceneConfig::default();
        scene.lens_unlocks = vec![LensUnlock {
            lens: LensKind::Uv,
            prerequisite: Prerequisite::CountThreshold {
                min: 1,
                of: CountSource::SolvedRiddles,
            },
        }];
        let mut c = ProgressionController::new(scene, MemoryStateStore::new());

        discover_inner_planets(&mut c);
        assert!(!c.snapshot().lens.unlocked.contains(&LensKind::Uv));
        c.submit_riddle("riddle-belt", "Rigel");
        assert!(c.snapshot().lens.unlocked.contains(&LensKind::Uv));
    }

    // ========================================================================
    // Final challenge
    // ========================================================================

    /// Drive the default scene to four lit regions.
    fn light_four_regions<S: StateStore>(c: &mut ProgressionController<S>) {
        discover_inner_planets(c); // region1
        c.record_ink_hover("ink1"); // region4
        c.record_lens_reveal("lens1", true); // region6
        c.submit_riddle("riddle-belt", "Rigel"); // region8
    }

    #[test]
    fn test_final_answer_gated_until_enough_regions() {
        let mut c = controller();
        assert_eq!(c.submit_final_answer("ORION"), FinalOutcome::Gated);

        discover_inner_planets(&mut c);
        c.record_ink_hover("ink1");
        // Only two regions lit so far.
        assert_eq!(c.submit_final_answer("ORION"), FinalOutcome::Gated);
    }

    #[test]
    fn test_final_answer_matching_is_forgiving() {
        let mut c = controller();
        light_four_regions(&mut c);
        assert_eq!(c.stage(), Stage::Challenge);

        assert_eq!(c.submit_final_answer("sirius"), FinalOutcome::Incorrect);
        assert_eq!(c.submit_final_answer("  orIon "), FinalOutcome::Correct);
        assert_eq!(c.stage(), Stage::Complete);
    }

    #[test]
    fn test_completion_latches() {
        let mut c = controller();
        light_four_regions(&mut c);
        c.submit_final_answer("orion");

        // Even a wrong submission after completion reports success.
        assert_eq!(c.submit_final_answer("sirius"), FinalOutcome::Correct);
        assert_eq!(c.stage(), Stage::Complete);
    }

    // ========================================================================
    // Stage derivation
    // ========================================================================

    #[test]
    fn test_stage_progression() {
        let mut c = controller();
        assert_eq!(c.stage(), Stage::Init);

        c.record_hover("mercury");
        assert_eq!(c.stage(), Stage::Exploring);

        c.record_hover("venus");
        c.record_hover("earth");
        // ink1 and the riddle are now answerable.
        assert_eq!(c.stage(), Stage::Gated);

        c.record_ink_hover("ink1");
        c.record_lens_reveal("lens1", true);
        assert_eq!(c.stage(), Stage::LensUnlocked);

        c.submit_riddle("riddle-belt", "Rigel");
        assert_eq!(c.stage(), Stage::Challenge);

        c.submit_final_answer("orion");
        assert_eq!(c.stage(), Stage::Complete);
    }

    #[test]
    fn test_snapshot_gated_statuses() {
        let mut c = controller();
        discover_inner_planets(&mut c);
        c.record_ink_hover("ink1");

        let snapshot = c.snapshot();
        let ink1 = snapshot.gated.iter().find(|g| g.id == "ink1").unwrap();
        assert!(ink1.activated);
        assert!(ink1.completed);

        let ink3 = snapshot.gated.iter().find(|g| g.id == "ink3").unwrap();
        assert!(!ink3.activated);
        assert!(!ink3.completed);

        let riddle = snapshot.gated.iter().find(|g| g.id == "riddle-belt").unwrap();
        assert!(riddle.activated);
        assert!(!riddle.completed);
    }

    // ========================================================================
    // Persistence and reset
    // ========================================================================

    #[test]
    fn test_progress_survives_a_restart() {
        let store = Arc::new(MemoryStateStore::new());

        let before = {
            let mut c = ProgressionController::new(SceneConfig::default(), Arc::clone(&store));
            light_four_regions(&mut c);
            c.switch_lens(LensKind::Uv).unwrap();
            c.snapshot()
        };

        let c = ProgressionController::new(SceneConfig::default(), Arc::clone(&store));
        assert_eq!(c.snapshot(), before);
        assert_eq!(c.snapshot().lens.current, LensKind::Uv);
    }

    #[test]
    fn test_malformed_channel_falls_back_to_empty() {
        let store = Arc::new(MemoryStateStore::new());
        store.set(keys::DISCOVERED_ITEMS, "not json").unwrap();
        store.set(keys::LIT_REGIONS, r#"{"region1": "garbage"}"#).unwrap();

        let c = ProgressionController::new(SceneConfig::default(), Arc::clone(&store));
        let snapshot = c.snapshot();
        assert!(snapshot.discovered.is_empty());
        assert!(snapshot.lit_regions.is_empty());
        assert_eq!(snapshot.stage, Stage::Init);
    }

    #[test]
    fn test_persisted_lens_must_still_be_unlocked() {
        let store = Arc::new(MemoryStateStore::new());
        // A current lens with no matching unlock entry is rejected.
        store.set(keys::CURRENT_LENS, "\"uv\"").unwrap();

        let c = ProgressionController::new(SceneConfig::default(), Arc::clone(&store));
        assert_eq!(c.snapshot().lens.current, LensKind::Default);
    }

    #[test]
    fn test_reset_restores_the_initial_state() {
        let store = Arc::new(MemoryStateStore::new());
        let fresh = ProgressionController::new(SceneConfig::default(), Arc::clone(&store))
            .snapshot();

        let mut c = ProgressionController::new(SceneConfig::default(), Arc::clone(&store));
        light_four_regions(&mut c);
        c.submit_final_answer("orion");
        assert_ne!(c.snapshot(), fresh);

        c.reset_all();
        assert_eq!(c.snapshot(), fresh);
        assert_eq!(c.stage(), Stage::Init);

        // The store holds nothing either, so a restart starts clean.
        for key in keys::ALL {
            assert!(store.get(key).unwrap().is_none());
        }
    }

    #[test]
    fn test_reset_discards_sequence_attempts() {
        let mut c = controller();
        c.record_hover("mercury");
        c.reset_all();
        assert!(c.current_attempt("region1").is_empty());

        // A fresh in-order run works immediately after reset.
        c.record_hover("mercury");
        let outcome = c.record_hover("venus");
        assert!(outcome.sequence_completed);
    }

    #[test]
    fn test_full_session_walkthrough() {
        // One end-to-end pass over the default scene, outer planets included.
        let mut c = controller();

        discover_inner_planets(&mut c);
        c.record_hover("saturn");
        assert!(c.record_ink_hover("ink1").revealed);
        // ink2 still needs mars and jupiter.
        assert!(!c.record_ink_hover("ink2").revealed);

        c.record_hover("mars");
        c.record_hover("jupiter");
        assert!(c.snapshot().lit_regions.contains_key("region2"));
        assert!(c.record_ink_hover("ink2").revealed);
        // ink3 needs every planet.
        assert!(!c.record_ink_hover("ink3").revealed);

        c.record_hover("uranus");
        c.record_hover("neptune");
        c.record_hover("pluto");
        assert!(c.record_ink_hover("ink3").revealed);

        c.record_lens_reveal("lens1", true);
        c.switch_lens(LensKind::Uv).unwrap();
        c.record_lens_reveal("lens2", true);
        c.submit_riddle("riddle-belt", "Rigel");

        assert_eq!(c.submit_final_answer("Orion"), FinalOutcome::Correct);
        assert_eq!(c.stage(), Stage::Complete);

        let snapshot = c.snapshot();
        assert_eq!(snapshot.discovered.len(), 9);
        assert!(snapshot.challenge_open);
        assert!(snapshot.challenge_completed);
    }

    #[test]
    fn test_restored_state_reevaluates_unlock_conditions() {
        // A scene whose unlock threshold drops between runs: the restored
        // session must honor the new condition immediately.
        let store = Arc::new(MemoryStateStore::new());
        {
            let mut scene = SceneConfig::default();
            scene.lens_unlocks = vec![LensUnlock {
                lens: LensKind::Uv,
                prerequisite: Prerequisite::CountThreshold {
                    min: 10,
                    of: CountSource::LitRegions,
                },
            }];
            let mut c = ProgressionController::new(scene, Arc::clone(&store));
            light_four_regions(&mut c);
            assert!(!c.snapshot().lens.unlocked.contains(&LensKind::Uv));
        }

        // The default threshold of three is already satisfied on load.
        let c = ProgressionController::new(SceneConfig::default(), Arc::clone(&store));
        assert!(c.snapshot().lens.unlocked.contains(&LensKind::Uv));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        const ZONES: [&str; 9] = [
            "mercury", "venus", "earth", "mars", "jupiter", "saturn", "uranus", "neptune",
            "pluto",
        ];
        const INKS: [&str; 3] = ["ink1", "ink2", "ink3"];
        const LENS_ZONES: [&str; 2] = ["lens1", "lens2"];

        fn arb_events() -> impl Strategy<Value = Vec<(u8, u8, bool)>> {
            prop::collection::vec((0u8..3, 0u8..9, any::<bool>()), 0..60)
        }

        proptest! {
            // Property: discoveries and lit regions only grow, whatever the
            // interleaving of pointer events.
            #[test]
            fn prop_progress_is_monotone(events in arb_events()) {
                let mut c = ProgressionController::new(
                    SceneConfig::default(),
                    MemoryStateStore::new(),
                );
                let mut discovered = 0;
                let mut lit = 0;
                for (kind, index, over) in events {
                    match kind {
                        0 => {
                            c.record_hover(ZONES[index as usize]);
                        }
                        1 => {
                            c.record_ink_hover(INKS[index as usize % INKS.len()]);
                        }
                        _ => {
                            c.record_lens_reveal(
                                LENS_ZONES[index as usize % LENS_ZONES.len()],
                                over,
                            );
                        }
                    }
                    let snapshot = c.snapshot();
                    prop_assert!(snapshot.discovered.len() >= discovered);
                    prop_assert!(snapshot.lit_regions.len() >= lit);
                    discovered = snapshot.discovered.len();
                    lit = snapshot.lit_regions.len();
                }
            }
        }
    }

    #[test]
    fn test_custom_riddle_scene() {
        let mut scene = SceneConfig::default();
        scene.riddles.push(RiddleDef {
            id: "riddle-nebula".to_string(),
            region: "region2".to_string(),
            prompt: "Closest star".to_string(),
            answer: "Proxima".to_string(),
            prerequisite: Prerequisite::CountThreshold {
                min: 1,
                of: CountSource::SolvedRiddles,
            },
        });
        let mut c = ProgressionController::new(scene, MemoryStateStore::new());
        discover_inner_planets(&mut c);

        // Chained riddles: the second opens only after the first is solved.
        assert_eq!(c.submit_riddle("riddle-nebula", "Proxima"), RiddleOutcome::Gated);
        c.submit_riddle("riddle-belt", "Rigel");
        assert_eq!(
            c.submit_riddle("riddle-nebula", "proxima"),
            RiddleOutcome::Correct
        );
    }
}

//! Scene configuration for Chronoscape.
//!
//! A scene is the static, read-only description of one puzzle: the regions,
//! hover zones, gated content, lens unlock conditions, and the final
//! challenge. The progression core never mutates it.
//!
//! Scenes load with a precedence chain:
//! 1. `CHRONOSCAPE_SCENE` (explicit file path, highest priority)
//! 2. Project scene (`.chronoscape/scene.toml` in cwd)
//! 3. User scene (`~/.chronoscape/scene.toml`)
//! 4. The built-in default scene (lowest priority)
//!
//! Unlike layered settings, a scene is one coherent unit, so the first file
//! found wins outright rather than merging. Numeric thresholds are
//! configuration, not invariants; `CHRONOSCAPE_SEQUENCE_LENGTH` overrides
//! the sequence length for any scene.

use std::collections::BTreeSet;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::gate::{CountSource, Prerequisite};
use crate::core::lens::LensKind;
use crate::error::{ChronoscapeError, Result};

/// Minimum valid sequence length (a cluster must need at least one hover).
pub const MIN_SEQUENCE_LENGTH: usize = 1;

/// The Chronoscape home directory (`~/.chronoscape`, or `$CHRONOSCAPE_HOME`).
pub fn chronoscape_home() -> Option<PathBuf> {
    if let Ok(home) = env::var("CHRONOSCAPE_HOME") {
        return Some(PathBuf::from(home));
    }
    dirs::home_dir().map(|h| h.join(".chronoscape"))
}

/// Default path for persisted session progress.
pub fn progress_path() -> Option<PathBuf> {
    chronoscape_home().map(|h| h.join("progress.json"))
}

/// A scene area that lights up permanently once its unlock condition fires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionDef {
    /// Region identifier.
    pub id: String,
}

/// A hover zone: one discovery item with an ordering index within a cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoverZoneDef {
    /// Zone (and discovery item) identifier.
    pub id: String,
    /// Region lit when the zone's cluster completes.
    pub region: String,
    /// Cluster key. Defaults to the owning region.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster: Option<String>,
    /// Position in the cluster's required hover order.
    pub sequence: u32,
}

impl HoverZoneDef {
    /// The cluster this zone belongs to.
    pub fn cluster_key(&self) -> &str {
        self.cluster.as_deref().unwrap_or(&self.region)
    }
}

/// An ink reveal: hidden text that appears once the required discoveries
/// have all been made, and reveals exactly once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InkZoneDef {
    /// Content identifier.
    pub id: String,
    /// Region lit on first reveal.
    pub region: String,
    /// The revealed message.
    pub message: String,
    /// Discovery ids that must all be present before the ink responds.
    pub required: BTreeSet<String>,
}

/// A zone only the right lens can reveal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LensZoneDef {
    /// Content identifier.
    pub id: String,
    /// Region lit while the zone is uncovered.
    pub region: String,
    /// Lens that must be equipped.
    pub lens: LensKind,
    /// The uncovered message.
    pub message: String,
}

/// A gated riddle with an expected answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiddleDef {
    /// Riddle identifier.
    pub id: String,
    /// Region lit when the riddle is solved.
    pub region: String,
    /// The riddle text.
    pub prompt: String,
    /// Expected answer (matched trimmed, case-insensitively).
    pub answer: String,
    /// Prerequisite before submissions are accepted.
    pub prerequisite: Prerequisite,
}

/// Condition under which a lens becomes available.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LensUnlock {
    /// Lens to unlock.
    pub lens: LensKind,
    /// Condition that triggers the unlock.
    pub prerequisite: Prerequisite,
}

/// The closing text challenge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinalChallengeConfig {
    /// Expected answer (matched trimmed, case-insensitively).
    pub answer: String,
    /// Condition before submissions are accepted.
    pub prerequisite: Prerequisite,
}

impl Default for FinalChallengeConfig {
    fn default() -> Self {
        Self {
            answer: "ORION".to_string(),
            prerequisite: Prerequisite::CountThreshold {
                min: 4,
                of: CountSource::LitRegions,
            },
        }
    }
}

fn default_sequence_length() -> usize {
    2
}

/// Complete static description of one puzzle scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// In-order hovers needed to complete a cluster.
    ///
    /// Declared before the table-valued fields so the scene serializes as
    /// valid TOML.
    #[serde(default = "default_sequence_length")]
    pub sequence_length: usize,
    /// All regions in the scene.
    pub regions: Vec<RegionDef>,
    /// Ordered hover zones.
    pub hover_zones: Vec<HoverZoneDef>,
    /// Ink reveals with subset prerequisites.
    pub ink_zones: Vec<InkZoneDef>,
    /// Lens-only zones.
    pub lens_zones: Vec<LensZoneDef>,
    /// Gated riddles.
    pub riddles: Vec<RiddleDef>,
    /// Lens unlock conditions.
    pub lens_unlocks: Vec<LensUnlock>,
    /// The closing challenge.
    pub final_challenge: FinalChallengeConfig,
}

impl Default for SceneConfig {
    /// The built-in Chronoscape scene: nine planets across two clusters,
    /// three ink reveals, two lens zones, one riddle, a UV lens unlocked at
    /// three lit regions, and "ORION" as the closing answer.
    fn default() -> Self {
        let planets = [
            ("mercury", "region1", 0),
            ("venus", "region1", 1),
            ("earth", "region1", 2),
            ("mars", "region2", 3),
            ("jupiter", "region2", 4),
            ("saturn", "region1", 5),
            ("uranus", "region2", 6),
            ("neptune", "region2", 7),
            ("pluto", "region2", 8),
        ];

        let ids = |names: &[&str]| -> BTreeSet<String> {
            names.iter().map(|s| s.to_string()).collect()
        };

        Self {
            regions: (1..=8)
                .map(|n| RegionDef {
                    id: format!("region{n}"),
                })
                .collect(),
            hover_zones: planets
                .into_iter()
                .map(|(id, region, sequence)| HoverZoneDef {
                    id: id.to_string(),
                    region: region.to_string(),
                    cluster: None,
                    sequence,
                })
                .collect(),
            ink_zones: vec![
                InkZoneDef {
                    id: "ink1".to_string(),
                    region: "region4".to_string(),
                    message: "The hunter watches from".to_string(),
                    required: ids(&["mercury", "venus", "earth"]),
                },
                InkZoneDef {
                    id: "ink2".to_string(),
                    region: "region5".to_string(),
                    message: "Belt of three stars".to_string(),
                    required: ids(&[
                        "mercury", "venus", "earth", "mars", "jupiter", "saturn",
                    ]),
                },
                InkZoneDef {
                    id: "ink3".to_string(),
                    region: "region3".to_string(),
                    message: "Ancient".to_string(),
                    required: ids(&[
                        "mercury", "venus", "earth", "mars", "jupiter", "saturn", "uranus",
                        "neptune", "pluto",
                    ]),
                },
            ],
            lens_zones: vec![
                LensZoneDef {
                    id: "lens1".to_string(),
                    region: "region6".to_string(),
                    lens: LensKind::Default,
                    message: "Ancient constellation...".to_string(),
                },
                LensZoneDef {
                    id: "lens2".to_string(),
                    region: "region7".to_string(),
                    lens: LensKind::Uv,
                    message: "Named after the mythical hunter".to_string(),
                },
            ],
            riddles: vec![RiddleDef {
                id: "riddle-belt".to_string(),
                region: "region8".to_string(),
                prompt: "The brightest star in the hunter's foot".to_string(),
                answer: "Rigel".to_string(),
                prerequisite: Prerequisite::Subset {
                    required: ids(&["mercury", "venus", "earth"]),
                },
            }],
            lens_unlocks: vec![LensUnlock {
                lens: LensKind::Uv,
                prerequisite: Prerequisite::CountThreshold {
                    min: 3,
                    of: CountSource::LitRegions,
                },
            }],
            final_challenge: FinalChallengeConfig::default(),
            sequence_length: default_sequence_length(),
        }
    }
}

impl SceneConfig {
    /// Load a scene with the full precedence chain.
    pub fn load() -> Self {
        match env::current_dir() {
            Ok(cwd) => Self::load_from_cwd(&cwd),
            Err(_) => {
                let mut scene = Self::load_first_available(None);
                scene.apply_env_overrides();
                scene
            }
        }
    }

    /// Load a scene for a specific working directory.
    pub fn load_from_cwd(cwd: &Path) -> Self {
        let mut scene = Self::load_first_available(Some(cwd));
        scene.apply_env_overrides();
        scene
    }

    /// First scene found along the precedence chain, or the default scene.
    fn load_first_available(cwd: Option<&Path>) -> Self {
        if let Ok(path) = env::var("CHRONOSCAPE_SCENE") {
            match Self::load_from_file(Path::new(&path)) {
                Ok(scene) => return scene,
                Err(err) => {
                    tracing::warn!("ignoring CHRONOSCAPE_SCENE {}: {}", path, err);
                }
            }
        }

        if let Some(cwd) = cwd {
            let project = cwd.join(".chronoscape").join("scene.toml");
            if let Ok(scene) = Self::load_from_file(&project) {
                return scene;
            }
        }

        if let Some(home) = chronoscape_home() {
            let user = home.join("scene.toml");
            if let Ok(scene) = Self::load_from_file(&user) {
                return scene;
            }
        }

        Self::default()
    }

    /// Load and validate a scene from a TOML file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| ChronoscapeError::storage(path, e))?;
        let scene: SceneConfig =
            toml::from_str(&content).map_err(|e| ChronoscapeError::config(e.to_string()))?;
        scene.validate()?;
        Ok(scene)
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = env::var("CHRONOSCAPE_SEQUENCE_LENGTH") {
            match val.parse::<usize>() {
                Ok(n) if n >= MIN_SEQUENCE_LENGTH => self.sequence_length = n,
                Ok(n) => eprintln!(
                    "Warning: Invalid CHRONOSCAPE_SEQUENCE_LENGTH value '{}'. \
                    Must be >= {}. Using '{}'.",
                    n, MIN_SEQUENCE_LENGTH, self.sequence_length
                ),
                Err(_) => eprintln!(
                    "Warning: Invalid CHRONOSCAPE_SEQUENCE_LENGTH value '{}'. \
                    Expected a positive integer. Using '{}'.",
                    val, self.sequence_length
                ),
            }
        }
    }

    /// Check internal consistency: unique ids, known region references, and
    /// a workable sequence length.
    pub fn validate(&self) -> Result<()> {
        if self.sequence_length < MIN_SEQUENCE_LENGTH {
            return Err(ChronoscapeError::config(format!(
                "sequence_length must be >= {MIN_SEQUENCE_LENGTH}"
            )));
        }

        let regions: BTreeSet<&str> = self.regions.iter().map(|r| r.id.as_str()).collect();
        if regions.len() != self.regions.len() {
            return Err(ChronoscapeError::config("duplicate region id"));
        }

        let mut content_ids = BTreeSet::new();
        let mut check = |id: &str, region: &str| -> Result<()> {
            if !content_ids.insert(id.to_string()) {
                return Err(ChronoscapeError::config(format!("duplicate content id: {id}")));
            }
            if !regions.contains(region) {
                return Err(ChronoscapeError::config(format!(
                    "{id} references unknown region: {region}"
                )));
            }
            Ok(())
        };

        for zone in &self.hover_zones {
            check(&zone.id, &zone.region)?;
        }
        for zone in &self.ink_zones {
            check(&zone.id, &zone.region)?;
        }
        for zone in &self.lens_zones {
            check(&zone.id, &zone.region)?;
        }
        for riddle in &self.riddles {
            check(&riddle.id, &riddle.region)?;
        }

        Ok(())
    }

    /// Look up a hover zone by id.
    pub fn hover_zone(&self, id: &str) -> Option<&HoverZoneDef> {
        self.hover_zones.iter().find(|z| z.id == id)
    }

    /// Look up an ink zone by id.
    pub fn ink_zone(&self, id: &str) -> Option<&InkZoneDef> {
        self.ink_zones.iter().find(|z| z.id == id)
    }

    /// Look up a lens zone by id.
    pub fn lens_zone(&self, id: &str) -> Option<&LensZoneDef> {
        self.lens_zones.iter().find(|z| z.id == id)
    }

    /// Look up a riddle by id.
    pub fn riddle(&self, id: &str) -> Option<&RiddleDef> {
        self.riddles.iter().find(|r| r.id == id)
    }
}

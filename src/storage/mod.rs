//! Progress persistence for Chronoscape.
//!
//! The controller persists each monotonic state channel under its own key.
//! Two backends implement the [`StateStore`] trait: an in-memory store for
//! tests and a single-file JSON store for the CLI.

pub mod file;
pub mod memory;
pub mod traits;

pub use file::FileStateStore;
pub use memory::MemoryStateStore;
pub use traits::StateStore;

/// Persistence keys, one per state channel.
pub mod keys {
    /// Hover-discovered item ids (JSON array).
    pub const DISCOVERED_ITEMS: &str = "discovered-items";
    /// Lit regions with first-lit timestamps (JSON object).
    pub const LIT_REGIONS: &str = "lit-regions";
    /// Solved riddle ids (JSON array).
    pub const SOLVED_RIDDLES: &str = "solved-riddles";
    /// Unlocked lens kinds (JSON array).
    pub const UNLOCKED_LENSES: &str = "unlocked-lenses";
    /// Currently equipped lens (JSON string).
    pub const CURRENT_LENS: &str = "current-lens";
    /// Ids of one-shot content already revealed (JSON array).
    pub const REVEALED_CONTENT: &str = "revealed-content";
    /// Final challenge latch (JSON bool).
    pub const FINAL_COMPLETED: &str = "final-completed";

    /// Every key the controller persists, for full resets.
    pub const ALL: &[&str] = &[
        DISCOVERED_ITEMS,
        LIT_REGIONS,
        SOLVED_RIDDLES,
        UNLOCKED_LENSES,
        CURRENT_LENS,
        REVEALED_CONTENT,
        FINAL_COMPLETED,
    ];
}

//! CLI commands for Chronoscape.
//!
//! This module provides CLI commands for driving a session, organized into:
//! - **Event commands**: hover, ink, reveal, lens (pointer and lens input)
//! - **Challenge commands**: riddle, answer (text submissions)
//! - **Session commands**: status, reset

// Event commands
pub mod hover;
pub mod ink;
pub mod lens_cmd;
pub mod reveal;

// Challenge commands
pub mod answer;
pub mod riddle_cmd;

// Session commands
pub mod reset;
pub mod status;

pub use answer::AnswerCommand;
pub use hover::HoverCommand;
pub use ink::InkCommand;
pub use lens_cmd::LensCommand;
pub use reset::ResetCommand;
pub use reveal::{RevealCommand, RevealOptions};
pub use riddle_cmd::RiddleCommand;
pub use status::StatusCommand;

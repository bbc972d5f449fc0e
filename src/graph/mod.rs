//! Prerequisite graph engine: cycle detection, dependency editing, and
//! dependent-aware course deletion.

pub mod cycle;
pub mod deletion;
pub mod editor;

pub use cycle::would_create_cycle;
pub use deletion::{delete_course, DeletionOutcome};
pub use editor::set_prerequisites;

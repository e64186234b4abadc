//! Input/Output for simulation runs
//!
//! Logging setup and frame emission for external plotting.

mod frame;
mod output;

pub use frame::{write_frame, Circle, Marked, Renderable};
pub use output::setup_output;

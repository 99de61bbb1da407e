//! Orchestrator - command replay loop
//!
//! See `engine.rs` for full implementation.

pub mod engine;

// Re-export main types for convenience
pub use engine::{Orchestrator, SimulationConfig, SimulationError, StepResult};

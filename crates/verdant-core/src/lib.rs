//! Core session engine for verdant
//!
//! This crate owns the tracker's behavior:
//! - Session state for the active identity (transactions, goal, points)
//! - Synthetic transaction generation from the merchant catalog
//! - Derived metrics, recomputed from state on every read
//! - The goal/points machine driven by ingestion
//!
//! State is only mutated through [`SessionEngine`]; everything a renderer
//! shows is a pure function over the state it holds.

mod engine;
mod events;
mod generator;
mod metrics;
mod session;

pub use engine::*;
pub use events::*;
pub use generator::*;
pub use metrics::*;
pub use session::*;

use thiserror::Error;
use verdant_api::MAX_WEEKLY_GOAL_KG;

/// User-facing validation failures. State is untouched when one is returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("Invalid goal {value} kg: must be above 0 and at most {max} kg CO₂", max = MAX_WEEKLY_GOAL_KG)]
    InvalidGoal { value: f64 },

    #[error("Reward already claimed: {0}")]
    RewardAlreadyClaimed(String),
}

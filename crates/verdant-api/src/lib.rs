//! Shared types for the verdant engine
//!
//! This crate defines the stable surface between the session engine and the
//! layers that drive or render it:
//! - Domain model (transactions, impact levels, categories, goal status)
//! - Derived view models (weekly progress, breakdowns, achievements)

mod types;
mod views;

pub use types::*;
pub use views::*;

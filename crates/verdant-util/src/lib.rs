//! Shared utilities for verdant
//!
//! This crate provides:
//! - ID types (TxnId, IdentityKey)
//! - Time utilities (wall clock, display formatting)
//! - Default paths for the data directory

mod ids;
mod paths;
mod time;

pub use ids::*;
pub use paths::*;
pub use time::*;

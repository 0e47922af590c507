//! Store trait definitions

use serde::{Deserialize, Serialize};
use verdant_api::{GoalStatus, Transaction, DEFAULT_WEEKLY_GOAL_KG};
use verdant_util::IdentityKey;

use crate::StoreResult;

/// Per-identity persistence for session snapshots.
///
/// `save` writes the snapshot and its regenerated combined export in one
/// step, so the cached export can never describe a different state than the
/// stored snapshot.
pub trait ProfileStore: Send + Sync {
    // Snapshot slot

    /// Load the last saved snapshot for an identity, if any
    fn load(&self, identity: &IdentityKey) -> StoreResult<Option<SessionSnapshot>>;

    /// Save a snapshot and its combined export for an identity
    fn save(
        &self,
        identity: &IdentityKey,
        snapshot: &SessionSnapshot,
        export_csv: &str,
    ) -> StoreResult<()>;

    /// Remove the durable slot for an identity
    fn delete(&self, identity: &IdentityKey) -> StoreResult<()>;

    // Cached export

    /// Get the combined export written by the last `save`
    fn cached_export(&self, identity: &IdentityKey) -> StoreResult<Option<String>>;

    // Health

    /// Check if the store is healthy
    fn is_healthy(&self) -> bool;
}

/// Durable form of a session, one slot per identity.
///
/// Field names are the persisted JSON contract. Fields absent from a stored
/// document fall back to the fresh-session defaults, so older snapshots keep
/// loading as the schema grows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionSnapshot {
    /// Retained transactions, newest first
    pub all_transactions: Vec<Transaction>,

    /// Weekly carbon goal in kg CO₂
    pub weekly_goal: f64,

    /// Green Point balance
    pub green_points: u32,

    /// Goal machine state for the current period
    pub goal_status: GoalStatus,

    /// Transactions counted toward the current goal period
    pub transaction_count: u32,

    /// IDs of rewards claimed so far, sorted
    pub claimed_rewards: Vec<String>,
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self {
            all_transactions: Vec::new(),
            weekly_goal: DEFAULT_WEEKLY_GOAL_KG,
            green_points: 0,
            goal_status: GoalStatus::Active,
            transaction_count: 0,
            claimed_rewards: Vec::new(),
        }
    }
}

impl SessionSnapshot {
    /// Sum of carbon over all retained transactions, in kg CO₂.
    pub fn total_carbon_kg(&self) -> f64 {
        self.all_transactions.iter().map(|t| t.carbon_kg).sum()
    }

    /// Sum of spend over all retained transactions, in whole currency units.
    pub fn total_spend(&self) -> i64 {
        self.all_transactions.iter().map(|t| t.amount).sum()
    }
}

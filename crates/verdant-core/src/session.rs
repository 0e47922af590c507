//! Session state: the authoritative record for the active identity

use std::collections::BTreeSet;

use verdant_api::{GoalStatus, Transaction, DEFAULT_WEEKLY_GOAL_KG};
use verdant_store::SessionSnapshot;

/// In-memory state for one logged-in identity.
///
/// Mutated only through [`crate::SessionEngine`]; every derived view is a
/// pure function over this struct.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    /// Retained transactions, newest first
    pub transactions: Vec<Transaction>,

    /// Weekly carbon budget in kg CO₂, in (0, 100]
    pub weekly_goal_kg: f64,

    /// Green Point balance; never goes negative
    pub green_points: u32,

    /// Goal machine state for the current period
    pub goal_status: GoalStatus,

    /// Transactions counted toward the current goal period. Never
    /// decremented, and distinct from `transactions.len()` once data is
    /// cleared selectively.
    pub transaction_count: u32,

    /// IDs of rewards claimed so far
    pub claimed_rewards: BTreeSet<String>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            transactions: Vec::new(),
            weekly_goal_kg: DEFAULT_WEEKLY_GOAL_KG,
            green_points: 0,
            goal_status: GoalStatus::Active,
            transaction_count: 0,
            claimed_rewards: BTreeSet::new(),
        }
    }
}

impl SessionState {
    /// Rebuild state from a durable snapshot.
    pub fn from_snapshot(snapshot: SessionSnapshot) -> Self {
        Self {
            transactions: snapshot.all_transactions,
            weekly_goal_kg: snapshot.weekly_goal,
            green_points: snapshot.green_points,
            goal_status: snapshot.goal_status,
            transaction_count: snapshot.transaction_count,
            claimed_rewards: snapshot.claimed_rewards.into_iter().collect(),
        }
    }

    /// Durable form of this state.
    pub fn to_snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            all_transactions: self.transactions.clone(),
            weekly_goal: self.weekly_goal_kg,
            green_points: self.green_points,
            goal_status: self.goal_status,
            transaction_count: self.transaction_count,
            claimed_rewards: self.claimed_rewards.iter().cloned().collect(),
        }
    }

    /// Sum of carbon over all retained transactions, in kg CO₂.
    pub fn total_carbon_kg(&self) -> f64 {
        self.transactions.iter().map(|t| t.carbon_kg).sum()
    }

    /// Sum of spend over all retained transactions.
    pub fn total_spend(&self) -> i64 {
        self.transactions.iter().map(|t| t.amount).sum()
    }

    /// Apply a signed point delta, clamping the balance at zero. Returns the
    /// new balance.
    pub(crate) fn apply_points(&mut self, delta: i64) -> u32 {
        let next = i64::from(self.green_points) + delta;
        self.green_points = next.max(0) as u32;
        self.green_points
    }
}

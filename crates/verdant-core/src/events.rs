//! Change descriptions returned by engine mutations

use verdant_api::Transaction;

/// Goal machine transition observed during a single ingestion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoalTransition {
    /// Weekly total reached the goal; the period is now failed
    Failed,

    /// Goal met with enough activity; the success bonus was credited
    Achieved {
        bonus_points: u32,
    },
}

/// Outcome of ingesting one transaction
#[derive(Debug, Clone)]
pub struct IngestReceipt {
    /// The transaction as recorded, id and timestamp included
    pub transaction: Transaction,

    /// Signed point delta for this transaction, before clamping
    pub points_delta: i64,

    /// Point balance after the delta and any bonus
    pub green_points: u32,

    /// Goal transition triggered by this ingestion, if any
    pub transition: Option<GoalTransition>,
}

/// Outcome of a successful goal edit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GoalChange {
    pub previous_kg: f64,
    pub new_kg: f64,

    /// True when the edit moved a settled period back to active
    pub rearmed: bool,
}

/// Outcome of claiming a reward
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewardClaim {
    pub reward_id: String,

    /// Rewards claimed so far, this one included
    pub total_claimed: usize,
}

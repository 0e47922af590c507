//! Session engine

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, info, warn};
use verdant_api::{Dashboard, GoalStatus, ImpactLevel, Profile, Transaction, MAX_WEEKLY_GOAL_KG};
use verdant_config::Catalog;
use verdant_store::{combined_csv, split_csv, ProfileStore, SplitExport, StoreResult};

use crate::metrics;
use crate::session::SessionState;
use crate::{EngineError, GoalChange, GoalTransition, IngestReceipt, RewardClaim};

/// Points credited once when a goal period settles as achieved
pub const GOAL_BONUS_POINTS: u32 = 50;

/// Counted transactions required before a period can settle as achieved
pub const GOAL_SUCCESS_MIN_TRANSACTIONS: u32 = 3;

/// The session engine: owns the state for one identity and applies every
/// mutation to it.
///
/// Mutations persist best-effort after each change; storage failures are
/// logged and the in-memory state stays authoritative.
pub struct SessionEngine {
    profile: Profile,
    catalog: Catalog,
    store: Arc<dyn ProfileStore>,
    state: SessionState,
}

impl SessionEngine {
    /// Open a session for a profile, restoring durable state when present.
    ///
    /// An unreadable snapshot is never fatal: the session starts fresh and
    /// the problem is logged.
    pub fn open(profile: Profile, catalog: Catalog, store: Arc<dyn ProfileStore>) -> Self {
        let state = match store.load(&profile.username) {
            Ok(Some(snapshot)) => {
                info!(
                    identity = %profile.username,
                    transactions = snapshot.all_transactions.len(),
                    green_points = snapshot.green_points,
                    "Session restored"
                );
                SessionState::from_snapshot(snapshot)
            }
            Ok(None) => {
                info!(identity = %profile.username, "Fresh session");
                SessionState::default()
            }
            Err(error) => {
                warn!(
                    identity = %profile.username,
                    %error,
                    "Stored session unreadable, starting fresh"
                );
                SessionState::default()
            }
        };

        Self { profile, catalog, store, state }
    }

    /// Record one transaction.
    ///
    /// Prepends it, bumps the period counter, runs the goal machine, applies
    /// the point delta, and persists. The fail check runs before points are
    /// applied and the success check after, both only from `active`.
    pub fn ingest(&mut self, transaction: Transaction) -> IngestReceipt {
        self.state.transactions.insert(0, transaction.clone());
        self.state.transaction_count += 1;

        let mut transition = None;

        if self.state.goal_status == GoalStatus::Active
            && self.state.total_carbon_kg() >= self.state.weekly_goal_kg
        {
            self.state.goal_status = GoalStatus::Failed;
            transition = Some(GoalTransition::Failed);
            info!(
                identity = %self.profile.username,
                total_kg = self.state.total_carbon_kg(),
                goal_kg = self.state.weekly_goal_kg,
                "Weekly goal failed"
            );
        }

        let points_delta = transaction.points_delta();
        self.state.apply_points(points_delta);

        if self.state.goal_status == GoalStatus::Active
            && self.state.total_carbon_kg() < self.state.weekly_goal_kg
            && self.state.transaction_count >= GOAL_SUCCESS_MIN_TRANSACTIONS
        {
            self.state.goal_status = GoalStatus::Success;
            self.state.apply_points(i64::from(GOAL_BONUS_POINTS));
            transition = Some(GoalTransition::Achieved { bonus_points: GOAL_BONUS_POINTS });
            info!(
                identity = %self.profile.username,
                green_points = self.state.green_points,
                "Weekly goal achieved"
            );
        }

        debug!(
            id = %transaction.id,
            merchant = %transaction.merchant_name,
            amount = transaction.amount,
            carbon_kg = transaction.carbon_kg,
            points_delta,
            "Transaction recorded"
        );

        self.persist();

        IngestReceipt {
            transaction,
            points_delta,
            green_points: self.state.green_points,
            transition,
        }
    }

    /// Change the weekly goal.
    ///
    /// The value must be finite, above zero, and at most
    /// [`MAX_WEEKLY_GOAL_KG`]. A rejected edit leaves the state untouched; an
    /// accepted one re-arms a settled period back to `active`.
    pub fn set_goal(&mut self, goal_kg: f64) -> Result<GoalChange, EngineError> {
        if !goal_kg.is_finite() || goal_kg <= 0.0 || goal_kg > MAX_WEEKLY_GOAL_KG {
            return Err(EngineError::InvalidGoal { value: goal_kg });
        }

        let previous_kg = self.state.weekly_goal_kg;
        let rearmed = self.state.goal_status != GoalStatus::Active;
        self.state.weekly_goal_kg = goal_kg;
        self.state.goal_status = GoalStatus::Active;

        info!(
            identity = %self.profile.username,
            previous_kg,
            new_kg = goal_kg,
            rearmed,
            "Weekly goal updated"
        );

        self.persist();

        Ok(GoalChange { previous_kg, new_kg: goal_kg, rearmed })
    }

    /// Claim a reward by id. A repeated claim is rejected and changes
    /// nothing.
    pub fn claim_reward(&mut self, reward_id: &str) -> Result<RewardClaim, EngineError> {
        if !self.state.claimed_rewards.insert(reward_id.to_string()) {
            return Err(EngineError::RewardAlreadyClaimed(reward_id.to_string()));
        }

        info!(identity = %self.profile.username, reward_id, "Reward claimed");

        self.persist();

        Ok(RewardClaim {
            reward_id: reward_id.to_string(),
            total_claimed: self.state.claimed_rewards.len(),
        })
    }

    /// Reset the session to a fresh state and remove the durable slot.
    ///
    /// Deliberately does not persist afterwards; a save here would recreate
    /// the slot that was just deleted.
    pub fn clear_data(&mut self) {
        self.state = SessionState::default();

        if let Err(error) = self.store.delete(&self.profile.username) {
            warn!(
                identity = %self.profile.username,
                %error,
                "Failed to remove durable session"
            );
        }

        info!(identity = %self.profile.username, "Session data cleared");
    }

    /// Close the session with a final save.
    pub fn logout(self) {
        self.persist();
        info!(identity = %self.profile.username, "Session closed");
    }

    // Read side

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Every derived view, recomputed for one read.
    pub fn dashboard(&self, today: NaiveDate) -> Dashboard {
        metrics::dashboard(&self.state, today)
    }

    /// Retained transactions, optionally narrowed to one impact level.
    pub fn transactions_by_impact(&self, impact: Option<ImpactLevel>) -> Vec<&Transaction> {
        metrics::transactions_by_impact(&self.state, impact)
    }

    /// Render the combined single-file export for the current state.
    pub fn export_combined(&self) -> StoreResult<String> {
        combined_csv(&self.profile, &self.state.to_snapshot(), verdant_util::now())
    }

    /// Render the split export pair for the current state.
    pub fn export_split(&self) -> StoreResult<SplitExport> {
        split_csv(&self.profile, &self.state.to_snapshot(), verdant_util::now())
    }

    /// Write the current state through to the store, keeping the cached
    /// export in step. Failures are logged, never surfaced.
    fn persist(&self) {
        let snapshot = self.state.to_snapshot();
        let export = match combined_csv(&self.profile, &snapshot, verdant_util::now()) {
            Ok(csv) => csv,
            Err(error) => {
                warn!(identity = %self.profile.username, %error, "Failed to render export");
                return;
            }
        };

        if let Err(error) = self.store.save(&self.profile.username, &snapshot, &export) {
            warn!(
                identity = %self.profile.username,
                %error,
                "Failed to persist session, in-memory state remains authoritative"
            );
        }
    }
}

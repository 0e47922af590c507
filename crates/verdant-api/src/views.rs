//! Derived view models
//!
//! Everything here is a pure projection over session state: any value can be
//! rebuilt from scratch by folding over the retained transactions. Nothing is
//! persisted.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{CategoryBucket, GoalStatus};

/// Badge tier shown on the weekly summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalBadge {
    OnTrack,
    AlmostThere,
    OverGoal,
}

impl GoalBadge {
    pub fn label(self) -> &'static str {
        match self {
            GoalBadge::OnTrack => "On Track",
            GoalBadge::AlmostThere => "Almost There!",
            GoalBadge::OverGoal => "Over Goal",
        }
    }
}

/// Progress against the weekly carbon goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyProgress {
    pub total_kg: f64,
    pub goal_kg: f64,
    /// Fraction of the goal consumed, capped at 1.0 (ring sweep)
    pub used_fraction: f64,
    /// Rounded percent consumed, capped at 100 (ring label)
    pub used_percent: u32,
    /// Kilograms still available before the goal, floored at zero
    pub remaining_kg: f64,
    /// Percent of the goal still available, floored at zero (bar width)
    pub remaining_percent: f64,
    pub badge: GoalBadge,
}

/// One row of the category breakdown, heaviest bucket first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRow {
    pub bucket: CategoryBucket,
    pub carbon_kg: f64,
    /// Rounded share of the grand total
    pub share_percent: u32,
    /// Rounded width relative to the heaviest bucket (bar scaling)
    pub bar_percent: u32,
}

/// One day of the trailing 7-day series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyPoint {
    pub day: NaiveDate,
    /// Weekday label, `Sun` through `Sat`
    pub label: String,
    pub carbon_kg: f64,
}

/// Verdict of measuring the weekly total against the goal-as-baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum ComparisonVerdict {
    /// No transactions yet, nothing to compare
    NoActivity,
    Better { percent: u32 },
    Higher { percent: u32 },
    OnPar,
}

/// Weekly total measured against the goal treated as the average baseline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonCard {
    pub total_kg: f64,
    pub baseline_kg: f64,
    pub verdict: ComparisonVerdict,
}

/// Achievement predicates, re-derived on every recomputation. There is no
/// stored "earned" flag: an achievement can lapse if the state backing it
/// changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Achievements {
    /// At least one recorded transaction
    pub eco_starter: bool,
    /// Goal achieved, or under goal with three or more transactions counted
    pub goal_getter: bool,
    /// Five or more retained transactions
    pub spend_wise: bool,
    /// Green Point balance of 50 or more
    pub point_collector: bool,
}

impl Achievements {
    pub fn earned_count(&self) -> usize {
        [self.eco_starter, self.goal_getter, self.spend_wise, self.point_collector]
            .iter()
            .filter(|earned| **earned)
            .count()
    }
}

/// Everything a rendering surface needs, bundled for one read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    pub green_points: u32,
    pub goal_status: GoalStatus,
    pub transaction_count: u32,
    pub progress: WeeklyProgress,
    pub categories: Vec<CategoryRow>,
    pub daily: Vec<DailyPoint>,
    pub comparison: ComparisonCard,
    pub achievements: Achievements,
}

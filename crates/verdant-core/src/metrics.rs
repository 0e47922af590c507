//! Derived metrics
//!
//! Pure projections over [`SessionState`]. Nothing here mutates or persists;
//! every value is recomputed from the retained transactions on each call.
//! Calendar-sensitive series take `today` as an argument so tests can pin it.

use chrono::{Duration, NaiveDate};

use verdant_api::{
    Achievements, CategoryBucket, CategoryRow, ComparisonCard, ComparisonVerdict, Dashboard,
    DailyPoint, GoalBadge, GoalStatus, ImpactLevel, Transaction, WeeklyProgress,
};

use crate::session::SessionState;

/// Sum of carbon over every retained transaction, in kg CO₂.
///
/// The retained list is treated as "this week" wholesale; transactions older
/// than the 7-day chart window still count toward the total.
pub fn weekly_total_kg(state: &SessionState) -> f64 {
    state.total_carbon_kg()
}

/// Progress against the weekly goal: ring sweep, bar width, and badge.
pub fn weekly_progress(state: &SessionState) -> WeeklyProgress {
    let total_kg = weekly_total_kg(state);
    let goal_kg = state.weekly_goal_kg;

    let used_fraction = (total_kg / goal_kg).min(1.0);
    let remaining_kg = (goal_kg - total_kg).max(0.0);
    let remaining_percent = ((goal_kg - total_kg) / goal_kg * 100.0).max(0.0);

    let badge = if total_kg >= goal_kg {
        GoalBadge::OverGoal
    } else if remaining_percent < 20.0 {
        GoalBadge::AlmostThere
    } else {
        GoalBadge::OnTrack
    };

    WeeklyProgress {
        total_kg,
        goal_kg,
        used_fraction,
        used_percent: (used_fraction * 100.0).round() as u32,
        remaining_kg,
        remaining_percent,
        badge,
    }
}

/// Carbon grouped into display buckets, heaviest first.
///
/// Only buckets that received at least one transaction appear. Returns an
/// empty list when the grand total is zero. Share is relative to the grand
/// total; bar width is relative to the heaviest bucket. The sort is stable,
/// so equal buckets keep [`CategoryBucket::ALL`] order.
pub fn category_breakdown(state: &SessionState) -> Vec<CategoryRow> {
    let mut sums: Vec<(CategoryBucket, f64)> = Vec::new();
    for bucket in CategoryBucket::ALL {
        let mut touched = false;
        let mut kg = 0.0;
        for txn in &state.transactions {
            if txn.category.bucket() == bucket {
                touched = true;
                kg += txn.carbon_kg;
            }
        }
        if touched {
            sums.push((bucket, kg));
        }
    }

    let grand: f64 = sums.iter().map(|(_, kg)| kg).sum();
    if grand <= 0.0 {
        return Vec::new();
    }
    let heaviest = sums.iter().map(|(_, kg)| *kg).fold(0.0, f64::max);

    let mut rows: Vec<CategoryRow> = sums
        .into_iter()
        .map(|(bucket, kg)| CategoryRow {
            bucket,
            carbon_kg: kg,
            share_percent: (kg / grand * 100.0).round() as u32,
            bar_percent: (kg / heaviest * 100.0).round() as u32,
        })
        .collect();
    rows.sort_by(|a, b| b.carbon_kg.total_cmp(&a.carbon_kg));
    rows
}

/// Trailing 7 calendar days ending at `today`, oldest first. Days with no
/// transactions carry zero.
pub fn daily_series(state: &SessionState, today: NaiveDate) -> Vec<DailyPoint> {
    (0..7i64)
        .rev()
        .map(|back| {
            let day = today - Duration::days(back);
            let carbon_kg = state
                .transactions
                .iter()
                .filter(|t| t.day() == day)
                .map(|t| t.carbon_kg)
                .sum();
            DailyPoint {
                day,
                label: day.format("%a").to_string(),
                carbon_kg,
            }
        })
        .collect()
}

/// Weekly total measured against the goal as baseline.
pub fn comparison(state: &SessionState) -> ComparisonCard {
    let total_kg = weekly_total_kg(state);
    let baseline_kg = state.weekly_goal_kg;

    let verdict = if total_kg == 0.0 {
        ComparisonVerdict::NoActivity
    } else if total_kg < baseline_kg {
        ComparisonVerdict::Better {
            percent: ((baseline_kg - total_kg) / baseline_kg * 100.0).round() as u32,
        }
    } else if total_kg > baseline_kg {
        ComparisonVerdict::Higher {
            percent: ((total_kg - baseline_kg) / baseline_kg * 100.0).round() as u32,
        }
    } else {
        ComparisonVerdict::OnPar
    };

    ComparisonCard { total_kg, baseline_kg, verdict }
}

/// Achievement predicates over the current state.
pub fn achievements(state: &SessionState) -> Achievements {
    let total_kg = weekly_total_kg(state);
    Achievements {
        eco_starter: !state.transactions.is_empty(),
        goal_getter: state.goal_status == GoalStatus::Success
            || (total_kg < state.weekly_goal_kg && state.transaction_count >= 3),
        spend_wise: state.transactions.len() >= 5,
        point_collector: state.green_points >= 50,
    }
}

/// Retained transactions, optionally narrowed to one impact level. Order is
/// unchanged (newest first).
pub fn transactions_by_impact(
    state: &SessionState,
    impact: Option<ImpactLevel>,
) -> Vec<&Transaction> {
    state
        .transactions
        .iter()
        .filter(|t| impact.map_or(true, |level| t.impact == level))
        .collect()
}

/// Every derived view bundled for one read.
pub fn dashboard(state: &SessionState, today: NaiveDate) -> Dashboard {
    Dashboard {
        green_points: state.green_points,
        goal_status: state.goal_status,
        transaction_count: state.transaction_count,
        progress: weekly_progress(state),
        categories: category_breakdown(state),
        daily: daily_series(state, today),
        comparison: comparison(state),
        achievements: achievements(state),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};
    use verdant_api::MerchantCategory;
    use verdant_util::TxnId;

    fn txn_on(day: NaiveDate, category: MerchantCategory, carbon_kg: f64) -> Transaction {
        let occurred_at = day
            .and_hms_opt(12, 0, 0)
            .and_then(|dt| Local.from_local_datetime(&dt).single())
            .unwrap();
        Transaction {
            id: TxnId::generate(occurred_at),
            merchant_name: "Test Merchant".to_string(),
            icon: None,
            category,
            merchant_class_code: "5999".to_string(),
            amount: 500,
            carbon_kg,
            impact: ImpactLevel::Medium,
            occurred_at,
            eco_tip: "Consider lower-carbon options.".to_string(),
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 23).unwrap()
    }

    fn state_with(transactions: Vec<Transaction>) -> SessionState {
        SessionState {
            transaction_count: transactions.len() as u32,
            transactions,
            ..SessionState::default()
        }
    }

    #[test]
    fn weekly_total_counts_transactions_older_than_chart_window() {
        let old_day = today() - Duration::days(30);
        let state = state_with(vec![
            txn_on(today(), MerchantCategory::GasStation, 2.5),
            txn_on(old_day, MerchantCategory::GroceryStore, 1.0),
        ]);

        assert!((weekly_total_kg(&state) - 3.5).abs() < 1e-9);

        let series = daily_series(&state, today());
        let charted: f64 = series.iter().map(|p| p.carbon_kg).sum();
        assert!((charted - 2.5).abs() < 1e-9);
    }

    #[test]
    fn progress_on_track() {
        let mut state = state_with(vec![txn_on(today(), MerchantCategory::GroceryStore, 2.0)]);
        state.weekly_goal_kg = 8.0;

        let progress = weekly_progress(&state);
        assert_eq!(progress.used_percent, 25);
        assert!((progress.used_fraction - 0.25).abs() < 1e-9);
        assert!((progress.remaining_kg - 6.0).abs() < 1e-9);
        assert!((progress.remaining_percent - 75.0).abs() < 1e-9);
        assert_eq!(progress.badge, GoalBadge::OnTrack);
    }

    #[test]
    fn progress_almost_there_under_twenty_percent_remaining() {
        let mut state = state_with(vec![txn_on(today(), MerchantCategory::GasStation, 6.6)]);
        state.weekly_goal_kg = 8.0;

        let progress = weekly_progress(&state);
        assert_eq!(progress.badge, GoalBadge::AlmostThere);
        assert!(progress.remaining_percent < 20.0);
    }

    #[test]
    fn progress_over_goal_caps_ring() {
        let mut state = state_with(vec![txn_on(today(), MerchantCategory::GasStation, 10.0)]);
        state.weekly_goal_kg = 8.0;

        let progress = weekly_progress(&state);
        assert_eq!(progress.badge, GoalBadge::OverGoal);
        assert_eq!(progress.used_percent, 100);
        assert!((progress.used_fraction - 1.0).abs() < 1e-9);
        assert_eq!(progress.remaining_kg, 0.0);
        assert_eq!(progress.remaining_percent, 0.0);
    }

    #[test]
    fn breakdown_groups_and_sorts_buckets() {
        let state = state_with(vec![
            txn_on(today(), MerchantCategory::EatingPlaces, 0.6),
            txn_on(today(), MerchantCategory::GroceryStore, 0.4),
            txn_on(today(), MerchantCategory::GasStation, 2.5),
            txn_on(today(), MerchantCategory::Entertainment, 0.3),
        ]);

        let rows = category_breakdown(&state);
        assert_eq!(rows.len(), 3);

        assert_eq!(rows[0].bucket, CategoryBucket::Transportation);
        assert!((rows[0].carbon_kg - 2.5).abs() < 1e-9);
        assert_eq!(rows[0].bar_percent, 100);
        assert_eq!(rows[0].share_percent, 66);

        assert_eq!(rows[1].bucket, CategoryBucket::FoodDining);
        assert!((rows[1].carbon_kg - 1.0).abs() < 1e-9);
        assert_eq!(rows[1].bar_percent, 40);
        assert_eq!(rows[1].share_percent, 26);

        assert_eq!(rows[2].bucket, CategoryBucket::Entertainment);
        assert_eq!(rows[2].share_percent, 8);
    }

    #[test]
    fn breakdown_ties_keep_declaration_order() {
        let state = state_with(vec![
            txn_on(today(), MerchantCategory::Entertainment, 1.0),
            txn_on(today(), MerchantCategory::GasStation, 1.0),
        ]);

        let rows = category_breakdown(&state);
        assert_eq!(rows[0].bucket, CategoryBucket::Transportation);
        assert_eq!(rows[1].bucket, CategoryBucket::Entertainment);
    }

    #[test]
    fn breakdown_empty_without_carbon() {
        assert!(category_breakdown(&state_with(Vec::new())).is_empty());
    }

    #[test]
    fn unknown_category_lands_in_other_bucket() {
        let state = state_with(vec![txn_on(
            today(),
            MerchantCategory::Other("Book Store".to_string()),
            0.5,
        )]);

        let rows = category_breakdown(&state);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].bucket, CategoryBucket::Other);
        assert_eq!(rows[0].share_percent, 100);
    }

    #[test]
    fn daily_series_spans_seven_days_today_last() {
        let state = state_with(vec![
            txn_on(today(), MerchantCategory::GroceryStore, 0.3),
            txn_on(today() - Duration::days(2), MerchantCategory::GasStation, 2.5),
            txn_on(today() - Duration::days(2), MerchantCategory::FastFood, 0.4),
        ]);

        let series = daily_series(&state, today());
        assert_eq!(series.len(), 7);
        assert_eq!(series[0].day, today() - Duration::days(6));
        assert_eq!(series[6].day, today());
        assert!((series[6].carbon_kg - 0.3).abs() < 1e-9);
        assert!((series[4].carbon_kg - 2.9).abs() < 1e-9);
        assert_eq!(series[5].carbon_kg, 0.0);

        // 2026-08-23 is a Sunday
        assert_eq!(series[6].label, "Sun");
        assert_eq!(series[0].label, "Mon");
    }

    #[test]
    fn comparison_verdicts() {
        let mut state = state_with(Vec::new());
        state.weekly_goal_kg = 8.0;
        assert_eq!(comparison(&state).verdict, ComparisonVerdict::NoActivity);

        let mut state = state_with(vec![txn_on(today(), MerchantCategory::GroceryStore, 3.2)]);
        state.weekly_goal_kg = 8.0;
        assert_eq!(
            comparison(&state).verdict,
            ComparisonVerdict::Better { percent: 60 }
        );

        let mut state = state_with(vec![txn_on(today(), MerchantCategory::GasStation, 10.0)]);
        state.weekly_goal_kg = 8.0;
        assert_eq!(
            comparison(&state).verdict,
            ComparisonVerdict::Higher { percent: 25 }
        );

        let mut state = state_with(vec![txn_on(today(), MerchantCategory::GasStation, 8.0)]);
        state.weekly_goal_kg = 8.0;
        assert_eq!(comparison(&state).verdict, ComparisonVerdict::OnPar);
    }

    #[test]
    fn achievement_predicates() {
        let state = state_with(Vec::new());
        let earned = achievements(&state);
        assert!(!earned.eco_starter);
        assert!(!earned.goal_getter);
        assert!(!earned.spend_wise);
        assert!(!earned.point_collector);

        let mut state = state_with(vec![
            txn_on(today(), MerchantCategory::GroceryStore, 0.3),
            txn_on(today(), MerchantCategory::GroceryStore, 0.4),
            txn_on(today(), MerchantCategory::GroceryStore, 0.5),
        ]);
        state.weekly_goal_kg = 8.0;
        state.green_points = 56;

        let earned = achievements(&state);
        assert!(earned.eco_starter);
        assert!(earned.goal_getter);
        assert!(!earned.spend_wise);
        assert!(earned.point_collector);
        assert_eq!(earned.earned_count(), 3);
    }

    #[test]
    fn goal_getter_holds_after_success_even_over_goal() {
        let mut state = state_with(vec![txn_on(today(), MerchantCategory::GasStation, 9.0)]);
        state.weekly_goal_kg = 8.0;
        state.goal_status = GoalStatus::Success;

        assert!(achievements(&state).goal_getter);
    }

    #[test]
    fn impact_filter_narrows_and_preserves_order() {
        let mut low = txn_on(today(), MerchantCategory::GroceryStore, 0.3);
        low.impact = ImpactLevel::Low;
        let mut high_a = txn_on(today(), MerchantCategory::GasStation, 2.5);
        high_a.impact = ImpactLevel::High;
        let mut high_b = txn_on(today(), MerchantCategory::ClothingStore, 1.2);
        high_b.impact = ImpactLevel::High;

        let state = state_with(vec![high_b.clone(), low.clone(), high_a.clone()]);

        assert_eq!(transactions_by_impact(&state, None).len(), 3);

        let high = transactions_by_impact(&state, Some(ImpactLevel::High));
        assert_eq!(high.len(), 2);
        assert_eq!(high[0].id, high_b.id);
        assert_eq!(high[1].id, high_a.id);

        assert!(transactions_by_impact(&state, Some(ImpactLevel::Medium))
            .iter()
            .all(|t| t.impact == ImpactLevel::Medium));
    }

    #[test]
    fn dashboard_bundles_consistent_views() {
        let mut state = state_with(vec![
            txn_on(today(), MerchantCategory::EatingPlaces, 0.6),
            txn_on(today(), MerchantCategory::GasStation, 2.5),
        ]);
        state.green_points = 20;

        let dashboard = dashboard(&state, today());
        assert_eq!(dashboard.transaction_count, 2);
        assert_eq!(dashboard.green_points, 20);
        assert_eq!(dashboard.goal_status, GoalStatus::Active);
        assert!((dashboard.progress.total_kg - 3.1).abs() < 1e-9);
        assert_eq!(dashboard.categories.len(), 2);
        assert_eq!(dashboard.daily.len(), 7);
        assert_eq!(dashboard.comparison.total_kg, dashboard.progress.total_kg);
        assert!(dashboard.achievements.eco_starter);
    }
}

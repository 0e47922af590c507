//! Tabular export rendering
//!
//! Two externally-observable CSV shapes:
//! - a combined single file with a `section` discriminator column
//!   (`profile` / `category` / `transaction` rows under one ragged header)
//! - a split pair: a profile summary table and a transaction log table
//!
//! Records are CRLF-terminated. Fields containing the delimiter, quotes, or
//! newlines are quoted with internal quotes doubled.

use chrono::{DateTime, Local};
use csv::{Terminator, WriterBuilder};
use verdant_api::{MerchantCategory, Profile, Transaction};
use verdant_util::format_datetime_full;

use crate::{SessionSnapshot, StoreError, StoreResult};

/// The split export pair.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitExport {
    pub profile_csv: String,
    pub transactions_csv: String,
}

/// Category order used by the split profile summary.
const SPLIT_CATEGORY_ORDER: [MerchantCategory; 8] = [
    MerchantCategory::EatingPlaces,
    MerchantCategory::GasStation,
    MerchantCategory::GroceryStore,
    MerchantCategory::ClothingStore,
    MerchantCategory::Entertainment,
    MerchantCategory::HealthFitness,
    MerchantCategory::Restaurant,
    MerchantCategory::FastFood,
];

fn writer() -> csv::Writer<Vec<u8>> {
    WriterBuilder::new()
        .terminator(Terminator::CRLF)
        .flexible(true)
        .from_writer(Vec::new())
}

fn finish(wtr: csv::Writer<Vec<u8>>) -> StoreResult<String> {
    let bytes = wtr
        .into_inner()
        .map_err(|e| StoreError::Export(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| StoreError::Export(e.to_string()))
}

/// Signed Green Point change column value, e.g. `+48` or `-32`.
fn format_gp(delta: i64) -> String {
    if delta >= 0 {
        format!("+{delta}")
    } else {
        delta.to_string()
    }
}

/// Claimed rewards cell: IDs joined with `; `, or `None`.
fn format_claimed(claimed: &[String]) -> String {
    if claimed.is_empty() {
        "None".to_string()
    } else {
        claimed.join("; ")
    }
}

/// Per-category carbon totals over raw category labels, first-seen order.
fn category_totals(transactions: &[Transaction]) -> Vec<(String, f64)> {
    let mut totals: Vec<(String, f64)> = Vec::new();
    for txn in transactions {
        let label = txn.category.label();
        match totals.iter_mut().find(|entry| entry.0 == label) {
            Some(entry) => entry.1 += txn.carbon_kg,
            None => totals.push((label.to_string(), txn.carbon_kg)),
        }
    }
    totals
}

/// Render the combined single-file export.
///
/// Layout: one ragged header row, then `profile` key/value rows, a `category`
/// sub-table, and a `transaction` sub-table, discriminated by the first
/// column.
pub fn combined_csv(
    profile: &Profile,
    snapshot: &SessionSnapshot,
    exported_at: DateTime<Local>,
) -> StoreResult<String> {
    let mut wtr = writer();

    wtr.write_record([
        "section",
        "field_or_id",
        "value_or_date",
        "col3",
        "col4",
        "col5",
        "col6",
        "col7",
        "col8",
        "col9",
        "col10",
    ])?;

    let total_co2 = format!("{:.2}", snapshot.total_carbon_kg());
    let total_spend = snapshot.total_spend().to_string();
    let profile_rows = [
        ("last_updated", format_datetime_full(&exported_at)),
        ("username", profile.username.as_str().to_string()),
        ("name", profile.display_name.clone()),
        ("green_points", snapshot.green_points.to_string()),
        ("weekly_goal_kg", format!("{:.1}", snapshot.weekly_goal)),
        ("goal_status", snapshot.goal_status.export_label().to_string()),
        ("total_co2_kg", total_co2),
        ("total_spend_inr", total_spend),
        ("total_transactions", snapshot.all_transactions.len().to_string()),
        ("claimed_rewards", format_claimed(&snapshot.claimed_rewards)),
    ];
    for (field, value) in &profile_rows {
        wtr.write_record(["profile", *field, value.as_str()])?;
    }

    wtr.write_record(["category", "category_name", "co2_kg"])?;
    for (label, kg) in category_totals(&snapshot.all_transactions) {
        wtr.write_record(["category", label.as_str(), format!("{kg:.2}").as_str()])?;
    }

    wtr.write_record([
        "transaction",
        "id",
        "date",
        "time",
        "merchant",
        "category",
        "mcc",
        "amount_inr",
        "co2_kg",
        "impact",
        "gp_change",
        "eco_tip",
    ])?;
    for txn in &snapshot.all_transactions {
        wtr.write_record([
            "transaction",
            txn.id.as_str(),
            txn.date_label().as_str(),
            txn.time_label().as_str(),
            txn.merchant_name.as_str(),
            txn.category.label(),
            txn.merchant_class_code.as_str(),
            txn.amount.to_string().as_str(),
            format!("{:.2}", txn.carbon_kg).as_str(),
            txn.impact.as_str(),
            format_gp(txn.points_delta()).as_str(),
            txn.eco_tip.as_str(),
        ])?;
    }

    finish(wtr)
}

/// Render the split export pair: profile summary and transaction log.
pub fn split_csv(
    profile: &Profile,
    snapshot: &SessionSnapshot,
    exported_at: DateTime<Local>,
) -> StoreResult<SplitExport> {
    let mut prof = writer();

    let profile_rows = [
        ("Field", "Value".to_string()),
        ("Export Timestamp", format_datetime_full(&exported_at)),
        ("Username", profile.username.as_str().to_string()),
        ("Name", profile.display_name.clone()),
        ("Green Points (GP)", snapshot.green_points.to_string()),
        (
            "Weekly Carbon Goal (kg CO₂)",
            format!("{:.1}", snapshot.weekly_goal),
        ),
        ("Goal Status", snapshot.goal_status.export_label().to_string()),
        (
            "Total CO₂ This Week (kg)",
            format!("{:.2}", snapshot.total_carbon_kg()),
        ),
        (
            "Total Transactions",
            snapshot.all_transactions.len().to_string(),
        ),
        ("Total Spend (₹)", snapshot.total_spend().to_string()),
        ("Claimed Rewards", format_claimed(&snapshot.claimed_rewards)),
    ];
    for (field, value) in &profile_rows {
        prof.write_record([*field, value.as_str()])?;
    }

    prof.write_record(["", ""])?;
    prof.write_record(["--- Carbon by Category ---", ""])?;
    for category in &SPLIT_CATEGORY_ORDER {
        let kg: f64 = snapshot
            .all_transactions
            .iter()
            .filter(|t| t.category == *category)
            .map(|t| t.carbon_kg)
            .sum();
        if kg > 0.0 {
            prof.write_record([
                format!("{} (kg CO₂)", category.label()).as_str(),
                format!("{kg:.2}").as_str(),
            ])?;
        }
    }

    let mut txns = writer();
    txns.write_record([
        "Transaction ID",
        "Date",
        "Time",
        "Merchant Name",
        "Category",
        "MCC Code",
        "Amount (₹)",
        "Carbon (kg CO₂)",
        "Impact Level",
        "Green Points Change",
        "Eco Tip",
    ])?;
    for txn in &snapshot.all_transactions {
        txns.write_record([
            txn.id.as_str(),
            txn.date_label().as_str(),
            txn.time_label().as_str(),
            txn.merchant_name.as_str(),
            txn.category.label(),
            txn.merchant_class_code.as_str(),
            txn.amount.to_string().as_str(),
            format!("{:.2}", txn.carbon_kg).as_str(),
            txn.impact.as_str(),
            format_gp(txn.points_delta()).as_str(),
            txn.eco_tip.as_str(),
        ])?;
    }

    Ok(SplitExport {
        profile_csv: finish(prof)?,
        transactions_csv: finish(txns)?,
    })
}

//! Domain model for the verdant engine

use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use verdant_util::{IdentityKey, TxnId};

/// Weekly carbon goal a fresh session starts with, in kg CO₂.
pub const DEFAULT_WEEKLY_GOAL_KG: f64 = 8.0;

/// Upper bound for a weekly goal, in kg CO₂. The lower bound is exclusive
/// zero.
pub const MAX_WEEKLY_GOAL_KG: f64 = 100.0;

/// Round to one decimal place, the precision carbon estimates carry.
pub fn round1(kg: f64) -> f64 {
    (kg * 10.0).round() / 10.0
}

/// Carbon-intensity class assigned per merchant.
///
/// Drives the sign and magnitude of the Green Point change a transaction
/// carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImpactLevel {
    Low,
    Medium,
    High,
}

impl ImpactLevel {
    /// Green Point delta for a transaction of `amount` at this level.
    ///
    /// `base = amount / 100` (integer division); low-impact spending earns
    /// six times base, medium twice, high costs four times. Clamping the
    /// balance at zero happens where the delta is applied, not here.
    pub fn points_delta(self, amount: i64) -> i64 {
        let base = amount / 100;
        match self {
            ImpactLevel::Low => 6 * base,
            ImpactLevel::Medium => 2 * base,
            ImpactLevel::High => -4 * base,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ImpactLevel::Low => "low",
            ImpactLevel::Medium => "medium",
            ImpactLevel::High => "high",
        }
    }
}

impl fmt::Display for ImpactLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Merchant category.
///
/// The catalog only produces the known variants; `Other` absorbs category
/// labels from older or foreign snapshots so a load never fails on one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MerchantCategory {
    EatingPlaces,
    FastFood,
    Restaurant,
    GroceryStore,
    GasStation,
    ClothingStore,
    Entertainment,
    HealthFitness,
    /// Category label outside the known catalog.
    Other(String),
}

impl MerchantCategory {
    /// The known catalog categories, in canonical order.
    pub const KNOWN: [MerchantCategory; 8] = [
        MerchantCategory::EatingPlaces,
        MerchantCategory::FastFood,
        MerchantCategory::Restaurant,
        MerchantCategory::GroceryStore,
        MerchantCategory::GasStation,
        MerchantCategory::ClothingStore,
        MerchantCategory::Entertainment,
        MerchantCategory::HealthFitness,
    ];

    pub fn from_label(label: &str) -> Self {
        match label {
            "Eating Places" => MerchantCategory::EatingPlaces,
            "Fast Food" => MerchantCategory::FastFood,
            "Restaurant" => MerchantCategory::Restaurant,
            "Grocery Store" => MerchantCategory::GroceryStore,
            "Gas Station" => MerchantCategory::GasStation,
            "Clothing Store" => MerchantCategory::ClothingStore,
            "Entertainment" => MerchantCategory::Entertainment,
            "Health & Fitness" => MerchantCategory::HealthFitness,
            other => MerchantCategory::Other(other.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            MerchantCategory::EatingPlaces => "Eating Places",
            MerchantCategory::FastFood => "Fast Food",
            MerchantCategory::Restaurant => "Restaurant",
            MerchantCategory::GroceryStore => "Grocery Store",
            MerchantCategory::GasStation => "Gas Station",
            MerchantCategory::ClothingStore => "Clothing Store",
            MerchantCategory::Entertainment => "Entertainment",
            MerchantCategory::HealthFitness => "Health & Fitness",
            MerchantCategory::Other(label) => label,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, MerchantCategory::Other(_))
    }

    /// Display bucket this category aggregates into.
    pub fn bucket(&self) -> CategoryBucket {
        match self {
            MerchantCategory::EatingPlaces
            | MerchantCategory::FastFood
            | MerchantCategory::Restaurant
            | MerchantCategory::GroceryStore => CategoryBucket::FoodDining,
            MerchantCategory::GasStation => CategoryBucket::Transportation,
            MerchantCategory::ClothingStore => CategoryBucket::Shopping,
            MerchantCategory::Entertainment | MerchantCategory::HealthFitness => {
                CategoryBucket::Entertainment
            }
            MerchantCategory::Other(_) => CategoryBucket::Other,
        }
    }

    /// Component shares splitting this category's carbon estimate.
    /// Shares sum to 100 for every category.
    pub fn carbon_shares(&self) -> &'static [CarbonShare] {
        match self {
            MerchantCategory::EatingPlaces => &[
                CarbonShare { label: "Food Production & Agriculture", percent: 55 },
                CarbonShare { label: "Kitchen Energy & Cooking", percent: 25 },
                CarbonShare { label: "Packaging & Waste", percent: 20 },
            ],
            MerchantCategory::FastFood => &[
                CarbonShare { label: "Meat & Ingredients", percent: 50 },
                CarbonShare { label: "Kitchen Operations", percent: 30 },
                CarbonShare { label: "Packaging & Delivery", percent: 20 },
            ],
            MerchantCategory::Restaurant => &[
                CarbonShare { label: "Ingredients & Supply Chain", percent: 50 },
                CarbonShare { label: "Cooking & Refrigeration", percent: 30 },
                CarbonShare { label: "Packaging & Disposal", percent: 20 },
            ],
            MerchantCategory::GroceryStore => &[
                CarbonShare { label: "Food & Produce Sourcing", percent: 45 },
                CarbonShare { label: "Cold Chain & Refrigeration", percent: 35 },
                CarbonShare { label: "Packaging & Transport", percent: 20 },
            ],
            MerchantCategory::GasStation => &[
                CarbonShare { label: "Fuel Combustion (direct)", percent: 75 },
                CarbonShare { label: "Fuel Refining & Distribution", percent: 18 },
                CarbonShare { label: "Station Operations", percent: 7 },
            ],
            MerchantCategory::ClothingStore => &[
                CarbonShare { label: "Textile Manufacturing", percent: 60 },
                CarbonShare { label: "Global Shipping & Logistics", percent: 25 },
                CarbonShare { label: "Retail Operations", percent: 15 },
            ],
            MerchantCategory::Entertainment => &[
                CarbonShare { label: "Venue Energy Use", percent: 55 },
                CarbonShare { label: "Travel to Venue", percent: 30 },
                CarbonShare { label: "Operations & Equipment", percent: 15 },
            ],
            MerchantCategory::HealthFitness => &[
                CarbonShare { label: "Facility Electricity", percent: 60 },
                CarbonShare { label: "HVAC & Water Heating", percent: 25 },
                CarbonShare { label: "Equipment & Maintenance", percent: 15 },
            ],
            MerchantCategory::Other(_) => &[
                CarbonShare { label: "Product/Service Carbon", percent: 60 },
                CarbonShare { label: "Transportation & Logistics", percent: 25 },
                CarbonShare { label: "Operations & Energy", percent: 15 },
            ],
        }
    }
}

impl fmt::Display for MerchantCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl Serialize for MerchantCategory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for MerchantCategory {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Ok(MerchantCategory::from_label(&label))
    }
}

/// One component of a category's carbon attribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CarbonShare {
    pub label: &'static str,
    /// Percent of the estimate attributed to this component.
    pub percent: u32,
}

/// Display bucket for the category breakdown view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryBucket {
    FoodDining,
    Transportation,
    Shopping,
    Entertainment,
    Other,
}

impl CategoryBucket {
    /// All buckets, in declaration order. Breakdown ties preserve this order.
    pub const ALL: [CategoryBucket; 5] = [
        CategoryBucket::FoodDining,
        CategoryBucket::Transportation,
        CategoryBucket::Shopping,
        CategoryBucket::Entertainment,
        CategoryBucket::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            CategoryBucket::FoodDining => "Food & Dining",
            CategoryBucket::Transportation => "Transportation",
            CategoryBucket::Shopping => "Shopping",
            CategoryBucket::Entertainment => "Entertainment",
            CategoryBucket::Other => "Other",
        }
    }

    /// Icon reference for list rows (opaque, interpreted by the shell).
    pub fn icon(self) -> &'static str {
        match self {
            CategoryBucket::FoodDining => "🍕",
            CategoryBucket::Transportation => "⛽",
            CategoryBucket::Shopping => "👕",
            CategoryBucket::Entertainment => "🎬",
            CategoryBucket::Other => "📦",
        }
    }
}

impl fmt::Display for CategoryBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Weekly goal lifecycle state.
///
/// Transitions only happen on ingestion (`active -> failed`,
/// `active -> success`) and on goal edits (anything -> `active`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalStatus {
    #[default]
    Active,
    Success,
    Failed,
}

impl GoalStatus {
    /// Human label used in exports.
    pub fn export_label(self) -> &'static str {
        match self {
            GoalStatus::Active => "Active",
            GoalStatus::Success => "Achieved",
            GoalStatus::Failed => "Failed",
        }
    }
}

/// A simulated card transaction with its carbon estimate.
///
/// Immutable once created: the carbon estimate, impact class, and tip are
/// all fixed at generation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: TxnId,
    pub merchant_name: String,
    /// Icon reference (opaque, interpreted by the shell)
    #[serde(default)]
    pub icon: Option<String>,
    pub category: MerchantCategory,
    /// 4-digit merchant class code
    pub merchant_class_code: String,
    /// Spend in whole currency units (₹)
    pub amount: i64,
    /// Estimated footprint in kg CO₂, rounded to one decimal
    pub carbon_kg: f64,
    #[serde(rename = "impactLevel")]
    pub impact: ImpactLevel,
    pub occurred_at: DateTime<Local>,
    /// Sustainability tip drawn from the merchant's pool
    pub eco_tip: String,
}

impl Transaction {
    /// Green Point delta this transaction carries (signed, unclamped).
    pub fn points_delta(&self) -> i64 {
        self.impact.points_delta(self.amount)
    }

    /// Display date, e.g. `Aug 23, 2026`.
    pub fn date_label(&self) -> String {
        verdant_util::date_label(&self.occurred_at)
    }

    /// Display time, e.g. `04:12 PM`.
    pub fn time_label(&self) -> String {
        verdant_util::time_label(&self.occurred_at)
    }

    /// Calendar day, for daily bucketing.
    pub fn day(&self) -> NaiveDate {
        self.occurred_at.date_naive()
    }

    /// Attribution of this transaction's estimate across its category's
    /// components.
    pub fn carbon_breakdown(&self) -> Vec<BreakdownRow> {
        self.category
            .carbon_shares()
            .iter()
            .map(|share| BreakdownRow {
                label: share.label,
                percent: share.percent,
                kg: self.carbon_kg * f64::from(share.percent) / 100.0,
            })
            .collect()
    }
}

/// One attribution row of a transaction's carbon breakdown.
#[derive(Debug, Clone, PartialEq)]
pub struct BreakdownRow {
    pub label: &'static str,
    pub percent: u32,
    pub kg: f64,
}

/// Identity profile supplied by the identity layer at login.
///
/// `username` is the normalized storage key; `display_name` is what exports
/// and greetings show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub username: IdentityKey,
    pub display_name: String,
}

impl Profile {
    pub fn new(username: IdentityKey, display_name: impl Into<String>) -> Self {
        Self {
            username,
            display_name: display_name.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_txn() -> Transaction {
        Transaction {
            id: TxnId::from("txn_1755900000000"),
            merchant_name: "Starbucks Coffee".to_string(),
            icon: Some("☕".to_string()),
            category: MerchantCategory::EatingPlaces,
            merchant_class_code: "5812".to_string(),
            amount: 342,
            carbon_kg: 0.6,
            impact: ImpactLevel::High,
            occurred_at: Local.with_ymd_and_hms(2026, 8, 23, 16, 12, 0).unwrap(),
            eco_tip: "Bring your own reusable cup to save ~0.10kg CO₂ per visit.".to_string(),
        }
    }

    #[test]
    fn points_delta_per_impact_level() {
        assert_eq!(ImpactLevel::Low.points_delta(850), 48);
        assert_eq!(ImpactLevel::Medium.points_delta(850), 16);
        assert_eq!(ImpactLevel::High.points_delta(850), -32);
        // Integer division floors the base before scaling
        assert_eq!(ImpactLevel::Low.points_delta(99), 0);
        assert_eq!(ImpactLevel::High.points_delta(100), -4);
    }

    #[test]
    fn round1_behaviour() {
        assert_eq!(round1(0.6156), 0.6);
        assert_eq!(round1(2.35), 2.4);
        assert_eq!(round1(0.04), 0.0);
        assert_eq!(round1(11.96), 12.0);
    }

    #[test]
    fn category_labels_round_trip() {
        for cat in MerchantCategory::KNOWN {
            let label = cat.label().to_string();
            assert_eq!(MerchantCategory::from_label(&label), cat);
            assert!(cat.is_known());
        }

        let unknown = MerchantCategory::from_label("Taxi");
        assert_eq!(unknown, MerchantCategory::Other("Taxi".to_string()));
        assert!(!unknown.is_known());
        assert_eq!(unknown.bucket(), CategoryBucket::Other);
    }

    #[test]
    fn category_buckets() {
        assert_eq!(MerchantCategory::FastFood.bucket(), CategoryBucket::FoodDining);
        assert_eq!(MerchantCategory::GroceryStore.bucket(), CategoryBucket::FoodDining);
        assert_eq!(MerchantCategory::GasStation.bucket(), CategoryBucket::Transportation);
        assert_eq!(MerchantCategory::ClothingStore.bucket(), CategoryBucket::Shopping);
        assert_eq!(MerchantCategory::HealthFitness.bucket(), CategoryBucket::Entertainment);
    }

    #[test]
    fn carbon_shares_sum_to_100() {
        let mut cats: Vec<MerchantCategory> = MerchantCategory::KNOWN.to_vec();
        cats.push(MerchantCategory::Other("Taxi".to_string()));
        for cat in cats {
            let total: u32 = cat.carbon_shares().iter().map(|s| s.percent).sum();
            assert_eq!(total, 100, "shares for {} do not sum to 100", cat);
        }
    }

    #[test]
    fn breakdown_scales_estimate() {
        let txn = sample_txn();
        let rows = txn.carbon_breakdown();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].label, "Food Production & Agriculture");
        assert!((rows[0].kg - 0.33).abs() < 1e-9);
        let total: f64 = rows.iter().map(|r| r.kg).sum();
        assert!((total - txn.carbon_kg).abs() < 1e-9);
    }

    #[test]
    fn transaction_serde_uses_wire_names() {
        let txn = sample_txn();
        let json = serde_json::to_string(&txn).unwrap();
        assert!(json.contains("\"merchantName\":\"Starbucks Coffee\""));
        assert!(json.contains("\"carbonKg\":0.6"));
        assert!(json.contains("\"impactLevel\":\"high\""));
        assert!(json.contains("\"category\":\"Eating Places\""));

        let parsed: Transaction = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, txn);
    }

    #[test]
    fn goal_status_labels() {
        assert_eq!(GoalStatus::Active.export_label(), "Active");
        assert_eq!(GoalStatus::Success.export_label(), "Achieved");
        assert_eq!(GoalStatus::Failed.export_label(), "Failed");
        assert_eq!(serde_json::to_string(&GoalStatus::Success).unwrap(), "\"success\"");
    }
}

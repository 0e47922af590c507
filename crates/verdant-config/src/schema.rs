//! Raw catalog schema (as parsed from TOML)

use serde::{Deserialize, Serialize};
use verdant_api::ImpactLevel;

/// Raw catalog as parsed from TOML
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawCatalog {
    /// Catalog schema version
    pub catalog_version: u32,

    /// Session defaults
    #[serde(default)]
    pub session: RawSessionDefaults,

    /// Merchant definitions
    #[serde(default)]
    pub merchants: Vec<RawMerchant>,
}

/// Session-level defaults
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawSessionDefaults {
    /// Starting weekly carbon goal in kg CO₂ (default: 8.0)
    pub default_goal_kg: Option<f64>,
}

/// Raw merchant definition
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawMerchant {
    /// Unique stable ID
    pub id: String,

    /// Display name
    pub name: String,

    /// Icon reference (opaque, interpreted by shell)
    pub icon: Option<String>,

    /// Merchant category label (must be a known catalog category)
    pub category: String,

    /// 4-digit merchant class code
    pub mcc: String,

    /// Inclusive lower bound for drawn amounts, in whole currency units
    pub amount_min: i64,

    /// Inclusive upper bound for drawn amounts, in whole currency units
    pub amount_max: i64,

    /// kg CO₂ per 1000 currency units spent
    pub carbon_factor: f64,

    /// Carbon-intensity class
    pub impact: ImpactLevel,

    /// Eco tip pool; one tip is drawn per transaction
    #[serde(default)]
    pub tips: Vec<String>,
}

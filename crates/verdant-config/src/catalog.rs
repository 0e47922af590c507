//! Validated merchant catalog

use crate::schema::{RawCatalog, RawMerchant};
use verdant_api::{round1, ImpactLevel, MerchantCategory, DEFAULT_WEEKLY_GOAL_KG};

/// Validated catalog ready for use by the generator
#[derive(Debug, Clone)]
pub struct Catalog {
    /// Session defaults
    pub session: SessionDefaults,

    /// Validated merchants
    pub merchants: Vec<Merchant>,
}

impl Catalog {
    /// Convert from raw catalog (after validation)
    pub fn from_raw(raw: RawCatalog) -> Self {
        let merchants = raw.merchants.into_iter().map(Merchant::from_raw).collect();
        Self {
            session: SessionDefaults {
                default_goal_kg: raw.session.default_goal_kg.unwrap_or(DEFAULT_WEEKLY_GOAL_KG),
            },
            merchants,
        }
    }

    /// The compiled-in demo catalog of eight merchants.
    pub fn builtin() -> Self {
        Self {
            session: SessionDefaults::default(),
            merchants: vec![
                Merchant {
                    id: "starbucks".into(),
                    name: "Starbucks Coffee".into(),
                    icon: Some("☕".into()),
                    category: MerchantCategory::EatingPlaces,
                    mcc: "5812".into(),
                    amount_min: 200,
                    amount_max: 499,
                    carbon_factor: 1.8,
                    impact: ImpactLevel::High,
                    tips: vec![
                        "Bring your own reusable cup to save ~0.10kg CO₂ per visit.".into(),
                        "Choosing plant-based milk reduces emissions by up to 30%!".into(),
                    ],
                },
                Merchant {
                    id: "mcdonalds".into(),
                    name: "McDonald's".into(),
                    icon: Some("🍔".into()),
                    category: MerchantCategory::FastFood,
                    mcc: "5814".into(),
                    amount_min: 150,
                    amount_max: 399,
                    carbon_factor: 1.5,
                    impact: ImpactLevel::Medium,
                    tips: vec![
                        "Try a plant-based burger to cut your meal's carbon footprint by 50%.".into(),
                        "Dining in uses fewer single-use plastics than takeaway.".into(),
                    ],
                },
                Merchant {
                    id: "dmart".into(),
                    name: "DMart Grocery".into(),
                    icon: Some("🛒".into()),
                    category: MerchantCategory::GroceryStore,
                    mcc: "5411".into(),
                    amount_min: 500,
                    amount_max: 1499,
                    carbon_factor: 0.3,
                    impact: ImpactLevel::Low,
                    tips: vec![
                        "Buying local and seasonal produce reduces supply chain emissions.".into(),
                        "Bring reusable bags to eliminate plastic waste.".into(),
                    ],
                },
                Merchant {
                    id: "indian-oil".into(),
                    name: "Indian Oil Petrol".into(),
                    icon: Some("⛽".into()),
                    category: MerchantCategory::GasStation,
                    mcc: "5541".into(),
                    amount_min: 1000,
                    amount_max: 2499,
                    carbon_factor: 2.5,
                    impact: ImpactLevel::High,
                    tips: vec![
                        "Consider carpooling or public transit to halve your transport emissions.".into(),
                        "EVs emit ~70% less CO₂ per km than petrol vehicles.".into(),
                    ],
                },
                Merchant {
                    id: "dominos".into(),
                    name: "Domino's Pizza".into(),
                    icon: Some("🍕".into()),
                    category: MerchantCategory::Restaurant,
                    mcc: "5812".into(),
                    amount_min: 300,
                    amount_max: 699,
                    carbon_factor: 1.4,
                    impact: ImpactLevel::Medium,
                    tips: vec![
                        "Vegetarian pizzas have roughly 40% lower carbon footprint.".into(),
                        "Ordering in bulk for one delivery beats multiple small orders.".into(),
                    ],
                },
                Merchant {
                    id: "zara".into(),
                    name: "Zara Fashion".into(),
                    icon: Some("👕".into()),
                    category: MerchantCategory::ClothingStore,
                    mcc: "5691".into(),
                    amount_min: 1000,
                    amount_max: 2999,
                    carbon_factor: 0.8,
                    impact: ImpactLevel::High,
                    tips: vec![
                        "One garment produces ~2.1kg CO₂. Buying second-hand saves 80%.".into(),
                        "Washing clothes in cold water cuts energy use by 90%.".into(),
                    ],
                },
                Merchant {
                    id: "pvr".into(),
                    name: "PVR Cinemas".into(),
                    icon: Some("🎬".into()),
                    category: MerchantCategory::Entertainment,
                    mcc: "7832".into(),
                    amount_min: 300,
                    amount_max: 799,
                    carbon_factor: 0.4,
                    impact: ImpactLevel::Low,
                    tips: vec![
                        "Cinema visits are one of the lower-impact entertainment choices.".into(),
                        "Choosing nearby venues reduces your travel emissions.".into(),
                    ],
                },
                Merchant {
                    id: "cultfit".into(),
                    name: "Cult.fit Gym".into(),
                    icon: Some("🏋️".into()),
                    category: MerchantCategory::HealthFitness,
                    mcc: "7997".into(),
                    amount_min: 1000,
                    amount_max: 2499,
                    carbon_factor: 0.2,
                    impact: ImpactLevel::Low,
                    tips: vec![
                        "Working out at a gym has a lower footprint than driving to outdoor activities.".into(),
                        "Ask about the gym's renewable energy usage!".into(),
                    ],
                },
            ],
        }
    }

    /// Get merchant by ID
    pub fn get(&self, id: &str) -> Option<&Merchant> {
        self.merchants.iter().find(|m| m.id == id)
    }

    pub fn len(&self) -> usize {
        self.merchants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.merchants.is_empty()
    }
}

/// Session defaults
#[derive(Debug, Clone)]
pub struct SessionDefaults {
    /// Weekly carbon goal a fresh session starts with, in kg CO₂
    pub default_goal_kg: f64,
}

impl Default for SessionDefaults {
    fn default() -> Self {
        Self {
            default_goal_kg: DEFAULT_WEEKLY_GOAL_KG,
        }
    }
}

/// Validated merchant definition
#[derive(Debug, Clone)]
pub struct Merchant {
    pub id: String,
    pub name: String,
    pub icon: Option<String>,
    pub category: MerchantCategory,
    pub mcc: String,
    pub amount_min: i64,
    pub amount_max: i64,
    /// kg CO₂ per 1000 currency units spent
    pub carbon_factor: f64,
    pub impact: ImpactLevel,
    pub tips: Vec<String>,
}

impl Merchant {
    /// Convert from raw merchant (after validation)
    pub fn from_raw(raw: RawMerchant) -> Self {
        Self {
            id: raw.id,
            name: raw.name,
            icon: raw.icon,
            category: MerchantCategory::from_label(&raw.category),
            mcc: raw.mcc,
            amount_min: raw.amount_min,
            amount_max: raw.amount_max,
            carbon_factor: raw.carbon_factor,
            impact: raw.impact,
            tips: raw.tips,
        }
    }

    /// Carbon estimate for a given spend at this merchant, rounded to one
    /// decimal.
    pub fn carbon_for(&self, amount: i64) -> f64 {
        round1(amount as f64 / 1000.0 * self.carbon_factor)
    }
}

//! Simulated card-swipe generator
//!
//! Draws a merchant, an amount, and a tip from the catalog. Generation only
//! produces a value; recording it is a separate engine operation.

use chrono::{DateTime, Local};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use verdant_api::Transaction;
use verdant_config::{Catalog, Merchant};
use verdant_util::TxnId;

/// Produces simulated transactions from a merchant catalog.
pub struct TransactionGenerator {
    rng: StdRng,
}

impl TransactionGenerator {
    /// Generator with an OS-seeded RNG.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic generator for a fixed seed. Same seed and catalog give
    /// the same merchant, amount, and tip sequence.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Draw one transaction: uniform merchant, uniform amount within the
    /// merchant's range, uniform tip.
    ///
    /// The catalog is validated to be non-empty, so indexing cannot miss.
    pub fn generate(&mut self, catalog: &Catalog, now: DateTime<Local>) -> Transaction {
        let merchant = &catalog.merchants[self.rng.gen_range(0..catalog.merchants.len())];
        self.from_merchant(merchant, now)
    }

    /// Draw one transaction for a specific merchant.
    pub fn from_merchant(&mut self, merchant: &Merchant, now: DateTime<Local>) -> Transaction {
        let amount = self.rng.gen_range(merchant.amount_min..=merchant.amount_max);
        let eco_tip = merchant.tips[self.rng.gen_range(0..merchant.tips.len())].clone();

        Transaction {
            id: TxnId::generate(now),
            merchant_name: merchant.name.clone(),
            icon: merchant.icon.clone(),
            category: merchant.category.clone(),
            merchant_class_code: merchant.mcc.clone(),
            amount,
            carbon_kg: merchant.carbon_for(amount),
            impact: merchant.impact,
            occurred_at: now,
            eco_tip,
        }
    }
}

impl Default for TransactionGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use verdant_api::round1;

    fn catalog() -> Catalog {
        Catalog::builtin()
    }

    #[test]
    fn generated_fields_come_from_one_merchant() {
        let catalog = catalog();
        let mut generator = TransactionGenerator::seeded(7);
        let now = Local::now();

        for _ in 0..50 {
            let txn = generator.generate(&catalog, now);
            let merchant = catalog
                .merchants
                .iter()
                .find(|m| m.name == txn.merchant_name)
                .expect("merchant from catalog");

            assert!(txn.amount >= merchant.amount_min);
            assert!(txn.amount <= merchant.amount_max);
            assert_eq!(txn.category, merchant.category);
            assert_eq!(txn.merchant_class_code, merchant.mcc);
            assert_eq!(txn.impact, merchant.impact);
            assert!(merchant.tips.contains(&txn.eco_tip));
            assert_eq!(txn.carbon_kg, merchant.carbon_for(txn.amount));
        }
    }

    #[test]
    fn carbon_is_rounded_to_one_decimal() {
        let catalog = catalog();
        let mut generator = TransactionGenerator::seeded(99);
        let now = Local::now();

        for _ in 0..50 {
            let txn = generator.generate(&catalog, now);
            assert_eq!(txn.carbon_kg, round1(txn.carbon_kg));
            assert!(txn.carbon_kg >= 0.0);
        }
    }

    #[test]
    fn same_seed_same_sequence() {
        let catalog = catalog();
        let now = Local::now();

        let mut a = TransactionGenerator::seeded(42);
        let mut b = TransactionGenerator::seeded(42);

        for _ in 0..10 {
            let left = a.generate(&catalog, now);
            let right = b.generate(&catalog, now);
            assert_eq!(left.merchant_name, right.merchant_name);
            assert_eq!(left.amount, right.amount);
            assert_eq!(left.eco_tip, right.eco_tip);
        }
    }

    #[test]
    fn different_seeds_diverge() {
        let catalog = catalog();
        let now = Local::now();

        let mut a = TransactionGenerator::seeded(1);
        let mut b = TransactionGenerator::seeded(2);

        let left: Vec<i64> = (0..20).map(|_| a.generate(&catalog, now).amount).collect();
        let right: Vec<i64> = (0..20).map(|_| b.generate(&catalog, now).amount).collect();
        assert_ne!(left, right);
    }

    #[test]
    fn from_merchant_pins_the_merchant() {
        let catalog = catalog();
        let merchant = catalog.get("indian-oil").expect("builtin merchant");
        let mut generator = TransactionGenerator::seeded(5);

        let txn = generator.from_merchant(merchant, Local::now());
        assert_eq!(txn.merchant_name, "Indian Oil Petrol");
        assert!(txn.amount >= 1000 && txn.amount <= 2499);
    }
}

//! Catalog validation

use crate::schema::{RawCatalog, RawMerchant};
use std::collections::HashSet;
use thiserror::Error;
use verdant_api::{MerchantCategory, MAX_WEEKLY_GOAL_KG};

/// Validation error
#[derive(Debug, Clone, Error)]
pub enum ValidationError {
    #[error("Merchant '{merchant_id}': {message}")]
    MerchantError { merchant_id: String, message: String },

    #[error("Duplicate merchant ID: {0}")]
    DuplicateMerchantId(String),

    #[error("Merchant '{merchant_id}': unknown category '{category}'")]
    UnknownCategory {
        merchant_id: String,
        category: String,
    },

    #[error("Merchant '{merchant_id}': amount range {min}..={max} is invalid")]
    InvalidAmountRange {
        merchant_id: String,
        min: i64,
        max: i64,
    },

    #[error("Session defaults: {0}")]
    SessionError(String),

    #[error("Catalog error: {0}")]
    CatalogError(String),
}

/// Validate a raw catalog
pub fn validate_catalog(catalog: &RawCatalog) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if catalog.merchants.is_empty() {
        errors.push(ValidationError::CatalogError(
            "catalog has no merchants".into(),
        ));
    }

    // Check for duplicate merchant IDs
    let mut seen_ids = HashSet::new();
    for merchant in &catalog.merchants {
        if !seen_ids.insert(&merchant.id) {
            errors.push(ValidationError::DuplicateMerchantId(merchant.id.clone()));
        }
    }

    // Validate each merchant
    for merchant in &catalog.merchants {
        errors.extend(validate_merchant(merchant));
    }

    // Validate session defaults
    if let Some(goal) = catalog.session.default_goal_kg {
        if !goal.is_finite() || goal <= 0.0 || goal > MAX_WEEKLY_GOAL_KG {
            errors.push(ValidationError::SessionError(format!(
                "default_goal_kg {} must be above 0 and at most {}",
                goal, MAX_WEEKLY_GOAL_KG
            )));
        }
    }

    errors
}

fn validate_merchant(merchant: &RawMerchant) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if merchant.id.is_empty() {
        errors.push(ValidationError::MerchantError {
            merchant_id: merchant.id.clone(),
            message: "id cannot be empty".into(),
        });
    }

    if merchant.name.is_empty() {
        errors.push(ValidationError::MerchantError {
            merchant_id: merchant.id.clone(),
            message: "name cannot be empty".into(),
        });
    }

    if !MerchantCategory::from_label(&merchant.category).is_known() {
        errors.push(ValidationError::UnknownCategory {
            merchant_id: merchant.id.clone(),
            category: merchant.category.clone(),
        });
    }

    if merchant.mcc.len() != 4 || !merchant.mcc.chars().all(|c| c.is_ascii_digit()) {
        errors.push(ValidationError::MerchantError {
            merchant_id: merchant.id.clone(),
            message: format!("mcc '{}' must be a 4-digit code", merchant.mcc),
        });
    }

    if merchant.amount_min <= 0 || merchant.amount_max < merchant.amount_min {
        errors.push(ValidationError::InvalidAmountRange {
            merchant_id: merchant.id.clone(),
            min: merchant.amount_min,
            max: merchant.amount_max,
        });
    }

    if !merchant.carbon_factor.is_finite() || merchant.carbon_factor < 0.0 {
        errors.push(ValidationError::MerchantError {
            merchant_id: merchant.id.clone(),
            message: format!("carbon_factor {} must be a non-negative number", merchant.carbon_factor),
        });
    }

    if merchant.tips.is_empty() {
        errors.push(ValidationError::MerchantError {
            merchant_id: merchant.id.clone(),
            message: "tips cannot be empty".into(),
        });
    } else if merchant.tips.iter().any(|tip| tip.trim().is_empty()) {
        errors.push(ValidationError::MerchantError {
            merchant_id: merchant.id.clone(),
            message: "tips cannot contain blank entries".into(),
        });
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::RawSessionDefaults;
    use verdant_api::ImpactLevel;

    fn valid_merchant() -> RawMerchant {
        RawMerchant {
            id: "cafe".to_string(),
            name: "Cafe".to_string(),
            icon: None,
            category: "Eating Places".to_string(),
            mcc: "5812".to_string(),
            amount_min: 100,
            amount_max: 500,
            carbon_factor: 1.2,
            impact: ImpactLevel::Medium,
            tips: vec!["Skip the lid.".to_string()],
        }
    }

    fn catalog_with(merchants: Vec<RawMerchant>) -> RawCatalog {
        RawCatalog {
            catalog_version: 1,
            session: RawSessionDefaults::default(),
            merchants,
        }
    }

    #[test]
    fn valid_catalog_passes() {
        let errors = validate_catalog(&catalog_with(vec![valid_merchant()]));
        assert!(errors.is_empty(), "unexpected errors: {:?}", errors);
    }

    #[test]
    fn duplicate_ids_rejected() {
        let errors = validate_catalog(&catalog_with(vec![valid_merchant(), valid_merchant()]));
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::DuplicateMerchantId(id) if id == "cafe")));
    }

    #[test]
    fn unknown_category_rejected() {
        let mut merchant = valid_merchant();
        merchant.category = "Taxi".to_string();
        let errors = validate_catalog(&catalog_with(vec![merchant]));
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::UnknownCategory { category, .. } if category == "Taxi")));
    }

    #[test]
    fn bad_amount_range_rejected() {
        let mut merchant = valid_merchant();
        merchant.amount_min = 500;
        merchant.amount_max = 100;
        let errors = validate_catalog(&catalog_with(vec![merchant]));
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::InvalidAmountRange { .. })));

        let mut merchant = valid_merchant();
        merchant.amount_min = 0;
        let errors = validate_catalog(&catalog_with(vec![merchant]));
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::InvalidAmountRange { .. })));
    }

    #[test]
    fn bad_mcc_rejected() {
        for mcc in ["581", "58123", "58a2", ""] {
            let mut merchant = valid_merchant();
            merchant.mcc = mcc.to_string();
            let errors = validate_catalog(&catalog_with(vec![merchant]));
            assert!(
                errors.iter().any(|e| matches!(e, ValidationError::MerchantError { .. })),
                "mcc '{}' was not rejected",
                mcc
            );
        }
    }

    #[test]
    fn empty_tips_rejected() {
        let mut merchant = valid_merchant();
        merchant.tips.clear();
        let errors = validate_catalog(&catalog_with(vec![merchant]));
        assert!(errors.iter().any(|e| matches!(e, ValidationError::MerchantError { .. })));
    }

    #[test]
    fn out_of_range_goal_rejected() {
        let mut catalog = catalog_with(vec![valid_merchant()]);
        catalog.session.default_goal_kg = Some(0.0);
        assert!(!validate_catalog(&catalog).is_empty());

        catalog.session.default_goal_kg = Some(150.0);
        assert!(!validate_catalog(&catalog).is_empty());

        catalog.session.default_goal_kg = Some(100.0);
        assert!(validate_catalog(&catalog).is_empty());
    }
}

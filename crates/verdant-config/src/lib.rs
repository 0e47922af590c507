//! Merchant catalog parsing and validation for verdant
//!
//! Supports TOML catalogs with:
//! - Versioned schema
//! - Merchant definitions (category, amount range, carbon factor, tips)
//! - Session defaults (starting weekly goal)
//! - Validation with clear error messages
//!
//! A built-in catalog is compiled in; a TOML file only needs to be supplied
//! to override it.

mod catalog;
mod schema;
mod validation;

pub use catalog::*;
pub use schema::*;
pub use validation::*;

use std::path::Path;
use thiserror::Error;

/// Catalog loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read catalog file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Validation failed: {errors:?}")]
    ValidationFailed { errors: Vec<ValidationError> },

    #[error("Unsupported catalog version: {0}")]
    UnsupportedVersion(u32),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Load and validate a merchant catalog from a TOML file
pub fn load_catalog(path: impl AsRef<Path>) -> ConfigResult<Catalog> {
    let content = std::fs::read_to_string(path)?;
    parse_catalog(&content)
}

/// Parse and validate a merchant catalog from a TOML string
pub fn parse_catalog(content: &str) -> ConfigResult<Catalog> {
    let raw: RawCatalog = toml::from_str(content)?;

    // Check version
    if raw.catalog_version != CURRENT_CATALOG_VERSION {
        return Err(ConfigError::UnsupportedVersion(raw.catalog_version));
    }

    // Validate
    let errors = validate_catalog(&raw);
    if !errors.is_empty() {
        return Err(ConfigError::ValidationFailed { errors });
    }

    // Convert to catalog
    Ok(Catalog::from_raw(raw))
}

/// Current supported catalog version
pub const CURRENT_CATALOG_VERSION: u32 = 1;

//! Catalog validation CLI tool
//!
//! Validates a verdant merchant catalog file and reports any errors.

use std::path::PathBuf;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();

    let catalog_path = match args.get(1) {
        Some(path) => PathBuf::from(path),
        None => {
            eprintln!("Usage: validate-catalog <catalog-file>");
            eprintln!();
            eprintln!("Validates a verdant merchant catalog file.");
            eprintln!();
            eprintln!("Example:");
            eprintln!("  validate-catalog catalog.toml");
            return ExitCode::from(2);
        }
    };

    // Check file exists
    if !catalog_path.exists() {
        eprintln!("Error: Catalog file not found: {}", catalog_path.display());
        return ExitCode::from(1);
    }

    // Try to load and validate
    match verdant_config::load_catalog(&catalog_path) {
        Ok(catalog) => {
            println!("✓ Catalog is valid");
            println!();
            println!("Summary:");
            println!("  Catalog version: {}", verdant_config::CURRENT_CATALOG_VERSION);
            println!("  Default weekly goal: {} kg CO₂", catalog.session.default_goal_kg);
            println!("  Merchants: {}", catalog.len());

            if !catalog.merchants.is_empty() {
                println!();
                println!("Merchants:");
                for merchant in &catalog.merchants {
                    println!(
                        "  - {} [{}]: {} ({}, ₹{}..=₹{}, {} kg/₹1000)",
                        merchant.id,
                        merchant.impact,
                        merchant.name,
                        merchant.category,
                        merchant.amount_min,
                        merchant.amount_max,
                        merchant.carbon_factor,
                    );
                }
            }

            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("✗ Catalog validation failed");
            eprintln!();
            match &e {
                verdant_config::ConfigError::ReadError(io_err) => {
                    eprintln!("Failed to read file: {}", io_err);
                }
                verdant_config::ConfigError::ParseError(parse_err) => {
                    eprintln!("TOML parse error:");
                    eprintln!("  {}", parse_err);
                }
                verdant_config::ConfigError::ValidationFailed { errors } => {
                    eprintln!("Validation errors ({}):", errors.len());
                    for err in errors {
                        eprintln!("  - {}", err);
                    }
                }
                verdant_config::ConfigError::UnsupportedVersion(ver) => {
                    eprintln!(
                        "Unsupported catalog version: {} (expected {})",
                        ver,
                        verdant_config::CURRENT_CATALOG_VERSION
                    );
                }
            }
            ExitCode::from(1)
        }
    }
}

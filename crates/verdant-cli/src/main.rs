//! verdant - carbon-aware spending tracker
//!
//! One run is one login session: open the named profile, apply the requested
//! operation, and flush state on the way out. Wires together:
//! - Merchant catalog (built-in or TOML file)
//! - SQLite store in the data directory
//! - The session engine

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;
use verdant_api::{ComparisonVerdict, ImpactLevel, Profile, Transaction};
use verdant_config::{load_catalog, Catalog};
use verdant_core::{GoalTransition, IngestReceipt, SessionEngine, TransactionGenerator};
use verdant_store::{ProfileStore, SqliteStore};
use verdant_util::{date_tag, default_data_dir, IdentityKey};

/// verdant - carbon-aware spending tracker
#[derive(Parser, Debug)]
#[command(name = "verdant")]
#[command(about = "Carbon-aware spending tracker", long_about = None)]
struct Args {
    /// Username owning this session (or set VERDANT_USER env var)
    #[arg(short, long, env = "VERDANT_USER")]
    user: String,

    /// Display name for exports; defaults to the username
    #[arg(long)]
    name: Option<String>,

    /// Merchant catalog file (default: built-in catalog)
    #[arg(short, long, env = "VERDANT_CATALOG")]
    catalog: Option<PathBuf>,

    /// Data directory override (or set VERDANT_DATA_DIR env var)
    #[arg(short, long, env = "VERDANT_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Log level
    #[arg(short, long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scan one or more simulated receipts
    Scan {
        /// Number of transactions to record
        #[arg(short = 'n', long, default_value_t = 1)]
        count: u32,

        /// RNG seed for reproducible runs
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Show the dashboard
    Status {
        /// Only list transactions at this impact level (low, medium, high)
        #[arg(long, value_parser = parse_impact)]
        impact: Option<ImpactLevel>,
    },

    /// Set the weekly carbon goal in kg CO₂
    Goal { kg: f64 },

    /// Claim a reward
    Claim { reward_id: String },

    /// Write the session export as CSV
    Export {
        /// Write the profile/transactions pair instead of one combined file
        #[arg(long)]
        split: bool,

        /// Directory to write into (default: current directory)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Delete all data for this user
    Reset {
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
}

fn parse_impact(raw: &str) -> Result<ImpactLevel, String> {
    match raw.to_ascii_lowercase().as_str() {
        "low" => Ok(ImpactLevel::Low),
        "medium" => Ok(ImpactLevel::Medium),
        "high" => Ok(ImpactLevel::High),
        other => Err(format!(
            "unknown impact level '{other}' (expected low, medium, or high)"
        )),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    let username = IdentityKey::new(&args.user);
    if username.is_empty() {
        bail!("Username must not be blank");
    }

    let catalog = match &args.catalog {
        Some(path) => load_catalog(path)
            .with_context(|| format!("Failed to load catalog from {:?}", path))?,
        None => Catalog::builtin(),
    };

    let data_dir = args.data_dir.clone().unwrap_or_else(default_data_dir);
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create data directory {:?}", data_dir))?;

    let db_path = data_dir.join("verdant.db");
    let store: Arc<dyn ProfileStore> = Arc::new(
        SqliteStore::open(&db_path)
            .with_context(|| format!("Failed to open database {:?}", db_path))?,
    );

    info!(
        version = env!("CARGO_PKG_VERSION"),
        identity = %username,
        db_path = %db_path.display(),
        "verdant starting"
    );

    let display_name = args
        .name
        .clone()
        .unwrap_or_else(|| args.user.trim().to_string());
    let mut engine = SessionEngine::open(Profile::new(username, display_name), catalog, store);

    match args.command {
        Command::Scan { count, seed } => scan(&mut engine, count, seed),
        Command::Status { impact } => status(&engine, impact),
        Command::Goal { kg } => set_goal(&mut engine, kg)?,
        Command::Claim { reward_id } => claim(&mut engine, &reward_id)?,
        Command::Export { split, out } => export(&engine, split, out.as_deref())?,
        Command::Reset { yes } => {
            // No final save after a reset; it would recreate the deleted slot
            return reset(&mut engine, yes);
        }
    }

    engine.logout();
    Ok(())
}

fn scan(engine: &mut SessionEngine, count: u32, seed: Option<u64>) {
    let mut generator = match seed {
        Some(seed) => TransactionGenerator::seeded(seed),
        None => TransactionGenerator::new(),
    };

    for _ in 0..count {
        let txn = generator.generate(engine.catalog(), verdant_util::now());
        let receipt = engine.ingest(txn);
        print_receipt(&receipt, engine.state().weekly_goal_kg);
    }

    let state = engine.state();
    println!();
    println!(
        "This week: {:.1} kg of {:.1} kg CO₂ | {} Green Points",
        state.total_carbon_kg(),
        state.weekly_goal_kg,
        state.green_points
    );
}

fn print_receipt(receipt: &IngestReceipt, goal_kg: f64) {
    let txn = &receipt.transaction;
    let icon = txn.icon.as_deref().unwrap_or("🧾");
    println!(
        "{} {} — ₹{} | {:.1} kg CO₂ | {} impact | {} GP",
        icon,
        txn.merchant_name,
        txn.amount,
        txn.carbon_kg,
        txn.impact,
        signed(receipt.points_delta)
    );
    for row in txn.carbon_breakdown() {
        println!("      {:>2}% {} — {:.2} kg", row.percent, row.label, row.kg);
    }
    println!("   💡 {}", txn.eco_tip);

    match receipt.transition {
        Some(GoalTransition::Achieved { bonus_points }) => {
            println!("   🎉 Goal Achieved! You earned {bonus_points} Green Points!");
        }
        Some(GoalTransition::Failed) => {
            println!("   😢 Goal Failed! You exceeded your {goal_kg:.1} kg goal. Try again next week!");
        }
        None => {}
    }
}

fn status(engine: &SessionEngine, impact: Option<ImpactLevel>) {
    let profile = engine.profile();
    let dashboard = engine.dashboard(verdant_util::now().date_naive());

    println!("{} ({})", profile.display_name, profile.username);
    println!(
        "Green Points: {} | Goal status: {} | Transactions: {}",
        dashboard.green_points,
        dashboard.goal_status.export_label(),
        dashboard.transaction_count
    );

    let progress = &dashboard.progress;
    println!();
    println!(
        "This week: {:.1} kg of {:.1} kg CO₂ ({}% used) — {}",
        progress.total_kg,
        progress.goal_kg,
        progress.used_percent,
        progress.badge.label()
    );
    println!("{:.1} kg away from your Green Goal", progress.remaining_kg);

    if !dashboard.categories.is_empty() {
        println!();
        println!("By category:");
        for row in &dashboard.categories {
            println!(
                "  {} {:<14} {:>5.1} kg  {:>3}%",
                row.bucket.icon(),
                row.bucket.label(),
                row.carbon_kg,
                row.share_percent
            );
        }
    }

    println!();
    println!("Last 7 days:");
    for point in &dashboard.daily {
        println!("  {} {:>5.1} kg", point.label, point.carbon_kg);
    }

    println!();
    match dashboard.comparison.verdict {
        ComparisonVerdict::NoActivity => {
            println!("Start adding transactions to see how you compare!");
        }
        ComparisonVerdict::Better { percent } => {
            println!("{percent}% Better — your footprint is under the weekly baseline.");
        }
        ComparisonVerdict::Higher { percent } => {
            println!("{percent}% Higher — try reducing your footprint to meet your goal.");
        }
        ComparisonVerdict::OnPar => {
            println!("On Par — right on track with the weekly baseline.");
        }
    }

    let earned = &dashboard.achievements;
    println!();
    println!("Achievements ({}/4):", earned.earned_count());
    println!("  [{}] Eco Starter — record a transaction", check(earned.eco_starter));
    println!("  [{}] Goal Getter — stay under your weekly goal", check(earned.goal_getter));
    println!("  [{}] Spend Wise — record five transactions", check(earned.spend_wise));
    println!("  [{}] Point Collector — reach 50 Green Points", check(earned.point_collector));

    let transactions = engine.transactions_by_impact(impact);
    if !transactions.is_empty() {
        println!();
        match impact {
            Some(level) => println!("Transactions ({level} impact):"),
            None => println!("Transactions:"),
        }
        for txn in &transactions {
            print_transaction(txn);
        }
    }
}

fn print_transaction(txn: &Transaction) {
    let icon = txn.icon.as_deref().unwrap_or("🧾");
    println!(
        "  {} {} — ₹{} | {:.1} kg CO₂ | {} | {} GP | {} {}",
        icon,
        txn.merchant_name,
        txn.amount,
        txn.carbon_kg,
        txn.impact,
        signed(txn.points_delta()),
        txn.date_label(),
        txn.time_label()
    );
}

fn set_goal(engine: &mut SessionEngine, kg: f64) -> Result<()> {
    let change = engine.set_goal(kg)?;
    println!(
        "✓ Goal Saved! Weekly goal is now {:.1} kg CO₂ (was {:.1} kg).",
        change.new_kg, change.previous_kg
    );
    if change.rearmed {
        println!("Goal tracking is active again for this period.");
    }
    Ok(())
}

fn claim(engine: &mut SessionEngine, reward_id: &str) -> Result<()> {
    let claim = engine.claim_reward(reward_id)?;
    println!(
        "Reward claimed: {} ({} claimed so far)",
        claim.reward_id, claim.total_claimed
    );
    Ok(())
}

fn export(engine: &SessionEngine, split: bool, out: Option<&Path>) -> Result<()> {
    let dir = out.unwrap_or(Path::new("."));
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {:?}", dir))?;

    if split {
        let export = engine.export_split().context("Failed to render split export")?;
        let tag = date_tag(&verdant_util::now());

        let profile_path = dir.join(format!("verdant_profile_{tag}.csv"));
        std::fs::write(&profile_path, export.profile_csv)
            .with_context(|| format!("Failed to write {:?}", profile_path))?;

        let txn_path = dir.join(format!("verdant_transactions_{tag}.csv"));
        std::fs::write(&txn_path, export.transactions_csv)
            .with_context(|| format!("Failed to write {:?}", txn_path))?;

        println!("Export Complete! 2 CSV files written: profile & transactions");
        println!("  {}", profile_path.display());
        println!("  {}", txn_path.display());
    } else {
        let csv = engine
            .export_combined()
            .context("Failed to render combined export")?;
        let path = dir.join("verdant_data.csv");
        std::fs::write(&path, csv).with_context(|| format!("Failed to write {:?}", path))?;
        println!("Export Complete! {}", path.display());
    }

    Ok(())
}

fn reset(engine: &mut SessionEngine, yes: bool) -> Result<()> {
    if !yes {
        bail!("Refusing to delete data without --yes");
    }
    engine.clear_data();
    println!("All data cleared for {}.", engine.profile().username);
    Ok(())
}

fn signed(delta: i64) -> String {
    if delta >= 0 {
        format!("+{delta}")
    } else {
        delta.to_string()
    }
}

fn check(earned: bool) -> &'static str {
    if earned {
        "x"
    } else {
        " "
    }
}

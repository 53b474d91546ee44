use anyhow::{bail, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use larder_core::urgency::classify_item;
use larder_core::waste::{
    bucketize_waste, change_percent, group_wasted_by_name, is_wasted, period_range, previous_range,
    Granularity, ItemFilters,
};
use larder_core::{local_today, InventoryItem};
use larder_notify::scheduler::NotificationScheduler;
use larder_notify::BasicMealPlanner;

mod config;
mod console;
mod inventory;
mod state;

#[derive(Parser, Debug)]
#[command(name = "larder", version, about = "Larder food-inventory urgency CLI")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List inventory with urgency tiers, most urgent first
    Status {
        /// Inventory CSV export (defaults to ~/.larder/inventory.csv)
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Waste report for the current period
    Waste {
        #[arg(long)]
        csv: Option<PathBuf>,

        /// week | month | year
        #[arg(long, default_value = "week")]
        period: String,

        /// Filter by storage location (fridge/shelf/freezer/pantry)
        #[arg(long)]
        location: Option<String>,

        /// Case-insensitive name filter
        #[arg(long)]
        search: Option<String>,
    },

    /// Run a scheduling pass and print every notification that would fire
    Notify {
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Config management
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default ~/.larder/config.toml
    Init,
    /// Show effective notification config
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Status { csv } => status(csv),
        Command::Waste { csv, period, location, search } => waste(csv, &period, location, search),
        Command::Notify { csv } => notify(csv).await,
        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config(),
            ConfigCommand::Check => config_check(),
        },
    }
}

fn resolve_csv(csv: Option<PathBuf>) -> Result<PathBuf> {
    match csv {
        Some(p) => Ok(p),
        None => state::inventory_path(),
    }
}

fn load(csv: Option<PathBuf>) -> Result<Vec<InventoryItem>> {
    inventory::load_items(&resolve_csv(csv)?)
}

fn parse_period(s: &str) -> Result<Granularity> {
    match s.trim().to_lowercase().as_str() {
        "week" => Ok(Granularity::Week),
        "month" => Ok(Granularity::Month),
        "year" => Ok(Granularity::Year),
        other => bail!("unknown period '{other}' (expected week/month/year)"),
    }
}

fn status(csv: Option<PathBuf>) -> Result<()> {
    let cfg = config::load_config()?;
    let tz = cfg.parse_tz()?;
    let today = local_today(tz, Utc::now());

    let items = load(csv)?;
    let mut rows: Vec<_> = items
        .iter()
        .filter(|i| i.is_active())
        .map(|i| (classify_item(i, today), i))
        .collect();
    rows.sort_by_key(|(info, item)| (info.days_until_expiry.unwrap_or(i64::MAX), item.name.clone()));

    println!("{} active items ({} total)\n", rows.len(), items.len());
    for (info, item) in rows {
        println!(
            "[{:>8}] {} — {} ({}, {})",
            info.tier.label(),
            item.name,
            info.description,
            item.quantity_label(),
            item.location.label()
        );
    }

    Ok(())
}

fn waste(
    csv: Option<PathBuf>,
    period: &str,
    location: Option<String>,
    search: Option<String>,
) -> Result<()> {
    let cfg = config::load_config()?;
    let tz = cfg.parse_tz()?;
    let today = local_today(tz, Utc::now());
    let granularity = parse_period(period)?;

    let filters = ItemFilters {
        location: location.as_deref().map(|l| l.parse()).transpose().map_err(|e| anyhow::anyhow!("{e}"))?,
        search,
        categories: None,
    };

    let items = load(csv)?;
    let buckets = bucketize_waste(&items, granularity, &filters, today);
    let current: usize = buckets.iter().map(|b| b.count).sum();

    let range = period_range(granularity, today);
    let prev = previous_range(&range, granularity);
    let previous = items
        .iter()
        .filter(|i| filters.matches(i) && is_wasted(i, today))
        .filter(|i| i.expiry.is_some_and(|e| prev.contains(e)))
        .count();

    println!("Waste this {period}: {current} items ({:+}% vs previous)", change_percent(current as f64, previous as f64));
    for b in &buckets {
        if b.count > 0 {
            println!("  {:<4} {}", b.label, "#".repeat(b.count));
        }
    }

    let groups = group_wasted_by_name(&items, &range, &filters, today);
    if !groups.is_empty() {
        println!("\nMost wasted:");
        for g in groups.iter().take(5) {
            println!(
                "  {} — {} wasted across {} entries",
                g.name, g.total_quantity, g.occurrences
            );
        }
    }

    Ok(())
}

async fn notify(csv: Option<PathBuf>) -> Result<()> {
    let cfg = config::load_config()?;
    let tz = cfg.parse_tz()?;
    let items = load(csv)?;

    let mut scheduler = NotificationScheduler::new(
        console::ConsoleNotifier::default(),
        BasicMealPlanner,
        cfg.notifications,
        tz,
    );
    scheduler.restore_pattern(state::read_pattern());
    scheduler.initialize().await;

    let outcome = scheduler.schedule_expiry_notifications(&items, Utc::now()).await;
    println!("\n{}", outcome.summary);

    state::write_pattern(scheduler.pattern())?;
    Ok(())
}

fn config_check() -> Result<()> {
    let cfg = config::load_config()?;
    let n = &cfg.notifications;

    println!("Notification config:\n");
    println!("- timezone: {}", cfg.timezone);
    println!("- enabled: {}", n.enabled);
    println!(
        "- tiers: critical={} warning={} soon={}",
        n.critical_alerts, n.warning_alerts, n.soon_alerts
    );
    println!(
        "- extras: meals={} morning_digest={} evening_planning={}",
        n.meal_suggestions, n.morning_digest, n.evening_planning
    );
    match n.quiet_hours {
        Some(qh) => println!("- quiet_hours: {}-{}", qh.start.format("%H:%M"), qh.end.format("%H:%M")),
        None => println!("- quiet_hours: <not set>"),
    }
    println!("- delivery hours: warning={} soon={}", n.warning_hour, n.soon_hour);
    println!(
        "- digest hours: morning={} evening={}",
        n.morning_hour, n.evening_hour
    );

    Ok(())
}

//! Loadout - Entry Point
//!
//! Loads a save file, migrates its equipment layout if needed, and reports
//! final stats plus upgrade suggestions from the inventory.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use loadout::compat::PlayerContext;
use loadout::data::{load_catalog_or_default, load_config_or_default, validate_catalog};
use loadout::save::{load_from_path, save_path};
use loadout::stats::StatName;
use loadout::LoadoutEngine;

/// Inspect a saved character's equipment
#[derive(Parser)]
#[command(
    name = "loadout",
    version,
    about = "Check equipment, stats and upgrades for a saved character"
)]
struct Cli {
    /// Save file to inspect (default: slot 1 in the save directory)
    save: Option<PathBuf>,

    /// Item catalog in RON format (default: built-in items)
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Engine config in RON format
    #[arg(long)]
    config: Option<PathBuf>,

    /// Apply the best upgrade in every slot instead of only listing them
    #[arg(long)]
    optimize: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Starting Loadout v{}", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();

    let config = load_config_or_default(cli.config.as_deref());
    let catalog = load_catalog_or_default(cli.catalog.as_deref());
    let report = validate_catalog(&catalog);
    if report.has_errors() {
        for issue in report.errors() {
            eprintln!("{}", issue);
        }
        anyhow::bail!("item catalog has {} error(s)", report.errors().count());
    }

    let path = cli.save.unwrap_or_else(|| save_path(1));
    let save = load_from_path(&path, Some(&catalog))
        .with_context(|| format!("Failed to load save {}", path.display()))?;

    let mut engine = LoadoutEngine::new(config);
    let equipped = catalog.resolve_equipment(&save.equipment);
    let inventory = catalog.resolve_inventory(&save.inventory);
    let base = save.player.base_stats;

    let result = engine.stats(&equipped, &base);
    let player =
        PlayerContext::new(save.player.level, save.player.class.clone(), result.final_stats);

    println!("{} (level {})", save.player.class, save.player.level);
    println!();
    println!("Stats:");
    for stat in StatName::ALL {
        let bonus = result.bonus(stat);
        if bonus == 0 {
            println!("  {:<13} {:>5}", stat.to_string(), result.final_stats.get(stat));
        } else {
            println!(
                "  {:<13} {:>5} ({:+})",
                stat.to_string(),
                result.final_stats.get(stat),
                bonus
            );
        }
    }

    println!();
    println!("Equipment:");
    if result.breakdown.is_empty() {
        println!("  (nothing equipped)");
    }
    for contribution in &result.breakdown {
        println!(
            "  {:<10} {:<24} {:>4}",
            contribution.slot.name(),
            contribution.item.name,
            contribution.total
        );
        let verdict = engine.check(
            Some(&contribution.item),
            Some(contribution.slot),
            &player,
            Some(&equipped),
        );
        for reason in verdict.reasons() {
            println!("    ! {}", reason);
        }
        for warning in verdict.warnings() {
            println!("    ~ {}", warning);
        }
    }

    println!();
    if cli.optimize {
        let optimized = engine.optimize(&player, &equipped, inventory.items(), &base);
        if optimized.changes.is_empty() {
            println!("Loadout is already optimal for this inventory.");
        } else {
            println!("Optimized loadout ({:+} total stats):", optimized.stat_gain);
            for change in &optimized.changes {
                println!(
                    "  {:<10} {} -> {}",
                    change.slot.name(),
                    change.replaces.as_ref().map_or("(empty)", |i| i.name.as_str()),
                    change.item.name
                );
            }
        }
    } else {
        let recommendations = engine.recommend(&player, &equipped, inventory.items(), &base);
        if recommendations.is_empty() {
            println!("No upgrades in inventory.");
        } else {
            println!("Recommended upgrades:");
            for rec in &recommendations {
                println!(
                    "  [{}] {:<10} {} ({:+}, {})",
                    rec.priority.name(),
                    rec.slot.name(),
                    rec.item.name,
                    rec.comparison.total_change,
                    rec.comparison.tier.name()
                );
                for warning in &rec.warnings {
                    println!("    ~ {}", warning);
                }
            }
        }
    }

    let stats = engine.cache_stats();
    println!();
    println!(
        "Cache: {} hits, {} misses, {}/{} entries ({:.0}% hit rate)",
        stats.hits,
        stats.misses,
        stats.size,
        stats.capacity,
        stats.hit_rate * 100.0
    );

    Ok(())
}

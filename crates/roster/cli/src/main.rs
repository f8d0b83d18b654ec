// Roster
// Copyright (C) 2025 Synerthink

// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.

// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! Roster CLI
//!
//! Command-line driver for the in-memory player registry.

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use roster_core::{CollisionChain, Direction, Player, PlayerRegistry, RegistryConfig, pearson_hash};
use serde::Deserialize;
use serde_json::json;
use std::path::{Path, PathBuf};
use std::process;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "roster")]
#[command(about = "Roster - in-memory player registry")]
#[command(version)]
struct Cli {
    /// JSON file with registry configuration
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Number of hash table buckets (overrides the config file)
    #[arg(long, global = true)]
    buckets: Option<usize>,

    /// Rebalance the name tree automatically as it degrades
    #[arg(long, global = true)]
    auto_balance: bool,

    /// Enable info-level logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Walk through the registry structures with a sample roster
    Demo,
    /// Print the Pearson hash and bucket index of each key
    Hash {
        /// Keys to hash
        #[arg(required = true)]
        keys: Vec<String>,
    },
    /// Load players from a JSON array of {uid, name, score} records
    Import {
        /// Path to the JSON file
        file: PathBuf,
        /// What to print once loaded
        #[arg(long, value_enum, default_value_t = View::Leaderboard)]
        view: View,
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum View {
    Buckets,
    Names,
    Leaderboard,
}

#[derive(Debug, Deserialize)]
struct PlayerRecord {
    uid: String,
    name: String,
    #[serde(default)]
    score: u64,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match load_config(cli.config.as_deref(), cli.buckets, cli.auto_balance) {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {:#}", e);
            process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Demo => handle_demo(config),
        Commands::Hash { keys } => handle_hash(&config, &keys),
        Commands::Import { file, view, json } => handle_import(config, &file, view, json),
    };

    if let Err(e) = result {
        error!("Command failed: {:#}", e);
        process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

/// File values first, then command-line overrides
fn load_config(path: Option<&Path>, buckets: Option<usize>, auto_balance: bool) -> anyhow::Result<RegistryConfig> {
    let mut config = match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path).with_context(|| format!("failed to read config file {}", path.display()))?;
            serde_json::from_str(&raw).with_context(|| format!("failed to parse config file {}", path.display()))?
        }
        None => RegistryConfig::default(),
    };

    if let Some(buckets) = buckets {
        config.bucket_count = buckets;
    }
    if auto_balance {
        config.auto_balance = true;
    }

    config.validate()?;
    debug!(?config, "resolved registry configuration");
    Ok(config)
}

fn handle_demo(config: RegistryConfig) -> anyhow::Result<()> {
    println!("== Collision chain ==");
    let mut chain = CollisionChain::new();
    chain.append_head(Player::new("12345", "Greg"));
    chain.append_tail(Player::new("654321", "Tom"));
    chain.append_tail(Player::new("987654", "Simon"));

    println!("Displaying from head to tail:");
    for line in chain.render(Direction::HeadToTail) {
        println!("  {line}");
    }
    println!("Displaying from tail to head:");
    for line in chain.render(Direction::TailToHead) {
        println!("  {line}");
    }

    let mut registry = PlayerRegistry::with_config(config)?;
    for (uid, name, score) in [
        ("09724", "Greg", 10_u64),
        ("54321", "Billy", 15),
        ("67890", "Tom", 10),
        ("12345", "Bobby", 20),
        ("20130", "Tim", 5),
        ("11223", "Robby", 15),
    ] {
        registry.register(uid, name)?;
        registry.set_score(uid, score)?;
    }
    info!(players = registry.len(), "sample roster loaded");

    println!();
    println!("== Hash table ({} buckets) ==", registry.hash_table().bucket_count());
    print_buckets(&registry);

    println!();
    println!("== Name tree ==");
    println!("height before balancing: {}", registry.search_tree().height());
    print_names(&registry);
    registry.balance();
    println!("height after balancing: {}", registry.search_tree().height());
    if let Some(root) = registry.search_tree().root() {
        println!("root: {}", root.player().name());
    }

    println!();
    println!("== Leaderboard ==");
    print_leaderboard(&registry);
    Ok(())
}

fn handle_hash(config: &RegistryConfig, keys: &[String]) -> anyhow::Result<()> {
    for key in keys {
        let hash = pearson_hash(key);
        println!("{key}\thash={hash}\tbucket={}", usize::from(hash) % config.bucket_count);
    }
    Ok(())
}

fn handle_import(config: RegistryConfig, file: &Path, view: View, as_json: bool) -> anyhow::Result<()> {
    let raw = std::fs::read_to_string(file).with_context(|| format!("failed to read {}", file.display()))?;
    let records: Vec<PlayerRecord> = serde_json::from_str(&raw).with_context(|| format!("failed to parse {}", file.display()))?;

    let mut registry = PlayerRegistry::with_config(config)?;
    for record in records {
        let player = Player::new(record.uid, record.name).with_score(record.score)?;
        registry.insert(player)?;
    }
    info!(players = registry.len(), file = %file.display(), "imported players");

    if as_json {
        let value = match view {
            View::Buckets => {
                let table = registry.hash_table();
                let buckets: Vec<_> = (0..table.bucket_count())
                    .filter_map(|index| table.bucket(index).map(|bucket| (index, bucket)))
                    .filter(|(_, bucket)| !bucket.is_empty())
                    .map(|(index, bucket)| json!({ "index": index, "players": bucket.iter().collect::<Vec<_>>() }))
                    .collect();
                json!(buckets)
            }
            View::Names => json!(registry.players_by_name()),
            View::Leaderboard => json!(registry.leaderboard()),
        };
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    match view {
        View::Buckets => print_buckets(&registry),
        View::Names => print_names(&registry),
        View::Leaderboard => print_leaderboard(&registry),
    }
    Ok(())
}

fn print_buckets(registry: &PlayerRegistry) {
    for line in registry.hash_table().render() {
        println!("{line}");
    }
    let stats = registry.hash_table().stats();
    println!(
        "entries={} occupied={}/{} longest_chain={} load_factor={:.2}",
        stats.entry_count, stats.occupied_buckets, stats.bucket_count, stats.max_chain_length, stats.load_factor
    );
}

fn print_names(registry: &PlayerRegistry) {
    for line in registry.search_tree().render() {
        println!("{line}");
    }
}

fn print_leaderboard(registry: &PlayerRegistry) {
    for (rank, player) in registry.leaderboard().iter().enumerate() {
        println!("{:>3}. {:<12} {:>6}  ({})", rank + 1, player.name(), player.score(), player.uid());
    }
}

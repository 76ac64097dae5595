//! Settler AI - Skirmish Runner
//!
//! Runs computer players against each other in the sandbox world and
//! prints what they did.

use clap::Parser;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use settler_ai::ai::{load_personality, AiDirector, BehaviorState};
use settler_ai::core::error::Result;
use settler_ai::core::{
    AiConfig, BuildingType, MapPos, Mineral, PlayerIndex, SerfState, SerfType, Terrain,
};
use settler_ai::world::sandbox::WorldCommand;
use settler_ai::world::SandboxWorld;

const MAP_SIZE: u32 = 56;
const MOUNTAIN_COLUMNS: std::ops::RangeInclusive<i32> = 28..=33;
const CASTLE_SLOTS: [MapPos; 4] = [
    MapPos { x: 22, y: 20 },
    MapPos { x: 36, y: 34 },
    MapPos { x: 36, y: 20 },
    MapPos { x: 22, y: 34 },
];
const DEPOSITS: usize = 40;
const MILLIS_PER_TICK: u64 = 20;

/// Settler AI skirmish - computer players compete in a sandbox world
#[derive(Parser, Debug)]
#[command(name = "settler-ai")]
#[command(about = "Run computer players in a sandbox skirmish")]
struct Args {
    /// Random seed for reproducible runs
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Number of ticks to simulate
    #[arg(long, default_value_t = 50_000)]
    ticks: u64,

    /// Players on the map, humans take the first slots
    #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u32).range(2..=4))]
    players: u32,

    /// How many players are passive humans
    #[arg(long, default_value_t = 1)]
    humans: u32,

    /// Personality for every computer player
    #[arg(long, default_value = "balanced")]
    personality: String,

    /// Optional TOML file overriding AI tuning constants
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the summary as JSON
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Log every AI decision
    #[arg(long, default_value_t = false)]
    verbose: bool,
}

#[derive(Debug, Serialize)]
struct PlayerSummary {
    player: u32,
    personality: String,
    stack: Vec<String>,
    delayed: usize,
    attacks: usize,
    buildings: usize,
    flags: usize,
    geologists: usize,
}

#[derive(Debug, Serialize)]
struct Summary {
    seed: u64,
    ticks: u64,
    known_deposits: usize,
    players: Vec<PlayerSummary>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_filter = if args.verbose {
        "settler_ai=debug"
    } else {
        "settler_ai=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    let config = match &args.config {
        Some(path) => AiConfig::load(path)?,
        None => AiConfig::default(),
    };
    let context = load_personality(&args.personality)?;

    let mut world = build_world(args.seed, args.players, args.humans);
    let mut director = AiDirector::new(config)?;

    for index in args.humans.min(args.players)..args.players {
        director.create_initial_state(PlayerIndex(index), context.clone(), BehaviorState::Idle)?;
    }

    tracing::info!(
        "Skirmish with {} players ({} computer) for {} ticks",
        args.players,
        director.players().count(),
        args.ticks
    );

    for tick in 1..=args.ticks {
        for report in world.step(MILLIS_PER_TICK) {
            director.observe_mineral(report.mineral, report.position, report.large);
        }
        director.advance_all(tick, &mut world);
    }

    let summary = summarize(&args, &director, &world);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary);
    }

    Ok(())
}

/// Grass map with a mountain range down the middle and hidden deposits in it
fn build_world(seed: u64, players: u32, humans: u32) -> SandboxWorld {
    let mut world = SandboxWorld::new(MAP_SIZE, MAP_SIZE, seed);
    let mut rng = ChaCha8Rng::seed_from_u64(seed.wrapping_add(1));

    for x in MOUNTAIN_COLUMNS {
        for y in 0..MAP_SIZE as i32 {
            world.set_terrain(MapPos::new(x, y), Terrain::Tundra1);
        }
    }

    for _ in 0..DEPOSITS {
        let pos = MapPos::new(
            rng.gen_range(MOUNTAIN_COLUMNS),
            rng.gen_range(0..MAP_SIZE as i32),
        );
        let mineral = Mineral::ALL[rng.gen_range(0..Mineral::ALL.len())];
        world.add_deposit(pos, mineral, rng.gen_bool(0.4));
    }

    for (index, castle) in CASTLE_SLOTS.iter().take(players as usize).enumerate() {
        let player = world.add_player(index as u32 >= humans);
        world.add_building(player, BuildingType::Castle, *castle);
        if let Some(building) = world.building_mut(*castle) {
            building.knight_count = 12;
        }
        for _ in 0..3 {
            world.add_serf(player, SerfType::Generic, SerfState::IdleInStock);
        }
        if let Some(stats) = world.player_stats_mut(player) {
            stats.total_knights = 12;
            stats.military_score = 12;
        }
    }

    world
}

fn summarize(args: &Args, director: &AiDirector, world: &SandboxWorld) -> Summary {
    let mut players: BTreeMap<PlayerIndex, PlayerSummary> = director
        .players()
        .map(|ai| {
            let summary = PlayerSummary {
                player: ai.index.0,
                personality: ai.context.name.clone(),
                stack: ai.stack.iter().map(|s| s.name().to_string()).collect(),
                delayed: ai.delayed.len(),
                attacks: 0,
                buildings: 0,
                flags: 0,
                geologists: 0,
            };
            (ai.index, summary)
        })
        .collect();

    for command in world.commands() {
        let player = match command {
            WorldCommand::Attack { player, .. }
            | WorldCommand::Build { player, .. }
            | WorldCommand::Flag { player, .. }
            | WorldCommand::Geologist { player, .. } => player,
        };
        let Some(summary) = players.get_mut(player) else {
            continue;
        };
        match command {
            WorldCommand::Attack { .. } => summary.attacks += 1,
            WorldCommand::Build { .. } => summary.buildings += 1,
            WorldCommand::Flag { .. } => summary.flags += 1,
            WorldCommand::Geologist { .. } => summary.geologists += 1,
        }
    }

    Summary {
        seed: args.seed,
        ticks: args.ticks,
        known_deposits: director.memory().len(),
        players: players.into_values().collect(),
    }
}

fn print_summary(summary: &Summary) {
    println!("\n=== SKIRMISH SUMMARY ===");
    println!("Seed: {}  Ticks: {}", summary.seed, summary.ticks);
    println!("Known deposits: {}", summary.known_deposits);
    println!();
    println!(
        "{:<8} {:<12} {:>8} {:>10} {:>6} {:>11}  stack",
        "player", "personality", "attacks", "buildings", "flags", "geologists"
    );
    for p in &summary.players {
        println!(
            "{:<8} {:<12} {:>8} {:>10} {:>6} {:>11}  {}",
            p.player,
            p.personality,
            p.attacks,
            p.buildings,
            p.flags,
            p.geologists,
            p.stack.join(" > ")
        );
    }
}

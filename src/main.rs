//! Delve - headless demo
//!
//! Builds a small quarry, spawns workers, designates a mining area and runs
//! the simulation for a fixed number of ticks.

use std::path::PathBuf;

use clap::Parser;
use serde::Serialize;

use delve::core::config::SimulationConfig;
use delve::core::error::Result;
use delve::core::types::Position;
use delve::ecs::actor::ActorDraft;
use delve::ecs::world::World;
use delve::entity::body::Body;
use delve::entity::worker::WorkerBrain;
use delve::simulation::tick::{run_simulation_tick, SimulationEvent};
use delve::spatial::region::Region;
use delve::world::voxel::Voxel;

/// Headless quarry demo
#[derive(Parser, Debug)]
#[command(name = "delve")]
#[command(about = "Run a headless mining simulation and report what happened")]
struct Args {
    /// Random seed (overrides the config file)
    #[arg(long)]
    seed: Option<u64>,

    /// Number of ticks to run
    #[arg(long, default_value_t = 200)]
    ticks: u64,

    /// Number of workers to spawn
    #[arg(long, default_value_t = 3)]
    workers: u32,

    /// TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print every event as JSON instead of a summary
    #[arg(long)]
    json: bool,
}

/// JSON output structure
#[derive(Serialize)]
struct RunReport {
    seed: u64,
    ticks: u64,
    blocks_mined: usize,
    boulders: usize,
    orders_left: usize,
    events: Vec<SimulationEvent>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "delve=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = match &args.config {
        Some(path) => SimulationConfig::load(path)?,
        None => SimulationConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }

    let mut world = World::new(config)?;
    build_quarry(&mut world);
    spawn_workers(&mut world, args.workers);

    // Dig out the first rock layer
    let designated = world.add_mining_goal(Some(Position::new(2, 0, -2)), Position::new(6, 0, 2))?;
    tracing::info!(orders = designated.len(), "designated mining area");

    let mut events = Vec::new();
    for _ in 0..args.ticks {
        events.extend(run_simulation_tick(&mut world));
        if !world.have_orders() && world.actors().iter().all(|a| a.as_brains().map_or(true, |b| b.is_idle())) {
            tracing::info!(tick = world.current_tick, "all work done");
            break;
        }
    }

    let report = RunReport {
        seed: world.config.seed,
        ticks: world.current_tick,
        blocks_mined: events
            .iter()
            .filter(|e| matches!(e, SimulationEvent::VoxelMined { .. }))
            .count(),
        boulders: world.objects().len(),
        orders_left: world.orders().len(),
        events,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("=== DELVE ===");
        println!("Seed:          {}", report.seed);
        println!("Ticks run:     {}", report.ticks);
        println!("Blocks mined:  {}", report.blocks_mined);
        println!("Boulders:      {}", report.boulders);
        println!("Orders left:   {}", report.orders_left);
    }

    Ok(())
}

/// Rock floor at y = 1 with a rock slab on the walkable layer east of spawn
fn build_quarry(world: &mut World) {
    world.fill(
        Region::from_corners(Position::new(-4, 1, -4), Position::new(8, 1, 4)),
        Voxel::Rock,
    );
    world.fill(
        Region::from_corners(Position::new(2, 0, -2), Position::new(6, 0, 2)),
        Voxel::Rock,
    );
    world.take_terrain_dirty();
}

fn spawn_workers(world: &mut World, count: u32) {
    for i in 0..count {
        let z = i as i32 % 5 - 2;
        world.spawn_actor(
            ActorDraft::new(format!("worker-{i}"))
                .with_position(Position::new(0, 0, z))
                .with_body(Body::humanoid())
                .with_brains(Box::new(WorkerBrain::new())),
        );
    }
}

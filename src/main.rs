//! Tribesim - interactive runner
//!
//! Builds a world from the command line options and drives it from a
//! small stdin command loop.

use std::io::{self, Write};
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use tribesim::core::config::ClockMode;
use tribesim::core::error::Result;
use tribesim::ecs::world::World;
use tribesim::simulation::status::StatusReport;
use tribesim::simulation::tick::{run_simulation_tick, SimulationEvent};
use tribesim::SimulationConfig;

/// Interactive artificial-life simulation
#[derive(Parser, Debug)]
#[command(name = "tribesim")]
#[command(about = "Step a tribal artificial-life world from the terminal")]
struct Args {
    /// TOML config file (defaults are used for missing keys)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Random seed for the world
    #[arg(long)]
    seed: Option<u64>,

    /// Clock driving day/night: realtime or stepped
    #[arg(long)]
    clock: Option<ClockMode>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tribesim=info")))
        .init();

    let args = Args::parse();
    let mut config = match &args.config {
        Some(path) => SimulationConfig::load(path)?,
        None => SimulationConfig::default(),
    };
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if let Some(clock) = args.clock {
        config.cycle.clock = clock;
    }

    let mut world = World::new(config)?;

    println!("\n=== TRIBESIM ===");
    println!();
    println!("Commands:");
    println!("  tick / t        - Advance simulation by one tick");
    println!("  run <n>         - Run n simulation ticks");
    println!("  status / s      - Show detailed status");
    println!("  json            - Show status as JSON");
    println!("  quit / q        - Exit");
    println!();

    loop {
        print!("[tick {} | {} | pop {}] > ", world.current_tick, world.phase().label(), world.population());
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim();

        match input {
            "" => continue,
            "quit" | "q" => break,
            "tick" | "t" => {
                let events = run_simulation_tick(&mut world);
                print_events(&events);
                println!("Tick {} complete.", world.current_tick);
            }
            "status" | "s" => println!("{}", StatusReport::collect(&world)),
            "json" => println!("{}", StatusReport::collect(&world).to_json()?),
            _ => match input.strip_prefix("run ").map(|n| n.trim().parse::<u32>()) {
                Some(Ok(n)) => {
                    println!("Running {} ticks...", n);
                    let mut events = Vec::new();
                    for _ in 0..n {
                        events.extend(run_simulation_tick(&mut world));
                    }
                    print_events(&events);
                    println!("Completed {} ticks. Now at tick {}.", n, world.current_tick);
                }
                Some(Err(_)) => println!("Usage: run <number>"),
                None => println!("Unknown command. Available: tick, run <n>, status, json, quit"),
            },
        }
    }

    println!(
        "\nGoodbye! Final state: {} agents, {} tribes, {} ticks elapsed.",
        world.population(),
        world.tribes.len(),
        world.current_tick
    );
    Ok(())
}

/// One-line summary of what happened
fn print_events(events: &[SimulationEvent]) {
    let mut births = 0;
    let mut deaths = 0;
    let mut kills = 0;
    let mut shelters = 0;
    for event in events {
        match event {
            SimulationEvent::PhaseChanged(phase) => println!("  -- {} --", phase.label()),
            SimulationEvent::ChildBorn { .. } => births += 1,
            SimulationEvent::AgentDied { .. } => deaths += 1,
            SimulationEvent::AgentKilled { .. } => kills += 1,
            SimulationEvent::ShelterBuilt { .. } => shelters += 1,
            SimulationEvent::TribeFounded(id) => println!("  {} founded", id),
            SimulationEvent::TribeSplit { parent, child } => println!("  {} split off {}", child, parent),
        }
    }
    if births + deaths + kills + shelters > 0 {
        println!(
            "  births {}, deaths {}, killed {}, shelters built {}",
            births, deaths, kills, shelters
        );
    }
}

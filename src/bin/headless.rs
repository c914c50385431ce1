//! Headless runner
//!
//! Runs the simulation for a fixed number of ticks on the stepped clock
//! and prints the final status as text or JSON.

use std::path::PathBuf;

use clap::Parser;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use tribesim::core::config::ClockMode;
use tribesim::core::error::Result;
use tribesim::ecs::world::World;
use tribesim::simulation::status::StatusReport;
use tribesim::simulation::tick::{run_simulation_tick, SimulationEvent};
use tribesim::SimulationConfig;

/// Headless runner - batch simulation with a summary at the end
#[derive(Parser, Debug)]
#[command(name = "headless")]
#[command(about = "Run the simulation without a front end and report the outcome")]
struct Args {
    /// Number of ticks to run
    #[arg(long, default_value_t = 10_000)]
    ticks: u64,

    /// TOML config file (defaults are used for missing keys)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Clock driving day/night
    #[arg(long, default_value = "stepped")]
    clock: ClockMode,

    /// Print a status line every N ticks (0 = never)
    #[arg(long, default_value_t = 0)]
    report_every: u64,

    /// Output the final report as JSON
    #[arg(long)]
    json: bool,

    /// Verify shelter and tribe membership after every tick
    #[arg(long)]
    check_invariants: bool,
}

/// Totals over the whole run
#[derive(Debug, Default, Serialize)]
struct RunTotals {
    ticks: u64,
    births: usize,
    deaths: usize,
    kills: usize,
    shelters_built: usize,
    tribes_founded: usize,
    fissions: usize,
}

impl RunTotals {
    fn record(&mut self, events: &[SimulationEvent]) {
        for event in events {
            match event {
                SimulationEvent::PhaseChanged(_) => {}
                SimulationEvent::ChildBorn { .. } => self.births += 1,
                SimulationEvent::AgentDied { .. } => self.deaths += 1,
                SimulationEvent::AgentKilled { .. } => self.kills += 1,
                SimulationEvent::ShelterBuilt { .. } => self.shelters_built += 1,
                SimulationEvent::TribeFounded(_) => self.tribes_founded += 1,
                SimulationEvent::TribeSplit { .. } => self.fissions += 1,
            }
        }
    }
}

#[derive(Serialize)]
struct RunResult {
    seed: Option<u64>,
    totals: RunTotals,
    status: StatusReport,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tribesim=warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let mut config = match &args.config {
        Some(path) => SimulationConfig::load(path)?,
        None => SimulationConfig::default(),
    };
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    config.cycle.clock = args.clock;
    let seed = config.seed;

    let mut world = World::new(config)?;
    let mut totals = RunTotals::default();

    for _ in 0..args.ticks {
        let events = run_simulation_tick(&mut world);
        totals.record(&events);
        totals.ticks += 1;
        if args.check_invariants {
            world.check_invariants()?;
        }

        if args.report_every > 0 && world.current_tick % args.report_every == 0 {
            eprintln!(
                "tick {:>7} {:>5} pop {:>4} shelters {:>3} tribes {:>3} predators {:>2}",
                world.current_tick,
                world.phase().label(),
                world.population(),
                world.shelters.len(),
                world.active_tribes().count(),
                world.predators.len()
            );
        }
        if world.population() == 0 {
            tracing::warn!(tick = world.current_tick, "Population died out");
            break;
        }
    }

    let status = StatusReport::collect(&world);
    if args.json {
        let result = RunResult { seed, totals, status };
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{}", status);
        println!(
            "Run: {} ticks, {} births, {} deaths, {} killed, {} shelters, {} tribes founded, {} fissions",
            totals.ticks,
            totals.births,
            totals.deaths,
            totals.kills,
            totals.shelters_built,
            totals.tribes_founded,
            totals.fissions
        );
    }
    Ok(())
}

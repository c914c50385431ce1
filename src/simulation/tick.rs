//! Tick system - orchestrates simulation updates
//!
//! One tick runs, in order:
//! 1. phase machine (night spawns predators; day clears them, empties
//!    every shelter and replaces the resource field)
//! 2. reproduction pass (night only)
//! 3. agent pass, settling construction as it is reported
//! 4. predator pass; agents that died this tick are still present
//! 5. removal of the killed, then of the remaining dead
//! 6. fission of overcrowded tribes

use crate::city::shelter::Material;
use crate::core::cycle::Phase;
use crate::core::types::{AgentId, ShelterId, TribeId};
use crate::ecs::world::World;
use crate::simulation::behavior::{update_agent, AgentOutcome, Surroundings};
use crate::simulation::housing::settle_build;
use crate::simulation::population::run_reproduction;
use crate::simulation::predation::run_predators;

/// Events generated during simulation tick
///
/// These events are returned by `run_simulation_tick` for logs and
/// front ends.
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationEvent {
    /// The cycle entered a new phase
    PhaseChanged(Phase),
    ChildBorn { child: AgentId, shelter: ShelterId },
    /// Starvation or old age
    AgentDied { agent: AgentId, generation: u32 },
    AgentKilled { agent: AgentId },
    ShelterBuilt { shelter: ShelterId, tribe: TribeId, material: Material },
    TribeFounded(TribeId),
    TribeSplit { parent: TribeId, child: TribeId },
}

/// Advance the world one tick, reading the world clock once
pub fn run_simulation_tick(world: &mut World) -> Vec<SimulationEvent> {
    let now = world.read_clock();
    run_simulation_tick_at(world, now)
}

/// Advance the world one tick at clock reading `now`
pub fn run_simulation_tick_at(world: &mut World, now: f64) -> Vec<SimulationEvent> {
    let mut events = Vec::new();
    world.current_tick += 1;
    world.now = now;

    if let Some(phase) = world.cycle.advance(now) {
        begin_phase(world, phase);
        events.push(SimulationEvent::PhaseChanged(phase));
    }

    for (child, shelter) in run_reproduction(world) {
        events.push(SimulationEvent::ChildBorn { child, shelter });
    }

    let dead = run_agents(world, now, &mut events);
    let killed = run_predators(world);

    for agent in killed {
        if world.despawn_agent(agent).is_some() {
            events.push(SimulationEvent::AgentKilled { agent });
        }
    }
    for agent in dead {
        if let Some(removed) = world.despawn_agent(agent) {
            tracing::debug!(?agent, age = removed.vitals.age, hunger = removed.vitals.hunger, "Agent died");
            events.push(SimulationEvent::AgentDied { agent, generation: removed.generation });
        }
    }

    if world.config.tribe.auto_split {
        let crowded: Vec<TribeId> = world.tribes.values().filter(|t| t.is_overcrowded()).map(|t| t.id).collect();
        for parent in crowded {
            if let Some(child) = world.split_tribe(parent) {
                events.push(SimulationEvent::TribeSplit { parent, child });
            }
        }
    }

    events
}

fn begin_phase(world: &mut World, phase: Phase) {
    match phase {
        Phase::Night => {
            world.spawn_predators();
            tracing::info!(tick = world.current_tick, predators = world.predators.len(), "Night falls");
        }
        Phase::Day => {
            world.predators.clear();
            for shelter in world.shelters.values_mut() {
                shelter.reset_occupants(&mut world.agents);
            }
            world.resources.regenerate(&world.config.resources, &world.config.world, &mut world.rng);
            tracing::info!(tick = world.current_tick, population = world.population(), "Day breaks");
        }
    }
}

/// Update every agent alive at the start of the pass. Returns the agents
/// that died; they stay in the arena until the caller removes them.
fn run_agents(world: &mut World, now: f64, events: &mut Vec<SimulationEvent>) -> Vec<AgentId> {
    let phase = world.phase();
    let ids: Vec<AgentId> = world.agents.keys().collect();
    let mut dead = Vec::new();

    for id in ids {
        let outcome = {
            let Some(agent) = world.agents.get_mut(id) else {
                continue;
            };
            let mut env = Surroundings {
                resources: &mut world.resources,
                shelters: &mut world.shelters,
                predators: &world.predators,
                phase,
                now,
            };
            update_agent(id, agent, &mut env, &world.config, &mut world.rng)
        };

        match outcome {
            AgentOutcome::Alive => {}
            AgentOutcome::Dead => dead.push(id),
            AgentOutcome::BuildShelter { material, position } => {
                if let Some(settled) = settle_build(world, id, material, position) {
                    if settled.founded {
                        events.push(SimulationEvent::TribeFounded(settled.tribe));
                    }
                    events.push(SimulationEvent::ShelterBuilt {
                        shelter: settled.shelter,
                        tribe: settled.tribe,
                        material,
                    });
                }
            }
        }
    }

    dead
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{ClockMode, SimulationConfig};
    use crate::core::types::Vec2;
    use crate::entity::predator::Predator;

    fn world() -> World {
        let mut config = SimulationConfig::default();
        config.seed = Some(3);
        config.cycle.clock = ClockMode::Stepped;
        World::new(config).unwrap()
    }

    #[test]
    fn test_tick_counter_and_clock() {
        let mut world = world();
        let start = world.now;

        run_simulation_tick(&mut world);
        run_simulation_tick(&mut world);

        assert_eq!(world.current_tick, 2);
        assert!(world.now > start);
        world.check_invariants().unwrap();
    }

    #[test]
    fn test_night_spawns_and_day_clears_predators() {
        let mut world = World::empty(world().config).unwrap();
        let start = world.now;

        let events = run_simulation_tick_at(&mut world, start + 30.5);
        assert_eq!(events, vec![SimulationEvent::PhaseChanged(Phase::Night)]);
        assert_eq!(world.predators.len(), 10);

        run_simulation_tick_at(&mut world, start + 40.0);
        assert_eq!(world.predators.len(), 10);

        let events = run_simulation_tick_at(&mut world, start + 51.0);
        assert_eq!(events, vec![SimulationEvent::PhaseChanged(Phase::Day)]);
        assert!(world.predators.is_empty());
        assert_eq!(world.resources.count(crate::simulation::resources::ResourceKind::Bush), 100);
    }

    #[test]
    fn test_starved_agent_is_removed() {
        let mut world = world();
        let victim = world.spawn_agent(Vec2::new(800.0, 800.0));
        world.agents[victim].vitals.hunger = 0.001;
        let now = world.now;

        let events = run_simulation_tick_at(&mut world, now);

        assert!(events.contains(&SimulationEvent::AgentDied { agent: victim, generation: 0 }));
        assert!(!world.agents.contains_key(victim));
        world.check_invariants().unwrap();
    }

    #[test]
    fn test_agent_dying_this_tick_can_still_be_killed() {
        let mut world = World::empty(world().config).unwrap();
        let start = world.now;
        run_simulation_tick_at(&mut world, start + 31.0);
        world.predators.clear();

        let doomed = world.spawn_agent(Vec2::new(200.0, 200.0));
        world.agents[doomed].vitals.hunger = 0.001;
        let bystander = world.spawn_agent(Vec2::new(900.0, 900.0));
        world.predators.push(Predator::new(Vec2::new(203.0, 200.0), &world.config.predator));

        let events = run_simulation_tick_at(&mut world, start + 32.0);

        assert!(events.contains(&SimulationEvent::AgentKilled { agent: doomed }));
        assert!(!events.iter().any(|e| matches!(e, SimulationEvent::AgentDied { agent, .. } if *agent == doomed)));
        assert!(!world.agents.contains_key(doomed));
        assert!(world.agents.contains_key(bystander));
        world.check_invariants().unwrap();
    }

    #[test]
    fn test_build_is_settled_within_tick() {
        let mut world = world();
        let builder = world.spawn_agent(Vec2::new(1200.0, 200.0));
        world.agents[builder].inventory.wood = 10;
        world.agents[builder].inventory.has_pickaxe = true;
        let now = world.now;

        let events = run_simulation_tick_at(&mut world, now);

        let tribe = world.agents[builder].tribe.expect("builder founded a tribe");
        assert!(events.contains(&SimulationEvent::TribeFounded(tribe)));
        assert!(events
            .iter()
            .any(|e| matches!(e, SimulationEvent::ShelterBuilt { material: Material::Wood, .. })));
        world.check_invariants().unwrap();
    }

    #[test]
    fn test_dawn_empties_shelters() {
        let mut world = world();
        let start = world.now;
        run_simulation_tick_at(&mut world, start + 31.0);
        let shelter = world.shelters.keys().next().unwrap();
        let agent = world.spawn_agent(Vec2::new(10.0, 10.0));
        assert!(world.enter_shelter(agent, shelter));
        world.shelters[shelter].has_reproduced = true;

        run_simulation_tick_at(&mut world, start + 52.0);

        assert!(world.shelters[shelter].occupants().is_empty());
        assert!(world.agents[agent].shelter.is_none());
        assert!(!world.shelters[shelter].has_reproduced);
        world.check_invariants().unwrap();
    }
}

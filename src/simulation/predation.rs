//! Predator AI: acquire a target, step towards it, attack on contact
//!
//! Targets are re-resolved every tick. A predator hunts the nearest
//! visible agent outside every shelter; failing that it circles the
//! nearest shelter by heading for a fresh random point on its perimeter
//! circle; with no shelters at all it drifts randomly.

use ahash::AHashSet;
use rand::Rng;
use slotmap::SlotMap;

use crate::city::shelter::Shelter;
use crate::core::config::SimulationConfig;
use crate::core::types::{AgentId, ShelterId, Vec2};
use crate::ecs::world::World;
use crate::entity::agent::Agent;
use crate::entity::predator::{Predator, Target};
use crate::simulation::perception::{nearest_exposed_agent, nearest_shelter};

/// Pick this tick's target for `predator`
pub fn choose_target(
    predator: &Predator,
    agents: &SlotMap<AgentId, Agent>,
    shelters: &SlotMap<ShelterId, Shelter>,
    rng: &mut impl Rng,
) -> Option<Target> {
    if let Some(prey) = nearest_exposed_agent(predator, agents, shelters) {
        return Some(Target::Agent(prey));
    }

    let shelter = &shelters[nearest_shelter(predator.position, shelters)?];
    let radius = shelter.width.max(shelter.height) / 2.0 + 1.0;
    let angle = rng.gen_range(0.0..std::f32::consts::TAU);
    Some(Target::Point(shelter.center().polar_offset(angle, radius)))
}

/// Where a target currently is, if it still exists
pub fn target_position(target: Target, agents: &SlotMap<AgentId, Agent>) -> Option<Vec2> {
    match target {
        Target::Agent(id) => agents.get(id).map(|a| a.position),
        Target::Point(point) => Some(point),
    }
}

/// First unsheltered agent strictly within `contact_radius` that was not
/// already taken this tick
pub fn find_victim(
    position: Vec2,
    contact_radius: f32,
    agents: &SlotMap<AgentId, Agent>,
    taken: &AHashSet<AgentId>,
) -> Option<AgentId> {
    agents
        .iter()
        .find(|(id, a)| !a.is_sheltered() && !taken.contains(id) && a.position.distance(&position) < contact_radius)
        .map(|(id, _)| id)
}

fn drift(predator: &mut Predator, config: &SimulationConfig, rng: &mut impl Rng) {
    let jitter = config.predator.jitter;
    let offset = Vec2::new(rng.gen_range(-jitter..=jitter), rng.gen_range(-jitter..=jitter));
    let (min, max) = config.world_bounds();
    predator.position = (predator.position + offset).clamp(min, max);
}

/// Move and attack with every predator. Returns the agents killed this
/// tick, each at most once; removing them is the caller's job.
pub fn run_predators(world: &mut World) -> Vec<AgentId> {
    let mut taken = AHashSet::new();
    let mut kills = Vec::new();

    for predator in world.predators.iter_mut() {
        predator.target = choose_target(predator, &world.agents, &world.shelters, &mut world.rng);

        match predator.target.and_then(|t| target_position(t, &world.agents)) {
            Some(point) => predator.move_towards(point),
            None => {
                drift(predator, &world.config, &mut world.rng);
                continue;
            }
        }

        let contact = world.config.predator.contact_radius;
        if let Some(victim) = find_victim(predator.position, contact, &world.agents, &taken) {
            tracing::debug!(?victim, x = predator.position.x, y = predator.position.y, "Predator kill");
            taken.insert(victim);
            kills.push(victim);
        }
    }

    kills
}

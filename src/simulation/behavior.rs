//! Per-agent update contract
//!
//! Each tick an agent ages, then runs through a fixed gate:
//! 1. death check (starvation or old age) short-circuits everything
//! 2. at night a sheltered agent only stays put inside its walls
//! 3. by day a sheltered agent walks out first
//! 4. a nearby predator sends the agent into the nearest refuge
//! 5. otherwise one action is chosen, executed and learned from, after
//!    which the agent builds a shelter if it can afford one
//!
//! The agent reports back an [`AgentOutcome`]; removals and construction
//! are applied by the orchestrator.

use rand::Rng;
use slotmap::SlotMap;

use crate::city::shelter::{Material, Shelter};
use crate::core::config::SimulationConfig;
use crate::core::cycle::Phase;
use crate::core::types::{AgentId, ShelterId, Vec2};
use crate::entity::agent::Agent;
use crate::entity::predator::Predator;
use crate::simulation::action_execute::execute_action;
use crate::simulation::action_select::{select_action, selection_probabilities};
use crate::simulation::perception::{nearest_refuge, threat_nearby};
use crate::simulation::resources::ResourceField;

/// What the orchestrator must do with an agent after its update
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AgentOutcome {
    Alive,
    Dead,
    /// Materials were spent; a shelter goes up at `position`
    BuildShelter { material: Material, position: Vec2 },
}

/// The parts of the world an agent reads or mutates during its update
pub struct Surroundings<'a> {
    pub resources: &'a mut ResourceField,
    pub shelters: &'a mut SlotMap<ShelterId, Shelter>,
    pub predators: &'a [Predator],
    pub phase: Phase,
    pub now: f64,
}

pub fn update_agent(
    id: AgentId,
    agent: &mut Agent,
    env: &mut Surroundings<'_>,
    config: &SimulationConfig,
    rng: &mut impl Rng,
) -> AgentOutcome {
    agent.vitals.advance(&config.agent);
    if agent.vitals.is_dead(&config.agent) {
        return AgentOutcome::Dead;
    }

    if let Some(shelter_id) = agent.shelter {
        match env.shelters.get_mut(shelter_id) {
            Some(shelter) if !env.phase.is_day() => {
                agent.position = shelter.clamp_inside(agent.position, config.agent.size);
                return AgentOutcome::Alive;
            }
            Some(shelter) => {
                shelter.leave(id, agent);
            }
            // Stale handle: the agent is effectively outside
            None => agent.shelter = None,
        }
    }

    if threat_nearby(agent.position, env.predators, config.agent.alarm_radius) {
        if let Some(refuge) = nearest_refuge(agent.position, agent.tribe, env.shelters) {
            let entered = env.shelters[refuge].enter(refuge, id, agent, config.agent.size, rng);
            if entered {
                tracing::debug!(?id, ?refuge, "Agent fled into shelter");
                return AgentOutcome::Alive;
            }
        }
    }

    let action = select_action(&agent.memory, rng);
    tracing::trace!(
        ?id,
        action = action.name(),
        odds = selection_probabilities(&agent.memory)[action.index()],
        "Action chosen"
    );
    let outcome = execute_action(action, agent, env.resources, config, rng, env.now);
    tracing::debug!(?id, action = action.name(), ?outcome, "Agent acted");

    match agent.inventory.try_build(&config.building) {
        Some(material) => AgentOutcome::BuildShelter { material, position: agent.position },
        None => AgentOutcome::Alive,
    }
}

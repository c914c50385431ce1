//! Action execution - resolve one chosen action against the world
//!
//! Resource-seeking actions share one rule: nothing visible means nothing
//! happens, a visible item out of reach is approached by one step, and an
//! item within contact range is harvested and rewarded.

use rand::Rng;

use crate::core::config::SimulationConfig;
use crate::core::types::Vec2;
use crate::entity::agent::Agent;
use crate::entity::memory::Action;
use crate::simulation::resources::{ResourceField, ResourceKind};

/// How an action resolved
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ActionOutcome {
    /// Random step taken
    Wandered,
    /// No matching resource in sight; no movement, no reward
    NothingVisible,
    /// Moved one step towards a visible resource
    Approached,
    /// Consumed a resource item
    Harvested(ResourceKind),
    /// Pickaxe made
    Crafted,
    /// Not enough wood, or already holding a pickaxe
    CraftFailed,
    /// Tried to mine without a pickaxe
    MissingTool,
}

impl ActionOutcome {
    /// Reward for this outcome, if it teaches the agent anything
    pub fn reward(&self, config: &SimulationConfig) -> Option<f32> {
        let rewards = &config.rewards;
        match self {
            ActionOutcome::Wandered => Some(rewards.wander),
            ActionOutcome::NothingVisible | ActionOutcome::Approached => None,
            ActionOutcome::Harvested(ResourceKind::Bush) => Some(rewards.eat),
            ActionOutcome::Harvested(ResourceKind::Tree) => Some(rewards.chop),
            ActionOutcome::Harvested(ResourceKind::Stone) => Some(rewards.mine),
            ActionOutcome::Crafted => Some(rewards.craft),
            ActionOutcome::CraftFailed => Some(rewards.craft_failed),
            ActionOutcome::MissingTool => Some(rewards.missing_tool),
        }
    }
}

/// Execute `action` for `agent`, apply its reward and return the outcome
pub fn execute_action(
    action: Action,
    agent: &mut Agent,
    resources: &mut ResourceField,
    config: &SimulationConfig,
    rng: &mut impl Rng,
    now: f64,
) -> ActionOutcome {
    let outcome = match action {
        Action::IdleWander => wander(agent, config, rng),
        Action::CraftTool => {
            if agent.inventory.try_craft_pickaxe(config.building.tool_wood_cost) {
                ActionOutcome::Crafted
            } else {
                ActionOutcome::CraftFailed
            }
        }
        Action::ForageFood => seek(ResourceKind::Bush, agent, resources, config),
        Action::GatherWood => seek(ResourceKind::Tree, agent, resources, config),
        Action::MineStone if !agent.inventory.has_pickaxe => ActionOutcome::MissingTool,
        Action::MineStone => seek(ResourceKind::Stone, agent, resources, config),
    };

    if let Some(reward) = outcome.reward(config) {
        agent.learn(action, reward, now);
    }
    outcome
}

fn wander(agent: &mut Agent, config: &SimulationConfig, rng: &mut impl Rng) -> ActionOutcome {
    let jitter = config.agent.wander_jitter;
    let dx = rng.gen_range(-jitter..=jitter) as f32;
    let dy = rng.gen_range(-jitter..=jitter) as f32;
    let (min, max) = config.world_bounds();
    agent.position = (agent.position + Vec2::new(dx, dy)).clamp(min, max);
    ActionOutcome::Wandered
}

fn seek(kind: ResourceKind, agent: &mut Agent, resources: &mut ResourceField, config: &SimulationConfig) -> ActionOutcome {
    let Some((index, distance)) = resources.nearest_visible(kind, agent.position, agent.perception_radius) else {
        return ActionOutcome::NothingVisible;
    };

    if distance >= config.agent.contact_radius {
        let target = resources.items(kind)[index].position;
        agent.position = agent.position.step_towards(target, config.agent.step);
        return ActionOutcome::Approached;
    }

    if resources.harvest(kind, index).is_none() {
        return ActionOutcome::NothingVisible;
    }
    match kind {
        ResourceKind::Bush => agent.vitals.eat(config.agent.meal_value, &config.agent),
        ResourceKind::Tree => agent.inventory.wood += 1,
        ResourceKind::Stone => agent.inventory.stone += 1,
    }
    ActionOutcome::Harvested(kind)
}

//! The learning, foraging, reproducing actor

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::config::{AgentConfig, BuildingConfig};
use crate::core::types::{ShelterId, TribeId, Vec2};
use crate::city::shelter::Material;
use crate::entity::memory::{Action, ActionMemory, RewardTracker};
use crate::entity::vitals::Vitals;

/// Carried resources and tools
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    pub wood: u32,
    pub stone: u32,
    pub has_pickaxe: bool,
}

impl Inventory {
    /// Spend materials on a shelter if affordable. Wood-only shelters are
    /// checked first, so an agent holding enough for both builds in wood.
    pub fn try_build(&mut self, costs: &BuildingConfig) -> Option<Material> {
        if self.wood >= costs.wood_shelter_cost {
            self.wood -= costs.wood_shelter_cost;
            return Some(Material::Wood);
        }
        if self.wood >= costs.stone_shelter_wood && self.stone >= costs.stone_shelter_stone {
            self.wood -= costs.stone_shelter_wood;
            self.stone -= costs.stone_shelter_stone;
            return Some(Material::Stone);
        }
        None
    }

    /// Turn wood into a pickaxe. Fails without enough wood or when one is
    /// already owned.
    pub fn try_craft_pickaxe(&mut self, wood_cost: u32) -> bool {
        if self.has_pickaxe || self.wood < wood_cost {
            return false;
        }
        self.wood -= wood_cost;
        self.has_pickaxe = true;
        true
    }
}

/// An autonomous actor with vitals, inventory and learned preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    pub position: Vec2,
    pub vitals: Vitals,
    pub inventory: Inventory,
    pub memory: ActionMemory,
    pub rewards: RewardTracker,
    /// Shelter this agent is inside. Mirrored by the shelter's occupant list.
    pub shelter: Option<ShelterId>,
    /// Tribe this agent belongs to. Mirrored by the tribe's member list.
    pub tribe: Option<TribeId>,
    pub generation: u32,
    pub perception_radius: f32,
}

impl Agent {
    /// A founding agent with default memory
    pub fn new(position: Vec2, config: &AgentConfig, now: f64) -> Self {
        Self::with_memory(position, ActionMemory::new(config.memory_min, config.memory_max), 0, config, now)
    }

    pub fn with_memory(position: Vec2, memory: ActionMemory, generation: u32, config: &AgentConfig, now: f64) -> Self {
        Self {
            position,
            vitals: Vitals::newborn(config),
            inventory: Inventory::default(),
            memory,
            rewards: RewardTracker::new(config.reward_window, config.reward_interval, now),
            shelter: None,
            tribe: None,
            generation,
            perception_radius: config.perception_radius,
        }
    }

    /// Derive a child from two parents. The child is born at `self`'s
    /// position into `self`'s tribe; attaching it to the tribe's member
    /// list is the caller's job.
    pub fn offspring(&self, other: &Agent, config: &AgentConfig, rng: &mut impl Rng, now: f64) -> Agent {
        let memory = ActionMemory::inherit(&self.memory, &other.memory, config.inheritance_noise, rng);
        let generation = self.generation.max(other.generation) + 1;
        let mut child = Agent::with_memory(self.position, memory, generation, config, now);
        child.tribe = self.tribe;
        child
    }

    pub fn is_sheltered(&self) -> bool {
        self.shelter.is_some()
    }

    /// Apply a reward: the memory update always happens, the smoothed
    /// metric only samples at its own rate.
    pub fn learn(&mut self, action: Action, reward: f32, now: f64) {
        self.memory.reinforce(action, reward);
        self.rewards.record(reward, now);
    }
}

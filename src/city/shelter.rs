//! Shelters - fixed-capacity refuges that protect occupants at night
//!
//! Membership is stored on both sides: the shelter lists its occupants and
//! every occupant holds the shelter's handle. All mutation goes through
//! `enter`, `leave` and `reset_occupants`, which update both sides together.

use rand::Rng;
use serde::{Deserialize, Serialize};
use slotmap::SlotMap;

use crate::core::config::BuildingConfig;
use crate::core::types::{AgentId, ShelterId, TribeId, Vec2};
use crate::entity::agent::Agent;

/// Building material. Cosmetic only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Material {
    Wood,
    Stone,
}

impl Material {
    pub fn name(&self) -> &'static str {
        match self {
            Material::Wood => "wood",
            Material::Stone => "stone",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shelter {
    /// Top-left corner
    pub position: Vec2,
    pub width: f32,
    pub height: f32,
    pub material: Material,
    pub capacity: usize,
    occupants: Vec<AgentId>,
    /// Set once children were born here; cleared at daybreak
    pub has_reproduced: bool,
    pub tribe: Option<TribeId>,
}

impl Shelter {
    pub fn new(position: Vec2, material: Material, config: &BuildingConfig, tribe: Option<TribeId>) -> Self {
        Self {
            position,
            width: config.shelter_width,
            height: config.shelter_height,
            material,
            capacity: config.shelter_capacity,
            occupants: Vec::with_capacity(config.shelter_capacity),
            has_reproduced: false,
            tribe,
        }
    }

    pub fn occupants(&self) -> &[AgentId] {
        &self.occupants
    }

    pub fn is_occupant(&self, id: AgentId) -> bool {
        self.occupants.contains(&id)
    }

    pub fn has_space(&self) -> bool {
        self.occupants.len() < self.capacity
    }

    pub fn free_places(&self) -> usize {
        self.capacity.saturating_sub(self.occupants.len())
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.position.x + self.width / 2.0, self.position.y + self.height / 2.0)
    }

    /// Admit an agent. No-op when full or already inside; on success the
    /// agent is moved to a random interior point.
    pub fn enter(
        &mut self,
        self_id: ShelterId,
        agent_id: AgentId,
        agent: &mut Agent,
        agent_size: f32,
        rng: &mut impl Rng,
    ) -> bool {
        if !self.has_space() || self.is_occupant(agent_id) {
            return false;
        }
        self.occupants.push(agent_id);
        agent.shelter = Some(self_id);
        agent.position = self.random_interior_point(agent_size, rng);
        true
    }

    /// Voluntary departure. No-op if the agent is not inside.
    pub fn leave(&mut self, agent_id: AgentId, agent: &mut Agent) -> bool {
        if !self.detach(agent_id) {
            return false;
        }
        agent.shelter = None;
        true
    }

    /// Drop an occupant whose agent no longer exists
    pub fn detach(&mut self, agent_id: AgentId) -> bool {
        match self.occupants.iter().position(|&id| id == agent_id) {
            Some(idx) => {
                self.occupants.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Evict everyone and clear the nightly reproduction flag
    pub fn reset_occupants(&mut self, agents: &mut SlotMap<AgentId, Agent>) {
        for id in self.occupants.drain(..) {
            if let Some(agent) = agents.get_mut(id) {
                agent.shelter = None;
            }
        }
        self.has_reproduced = false;
    }

    /// Axis-aligned bounds check, edges inclusive
    pub fn contains(&self, point: Vec2) -> bool {
        self.position.x <= point.x
            && point.x <= self.position.x + self.width
            && self.position.y <= point.y
            && point.y <= self.position.y + self.height
    }

    /// Keep an agent's whole footprint inside the walls
    pub fn clamp_inside(&self, point: Vec2, agent_size: f32) -> Vec2 {
        point.clamp(self.position, self.interior_max(agent_size))
    }

    fn interior_max(&self, agent_size: f32) -> Vec2 {
        Vec2::new(
            (self.position.x + self.width - agent_size).max(self.position.x),
            (self.position.y + self.height - agent_size).max(self.position.y),
        )
    }

    fn random_interior_point(&self, agent_size: f32, rng: &mut impl Rng) -> Vec2 {
        let max = self.interior_max(agent_size);
        Vec2::new(
            rng.gen_range(self.position.x..=max.x),
            rng.gen_range(self.position.y..=max.y),
        )
    }
}

//! Tribe - a social group anchored on a centre point and owning shelters

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use slotmap::SlotMap;

use crate::core::config::TribeConfig;
use crate::core::types::{AgentId, ShelterId, TribeId, Vec2};
use crate::entity::agent::Agent;
use crate::render::colors::Color;

/// Monotonic source of tribe identities, owned by the world
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TribeIdGenerator {
    next: u32,
}

impl TribeIdGenerator {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    pub fn next_id(&mut self) -> TribeId {
        let id = TribeId(self.next);
        self.next += 1;
        id
    }
}

impl Default for TribeIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tribe {
    pub id: TribeId,
    members: Vec<AgentId>,
    /// Anchor point, initially the first shelter's location
    pub center: Vec2,
    pub color: Color,
    /// Membership at which fission becomes possible
    pub max_size: usize,
    shelters: Vec<ShelterId>,
}

impl Tribe {
    /// Found a tribe around `founder`. The founder must not belong to
    /// another tribe; callers detach it first.
    pub fn found(
        id: TribeId,
        founder_id: AgentId,
        founder: &mut Agent,
        center: Vec2,
        color: Color,
        max_size: usize,
    ) -> Self {
        debug_assert!(founder.tribe.is_none(), "founder still belongs to {:?}", founder.tribe);
        let mut tribe = Self {
            id,
            members: Vec::new(),
            center,
            color,
            max_size,
            shelters: Vec::new(),
        };
        tribe.add_member(founder_id, founder);
        tribe
    }

    pub fn members(&self) -> &[AgentId] {
        &self.members
    }

    pub fn shelters(&self) -> &[ShelterId] {
        &self.shelters
    }

    pub fn is_member(&self, id: AgentId) -> bool {
        self.members.contains(&id)
    }

    pub fn population(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Add a member and point its back-reference here. No-op for members.
    pub fn add_member(&mut self, id: AgentId, agent: &mut Agent) -> bool {
        if self.is_member(id) {
            return false;
        }
        self.members.push(id);
        agent.tribe = Some(self.id);
        true
    }

    /// Remove a member and clear its back-reference. No-op for strangers.
    pub fn remove_member(&mut self, id: AgentId, agent: &mut Agent) -> bool {
        if !self.detach(id) {
            return false;
        }
        agent.tribe = None;
        true
    }

    /// Drop a member whose agent no longer exists
    pub fn detach(&mut self, id: AgentId) -> bool {
        match self.members.iter().position(|&m| m == id) {
            Some(idx) => {
                self.members.remove(idx);
                true
            }
            None => false,
        }
    }

    pub fn claim_shelter(&mut self, shelter: ShelterId) {
        if !self.shelters.contains(&shelter) {
            self.shelters.push(shelter);
        }
    }

    /// Point near the centre where a member raises a new shelter: the
    /// centre offset by a uniform integer in `[-spread, spread]` per axis
    pub fn build_position(&self, config: &TribeConfig, rng: &mut impl Rng) -> Vec2 {
        let spread = config.build_spread;
        Vec2::new(
            self.center.x + rng.gen_range(-spread..=spread) as f32,
            self.center.y + rng.gen_range(-spread..=spread) as f32,
        )
    }

    pub fn is_overcrowded(&self) -> bool {
        self.members.len() >= self.max_size
    }

    pub fn average_age(&self, agents: &SlotMap<AgentId, Agent>) -> f32 {
        let ages: Vec<f32> = self
            .members
            .iter()
            .filter_map(|&id| agents.get(id))
            .map(|a| a.vitals.age)
            .collect();
        if ages.is_empty() {
            return 0.0;
        }
        ages.iter().sum::<f32>() / ages.len() as f32
    }

    /// Split off half the membership (rounded down) into a new tribe
    /// anchored at a random offset from this tribe's centre.
    ///
    /// Each seceding member is removed from this tribe before it is added
    /// to the new one, so no agent ever belongs to both. Returns `None`
    /// when the tribe is below its size threshold.
    pub fn split(
        &mut self,
        child_id: TribeId,
        agents: &mut SlotMap<AgentId, Agent>,
        config: &TribeConfig,
        rng: &mut impl Rng,
    ) -> Option<Tribe> {
        if !self.is_overcrowded() {
            return None;
        }

        let split_count = self.members.len() / 2;
        let seceding: Vec<AgentId> = self.members.choose_multiple(rng, split_count).copied().collect();

        let angle = rng.gen_range(0.0..std::f32::consts::TAU);
        let distance = rng.gen_range(config.split_min_distance..=config.split_max_distance);
        let center = self.center.polar_offset(angle, distance);
        let color = Color::random_tribe_color(rng);

        let (&founder_id, rest) = seceding.split_first()?;
        let founder = agents.get_mut(founder_id)?;
        self.remove_member(founder_id, founder);
        let mut child = Tribe::found(child_id, founder_id, founder, center, color, self.max_size);

        for &id in rest {
            if let Some(agent) = agents.get_mut(id) {
                self.remove_member(id, agent);
                child.add_member(id, agent);
            }
        }

        Some(child)
    }
}

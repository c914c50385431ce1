//! World - owns every entity collection and the membership operations
//!
//! Agents and shelters live in generational arenas, tribes in an ordered
//! map. Every operation that changes agent↔shelter or agent↔tribe
//! membership goes through this type (or the shelter/tribe methods it
//! wraps) so both sides of each relation stay in agreement.

use std::collections::BTreeMap;

use ahash::AHashSet;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use slotmap::SlotMap;

use crate::city::shelter::{Material, Shelter};
use crate::core::config::SimulationConfig;
use crate::core::cycle::{clock_for, Clock, DayNightCycle, Phase};
use crate::core::error::{Result, SimError};
use crate::core::types::{AgentId, ShelterId, Tick, TribeId, Vec2};
use crate::entity::agent::Agent;
use crate::entity::predator::Predator;
use crate::render::colors::Color;
use crate::simulation::resources::ResourceField;
use crate::social::tribe::{Tribe, TribeIdGenerator};

/// The simulated world
pub struct World {
    pub config: SimulationConfig,
    pub current_tick: Tick,
    pub agents: SlotMap<AgentId, Agent>,
    pub shelters: SlotMap<ShelterId, Shelter>,
    pub tribes: BTreeMap<TribeId, Tribe>,
    pub predators: Vec<Predator>,
    pub resources: ResourceField,
    pub cycle: DayNightCycle,
    pub rng: ChaCha8Rng,
    /// Clock reading of the latest tick, in seconds
    pub now: f64,
    tribe_ids: TribeIdGenerator,
    clock: Box<dyn Clock>,
}

impl World {
    /// Build the starting world described by `config`: a full resource
    /// field, the seed agents and the optional starter shelter.
    pub fn new(config: SimulationConfig) -> Result<Self> {
        let clock = clock_for(&config.cycle);
        Self::with_clock(config, clock)
    }

    /// Like [`World::new`] with an explicit time source
    pub fn with_clock(config: SimulationConfig, clock: Box<dyn Clock>) -> Result<Self> {
        let mut world = Self::empty_with_clock(config, clock)?;
        world.resources = ResourceField::generate(&world.config.resources, &world.config.world, &mut world.rng);

        let seeds: Vec<Vec2> = world.config.seeding.agents.iter().map(|&p| Vec2::from(p)).collect();
        for position in seeds {
            world.spawn_agent(position);
        }
        if let Some(corner) = world.config.seeding.shelter {
            world.spawn_shelter(Vec2::from(corner), Material::Wood, None);
        }

        tracing::info!(
            agents = world.agents.len(),
            shelters = world.shelters.len(),
            seed = ?world.config.seed,
            "World created"
        );
        Ok(world)
    }

    /// A world with no agents, shelters or resources
    pub fn empty(config: SimulationConfig) -> Result<Self> {
        let clock = clock_for(&config.cycle);
        Self::empty_with_clock(config, clock)
    }

    pub fn empty_with_clock(config: SimulationConfig, mut clock: Box<dyn Clock>) -> Result<Self> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        let now = clock.now();
        Ok(Self {
            cycle: DayNightCycle::new(&config.cycle, now),
            config,
            current_tick: 0,
            agents: SlotMap::with_key(),
            shelters: SlotMap::with_key(),
            tribes: BTreeMap::new(),
            predators: Vec::new(),
            resources: ResourceField::new(),
            rng,
            now,
            tribe_ids: TribeIdGenerator::new(),
            clock,
        })
    }

    /// Read the world clock
    pub fn read_clock(&mut self) -> f64 {
        self.clock.now()
    }

    pub fn phase(&self) -> Phase {
        self.cycle.phase()
    }

    pub fn is_day(&self) -> bool {
        self.cycle.is_day()
    }

    pub fn population(&self) -> usize {
        self.agents.len()
    }

    pub fn tribe(&self, id: TribeId) -> Option<&Tribe> {
        self.tribes.get(&id)
    }

    /// Tribes that still have members
    pub fn active_tribes(&self) -> impl Iterator<Item = &Tribe> + '_ {
        self.tribes.values().filter(|t| !t.is_empty())
    }

    // === SPAWNING ===

    /// Spawn a first-generation agent with default memory
    pub fn spawn_agent(&mut self, position: Vec2) -> AgentId {
        let agent = Agent::new(position, &self.config.agent, self.now);
        self.insert_agent(agent)
    }

    /// Insert a prepared agent. An agent arriving with a tribe tag is
    /// registered in that tribe's member list; it must not be sheltered.
    pub fn insert_agent(&mut self, mut agent: Agent) -> AgentId {
        let tribe = agent.tribe.take();
        agent.shelter = None;
        let id = self.agents.insert(agent);
        if let Some(tribe) = tribe.and_then(|t| self.tribes.get_mut(&t)) {
            tribe.add_member(id, &mut self.agents[id]);
        }
        id
    }

    /// Place a shelter; a tagged shelter is appended to its tribe's list
    pub fn spawn_shelter(&mut self, position: Vec2, material: Material, tribe: Option<TribeId>) -> ShelterId {
        let tribe = tribe.filter(|t| self.tribes.contains_key(t));
        let id = self.shelters.insert(Shelter::new(position, material, &self.config.building, tribe));
        if let Some(owner) = tribe.and_then(|t| self.tribes.get_mut(&t)) {
            owner.claim_shelter(id);
        }
        id
    }

    /// Release this night's predators at random positions
    pub fn spawn_predators(&mut self) {
        let (width, height) = (self.config.world.width, self.config.world.height);
        for _ in 0..self.config.predator.count {
            let predator = Predator::spawn_random(width, height, &self.config.predator, &mut self.rng);
            self.predators.push(predator);
        }
    }

    /// Remove an agent, detaching it from its shelter and tribe first
    pub fn despawn_agent(&mut self, id: AgentId) -> Option<Agent> {
        let agent = self.agents.remove(id)?;
        if let Some(shelter) = agent.shelter.and_then(|s| self.shelters.get_mut(s)) {
            shelter.detach(id);
        }
        if let Some(tribe) = agent.tribe.and_then(|t| self.tribes.get_mut(&t)) {
            tribe.detach(id);
        }
        Some(agent)
    }

    // === SHELTER MEMBERSHIP ===

    /// Move an agent into a shelter. Fails when full, when either handle is
    /// stale or when the agent is already inside some shelter.
    pub fn enter_shelter(&mut self, agent_id: AgentId, shelter_id: ShelterId) -> bool {
        let (Some(agent), Some(shelter)) = (self.agents.get_mut(agent_id), self.shelters.get_mut(shelter_id)) else {
            return false;
        };
        if agent.shelter.is_some() {
            return false;
        }
        shelter.enter(shelter_id, agent_id, agent, self.config.agent.size, &mut self.rng)
    }

    pub fn leave_shelter(&mut self, agent_id: AgentId) -> bool {
        let Some(agent) = self.agents.get_mut(agent_id) else {
            return false;
        };
        match agent.shelter.and_then(|s| self.shelters.get_mut(s)) {
            Some(shelter) => shelter.leave(agent_id, agent),
            None => agent.shelter.take().is_some(),
        }
    }

    // === TRIBE MEMBERSHIP ===

    /// Found a tribe around `founder` anchored at `center`. The founder
    /// leaves any previous tribe first.
    pub fn found_tribe(&mut self, founder: AgentId, center: Vec2) -> Option<TribeId> {
        if !self.agents.contains_key(founder) {
            return None;
        }
        self.leave_tribe(founder);

        let id = self.tribe_ids.next_id();
        let color = Color::random_tribe_color(&mut self.rng);
        let tribe = Tribe::found(id, founder, &mut self.agents[founder], center, color, self.config.tribe.max_size);
        self.tribes.insert(id, tribe);
        tracing::info!(tribe = %id, x = center.x, y = center.y, "Tribe founded");
        Some(id)
    }

    /// Move an agent into `tribe`, leaving its previous tribe first.
    /// Returns false when it already belongs there or a handle is stale.
    pub fn join_tribe(&mut self, agent_id: AgentId, tribe: TribeId) -> bool {
        let Some(agent) = self.agents.get(agent_id) else {
            return false;
        };
        if agent.tribe == Some(tribe) || !self.tribes.contains_key(&tribe) {
            return false;
        }
        self.leave_tribe(agent_id);
        match self.tribes.get_mut(&tribe) {
            Some(target) => target.add_member(agent_id, &mut self.agents[agent_id]),
            None => false,
        }
    }

    pub fn leave_tribe(&mut self, agent_id: AgentId) -> bool {
        let Some(agent) = self.agents.get_mut(agent_id) else {
            return false;
        };
        match agent.tribe.and_then(|t| self.tribes.get_mut(&t)) {
            Some(tribe) => tribe.remove_member(agent_id, agent),
            None => agent.tribe.take().is_some(),
        }
    }

    /// Split an overcrowded tribe in two. Returns the new tribe's id, or
    /// `None` if the tribe is unknown or below its size threshold.
    pub fn split_tribe(&mut self, tribe: TribeId) -> Option<TribeId> {
        if !self.tribes.get(&tribe)?.is_overcrowded() {
            return None;
        }
        let child_id = self.tribe_ids.next_id();
        let parent = self.tribes.get_mut(&tribe)?;
        let child = parent.split(child_id, &mut self.agents, &self.config.tribe, &mut self.rng)?;
        tracing::info!(
            parent = %tribe,
            child = %child_id,
            parent_members = parent.population(),
            child_members = child.population(),
            "Tribe split"
        );
        self.tribes.insert(child_id, child);
        Some(child_id)
    }

    // === INVARIANTS ===

    /// Verify shelter capacity and the two bidirectional memberships
    pub fn check_invariants(&self) -> Result<()> {
        let fail = |msg: String| Err(SimError::Invariant(msg));

        for (sid, shelter) in &self.shelters {
            if shelter.occupants().len() > shelter.capacity {
                return fail(format!("shelter {:?} holds {} > {}", sid, shelter.occupants().len(), shelter.capacity));
            }
            let mut seen = AHashSet::new();
            for &aid in shelter.occupants() {
                if !seen.insert(aid) {
                    return fail(format!("agent {:?} listed twice in shelter {:?}", aid, sid));
                }
                match self.agents.get(aid) {
                    Some(agent) if agent.shelter == Some(sid) => {}
                    Some(agent) => {
                        return fail(format!("occupant {:?} of {:?} points at {:?}", aid, sid, agent.shelter));
                    }
                    None => return fail(format!("shelter {:?} lists missing agent {:?}", sid, aid)),
                }
            }
        }

        let mut tribed = AHashSet::new();
        for (tid, tribe) in &self.tribes {
            for &aid in tribe.members() {
                if !tribed.insert(aid) {
                    return fail(format!("agent {:?} appears in more than one member list", aid));
                }
                match self.agents.get(aid) {
                    Some(agent) if agent.tribe == Some(*tid) => {}
                    Some(agent) => return fail(format!("member {:?} of {} points at {:?}", aid, tid, agent.tribe)),
                    None => return fail(format!("tribe {} lists missing agent {:?}", tid, aid)),
                }
            }
            for &sid in tribe.shelters() {
                match self.shelters.get(sid) {
                    Some(shelter) if shelter.tribe == Some(*tid) => {}
                    _ => return fail(format!("tribe {} owns untagged shelter {:?}", tid, sid)),
                }
            }
        }

        for (aid, agent) in &self.agents {
            if let Some(sid) = agent.shelter {
                match self.shelters.get(sid) {
                    Some(shelter) if shelter.is_occupant(aid) => {
                        if !shelter.contains(agent.position) {
                            return fail(format!("sheltered agent {:?} stands outside {:?}", aid, sid));
                        }
                    }
                    _ => return fail(format!("agent {:?} claims shelter {:?} without membership", aid, sid)),
                }
            }
            if agent.tribe.is_some() && !tribed.contains(&aid) {
                return fail(format!("agent {:?} claims {:?} without membership", aid, agent.tribe));
            }
        }

        Ok(())
    }
}

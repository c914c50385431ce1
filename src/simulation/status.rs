//! Status projection - aggregated read-only view of the world
//!
//! Recomputed from scratch on every call; nothing here feeds back into
//! the simulation.

use std::fmt;

use serde::Serialize;

use crate::core::cycle::Phase;
use crate::core::error::Result;
use crate::core::types::{Tick, TribeId};
use crate::ecs::world::World;
use crate::entity::memory::Action;
use crate::simulation::resources::ResourceKind;

/// Hunger below this counts as hungry
pub const HUNGRY_BELOW: f32 = 30.0;
/// Agents at or past this age are elders, not adults
pub const ELDER_AGE: f32 = 80.0;

#[derive(Debug, Clone, Serialize)]
pub struct TribeStatus {
    pub id: TribeId,
    pub members: usize,
    pub shelters: usize,
    pub average_age: f32,
    pub color: [u8; 3],
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub tick: Tick,
    pub phase: Phase,
    pub population: usize,
    pub children: usize,
    pub adults: usize,
    pub hungry: usize,
    pub sheltered: usize,
    pub average_age: f32,
    pub average_hunger: f32,
    pub average_reward: f32,
    pub max_generation: u32,
    /// Action with the largest summed memory weight across all agents
    pub top_action: Option<Action>,
    pub shelters: usize,
    pub free_places: usize,
    pub tribes_total: usize,
    pub tribes_active: usize,
    pub tribes: Vec<TribeStatus>,
    pub predators: usize,
    pub trees: usize,
    pub stones: usize,
    pub bushes: usize,
}

fn mean(sum: f32, count: usize) -> f32 {
    if count == 0 {
        0.0
    } else {
        sum / count as f32
    }
}

impl StatusReport {
    pub fn collect(world: &World) -> Self {
        let adult_age = world.config.agent.adult_age;
        let agents = world.agents.values();
        let population = world.agents.len();

        let mut children = 0;
        let mut adults = 0;
        let mut hungry = 0;
        let mut sheltered = 0;
        let mut age_sum = 0.0;
        let mut hunger_sum = 0.0;
        let mut reward_sum = 0.0;
        let mut max_generation = 0;
        let mut weight_sums = [0.0f32; Action::COUNT];

        for agent in agents {
            let age = agent.vitals.age;
            if age < adult_age {
                children += 1;
            } else if age < ELDER_AGE {
                adults += 1;
            }
            if agent.vitals.hunger < HUNGRY_BELOW {
                hungry += 1;
            }
            if agent.is_sheltered() {
                sheltered += 1;
            }
            age_sum += age;
            hunger_sum += agent.vitals.hunger;
            reward_sum += agent.rewards.average();
            max_generation = max_generation.max(agent.generation);
            for (sum, weight) in weight_sums.iter_mut().zip(agent.memory.weights()) {
                *sum += weight;
            }
        }

        let top_action = if population == 0 {
            None
        } else {
            Action::ALL
                .into_iter()
                .fold(None, |best: Option<Action>, action| match best {
                    Some(b) if weight_sums[b.index()] >= weight_sums[action.index()] => Some(b),
                    _ => Some(action),
                })
        };

        let tribes: Vec<TribeStatus> = world
            .tribes
            .values()
            .map(|t| TribeStatus {
                id: t.id,
                members: t.population(),
                shelters: t.shelters().len(),
                average_age: t.average_age(&world.agents),
                color: t.color.to_rgb8(),
            })
            .collect();

        Self {
            tick: world.current_tick,
            phase: world.phase(),
            population,
            children,
            adults,
            hungry,
            sheltered,
            average_age: mean(age_sum, population),
            average_hunger: mean(hunger_sum, population),
            average_reward: mean(reward_sum, population),
            max_generation,
            top_action,
            shelters: world.shelters.len(),
            free_places: world.shelters.values().map(|s| s.free_places()).sum(),
            tribes_total: tribes.len(),
            tribes_active: tribes.iter().filter(|t| t.members > 0).count(),
            tribes,
            predators: world.predators.len(),
            trees: world.resources.count(ResourceKind::Tree),
            stones: world.resources.count(ResourceKind::Stone),
            bushes: world.resources.count(ResourceKind::Bush),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for StatusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Tick {} | {} ===", self.tick, self.phase.label())?;
        writeln!(
            f,
            "Population: {} (children {}, adults {}, hungry {}, sheltered {})",
            self.population, self.children, self.adults, self.hungry, self.sheltered
        )?;
        writeln!(
            f,
            "Averages: age {:.1}, hunger {:.1}, reward {:.2}; max generation {}",
            self.average_age, self.average_hunger, self.average_reward, self.max_generation
        )?;
        match self.top_action {
            Some(action) => writeln!(f, "Top action: {}", action.name())?,
            None => writeln!(f, "Top action: -")?,
        }
        writeln!(f, "Shelters: {} ({} free places)", self.shelters, self.free_places)?;
        writeln!(f, "Tribes: {} ({} active)", self.tribes_total, self.tribes_active)?;
        for tribe in &self.tribes {
            writeln!(
                f,
                "  {}: {} members, {} shelters, avg age {:.1}",
                tribe.id, tribe.members, tribe.shelters, tribe.average_age
            )?;
        }
        writeln!(f, "Predators: {}", self.predators)?;
        write!(f, "Resources: {} trees, {} stones, {} bushes", self.trees, self.stones, self.bushes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::city::shelter::Material;
    use crate::core::config::{ClockMode, SimulationConfig};
    use crate::core::types::Vec2;

    fn world() -> World {
        let mut config = SimulationConfig::default();
        config.seed = Some(77);
        config.cycle.clock = ClockMode::Stepped;
        World::empty(config).unwrap()
    }

    #[test]
    fn test_empty_world() {
        let report = StatusReport::collect(&world());
        assert_eq!(report.population, 0);
        assert_eq!(report.average_age, 0.0);
        assert!(report.top_action.is_none());
        assert_eq!(report.phase, Phase::Day);
    }

    #[test]
    fn test_counts() {
        let mut world = world();
        let child = world.spawn_agent(Vec2::new(10.0, 10.0));
        let adult = world.spawn_agent(Vec2::new(20.0, 10.0));
        let elder = world.spawn_agent(Vec2::new(30.0, 10.0));
        world.agents[child].vitals.age = 5.0;
        world.agents[adult].vitals.age = 30.0;
        world.agents[adult].vitals.hunger = 10.0;
        world.agents[elder].vitals.age = 85.0;
        world.agents[elder].memory.reinforce(Action::GatherWood, 10.0);

        let tribe = world.found_tribe(adult, Vec2::new(20.0, 10.0)).unwrap();
        let sid = world.spawn_shelter(Vec2::new(0.0, 0.0), Material::Wood, Some(tribe));
        world.enter_shelter(child, sid);

        let report = StatusReport::collect(&world);

        assert_eq!(report.population, 3);
        assert_eq!(report.children, 1);
        assert_eq!(report.adults, 1);
        assert_eq!(report.hungry, 1);
        assert_eq!(report.sheltered, 1);
        assert_eq!(report.average_age, 40.0);
        assert_eq!(report.top_action, Some(Action::GatherWood));
        assert_eq!(report.free_places, 3);
        assert_eq!(report.tribes_active, 1);
        assert_eq!(report.tribes[0].members, 1);
        assert_eq!(report.tribes[0].shelters, 1);
    }

    #[test]
    fn test_text_and_json() {
        let mut world = world();
        world.spawn_agent(Vec2::new(10.0, 10.0));
        let report = StatusReport::collect(&world);

        let text = report.to_string();
        assert!(text.contains("Population: 1"));
        assert!(text.contains("DAY"));

        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(json["population"], 1);
        assert_eq!(json["phase"], "Day");
    }
}

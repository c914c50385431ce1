//! Population growth system
//!
//! At night every shelter holding at least two adults produces one or two
//! children, once per night.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::core::types::{AgentId, ShelterId};
use crate::ecs::world::World;

/// Adult occupants of a shelter, in occupancy order
pub fn adult_occupants(world: &World, shelter: ShelterId) -> Vec<AgentId> {
    let Some(shelter) = world.shelters.get(shelter) else {
        return Vec::new();
    };
    shelter
        .occupants()
        .iter()
        .copied()
        .filter(|&id| world.agents.get(id).is_some_and(|a| a.vitals.is_adult(&world.config.agent)))
        .collect()
}

/// Run the nightly reproduction pass. Returns each child with the shelter
/// it was born in. Does nothing by day.
pub fn run_reproduction(world: &mut World) -> Vec<(AgentId, ShelterId)> {
    let mut births = Vec::new();
    if world.is_day() {
        return births;
    }

    let shelter_ids: Vec<ShelterId> = world.shelters.keys().collect();
    for sid in shelter_ids {
        if world.shelters.get(sid).map_or(true, |s| s.has_reproduced) {
            continue;
        }
        let adults = adult_occupants(world, sid);
        if adults.len() < 2 {
            continue;
        }

        let (min, max) = (world.config.reproduction.min_children, world.config.reproduction.max_children);
        let count = world.rng.gen_range(min..=max);
        for _ in 0..count {
            let parents: Vec<AgentId> = adults.choose_multiple(&mut world.rng, 2).copied().collect();
            let (Some(first), Some(second)) = (world.agents.get(parents[0]), world.agents.get(parents[1])) else {
                continue;
            };
            let child = first.offspring(second, &world.config.agent, &mut world.rng, world.now);
            let generation = child.generation;

            let child_id = world.insert_agent(child);
            world.enter_shelter(child_id, sid);
            tracing::debug!(child = ?child_id, shelter = ?sid, generation, "Child born");
            births.push((child_id, sid));
        }

        if let Some(shelter) = world.shelters.get_mut(sid) {
            shelter.has_reproduced = true;
        }
    }

    births
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::city::shelter::Material;
    use crate::core::config::{ClockMode, SimulationConfig};
    use crate::core::cycle::Phase;
    use crate::core::types::Vec2;

    fn night_world() -> World {
        let mut config = SimulationConfig::default();
        config.seed = Some(12);
        config.cycle.clock = ClockMode::Stepped;
        let mut world = World::empty(config).unwrap();
        let far_future = world.now + world.config.cycle.day_seconds + 1.0;
        assert_eq!(world.cycle.advance(far_future), Some(Phase::Night));
        world
    }

    fn adult(world: &mut World, shelter: ShelterId) -> AgentId {
        let id = world.spawn_agent(Vec2::new(0.0, 0.0));
        world.agents[id].vitals.age = 25.0;
        assert!(world.enter_shelter(id, shelter));
        id
    }

    #[test]
    fn test_two_adults_have_children_once_per_night() {
        let mut world = night_world();
        let sid = world.spawn_shelter(Vec2::new(100.0, 100.0), Material::Wood, None);
        adult(&mut world, sid);
        adult(&mut world, sid);

        let births = run_reproduction(&mut world);

        assert!((1..=2).contains(&births.len()));
        assert_eq!(world.population(), 2 + births.len());
        assert_eq!(world.shelters[sid].occupants().len(), 2 + births.len());
        assert!(world.shelters[sid].has_reproduced);
        for &(child, shelter) in &births {
            assert_eq!(shelter, sid);
            assert_eq!(world.agents[child].shelter, Some(sid));
            assert_eq!(world.agents[child].generation, 1);
        }

        assert!(run_reproduction(&mut world).is_empty());
        world.check_invariants().unwrap();
    }

    #[test]
    fn test_children_join_first_parent_tribe() {
        let mut world = night_world();
        let a = world.spawn_agent(Vec2::new(100.0, 100.0));
        let tribe = world.found_tribe(a, Vec2::new(100.0, 100.0)).unwrap();
        let sid = world.spawn_shelter(Vec2::new(100.0, 100.0), Material::Wood, Some(tribe));
        world.agents[a].vitals.age = 30.0;
        world.enter_shelter(a, sid);
        let b = adult(&mut world, sid);
        world.join_tribe(b, tribe);

        let births = run_reproduction(&mut world);

        for (child, _) in births {
            assert_eq!(world.agents[child].tribe, Some(tribe));
            assert!(world.tribes[&tribe].is_member(child));
        }
        world.check_invariants().unwrap();
    }

    #[test]
    fn test_children_and_lone_adults_do_not_reproduce() {
        let mut world = night_world();
        let sid = world.spawn_shelter(Vec2::new(100.0, 100.0), Material::Wood, None);
        adult(&mut world, sid);
        let young = world.spawn_agent(Vec2::new(0.0, 0.0));
        world.enter_shelter(young, sid);

        assert!(run_reproduction(&mut world).is_empty());
        assert!(!world.shelters[sid].has_reproduced);
    }

    #[test]
    fn test_no_reproduction_by_day() {
        let mut config = SimulationConfig::default();
        config.cycle.clock = ClockMode::Stepped;
        let mut world = World::empty(config).unwrap();
        let sid = world.spawn_shelter(Vec2::new(100.0, 100.0), Material::Wood, None);
        adult(&mut world, sid);
        adult(&mut world, sid);

        assert!(run_reproduction(&mut world).is_empty());
    }
}

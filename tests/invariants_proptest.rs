//! Property tests for the membership and learning invariants

use proptest::prelude::*;

use tribesim::city::Material;
use tribesim::core::types::Vec2;
use tribesim::entity::{Action, ActionMemory};
use tribesim::{SimulationConfig, World};

fn world(seed: u64) -> World {
    let mut config = SimulationConfig::default();
    config.seed = Some(seed);
    World::empty(config).unwrap()
}

proptest! {
    #[test]
    fn memory_weights_stay_clamped(rewards in prop::collection::vec((0usize..Action::COUNT, -50.0f32..50.0), 0..200)) {
        let mut memory = ActionMemory::new(-5.0, 10.0);
        for (index, reward) in rewards {
            let weight = memory.reinforce(Action::ALL[index], reward);
            prop_assert!((-5.0..=10.0).contains(&weight));
        }
        for &w in memory.weights() {
            prop_assert!((-5.0..=10.0).contains(&w));
        }
    }

    #[test]
    fn shelter_never_exceeds_capacity(ops in prop::collection::vec((0usize..8, any::<bool>()), 0..120), seed in any::<u64>()) {
        let mut world = world(seed);
        let shelter = world.spawn_shelter(Vec2::new(300.0, 300.0), Material::Wood, None);
        let agents: Vec<_> = (0..8).map(|i| world.spawn_agent(Vec2::new(100.0 + i as f32 * 10.0, 100.0))).collect();
        let capacity = world.shelters[shelter].capacity;

        for (index, enter) in ops {
            let id = agents[index];
            if enter {
                let was_inside = world.shelters[shelter].is_occupant(id);
                let entered = world.enter_shelter(id, shelter);
                // A second entry never duplicates the occupant
                prop_assert!(!(was_inside && entered));
            } else {
                world.leave_shelter(id);
            }

            let occupants = world.shelters[shelter].occupants();
            prop_assert!(occupants.len() <= capacity);
            for &occupant in occupants {
                prop_assert_eq!(occupants.iter().filter(|&&o| o == occupant).count(), 1);
                prop_assert_eq!(world.agents[occupant].shelter, Some(shelter));
            }
            prop_assert!(world.check_invariants().is_ok());
        }
    }

    #[test]
    fn fission_partitions_members(n in 15usize..60, seed in any::<u64>()) {
        let mut world = world(seed);
        let founder = world.spawn_agent(Vec2::new(800.0, 500.0));
        let tribe = world.found_tribe(founder, Vec2::new(800.0, 500.0)).unwrap();
        for i in 1..n {
            let id = world.spawn_agent(Vec2::new(800.0 + i as f32, 500.0));
            prop_assert!(world.join_tribe(id, tribe));
        }
        let mut before: Vec<_> = world.tribes[&tribe].members().to_vec();

        let child = world.split_tribe(tribe).unwrap();

        let parent_members = world.tribes[&tribe].members().to_vec();
        let child_members = world.tribes[&child].members().to_vec();
        prop_assert_eq!(child_members.len(), n / 2);
        prop_assert_eq!(parent_members.len(), n - n / 2);
        prop_assert!(child_members.iter().all(|id| !parent_members.contains(id)));
        for id in &child_members {
            prop_assert_eq!(world.agents[*id].tribe, Some(child));
        }

        let mut after: Vec<_> = parent_members.into_iter().chain(child_members).collect();
        before.sort();
        after.sort();
        prop_assert_eq!(before, after);
        prop_assert!(world.check_invariants().is_ok());
    }
}

//! Perception system - what agents and predators notice around them

use ordered_float::OrderedFloat;
use slotmap::SlotMap;

use crate::city::shelter::Shelter;
use crate::core::types::{AgentId, ShelterId, TribeId, Vec2};
use crate::entity::agent::Agent;
use crate::entity::predator::Predator;

/// True if any predator is strictly closer than `alarm_radius`
pub fn threat_nearby(position: Vec2, predators: &[Predator], alarm_radius: f32) -> bool {
    predators
        .iter()
        .any(|p| p.position.distance(&position) < alarm_radius)
}

/// Whether an agent of `tribe` may take refuge in `shelter`.
///
/// Tribeless agents may use any shelter; tribe members only their own.
pub fn is_refuge_for(shelter: &Shelter, tribe: Option<TribeId>) -> bool {
    match tribe {
        None => true,
        Some(id) => shelter.tribe == Some(id),
    }
}

/// Nearest shelter with free space that accepts `tribe`, measured to its
/// top-left corner like the tribe claim
pub fn nearest_refuge(
    position: Vec2,
    tribe: Option<TribeId>,
    shelters: &SlotMap<ShelterId, Shelter>,
) -> Option<ShelterId> {
    shelters
        .iter()
        .filter(|(_, s)| s.has_space() && is_refuge_for(s, tribe))
        .min_by_key(|(_, s)| OrderedFloat(s.position.distance(&position)))
        .map(|(id, _)| id)
}

/// Nearest shelter of any kind, measured to its centre
pub fn nearest_shelter(position: Vec2, shelters: &SlotMap<ShelterId, Shelter>) -> Option<ShelterId> {
    shelters
        .iter()
        .min_by_key(|(_, s)| OrderedFloat(s.center().distance(&position)))
        .map(|(id, _)| id)
}

/// Whether a point lies within the walls of any shelter
pub fn inside_any_shelter(point: Vec2, shelters: &SlotMap<ShelterId, Shelter>) -> bool {
    shelters.values().any(|s| s.contains(point))
}

/// Nearest agent `predator` can see that is not standing inside a shelter
pub fn nearest_exposed_agent(
    predator: &Predator,
    agents: &SlotMap<AgentId, Agent>,
    shelters: &SlotMap<ShelterId, Shelter>,
) -> Option<AgentId> {
    agents
        .iter()
        .filter(|(_, a)| predator.can_see(a.position) && !inside_any_shelter(a.position, shelters))
        .min_by_key(|(_, a)| OrderedFloat(a.position.distance(&predator.position)))
        .map(|(id, _)| id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::city::shelter::Material;
    use crate::core::config::{AgentConfig, BuildingConfig, PredatorConfig};

    fn shelter_at(x: f32, y: f32, tribe: Option<TribeId>) -> Shelter {
        Shelter::new(Vec2::new(x, y), Material::Wood, &BuildingConfig::default(), tribe)
    }

    #[test]
    fn test_threat_radius_is_strict() {
        let predators = vec![Predator::new(Vec2::new(80.0, 0.0), &PredatorConfig::default())];
        assert!(!threat_nearby(Vec2::default(), &predators, 80.0));
        assert!(threat_nearby(Vec2::new(1.0, 0.0), &predators, 80.0));
        assert!(!threat_nearby(Vec2::default(), &[], 80.0));
    }

    #[test]
    fn test_refuge_respects_tribe() {
        let mut shelters: SlotMap<ShelterId, Shelter> = SlotMap::with_key();
        let near_foreign = shelters.insert(shelter_at(0.0, 0.0, Some(TribeId(2))));
        let far_own = shelters.insert(shelter_at(300.0, 0.0, Some(TribeId(1))));

        assert_eq!(nearest_refuge(Vec2::default(), Some(TribeId(1)), &shelters), Some(far_own));
        assert_eq!(nearest_refuge(Vec2::default(), None, &shelters), Some(near_foreign));
        assert_eq!(nearest_refuge(Vec2::default(), Some(TribeId(9)), &shelters), None);
    }

    #[test]
    fn test_full_shelter_is_no_refuge() {
        let config = AgentConfig::default();
        let mut agents: SlotMap<AgentId, Agent> = SlotMap::with_key();
        let mut shelters: SlotMap<ShelterId, Shelter> = SlotMap::with_key();
        let sid = shelters.insert(shelter_at(0.0, 0.0, None));
        let mut rng = rand::thread_rng();
        for _ in 0..4 {
            let id = agents.insert(Agent::new(Vec2::default(), &config, 0.0));
            shelters[sid].enter(sid, id, &mut agents[id], config.size, &mut rng);
        }

        assert_eq!(nearest_refuge(Vec2::default(), None, &shelters), None);
    }

    #[test]
    fn test_exposed_agent_skips_sheltered_positions() {
        let config = AgentConfig::default();
        let mut agents: SlotMap<AgentId, Agent> = SlotMap::with_key();
        let mut shelters: SlotMap<ShelterId, Shelter> = SlotMap::with_key();
        shelters.insert(shelter_at(0.0, 0.0, None));

        let hidden = agents.insert(Agent::new(Vec2::new(20.0, 20.0), &config, 0.0));
        let exposed = agents.insert(Agent::new(Vec2::new(100.0, 20.0), &config, 0.0));
        agents.insert(Agent::new(Vec2::new(1000.0, 20.0), &config, 0.0));

        let predator = Predator::new(Vec2::new(30.0, 20.0), &PredatorConfig::default());
        let found = nearest_exposed_agent(&predator, &agents, &shelters);
        assert_eq!(found, Some(exposed));
        assert_ne!(found, Some(hidden));

        let blind = Predator::new(Vec2::new(500.0, 500.0), &PredatorConfig::default());
        assert_eq!(nearest_exposed_agent(&blind, &agents, &shelters), None);
    }

    #[test]
    fn test_refuge_distance_uses_corner() {
        let mut shelters: SlotMap<ShelterId, Shelter> = SlotMap::with_key();
        // Corner 30 away, centre about 54 away
        let corner_near = shelters.insert(shelter_at(30.0, 0.0, None));
        // Corner about 46 away, centre about 27 away
        shelters.insert(shelter_at(-45.0, -10.0, None));

        assert_eq!(nearest_refuge(Vec2::default(), None, &shelters), Some(corner_near));
    }
}

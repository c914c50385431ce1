//! Shelter construction and the tribe claim on new shelters
//!
//! A shelter built near an existing tribe's shelter joins that tribe and
//! is raised near the tribe's centre; anywhere else it founds a new tribe
//! around its builder and stands where the builder is.

use rand::seq::SliceRandom;

use crate::city::shelter::Material;
use crate::core::types::{AgentId, ShelterId, TribeId, Vec2};
use crate::ecs::world::World;

/// Result of settling one build event
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Settlement {
    pub shelter: ShelterId,
    pub tribe: TribeId,
    /// A new tribe was created for this shelter
    pub founded: bool,
}

/// Tribes owning at least one shelter strictly within the claim radius
pub fn claimant_tribes(world: &World, position: Vec2) -> Vec<TribeId> {
    let radius = world.config.tribe.claim_radius;
    world
        .tribes
        .values()
        .filter(|tribe| {
            tribe
                .shelters()
                .iter()
                .filter_map(|&sid| world.shelters.get(sid))
                .any(|s| s.position.distance(&position) < radius)
        })
        .map(|tribe| tribe.id)
        .collect()
}

/// Top-left corner for a member's shelter near the tribe centre, kept
/// inside the world
fn member_site(world: &mut World, tribe: TribeId, fallback: Vec2) -> Vec2 {
    let Some(owner) = world.tribes.get(&tribe) else {
        return fallback;
    };
    let site = owner.build_position(&world.config.tribe, &mut world.rng);
    let (min, max) = world.config.world_bounds();
    let building = &world.config.building;
    site.clamp(min, Vec2::new(max.x - building.shelter_width, max.y - building.shelter_height))
}

/// Resolve a builder's tribe and raise its shelter. `position` is where
/// the builder stands; it decides the claim and anchors a founded tribe.
pub fn settle_build(world: &mut World, builder: AgentId, material: Material, position: Vec2) -> Option<Settlement> {
    if !world.agents.contains_key(builder) {
        return None;
    }

    let candidates = claimant_tribes(world, position);
    let (tribe, founded, position) = match candidates.choose(&mut world.rng).copied() {
        Some(tribe) => {
            world.join_tribe(builder, tribe);
            (tribe, false, member_site(world, tribe, position))
        }
        None => (world.found_tribe(builder, position)?, true, position),
    };

    let shelter = world.spawn_shelter(position, material, Some(tribe));
    tracing::debug!(
        ?builder,
        tribe = %tribe,
        material = material.name(),
        x = position.x,
        y = position.y,
        "Shelter built"
    );
    Some(Settlement { shelter, tribe, founded })
}

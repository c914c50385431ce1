//! 2D rendering snapshots
//!
//! Provides visual representation of simulation state for an external
//! drawing front end. This module is READ-ONLY - it never modifies
//! simulation state.

pub mod colors;

use serde::Serialize;

use crate::core::cycle::Phase;
use crate::core::types::Vec2;
use crate::ecs::world::World;
use crate::simulation::resources::ResourceKind;
use colors::Color;

/// Drawn size of a resource item
pub const RESOURCE_SIZE: f32 = 6.0;
/// Drawn size of a predator
pub const PREDATOR_SIZE: f32 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RenderKind {
    Agent,
    Shelter,
    Predator,
    Resource(ResourceKind),
}

/// Lightweight snapshot of an entity for rendering
#[derive(Debug, Clone, Serialize)]
pub struct RenderEntity {
    pub kind: RenderKind,
    /// Top-left corner
    pub position: Vec2,
    pub size: Vec2,
    pub color: Color,
}

/// Everything one frame needs
#[derive(Debug, Clone, Serialize)]
pub struct RenderFrame {
    pub background: Color,
    /// Laid over the scene at night
    pub overlay: Option<Color>,
    pub entities: Vec<RenderEntity>,
}

/// Collects all renderable entities from the world into a reusable buffer.
/// Call this once per frame, passing the same buffer to avoid allocations.
///
/// Draw order: resources, shelters, agents, predators.
pub fn collect_render_entities(world: &World, buffer: &mut Vec<RenderEntity>) {
    buffer.clear();

    for kind in ResourceKind::ALL {
        let color = colors::resource_color(kind);
        buffer.extend(world.resources.items(kind).iter().map(|item| RenderEntity {
            kind: RenderKind::Resource(kind),
            position: item.position,
            size: Vec2::new(RESOURCE_SIZE, RESOURCE_SIZE),
            color,
        }));
    }

    for shelter in world.shelters.values() {
        let color = shelter
            .tribe
            .and_then(|t| world.tribe(t))
            .map_or(colors::SHELTER_DEFAULT, |t| t.color);
        buffer.push(RenderEntity {
            kind: RenderKind::Shelter,
            position: shelter.position,
            size: Vec2::new(shelter.width, shelter.height),
            color,
        });
    }

    let agent_size = world.config.agent.size;
    for agent in world.agents.values() {
        let color = agent
            .tribe
            .and_then(|t| world.tribe(t))
            .map_or(colors::UNAFFILIATED, |t| t.color);
        buffer.push(RenderEntity {
            kind: RenderKind::Agent,
            position: agent.position,
            size: Vec2::new(agent_size, agent_size),
            color,
        });
    }

    buffer.extend(world.predators.iter().map(|p| RenderEntity {
        kind: RenderKind::Predator,
        position: p.position,
        size: Vec2::new(PREDATOR_SIZE, PREDATOR_SIZE),
        color: colors::PREDATOR,
    }));
}

pub fn render_frame(world: &World) -> RenderFrame {
    let mut entities = Vec::with_capacity(world.agents.len() + world.shelters.len() + world.predators.len());
    collect_render_entities(world, &mut entities);
    let phase = world.phase();
    RenderFrame {
        background: colors::background(phase),
        overlay: (phase == Phase::Night).then_some(colors::NIGHT_OVERLAY),
        entities,
    }
}

//! Nocturnal predators

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::config::PredatorConfig;
use crate::core::types::{AgentId, Vec2};

/// What a predator is heading for this tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Target {
    /// A visible, unsheltered agent
    Agent(AgentId),
    /// A transient patrol point around a shelter
    Point(Vec2),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Predator {
    pub position: Vec2,
    pub speed: f32,
    pub sight: f32,
    /// Re-resolved every tick, never carried as pursuit memory
    pub target: Option<Target>,
}

impl Predator {
    pub fn new(position: Vec2, config: &PredatorConfig) -> Self {
        Self {
            position,
            speed: config.speed,
            sight: config.sight,
            target: None,
        }
    }

    /// Spawn at a uniformly random point of a `width` x `height` world
    pub fn spawn_random(width: f32, height: f32, config: &PredatorConfig, rng: &mut impl Rng) -> Self {
        let position = Vec2::new(rng.gen_range(0.0..=width), rng.gen_range(0.0..=height));
        Self::new(position, config)
    }

    pub fn can_see(&self, point: Vec2) -> bool {
        self.position.distance(&point) <= self.sight
    }

    /// One speed-sized step towards `point`
    pub fn move_towards(&mut self, point: Vec2) {
        self.position = self.position.step_towards(point, self.speed);
    }
}

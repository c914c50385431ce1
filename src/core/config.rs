//! Simulation configuration with documented constants
//!
//! All magic numbers are collected here with explanations of their purpose
//! and how they interact with each other. Every section deserializes from
//! TOML and falls back to its defaults for missing keys.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, SimError};
use crate::core::types::Vec2;

/// Configuration for the whole simulation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Seed for the world RNG. `None` seeds from entropy.
    pub seed: Option<u64>,
    pub world: WorldConfig,
    pub cycle: CycleConfig,
    pub agent: AgentConfig,
    pub rewards: RewardConfig,
    pub building: BuildingConfig,
    pub tribe: TribeConfig,
    pub predator: PredatorConfig,
    pub resources: ResourceConfig,
    pub reproduction: ReproductionConfig,
    pub seeding: SeedingConfig,
}

// === WORLD ===

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Playable width (world units). Resources spawn in `[0, width]`.
    pub width: f32,
    /// Playable height (world units)
    pub height: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 1600.0,
            height: 1080.0,
        }
    }
}

// === DAY / NIGHT ===

/// Which clock drives phase transitions and reward smoothing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClockMode {
    /// Monotonic wall clock, as in the interactive runner
    #[default]
    Realtime,
    /// Fixed step per tick, so batch runs cycle at simulation speed
    Stepped,
}

impl std::str::FromStr for ClockMode {
    type Err = SimError;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "realtime" => Ok(ClockMode::Realtime),
            "stepped" => Ok(ClockMode::Stepped),
            other => Err(SimError::Config(format!(
                "unknown clock '{}', expected realtime or stepped",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CycleConfig {
    /// Length of the day phase in clock seconds
    pub day_seconds: f64,
    /// Length of the night phase in clock seconds
    ///
    /// Predators only exist during the night, so this bounds how long
    /// unsheltered agents are exposed.
    pub night_seconds: f64,
    pub clock: ClockMode,
    /// Seconds the stepped clock advances per tick (60 ticks per second)
    pub step_seconds: f64,
}

impl Default for CycleConfig {
    fn default() -> Self {
        Self {
            day_seconds: 30.0,
            night_seconds: 20.0,
            clock: ClockMode::Realtime,
            step_seconds: 1.0 / 60.0,
        }
    }
}

// === AGENTS ===

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Hunger of a freshly spawned agent (also the cap when eating)
    pub max_hunger: f32,
    /// Hunger lost per tick. At 0.01 an agent starves in 10000 ticks
    /// without eating.
    pub hunger_decay: f32,
    /// Age gained per tick
    pub age_per_tick: f32,
    /// Agents die once age reaches this value
    pub max_age: f32,
    /// Minimum age to take part in reproduction
    pub adult_age: f32,
    /// Resources farther than this are invisible
    pub perception_radius: f32,
    /// Resources closer than this are harvested instead of approached
    pub contact_radius: f32,
    /// Distance covered per tick when approaching a resource
    pub step: f32,
    /// Maximum integer offset per axis for a wander step
    pub wander_jitter: i32,
    /// A predator inside this radius sends the agent to a shelter
    pub alarm_radius: f32,
    /// Edge length of the agent's square footprint
    pub size: f32,
    /// Hunger restored by eating one bush
    pub meal_value: f32,
    /// Lower clamp for memory weights
    pub memory_min: f32,
    /// Upper clamp for memory weights
    pub memory_max: f32,
    /// Number of rewards kept for the smoothed reward metric
    pub reward_window: usize,
    /// Minimum clock seconds between two smoothed-reward samples
    pub reward_interval: f64,
    /// Half-width of the uniform noise added to inherited memory
    pub inheritance_noise: f32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_hunger: 100.0,
            hunger_decay: 0.01,
            age_per_tick: 0.01,
            max_age: 100.0,
            adult_age: 18.0,
            perception_radius: 100.0,
            contact_radius: 8.0,
            step: 2.0,
            wander_jitter: 2,
            alarm_radius: 80.0,
            size: 6.0,
            meal_value: 40.0,
            memory_min: -5.0,
            memory_max: 10.0,
            reward_window: 10,
            reward_interval: 0.5,
            inheritance_noise: 0.2,
        }
    }
}

/// Hand-tuned reward per action outcome
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardConfig {
    pub eat: f32,
    pub chop: f32,
    pub mine: f32,
    pub craft: f32,
    pub craft_failed: f32,
    pub missing_tool: f32,
    pub wander: f32,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            eat: 4.0,
            chop: 3.0,
            mine: 5.0,
            craft: 8.0,
            craft_failed: -0.2,
            missing_tool: -1.0,
            wander: -0.01,
        }
    }
}

// === SHELTERS ===

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildingConfig {
    /// Wood consumed by a wooden shelter (checked first)
    pub wood_shelter_cost: u32,
    /// Wood consumed by a stone shelter
    pub stone_shelter_wood: u32,
    /// Stone consumed by a stone shelter
    pub stone_shelter_stone: u32,
    /// Wood consumed when crafting a pickaxe
    pub tool_wood_cost: u32,
    pub shelter_width: f32,
    pub shelter_height: f32,
    pub shelter_capacity: usize,
}

impl Default for BuildingConfig {
    fn default() -> Self {
        Self {
            wood_shelter_cost: 10,
            stone_shelter_wood: 5,
            stone_shelter_stone: 5,
            tool_wood_cost: 5,
            shelter_width: 40.0,
            shelter_height: 40.0,
            shelter_capacity: 4,
        }
    }
}

// === TRIBES ===

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TribeConfig {
    /// Membership at which a tribe becomes eligible for fission
    pub max_size: usize,
    /// A new shelter joins a tribe owning a shelter closer than this
    pub claim_radius: f32,
    /// Minimum distance of a seceding tribe's centre from its parent
    pub split_min_distance: f32,
    /// Maximum distance of a seceding tribe's centre from its parent
    pub split_max_distance: f32,
    /// Maximum integer offset per axis of a member's shelter from the centre
    pub build_spread: i32,
    /// Split overcrowded tribes at the end of every tick
    pub auto_split: bool,
}

impl Default for TribeConfig {
    fn default() -> Self {
        Self {
            max_size: 15,
            claim_radius: 200.0,
            split_min_distance: 120.0,
            split_max_distance: 200.0,
            build_spread: 80,
            auto_split: true,
        }
    }
}

// === PREDATORS ===

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PredatorConfig {
    /// Predators spawned at every day -> night transition
    pub count: usize,
    pub speed: f32,
    pub sight: f32,
    /// An unsheltered agent this close to a hunting predator is killed
    pub contact_radius: f32,
    /// Maximum per-axis drift when there is nothing to hunt or patrol
    pub jitter: f32,
}

impl Default for PredatorConfig {
    fn default() -> Self {
        Self {
            count: 10,
            speed: 0.6,
            sight: 120.0,
            contact_radius: 6.0,
            jitter: 1.0,
        }
    }
}

// === RESOURCES ===

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceConfig {
    pub trees: usize,
    pub stones: usize,
    pub bushes: usize,
}

impl Default for ResourceConfig {
    fn default() -> Self {
        Self {
            trees: 160,
            stones: 120,
            bushes: 100,
        }
    }
}

// === REPRODUCTION ===

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReproductionConfig {
    pub min_children: usize,
    pub max_children: usize,
}

impl Default for ReproductionConfig {
    fn default() -> Self {
        Self {
            min_children: 1,
            max_children: 2,
        }
    }
}

// === INITIAL WORLD ===

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedingConfig {
    /// Starting positions of the founding agents
    pub agents: Vec<[f32; 2]>,
    /// Top-left corner of an untribed wooden starter shelter
    pub shelter: Option<[f32; 2]>,
}

impl Default for SeedingConfig {
    fn default() -> Self {
        Self {
            agents: vec![[400.0, 360.0], [420.0, 360.0]],
            shelter: Some([430.0, 350.0]),
        }
    }
}

impl SimulationConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a TOML document, filling missing keys with defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: SimulationConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        tracing::info!(path = %path.display(), "Loaded simulation config");
        Ok(config)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("world.width", self.world.width as f64),
            ("world.height", self.world.height as f64),
            ("cycle.day_seconds", self.cycle.day_seconds),
            ("cycle.night_seconds", self.cycle.night_seconds),
            ("cycle.step_seconds", self.cycle.step_seconds),
            ("agent.max_hunger", self.agent.max_hunger as f64),
            ("agent.max_age", self.agent.max_age as f64),
            ("agent.perception_radius", self.agent.perception_radius as f64),
            ("agent.contact_radius", self.agent.contact_radius as f64),
            ("agent.step", self.agent.step as f64),
            ("agent.alarm_radius", self.agent.alarm_radius as f64),
            ("agent.size", self.agent.size as f64),
            ("building.shelter_width", self.building.shelter_width as f64),
            ("building.shelter_height", self.building.shelter_height as f64),
            ("tribe.claim_radius", self.tribe.claim_radius as f64),
            ("predator.speed", self.predator.speed as f64),
            ("predator.sight", self.predator.sight as f64),
            ("predator.contact_radius", self.predator.contact_radius as f64),
        ];
        for (name, value) in positive {
            if !(value > 0.0) {
                return Err(SimError::Config(format!("{} must be positive, got {}", name, value)));
            }
        }

        if self.agent.hunger_decay < 0.0 || self.agent.age_per_tick < 0.0 {
            return Err(SimError::Config("Decay rates must not be negative".into()));
        }

        // Jitter feeds symmetric `gen_range(-j..=j)` draws
        if self.agent.wander_jitter < 0 {
            return Err(SimError::Config(format!(
                "agent.wander_jitter must not be negative, got {}",
                self.agent.wander_jitter
            )));
        }
        if self.tribe.build_spread < 0 {
            return Err(SimError::Config(format!(
                "tribe.build_spread must not be negative, got {}",
                self.tribe.build_spread
            )));
        }
        if !(self.predator.jitter >= 0.0) {
            return Err(SimError::Config(format!(
                "predator.jitter must not be negative, got {}",
                self.predator.jitter
            )));
        }

        if self.agent.memory_min >= self.agent.memory_max {
            return Err(SimError::Config(format!(
                "agent.memory_min ({}) should be < agent.memory_max ({})",
                self.agent.memory_min, self.agent.memory_max
            )));
        }

        if self.agent.reward_window == 0 {
            return Err(SimError::Config("agent.reward_window must be at least 1".into()));
        }

        if self.building.shelter_capacity == 0 {
            return Err(SimError::Config("building.shelter_capacity must be at least 1".into()));
        }

        // Agents are placed inside shelters with their whole footprint
        if self.agent.size > self.building.shelter_width.min(self.building.shelter_height) {
            return Err(SimError::Config(format!(
                "agent.size ({}) does not fit inside a {}x{} shelter",
                self.agent.size, self.building.shelter_width, self.building.shelter_height
            )));
        }

        if self.tribe.max_size < 2 {
            return Err(SimError::Config("tribe.max_size must be at least 2".into()));
        }

        if self.tribe.split_min_distance < 0.0
            || self.tribe.split_min_distance > self.tribe.split_max_distance
        {
            return Err(SimError::Config(format!(
                "tribe split distance range [{}, {}] is invalid",
                self.tribe.split_min_distance, self.tribe.split_max_distance
            )));
        }

        if self.reproduction.min_children > self.reproduction.max_children {
            return Err(SimError::Config(format!(
                "reproduction.min_children ({}) exceeds max_children ({})",
                self.reproduction.min_children, self.reproduction.max_children
            )));
        }

        let seeds = self.seeding.agents.iter().chain(self.seeding.shelter.iter());
        for &[x, y] in seeds {
            if !(0.0..=self.world.width).contains(&x) || !(0.0..=self.world.height).contains(&y) {
                return Err(SimError::Config(format!("seed position ({}, {}) lies outside the world", x, y)));
            }
        }

        Ok(())
    }

    /// Upper-left and lower-right corners of the playable area
    pub fn world_bounds(&self) -> (Vec2, Vec2) {
        (Vec2::new(0.0, 0.0), Vec2::new(self.world.width, self.world.height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(SimulationConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = SimulationConfig::from_toml_str(
            r#"
            seed = 7

            [tribe]
            max_size = 20

            [cycle]
            clock = "stepped"
            "#,
        )
        .unwrap();

        assert_eq!(config.seed, Some(7));
        assert_eq!(config.tribe.max_size, 20);
        assert_eq!(config.tribe.claim_radius, 200.0);
        assert_eq!(config.cycle.clock, ClockMode::Stepped);
        assert_eq!(config.predator.count, 10);
    }

    #[test]
    fn test_rejects_non_positive_radius() {
        let mut config = SimulationConfig::default();
        config.agent.perception_radius = 0.0;
        assert!(matches!(config.validate(), Err(SimError::Config(_))));
    }

    #[test]
    fn test_rejects_zero_capacity() {
        let mut config = SimulationConfig::default();
        config.building.shelter_capacity = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_inverted_memory_bounds() {
        let mut config = SimulationConfig::default();
        config.agent.memory_min = 10.0;
        config.agent.memory_max = -5.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_negative_jitter() {
        let mut config = SimulationConfig::default();
        config.agent.wander_jitter = -2;
        assert!(matches!(config.validate(), Err(SimError::Config(_))));

        let mut config = SimulationConfig::default();
        config.predator.jitter = -1.0;
        assert!(matches!(config.validate(), Err(SimError::Config(_))));

        config.predator.jitter = f32::NAN;
        assert!(matches!(config.validate(), Err(SimError::Config(_))));

        let mut config = SimulationConfig::default();
        config.tribe.build_spread = -80;
        assert!(matches!(config.validate(), Err(SimError::Config(_))));

        // Zero jitter is a legal, motionless setting
        let mut config = SimulationConfig::default();
        config.agent.wander_jitter = 0;
        config.predator.jitter = 0.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_seed_outside_world() {
        let mut config = SimulationConfig::default();
        config.seeding.agents.push([5000.0, 10.0]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_shipped_config_matches_defaults() {
        let config = SimulationConfig::from_toml_str(include_str!("../../config/tribesim.toml")).unwrap();
        let defaults = SimulationConfig::default();

        assert_eq!(config.seed, None);
        assert_eq!(config.agent.alarm_radius, defaults.agent.alarm_radius);
        assert_eq!(config.building.shelter_capacity, defaults.building.shelter_capacity);
        assert_eq!(config.tribe.build_spread, defaults.tribe.build_spread);
        assert_eq!(config.seeding.agents, defaults.seeding.agents);
        assert_eq!(config.seeding.shelter, defaults.seeding.shelter);
    }

    #[test]
    fn test_clock_mode_from_str() {
        assert_eq!("stepped".parse::<ClockMode>().unwrap(), ClockMode::Stepped);
        assert_eq!("realtime".parse::<ClockMode>().unwrap(), ClockMode::Realtime);
        assert!("sundial".parse::<ClockMode>().is_err());
    }

    #[test]
    fn test_invalid_toml_is_reported() {
        let result = SimulationConfig::from_toml_str("seed = \"not a number\"");
        assert!(matches!(result, Err(SimError::TomlError(_))));
    }
}

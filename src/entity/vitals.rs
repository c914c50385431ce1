//! Hunger and age, the two clocks that run every agent towards death

use serde::{Deserialize, Serialize};

use crate::core::config::AgentConfig;

/// Physical state shared by every agent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vitals {
    /// 100.0 = fed, 0.0 = starved
    pub hunger: f32,
    /// Simulated years
    pub age: f32,
}

impl Vitals {
    pub fn newborn(config: &AgentConfig) -> Self {
        Self {
            hunger: config.max_hunger,
            age: 0.0,
        }
    }

    /// Decay hunger and advance age (called each tick)
    pub fn advance(&mut self, config: &AgentConfig) {
        self.age += config.age_per_tick;
        self.hunger -= config.hunger_decay;
    }

    pub fn is_dead(&self, config: &AgentConfig) -> bool {
        self.hunger <= 0.0 || self.age >= config.max_age
    }

    pub fn is_adult(&self, config: &AgentConfig) -> bool {
        self.age >= config.adult_age
    }

    /// Restore hunger, capped at the maximum
    pub fn eat(&mut self, amount: f32, config: &AgentConfig) {
        self.hunger = (self.hunger + amount).min(config.max_hunger);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_moves_towards_death() {
        let config = AgentConfig::default();
        let mut vitals = Vitals::newborn(&config);

        vitals.advance(&config);

        assert!(vitals.hunger < config.max_hunger);
        assert!(vitals.age > 0.0);
        assert!(!vitals.is_dead(&config));
    }

    #[test]
    fn test_starvation_and_old_age() {
        let config = AgentConfig::default();

        let starving = Vitals { hunger: 0.0, age: 20.0 };
        assert!(starving.is_dead(&config));

        let ancient = Vitals { hunger: 80.0, age: 100.0 };
        assert!(ancient.is_dead(&config));
    }

    #[test]
    fn test_eat_is_capped() {
        let config = AgentConfig::default();
        let mut vitals = Vitals { hunger: 90.0, age: 5.0 };

        vitals.eat(40.0, &config);
        assert_eq!(vitals.hunger, 100.0);
    }

    #[test]
    fn test_adulthood() {
        let config = AgentConfig::default();
        assert!(!Vitals { hunger: 50.0, age: 17.99 }.is_adult(&config));
        assert!(Vitals { hunger: 50.0, age: 18.0 }.is_adult(&config));
    }
}

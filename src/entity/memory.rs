//! Action memory and reward smoothing
//!
//! Each agent keeps one preference weight per action. Weights bias the
//! weighted-random policy but never exclude an action, and every outcome
//! nudges the chosen action's weight by its reward.

use std::collections::VecDeque;

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// The fixed action space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    IdleWander,
    ForageFood,
    GatherWood,
    CraftTool,
    MineStone,
}

impl Action {
    pub const COUNT: usize = 5;

    pub const ALL: [Action; Action::COUNT] = [
        Action::IdleWander,
        Action::ForageFood,
        Action::GatherWood,
        Action::CraftTool,
        Action::MineStone,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Action::IdleWander => "idle_wander",
            Action::ForageFood => "forage_food",
            Action::GatherWood => "gather_wood",
            Action::CraftTool => "craft_tool",
            Action::MineStone => "mine_stone",
        }
    }
}

/// Learned preference weight per action, clamped to `[min, max]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionMemory {
    weights: [f32; Action::COUNT],
    min: f32,
    max: f32,
}

impl ActionMemory {
    /// Fresh memory: a slight taste for wandering, indifference elsewhere
    pub fn new(min: f32, max: f32) -> Self {
        let mut weights = [0.0; Action::COUNT];
        weights[Action::IdleWander.index()] = 1.0;
        Self { weights, min, max }
    }

    /// Memory with explicit weights (clamped into bounds)
    pub fn from_weights(weights: [f32; Action::COUNT], min: f32, max: f32) -> Self {
        Self {
            weights: weights.map(|w| w.clamp(min, max)),
            min,
            max,
        }
    }

    pub fn weight(&self, action: Action) -> f32 {
        self.weights[action.index()]
    }

    pub fn weights(&self) -> &[f32; Action::COUNT] {
        &self.weights
    }

    /// Sampling weight: `max(1, weight + 1)`, so no action is ever excluded
    pub fn selection_weight(&self, action: Action) -> f32 {
        (self.weight(action) + 1.0).max(1.0)
    }

    /// Weighted-random choice proportional to [`Self::selection_weight`]
    pub fn sample(&self, rng: &mut impl Rng) -> Action {
        let weights = Action::ALL.map(|a| self.selection_weight(a));
        match WeightedIndex::new(weights) {
            Ok(dist) => Action::ALL[dist.sample(rng)],
            // Unreachable with finite weights; every weight is at least 1
            Err(_) => Action::IdleWander,
        }
    }

    /// Apply a reward to one action and return the clamped weight
    pub fn reinforce(&mut self, action: Action, reward: f32) -> f32 {
        let slot = &mut self.weights[action.index()];
        *slot = (*slot + reward).clamp(self.min, self.max);
        *slot
    }

    /// Average of two parents plus symmetric uniform noise per action
    pub fn inherit(a: &ActionMemory, b: &ActionMemory, noise: f32, rng: &mut impl Rng) -> Self {
        let mut weights = [0.0; Action::COUNT];
        for action in Action::ALL {
            let avg = (a.weight(action) + b.weight(action)) / 2.0;
            let jitter = if noise > 0.0 { rng.gen_range(-noise..=noise) } else { 0.0 };
            weights[action.index()] = avg + jitter;
        }
        Self::from_weights(weights, a.min, a.max)
    }
}

/// Rolling mean of the most recent rewards, sampled at a throttled rate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewardTracker {
    buffer: VecDeque<f32>,
    window: usize,
    average: f32,
    last_sample: f64,
    interval: f64,
}

impl RewardTracker {
    pub fn new(window: usize, interval: f64, now: f64) -> Self {
        Self {
            buffer: VecDeque::with_capacity(window),
            window,
            average: 0.0,
            last_sample: now,
            interval,
        }
    }

    /// Smoothed reward over the buffered samples
    pub fn average(&self) -> f32 {
        self.average
    }

    pub fn samples(&self) -> usize {
        self.buffer.len()
    }

    /// Append `reward` unless the previous sample is younger than the
    /// interval. Returns whether the sample was taken.
    pub fn record(&mut self, reward: f32, now: f64) -> bool {
        if now - self.last_sample < self.interval {
            return false;
        }
        self.last_sample = now;
        self.push(reward);
        true
    }

    fn push(&mut self, reward: f32) {
        if self.buffer.len() >= self.window {
            self.buffer.pop_front();
        }
        self.buffer.push_back(reward);
        self.average = self.buffer.iter().sum::<f32>() / self.buffer.len() as f32;
    }
}

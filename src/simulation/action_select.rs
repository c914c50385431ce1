//! Action selection - a weighted bandit over the agent's memory
//!
//! Every action keeps a minimum selection weight of 1, so learned aversion
//! makes an action rare but never impossible.

use rand::Rng;

use crate::entity::memory::{Action, ActionMemory};

/// Pick this tick's action proportionally to `max(1, weight + 1)`
pub fn select_action(memory: &ActionMemory, rng: &mut impl Rng) -> Action {
    memory.sample(rng)
}

/// Selection probability of every action, in [`Action::ALL`] order
pub fn selection_probabilities(memory: &ActionMemory) -> [f32; Action::COUNT] {
    let weights = Action::ALL.map(|a| memory.selection_weight(a));
    let total: f32 = weights.iter().sum();
    weights.map(|w| w / total)
}

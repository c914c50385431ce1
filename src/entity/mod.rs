pub mod agent;
pub mod memory;
pub mod predator;
pub mod vitals;

pub use agent::{Agent, Inventory};
pub use memory::{Action, ActionMemory, RewardTracker};
pub use predator::{Predator, Target};
pub use vitals::Vitals;

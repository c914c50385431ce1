pub mod config;
pub mod cycle;
pub mod error;
pub mod types;

pub use config::SimulationConfig;
pub use cycle::{Clock, DayNightCycle, Phase};
pub use error::{Result, SimError};

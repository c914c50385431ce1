//! Tribesim - tick-driven artificial life of foraging, shelter-building tribes

pub mod city;
pub mod core;
pub mod ecs;
pub mod entity;
pub mod render;
pub mod simulation;
pub mod social;

pub use crate::core::config::SimulationConfig;
pub use crate::core::error::{Result, SimError};
pub use crate::ecs::world::World;
pub use crate::simulation::status::StatusReport;
pub use crate::simulation::tick::{run_simulation_tick, run_simulation_tick_at, SimulationEvent};

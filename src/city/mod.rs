//! Settlement layer - shelters and their occupancy protocol

pub mod shelter;

pub use shelter::{Material, Shelter};

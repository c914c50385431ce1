//! World storage - arenas for agents, shelters and tribes

pub mod world;

pub use world::World;

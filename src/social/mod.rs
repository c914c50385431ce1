//! Social structure - tribes, their identities and fission

pub mod tribe;

pub use tribe::{Tribe, TribeIdGenerator};

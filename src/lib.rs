//! Cultivator - text-driven cultivation idle game library
//!
//! The progression core (realms, encounters, locations, spirit stones,
//! effects) is exposed here so the shell, the balance simulator and the
//! integration tests drive the same code.

pub mod build_info;
pub mod character;
pub mod choices;
pub mod core;
pub mod effects;
pub mod encounters;
pub mod locations;
pub mod realm;
pub mod simulator;
pub mod stones;

//! Random encounters: the static catalog, pacing, and rewards.

pub mod data;
pub mod rewards;
pub mod tracker;
pub mod types;

pub use data::*;
pub use rewards::*;
pub use tracker::*;
pub use types::*;

//! Choice encounters: rare events that pause cultivation for a decision.

pub mod data;
pub mod logic;
pub mod types;

pub use data::*;
pub use logic::*;
pub use types::*;

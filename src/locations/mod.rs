//! Cultivation grounds: the location catalog and travel between them.

pub mod data;
pub mod logic;

pub use data::*;
pub use logic::*;

//! Character persistence.

pub mod save;

pub use save::*;

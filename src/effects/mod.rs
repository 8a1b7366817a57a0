pub mod cures;
pub mod logic;
pub mod types;

pub use cures::*;
pub use logic::*;
pub use types::*;

//! Core cultivator state, balance constants, and session orchestration.

pub mod constants;
pub mod error;
pub mod game_state;
pub mod session;

pub use constants::*;
pub use error::*;
pub use game_state::*;
pub use session::*;

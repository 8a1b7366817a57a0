//! Realm ladder, stage progression, breakthroughs and elemental awakening.

pub mod awakening;
pub mod breakthrough;
pub mod progression;
pub mod types;

pub use awakening::*;
pub use breakthrough::*;
pub use progression::*;
pub use types::*;

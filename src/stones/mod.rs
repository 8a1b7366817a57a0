//! Spirit stone currency: five grades, a ledger, and encounter bounties.

pub mod ledger;
pub mod rewards;
pub mod types;

pub use ledger::*;
pub use rewards::*;
pub use types::*;

//! Structured refusals returned by the cultivation core.
//!
//! None of these are crashes: each carries enough context for the shell to
//! explain what went wrong and what the player could do instead.

use crate::realm::Realm;
use crate::stones::StoneBundle;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CultivationError {
    #[error("must reach Stage 9 before attempting breakthrough (currently Stage {stage})")]
    StageTooLow { stage: u32 },

    #[error("foundation too weak: need {needed} more foundation quality")]
    FoundationTooWeak { needed: u32 },

    #[error("still recovering from last attempt, wait {sessions} more sessions")]
    Recovering { sessions: u32 },

    #[error("{realm} is already the pinnacle of cultivation")]
    AtPinnacle { realm: Realm },

    #[error("cannot afford cost of {cost_value} low-grade equivalent (have {available})")]
    CannotAfford {
        cost: StoneBundle,
        cost_value: u64,
        available: u64,
    },

    #[error("{name} cannot be cured with spirit stones, try meditation")]
    NotCurable { name: String },

    #[error("no active effect named {name}")]
    EffectNotFound { name: String },

    #[error("{location} opens to cultivators of the {required} realm")]
    LocationLocked { location: &'static str, required: Realm },

    #[error("no option {option}, choose between 1 and {options}")]
    InvalidChoice { option: usize, options: usize },

    #[error("unknown {kind} key: {key}")]
    UnknownKey { kind: &'static str, key: String },
}

impl CultivationError {
    /// Low-grade stones still missing for a `CannotAfford` refusal.
    pub fn shortfall(&self) -> Option<u64> {
        match self {
            CultivationError::CannotAfford {
                cost_value,
                available,
                ..
            } => Some(cost_value.saturating_sub(*available)),
            _ => None,
        }
    }
}

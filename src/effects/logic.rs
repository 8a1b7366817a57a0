//! Ongoing effect lifecycle: modifiers, ticking, recovery and cures.

use super::cures::cure_cost;
use super::types::{EffectDuration, OngoingEffect};
use crate::core::constants::{
    MEDITATION_BASE_RATE, MEDITATION_CALM_COMPREHENSION, MEDITATION_CALM_FOUNDATION,
    MEDITATION_DAO_CAP, MEDITATION_DAO_DIVISOR, MEDITATION_FOUNDATION_DIVISOR,
    MEDITATION_MAX_CURED, MEDITATION_MAX_RATE, NATURAL_RECOVERY_BASE,
    NATURAL_RECOVERY_FOUNDATION_DIVISOR, NATURAL_RECOVERY_PER_REALM,
};
use crate::core::error::CultivationError;
use crate::core::game_state::CultivatorState;
use crate::realm::Realm;
use crate::stones::{Payment, StoneBundle};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, info};

/// Multiplies `base` by every active effect in order. Never returns 0.
pub fn apply_experience_modifiers(base: u64, effects: &[OngoingEffect]) -> u64 {
    let modified = effects
        .iter()
        .fold(base as f64, |exp, effect| exp * effect.exp_multiplier);
    (modified.floor() as u64).max(1)
}

/// Counts every timed effect down by one session and drops the expired ones.
pub fn tick_durations(effects: &mut Vec<OngoingEffect>) {
    effects.retain_mut(|effect| match &mut effect.remaining {
        EffectDuration::Sessions(left) => {
            *left = left.saturating_sub(1);
            *left > 0
        }
        EffectDuration::UntilCured => true,
    });
}

pub fn natural_recovery_chance(foundation_quality: u32, realm: Realm) -> f64 {
    NATURAL_RECOVERY_BASE
        + foundation_quality as f64 / NATURAL_RECOVERY_FOUNDATION_DIVISOR
        + realm.index() as f64 * NATURAL_RECOVERY_PER_REALM
}

/// Rolls once per negative effect and silently removes those that heal.
/// Returns how many were removed.
pub fn natural_recovery(
    effects: &mut Vec<OngoingEffect>,
    foundation_quality: u32,
    realm: Realm,
    rng: &mut impl Rng,
) -> usize {
    let chance = natural_recovery_chance(foundation_quality, realm);
    let before = effects.len();
    effects.retain(|effect| !effect.is_negative() || rng.gen::<f64>() >= chance);
    let healed = before - effects.len();
    if healed > 0 {
        debug!(healed, chance, "natural recovery");
    }
    healed
}

/// Removes up to `max` negative effects chosen at random, returning their names.
pub fn remove_random_negatives(
    effects: &mut Vec<OngoingEffect>,
    max: usize,
    rng: &mut impl Rng,
) -> Vec<String> {
    let mut negatives: Vec<usize> = effects
        .iter()
        .enumerate()
        .filter(|(_, e)| e.is_negative())
        .map(|(i, _)| i)
        .collect();
    negatives.shuffle(rng);
    negatives.truncate(max);
    // Remove from the back so earlier indices stay valid.
    negatives.sort_unstable_by(|a, b| b.cmp(a));

    let mut removed: Vec<String> = negatives
        .into_iter()
        .map(|i| effects.remove(i).name)
        .collect();
    removed.reverse();
    removed
}

pub fn meditation_success_rate(foundation_quality: u32, total_comprehension: u32) -> f64 {
    let dao_bonus = (total_comprehension as f64 / MEDITATION_DAO_DIVISOR).min(MEDITATION_DAO_CAP);
    (MEDITATION_BASE_RATE + foundation_quality as f64 / MEDITATION_FOUNDATION_DIVISOR + dao_bonus)
        .min(MEDITATION_MAX_RATE)
}

#[derive(Debug, Clone, PartialEq)]
pub enum MeditationOutcome {
    /// Negative effects purged by the meditation.
    Cleansed { removed: Vec<String> },
    /// The attempt failed; nothing was removed.
    Unsettled { success_rate: f64 },
    /// No negative effects to purge. A small calm-mind reward is granted instead.
    NothingToCure {
        foundation_gained: u32,
        comprehension_gained: u32,
    },
}

/// Free recovery action: tries to purge up to two negative effects.
pub fn meditate(state: &mut CultivatorState, rng: &mut impl Rng) -> MeditationOutcome {
    if state.negative_effect_count() == 0 {
        state.foundation_quality += MEDITATION_CALM_FOUNDATION;
        state.add_comprehension("balance", MEDITATION_CALM_COMPREHENSION);
        return MeditationOutcome::NothingToCure {
            foundation_gained: MEDITATION_CALM_FOUNDATION,
            comprehension_gained: MEDITATION_CALM_COMPREHENSION,
        };
    }

    let success_rate = meditation_success_rate(state.foundation_quality, state.total_comprehension());
    if rng.gen::<f64>() >= success_rate {
        debug!(success_rate, "meditation failed");
        return MeditationOutcome::Unsettled { success_rate };
    }

    let removed = remove_random_negatives(&mut state.ongoing_effects, MEDITATION_MAX_CURED, rng);
    info!(?removed, "meditation cleansed effects");
    MeditationOutcome::Cleansed { removed }
}

/// What a successful currency cure cost.
#[derive(Debug, Clone, PartialEq)]
pub struct CureReceipt {
    pub name: String,
    pub cost: StoneBundle,
    /// Lower-grade stones handed back when the price had to be converted.
    pub change: StoneBundle,
}

/// Pays the catalog price for `name` and removes one instance of it.
///
/// Checks run in order: the effect must be active, must be priced, and the
/// purse must cover it. Nothing is mutated on refusal.
pub fn cure_effect(state: &mut CultivatorState, name: &str) -> Result<CureReceipt, CultivationError> {
    let index = state
        .ongoing_effects
        .iter()
        .position(|e| e.name == name)
        .ok_or_else(|| CultivationError::EffectNotFound {
            name: name.to_string(),
        })?;
    let cost = cure_cost(name).ok_or_else(|| CultivationError::NotCurable {
        name: name.to_string(),
    })?;

    let change = match state.spirit_stones.pay(&cost)? {
        Payment::Exact => StoneBundle::new(),
        Payment::Converted { change } => change,
    };
    state.ongoing_effects.remove(index);
    state.stats.effects_cured += 1;
    info!(effect = name, cost = %cost, "effect cured");

    Ok(CureReceipt {
        name: name.to_string(),
        cost,
        change,
    })
}

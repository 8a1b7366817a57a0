//! Stage thresholds, experience application and breakthrough resolution.
//!
//! Everything here is a pure function of the realm table plus an injected
//! RNG, so the state layer and the simulator share one implementation.

use super::types::{cultivation_title, Realm};
use crate::core::constants::{
    BREAKTHROUGH_BASE_RATE, BREAKTHROUGH_DIFFICULTY_WEIGHT, BREAKTHROUGH_EXP_LOSS_PERCENT,
    BREAKTHROUGH_FOUNDATION_BONUS, BREAKTHROUGH_FOUNDATION_DAMAGE, BREAKTHROUGH_FOUNDATION_WEIGHT,
    BREAKTHROUGH_MAX_RATE, BREAKTHROUGH_MIN_RATE, BREAKTHROUGH_RECOVERY_SESSIONS,
    FOUNDATION_BONUS_PER_STAGE, FOUNDATION_BONUS_STAGES, MAX_STAGE, POWER_BASE_SCALE,
    POWER_PER_FOUNDATION, POWER_PER_STAGE,
};
use crate::core::error::CultivationError;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Experience needed to clear `stage` of `realm`. Zero outside 1..=9.
pub fn stage_exp_requirement(realm: Realm, stage: u32) -> u64 {
    if !(1..=MAX_STAGE).contains(&stage) {
        return 0;
    }
    let info = realm.info();
    (info.stage_exp_base as f64 * info.stage_exp_multiplier.powi(stage as i32 - 1)).floor() as u64
}

/// Foundation granted for arriving at a milestone stage (3, 6 and 9).
pub fn foundation_stage_bonus(stage: u32) -> u32 {
    if FOUNDATION_BONUS_STAGES.contains(&stage) {
        stage * FOUNDATION_BONUS_PER_STAGE
    } else {
        0
    }
}

/// One stage advancement produced by an experience grant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageAdvance {
    pub stage: u32,
    pub title: String,
    pub foundation_bonus: u32,
}

/// Result of feeding experience into the stage loop.
#[derive(Debug, Clone, PartialEq)]
pub struct ExperienceOutcome {
    pub stage: u32,
    pub experience: u64,
    pub foundation_quality: u32,
    pub advances: Vec<StageAdvance>,
    /// Stage 9 was reached by this grant and the foundation requirement is met.
    pub breakthrough_ready: bool,
}

/// Adds `delta` experience and advances stages while thresholds are met.
///
/// Stage 9 is terminal: leftover experience accumulates there until a
/// breakthrough moves the cultivator to the next realm.
pub fn apply_experience(
    realm: Realm,
    stage: u32,
    experience: u64,
    foundation_quality: u32,
    delta: u64,
) -> ExperienceOutcome {
    let mut stage = stage;
    let mut experience = experience + delta;
    let mut foundation_quality = foundation_quality;
    let mut advances = Vec::new();

    while stage < MAX_STAGE {
        let required = stage_exp_requirement(realm, stage);
        if experience < required {
            break;
        }
        experience -= required;
        stage += 1;

        let foundation_bonus = foundation_stage_bonus(stage);
        foundation_quality += foundation_bonus;
        advances.push(StageAdvance {
            stage,
            title: cultivation_title(realm, stage),
            foundation_bonus,
        });
    }

    let breakthrough_ready = stage == MAX_STAGE
        && !advances.is_empty()
        && can_attempt_breakthrough(realm, stage, foundation_quality).is_ok();

    ExperienceOutcome {
        stage,
        experience,
        foundation_quality,
        advances,
        breakthrough_ready,
    }
}

/// Precondition check for a breakthrough attempt. Does not mutate anything.
pub fn can_attempt_breakthrough(
    realm: Realm,
    stage: u32,
    foundation_quality: u32,
) -> Result<(), CultivationError> {
    if stage != MAX_STAGE {
        return Err(CultivationError::StageTooLow { stage });
    }
    let required = realm.info().foundation_requirement;
    if foundation_quality < required {
        return Err(CultivationError::FoundationTooWeak {
            needed: required - foundation_quality,
        });
    }
    Ok(())
}

/// A named additive adjustment to breakthrough odds (dao mastery, pills, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BonusFactor {
    pub name: String,
    pub value: f64,
}

impl BonusFactor {
    pub fn new(name: &str, value: f64) -> Self {
        Self {
            name: name.to_string(),
            value,
        }
    }
}

/// Breakthrough success chance, always within [0.05, 0.95].
pub fn breakthrough_success_rate(realm: Realm, foundation_quality: u32, bonus_factors: &[BonusFactor]) -> f64 {
    let info = realm.info();
    let foundation_ratio = foundation_quality as f64 / info.foundation_requirement as f64;
    let bonus: f64 = bonus_factors.iter().map(|b| b.value).sum();

    let rate = BREAKTHROUGH_BASE_RATE + (foundation_ratio - 1.0) * BREAKTHROUGH_FOUNDATION_WEIGHT
        - (info.breakthrough_difficulty - 1.0) * BREAKTHROUGH_DIFFICULTY_WEIGHT
        + bonus;

    rate.clamp(BREAKTHROUGH_MIN_RATE, BREAKTHROUGH_MAX_RATE)
}

/// Outcome of a single breakthrough roll.
#[derive(Debug, Clone, PartialEq)]
pub enum BreakthroughRoll {
    Success {
        new_realm: Realm,
        foundation_bonus: u32,
        success_rate: f64,
    },
    Failure {
        foundation_damage: u32,
        exp_loss_percent: u32,
        recovery_time: u32,
        success_rate: f64,
    },
}

/// Draws one value against the success rate and rolls the consequences.
///
/// Refuses with `AtPinnacle` at the final realm without consuming the roll's
/// consequences; eligibility is the caller's job.
pub fn roll_breakthrough(
    realm: Realm,
    foundation_quality: u32,
    bonus_factors: &[BonusFactor],
    rng: &mut impl Rng,
) -> Result<BreakthroughRoll, CultivationError> {
    let success_rate = breakthrough_success_rate(realm, foundation_quality, bonus_factors);

    if rng.gen::<f64>() < success_rate {
        let new_realm = realm.next().ok_or(CultivationError::AtPinnacle { realm })?;
        let (lo, hi) = BREAKTHROUGH_FOUNDATION_BONUS;
        return Ok(BreakthroughRoll::Success {
            new_realm,
            foundation_bonus: rng.gen_range(lo..=hi),
            success_rate,
        });
    }

    let (dmg_lo, dmg_hi) = BREAKTHROUGH_FOUNDATION_DAMAGE;
    let (loss_lo, loss_hi) = BREAKTHROUGH_EXP_LOSS_PERCENT;
    let (rec_lo, rec_hi) = BREAKTHROUGH_RECOVERY_SESSIONS;
    Ok(BreakthroughRoll::Failure {
        foundation_damage: rng.gen_range(dmg_lo..=dmg_hi),
        exp_loss_percent: rng.gen_range(loss_lo..=loss_hi),
        recovery_time: rng.gen_range(rec_lo..=rec_hi),
        success_rate,
    })
}

/// Where a cultivator sits in the progression state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressionPhase {
    /// Below stage 9, or at stage 9 without the foundation to try.
    Accumulating,
    ReadyForBreakthrough,
    /// Sessions remaining before another attempt is allowed.
    Recovering(u32),
    /// Peak of the final realm.
    AtCap,
}

pub fn progression_phase(realm: Realm, stage: u32, foundation_quality: u32, recovery_time: u32) -> ProgressionPhase {
    if recovery_time > 0 {
        return ProgressionPhase::Recovering(recovery_time);
    }
    if stage == MAX_STAGE && realm.is_final() {
        return ProgressionPhase::AtCap;
    }
    match can_attempt_breakthrough(realm, stage, foundation_quality) {
        Ok(()) => ProgressionPhase::ReadyForBreakthrough,
        Err(_) => ProgressionPhase::Accumulating,
    }
}

/// Relative combat power, for display and comparison only.
pub fn combat_power(realm: Realm, stage: u32, foundation_quality: u32) -> u64 {
    let base = realm.info().power_multiplier * POWER_BASE_SCALE;
    let staged = base * (1.0 + stage.saturating_sub(1) as f64 * POWER_PER_STAGE);
    staged.floor() as u64 + foundation_quality as u64 * POWER_PER_FOUNDATION
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerComparison {
    OverwhelmingAdvantage,
    SignificantAdvantage,
    ModerateAdvantage,
    EvenlyMatched,
    SlightDisadvantage,
    SignificantDisadvantage,
    OverwhelmingDisadvantage,
}

impl PowerComparison {
    pub fn from_ratio(ratio: f64) -> Self {
        if ratio >= 2.0 {
            PowerComparison::OverwhelmingAdvantage
        } else if ratio >= 1.5 {
            PowerComparison::SignificantAdvantage
        } else if ratio >= 1.2 {
            PowerComparison::ModerateAdvantage
        } else if ratio >= 0.9 {
            PowerComparison::EvenlyMatched
        } else if ratio >= 0.7 {
            PowerComparison::SlightDisadvantage
        } else if ratio >= 0.5 {
            PowerComparison::SignificantDisadvantage
        } else {
            PowerComparison::OverwhelmingDisadvantage
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            PowerComparison::OverwhelmingAdvantage => "Overwhelming advantage - you could defeat them with ease",
            PowerComparison::SignificantAdvantage => "Significant advantage - you would likely win",
            PowerComparison::ModerateAdvantage => "Moderate advantage - you have the upper hand",
            PowerComparison::EvenlyMatched => "Evenly matched - outcome uncertain",
            PowerComparison::SlightDisadvantage => "Slight disadvantage - they have the advantage",
            PowerComparison::SignificantDisadvantage => "Significant disadvantage - you would likely lose",
            PowerComparison::OverwhelmingDisadvantage => {
                "Overwhelming disadvantage - you would be defeated easily"
            }
        }
    }
}

/// Compares two cultivators given as (realm, stage, foundation).
pub fn compare_combat_power(player: (Realm, u32, u32), opponent: (Realm, u32, u32)) -> PowerComparison {
    let mine = combat_power(player.0, player.1, player.2) as f64;
    let theirs = combat_power(opponent.0, opponent.1, opponent.2) as f64;
    PowerComparison::from_ratio(mine / theirs)
}

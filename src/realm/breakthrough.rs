//! Breakthrough attempts against the full cultivator state.

use super::awakening::{awaken_elements, AwakeningEvent};
use super::progression::{can_attempt_breakthrough, roll_breakthrough, BonusFactor, BreakthroughRoll};
use super::types::Realm;
use crate::core::constants::{
    BREAKTHROUGH_EFFECTS_CLEARED, DAO_MASTERY_CAP, DAO_MASTERY_PER_POINT, DAO_MASTERY_THRESHOLD,
    QI_DEVIATION_EXP_MULTIPLIER, STABILITY_BONUS_PER_POINT, STABILITY_BONUS_THRESHOLD,
};
use crate::core::error::CultivationError;
use crate::core::game_state::CultivatorState;
use crate::effects::{remove_random_negatives, EffectDuration, OngoingEffect, Polarity};
use rand::Rng;
use tracing::info;

/// Name of the effect every failed breakthrough leaves behind.
pub const QI_DEVIATION: &str = "Qi Deviation";

/// Bonus factors the state contributes to the success rate.
pub fn bonus_factors(state: &CultivatorState) -> Vec<BonusFactor> {
    let mut factors = Vec::new();

    let total_dao = state.total_comprehension();
    if total_dao > DAO_MASTERY_THRESHOLD {
        let value = (total_dao as f64 * DAO_MASTERY_PER_POINT).min(DAO_MASTERY_CAP);
        factors.push(BonusFactor::new("Dao Mastery", value));
    }

    if state.foundation_stability > STABILITY_BONUS_THRESHOLD {
        let value = (state.foundation_stability - STABILITY_BONUS_THRESHOLD) as f64 * STABILITY_BONUS_PER_POINT;
        factors.push(BonusFactor::new("Foundation Stability", value));
    }

    if state.breakthrough_guidance > 0.0 {
        factors.push(BonusFactor::new("Senior's Guidance", state.breakthrough_guidance));
    }

    factors
}

#[derive(Debug, Clone, PartialEq)]
pub enum BreakthroughReport {
    Success {
        from: Realm,
        to: Realm,
        success_rate: f64,
        foundation_bonus: u32,
        cleared_effects: Vec<String>,
        awakening: Option<AwakeningEvent>,
    },
    Failure {
        success_rate: f64,
        foundation_damage: u32,
        exp_lost: u64,
        recovery_time: u32,
    },
}

impl BreakthroughReport {
    pub fn is_success(&self) -> bool {
        matches!(self, BreakthroughReport::Success { .. })
    }
}

/// Checks eligibility, rolls, and applies the outcome to `state`.
///
/// Refusals leave the state untouched. Any guidance earned beforehand is
/// spent by the attempt whatever its outcome.
pub fn attempt_breakthrough(
    state: &mut CultivatorState,
    rng: &mut impl Rng,
) -> Result<BreakthroughReport, CultivationError> {
    if state.recovery_time > 0 {
        return Err(CultivationError::Recovering {
            sessions: state.recovery_time,
        });
    }
    can_attempt_breakthrough(state.realm, state.stage, state.foundation_quality)?;

    let factors = bonus_factors(state);
    let roll = roll_breakthrough(state.realm, state.foundation_quality, &factors, rng)?;
    state.breakthrough_guidance = 0.0;

    let report = match roll {
        BreakthroughRoll::Success {
            new_realm,
            foundation_bonus,
            success_rate,
        } => {
            let from = state.realm;
            state.realm = new_realm;
            state.stage = 1;
            state.experience = 0;
            state.foundation_quality += foundation_bonus;
            state.stats.total_breakthroughs += 1;
            let cleared_effects =
                remove_random_negatives(&mut state.ongoing_effects, BREAKTHROUGH_EFFECTS_CLEARED, rng);
            let awakening = awaken_elements(state, rng);
            info!(%from, to = %new_realm, success_rate, "breakthrough succeeded");

            BreakthroughReport::Success {
                from,
                to: new_realm,
                success_rate,
                foundation_bonus,
                cleared_effects,
                awakening,
            }
        }
        BreakthroughRoll::Failure {
            foundation_damage,
            exp_loss_percent,
            recovery_time,
            success_rate,
        } => {
            let exp_lost = state.experience * exp_loss_percent as u64 / 100;
            state.experience -= exp_lost;
            state.damage_foundation(foundation_damage);
            state.recovery_time = recovery_time;
            state.ongoing_effects.push(OngoingEffect {
                name: QI_DEVIATION.to_string(),
                polarity: Polarity::Negative,
                description: "Failed breakthrough disrupted your qi flow".to_string(),
                exp_multiplier: QI_DEVIATION_EXP_MULTIPLIER,
                remaining: EffectDuration::Sessions(recovery_time),
            });
            state.stats.breakthrough_failures += 1;
            info!(realm = %state.realm, success_rate, recovery_time, "breakthrough failed");

            BreakthroughReport::Failure {
                success_rate,
                foundation_damage,
                exp_lost,
                recovery_time,
            }
        }
    };

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn ready(realm: Realm, foundation: u32) -> CultivatorState {
        let mut state = CultivatorState::new("Test".to_string(), 0);
        state.realm = realm;
        state.stage = 9;
        state.foundation_quality = foundation;
        state.experience = 200;
        state
    }

    #[test]
    fn test_bonus_factors() {
        let mut state = CultivatorState::new("Test".to_string(), 0);
        // Stability 100 gives 0.02; no dao yet.
        let factors = bonus_factors(&state);
        assert_eq!(factors.len(), 1);
        assert!((factors[0].value - 0.02).abs() < 1e-9);

        state.add_comprehension("sword", 40);
        let factors = bonus_factors(&state);
        assert!((factors[0].value - 0.08).abs() < 1e-9);

        state.add_comprehension("fire", 500);
        assert!((bonus_factors(&state)[0].value - 0.15).abs() < 1e-9);

        state.foundation_stability = 80;
        state.dao_comprehension.values_mut().for_each(|v| *v = 0);
        assert!(bonus_factors(&state).is_empty());
    }

    #[test]
    fn test_guidance_is_spent_by_the_next_attempt() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut state = ready(Realm::QiGathering, 50);
        state.breakthrough_guidance = 0.15;
        let guidance = bonus_factors(&state)
            .into_iter()
            .find(|f| f.name == "Senior's Guidance")
            .unwrap();
        assert!((guidance.value - 0.15).abs() < 1e-9);

        state.recovery_time = 2;
        assert!(attempt_breakthrough(&mut state, &mut rng).is_err());
        assert!((state.breakthrough_guidance - 0.15).abs() < 1e-9);

        state.recovery_time = 0;
        attempt_breakthrough(&mut state, &mut rng).unwrap();
        assert_eq!(state.breakthrough_guidance, 0.0);
        assert!(bonus_factors(&state).iter().all(|f| f.name != "Senior's Guidance"));
    }

    #[test]
    fn test_refusals_do_not_mutate() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut state = ready(Realm::QiGathering, 50);
        state.stage = 7;
        let before = state.clone();
        assert_eq!(
            attempt_breakthrough(&mut state, &mut rng),
            Err(CultivationError::StageTooLow { stage: 7 })
        );
        assert_eq!(state, before);

        let mut state = ready(Realm::QiGathering, 50);
        state.recovery_time = 4;
        assert_eq!(
            attempt_breakthrough(&mut state, &mut rng),
            Err(CultivationError::Recovering { sessions: 4 })
        );

        let mut state = ready(Realm::QiGathering, 25);
        assert_eq!(
            attempt_breakthrough(&mut state, &mut rng),
            Err(CultivationError::FoundationTooWeak { needed: 15 })
        );
    }

    #[test]
    fn test_success_and_failure_paths() {
        let mut rng = ChaCha8Rng::seed_from_u64(2024);
        let mut saw_success = false;
        let mut saw_failure = false;

        for _ in 0..100 {
            let mut state = ready(Realm::QiGathering, 50);
            state.ongoing_effects.push(OngoingEffect {
                name: "Qi Stagnation".to_string(),
                polarity: Polarity::Negative,
                description: String::new(),
                exp_multiplier: 0.85,
                remaining: EffectDuration::UntilCured,
            });

            match attempt_breakthrough(&mut state, &mut rng).unwrap() {
                BreakthroughReport::Success {
                    to,
                    foundation_bonus,
                    cleared_effects,
                    awakening,
                    ..
                } => {
                    saw_success = true;
                    assert_eq!(to, Realm::FoundationBuilding);
                    assert_eq!(state.realm, Realm::FoundationBuilding);
                    assert_eq!((state.stage, state.experience), (1, 0));
                    assert_eq!(state.foundation_quality, 50 + foundation_bonus);
                    assert_eq!(cleared_effects, vec!["Qi Stagnation".to_string()]);
                    assert!(state.ongoing_effects.is_empty());
                    assert!(matches!(awakening, Some(AwakeningEvent::PrimaryAwakened { .. })));
                    assert_eq!(state.stats.total_breakthroughs, 1);
                }
                BreakthroughReport::Failure {
                    foundation_damage,
                    exp_lost,
                    recovery_time,
                    ..
                } => {
                    saw_failure = true;
                    assert_eq!(state.realm, Realm::QiGathering);
                    assert_eq!(state.stage, 9);
                    assert_eq!(state.foundation_quality, 50 - foundation_damage);
                    assert!((20..=60).contains(&exp_lost));
                    assert_eq!(state.experience, 200 - exp_lost);
                    assert_eq!(state.recovery_time, recovery_time);
                    let deviation = state.ongoing_effects.last().unwrap();
                    assert_eq!(deviation.name, QI_DEVIATION);
                    assert_eq!(deviation.remaining, EffectDuration::Sessions(recovery_time));
                    assert_eq!(state.stats.breakthrough_failures, 1);
                    assert!(matches!(
                        attempt_breakthrough(&mut state, &mut rng),
                        Err(CultivationError::Recovering { .. })
                    ));
                }
            }
        }
        assert!(saw_success && saw_failure);
    }

    #[test]
    fn test_failure_respects_foundation_floor() {
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        for _ in 0..200 {
            // Body Tempering needs 20; damage of up to 8 would dip below 10 only from 17 down.
            let mut state = ready(Realm::BodyTempering, 20);
            let _ = attempt_breakthrough(&mut state, &mut rng).unwrap();
            assert!(state.foundation_quality >= 10);
        }
    }

    #[test]
    fn test_pinnacle_refusal() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut refused = false;
        for _ in 0..50 {
            let mut state = ready(Realm::HeavenlyImmortal, 100_000);
            if let Err(CultivationError::AtPinnacle { .. }) = attempt_breakthrough(&mut state, &mut rng) {
                refused = true;
                assert_eq!(state.realm, Realm::HeavenlyImmortal);
            }
        }
        assert!(refused);
    }
}

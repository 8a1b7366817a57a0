//! Integration test: the cultivation loop from a fresh character through
//! its first breakthrough, plus batch control and recovery gating.

use cultivator::choices::ChoiceConfig;
use cultivator::core::{
    cultivate_batch, cultivate_session, BatchControl, CultivationError, CultivationFocus,
    CultivatorState, LocationBonuses,
};
use cultivator::effects::{EffectDuration, OngoingEffect, Polarity};
use cultivator::encounters::EncounterConfig;
use cultivator::realm::{attempt_breakthrough, BreakthroughReport, ProgressionPhase, Realm, QI_DEVIATION};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn quiet() -> EncounterConfig {
    EncounterConfig {
        base_rate: 0.0,
        drought_threshold: u32::MAX,
        choices: ChoiceConfig::disabled(),
        ..Default::default()
    }
}

/// Cultivate until breakthrough is allowed, giving up after `limit` sessions.
fn cultivate_until_ready(state: &mut CultivatorState, rng: &mut ChaCha8Rng, limit: u32) -> u32 {
    let location = LocationBonuses::default();
    let config = EncounterConfig::default();
    for n in 1..=limit {
        cultivate_session(state, &location, &config, rng);
        if state.phase() == ProgressionPhase::ReadyForBreakthrough {
            return n;
        }
    }
    panic!("not ready after {limit} sessions: {:?}", state.phase());
}

#[test]
fn test_first_breakthrough_cycle() {
    let mut rng = ChaCha8Rng::seed_from_u64(2024);
    let mut state = CultivatorState::new("Integration Disciple".to_string(), 0);

    assert_eq!(state.realm, Realm::BodyTempering);
    assert_eq!(state.stage, 1);
    assert_eq!(state.phase(), ProgressionPhase::Accumulating);

    let sessions = cultivate_until_ready(&mut state, &mut rng, 500);
    assert!(sessions > 10, "stage ladder should take a while, took {sessions}");
    assert_eq!(state.stage, 9);
    // Milestone stages 3, 6 and 9 each add foundation
    assert!(state.foundation_quality >= 10 + 6 + 12 + 18);

    let mut attempts = 0;
    loop {
        attempts += 1;
        assert!(attempts < 50, "breakthrough never succeeded");
        match attempt_breakthrough(&mut state, &mut rng) {
            Ok(BreakthroughReport::Success { from, to, .. }) => {
                assert_eq!(from, Realm::BodyTempering);
                assert_eq!(to, Realm::QiGathering);
                break;
            }
            Ok(BreakthroughReport::Failure { recovery_time, .. }) => {
                assert_eq!(state.recovery_time, recovery_time);
                assert!(state.ongoing_effects.iter().any(|e| e.name == QI_DEVIATION));
                cultivate_until_ready(&mut state, &mut rng, 500);
            }
            Err(refusal) => panic!("unexpected refusal: {refusal}"),
        }
    }

    assert_eq!(state.realm, Realm::QiGathering);
    assert_eq!(state.stage, 1);
    assert_eq!(state.experience, 0);
    assert_eq!(state.stats.total_breakthroughs, 1);
    assert_eq!(state.stats.breakthrough_failures, attempts - 1);
    assert_eq!(state.title(), "Initial Qi Gathering");
}

#[test]
fn test_qi_gathering_peak_with_foundation_50_is_eligible() {
    let mut state = CultivatorState::new("Eligible".to_string(), 0);
    state.realm = Realm::QiGathering;
    state.stage = 9;
    state.foundation_quality = 50;
    assert_eq!(state.phase(), ProgressionPhase::ReadyForBreakthrough);

    state.foundation_quality = 39;
    assert_eq!(state.phase(), ProgressionPhase::Accumulating);
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let before = state.clone();
    assert_eq!(
        attempt_breakthrough(&mut state, &mut rng),
        Err(CultivationError::FoundationTooWeak { needed: 1 })
    );
    assert_eq!(state, before);
}

#[test]
fn test_recovery_blocks_then_expires() {
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let mut state = CultivatorState::new("Recovering".to_string(), 0);
    state.stage = 9;
    state.foundation_quality = 60;
    state.recovery_time = 2;

    assert_eq!(state.phase(), ProgressionPhase::Recovering(2));
    assert_eq!(
        attempt_breakthrough(&mut state, &mut rng),
        Err(CultivationError::Recovering { sessions: 2 })
    );

    let location = LocationBonuses::default();
    cultivate_session(&mut state, &location, &quiet(), &mut rng);
    assert_eq!(state.recovery_time, 1);
    cultivate_session(&mut state, &location, &quiet(), &mut rng);
    assert_eq!(state.recovery_time, 0);
    assert_eq!(state.phase(), ProgressionPhase::ReadyForBreakthrough);
}

#[test]
fn test_net_experience_never_below_one() {
    let mut rng = ChaCha8Rng::seed_from_u64(77);
    let mut state = CultivatorState::new("Cursed".to_string(), 0);
    for _ in 0..6 {
        state.ongoing_effects.push(OngoingEffect {
            name: "Heart Demon".to_string(),
            polarity: Polarity::Negative,
            description: String::new(),
            exp_multiplier: 0.1,
            remaining: EffectDuration::UntilCured,
        });
    }

    let location = LocationBonuses::default();
    let config = EncounterConfig::default();
    for _ in 0..30 {
        let result = cultivate_session(&mut state, &location, &config, &mut rng);
        assert!(result.modified_exp >= 1);
        assert!(result.net_exp >= 1);
    }
}

#[test]
fn test_effect_counts_this_session_then_expires() {
    let mut rng = ChaCha8Rng::seed_from_u64(9);
    let mut state = CultivatorState::new("Fleeting".to_string(), 0);
    state.ongoing_effects.push(OngoingEffect {
        name: "Sudden Clarity".to_string(),
        polarity: Polarity::Positive,
        description: String::new(),
        exp_multiplier: 2.0,
        remaining: EffectDuration::Sessions(1),
    });

    let result = cultivate_session(&mut state, &LocationBonuses::default(), &quiet(), &mut rng);
    assert_eq!(result.modified_exp, result.base_exp * 2);
    assert!(state.ongoing_effects.is_empty());

    let result = cultivate_session(&mut state, &LocationBonuses::default(), &quiet(), &mut rng);
    assert_eq!(result.modified_exp, result.base_exp);
}

#[test]
fn test_batch_attempts_breakthrough_when_ready() {
    let mut rng = ChaCha8Rng::seed_from_u64(31);
    let mut state = CultivatorState::new("Batcher".to_string(), 0);
    state.cultivation_focus = CultivationFocus::Foundation;
    state.stage = 9;
    state.foundation_quality = 200;

    let batch = cultivate_batch(
        &mut state,
        5,
        &LocationBonuses::default(),
        &quiet(),
        &mut rng,
        |state, _| {
            if state.phase() == ProgressionPhase::ReadyForBreakthrough {
                BatchControl::AttemptBreakthrough
            } else {
                BatchControl::Continue
            }
        },
    );

    // Stage 9 with a strong foundation is ready after the first session
    assert!(!batch.breakthroughs.is_empty());
    if batch.breakthroughs[0].is_success() {
        assert_eq!(state.realm, Realm::QiGathering);
        assert_eq!(batch.sessions.len(), 5);
    } else {
        assert_eq!(batch.sessions.len(), 1);
        assert!(batch.stopped_early);
    }
}

#[test]
fn test_batch_stop_keeps_completed_sessions() {
    let mut rng = ChaCha8Rng::seed_from_u64(4);
    let mut state = CultivatorState::new("Patient".to_string(), 0);
    let mut seen = 0;

    let batch = cultivate_batch(
        &mut state,
        10,
        &LocationBonuses::default(),
        &quiet(),
        &mut rng,
        |_, _| {
            seen += 1;
            if seen == 3 {
                BatchControl::Stop
            } else {
                BatchControl::Continue
            }
        },
    );

    assert_eq!(batch.sessions.len(), 3);
    assert!(batch.stopped_early);
    assert_eq!(state.stats.total_sessions, 3);
    assert_eq!(state.history.len(), 3);
    assert_eq!(batch.total_exp(), batch.sessions.iter().map(|s| s.net_exp).sum::<u64>());
}

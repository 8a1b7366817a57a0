//! Simulation runner driving the real cultivation core.
//!
//! Every run goes through `cultivate_session`, `resolve_choice`, `travel`,
//! `attempt_breakthrough` and `meditate`, so simulated pacing matches what a
//! player sees.

use super::config::SimConfig;
use super::report::SimReport;
use crate::choices::resolve_choice;
use crate::core::game_state::CultivatorState;
use crate::core::session::cultivate_session;
use crate::effects::meditate;
use crate::encounters::EncounterConfig;
use crate::locations::{best_unlocked, location_bonuses, travel, LocationId};
use crate::realm::{attempt_breakthrough, BreakthroughReport, ProgressionPhase, Realm};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

/// Statistics collected from a single run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunStats {
    pub final_realm: Realm,
    pub final_stage: u32,
    pub final_foundation: u32,
    pub sessions: u64,
    pub reached_target: bool,
    pub breakthroughs: u64,
    pub breakthrough_failures: u64,
    pub encounters: u64,
    pub choices: u64,
    pub meditations: u64,
    pub stones_earned: u64,
    pub final_wealth: u64,
    pub final_location: LocationId,
    /// Session at which each realm (by index) was entered.
    pub realm_entered_at: Vec<Option<u64>>,
}

/// Run the full simulation and return a report.
pub fn run_simulation(config: &SimConfig) -> SimReport {
    let mut all_runs = Vec::with_capacity(config.num_runs as usize);

    for run_idx in 0..config.num_runs {
        let mut rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed + run_idx as u64),
            None => ChaCha8Rng::from_entropy(),
        };

        let run = simulate_single_run(config, &mut rng);
        info!(
            run = run_idx + 1,
            of = config.num_runs,
            realm = %run.final_realm,
            stage = run.final_stage,
            sessions = run.sessions,
            "run finished"
        );
        all_runs.push(run);
    }

    SimReport::from_runs(all_runs, config)
}

/// Simulates one cultivator from creation until the target realm, the
/// final realm's peak, or the session limit.
pub fn simulate_single_run<R: Rng>(config: &SimConfig, rng: &mut R) -> RunStats {
    let mut state = CultivatorState::new("Simulated".to_string(), 0);
    state.cultivation_focus = config.focus;
    let encounter_config = EncounterConfig::default();

    let mut realm_entered_at = vec![None; Realm::all().len()];
    realm_entered_at[state.realm.index()] = Some(0);
    let mut meditations = 0;
    let mut sessions = 0;

    while sessions < config.max_sessions && state.realm < config.target_realm {
        sessions += 1;
        if let Some(encounter) = state.choices.roll(state.realm, &encounter_config.choices, rng) {
            if let Some(option) = config.choice_policy.pick(encounter) {
                if let Ok(resolution) = resolve_choice(&mut state, encounter, option, rng) {
                    debug!(encounter = resolution.encounter, outcome = ?resolution.outcome, "simulated choice");
                }
            }
        }
        let location = location_bonuses(&state);
        cultivate_session(&mut state, &location, &encounter_config, rng);

        if config.meditate_threshold > 0 && state.negative_effect_count() >= config.meditate_threshold {
            meditate(&mut state, rng);
            meditations += 1;
        }

        match state.phase() {
            ProgressionPhase::ReadyForBreakthrough if config.auto_breakthrough => {
                if let Ok(BreakthroughReport::Success { to, .. }) = attempt_breakthrough(&mut state, rng) {
                    realm_entered_at[to.index()] = Some(sessions);
                    debug!(realm = %to, sessions, "simulated breakthrough");
                    if config.auto_travel {
                        if let Ok(location) = travel(&mut state, best_unlocked(to)) {
                            debug!(location = location.name, "simulated travel");
                        }
                    }
                }
            }
            ProgressionPhase::AtCap => break,
            _ => {}
        }
    }

    RunStats {
        final_realm: state.realm,
        final_stage: state.stage,
        final_foundation: state.foundation_quality,
        sessions,
        reached_target: state.realm >= config.target_realm,
        breakthroughs: state.stats.total_breakthroughs,
        breakthrough_failures: state.stats.breakthrough_failures,
        encounters: state.stats.total_encounters,
        choices: state.choices.choices_made,
        meditations,
        stones_earned: state.stats.spirit_stones_earned,
        final_wealth: state.spirit_stones.total_value(),
        final_location: state.location,
        realm_entered_at,
    }
}

//! Per-session cultivation orchestration.
//!
//! [`cultivate_session`] runs one discrete turn against the cultivator state
//! and returns a [`SessionResult`] describing what happened, so the shell
//! can render it without the core knowing anything about presentation.

use crate::choices::{resolve_choice, ChoiceEncounter, ChoiceResolution};
use crate::core::constants::{
    AGGRESSIVE_DAMAGE_CHANCE, AGGRESSIVE_EXP, AGGRESSIVE_FOUNDATION_LOSS, BALANCED_EXP,
    BALANCED_FOUNDATION_CHANCE, BALANCED_FOUNDATION_GAIN, FOUNDATION_FOCUS_EXP,
    FOUNDATION_FOCUS_GAIN, MAX_SESSION_HISTORY,
};
use crate::core::error::CultivationError;
use crate::core::game_state::CultivatorState;
use crate::effects::{apply_experience_modifiers, natural_recovery, tick_durations};
use crate::encounters::{
    apply_reward, generate_reward, EncounterCategory, EncounterConfig, Rarity, RewardBundle,
    TriggeredEncounter,
};
use crate::realm::{attempt_breakthrough, BreakthroughReport, StageAdvance};
use crate::stones::{generate_spirit_stone_reward, StoneBundle};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

/// How the cultivator spends a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CultivationFocus {
    #[default]
    Balanced,
    /// More experience, with a chance to crack the foundation.
    Aggressive,
    /// Little experience, reliable foundation growth.
    Foundation,
}

impl CultivationFocus {
    pub fn all() -> [CultivationFocus; 3] {
        [
            CultivationFocus::Balanced,
            CultivationFocus::Aggressive,
            CultivationFocus::Foundation,
        ]
    }

    pub fn name(self) -> &'static str {
        match self {
            CultivationFocus::Balanced => "Balanced",
            CultivationFocus::Aggressive => "Aggressive",
            CultivationFocus::Foundation => "Foundation",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            CultivationFocus::Balanced => "Steady progress with occasional foundation gains",
            CultivationFocus::Aggressive => "Faster progress at the risk of foundation damage",
            CultivationFocus::Foundation => "Slow progress that strengthens your foundation",
        }
    }
}

impl fmt::Display for CultivationFocus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Bonuses supplied by the cultivator's surroundings.
///
/// Comprehension and elemental entries are expected points per session:
/// the whole part is granted every session and the fraction is a chance
/// of one more. The stone multiplier scales encounter bounties.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationBonuses {
    pub name: String,
    pub comprehension: BTreeMap<String, f64>,
    pub elemental: BTreeMap<String, f64>,
    pub stone_multiplier: f64,
}

impl Default for LocationBonuses {
    fn default() -> Self {
        Self {
            name: "Secluded Cave".to_string(),
            comprehension: BTreeMap::new(),
            elemental: BTreeMap::new(),
            stone_multiplier: 1.0,
        }
    }
}

fn roll_points(rate: f64, rng: &mut impl Rng) -> u32 {
    if rate <= 0.0 {
        return 0;
    }
    let whole = rate.trunc();
    let fraction = rate - whole;
    let extra = if fraction > 0.0 && rng.gen::<f64>() < fraction { 1 } else { 0 };
    whole as u32 + extra
}

impl LocationBonuses {
    /// Resolves this session's share of the location bonuses.
    pub fn roll_reward(&self, rng: &mut impl Rng) -> RewardBundle {
        let mut reward = RewardBundle::default();
        for (aspect, rate) in &self.comprehension {
            let points = roll_points(*rate, rng);
            if points > 0 {
                reward.comprehension.insert(aspect.clone(), points);
            }
        }
        for (element, rate) in &self.elemental {
            let points = roll_points(*rate, rng);
            if points > 0 {
                reward.elemental.insert(element.clone(), points);
            }
        }
        reward
    }

    pub fn scale_stones(&self, stones: &StoneBundle) -> StoneBundle {
        let mut scaled = StoneBundle::new();
        for (grade, count) in stones.iter() {
            scaled.add(grade, (count as f64 * self.stone_multiplier).floor() as u64);
        }
        scaled
    }
}

/// Something noteworthy that happened during a session.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    FoundationGained { amount: u32 },
    FoundationDamaged { amount: u32 },
    Encounter {
        category: EncounterCategory,
        name: &'static str,
        description: &'static str,
        rarity: Rarity,
    },
    EffectGained { name: String },
    ExperienceLost { amount: u64 },
    SpiritStonesFound { stones: StoneBundle },
    StageAdvanced(StageAdvance),
    BreakthroughReady,
    NaturalRecovery { healed: usize },
    EffectsExpired { count: usize },
}

impl SessionEvent {
    pub fn describe(&self) -> String {
        match self {
            SessionEvent::FoundationGained { amount } => format!("Foundation strengthened (+{amount})"),
            SessionEvent::FoundationDamaged { amount } => {
                format!("Reckless cultivation damages your foundation (-{amount})")
            }
            SessionEvent::Encounter {
                category,
                name,
                description,
                rarity,
            } => format!("[{category} | {rarity}] {name}: {description}"),
            SessionEvent::EffectGained { name } => format!("New effect: {name}"),
            SessionEvent::ExperienceLost { amount } => format!("Lost {amount} experience"),
            SessionEvent::SpiritStonesFound { stones } => format!("Found spirit stones: {stones}"),
            SessionEvent::StageAdvanced(advance) => {
                if advance.foundation_bonus > 0 {
                    format!(
                        "Advanced to {} (foundation +{})",
                        advance.title, advance.foundation_bonus
                    )
                } else {
                    format!("Advanced to {}", advance.title)
                }
            }
            SessionEvent::BreakthroughReady => "You are ready to attempt a breakthrough!".to_string(),
            SessionEvent::NaturalRecovery { healed } => {
                format!("Your body recovered from {healed} negative effect(s)")
            }
            SessionEvent::EffectsExpired { count } => format!("{count} effect(s) faded"),
        }
    }
}

/// Outcome of one cultivation session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionResult {
    pub focus: CultivationFocus,
    pub base_exp: u64,
    /// Base experience after ongoing effects.
    pub modified_exp: u64,
    /// Experience actually granted, encounter rewards included. At least 1.
    pub net_exp: u64,
    pub foundation_change: i64,
    pub encounter: Option<TriggeredEncounter>,
    pub reward: RewardBundle,
    pub events: Vec<SessionEvent>,
    pub breakthrough_ready: bool,
}

/// Compact record kept in the persisted session history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSummary {
    pub session: u64,
    pub focus: CultivationFocus,
    pub base_exp: u64,
    pub final_exp: u64,
    pub foundation_change: i64,
    pub encounter: Option<EncounterRecord>,
    pub stones: StoneBundle,
    pub advancements: Vec<String>,
    pub effect_delta: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncounterRecord {
    pub name: String,
    pub category: EncounterCategory,
    pub rarity: Rarity,
}

fn roll_focus<R: Rng>(
    state: &mut CultivatorState,
    focus: CultivationFocus,
    events: &mut Vec<SessionEvent>,
    rng: &mut R,
) -> u64 {
    match focus {
        CultivationFocus::Balanced => {
            let exp = rng.gen_range(BALANCED_EXP.0..=BALANCED_EXP.1);
            if rng.gen::<f64>() < BALANCED_FOUNDATION_CHANCE {
                let amount = rng.gen_range(BALANCED_FOUNDATION_GAIN.0..=BALANCED_FOUNDATION_GAIN.1);
                state.foundation_quality += amount;
                events.push(SessionEvent::FoundationGained { amount });
            }
            exp
        }
        CultivationFocus::Aggressive => {
            let exp = rng.gen_range(AGGRESSIVE_EXP.0..=AGGRESSIVE_EXP.1);
            if rng.gen::<f64>() < AGGRESSIVE_DAMAGE_CHANCE {
                let before = state.foundation_quality;
                state.damage_foundation(rng.gen_range(AGGRESSIVE_FOUNDATION_LOSS.0..=AGGRESSIVE_FOUNDATION_LOSS.1));
                let amount = before - state.foundation_quality;
                if amount > 0 {
                    events.push(SessionEvent::FoundationDamaged { amount });
                }
            }
            exp
        }
        CultivationFocus::Foundation => {
            let exp = rng.gen_range(FOUNDATION_FOCUS_EXP.0..=FOUNDATION_FOCUS_EXP.1);
            let amount = rng.gen_range(FOUNDATION_FOCUS_GAIN.0..=FOUNDATION_FOCUS_GAIN.1);
            state.foundation_quality += amount;
            state.stats.foundation_sessions += 1;
            events.push(SessionEvent::FoundationGained { amount });
            exp
        }
    }
}

/// Runs one cultivation session with the state's current focus.
pub fn cultivate_session<R: Rng>(
    state: &mut CultivatorState,
    location: &LocationBonuses,
    config: &EncounterConfig,
    rng: &mut R,
) -> SessionResult {
    let mut events = Vec::new();
    let focus = state.cultivation_focus;
    let foundation_before = state.foundation_quality as i64;
    let effects_before = state.ongoing_effects.len() as i64;

    // ── 1. Recovery countdown ───────────────────────────────────
    state.recovery_time = state.recovery_time.saturating_sub(1);

    // ── 2. Focus roll and effect modifiers ──────────────────────
    let base_exp = roll_focus(state, focus, &mut events, rng);
    let modified_exp = apply_experience_modifiers(base_exp, &state.ongoing_effects);

    // ── 3. Encounter roll ───────────────────────────────────────
    let encounter = state.encounters.process_session(state.realm, config, rng);
    let mut reward = location.roll_reward(rng);
    if let Some(triggered) = &encounter {
        let def = triggered.definition;
        events.push(SessionEvent::Encounter {
            category: triggered.category,
            name: def.name,
            description: def.description,
            rarity: def.rarity,
        });
        reward.merge(generate_reward(triggered.category, def, state.realm, rng));

        let stones = location.scale_stones(&generate_spirit_stone_reward(state.realm, rng));
        if !stones.is_empty() {
            events.push(SessionEvent::SpiritStonesFound {
                stones: stones.clone(),
            });
            reward.stones = stones;
        }
        state.stats.total_encounters += 1;
    }
    for effect in &reward.effects {
        events.push(SessionEvent::EffectGained {
            name: effect.name.clone(),
        });
    }

    // ── 4. Apply rewards and experience ─────────────────────────
    let encounter_exp = reward.experience;
    let net_exp = (modified_exp as i64 + encounter_exp).max(1);
    reward.experience = net_exp;
    let applied = apply_reward(state, &reward);
    // Keep the reward as generated for the caller.
    reward.experience = encounter_exp;

    let mut breakthrough_ready = false;
    if let Some(outcome) = applied.experience {
        breakthrough_ready = outcome.breakthrough_ready;
        events.extend(outcome.advances.into_iter().map(SessionEvent::StageAdvanced));
    }
    if applied.experience_lost > 0 {
        events.push(SessionEvent::ExperienceLost {
            amount: applied.experience_lost,
        });
    }
    if breakthrough_ready {
        events.push(SessionEvent::BreakthroughReady);
    }

    // ── 5. Natural recovery, then durations ─────────────────────
    let healed = natural_recovery(
        &mut state.ongoing_effects,
        state.foundation_quality,
        state.realm,
        rng,
    );
    if healed > 0 {
        events.push(SessionEvent::NaturalRecovery { healed });
    }
    let before_tick = state.ongoing_effects.len();
    tick_durations(&mut state.ongoing_effects);
    let expired = before_tick - state.ongoing_effects.len();
    if expired > 0 {
        events.push(SessionEvent::EffectsExpired { count: expired });
    }

    // ── 6. Bookkeeping ──────────────────────────────────────────
    state.stats.total_sessions += 1;
    let result = SessionResult {
        focus,
        base_exp,
        modified_exp,
        net_exp: net_exp as u64,
        foundation_change: state.foundation_quality as i64 - foundation_before,
        encounter,
        reward,
        events,
        breakthrough_ready,
    };
    let effect_delta = state.ongoing_effects.len() as i64 - effects_before;
    record_history(state, &result, effect_delta);

    debug!(
        session = state.stats.total_sessions,
        %focus,
        base_exp,
        net_exp = result.net_exp,
        encounter = result.encounter.map(|e| e.definition.name),
        "session complete"
    );
    result
}

fn record_history(state: &mut CultivatorState, result: &SessionResult, effect_delta: i64) {
    let advancements = result
        .events
        .iter()
        .filter_map(|e| match e {
            SessionEvent::StageAdvanced(advance) => Some(advance.title.clone()),
            _ => None,
        })
        .collect();

    state.history.push_back(SessionSummary {
        session: state.stats.total_sessions,
        focus: result.focus,
        base_exp: result.base_exp,
        final_exp: result.net_exp,
        foundation_change: result.foundation_change,
        encounter: result.encounter.map(|e| EncounterRecord {
            name: e.definition.name.to_string(),
            category: e.category,
            rarity: e.definition.rarity,
        }),
        stones: result.reward.stones.clone(),
        advancements,
        effect_delta,
    });
    while state.history.len() > MAX_SESSION_HISTORY {
        state.history.pop_front();
    }
}

/// Decision returned by a batch control callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchControl {
    Continue,
    Stop,
    /// Attempt a breakthrough now, then keep going unless it fails.
    AttemptBreakthrough,
    /// Take the zero-based option of the choice encounter on offer.
    Choose(usize),
}

/// What a batch hands to its control callback.
#[derive(Debug, Clone, Copy)]
pub enum BatchPrompt<'a> {
    /// A session just finished.
    Session(&'a SessionResult),
    /// A choice encounter interrupts before the next session.
    /// `Choose` takes an option, `Stop` ends the batch, anything else skips it.
    Choice(&'static ChoiceEncounter),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchResult {
    pub sessions: Vec<SessionResult>,
    pub breakthroughs: Vec<BreakthroughReport>,
    pub choices: Vec<ChoiceResolution>,
    /// Breakthrough requests and choices the core refused.
    pub refusals: Vec<CultivationError>,
    pub stopped_early: bool,
}

impl BatchResult {
    pub fn total_exp(&self) -> u64 {
        self.sessions.iter().map(|s| s.net_exp).sum()
    }

    pub fn encounters(&self) -> usize {
        self.sessions.iter().filter(|s| s.encounter.is_some()).count()
    }
}

/// Runs up to `count` sessions back to back.
///
/// Before each session a choice encounter may be offered through `control`.
/// After each session `control` sees the state and the result. A failed
/// breakthrough ends the batch. Sessions already run are never rolled back.
pub fn cultivate_batch<R, F>(
    state: &mut CultivatorState,
    count: u32,
    location: &LocationBonuses,
    config: &EncounterConfig,
    rng: &mut R,
    mut control: F,
) -> BatchResult
where
    R: Rng,
    F: FnMut(&CultivatorState, BatchPrompt<'_>) -> BatchControl,
{
    let mut batch = BatchResult::default();

    for done in 1..=count {
        if let Some(encounter) = state.choices.roll(state.realm, &config.choices, rng) {
            match control(state, BatchPrompt::Choice(encounter)) {
                BatchControl::Choose(option) => match resolve_choice(state, encounter, option, rng) {
                    Ok(resolution) => batch.choices.push(resolution),
                    Err(refusal) => {
                        debug!(%refusal, "choice refused during batch");
                        batch.refusals.push(refusal);
                    }
                },
                BatchControl::Stop => {
                    batch.stopped_early = true;
                    break;
                }
                _ => debug!(encounter = encounter.name, "choice skipped"),
            }
        }

        let result = cultivate_session(state, location, config, rng);
        let decision = control(state, BatchPrompt::Session(&result));
        batch.sessions.push(result);

        match decision {
            BatchControl::Continue | BatchControl::Choose(_) => {}
            BatchControl::Stop => {
                batch.stopped_early = done < count;
                break;
            }
            BatchControl::AttemptBreakthrough => match attempt_breakthrough(state, rng) {
                Ok(report) => {
                    let failed = !report.is_success();
                    batch.breakthroughs.push(report);
                    if failed {
                        batch.stopped_early = done < count;
                        break;
                    }
                }
                Err(refusal) => {
                    debug!(%refusal, "breakthrough request refused during batch");
                    batch.refusals.push(refusal);
                }
            },
        }
    }

    batch
}

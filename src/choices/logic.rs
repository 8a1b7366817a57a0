//! When choice encounters appear, which one appears, and resolving a choice.

use super::data::choice_catalog;
use super::types::{ChoiceEncounter, ChoiceOutcome, Consequence, OutcomeKind, RiskLevel};
use crate::core::constants::{
    CHOICE_BASE_CHANCE, CHOICE_LONG_WAIT_BONUS, CHOICE_LONG_WAIT_THRESHOLD, CHOICE_PATIENCE_BONUS,
    CHOICE_PATIENCE_THRESHOLD,
};
use crate::core::error::CultivationError;
use crate::core::game_state::CultivatorState;
use crate::encounters::{apply_reward, AppliedReward, Rarity, Reward, RewardBundle};
use crate::realm::Realm;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq)]
pub struct ChoiceConfig {
    pub base_chance: f64,
    /// Sessions without a choice after which `patience_bonus` applies.
    pub patience_threshold: u32,
    pub patience_bonus: f64,
    pub long_wait_threshold: u32,
    /// Stacks on top of the patience bonus.
    pub long_wait_bonus: f64,
}

impl Default for ChoiceConfig {
    fn default() -> Self {
        Self {
            base_chance: CHOICE_BASE_CHANCE,
            patience_threshold: CHOICE_PATIENCE_THRESHOLD,
            patience_bonus: CHOICE_PATIENCE_BONUS,
            long_wait_threshold: CHOICE_LONG_WAIT_THRESHOLD,
            long_wait_bonus: CHOICE_LONG_WAIT_BONUS,
        }
    }
}

impl ChoiceConfig {
    /// A config under which no choice encounter ever appears.
    pub fn disabled() -> Self {
        Self {
            base_chance: 0.0,
            patience_threshold: u32::MAX,
            patience_bonus: 0.0,
            long_wait_threshold: u32::MAX,
            long_wait_bonus: 0.0,
        }
    }
}

/// Persistent choice pacing. The counter only resets once a choice is made,
/// so skipped choices make the next one more likely.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChoiceTracker {
    pub sessions_since_choice: u32,
    pub choices_made: u64,
    pub last_choice: Option<String>,
}

impl ChoiceTracker {
    pub fn choice_chance(&self, config: &ChoiceConfig) -> f64 {
        let mut chance = config.base_chance;
        if self.sessions_since_choice > config.patience_threshold {
            chance += config.patience_bonus;
        }
        if self.sessions_since_choice > config.long_wait_threshold {
            chance += config.long_wait_bonus;
        }
        chance.min(1.0)
    }

    /// Counts one more session and rolls for a choice encounter.
    pub fn roll(
        &mut self,
        realm: Realm,
        config: &ChoiceConfig,
        rng: &mut impl Rng,
    ) -> Option<&'static ChoiceEncounter> {
        self.sessions_since_choice = self.sessions_since_choice.saturating_add(1);
        let chance = self.choice_chance(config);
        if rng.gen::<f64>() >= chance {
            return None;
        }
        let encounter = select_choice_encounter(realm, rng)?;
        debug!(encounter = encounter.name, chance, "choice encounter offered");
        Some(encounter)
    }

    fn record(&mut self, option: &str) {
        self.sessions_since_choice = 0;
        self.choices_made += 1;
        self.last_choice = Some(option.to_string());
    }
}

/// Chance that an encounter of each rarity makes the shortlist.
///
/// Realms outside the table use a common-leaning spread.
pub fn rarity_chances(realm: Realm) -> &'static [(Rarity, f64)] {
    use Rarity::*;
    match realm {
        Realm::BodyTempering => &[(Common, 0.7), (Uncommon, 0.2), (Rare, 0.1)],
        Realm::QiGathering => &[(Common, 0.6), (Uncommon, 0.3), (Rare, 0.1)],
        Realm::FoundationBuilding => &[(Common, 0.4), (Uncommon, 0.4), (Rare, 0.2)],
        Realm::CoreFormation => &[(Common, 0.3), (Uncommon, 0.4), (Rare, 0.25), (VeryRare, 0.05)],
        Realm::NascentSoul => &[(Common, 0.2), (Uncommon, 0.3), (Rare, 0.4), (VeryRare, 0.1)],
        _ => &[(Common, 0.5), (Uncommon, 0.3), (Rare, 0.2)],
    }
}

fn rarity_chance(realm: Realm, rarity: Rarity) -> f64 {
    rarity_chances(realm)
        .iter()
        .find(|(r, _)| *r == rarity)
        .map(|(_, chance)| *chance)
        .unwrap_or(0.0)
}

/// Shortlists each encounter with its rarity's chance, then picks one
/// shortlisted encounter uniformly. An empty shortlist means no encounter.
pub fn select_choice_encounter(realm: Realm, rng: &mut impl Rng) -> Option<&'static ChoiceEncounter> {
    let shortlist: Vec<&'static ChoiceEncounter> = choice_catalog()
        .iter()
        .filter(|encounter| {
            let chance = rarity_chance(realm, encounter.rarity);
            chance > 0.0 && rng.gen::<f64>() < chance
        })
        .collect();
    shortlist.choose(rng).copied()
}

static NOTHING_HAPPENS: ChoiceOutcome = ChoiceOutcome {
    kind: OutcomeKind::Partial,
    probability: 1.0,
    message: "Nothing comes of it.",
    consequences: &[],
    effect: None,
};

fn roll_outcome(outcomes: &'static [ChoiceOutcome], rng: &mut impl Rng) -> &'static ChoiceOutcome {
    let roll = rng.gen::<f64>();
    let mut cumulative = 0.0;
    for outcome in outcomes {
        cumulative += outcome.probability;
        if roll <= cumulative {
            return outcome;
        }
    }
    outcomes.last().unwrap_or(&NOTHING_HAPPENS)
}

/// What a resolved choice did.
#[derive(Debug, Clone, PartialEq)]
pub struct ChoiceResolution {
    pub encounter: &'static str,
    pub option: &'static str,
    pub risk: RiskLevel,
    pub outcome: OutcomeKind,
    pub message: &'static str,
    /// Gains applied through the shared reward path.
    pub reward: RewardBundle,
    pub applied: AppliedReward,
    pub foundation_lost: u32,
    pub guidance: f64,
}

impl ChoiceResolution {
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        if self.reward.experience > 0 {
            parts.push(format!("+{} exp", self.reward.experience));
        }
        if self.reward.foundation > 0 {
            parts.push(format!("+{} foundation", self.reward.foundation));
        }
        if self.foundation_lost > 0 {
            parts.push(format!("-{} foundation", self.foundation_lost));
        }
        for (aspect, amount) in &self.reward.comprehension {
            parts.push(format!("+{amount} {aspect} dao"));
        }
        for (element, amount) in &self.reward.elemental {
            parts.push(format!("+{amount} {element} affinity"));
        }
        if !self.reward.stones.is_empty() {
            parts.push(format!("stones {}", self.reward.stones));
        }
        if self.guidance > 0.0 {
            parts.push(format!("+{:.0}% next breakthrough", self.guidance * 100.0));
        }
        for effect in &self.reward.effects {
            parts.push(format!("effect: {}", effect.name));
        }
        parts.join(", ")
    }
}

/// Resolves option `option` (zero-based) of `encounter` against `state`.
///
/// Gains go through [`apply_reward`]. Foundation losses respect the
/// foundation floor. Effects are granted exactly as written.
pub fn resolve_choice(
    state: &mut CultivatorState,
    encounter: &'static ChoiceEncounter,
    option: usize,
    rng: &mut impl Rng,
) -> Result<ChoiceResolution, CultivationError> {
    let chosen = encounter
        .options
        .get(option)
        .ok_or(CultivationError::InvalidChoice {
            option: option + 1,
            options: encounter.options.len(),
        })?;
    let outcome = roll_outcome(chosen.outcomes, rng);

    let mut reward = RewardBundle::new();
    let mut foundation_loss = 0;
    let mut guidance = 0.0;
    for consequence in outcome.consequences {
        match *consequence {
            Consequence::Experience(amount) => reward.combine(Reward::Experience(amount)),
            Consequence::Foundation(amount) if amount >= 0 => {
                reward.combine(Reward::Foundation(amount as u32));
            }
            Consequence::Foundation(amount) => foundation_loss += amount.unsigned_abs(),
            Consequence::Comprehension(aspect, amount) => reward.combine(Reward::Comprehension {
                aspect: aspect.to_string(),
                amount,
            }),
            Consequence::Elemental(element, amount) => reward.combine(Reward::Elemental {
                element: element.to_string(),
                amount,
            }),
            Consequence::Stones(grade, count) => reward.stones.add(grade, count),
            Consequence::BreakthroughGuidance(bonus) => guidance += bonus,
        }
    }
    if let Some(effect) = &outcome.effect {
        reward.combine(Reward::Effect(effect.instantiate()));
    }

    let applied = apply_reward(state, &reward);
    let before = state.foundation_quality;
    state.damage_foundation(foundation_loss);
    let foundation_lost = before - state.foundation_quality;
    state.breakthrough_guidance += guidance;
    state.choices.record(chosen.description);

    info!(
        encounter = encounter.name,
        option = chosen.description,
        outcome = ?outcome.kind,
        "choice resolved"
    );

    Ok(ChoiceResolution {
        encounter: encounter.name,
        option: chosen.description,
        risk: chosen.risk,
        outcome: outcome.kind,
        message: outcome.message,
        reward,
        applied,
        foundation_lost,
        guidance,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::choices::find_choice;
    use crate::effects::EffectDuration;
    use crate::stones::Grade;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn encounter(name: &str) -> &'static ChoiceEncounter {
        find_choice(name).unwrap()
    }

    #[test]
    fn test_choice_chance_thresholds() {
        let config = ChoiceConfig::default();
        let mut tracker = ChoiceTracker::default();
        assert!((tracker.choice_chance(&config) - 0.25).abs() < 1e-9);
        tracker.sessions_since_choice = 10;
        assert!((tracker.choice_chance(&config) - 0.25).abs() < 1e-9);
        tracker.sessions_since_choice = 11;
        assert!((tracker.choice_chance(&config) - 0.35).abs() < 1e-9);
        tracker.sessions_since_choice = 21;
        assert!((tracker.choice_chance(&config) - 0.50).abs() < 1e-9);
        assert_eq!(tracker.choice_chance(&ChoiceConfig::disabled()), 0.0);
    }

    #[test]
    fn test_roll_counts_sessions_until_a_choice_is_made() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut tracker = ChoiceTracker::default();
        for _ in 0..30 {
            assert!(tracker.roll(Realm::BodyTempering, &ChoiceConfig::disabled(), &mut rng).is_none());
        }
        assert_eq!(tracker.sessions_since_choice, 30);
    }

    #[test]
    fn test_rarity_chances_by_realm() {
        let sum = |realm| rarity_chances(realm).iter().map(|(_, c)| c).sum::<f64>();
        for realm in Realm::all() {
            assert!((sum(realm) - 1.0).abs() < 1e-9, "{realm}");
        }
        assert_eq!(rarity_chance(Realm::BodyTempering, Rarity::VeryRare), 0.0);
        assert_eq!(rarity_chance(Realm::CoreFormation, Rarity::VeryRare), 0.05);
        assert_eq!(rarity_chance(Realm::Mahayana, Rarity::Rare), 0.2);
    }

    #[test]
    fn test_higher_realms_see_more_rare_choices() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let rare_share = |realm, rng: &mut ChaCha8Rng| {
            let picks: Vec<_> = (0..2_000).filter_map(|_| select_choice_encounter(realm, rng)).collect();
            picks.iter().filter(|e| e.rarity == Rarity::Rare).count() as f64 / picks.len() as f64
        };
        let low = rare_share(Realm::BodyTempering, &mut rng);
        let high = rare_share(Realm::NascentSoul, &mut rng);
        assert!(high > low, "{high} <= {low}");
    }

    #[test]
    fn test_invalid_option_is_refused() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut state = CultivatorState::new("Test".to_string(), 0);
        let before = state.clone();
        let err = resolve_choice(&mut state, encounter("Ancient Foundation Pill"), 3, &mut rng).unwrap_err();
        assert_eq!(err, CultivationError::InvalidChoice { option: 4, options: 3 });
        assert_eq!(state, before);
    }

    #[test]
    fn test_certain_outcome_applies_rewards() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let mut state = CultivatorState::new("Test".to_string(), 0);
        state.choices.sessions_since_choice = 12;
        let mid = state.spirit_stones.get(Grade::Mid);
        let high = state.spirit_stones.get(Grade::High);

        let resolution = resolve_choice(&mut state, encounter("Ancient Foundation Pill"), 2, &mut rng).unwrap();
        assert_eq!(resolution.outcome, OutcomeKind::Success);
        assert_eq!(resolution.risk, RiskLevel::Low);
        assert_eq!(state.spirit_stones.get(Grade::Mid), mid + 3);
        assert_eq!(state.spirit_stones.get(Grade::High), high + 1);
        assert_eq!(state.choices.sessions_since_choice, 0);
        assert_eq!(state.choices.choices_made, 1);
        assert_eq!(state.choices.last_choice.as_deref(), Some("Preserve it and sell it for spirit stones"));
    }

    #[test]
    fn test_elemental_blessing_grants_affinity_and_dao() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut state = CultivatorState::new("Test".to_string(), 0);
        resolve_choice(&mut state, encounter("Elemental Spirit Convergence"), 0, &mut rng).unwrap();
        assert_eq!(state.elemental_affinities["fire"], 12);
        assert_eq!(state.dao_comprehension["fire"], 3);
    }

    #[test]
    fn test_outcomes_follow_their_probabilities() {
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let pill = encounter("Ancient Foundation Pill");
        let mut successes = 0;
        for _ in 0..1_000 {
            let mut state = CultivatorState::new("Test".to_string(), 0);
            let resolution = resolve_choice(&mut state, pill, 0, &mut rng).unwrap();
            match resolution.outcome {
                OutcomeKind::Success => {
                    successes += 1;
                    assert_eq!(state.foundation_quality, 10 + 15);
                }
                OutcomeKind::Failure => {
                    let effect = state.ongoing_effects.last().unwrap();
                    assert_eq!(effect.name, "Pill Poisoning");
                    assert_eq!(effect.exp_multiplier, 0.8);
                    assert_eq!(effect.remaining, EffectDuration::Sessions(5));
                }
                OutcomeKind::Partial => panic!("consuming the pill has no partial outcome"),
            }
        }
        assert!((630..=770).contains(&successes), "{successes}");
    }

    #[test]
    fn test_lightning_failure_damages_foundation_above_floor() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let lightning = encounter("Natural Lightning Formation");
        let mut failures = 0;
        for _ in 0..200 {
            let mut state = CultivatorState::new("Test".to_string(), 0);
            state.foundation_quality = 12;
            let resolution = resolve_choice(&mut state, lightning, 0, &mut rng).unwrap();
            if resolution.outcome == OutcomeKind::Failure {
                failures += 1;
                assert_eq!(resolution.foundation_lost, 2);
                assert_eq!(state.foundation_quality, 10);
                assert_eq!(state.ongoing_effects[0].name, "Lightning Scars");
            }
        }
        assert!(failures > 0);
    }

    #[test]
    fn test_guidance_accumulates_on_state() {
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let senior = encounter("Senior Cultivator's Guidance");
        let mut granted = 0.0;
        for _ in 0..10 {
            let mut state = CultivatorState::new("Test".to_string(), 0);
            let resolution = resolve_choice(&mut state, senior, 0, &mut rng).unwrap();
            assert_eq!(state.breakthrough_guidance, resolution.guidance);
            granted += resolution.guidance;
            if resolution.outcome == OutcomeKind::Success {
                assert!((resolution.guidance - 0.15).abs() < 1e-9);
                assert!(resolution.summary().contains("next breakthrough"));
            }
        }
        assert!(granted > 0.0);
    }
}

//! Reward scaling, the random bonus layer, and applying rewards to state.

use super::types::{BaseReward, EncounterCategory, EncounterDefinition};
use crate::core::constants::{
    BONUS_COMPREHENSION_ASPECTS, BONUS_COMPREHENSION_CHANCE, BONUS_EXP_CHANCE,
    BONUS_FOUNDATION_CHANCE, COMPREHENSION_MULTIPLIER_CAP, EFFECT_DURATION_BASE_SCALE,
    EFFECT_DURATION_DECAY, EFFECT_DURATION_FLOOR_SCALE, ELEMENTAL_MULTIPLIER_CAP,
};
use crate::core::game_state::{CultivatorState, ELEMENTS};
use crate::effects::{EffectDuration, EffectTemplate, OngoingEffect};
use crate::realm::{ExperienceOutcome, Realm};
use crate::stones::StoneBundle;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::BTreeMap;
use tracing::debug;

/// One typed reward. Rewards of the same kind add together.
#[derive(Debug, Clone, PartialEq)]
pub enum Reward {
    Experience(i64),
    Comprehension { aspect: String, amount: u32 },
    Elemental { element: String, amount: u32 },
    Foundation(u32),
    Stones(StoneBundle),
    Effect(OngoingEffect),
}

/// Everything a session hands out, merged by kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RewardBundle {
    pub experience: i64,
    pub foundation: u32,
    pub comprehension: BTreeMap<String, u32>,
    pub elemental: BTreeMap<String, u32>,
    pub stones: StoneBundle,
    pub effects: Vec<OngoingEffect>,
}

impl RewardBundle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn combine(&mut self, reward: Reward) {
        match reward {
            Reward::Experience(amount) => self.experience += amount,
            Reward::Comprehension { aspect, amount } => {
                *self.comprehension.entry(aspect).or_insert(0) += amount;
            }
            Reward::Elemental { element, amount } => {
                *self.elemental.entry(element).or_insert(0) += amount;
            }
            Reward::Foundation(amount) => self.foundation += amount,
            Reward::Stones(bundle) => {
                for (grade, count) in bundle.iter() {
                    self.stones.add(grade, count);
                }
            }
            Reward::Effect(effect) => self.effects.push(effect),
        }
    }

    /// Folds `other` into `self`, kind by kind.
    pub fn merge(&mut self, other: RewardBundle) {
        self.experience += other.experience;
        self.foundation += other.foundation;
        for (aspect, amount) in other.comprehension {
            self.combine(Reward::Comprehension { aspect, amount });
        }
        for (element, amount) in other.elemental {
            self.combine(Reward::Elemental { element, amount });
        }
        self.combine(Reward::Stones(other.stones));
        self.effects.extend(other.effects);
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Realm scaling for encounter rewards. Realms outside the table scale by 1.0.
pub fn reward_multiplier(realm: Realm) -> f64 {
    match realm {
        Realm::FoundationBuilding => 1.2,
        Realm::CoreFormation => 1.5,
        Realm::NascentSoul => 2.0,
        Realm::SoulTransformation => 2.5,
        Realm::VoidRefinement => 3.0,
        _ => 1.0,
    }
}

/// Timed effects last relatively longer at low realms.
pub fn scale_effect(template: &EffectTemplate, multiplier: f64) -> OngoingEffect {
    let mut effect = template.instantiate();
    if let EffectDuration::Sessions(sessions) = effect.remaining {
        let scale = (EFFECT_DURATION_BASE_SCALE - (multiplier - 1.0) * EFFECT_DURATION_DECAY)
            .max(EFFECT_DURATION_FLOOR_SCALE);
        let scaled = ((sessions as f64 * scale) as u32).max(1);
        effect.remaining = EffectDuration::Sessions(scaled);
    }
    effect
}

/// Spreads `min..=max` points over one to three distinct random elements.
pub fn roll_elemental_surge(min: u32, max: u32, rng: &mut impl Rng) -> Vec<(&'static str, u32)> {
    let total = rng.gen_range(min..=max);
    let count = rng.gen_range(1..=3);
    let chosen: Vec<&'static str> = ELEMENTS.choose_multiple(rng, count).copied().collect();

    let mut remaining = total;
    let mut surge = Vec::with_capacity(chosen.len());
    for (i, element) in chosen.iter().enumerate() {
        let still_to_fill = (chosen.len() - i - 1) as u32;
        let points = if still_to_fill == 0 {
            remaining
        } else {
            rng.gen_range(1..=remaining.saturating_sub(still_to_fill).max(1))
        };
        remaining = remaining.saturating_sub(points);
        surge.push((*element, points));
    }
    surge
}

/// Small independent extras layered on top of the catalog rewards.
pub fn generate_bonus(category: EncounterCategory, multiplier: f64, rng: &mut impl Rng) -> RewardBundle {
    let mut bonus = RewardBundle::new();

    if rng.gen::<f64>() < BONUS_EXP_CHANCE {
        let exp = (category.bonus_experience() as f64 * multiplier) as i64;
        bonus.combine(Reward::Experience(exp));
    }

    if rng.gen::<f64>() < BONUS_COMPREHENSION_CHANCE {
        if let Some(aspect) = BONUS_COMPREHENSION_ASPECTS.choose(rng) {
            let amount = rng.gen_range(1..=((2.0 * multiplier) as u32).max(1));
            bonus.combine(Reward::Comprehension {
                aspect: aspect.to_string(),
                amount,
            });
        }
    }

    if category != EncounterCategory::Bottleneck && rng.gen::<f64>() < BONUS_FOUNDATION_CHANCE {
        let amount = rng.gen_range(1..=((3.0 * multiplier) as u32).max(1));
        bonus.combine(Reward::Foundation(amount));
    }

    bonus
}

/// Catalog rewards scaled for the realm, without the random bonus layer.
pub fn scale_rewards(definition: &EncounterDefinition, realm: Realm, rng: &mut impl Rng) -> RewardBundle {
    let multiplier = reward_multiplier(realm);
    let comprehension_mult = multiplier.min(COMPREHENSION_MULTIPLIER_CAP);
    let elemental_mult = multiplier.min(ELEMENTAL_MULTIPLIER_CAP);
    let mut bundle = RewardBundle::new();

    for reward in definition.rewards {
        match *reward {
            BaseReward::Experience(exp) => {
                bundle.combine(Reward::Experience((exp as f64 * multiplier) as i64));
            }
            BaseReward::Comprehension(aspect, amount) => bundle.combine(Reward::Comprehension {
                aspect: aspect.to_string(),
                amount: (amount as f64 * comprehension_mult) as u32,
            }),
            BaseReward::Foundation(amount) => {
                bundle.combine(Reward::Foundation((amount as f64 * multiplier) as u32));
            }
            BaseReward::ElementalSurge { min, max } => {
                for (element, points) in roll_elemental_surge(min, max, rng) {
                    bundle.combine(Reward::Elemental {
                        element: element.to_string(),
                        amount: (points as f64 * elemental_mult) as u32,
                    });
                }
            }
        }
    }

    if let Some(template) = &definition.effect {
        bundle.combine(Reward::Effect(scale_effect(template, multiplier)));
    }

    bundle
}

/// Full reward for a triggered encounter: scaled catalog rewards plus bonuses.
pub fn generate_reward(
    category: EncounterCategory,
    definition: &EncounterDefinition,
    realm: Realm,
    rng: &mut impl Rng,
) -> RewardBundle {
    let mut bundle = scale_rewards(definition, realm, rng);
    bundle.merge(generate_bonus(category, reward_multiplier(realm), rng));
    bundle
}

/// What applying a bundle did to the state.
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedReward {
    pub experience: Option<ExperienceOutcome>,
    pub experience_lost: u64,
    /// Comprehension or elemental keys the cultivator does not track.
    pub dropped_keys: Vec<String>,
    pub effects_added: usize,
}

/// Applies `bundle` to `state`.
///
/// Negative experience drains the current pool without lowering the stage.
/// Keys outside the fixed comprehension or element sets are dropped.
pub fn apply_reward(state: &mut CultivatorState, bundle: &RewardBundle) -> AppliedReward {
    let mut dropped_keys = Vec::new();

    for (aspect, amount) in &bundle.comprehension {
        if !state.add_comprehension(aspect, *amount) {
            dropped_keys.push(aspect.clone());
        }
    }
    for (element, amount) in &bundle.elemental {
        if !state.add_affinity(element, *amount) {
            dropped_keys.push(element.clone());
        }
    }
    if !dropped_keys.is_empty() {
        debug!(?dropped_keys, "ignoring untracked reward keys");
    }

    state.foundation_quality += bundle.foundation;

    if !bundle.stones.is_empty() {
        state.spirit_stones.deposit(&bundle.stones);
        state.stats.spirit_stones_earned += bundle.stones.count();
    }

    state.ongoing_effects.extend(bundle.effects.iter().cloned());

    let (experience, experience_lost) = match bundle.experience {
        gain if gain > 0 => (Some(state.add_experience(gain as u64)), 0),
        loss if loss < 0 => {
            let lost = loss.unsigned_abs().min(state.experience);
            state.experience -= lost;
            (None, lost)
        }
        _ => (None, 0),
    };

    AppliedReward {
        experience,
        experience_lost,
        dropped_keys,
        effects_added: bundle.effects.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::Polarity;
    use crate::encounters::{catalog, Rarity};
    use crate::stones::Grade;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    const WISDOM_SCROLL: EncounterDefinition = EncounterDefinition {
        name: "Wisdom Scroll",
        description: "A scroll of plain wisdom",
        rarity: Rarity::Common,
        rewards: &[BaseReward::Experience(50), BaseReward::Comprehension("wisdom", 5)],
        effect: None,
    };

    #[test]
    fn test_scaling_at_multiplier_two() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let bundle = scale_rewards(&WISDOM_SCROLL, Realm::NascentSoul, &mut rng);
        assert_eq!(bundle.experience, 100);
        assert_eq!(bundle.comprehension["wisdom"], 7);
    }

    #[test]
    fn test_reward_multiplier_table() {
        assert_eq!(reward_multiplier(Realm::BodyTempering), 1.0);
        assert_eq!(reward_multiplier(Realm::FoundationBuilding), 1.2);
        assert_eq!(reward_multiplier(Realm::VoidRefinement), 3.0);
        for pair in Realm::all()[..=Realm::VoidRefinement.index()].windows(2) {
            assert!(reward_multiplier(pair[0]) <= reward_multiplier(pair[1]));
        }
        assert_eq!(reward_multiplier(Realm::BodyIntegration), 1.0);
        assert_eq!(reward_multiplier(Realm::HeavenlyImmortal), 1.0);
    }

    #[test]
    fn test_effect_duration_scaling() {
        let template = EffectTemplate {
            name: "Enlightenment",
            polarity: Polarity::Positive,
            description: "",
            exp_multiplier: 1.25,
            duration: Some(10),
        };
        assert_eq!(scale_effect(&template, 1.0).remaining, EffectDuration::Sessions(15));
        assert_eq!(scale_effect(&template, 2.0).remaining, EffectDuration::Sessions(12));
        assert_eq!(scale_effect(&template, 3.0).remaining, EffectDuration::Sessions(9));

        let short = EffectTemplate {
            duration: Some(1),
            ..template.clone()
        };
        assert_eq!(scale_effect(&short, 10.0).remaining, EffectDuration::Sessions(1));

        let permanent = EffectTemplate {
            duration: None,
            ..template
        };
        assert_eq!(scale_effect(&permanent, 3.0).remaining, EffectDuration::UntilCured);
    }

    #[test]
    fn test_elemental_surge_distribution() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        for _ in 0..500 {
            let surge = roll_elemental_surge(15, 25, &mut rng);
            assert!((1..=3).contains(&surge.len()));
            let total: u32 = surge.iter().map(|(_, p)| p).sum();
            assert!((15..=25).contains(&total), "total {total}");
            assert!(surge.iter().all(|(_, p)| *p >= 1));
            let mut names: Vec<_> = surge.iter().map(|(e, _)| *e).collect();
            names.sort_unstable();
            names.dedup();
            assert_eq!(names.len(), surge.len());
        }
    }

    #[test]
    fn test_bonus_layer_rates() {
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        let mut exp_hits = 0;
        let mut foundation_hits = 0;
        for _ in 0..5_000 {
            let bonus = generate_bonus(EncounterCategory::Insight, 1.0, &mut rng);
            if bonus.experience > 0 {
                assert_eq!(bonus.experience, 15);
                exp_hits += 1;
            }
            if bonus.foundation > 0 {
                assert!((1..=3).contains(&bonus.foundation));
                foundation_hits += 1;
            }
            for (aspect, amount) in &bonus.comprehension {
                assert!(BONUS_COMPREHENSION_ASPECTS.contains(&aspect.as_str()));
                assert!((1..=2).contains(amount));
            }
        }
        assert!(exp_hits > 1_350 && exp_hits < 1_650, "exp {exp_hits}");
        assert!(foundation_hits > 380 && foundation_hits < 620, "foundation {foundation_hits}");
    }

    #[test]
    fn test_bottlenecks_never_grant_bonus_foundation() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        for _ in 0..2_000 {
            let bonus = generate_bonus(EncounterCategory::Bottleneck, 3.0, &mut rng);
            assert_eq!(bonus.foundation, 0);
        }
    }

    #[test]
    fn test_combine_adds_same_kind() {
        let mut bundle = RewardBundle::new();
        bundle.combine(Reward::Experience(30));
        bundle.combine(Reward::Experience(-5));
        bundle.combine(Reward::Comprehension {
            aspect: "balance".to_string(),
            amount: 2,
        });
        bundle.combine(Reward::Comprehension {
            aspect: "balance".to_string(),
            amount: 3,
        });
        bundle.combine(Reward::Stones(StoneBundle::from_pairs(&[(Grade::Low, 4)])));
        bundle.combine(Reward::Stones(StoneBundle::from_pairs(&[(Grade::Low, 1), (Grade::Mid, 1)])));
        assert_eq!(bundle.experience, 25);
        assert_eq!(bundle.comprehension["balance"], 5);
        assert_eq!(bundle.stones.get(Grade::Low), 5);
        assert_eq!(bundle.stones.get(Grade::Mid), 1);
        assert!(!bundle.is_empty());
        assert!(RewardBundle::new().is_empty());
    }

    #[test]
    fn test_apply_reward_drops_unknown_keys() {
        let mut state = CultivatorState::new("Test".to_string(), 0);
        let mut bundle = RewardBundle::new();
        bundle.combine(Reward::Comprehension {
            aspect: "wisdom".to_string(),
            amount: 5,
        });
        bundle.combine(Reward::Comprehension {
            aspect: "balance".to_string(),
            amount: 3,
        });
        bundle.combine(Reward::Elemental {
            element: "fire".to_string(),
            amount: 12,
        });
        bundle.combine(Reward::Foundation(4));
        bundle.combine(Reward::Experience(20));

        let applied = apply_reward(&mut state, &bundle);
        assert_eq!(applied.dropped_keys, vec!["wisdom".to_string()]);
        assert_eq!(state.dao_comprehension["balance"], 3);
        assert_eq!(state.elemental_affinities["fire"], 12);
        assert_eq!(state.foundation_quality, 14);
        assert_eq!(state.experience, 20);
    }

    #[test]
    fn test_negative_experience_never_lowers_stage() {
        let mut state = CultivatorState::new("Test".to_string(), 0);
        state.stage = 4;
        state.experience = 12;
        let mut bundle = RewardBundle::new();
        bundle.combine(Reward::Experience(-20));
        let applied = apply_reward(&mut state, &bundle);
        assert_eq!(applied.experience_lost, 12);
        assert_eq!(state.experience, 0);
        assert_eq!(state.stage, 4);
    }

    #[test]
    fn test_apply_deposits_stones_and_effects() {
        let mut state = CultivatorState::new("Test".to_string(), 0);
        let before = state.spirit_stones.total_value();
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let (_, rift) = catalog().find("Spatial Rift").unwrap();
        let mut bundle = scale_rewards(rift, Realm::QiGathering, &mut rng);
        bundle.combine(Reward::Stones(StoneBundle::from_pairs(&[(Grade::Mid, 2)])));

        let applied = apply_reward(&mut state, &bundle);
        assert_eq!(applied.effects_added, 1);
        assert_eq!(state.ongoing_effects[0].name, "Spiritual Corruption");
        assert!(state.ongoing_effects[0].is_permanent());
        assert_eq!(state.spirit_stones.total_value(), before + 20);
        assert_eq!(state.stats.spirit_stones_earned, 2);
    }
}

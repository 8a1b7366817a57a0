//! Elemental awakening on reaching key realms.

use super::types::Realm;
use crate::core::constants::{
    MAX_SECONDARY_ELEMENTS, PRIMARY_AWAKENING_AFFINITY, PRIMARY_STRENGTHEN,
    SECONDARY_AWAKENING_AFFINITY, SECONDARY_AWAKENING_CHANCE, SECONDARY_STRENGTHEN,
    SECONDARY_STRENGTHEN_CHANCE,
};
use crate::core::game_state::{CultivatorState, ELEMENTS};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::info;

#[derive(Debug, Clone, PartialEq)]
pub enum AwakeningEvent {
    PrimaryAwakened { element: String, affinity: u32 },
    SecondaryAwakened { element: String, affinity: u32 },
    /// Both secondary slots are taken; existing elements deepen instead.
    Strengthened {
        primary: Option<(String, u32)>,
        secondaries: Vec<(String, u32)>,
    },
}

impl AwakeningEvent {
    pub fn describe(&self) -> String {
        match self {
            AwakeningEvent::PrimaryAwakened { element, affinity } => {
                format!("Your {element} affinity awakens as your primary element (+{affinity})")
            }
            AwakeningEvent::SecondaryAwakened { element, affinity } => {
                format!("A secondary {element} affinity stirs within you (+{affinity})")
            }
            AwakeningEvent::Strengthened { primary, secondaries } => {
                let mut parts: Vec<String> = primary
                    .iter()
                    .chain(secondaries.iter())
                    .map(|(element, gain)| format!("{element} +{gain}"))
                    .collect();
                if parts.is_empty() {
                    parts.push("no change".to_string());
                }
                format!("Your elemental affinities deepen: {}", parts.join(", "))
            }
        }
    }
}

fn roll(range: (u32, u32), rng: &mut impl Rng) -> u32 {
    rng.gen_range(range.0..=range.1)
}

/// Runs awakening for the realm the cultivator just entered.
///
/// Foundation Building grants a primary element if none exists yet. Core
/// Formation and Nascent Soul have a chance to add or deepen secondaries.
/// Awakened affinity stacks on top of whatever encounters already granted.
pub fn awaken_elements(state: &mut CultivatorState, rng: &mut impl Rng) -> Option<AwakeningEvent> {
    let event = match state.realm {
        Realm::FoundationBuilding if state.primary_element.is_none() => {
            let element = ELEMENTS.choose(rng)?.to_string();
            let affinity = roll(PRIMARY_AWAKENING_AFFINITY, rng);
            state.add_affinity(&element, affinity);
            state.primary_element = Some(element.clone());
            AwakeningEvent::PrimaryAwakened { element, affinity }
        }
        Realm::CoreFormation | Realm::NascentSoul => {
            if rng.gen::<f64>() >= SECONDARY_AWAKENING_CHANCE {
                return None;
            }
            if state.secondary_elements.len() < MAX_SECONDARY_ELEMENTS {
                awaken_secondary(state, rng)?
            } else {
                strengthen(state, rng)
            }
        }
        _ => return None,
    };

    info!(event = %event.describe(), "elemental awakening");
    Some(event)
}

fn awaken_secondary(state: &mut CultivatorState, rng: &mut impl Rng) -> Option<AwakeningEvent> {
    let available: Vec<&str> = ELEMENTS
        .iter()
        .copied()
        .filter(|e| state.primary_element.as_deref() != Some(*e))
        .filter(|e| !state.secondary_elements.iter().any(|s| s == e))
        .collect();
    let element = available.choose(rng)?.to_string();
    let affinity = roll(SECONDARY_AWAKENING_AFFINITY, rng);
    state.add_affinity(&element, affinity);
    state.secondary_elements.push(element.clone());
    Some(AwakeningEvent::SecondaryAwakened { element, affinity })
}

fn strengthen(state: &mut CultivatorState, rng: &mut impl Rng) -> AwakeningEvent {
    let primary = state.primary_element.clone().map(|element| {
        let gain = roll(PRIMARY_STRENGTHEN, rng);
        state.add_affinity(&element, gain);
        (element, gain)
    });

    let mut secondaries = Vec::new();
    for element in state.secondary_elements.clone() {
        if rng.gen::<f64>() < SECONDARY_STRENGTHEN_CHANCE {
            let gain = roll(SECONDARY_STRENGTHEN, rng);
            state.add_affinity(&element, gain);
            secondaries.push((element, gain));
        }
    }

    AwakeningEvent::Strengthened { primary, secondaries }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn state_in(realm: Realm) -> CultivatorState {
        let mut state = CultivatorState::new("Test".to_string(), 0);
        state.realm = realm;
        state
    }

    #[test]
    fn test_primary_awakens_at_foundation_building() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut state = state_in(Realm::FoundationBuilding);
        match awaken_elements(&mut state, &mut rng) {
            Some(AwakeningEvent::PrimaryAwakened { element, affinity }) => {
                assert_eq!(state.primary_element.as_deref(), Some(element.as_str()));
                assert!((15..=30).contains(&affinity));
                assert_eq!(state.elemental_affinities[&element], affinity);
            }
            other => panic!("expected primary awakening, got {other:?}"),
        }
        // Already awakened: nothing further at this realm.
        assert_eq!(awaken_elements(&mut state, &mut rng), None);
    }

    #[test]
    fn test_awakening_stacks_on_earlier_affinity() {
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let mut state = state_in(Realm::FoundationBuilding);
        for element in ELEMENTS {
            state.add_affinity(element, 12);
        }
        match awaken_elements(&mut state, &mut rng) {
            Some(AwakeningEvent::PrimaryAwakened { element, affinity }) => {
                assert_eq!(state.elemental_affinities[&element], 12 + affinity);
            }
            other => panic!("expected primary awakening, got {other:?}"),
        }
    }

    #[test]
    fn test_no_awakening_in_other_realms() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for realm in [Realm::BodyTempering, Realm::QiGathering, Realm::SoulTransformation] {
            let mut state = state_in(realm);
            assert_eq!(awaken_elements(&mut state, &mut rng), None);
        }
    }

    #[test]
    fn test_secondaries_are_distinct_and_capped() {
        let mut rng = ChaCha8Rng::seed_from_u64(10);
        let mut state = state_in(Realm::CoreFormation);
        state.primary_element = Some("fire".to_string());

        let mut strengthened = 0;
        for _ in 0..50 {
            if let Some(AwakeningEvent::Strengthened { primary, .. }) = awaken_elements(&mut state, &mut rng) {
                strengthened += 1;
                let (element, gain) = primary.unwrap();
                assert_eq!(element, "fire");
                assert!((5..=15).contains(&gain));
            }
        }
        assert_eq!(state.secondary_elements.len(), 2);
        assert!(!state.secondary_elements.contains(&"fire".to_string()));
        assert_ne!(state.secondary_elements[0], state.secondary_elements[1]);
        assert!(strengthened > 0);
    }

    #[test]
    fn test_secondary_awakening_rate() {
        let mut rng = ChaCha8Rng::seed_from_u64(55);
        let mut awakened = 0;
        for _ in 0..2_000 {
            let mut state = state_in(Realm::NascentSoul);
            if awaken_elements(&mut state, &mut rng).is_some() {
                awakened += 1;
            }
        }
        assert!(awakened > 1_100 && awakened < 1_300, "got {awakened}");
    }
}

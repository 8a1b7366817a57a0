use crate::core::constants::{
    MIN_FOUNDATION_QUALITY, STARTING_FOUNDATION_QUALITY, STARTING_FOUNDATION_STABILITY,
};
use crate::choices::ChoiceTracker;
use crate::core::session::{CultivationFocus, SessionSummary};
use crate::effects::OngoingEffect;
use crate::encounters::EncounterTracker;
use crate::locations::LocationId;
use crate::realm::{
    apply_experience, combat_power, cultivation_title, progression_phase, ExperienceOutcome,
    ProgressionPhase, Realm,
};
use crate::stones::SpiritStones;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};

/// Dao comprehension categories every cultivator tracks.
pub const DAO_ASPECTS: [&str; 12] = [
    "sword",
    "fire",
    "water",
    "earth",
    "wind",
    "lightning",
    "ice",
    "nature",
    "light",
    "shadow",
    "balance",
    "destruction",
];

/// Elements a cultivator can hold an affinity for.
pub const ELEMENTS: [&str; 9] = [
    "fire",
    "water",
    "earth",
    "air",
    "lightning",
    "ice",
    "nature",
    "light",
    "shadow",
];

fn zeroed(keys: &[&str]) -> BTreeMap<String, u32> {
    keys.iter().map(|k| (k.to_string(), 0)).collect()
}

/// Lifetime counters shown on the status screen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CultivationStats {
    pub total_sessions: u64,
    pub total_encounters: u64,
    pub effects_cured: u64,
    pub spirit_stones_earned: u64,
    pub total_breakthroughs: u64,
    pub breakthrough_failures: u64,
    pub foundation_sessions: u64,
}

/// Everything that makes up one cultivator's progress.
///
/// Every field defaults when absent from a save, so older or partial saves
/// load instead of failing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CultivatorState {
    pub character_id: String,
    pub character_name: String,
    pub realm: Realm,
    pub stage: u32,
    pub experience: u64,
    pub foundation_quality: u32,
    pub foundation_stability: u32,
    pub dao_comprehension: BTreeMap<String, u32>,
    pub elemental_affinities: BTreeMap<String, u32>,
    /// Awakened on reaching Foundation Building.
    pub primary_element: Option<String>,
    pub secondary_elements: Vec<String>,
    pub ongoing_effects: Vec<OngoingEffect>,
    pub spirit_stones: SpiritStones,
    /// Sessions left before another breakthrough attempt is allowed.
    pub recovery_time: u32,
    pub cultivation_focus: CultivationFocus,
    pub location: LocationId,
    pub encounters: EncounterTracker,
    pub choices: ChoiceTracker,
    /// Added to the next breakthrough attempt, then spent.
    pub breakthrough_guidance: f64,
    pub stats: CultivationStats,
    pub history: VecDeque<SessionSummary>,
    pub last_save_time: i64,
}

impl Default for CultivatorState {
    fn default() -> Self {
        Self::new("Cultivator".to_string(), 0)
    }
}

impl CultivatorState {
    /// Creates a fresh Body Tempering cultivator.
    pub fn new(character_name: String, current_time: i64) -> Self {
        use uuid::Uuid;

        Self {
            character_id: Uuid::new_v4().to_string(),
            character_name,
            realm: Realm::BodyTempering,
            stage: 1,
            experience: 0,
            foundation_quality: STARTING_FOUNDATION_QUALITY,
            foundation_stability: STARTING_FOUNDATION_STABILITY,
            dao_comprehension: zeroed(&DAO_ASPECTS),
            elemental_affinities: zeroed(&ELEMENTS),
            primary_element: None,
            secondary_elements: Vec::new(),
            ongoing_effects: Vec::new(),
            spirit_stones: SpiritStones::starting_purse(),
            recovery_time: 0,
            cultivation_focus: CultivationFocus::default(),
            location: LocationId::default(),
            encounters: EncounterTracker::new(),
            choices: ChoiceTracker::default(),
            breakthrough_guidance: 0.0,
            stats: CultivationStats::default(),
            history: VecDeque::new(),
            last_save_time: current_time,
        }
    }

    /// Restores the fixed key sets after loading: missing keys come back at
    /// zero and keys outside the set are dropped. Stage is clamped to 1..=9
    /// and a location the realm has not opened falls back to the valley.
    pub fn normalize(&mut self) {
        normalize_keys(&mut self.dao_comprehension, &DAO_ASPECTS);
        normalize_keys(&mut self.elemental_affinities, &ELEMENTS);
        self.stage = self.stage.clamp(1, crate::core::constants::MAX_STAGE);
        self.foundation_quality = self.foundation_quality.max(MIN_FOUNDATION_QUALITY);
        if !self.location.info().is_unlocked_for(self.realm) {
            self.location = LocationId::default();
        }
        if !self.breakthrough_guidance.is_finite() || self.breakthrough_guidance < 0.0 {
            self.breakthrough_guidance = 0.0;
        }
    }

    pub fn title(&self) -> String {
        cultivation_title(self.realm, self.stage)
    }

    pub fn combat_power(&self) -> u64 {
        combat_power(self.realm, self.stage, self.foundation_quality)
    }

    pub fn phase(&self) -> ProgressionPhase {
        progression_phase(self.realm, self.stage, self.foundation_quality, self.recovery_time)
    }

    pub fn total_comprehension(&self) -> u32 {
        self.dao_comprehension.values().sum()
    }

    pub fn negative_effect_count(&self) -> usize {
        self.ongoing_effects.iter().filter(|e| e.is_negative()).count()
    }

    /// Adds to a dao aspect. Returns false (and changes nothing) for keys
    /// outside the fixed set.
    pub fn add_comprehension(&mut self, aspect: &str, amount: u32) -> bool {
        match self.dao_comprehension.get_mut(aspect) {
            Some(value) => {
                *value += amount;
                true
            }
            None => false,
        }
    }

    /// Adds to an elemental affinity; unknown elements are ignored.
    pub fn add_affinity(&mut self, element: &str, amount: u32) -> bool {
        match self.elemental_affinities.get_mut(element) {
            Some(value) => {
                *value += amount;
                true
            }
            None => false,
        }
    }

    /// Lowers foundation quality without going under the global floor.
    pub fn damage_foundation(&mut self, amount: u32) {
        self.foundation_quality = self
            .foundation_quality
            .saturating_sub(amount)
            .max(MIN_FOUNDATION_QUALITY);
    }

    /// Feeds experience through the stage loop and stores the result.
    pub fn add_experience(&mut self, amount: u64) -> ExperienceOutcome {
        let outcome = apply_experience(
            self.realm,
            self.stage,
            self.experience,
            self.foundation_quality,
            amount,
        );
        self.stage = outcome.stage;
        self.experience = outcome.experience;
        self.foundation_quality = outcome.foundation_quality;
        outcome
    }
}

fn normalize_keys(map: &mut BTreeMap<String, u32>, keys: &[&str]) {
    map.retain(|k, _| keys.contains(&k.as_str()));
    for key in keys {
        map.entry(key.to_string()).or_insert(0);
    }
}

//! Encounter pacing: when an encounter fires and which one it is.

use super::data::catalog;
use super::types::{EncounterCategory, EncounterDefinition, Rarity};
use crate::choices::ChoiceConfig;
use crate::core::constants::{
    ENCOUNTER_BASE_RATE, ENCOUNTER_DROUGHT_BONUS_CAP, ENCOUNTER_DROUGHT_STEP,
    ENCOUNTER_DROUGHT_THRESHOLD, ENCOUNTER_HISTORY_LEN, ENCOUNTER_MAX_CHANCE,
    ENCOUNTER_VARIETY_WINDOW,
};
use crate::realm::Realm;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::{debug, warn};

/// Tunable encounter pacing.
#[derive(Debug, Clone, PartialEq)]
pub struct EncounterConfig {
    pub base_rate: f64,
    /// Quiet sessions before the drought bonus starts growing.
    pub drought_threshold: u32,
    pub drought_step: f64,
    pub drought_bonus_cap: f64,
    pub max_chance: f64,
    pub history_len: usize,
    /// How many of the most recent categories are excluded from the next draw.
    pub variety_window: usize,
    /// Pacing for choice encounters offered between batch sessions.
    pub choices: ChoiceConfig,
}

impl Default for EncounterConfig {
    fn default() -> Self {
        Self {
            base_rate: ENCOUNTER_BASE_RATE,
            drought_threshold: ENCOUNTER_DROUGHT_THRESHOLD,
            drought_step: ENCOUNTER_DROUGHT_STEP,
            drought_bonus_cap: ENCOUNTER_DROUGHT_BONUS_CAP,
            max_chance: ENCOUNTER_MAX_CHANCE,
            history_len: ENCOUNTER_HISTORY_LEN,
            variety_window: ENCOUNTER_VARIETY_WINDOW,
            choices: ChoiceConfig::default(),
        }
    }
}

/// An encounter that fired this session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriggeredEncounter {
    pub category: EncounterCategory,
    pub definition: &'static EncounterDefinition,
}

/// Persistent drought and variety counters.
///
/// Saved with the character so pacing resumes exactly where it left off.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncounterTracker {
    pub session_counter: u64,
    pub sessions_since_encounter: u32,
    pub last_encounter_session: Option<u64>,
    /// Most recent last.
    pub recent_categories: VecDeque<EncounterCategory>,
}

impl EncounterTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Extra chance earned by a long quiet stretch.
    pub fn drought_bonus(&self, config: &EncounterConfig) -> f64 {
        if self.sessions_since_encounter < config.drought_threshold {
            return 0.0;
        }
        let overdue = (self.sessions_since_encounter - config.drought_threshold) as f64;
        (overdue * config.drought_step).min(config.drought_bonus_cap)
    }

    pub fn encounter_chance(&self, config: &EncounterConfig) -> f64 {
        (config.base_rate + self.drought_bonus(config)).min(config.max_chance)
    }

    /// Categories eligible for the next draw after the variety rule.
    ///
    /// The rule only applies once the history holds a full window.
    pub fn candidate_categories(&self, config: &EncounterConfig) -> Vec<EncounterCategory> {
        if self.recent_categories.len() < config.variety_window {
            return EncounterCategory::all().to_vec();
        }
        let recent: Vec<EncounterCategory> = self
            .recent_categories
            .iter()
            .rev()
            .take(config.variety_window)
            .copied()
            .collect();
        let pool: Vec<EncounterCategory> = EncounterCategory::all()
            .into_iter()
            .filter(|c| !recent.contains(c))
            .collect();
        if pool.is_empty() {
            EncounterCategory::all().to_vec()
        } else {
            pool
        }
    }

    pub fn select_category(
        &self,
        config: &EncounterConfig,
        rng: &mut impl Rng,
    ) -> Option<EncounterCategory> {
        self.candidate_categories(config)
            .choose_weighted(rng, |c| c.weight())
            .ok()
            .copied()
    }

    fn record(&mut self, category: EncounterCategory, config: &EncounterConfig) {
        self.sessions_since_encounter = 0;
        self.last_encounter_session = Some(self.session_counter);
        self.recent_categories.push_back(category);
        while self.recent_categories.len() > config.history_len {
            self.recent_categories.pop_front();
        }
    }

    /// Advances the counters by one session and rolls for an encounter.
    pub fn process_session(
        &mut self,
        realm: Realm,
        config: &EncounterConfig,
        rng: &mut impl Rng,
    ) -> Option<TriggeredEncounter> {
        self.session_counter += 1;
        self.sessions_since_encounter += 1;

        let chance = self.encounter_chance(config);
        if rng.gen::<f64>() >= chance {
            return None;
        }

        let Some(category) = self.select_category(config, rng) else {
            warn!("encounter fired but no category could be drawn");
            return None;
        };
        let Some(definition) = select_definition(category, realm, rng) else {
            warn!(%category, "encounter category has no definitions");
            return None;
        };

        self.record(category, config);
        debug!(%category, encounter = definition.name, chance, "encounter triggered");
        Some(TriggeredEncounter {
            category,
            definition,
        })
    }
}

/// Draws a definition from `category`, preferring rarities open to `realm`.
///
/// Falls back to the whole category when the realm filter leaves nothing.
pub fn select_definition(
    category: EncounterCategory,
    realm: Realm,
    rng: &mut impl Rng,
) -> Option<&'static EncounterDefinition> {
    let all = catalog().definitions(category);
    let allowed = Rarity::allowed_for(realm);
    let filtered: Vec<&'static EncounterDefinition> =
        all.iter().filter(|d| allowed.contains(&d.rarity)).collect();
    let pool: Vec<&'static EncounterDefinition> = if filtered.is_empty() {
        all.iter().collect()
    } else {
        filtered
    };

    pool.choose_weighted(rng, |d| d.rarity.weight()).ok().copied()
}

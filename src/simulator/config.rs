//! Simulation configuration.

use crate::choices::ChoiceEncounter;
use crate::core::session::CultivationFocus;
use crate::realm::Realm;

/// How simulated cultivators answer choice encounters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChoicePolicy {
    /// Always skip.
    Skip,
    /// Take the lowest-risk option.
    #[default]
    Cautious,
    /// Take the highest-risk option.
    Bold,
}

impl ChoicePolicy {
    pub fn all() -> [ChoicePolicy; 3] {
        [ChoicePolicy::Skip, ChoicePolicy::Cautious, ChoicePolicy::Bold]
    }

    pub fn name(self) -> &'static str {
        match self {
            ChoicePolicy::Skip => "skip",
            ChoicePolicy::Cautious => "cautious",
            ChoicePolicy::Bold => "bold",
        }
    }

    /// The option index to take, or `None` to skip.
    pub fn pick(self, encounter: &ChoiceEncounter) -> Option<usize> {
        match self {
            ChoicePolicy::Skip => None,
            ChoicePolicy::Cautious => Some(encounter.safest_option()),
            ChoicePolicy::Bold => Some(encounter.boldest_option()),
        }
    }
}

/// Configuration for a simulation run.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Number of simulation runs to perform
    pub num_runs: u32,

    /// Random seed for reproducibility (None = random)
    pub seed: Option<u64>,

    /// Maximum cultivation sessions per run before timeout
    pub max_sessions: u64,

    /// Focus used for every session
    pub focus: CultivationFocus,

    /// A run completes once it enters this realm
    pub target_realm: Realm,

    /// Attempt breakthroughs as soon as they are allowed
    pub auto_breakthrough: bool,

    /// Meditate whenever this many negative effects are active (0 = never)
    pub meditate_threshold: usize,

    /// Answer to every choice encounter
    pub choice_policy: ChoicePolicy,

    /// Move to the best unlocked location after each breakthrough
    pub auto_travel: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            num_runs: 1000,
            seed: None,
            max_sessions: 20_000,
            focus: CultivationFocus::Balanced,
            target_realm: Realm::NascentSoul,
            auto_breakthrough: true,
            meditate_threshold: 3,
            choice_policy: ChoicePolicy::default(),
            auto_travel: true,
        }
    }
}

impl SimConfig {
    /// Small, fast run for checking early-realm pacing
    pub fn quick_check() -> Self {
        Self {
            num_runs: 100,
            max_sessions: 3_000,
            target_realm: Realm::FoundationBuilding,
            ..Default::default()
        }
    }

    /// Long runs aimed at the final realm
    pub fn full_ascension() -> Self {
        Self {
            num_runs: 50,
            max_sessions: 200_000,
            target_realm: Realm::HeavenlyImmortal,
            ..Default::default()
        }
    }

    /// Same pacing as the default, with a fixed focus
    pub fn focus_study(focus: CultivationFocus) -> Self {
        Self {
            num_runs: 200,
            focus,
            ..Default::default()
        }
    }
}

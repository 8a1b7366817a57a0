// Stages
pub const MAX_STAGE: u32 = 9;
pub const FOUNDATION_BONUS_STAGES: [u32; 3] = [3, 6, 9];
pub const FOUNDATION_BONUS_PER_STAGE: u32 = 2;

// Foundation
pub const MIN_FOUNDATION_QUALITY: u32 = 10;
pub const STARTING_FOUNDATION_QUALITY: u32 = 10;
pub const STARTING_FOUNDATION_STABILITY: u32 = 100;

// Breakthrough odds
pub const BREAKTHROUGH_BASE_RATE: f64 = 0.3;
pub const BREAKTHROUGH_FOUNDATION_WEIGHT: f64 = 0.4;
pub const BREAKTHROUGH_DIFFICULTY_WEIGHT: f64 = 0.1;
pub const BREAKTHROUGH_MIN_RATE: f64 = 0.05;
pub const BREAKTHROUGH_MAX_RATE: f64 = 0.95;

// Breakthrough outcomes (inclusive ranges)
pub const BREAKTHROUGH_FOUNDATION_BONUS: (u32, u32) = (5, 15);
pub const BREAKTHROUGH_FOUNDATION_DAMAGE: (u32, u32) = (2, 8);
pub const BREAKTHROUGH_EXP_LOSS_PERCENT: (u32, u32) = (10, 30);
pub const BREAKTHROUGH_RECOVERY_SESSIONS: (u32, u32) = (3, 7);
pub const QI_DEVIATION_EXP_MULTIPLIER: f64 = 0.7;
pub const BREAKTHROUGH_EFFECTS_CLEARED: usize = 2;

// Breakthrough bonus factors
pub const DAO_MASTERY_THRESHOLD: u32 = 20;
pub const DAO_MASTERY_PER_POINT: f64 = 0.002;
pub const DAO_MASTERY_CAP: f64 = 0.15;
pub const STABILITY_BONUS_THRESHOLD: u32 = 80;
pub const STABILITY_BONUS_PER_POINT: f64 = 0.001;

// Combat power
pub const POWER_BASE_SCALE: f64 = 100.0;
pub const POWER_PER_STAGE: f64 = 0.2;
pub const POWER_PER_FOUNDATION: u64 = 2;

// Cultivation focus (inclusive exp ranges)
pub const BALANCED_EXP: (u64, u64) = (8, 15);
pub const BALANCED_FOUNDATION_CHANCE: f64 = 0.2;
pub const BALANCED_FOUNDATION_GAIN: (u32, u32) = (1, 3);
pub const AGGRESSIVE_EXP: (u64, u64) = (12, 20);
pub const AGGRESSIVE_DAMAGE_CHANCE: f64 = 0.3;
pub const AGGRESSIVE_FOUNDATION_LOSS: (u32, u32) = (1, 3);
pub const FOUNDATION_FOCUS_EXP: (u64, u64) = (3, 8);
pub const FOUNDATION_FOCUS_GAIN: (u32, u32) = (3, 8);

// Encounter pacing defaults
pub const ENCOUNTER_BASE_RATE: f64 = 0.06;
pub const ENCOUNTER_DROUGHT_THRESHOLD: u32 = 15;
pub const ENCOUNTER_DROUGHT_STEP: f64 = 0.02;
pub const ENCOUNTER_DROUGHT_BONUS_CAP: f64 = 0.3;
pub const ENCOUNTER_MAX_CHANCE: f64 = 0.4;
pub const ENCOUNTER_HISTORY_LEN: usize = 5;
pub const ENCOUNTER_VARIETY_WINDOW: usize = 2;

// Reward scaling
pub const COMPREHENSION_MULTIPLIER_CAP: f64 = 1.5;
pub const ELEMENTAL_MULTIPLIER_CAP: f64 = 2.0;
pub const EFFECT_DURATION_FLOOR_SCALE: f64 = 0.5;
pub const EFFECT_DURATION_BASE_SCALE: f64 = 1.5;
pub const EFFECT_DURATION_DECAY: f64 = 0.3;

// Random bonus layer
pub const BONUS_EXP_CHANCE: f64 = 0.3;
pub const BONUS_COMPREHENSION_CHANCE: f64 = 0.2;
pub const BONUS_FOUNDATION_CHANCE: f64 = 0.1;
pub const BONUS_COMPREHENSION_ASPECTS: [&str; 4] = ["balance", "power", "wisdom", "nature"];

// Recovery
pub const NATURAL_RECOVERY_BASE: f64 = 0.10;
pub const NATURAL_RECOVERY_FOUNDATION_DIVISOR: f64 = 1000.0;
pub const NATURAL_RECOVERY_PER_REALM: f64 = 0.02;
pub const MEDITATION_BASE_RATE: f64 = 0.6;
pub const MEDITATION_FOUNDATION_DIVISOR: f64 = 500.0;
pub const MEDITATION_DAO_DIVISOR: f64 = 500.0;
pub const MEDITATION_DAO_CAP: f64 = 0.2;
pub const MEDITATION_MAX_RATE: f64 = 0.9;
pub const MEDITATION_MAX_CURED: usize = 2;
pub const MEDITATION_CALM_FOUNDATION: u32 = 1;
pub const MEDITATION_CALM_COMPREHENSION: u32 = 1;

// Elemental awakening
pub const PRIMARY_AWAKENING_AFFINITY: (u32, u32) = (15, 30);
pub const SECONDARY_AWAKENING_CHANCE: f64 = 0.6;
pub const SECONDARY_AWAKENING_AFFINITY: (u32, u32) = (8, 20);
pub const MAX_SECONDARY_ELEMENTS: usize = 2;
pub const PRIMARY_STRENGTHEN: (u32, u32) = (5, 15);
pub const SECONDARY_STRENGTHEN_CHANCE: f64 = 0.5;
pub const SECONDARY_STRENGTHEN: (u32, u32) = (3, 10);

// Locations
pub const LOCATION_DAO_SCALING_PER_POINT: f64 = 0.1;
pub const LOCATION_ELEMENT_RATE: f64 = 0.02;
pub const LOCATION_ELEMENT_SHARE: f64 = 0.5;
/// Comprehension or affinity beyond this stops raising location bonuses.
pub const LOCATION_SCALING_CAP: u32 = 20;

// Choice encounters
pub const CHOICE_BASE_CHANCE: f64 = 0.25;
pub const CHOICE_PATIENCE_THRESHOLD: u32 = 10;
pub const CHOICE_PATIENCE_BONUS: f64 = 0.10;
pub const CHOICE_LONG_WAIT_THRESHOLD: u32 = 20;
pub const CHOICE_LONG_WAIT_BONUS: f64 = 0.15;

// History and batches
pub const MAX_SESSION_HISTORY: usize = 10;
pub const MAX_BATCH_SESSIONS: u32 = 50;

// Save files
pub const SAVE_VERSION: u32 = 1;
pub const SAVE_DIR_NAME: &str = ".cultivator";
pub const MAX_NAME_LEN: usize = 16;

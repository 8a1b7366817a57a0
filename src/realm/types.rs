use serde::{Deserialize, Serialize};
use std::fmt;

/// Major cultivation realms in ascending order.
///
/// Serialized by display name. An unrecognized name loads as the lowest
/// realm instead of failing the whole save.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Realm {
    #[default]
    BodyTempering,
    QiGathering,
    FoundationBuilding,
    CoreFormation,
    NascentSoul,
    SoulTransformation,
    VoidRefinement,
    BodyIntegration,
    Mahayana,
    HeavenlyImmortal,
}

/// Static per-realm balance data.
#[derive(Debug, Clone)]
pub struct RealmInfo {
    pub name: &'static str,
    pub description: &'static str,
    /// Experience required for stage 1.
    pub stage_exp_base: u64,
    /// Growth applied per subsequent stage.
    pub stage_exp_multiplier: f64,
    pub breakthrough_difficulty: f64,
    pub lifespan_years: u32,
    pub power_multiplier: f64,
    /// Minimum foundation quality to attempt the breakthrough out of this realm.
    pub foundation_requirement: u32,
}

const REALMS: [RealmInfo; 10] = [
    RealmInfo {
        name: "Body Tempering",
        description: "Strengthening the mortal body to handle spiritual energy",
        stage_exp_base: 50,
        stage_exp_multiplier: 1.2,
        breakthrough_difficulty: 0.8,
        lifespan_years: 100,
        power_multiplier: 1.0,
        foundation_requirement: 20,
    },
    RealmInfo {
        name: "Qi Gathering",
        description: "Learning to sense and gather spiritual energy",
        stage_exp_base: 80,
        stage_exp_multiplier: 1.25,
        breakthrough_difficulty: 1.0,
        lifespan_years: 150,
        power_multiplier: 2.0,
        foundation_requirement: 40,
    },
    RealmInfo {
        name: "Foundation Building",
        description: "Building a solid foundation for future cultivation",
        stage_exp_base: 120,
        stage_exp_multiplier: 1.3,
        breakthrough_difficulty: 1.2,
        lifespan_years: 300,
        power_multiplier: 5.0,
        foundation_requirement: 80,
    },
    RealmInfo {
        name: "Core Formation",
        description: "Forming a spiritual core to contain vast amounts of qi",
        stage_exp_base: 200,
        stage_exp_multiplier: 1.4,
        breakthrough_difficulty: 1.5,
        lifespan_years: 500,
        power_multiplier: 12.0,
        foundation_requirement: 150,
    },
    RealmInfo {
        name: "Nascent Soul",
        description: "Birth of the spiritual infant, beginning of true immortality",
        stage_exp_base: 350,
        stage_exp_multiplier: 1.5,
        breakthrough_difficulty: 2.0,
        lifespan_years: 1_000,
        power_multiplier: 30.0,
        foundation_requirement: 250,
    },
    RealmInfo {
        name: "Soul Transformation",
        description: "Transforming the nascent soul into true spiritual form",
        stage_exp_base: 600,
        stage_exp_multiplier: 1.6,
        breakthrough_difficulty: 2.5,
        lifespan_years: 2_000,
        power_multiplier: 75.0,
        foundation_requirement: 400,
    },
    RealmInfo {
        name: "Void Refinement",
        description: "Refining the soul through understanding of the void",
        stage_exp_base: 1_000,
        stage_exp_multiplier: 1.7,
        breakthrough_difficulty: 3.0,
        lifespan_years: 5_000,
        power_multiplier: 180.0,
        foundation_requirement: 600,
    },
    RealmInfo {
        name: "Body Integration",
        description: "Integrating body and soul into perfect unity",
        stage_exp_base: 1_800,
        stage_exp_multiplier: 1.8,
        breakthrough_difficulty: 4.0,
        lifespan_years: 10_000,
        power_multiplier: 400.0,
        foundation_requirement: 900,
    },
    RealmInfo {
        name: "Mahayana",
        description: "The great vehicle towards true enlightenment",
        stage_exp_base: 3_000,
        stage_exp_multiplier: 2.0,
        breakthrough_difficulty: 5.0,
        lifespan_years: 25_000,
        power_multiplier: 1_000.0,
        foundation_requirement: 1_400,
    },
    RealmInfo {
        name: "Heavenly Immortal",
        description: "Transcendence beyond mortal comprehension",
        stage_exp_base: 5_000,
        stage_exp_multiplier: 2.2,
        breakthrough_difficulty: 7.0,
        lifespan_years: 100_000,
        power_multiplier: 2_500.0,
        foundation_requirement: 2_000,
    },
];

impl Realm {
    pub fn all() -> [Realm; 10] {
        [
            Realm::BodyTempering,
            Realm::QiGathering,
            Realm::FoundationBuilding,
            Realm::CoreFormation,
            Realm::NascentSoul,
            Realm::SoulTransformation,
            Realm::VoidRefinement,
            Realm::BodyIntegration,
            Realm::Mahayana,
            Realm::HeavenlyImmortal,
        ]
    }

    /// Position in the realm ladder (0-based).
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn info(self) -> &'static RealmInfo {
        &REALMS[self.index()]
    }

    pub fn name(self) -> &'static str {
        self.info().name
    }

    pub fn next(self) -> Option<Realm> {
        Realm::all().get(self.index() + 1).copied()
    }

    pub fn is_final(self) -> bool {
        self.next().is_none()
    }

    pub fn from_name(name: &str) -> Option<Realm> {
        Realm::all().into_iter().find(|r| r.name() == name)
    }
}

impl fmt::Display for Realm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<String> for Realm {
    fn from(name: String) -> Self {
        Realm::from_name(&name).unwrap_or_default()
    }
}

impl From<Realm> for String {
    fn from(realm: Realm) -> Self {
        realm.name().to_string()
    }
}

/// Name of a stage within a realm.
pub fn stage_title(stage: u32) -> String {
    match stage {
        1 => "Initial".to_string(),
        2 => "Early".to_string(),
        3 => "Mid".to_string(),
        4 => "Late".to_string(),
        5 => "Peak Early".to_string(),
        6 => "Peak Mid".to_string(),
        7 => "Peak Late".to_string(),
        8 => "Half-Step".to_string(),
        9 => "Peak".to_string(),
        other => format!("Stage {other}"),
    }
}

/// Full title, e.g. "Mid Qi Gathering".
pub fn cultivation_title(realm: Realm, stage: u32) -> String {
    format!("{} {}", stage_title(stage), realm.name())
}

//! Static encounter catalog.

use super::types::{BaseReward, EncounterCategory, EncounterDefinition, Rarity};
use crate::effects::{EffectTemplate, Polarity};

/// Read-only encounter definitions grouped by category.
#[derive(Debug)]
pub struct EncounterCatalog {
    bottleneck: &'static [EncounterDefinition],
    insight: &'static [EncounterDefinition],
    anomaly: &'static [EncounterDefinition],
    technique: &'static [EncounterDefinition],
}

impl EncounterCatalog {
    pub fn definitions(&self, category: EncounterCategory) -> &'static [EncounterDefinition] {
        match category {
            EncounterCategory::Bottleneck => self.bottleneck,
            EncounterCategory::Insight => self.insight,
            EncounterCategory::Anomaly => self.anomaly,
            EncounterCategory::Technique => self.technique,
        }
    }

    pub fn find(&self, name: &str) -> Option<(EncounterCategory, &'static EncounterDefinition)> {
        EncounterCategory::all().into_iter().find_map(|category| {
            self.definitions(category)
                .iter()
                .find(|def| def.name == name)
                .map(|def| (category, def))
        })
    }
}

pub fn catalog() -> &'static EncounterCatalog {
    &CATALOG
}

const fn negative(
    name: &'static str,
    description: &'static str,
    exp_multiplier: f64,
    duration: Option<u32>,
) -> Option<EffectTemplate> {
    Some(EffectTemplate {
        name,
        polarity: Polarity::Negative,
        description,
        exp_multiplier,
        duration,
    })
}

const fn positive(
    name: &'static str,
    description: &'static str,
    exp_multiplier: f64,
    duration: Option<u32>,
) -> Option<EffectTemplate> {
    Some(EffectTemplate {
        name,
        polarity: Polarity::Positive,
        description,
        exp_multiplier,
        duration,
    })
}

static CATALOG: EncounterCatalog = EncounterCatalog {
    bottleneck: &[
        EncounterDefinition {
            name: "Qi Stagnation",
            description: "Your qi flow becomes sluggish and inefficient",
            rarity: Rarity::Common,
            rewards: &[],
            effect: negative("Qi Stagnation", "Cultivation speed reduced by 15%", 0.85, None),
        },
        EncounterDefinition {
            name: "Meridian Blockage",
            description: "Impurities block your meridian pathways",
            rarity: Rarity::Common,
            rewards: &[],
            effect: negative("Meridian Blockage", "Cultivation efficiency reduced by 20%", 0.80, None),
        },
        EncounterDefinition {
            name: "Foundation Cracks",
            description: "Your cultivation foundation develops dangerous fissures",
            rarity: Rarity::Uncommon,
            rewards: &[],
            effect: negative("Foundation Cracks", "All cultivation progress reduced by 25%", 0.75, None),
        },
        EncounterDefinition {
            name: "Cultivation Deviation",
            description: "Your cultivation method goes astray",
            rarity: Rarity::Rare,
            rewards: &[],
            effect: negative(
                "Cultivation Deviation",
                "Severe cultivation penalties until corrected",
                0.60,
                None,
            ),
        },
        EncounterDefinition {
            name: "Heart Demon",
            description: "A powerful heart demon manifests from your doubts",
            rarity: Rarity::VeryRare,
            rewards: &[],
            effect: negative(
                "Heart Demon",
                "Major cultivation obstruction affecting all progress",
                0.50,
                None,
            ),
        },
    ],
    insight: &[
        EncounterDefinition {
            name: "Dao Comprehension",
            description: "You gain understanding of the universal dao",
            rarity: Rarity::Common,
            rewards: &[
                BaseReward::Experience(25),
                BaseReward::Comprehension("wisdom", 2),
                BaseReward::Comprehension("balance", 1),
            ],
            effect: None,
        },
        EncounterDefinition {
            name: "Elemental Resonance",
            description: "You feel a deep connection with elemental forces",
            rarity: Rarity::Common,
            rewards: &[
                BaseReward::Experience(20),
                BaseReward::ElementalSurge { min: 15, max: 25 },
            ],
            effect: None,
        },
        EncounterDefinition {
            name: "Foundation Enlightenment",
            description: "Your cultivation foundation becomes more stable",
            rarity: Rarity::Uncommon,
            rewards: &[
                BaseReward::Experience(30),
                BaseReward::Foundation(5),
                BaseReward::Comprehension("balance", 2),
            ],
            effect: None,
        },
        EncounterDefinition {
            name: "Heavenly Insight",
            description: "The heavens grant you profound understanding",
            rarity: Rarity::Rare,
            rewards: &[
                BaseReward::Experience(50),
                BaseReward::Comprehension("wisdom", 5),
                BaseReward::Comprehension("balance", 3),
            ],
            effect: positive(
                "Enlightenment",
                "Cultivation speed increased by 25% for the next sessions",
                1.25,
                Some(10),
            ),
        },
        EncounterDefinition {
            name: "Cosmic Revelation",
            description: "You glimpse the true nature of reality",
            rarity: Rarity::VeryRare,
            rewards: &[
                BaseReward::Experience(100),
                BaseReward::Comprehension("wisdom", 10),
                BaseReward::Comprehension("balance", 5),
                BaseReward::Comprehension("nature", 3),
            ],
            effect: positive("Cosmic Understanding", "Massive cultivation boost", 1.50, Some(15)),
        },
    ],
    anomaly: &[
        EncounterDefinition {
            name: "Qi Turbulence",
            description: "Chaotic qi energies disrupt your cultivation",
            rarity: Rarity::Common,
            rewards: &[],
            effect: negative("Chaotic Qi", "Unstable qi causes cultivation fluctuations", 0.90, Some(5)),
        },
        EncounterDefinition {
            name: "Elemental Storm",
            description: "Conflicting elemental energies create chaos",
            rarity: Rarity::Uncommon,
            rewards: &[],
            effect: negative(
                "Elemental Imbalance",
                "Elemental confusion reduces cultivation efficiency",
                0.85,
                Some(8),
            ),
        },
        EncounterDefinition {
            name: "Spatial Rift",
            description: "A tear in space affects local qi flow",
            rarity: Rarity::Rare,
            rewards: &[BaseReward::Experience(-20)],
            effect: negative(
                "Spiritual Corruption",
                "Corrupted spiritual energy impedes progress",
                0.70,
                None,
            ),
        },
        EncounterDefinition {
            name: "Dao Fluctuation",
            description: "The fundamental laws of reality shift briefly",
            rarity: Rarity::VeryRare,
            rewards: &[],
            effect: negative(
                "Dao Confusion",
                "Reality confusion severely hampers cultivation",
                0.60,
                None,
            ),
        },
        EncounterDefinition {
            name: "Void Incursion",
            description: "Void energy seeps into reality",
            rarity: Rarity::Legendary,
            rewards: &[],
            effect: negative(
                "Void Taint",
                "Void corruption threatens your very existence",
                0.40,
                None,
            ),
        },
    ],
    technique: &[
        EncounterDefinition {
            name: "Ancient Manual",
            description: "You discover a fragment of an ancient cultivation manual",
            rarity: Rarity::Common,
            rewards: &[
                BaseReward::Experience(35),
                BaseReward::Comprehension("wisdom", 1),
                BaseReward::Comprehension("power", 1),
            ],
            effect: None,
        },
        EncounterDefinition {
            name: "Technique Inspiration",
            description: "A flash of inspiration improves your technique",
            rarity: Rarity::Common,
            rewards: &[
                BaseReward::Experience(30),
                BaseReward::ElementalSurge { min: 10, max: 20 },
            ],
            effect: None,
        },
        EncounterDefinition {
            name: "Master's Echo",
            description: "You sense the lingering presence of a cultivation master",
            rarity: Rarity::Uncommon,
            rewards: &[
                BaseReward::Experience(45),
                BaseReward::Comprehension("wisdom", 3),
                BaseReward::Comprehension("balance", 2),
            ],
            effect: positive("Master's Guidance", "Enhanced learning", 1.20, Some(8)),
        },
        EncounterDefinition {
            name: "Technique Breakthrough",
            description: "You achieve a major breakthrough in your cultivation technique",
            rarity: Rarity::Rare,
            rewards: &[
                BaseReward::Experience(60),
                BaseReward::ElementalSurge { min: 20, max: 40 },
                BaseReward::Comprehension("power", 3),
                BaseReward::Comprehension("wisdom", 2),
            ],
            effect: None,
        },
        EncounterDefinition {
            name: "Forbidden Technique",
            description: "You accidentally practice a dangerous forbidden technique",
            rarity: Rarity::Rare,
            rewards: &[
                BaseReward::Experience(80),
                BaseReward::Comprehension("power", 5),
            ],
            effect: negative(
                "Technique Backlash",
                "Forbidden technique causes cultivation instability",
                0.95,
                Some(12),
            ),
        },
        EncounterDefinition {
            name: "Legendary Inheritance",
            description: "You inherit the technique of a legendary cultivator",
            rarity: Rarity::Legendary,
            rewards: &[
                BaseReward::Experience(150),
                BaseReward::ElementalSurge { min: 40, max: 80 },
                BaseReward::Comprehension("power", 8),
                BaseReward::Comprehension("wisdom", 5),
                BaseReward::Comprehension("balance", 3),
            ],
            effect: positive(
                "Legendary Mastery",
                "Legendary techniques grant a permanent cultivation bonus",
                1.15,
                None,
            ),
        },
    ],
};

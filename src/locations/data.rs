//! Static location catalog.

use crate::realm::Realm;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Places a cultivator can settle in to cultivate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum LocationId {
    #[default]
    PeacefulValley,
    WhisperingForest,
    DragonsPeak,
    AncientRuins,
}

impl LocationId {
    pub fn all() -> [LocationId; 4] {
        [
            LocationId::PeacefulValley,
            LocationId::WhisperingForest,
            LocationId::DragonsPeak,
            LocationId::AncientRuins,
        ]
    }

    pub fn info(self) -> &'static Location {
        &LOCATIONS[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.info().name
    }

    /// Matches the full name or any single word of it, ignoring case.
    pub fn from_name(name: &str) -> Option<LocationId> {
        let wanted = name.trim().to_lowercase().replace('\'', "");
        if wanted.is_empty() {
            return None;
        }
        LocationId::all().into_iter().find(|id| {
            let full = id.name().to_lowercase().replace('\'', "");
            full == wanted || full.split_whitespace().any(|word| word == wanted)
        })
    }
}

impl fmt::Display for LocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, PartialEq)]
pub struct Location {
    pub id: LocationId,
    pub name: &'static str,
    pub description: &'static str,
    pub unlock_realm: Realm,
    pub unlock_description: &'static str,
    /// Scales spirit stones found alongside encounters.
    pub stone_multiplier: f64,
    /// Shown to the player as the danger rating.
    pub encounter_risk: f64,
    /// Per-session comprehension rate before scaling.
    pub dao_bonuses: &'static [(&'static str, f64)],
    /// Elements that resonate with the surroundings.
    pub elements: &'static [&'static str],
    pub features: &'static [&'static str],
}

pub fn all_locations() -> &'static [Location] {
    &LOCATIONS
}

static LOCATIONS: [Location; 4] = [
    Location {
        id: LocationId::PeacefulValley,
        name: "Peaceful Valley",
        description: "A serene valley where spiritual energy flows gently",
        unlock_realm: Realm::BodyTempering,
        unlock_description: "Your starting sanctuary for cultivation",
        stone_multiplier: 1.0,
        encounter_risk: 0.8,
        dao_bonuses: &[("balance", 0.05), ("nature", 0.03)],
        elements: &["nature", "light"],
        features: &["Healing Springs", "Gentle Qi Flow", "Ancient Wards"],
    },
    Location {
        id: LocationId::WhisperingForest,
        name: "Whispering Forest",
        description: "Ancient woods where the trees themselves have gained wisdom",
        unlock_realm: Realm::FoundationBuilding,
        unlock_description: "The forest calls to those who have proven their foundation",
        stone_multiplier: 1.3,
        encounter_risk: 1.2,
        dao_bonuses: &[("nature", 0.10), ("balance", 0.05)],
        elements: &["nature", "earth", "shadow"],
        features: &["Spirit Beasts", "Ancient Tree Wisdom", "Hidden Treasures"],
    },
    Location {
        id: LocationId::DragonsPeak,
        name: "Dragon's Peak",
        description: "A towering mountain where dragons once roamed",
        unlock_realm: Realm::CoreFormation,
        unlock_description: "Only those with a formed core dare ascend the peak",
        stone_multiplier: 1.8,
        encounter_risk: 1.5,
        dao_bonuses: &[("destruction", 0.10), ("fire", 0.05)],
        elements: &["lightning", "fire", "air"],
        features: &["Dragon Veins", "Qi Storms", "Legendary Artifacts"],
    },
    Location {
        id: LocationId::AncientRuins,
        name: "Ancient Ruins",
        description: "Remnants of a lost civilization where immortals once walked",
        unlock_realm: Realm::NascentSoul,
        unlock_description: "The ruins whisper to those who have transcended mortal limits",
        stone_multiplier: 2.5,
        encounter_risk: 2.0,
        dao_bonuses: &[("sword", 0.15), ("destruction", 0.08)],
        elements: &["light", "shadow", "lightning"],
        features: &["Immortal Artifacts", "Ancient Formations", "Lost Techniques"],
    },
];

use crate::effects::EffectTemplate;
use crate::realm::Realm;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EncounterCategory {
    Bottleneck,
    #[default]
    Insight,
    Anomaly,
    Technique,
}

impl EncounterCategory {
    pub fn all() -> [EncounterCategory; 4] {
        [
            EncounterCategory::Insight,
            EncounterCategory::Technique,
            EncounterCategory::Bottleneck,
            EncounterCategory::Anomaly,
        ]
    }

    /// Relative selection weight.
    pub fn weight(self) -> u32 {
        match self {
            EncounterCategory::Insight => 40,
            EncounterCategory::Technique => 30,
            EncounterCategory::Bottleneck => 20,
            EncounterCategory::Anomaly => 10,
        }
    }

    /// Flat experience for the random bonus layer, before the realm multiplier.
    pub fn bonus_experience(self) -> u32 {
        match self {
            EncounterCategory::Bottleneck => 5,
            EncounterCategory::Insight => 15,
            EncounterCategory::Anomaly => 8,
            EncounterCategory::Technique => 12,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            EncounterCategory::Bottleneck => "Bottleneck",
            EncounterCategory::Insight => "Insight",
            EncounterCategory::Anomaly => "Anomaly",
            EncounterCategory::Technique => "Technique",
        }
    }
}

impl fmt::Display for EncounterCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum Rarity {
    #[default]
    Common,
    Uncommon,
    Rare,
    VeryRare,
    Legendary,
}

impl Rarity {
    pub fn weight(self) -> u32 {
        match self {
            Rarity::Common => 50,
            Rarity::Uncommon => 30,
            Rarity::Rare => 15,
            Rarity::VeryRare => 4,
            Rarity::Legendary => 1,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Rarity::Common => "Common",
            Rarity::Uncommon => "Uncommon",
            Rarity::Rare => "Rare",
            Rarity::VeryRare => "Very Rare",
            Rarity::Legendary => "Legendary",
        }
    }

    /// Rarities that may be drawn at `realm`.
    ///
    /// Higher realms lose access to the commonest encounters up to Soul
    /// Transformation. Realms outside the table use the two lowest rarities.
    pub fn allowed_for(realm: Realm) -> &'static [Rarity] {
        use Rarity::*;
        match realm {
            Realm::FoundationBuilding => &[Common, Uncommon, Rare],
            Realm::CoreFormation => &[Common, Uncommon, Rare, VeryRare],
            Realm::NascentSoul => &[Uncommon, Rare, VeryRare, Legendary],
            Realm::SoulTransformation => &[Rare, VeryRare, Legendary],
            _ => &[Common, Uncommon],
        }
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An unscaled reward listed on a catalog entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BaseReward {
    /// May be negative for harmful anomalies.
    Experience(i64),
    Comprehension(&'static str, u32),
    Foundation(u32),
    /// `min..=max` points spread over one to three random elements.
    ElementalSurge { min: u32, max: u32 },
}

/// A static catalog entry.
#[derive(Debug, Clone, PartialEq)]
pub struct EncounterDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub rarity: Rarity,
    pub rewards: &'static [BaseReward],
    pub effect: Option<EffectTemplate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rarity_ordering() {
        assert!(Rarity::Common < Rarity::Uncommon);
        assert!(Rarity::VeryRare < Rarity::Legendary);
        assert!(Rarity::Common.weight() > 10 * Rarity::Legendary.weight());
    }

    #[test]
    fn test_allowed_rarities_shift_upward() {
        assert_eq!(Rarity::allowed_for(Realm::BodyTempering), &[Rarity::Common, Rarity::Uncommon]);
        assert!(Rarity::allowed_for(Realm::FoundationBuilding).contains(&Rarity::Rare));
        assert!(!Rarity::allowed_for(Realm::NascentSoul).contains(&Rarity::Common));
        assert_eq!(
            Rarity::allowed_for(Realm::SoulTransformation),
            &[Rarity::Rare, Rarity::VeryRare, Rarity::Legendary]
        );
    }

    #[test]
    fn test_realms_outside_table_use_lowest_rarities() {
        for realm in [Realm::VoidRefinement, Realm::BodyIntegration, Realm::Mahayana, Realm::HeavenlyImmortal] {
            assert_eq!(Rarity::allowed_for(realm), &[Rarity::Common, Rarity::Uncommon]);
        }
    }

    #[test]
    fn test_category_weights_sum_to_hundred() {
        let total: u32 = EncounterCategory::all().iter().map(|c| c.weight()).sum();
        assert_eq!(total, 100);
    }
}

//! Spirit stone prices for curing negative effects.

use crate::stones::{Grade, StoneBundle};

const CURE_COSTS: &[(&str, &[(Grade, u64)])] = &[
    // Bottlenecks
    ("Qi Stagnation", &[(Grade::Low, 15), (Grade::Mid, 2)]),
    ("Meridian Blockage", &[(Grade::Low, 25), (Grade::Mid, 3)]),
    ("Foundation Cracks", &[(Grade::Mid, 5), (Grade::High, 1)]),
    ("Cultivation Deviation", &[(Grade::Mid, 8), (Grade::High, 2)]),
    ("Heart Demon", &[(Grade::High, 3), (Grade::Peak, 1)]),
    // Anomalies
    ("Chaotic Qi", &[(Grade::Low, 20), (Grade::Mid, 2)]),
    ("Elemental Imbalance", &[(Grade::Mid, 4), (Grade::High, 1)]),
    ("Spiritual Corruption", &[(Grade::High, 2), (Grade::Peak, 1)]),
    ("Dao Confusion", &[(Grade::High, 4), (Grade::Peak, 2)]),
    ("Void Taint", &[(Grade::Peak, 2), (Grade::Divine, 1)]),
    // Techniques
    ("Technique Backlash", &[(Grade::Low, 10), (Grade::Mid, 1)]),
    ("Elemental Rejection", &[(Grade::Mid, 3), (Grade::High, 1)]),
    ("Cultivation Instability", &[(Grade::Mid, 6), (Grade::High, 2)]),
];

/// Price to cure `name`, or `None` if stones cannot cure it.
pub fn cure_cost(name: &str) -> Option<StoneBundle> {
    CURE_COSTS
        .iter()
        .find(|(effect, _)| *effect == name)
        .map(|(_, cost)| StoneBundle::from_pairs(cost))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_cure_cost() {
        let cost = cure_cost("Qi Stagnation").unwrap();
        assert_eq!(cost.get(Grade::Low), 15);
        assert_eq!(cost.get(Grade::Mid), 2);
        assert_eq!(cost.total_value(), 35);
    }

    #[test]
    fn test_qi_deviation_is_not_purchasable() {
        assert!(cure_cost("Qi Deviation").is_none());
        assert!(cure_cost("Enlightenment").is_none());
    }

    #[test]
    fn test_every_catalog_bottleneck_and_anomaly_effect_is_priced() {
        use crate::effects::Polarity;
        use crate::encounters::{catalog, EncounterCategory};

        for category in [EncounterCategory::Bottleneck, EncounterCategory::Anomaly] {
            for def in catalog().definitions(category) {
                if let Some(effect) = &def.effect {
                    if effect.polarity == Polarity::Negative {
                        assert!(cure_cost(effect.name).is_some(), "{} has no cure", effect.name);
                    }
                }
            }
        }
    }
}

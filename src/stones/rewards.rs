use super::types::{Grade, StoneBundle};
use crate::realm::Realm;
use rand::Rng;

/// Spirit stone bounty multiplier for a realm. Realms outside the table
/// scale by 1.0.
pub fn stone_multiplier(realm: Realm) -> f64 {
    match realm {
        Realm::FoundationBuilding => 1.5,
        Realm::CoreFormation => 2.0,
        Realm::NascentSoul => 3.0,
        Realm::SoulTransformation => 4.0,
        _ => 1.0,
    }
}

/// Rolls the spirit stones found alongside an encounter.
///
/// Each grade is an independent roll; divine stones only show up once the
/// multiplier reaches 2.0.
pub fn generate_spirit_stone_reward(realm: Realm, rng: &mut impl Rng) -> StoneBundle {
    let m = stone_multiplier(realm);
    let mut reward = StoneBundle::new();

    if rng.gen::<f64>() < 0.7 {
        reward.add(Grade::Low, rng.gen_range(1..=(10.0 * m) as u64));
    }
    if rng.gen::<f64>() < 0.4 {
        reward.add(Grade::Mid, rng.gen_range(1..=(3.0 * m) as u64));
    }
    if rng.gen::<f64>() < 0.2 {
        reward.add(Grade::High, rng.gen_range(1..=(m as u64).max(1)));
    }
    if rng.gen::<f64>() < 0.05 {
        reward.add(Grade::Peak, 1);
    }
    if rng.gen::<f64>() < 0.01 && m >= 2.0 {
        reward.add(Grade::Divine, 1);
    }

    reward
}

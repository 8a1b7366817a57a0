//! Unlocking, travel, and the per-session bonuses a location grants.

use super::data::{all_locations, Location, LocationId};
use crate::core::constants::{
    LOCATION_DAO_SCALING_PER_POINT, LOCATION_ELEMENT_RATE, LOCATION_ELEMENT_SHARE,
    LOCATION_SCALING_CAP,
};
use crate::core::error::CultivationError;
use crate::core::game_state::CultivatorState;
use crate::core::session::LocationBonuses;
use crate::realm::Realm;
use tracing::info;

impl Location {
    pub fn is_unlocked_for(&self, realm: Realm) -> bool {
        realm >= self.unlock_realm
    }
}

pub fn is_unlocked(state: &CultivatorState, id: LocationId) -> bool {
    id.info().is_unlocked_for(state.realm)
}

/// Locations the cultivator may travel to, in catalog order.
pub fn available_locations(state: &CultivatorState) -> Vec<&'static Location> {
    all_locations()
        .iter()
        .filter(|location| location.is_unlocked_for(state.realm))
        .collect()
}

/// The furthest location the cultivator has opened.
pub fn best_unlocked(realm: Realm) -> LocationId {
    all_locations()
        .iter()
        .rev()
        .find(|location| location.is_unlocked_for(realm))
        .map(|location| location.id)
        .unwrap_or_default()
}

/// Locations that open when the cultivator moves from one realm to another.
pub fn newly_unlocked(from: Realm, to: Realm) -> Vec<&'static Location> {
    all_locations()
        .iter()
        .filter(|location| !location.is_unlocked_for(from) && location.is_unlocked_for(to))
        .collect()
}

/// Moves the cultivator. Locked destinations are refused and leave the state untouched.
pub fn travel(state: &mut CultivatorState, to: LocationId) -> Result<&'static Location, CultivationError> {
    let location = to.info();
    if !location.is_unlocked_for(state.realm) {
        return Err(CultivationError::LocationLocked {
            location: location.name,
            required: location.unlock_realm,
        });
    }
    if state.location != to {
        info!(from = %state.location, to = %to, "travelled");
        state.location = to;
    }
    Ok(location)
}

/// Expected comprehension and affinity per session at the cultivator's
/// current location.
///
/// Dao bonuses grow by a tenth for each point already comprehended and
/// resonant elements add a share of existing affinity. Both stop growing at
/// `LOCATION_SCALING_CAP` points.
pub fn location_bonuses(state: &CultivatorState) -> LocationBonuses {
    let location = state.location.info();
    let mut bonuses = LocationBonuses {
        name: location.name.to_string(),
        stone_multiplier: location.stone_multiplier,
        ..LocationBonuses::default()
    };

    for (aspect, base) in location.dao_bonuses {
        let current = state.dao_comprehension.get(*aspect).copied().unwrap_or(0);
        let scaled = current.min(LOCATION_SCALING_CAP) as f64 * LOCATION_DAO_SCALING_PER_POINT;
        bonuses
            .comprehension
            .insert(aspect.to_string(), base * (1.0 + scaled));
    }

    for element in location.elements {
        let affinity = state.elemental_affinities.get(*element).copied().unwrap_or(0);
        if affinity == 0 {
            continue;
        }
        let rate = LOCATION_ELEMENT_RATE * affinity.min(LOCATION_SCALING_CAP) as f64;
        bonuses
            .elemental
            .insert(element.to_string(), rate * LOCATION_ELEMENT_SHARE);
    }

    bonuses
}

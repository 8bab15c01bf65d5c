//! Threat proximity routing.
//!
//! Agents working in regions nobody controls keep a `reverse` flag that
//! flips when a guard gets close and flips back once it is far enough away.
//! The threshold is exclusive on both sides: exactly at the threshold the
//! flag keeps its previous value, which stops it from flapping while an
//! agent hovers at the edge of a guard's reach.

use core::cmp::Ordering;

use tracing::debug;
use traverse_types::Agent;
use traverse_world::GridMap;

use crate::config::MovementConfig;

/// Next value of the reverse flag given the range to the nearest guard.
pub const fn apply_hysteresis(current: bool, range: u32, threshold: u32) -> bool {
    if range < threshold {
        true
    } else if range > threshold {
        false
    } else {
        current
    }
}

fn guard_range(agent: &Agent, map: &GridMap) -> Option<u32> {
    map.nearest_guard(&agent.tile)
        .map(|guard| agent.tile.range_to(&guard.tile))
}

/// Update `agent`'s reverse flag from guard proximity and return it.
///
/// Applies only outside controlled regions. With no guard in the region the
/// flag is cleared. Routing state is created when the router applies.
pub fn update_reverse_flag(agent: &mut Agent, map: &GridMap, config: &MovementConfig) -> bool {
    if map.is_controlled(agent.tile.region) {
        return agent.is_reversed();
    }

    let range = guard_range(agent, map);
    let id = agent.id;
    let routing = agent.routing_mut();
    let before = routing.reverse;
    routing.reverse =
        range.is_some_and(|range| apply_hysteresis(before, range, config.threat_reverse_range));

    if routing.reverse != before {
        debug!(
            target: "traverse::routing",
            agent = %id,
            ?range,
            reverse = routing.reverse,
            "Reverse routing toggled"
        );
    }
    routing.reverse
}

/// Check-only variant of [`update_reverse_flag`].
///
/// Uses the same thresholds but leaves the flag alone when no guard is
/// present or the range equals the threshold. Returns true only when the
/// guard is inside the threshold, in which case the flag has just been set.
pub fn threat_in_reverse_band(agent: &mut Agent, map: &GridMap, config: &MovementConfig) -> bool {
    if map.is_controlled(agent.tile.region) {
        return false;
    }
    let Some(range) = guard_range(agent, map) else {
        return false;
    };

    match range.cmp(&config.threat_reverse_range) {
        Ordering::Greater => {
            agent.routing_mut().reverse = false;
            false
        }
        Ordering::Less => {
            agent.routing_mut().reverse = true;
            true
        }
        Ordering::Equal => false,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use traverse_types::{FactionId, Hostile, HostileId, HostileKind, RegionId, Role, Tile};
    use traverse_world::RegionState;

    use super::*;

    fn tile(x: u8, y: u8) -> Tile {
        Tile::new(x, y, RegionId::new(0, 0)).unwrap()
    }

    fn map_with_guard(guard: Option<Tile>, controlled: bool) -> GridMap {
        let mut map = GridMap::new();
        let state = RegionState {
            controlled,
            ..RegionState::default()
        };
        map.add_region(RegionId::new(0, 0), state).unwrap();
        if let Some(at) = guard {
            map.add_hostile(Hostile {
                id: HostileId::new(),
                kind: HostileKind::Guard,
                tile: at,
            })
            .unwrap();
        }
        map
    }

    fn sourcer_at(x: u8) -> Agent {
        Agent::new(Role::Sourcer, tile(x, 20), FactionId::new())
    }

    #[test]
    fn hysteresis_table() {
        assert!(apply_hysteresis(false, 5, 6));
        assert!(!apply_hysteresis(true, 7, 6));
        assert!(apply_hysteresis(true, 6, 6));
        assert!(!apply_hysteresis(false, 6, 6));
    }

    #[test]
    fn approaching_then_leaving_guard() {
        let config = MovementConfig::default();
        let map = map_with_guard(Some(tile(10, 20)), false);

        // Range 8, then 5: set.
        let mut agent = sourcer_at(18);
        assert!(!update_reverse_flag(&mut agent, &map, &config));
        agent.tile = tile(15, 20);
        assert!(update_reverse_flag(&mut agent, &map, &config));

        // Steady at 6 never changes.
        agent.tile = tile(16, 20);
        for _ in 0..3 {
            assert!(update_reverse_flag(&mut agent, &map, &config));
        }

        // Back out to 8: cleared.
        agent.tile = tile(18, 20);
        assert!(!update_reverse_flag(&mut agent, &map, &config));
    }

    #[test]
    fn no_guard_clears_flag() {
        let config = MovementConfig::default();
        let map = map_with_guard(None, false);
        let mut agent = sourcer_at(18);
        agent.routing_mut().reverse = true;
        assert!(!update_reverse_flag(&mut agent, &map, &config));
        assert!(!agent.is_reversed());
    }

    #[test]
    fn controlled_region_is_left_alone() {
        let config = MovementConfig::default();
        let map = map_with_guard(Some(tile(10, 20)), true);
        let mut agent = sourcer_at(12);
        assert!(!update_reverse_flag(&mut agent, &map, &config));
        assert!(agent.routing.is_none());
    }

    #[test]
    fn raiders_are_not_guards() {
        let config = MovementConfig::default();
        let mut map = map_with_guard(None, false);
        map.add_hostile(Hostile {
            id: HostileId::new(),
            kind: HostileKind::Raider,
            tile: tile(11, 20),
        })
        .unwrap();
        let mut agent = sourcer_at(12);
        assert!(!update_reverse_flag(&mut agent, &map, &config));
    }

    #[test]
    fn band_check_does_not_clear_without_guard() {
        let config = MovementConfig::default();
        let empty = map_with_guard(None, false);
        let mut agent = sourcer_at(18);
        agent.routing_mut().reverse = true;
        assert!(!threat_in_reverse_band(&mut agent, &empty, &config));
        assert!(agent.is_reversed());

        let guarded = map_with_guard(Some(tile(10, 20)), false);
        agent.tile = tile(12, 20);
        assert!(threat_in_reverse_band(&mut agent, &guarded, &config));
        agent.tile = tile(16, 20);
        assert!(!threat_in_reverse_band(&mut agent, &guarded, &config));
        assert!(agent.is_reversed());
        agent.tile = tile(20, 20);
        assert!(!threat_in_reverse_band(&mut agent, &guarded, &config));
        assert!(!agent.is_reversed());
    }
}

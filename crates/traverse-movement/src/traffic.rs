//! Local traffic control: who gives way when a tile is contested.
//!
//! When an agent wants to step onto a tile held by another agent of its own
//! faction, a fixed, ordered rule table decides whether the occupant is asked
//! to step aside, is eliminated, or nothing happens. The table is a pure
//! function of the two roles and the occupant's reverse-routing flag; the
//! resolver applies it to the shared grid.
//!
//! | Rule | Mover | Occupant | Action |
//! |------|-------|----------|--------|
//! | Sourcer passage | Sourcer, Reserver | not Harvester, not reversed | yield |
//! | Always yield | `MeleeDefender` (or any mover onto Harvester/Carrier) | any | yield |
//! | Upgrader over storage filler | Upgrader | `StorageFiller` | yield |
//! | Upgrader elimination | Upgrader | Harvester, Sourcer, Upgrader | eliminate |
//!
//! The pair (Upgrader, Harvester) is excluded from "always yield" and falls
//! through to elimination. Where two rules match a pair, both yield.

use tracing::{debug, info, warn};
use traverse_types::{Agent, AgentId, Direction, Role, Tile};

use crate::grid::AgentGrid;

// ---------------------------------------------------------------------------
// Rule table
// ---------------------------------------------------------------------------

/// What happens to the occupant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrafficAction {
    /// The occupant is commanded to move in the given direction.
    Yield,
    /// The occupant is removed from the grid.
    Eliminate,
}

/// One row of the traffic rule table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrafficRule {
    /// Remote miners and reservers push past anything except harvesters
    /// and agents retreating from a guard.
    SourcerPassage,
    /// Melee defenders always get through; harvesters and carriers always
    /// make room.
    AlwaysYield,
    /// Storage fillers make room for upgraders.
    UpgraderOverStorageFiller,
    /// Upgraders remove miners and other upgraders blocking the chokepoint.
    UpgraderElimination,
}

impl TrafficRule {
    /// Rules in evaluation order.
    pub const ORDER: [Self; 4] = [
        Self::SourcerPassage,
        Self::AlwaysYield,
        Self::UpgraderOverStorageFiller,
        Self::UpgraderElimination,
    ];

    /// Whether this rule applies to the given pair.
    pub const fn matches(self, mover: Role, occupant: Role, occupant_reverse: bool) -> bool {
        match self {
            Self::SourcerPassage => {
                matches!(mover, Role::Sourcer | Role::Reserver)
                    && !matches!(occupant, Role::Harvester)
                    && !occupant_reverse
            }
            Self::AlwaysYield => {
                let carved_out =
                    matches!(mover, Role::Upgrader) && matches!(occupant, Role::Harvester);
                !carved_out
                    && (matches!(mover, Role::MeleeDefender)
                        || matches!(occupant, Role::Harvester | Role::Carrier))
            }
            Self::UpgraderOverStorageFiller => {
                matches!(mover, Role::Upgrader) && matches!(occupant, Role::StorageFiller)
            }
            Self::UpgraderElimination => {
                matches!(mover, Role::Upgrader)
                    && matches!(occupant, Role::Harvester | Role::Sourcer | Role::Upgrader)
            }
        }
    }

    /// The action this rule takes.
    pub const fn action(self) -> TrafficAction {
        match self {
            Self::UpgraderElimination => TrafficAction::Eliminate,
            Self::SourcerPassage | Self::AlwaysYield | Self::UpgraderOverStorageFiller => {
                TrafficAction::Yield
            }
        }
    }

    /// The first rule, in table order, that applies to the pair.
    pub fn matching(mover: Role, occupant: Role, occupant_reverse: bool) -> Option<Self> {
        Self::ORDER
            .into_iter()
            .find(|rule| rule.matches(mover, occupant, occupant_reverse))
    }

    /// The action the table prescribes for the pair, if any.
    pub fn evaluate(mover: Role, occupant: Role, occupant_reverse: bool) -> Option<TrafficAction> {
        Self::matching(mover, occupant, occupant_reverse).map(Self::action)
    }
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Result of resolving one conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrafficOutcome {
    /// The destination is a border tile or nobody stands there.
    Uncontested,
    /// The occupant was commanded to step aside.
    Yielded {
        /// The agent that was moved.
        occupant: AgentId,
        /// The rule that fired.
        rule: TrafficRule,
    },
    /// The occupant was eliminated.
    Eliminated {
        /// The agent that was removed.
        occupant: AgentId,
    },
    /// No rule applied, or the occupant belongs to another faction.
    Unresolved {
        /// The agent left in place.
        occupant: AgentId,
    },
}

impl TrafficOutcome {
    /// Whether the resolver acted on the occupant.
    pub const fn is_handled(&self) -> bool {
        matches!(self, Self::Yielded { .. } | Self::Eliminated { .. })
    }
}

/// Resolve `mover`'s claim on `destination`.
///
/// `direction` is the direction a yielding occupant is commanded to move;
/// the executor passes the reverse of the mover's own step so the two swap.
/// Border tiles are never contested. Occupants of other factions are left
/// alone. The occupant's routing state is initialised if absent.
pub fn resolve_conflict(
    mover: &Agent,
    destination: &Tile,
    direction: Direction,
    border_offset: i32,
    grid: &mut dyn AgentGrid,
) -> TrafficOutcome {
    if destination.is_border(border_offset) {
        debug!(
            target: "traverse::routing",
            agent = %mover.id,
            tile = %destination,
            "Border tile, no traffic resolution"
        );
        return TrafficOutcome::Uncontested;
    }

    let (occupant, occupant_role, occupant_reverse) = {
        let Some(occupant) = grid.occupant_mut(destination) else {
            return TrafficOutcome::Uncontested;
        };
        if occupant.faction != mover.faction {
            return TrafficOutcome::Unresolved {
                occupant: occupant.id,
            };
        }
        let reverse = occupant.routing_mut().reverse;
        (occupant.id, occupant.role, reverse)
    };

    let Some(rule) = TrafficRule::matching(mover.role, occupant_role, occupant_reverse) else {
        debug!(
            target: "traverse::routing",
            agent = %mover.id,
            %occupant,
            mover_role = ?mover.role,
            occupant_role = ?occupant_role,
            "No traffic rule applies"
        );
        return TrafficOutcome::Unresolved { occupant };
    };

    match rule.action() {
        TrafficAction::Yield => {
            let code = grid.issue_move(occupant, direction);
            if !code.is_tolerated() {
                warn!(
                    target: "traverse::routing",
                    agent = %mover.id,
                    %occupant,
                    ?code,
                    "Yielding occupant could not move"
                );
            }
            debug!(
                target: "traverse::routing",
                agent = %mover.id,
                %occupant,
                ?rule,
                %direction,
                "Occupant yields"
            );
            TrafficOutcome::Yielded { occupant, rule }
        }
        TrafficAction::Eliminate => {
            grid.eliminate(occupant);
            info!(
                agent = %mover.id,
                %occupant,
                occupant_role = ?occupant_role,
                tile = %destination,
                "Blocking agent eliminated"
            );
            TrafficOutcome::Eliminated { occupant }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use traverse_types::{FactionId, MoveCode, RegionId, StructureId};
    use traverse_world::GridMap;

    use super::*;

    struct OneOccupant {
        map: GridMap,
        occupant: Option<Agent>,
        moves: Vec<(AgentId, Direction)>,
        eliminated: Vec<AgentId>,
    }

    impl OneOccupant {
        fn new(occupant: Option<Agent>) -> Self {
            Self {
                map: GridMap::new(),
                occupant,
                moves: Vec::new(),
                eliminated: Vec::new(),
            }
        }
    }

    impl AgentGrid for OneOccupant {
        fn map(&self) -> &GridMap {
            &self.map
        }

        fn is_occupied(&self, tile: &Tile) -> bool {
            self.occupant.as_ref().is_some_and(|a| a.tile == *tile)
        }

        fn occupant_mut(&mut self, tile: &Tile) -> Option<&mut Agent> {
            self.occupant.as_mut().filter(|a| a.tile == *tile)
        }

        fn issue_move(&mut self, agent: AgentId, direction: Direction) -> MoveCode {
            self.moves.push((agent, direction));
            MoveCode::Ok
        }

        fn eliminate(&mut self, agent: AgentId) {
            self.eliminated.push(agent);
            self.occupant = None;
        }

        fn dismantle(&mut self, _agent: AgentId, _structure: StructureId) {}

        fn say(&mut self, _agent: AgentId, _message: &str) {}
    }

    fn tile(x: u8, y: u8) -> Tile {
        Tile::new(x, y, RegionId::new(0, 0)).unwrap()
    }

    #[test]
    fn table_follows_rule_order() {
        use TrafficRule as R;
        assert_eq!(
            R::matching(Role::Sourcer, Role::Carrier, false),
            Some(R::SourcerPassage)
        );
        // Reversed carrier still yields, but through the generic rule.
        assert_eq!(
            R::matching(Role::Sourcer, Role::Carrier, true),
            Some(R::AlwaysYield)
        );
        assert_eq!(R::matching(Role::Sourcer, Role::Generic, true), None);
        assert_eq!(
            R::matching(Role::Sourcer, Role::Harvester, false),
            Some(R::AlwaysYield)
        );
        assert_eq!(
            R::matching(Role::MeleeDefender, Role::Upgrader, true),
            Some(R::AlwaysYield)
        );
        assert_eq!(
            R::matching(Role::Upgrader, Role::StorageFiller, false),
            Some(R::UpgraderOverStorageFiller)
        );
        assert_eq!(
            R::matching(Role::Upgrader, Role::Harvester, false),
            Some(R::UpgraderElimination)
        );
        assert_eq!(
            R::matching(Role::Upgrader, Role::Carrier, false),
            Some(R::AlwaysYield)
        );
        assert_eq!(R::matching(Role::Generic, Role::Generic, false), None);
    }

    #[test]
    fn overlapping_rules_agree_on_action() {
        for mover in Role::ALL {
            for occupant in Role::ALL {
                for reverse in [false, true] {
                    let hits = TrafficRule::ORDER
                        .iter()
                        .filter(|r| r.matches(mover, occupant, reverse))
                        .count();
                    // Sourcer passage overlaps with the generic yield; both yield.
                    let overlap = TrafficRule::SourcerPassage.matches(mover, occupant, reverse)
                        && TrafficRule::AlwaysYield.matches(mover, occupant, reverse);
                    assert!(hits <= 1 || overlap, "{mover:?} onto {occupant:?}");
                    if hits > 1 {
                        assert_eq!(
                            TrafficRule::evaluate(mover, occupant, reverse),
                            Some(TrafficAction::Yield)
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn border_destination_is_uncontested() {
        let faction = FactionId::new();
        let occupant = Agent::new(Role::Carrier, tile(0, 10), faction);
        let mover = Agent::new(Role::Sourcer, tile(1, 10), faction);
        let mut grid = OneOccupant::new(Some(occupant));

        let outcome = resolve_conflict(&mover, &tile(0, 10), Direction::Right, 0, &mut grid);
        assert_eq!(outcome, TrafficOutcome::Uncontested);
        assert!(!outcome.is_handled());
        assert!(grid.moves.is_empty());
        // Routing state untouched on the short-circuit path.
        assert!(grid.occupant.unwrap().routing.is_none());
    }

    #[test]
    fn sourcer_onto_carrier_swaps() {
        let faction = FactionId::new();
        let occupant = Agent::new(Role::Carrier, tile(10, 10), faction);
        let occupant_id = occupant.id;
        let mover = Agent::new(Role::Sourcer, tile(9, 10), faction);
        let mut grid = OneOccupant::new(Some(occupant));

        let outcome = resolve_conflict(&mover, &tile(10, 10), Direction::Left, 0, &mut grid);
        assert_eq!(
            outcome,
            TrafficOutcome::Yielded {
                occupant: occupant_id,
                rule: TrafficRule::SourcerPassage,
            }
        );
        assert!(outcome.is_handled());
        assert_eq!(grid.moves, vec![(occupant_id, Direction::Left)]);
        assert!(grid.occupant.unwrap().routing.is_some());
    }

    #[test]
    fn upgrader_onto_harvester_eliminates() {
        let faction = FactionId::new();
        let occupant = Agent::new(Role::Harvester, tile(10, 10), faction);
        let occupant_id = occupant.id;
        let mover = Agent::new(Role::Upgrader, tile(10, 11), faction);
        let mut grid = OneOccupant::new(Some(occupant));

        let outcome = resolve_conflict(&mover, &tile(10, 10), Direction::Bottom, 0, &mut grid);
        assert_eq!(
            outcome,
            TrafficOutcome::Eliminated {
                occupant: occupant_id
            }
        );
        assert!(outcome.is_handled());
        assert_eq!(grid.eliminated, vec![occupant_id]);
        assert!(grid.moves.is_empty());
    }

    #[test]
    fn foreign_and_unmatched_occupants_are_unresolved() {
        let faction = FactionId::new();
        let foreign = Agent::new(Role::Carrier, tile(10, 10), FactionId::new());
        let foreign_id = foreign.id;
        let mover = Agent::new(Role::MeleeDefender, tile(9, 10), faction);
        let mut grid = OneOccupant::new(Some(foreign));
        let outcome = resolve_conflict(&mover, &tile(10, 10), Direction::Left, 0, &mut grid);
        assert_eq!(
            outcome,
            TrafficOutcome::Unresolved {
                occupant: foreign_id
            }
        );

        let friend = Agent::new(Role::Generic, tile(10, 10), faction);
        let friend_id = friend.id;
        let mover = Agent::new(Role::Generic, tile(9, 10), faction);
        let mut grid = OneOccupant::new(Some(friend));
        let outcome = resolve_conflict(&mover, &tile(10, 10), Direction::Left, 0, &mut grid);
        assert_eq!(outcome, TrafficOutcome::Unresolved { occupant: friend_id });
        assert!(!outcome.is_handled());
        assert!(grid.moves.is_empty());
    }

    #[test]
    fn empty_tile_is_uncontested() {
        let mover = Agent::new(Role::Upgrader, tile(9, 10), FactionId::new());
        let mut grid = OneOccupant::new(None);
        let outcome = resolve_conflict(&mover, &tile(10, 10), Direction::Left, 0, &mut grid);
        assert_eq!(outcome, TrafficOutcome::Uncontested);
    }
}

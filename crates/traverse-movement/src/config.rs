//! Configuration for movement and traffic control.
//!
//! These values correspond to the `layout`, `visualizer` and `routing` keys
//! of `traverse-config.yaml`. The tick cycle builds a [`MovementConfig`] from
//! the loaded simulation config and threads it through every call.

/// Default hysteresis threshold for the reverse-routing flag, in tiles.
pub const DEFAULT_THREAT_REVERSE_RANGE: u32 = 6;

/// Default distance window for bounded wandering, in tiles.
pub const DEFAULT_WANDER_DISTANCE: u32 = 3;

/// Tunables for planning, stepping and wandering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovementConfig {
    /// Search cost of a swamp tile (default: 10).
    pub swamp_cost: u32,

    /// Search cost of a plain tile (default: 2).
    pub plain_cost: u32,

    /// Master switch for visualization (default: false).
    pub visualizer_enabled: bool,

    /// Send every path search to the visualizer when enabled (default: false).
    pub show_path_searches: bool,

    /// Guard range that toggles reverse routing (default: 6).
    ///
    /// Closer than this sets the flag, farther clears it, exactly this
    /// range leaves it unchanged.
    pub threat_reverse_range: u32,

    /// Distance window for bounded wandering (default: 3).
    pub wander_distance: u32,

    /// Border band offset passed to [`Tile::is_border`] (default: 0).
    ///
    /// [`Tile::is_border`]: traverse_types::Tile::is_border
    pub border_offset: i32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            swamp_cost: 10,
            plain_cost: 2,
            visualizer_enabled: false,
            show_path_searches: false,
            threat_reverse_range: DEFAULT_THREAT_REVERSE_RANGE,
            wander_distance: DEFAULT_WANDER_DISTANCE,
            border_offset: 0,
        }
    }
}

impl MovementConfig {
    /// Whether path searches should be handed to the visualizer.
    pub const fn visualize_searches(&self) -> bool {
        self.visualizer_enabled && self.show_path_searches
    }
}

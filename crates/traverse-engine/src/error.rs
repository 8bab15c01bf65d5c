//! Error types for the engine binary.
//!
//! [`EngineError`] wraps every failure mode during startup and the tick
//! loop so `main` can propagate with `?`.

/// Top-level error for the engine binary.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: traverse_core::config::ConfigError,
    },

    /// Scenario construction failed.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: traverse_world::WorldError,
    },

    /// A tick failed.
    #[error("tick error: {source}")]
    Tick {
        /// The underlying tick error.
        #[from]
        source: traverse_core::tick::TickError,
    },
}

//! Demo binary for the Traverse movement engine.
//!
//! Wires the tick cycle to the stub collaborators and a scripted scenario,
//! then runs a fixed number of ticks.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `traverse-config.yaml`
//! 2. Initialize structured logging (tracing)
//! 3. Build the scenario map, agents and intents
//! 4. Run the tick loop
//! 5. Log final positions

mod error;
mod scenario;

use std::path::Path;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use traverse_core::config::{ConfigError, SimulationConfig};
use traverse_core::tick::{Collaborators, TickOrder, run_tick};
use traverse_movement::Visualizer;
use traverse_movement::stub::{GreedyApproach, LogVisualizer, StraightLineSearch, StructureCosts};

use crate::error::EngineError;

const CONFIG_PATH: &str = "traverse-config.yaml";

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration, scenario construction or a tick fails.
fn main() -> Result<(), EngineError> {
    // 1. Load configuration.
    let (config, from_file) = load_config()?;

    // 2. Initialize structured logging. RUST_LOG wins over the config level.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .init();

    info!("traverse-engine starting");
    if !from_file {
        info!(path = CONFIG_PATH, "Config file not found, using defaults");
    }
    info!(
        seed = config.world.seed,
        ticks = config.world.ticks,
        swamp_cost = config.layout.swamp_cost,
        plain_cost = config.layout.plain_cost,
        threat_reverse_range = config.routing.threat_reverse_range,
        border_offset = config.routing.border_offset,
        "Configuration loaded"
    );

    // 3. Build the scenario.
    let (mut state, mut intents) = scenario::build(config.world.seed)?;

    // 4. Run the tick loop.
    let search = StraightLineSearch::new();
    let mut approach = GreedyApproach;
    let visualizer = LogVisualizer;
    let mut collaborators = Collaborators {
        search: &search,
        costs: &StructureCosts,
        approach: &mut approach,
        visualizer: config
            .visualizer
            .enabled
            .then_some(&visualizer as &dyn Visualizer),
    };

    for _ in 0..config.world.ticks {
        let summary = run_tick(
            &mut state,
            &config,
            &TickOrder::Registry,
            &mut intents,
            &mut collaborators,
        )?;
        for (agent, error) in &summary.errors {
            warn!(tick = summary.tick, %agent, %error, "Agent movement failed");
        }
        for agent in &summary.eliminated {
            info!(tick = summary.tick, %agent, "Agent eliminated");
        }
    }

    // 5. Log final positions.
    for agent in state.agents.values() {
        info!(
            agent = %agent.id,
            role = ?agent.role,
            tile = %agent.tile,
            fatigue = agent.fatigue,
            reversed = agent.is_reversed(),
            "Final position"
        );
    }
    info!(ticks = state.tick, "traverse-engine shutdown complete");

    Ok(())
}

/// Load configuration from `traverse-config.yaml`, falling back to defaults
/// when the file does not exist. The flag reports whether the file was read.
fn load_config() -> Result<(SimulationConfig, bool), ConfigError> {
    let config_path = Path::new(CONFIG_PATH);
    if config_path.exists() {
        Ok((SimulationConfig::from_file(config_path)?, true))
    } else {
        Ok((SimulationConfig::default(), false))
    }
}

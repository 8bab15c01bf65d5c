//! Movement executor: turn a target into at most one move command.
//!
//! One call handles one agent for one tick:
//!
//! 1. A fatigued agent does nothing and reports success.
//! 2. The planner searches a path. A degenerate result (fewer than two
//!    tiles and incomplete) is handed to the direct-approach stepper with
//!    the same target and range.
//! 3. Otherwise the first path tile (or the target itself when the path is
//!    empty) is the destination. If another agent stands there, the traffic
//!    resolver gets a chance to clear it, then a single direction move is
//!    issued. After a yield or an elimination that move is still issued: it
//!    is the mover's half of the swap, not an independent attempt.
//!
//! Only a rejected move command is an error.

use tracing::debug;
use traverse_types::{Agent, Direction, MoveCode, Target, Tile};

use crate::context::MoveContext;
use crate::error::MovementError;
use crate::grid::AgentGrid;
use crate::planner::compute_path;
use crate::traffic::{TrafficOutcome, resolve_conflict};

/// What the executor did for the agent this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Fatigue was nonzero; no command was issued.
    Fatigued,
    /// The search was degenerate and the direct-approach stepper ran.
    Fallback {
        /// What the stepper reported.
        accepted: bool,
    },
    /// One direction move was issued.
    Moved {
        /// The commanded direction.
        direction: Direction,
        /// The tile moved toward.
        destination: Tile,
        /// The tolerated code returned by the command.
        code: MoveCode,
    },
}

/// Detailed result of one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepReport {
    /// What the executor did.
    pub outcome: StepOutcome,
    /// How a contested destination was resolved, if it was contested.
    pub traffic: Option<TrafficOutcome>,
}

impl StepReport {
    /// Whether the step counts as a success for the caller.
    pub const fn accepted(&self) -> bool {
        match self.outcome {
            StepOutcome::Fatigued => true,
            StepOutcome::Fallback { accepted } => accepted,
            StepOutcome::Moved { code, .. } => matches!(code, MoveCode::Ok),
        }
    }
}

/// Move `agent` one step toward `target`, stopping within `range`.
///
/// Returns whether the step was accepted; see [`step_detailed`].
///
/// # Errors
///
/// Returns [`MovementError`] when the move command is rejected.
pub fn step(
    ctx: &mut MoveContext<'_>,
    grid: &mut dyn AgentGrid,
    agent: &Agent,
    target: &Target,
    range: u32,
) -> Result<bool, MovementError> {
    step_detailed(ctx, grid, agent, target, range).map(|report| report.accepted())
}

/// Move `agent` one step toward `target` and report what happened.
///
/// # Errors
///
/// Returns [`MovementError::MoveRejected`] when the move command returns a
/// code other than `Ok` or `NoBodyPart`, and [`MovementError::NoDirection`]
/// when the destination is the agent's own tile.
pub fn step_detailed(
    ctx: &mut MoveContext<'_>,
    grid: &mut dyn AgentGrid,
    agent: &Agent,
    target: &Target,
    range: u32,
) -> Result<StepReport, MovementError> {
    if agent.fatigue > 0 {
        debug!(agent = %agent.id, fatigue = agent.fatigue, "Agent fatigued, skipping move");
        return Ok(StepReport {
            outcome: StepOutcome::Fatigued,
            traffic: None,
        });
    }

    let result = compute_path(ctx, grid.map(), agent, target, range);

    if result.is_degenerate() {
        debug!(
            target: "traverse::routing",
            agent = %agent.id,
            tile = %agent.tile,
            target = %target.tile(),
            range,
            steps = result.path.len(),
            cost = result.cost,
            "Search incomplete, falling back to direct approach"
        );
        let accepted = ctx.approach.approach(agent, target, range, grid);
        return Ok(StepReport {
            outcome: StepOutcome::Fallback { accepted },
            traffic: None,
        });
    }

    let destination = result.first_step().unwrap_or_else(|| target.tile());

    let traffic = match agent.tile.direction_to(&destination) {
        Some(direction)
            if agent.tile.range_to(&destination) == 1 && grid.is_occupied(&destination) =>
        {
            let outcome = resolve_conflict(
                agent,
                &destination,
                direction.reverse(),
                ctx.config.border_offset,
                grid,
            );
            debug!(
                agent = %agent.id,
                tile = %destination,
                handled = outcome.is_handled(),
                ?outcome,
                "Contested destination"
            );
            Some(outcome)
        }
        _ => None,
    };

    let (direction, code) = move_toward(grid, agent, &destination)?;
    Ok(StepReport {
        outcome: StepOutcome::Moved {
            direction,
            destination,
            code,
        },
        traffic,
    })
}

/// Issue one direction move from the agent's tile toward `destination`.
///
/// # Errors
///
/// Returns [`MovementError`] when there is no direction to move in or the
/// command is rejected.
pub fn move_toward(
    grid: &mut dyn AgentGrid,
    agent: &Agent,
    destination: &Tile,
) -> Result<(Direction, MoveCode), MovementError> {
    let direction = agent
        .tile
        .direction_to(destination)
        .ok_or(MovementError::NoDirection {
            agent: agent.id,
            position: agent.tile,
            destination: *destination,
        })?;

    let code = grid.issue_move(agent.id, direction);
    if !code.is_tolerated() {
        return Err(MovementError::MoveRejected {
            agent: agent.id,
            position: agent.tile,
            destination: *destination,
            code,
        });
    }

    debug!(agent = %agent.id, %direction, ?code, tile = %destination, "Move issued");
    Ok((direction, code))
}

//! Once-per-turn decision on whether to produce a new ship.

use halite_core::{Constants, GameState, PlayerState};

use crate::config::{EconomyConfig, ProductionWindow, ReserveSchedule};
use crate::movement::Reservations;

/// Last turn (inclusive) on which a ship may be produced.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn production_cutoff(window: ProductionWindow, max_turns: u64) -> u64 {
    match window {
        ProductionWindow::UntilTurn { turn } => turn,
        ProductionWindow::FractionOfMaxTurns { fraction } => {
            (fraction * max_turns as f64).floor() as u64
        }
    }
}

/// Halite withheld from spawning at `turn`.
pub fn reserve_for_turn(reserve: Option<ReserveSchedule>, turn: u64) -> u32 {
    let Some(schedule) = reserve else {
        return 0;
    };
    let steps = turn / schedule.turns_per_step.max(1);
    u32::try_from(steps)
        .unwrap_or(u32::MAX)
        .saturating_mul(schedule.amount_per_step)
}

/// True when `player` should spawn this turn: inside the production window,
/// able to pay the ship cost plus the current reserve, and with a shipyard
/// that is neither occupied nor claimed by one of the player's own moves.
pub fn should_spawn(
    player: &PlayerState,
    state: &GameState,
    constants: &Constants,
    config: &EconomyConfig,
    reservations: &Reservations,
) -> bool {
    let turn = state.meta.turn;
    if turn > production_cutoff(config.production_window, state.meta.max_turns) {
        return false;
    }
    let required = constants
        .ship_cost
        .saturating_add(reserve_for_turn(config.reserve, turn));
    if player.halite < required {
        return false;
    }
    !state.map.is_occupied(player.shipyard) && !reservations.is_reserved(player.shipyard)
}

//! Shared test fixtures for halite_core and downstream crates.
//!
//! `base_state()` provides a single-player game on an empty map; the helpers
//! place ships, halite, and extra players so each test builds exactly the
//! board it needs.

use crate::{
    Constants, Counters, GameMap, GameState, MetaState, PlayerId, PlayerState, Position, ShipId,
    ShipState,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeMap;

/// 32×32 map, 400 turns, 1000 halite per ship / cell cap / ship cost.
pub fn base_constants() -> Constants {
    Constants {
        map_width: 32,
        map_height: 32,
        max_turns: 400,
        max_cell_halite: 1000,
        ship_capacity: 1000,
        ship_cost: 1000,
        initial_halite: 5000,
        extract_ratio: 4,
        move_cost_ratio: 10,
    }
}

/// Player 0 with a shipyard at (8, 8), no ships, no halite on the map.
pub fn base_state(constants: &Constants) -> GameState {
    let mut state = GameState {
        meta: MetaState {
            turn: 0,
            seed: 42,
            max_turns: constants.max_turns,
        },
        map: GameMap::new(constants.map_width, constants.map_height),
        players: BTreeMap::new(),
        ships: BTreeMap::new(),
        counters: Counters {
            next_event_id: 0,
            next_ship_id: 0,
        },
    };
    add_player(
        &mut state,
        PlayerId(0),
        Position::new(8, 8),
        constants.initial_halite,
    );
    state
}

pub fn add_player(state: &mut GameState, id: PlayerId, shipyard: Position, halite: u32) {
    let shipyard = state.map.normalize(shipyard);
    state.map.at_mut(shipyard).structure = Some(id);
    state.players.insert(
        id,
        PlayerState {
            id,
            shipyard,
            halite,
        },
    );
}

/// Adds a ship with capacity 1000 and marks its cell occupied.
pub fn place_ship(state: &mut GameState, owner: PlayerId, position: Position, halite: u32) -> ShipId {
    let id = ShipId(state.counters.next_ship_id);
    state.counters.next_ship_id += 1;
    let position = state.map.normalize(position);
    state.ships.insert(
        id,
        ShipState {
            id,
            owner,
            position,
            halite,
            capacity: 1000,
        },
    );
    state.map.at_mut(position).ship = Some(id);
    id
}

pub fn set_halite(state: &mut GameState, position: Position, halite: u32) {
    state.map.at_mut(position).halite = halite;
}

/// Every cell gets `halite`, except shipyards.
pub fn fill_halite(state: &mut GameState, halite: u32) {
    for cell in &mut state.map.cells {
        if cell.structure.is_none() {
            cell.halite = halite;
        }
    }
}

/// Deterministic RNG seeded with 42.
pub fn make_rng() -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(42)
}

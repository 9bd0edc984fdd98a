use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::{
    Command, CommandEnvelope, Constants, Direction, Event, EventEnvelope, EventLevel, GameState,
    PlayerId, Position, ShipId, ShipState,
};

/// Advance the game by one turn.
///
/// Order of operations:
/// 1. Apply commands issued for this turn (first command per ship wins).
/// 2. Spawn requested ships on their shipyards.
/// 3. Move ships that can pay the move cost.
/// 4. Destroy every ship sharing a cell with another ship.
/// 5. Mine with ships that stayed put.
/// 6. Bank cargo of ships standing on their own shipyard.
/// 7. Rebuild cell occupancy and increment the turn counter.
///
/// Returns all events produced this turn.
pub fn tick(
    state: &mut GameState,
    commands: &[CommandEnvelope],
    constants: &Constants,
    event_level: EventLevel,
) -> Vec<EventEnvelope> {
    let mut events = Vec::new();

    let orders = collect_orders(state, commands);
    spawn_ships(state, &orders.spawns, constants, &mut events);
    let moved = move_ships(state, &orders.moves, constants);
    resolve_collisions(state, &mut events);
    mine_cells(state, &moved, constants, event_level, &mut events);
    deposit_cargo(state, &mut events);
    rebuild_occupancy(state);

    state.meta.turn += 1;
    events
}

#[derive(Default)]
struct Orders {
    moves: BTreeMap<ShipId, Direction>,
    spawns: BTreeSet<PlayerId>,
}

fn collect_orders(state: &GameState, commands: &[CommandEnvelope]) -> Orders {
    let mut orders = Orders::default();
    for envelope in commands {
        if envelope.issued_turn != state.meta.turn {
            continue;
        }
        match &envelope.command {
            Command::Move { ship_id, direction } => {
                let Some(ship) = state.ships.get(ship_id) else {
                    continue;
                };
                if ship.owner != envelope.issued_by {
                    continue;
                }
                orders.moves.entry(*ship_id).or_insert(*direction);
            }
            Command::Spawn => {
                if state.players.contains_key(&envelope.issued_by) {
                    orders.spawns.insert(envelope.issued_by);
                }
            }
        }
    }
    orders
}

fn spawn_ships(
    state: &mut GameState,
    spawns: &BTreeSet<PlayerId>,
    constants: &Constants,
    events: &mut Vec<EventEnvelope>,
) {
    let turn = state.meta.turn;
    for player_id in spawns {
        let Some(player) = state.players.get_mut(player_id) else {
            continue;
        };
        if player.halite < constants.ship_cost {
            continue;
        }
        player.halite -= constants.ship_cost;
        let position = player.shipyard;

        let ship_id = ShipId(state.counters.next_ship_id);
        state.counters.next_ship_id += 1;
        state.ships.insert(
            ship_id,
            ShipState {
                id: ship_id,
                owner: *player_id,
                position,
                halite: 0,
                capacity: constants.ship_capacity,
            },
        );
        events.push(crate::emit(
            &mut state.counters,
            turn,
            Event::ShipSpawned {
                ship_id,
                owner: *player_id,
                position,
            },
        ));
    }
}

/// Returns the ships that actually changed cell.
fn move_ships(
    state: &mut GameState,
    moves: &BTreeMap<ShipId, Direction>,
    constants: &Constants,
) -> HashSet<ShipId> {
    let mut moved = HashSet::new();
    for (ship_id, direction) in moves {
        if *direction == Direction::Still {
            continue;
        }
        let Some(ship) = state.ships.get_mut(ship_id) else {
            continue;
        };
        let cost = state.map.at(ship.position).halite / constants.move_cost_ratio;
        if ship.halite < cost {
            continue;
        }
        ship.halite -= cost;
        ship.position = state.map.directional_offset(ship.position, *direction);
        moved.insert(*ship_id);
    }
    moved
}

fn resolve_collisions(state: &mut GameState, events: &mut Vec<EventEnvelope>) {
    let mut by_cell: BTreeMap<Position, Vec<ShipId>> = BTreeMap::new();
    for ship in state.ships.values() {
        by_cell.entry(ship.position).or_default().push(ship.id);
    }

    let turn = state.meta.turn;
    for (position, ship_ids) in by_cell {
        if ship_ids.len() < 2 {
            continue;
        }
        let mut dropped = 0u32;
        for ship_id in &ship_ids {
            if let Some(ship) = state.ships.remove(ship_id) {
                dropped += ship.halite;
            }
        }
        let structure_owner = state.map.at(position).structure;
        match structure_owner.and_then(|owner| state.players.get_mut(&owner)) {
            Some(player) => player.halite += dropped,
            None => state.map.at_mut(position).halite += dropped,
        }
        events.push(crate::emit(
            &mut state.counters,
            turn,
            Event::ShipsCollided { ship_ids, position },
        ));
    }
}

fn mine_cells(
    state: &mut GameState,
    moved: &HashSet<ShipId>,
    constants: &Constants,
    event_level: EventLevel,
    events: &mut Vec<EventEnvelope>,
) {
    let turn = state.meta.turn;
    for ship in state.ships.values_mut() {
        if moved.contains(&ship.id) {
            continue;
        }
        let cell = state.map.at_mut(ship.position);
        if cell.structure.is_some() {
            continue;
        }
        let free = ship.capacity.saturating_sub(ship.halite);
        let amount = cell.halite.div_ceil(constants.extract_ratio).min(free);
        if amount == 0 {
            continue;
        }
        cell.halite -= amount;
        ship.halite += amount;
        if event_level == EventLevel::Debug {
            events.push(crate::emit(
                &mut state.counters,
                turn,
                Event::HaliteMined {
                    ship_id: ship.id,
                    position: ship.position,
                    amount,
                },
            ));
        }
    }
}

fn deposit_cargo(state: &mut GameState, events: &mut Vec<EventEnvelope>) {
    let turn = state.meta.turn;
    for ship in state.ships.values_mut() {
        let Some(player) = state.players.get_mut(&ship.owner) else {
            continue;
        };
        if ship.position != player.shipyard || ship.halite == 0 {
            continue;
        }
        let amount = ship.halite;
        player.halite += amount;
        ship.halite = 0;
        events.push(crate::emit(
            &mut state.counters,
            turn,
            Event::HaliteDeposited {
                ship_id: ship.id,
                owner: ship.owner,
                amount,
            },
        ));
    }
}

/// Recomputes every cell's `ship` marker from the roster.
pub fn rebuild_occupancy(state: &mut GameState) {
    for cell in &mut state.map.cells {
        cell.ship = None;
    }
    for ship in state.ships.values() {
        state.map.at_mut(ship.position).ship = Some(ship.id);
    }
}

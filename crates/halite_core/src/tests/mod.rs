use super::*;
use crate::test_fixtures::{base_constants, base_state, place_ship, set_halite};

mod mining;

// --- Shared test helpers ------------------------------------------------

fn move_command(state: &GameState, ship_id: ShipId, direction: Direction) -> CommandEnvelope {
    let owner = state.ships[&ship_id].owner;
    CommandEnvelope {
        id: CommandId(format!("cmd_move_{ship_id}")),
        issued_by: owner,
        issued_turn: state.meta.turn,
        command: Command::Move { ship_id, direction },
    }
}

fn spawn_command(state: &GameState, player: PlayerId) -> CommandEnvelope {
    CommandEnvelope {
        id: CommandId(format!("cmd_spawn_{player}")),
        issued_by: player,
        issued_turn: state.meta.turn,
        command: Command::Spawn,
    }
}

#[test]
fn test_tick_advances_turn() {
    let constants = base_constants();
    let mut state = base_state(&constants);
    tick(&mut state, &[], &constants, EventLevel::Normal);
    tick(&mut state, &[], &constants, EventLevel::Normal);
    assert_eq!(state.meta.turn, 2);
}

#[test]
fn test_tick_is_deterministic() {
    let constants = base_constants();
    let mut a = base_state(&constants);
    set_halite(&mut a, Position::new(3, 3), 400);
    let ship = place_ship(&mut a, PlayerId(0), Position::new(3, 3), 0);
    let mut b = a.clone();

    for _ in 0..5 {
        let cmds_a = [move_command(&a, ship, Direction::Still)];
        let cmds_b = [move_command(&b, ship, Direction::Still)];
        tick(&mut a, &cmds_a, &constants, EventLevel::Debug);
        tick(&mut b, &cmds_b, &constants, EventLevel::Debug);
    }

    assert_eq!(a.ships, b.ships);
    assert_eq!(a.map.cells, b.map.cells);
}

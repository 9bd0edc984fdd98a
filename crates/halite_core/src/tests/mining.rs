use super::*;

#[test]
fn test_still_ship_extracts_quarter_rounded_up() {
    let constants = base_constants();
    let mut state = base_state(&constants);
    set_halite(&mut state, Position::new(3, 3), 401);
    let ship = place_ship(&mut state, PlayerId(0), Position::new(3, 3), 0);

    let cmd = move_command(&state, ship, Direction::Still);
    tick(&mut state, &[cmd], &constants, EventLevel::Normal);

    assert_eq!(state.ships[&ship].halite, 101);
    assert_eq!(state.map.at(Position::new(3, 3)).halite, 300);
}

#[test]
fn test_ship_without_command_mines() {
    let constants = base_constants();
    let mut state = base_state(&constants);
    set_halite(&mut state, Position::new(3, 3), 100);
    let ship = place_ship(&mut state, PlayerId(0), Position::new(3, 3), 0);

    tick(&mut state, &[], &constants, EventLevel::Normal);

    assert_eq!(state.ships[&ship].halite, 25);
}

#[test]
fn test_mining_is_capped_by_free_capacity() {
    let constants = base_constants();
    let mut state = base_state(&constants);
    set_halite(&mut state, Position::new(3, 3), 1000);
    let ship = place_ship(&mut state, PlayerId(0), Position::new(3, 3), 990);

    tick(&mut state, &[], &constants, EventLevel::Normal);

    assert_eq!(state.ships[&ship].halite, 1000);
    assert_eq!(state.map.at(Position::new(3, 3)).halite, 990);
}

#[test]
fn test_mined_event_only_at_debug_level() {
    let constants = base_constants();
    let mut state = base_state(&constants);
    set_halite(&mut state, Position::new(3, 3), 100);
    place_ship(&mut state, PlayerId(0), Position::new(3, 3), 0);

    let normal = tick(&mut state, &[], &constants, EventLevel::Normal);
    let debug = tick(&mut state, &[], &constants, EventLevel::Debug);

    assert!(!normal
        .iter()
        .any(|e| matches!(e.event, Event::HaliteMined { .. })));
    assert!(debug
        .iter()
        .any(|e| matches!(e.event, Event::HaliteMined { .. })));
}

#[test]
fn test_ship_reaching_shipyard_deposits_cargo() {
    let constants = base_constants();
    let mut state = base_state(&constants);
    let banked = state.players[&PlayerId(0)].halite;
    let ship = place_ship(&mut state, PlayerId(0), Position::new(8, 9), 640);

    let cmd = move_command(&state, ship, Direction::North);
    let events = tick(&mut state, &[cmd], &constants, EventLevel::Normal);

    assert_eq!(state.ships[&ship].halite, 0);
    assert_eq!(state.players[&PlayerId(0)].halite, banked + 640);
    assert!(events
        .iter()
        .any(|e| matches!(e.event, Event::HaliteDeposited { amount: 640, .. })));
}

//! Full games driven by `FleetController` through the offline engine.

use halite_control::{CommandSource, FleetController, StrategyConfig};
use halite_core::test_fixtures::base_constants;
use halite_core::{compute_metrics, Event, EventLevel, GameState, MetricsSnapshot, PlayerId};
use halite_world::build_initial_state;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

struct GameLog {
    state: GameState,
    deposits: usize,
    collisions: usize,
    peak_ships: usize,
}

fn play(players: u32, seed: u64, turns: u64) -> GameLog {
    let constants = base_constants();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut state = build_initial_state(&constants, players, seed, &mut rng);

    let mut controllers: Vec<FleetController> = (0..players)
        .map(|id| {
            let config = StrategyConfig {
                seed,
                ..StrategyConfig::default()
            };
            FleetController::new(PlayerId(id), config)
        })
        .collect();

    let mut next_command_id = 0u64;
    let mut log = GameLog {
        state: state.clone(),
        deposits: 0,
        collisions: 0,
        peak_ships: 0,
    };

    for _ in 0..turns {
        let mut commands = Vec::new();
        for controller in &mut controllers {
            commands.extend(controller.generate_commands(&state, &constants, &mut next_command_id));
        }
        let events = halite_core::tick(&mut state, &commands, &constants, EventLevel::Normal);
        for event in &events {
            match event.event {
                Event::HaliteDeposited { .. } => log.deposits += 1,
                Event::ShipsCollided { .. } => log.collisions += 1,
                _ => {}
            }
        }
        log.peak_ships = log.peak_ships.max(state.ships.len());
    }

    log.state = state;
    log
}

fn snapshot(log: &GameLog) -> MetricsSnapshot {
    compute_metrics(&log.state)
}

#[test]
fn test_solo_fleet_grows_and_banks_halite() {
    let log = play(1, 17, 200);

    assert!(log.peak_ships >= 3, "fleet never grew: {}", log.peak_ships);
    assert!(log.deposits > 0, "no cargo was ever deposited");
    assert_eq!(log.state.meta.turn, 200);
}

#[test]
fn test_own_ships_never_collide() {
    let log = play(1, 23, 250);
    assert_eq!(log.collisions, 0);
}

#[test]
fn test_spawning_stops_after_production_window() {
    // Default window is half of max_turns (400), so turn 200.
    let log = play(1, 5, 320);
    let at_end = snapshot(&log);

    let late = play(1, 5, 201);
    let at_cutoff = snapshot(&late);

    let ships = |s: &MetricsSnapshot| s.player(PlayerId(0)).map_or(0, |p| p.ships);
    assert!(ships(&at_end) <= ships(&at_cutoff));
}

#[test]
fn test_same_seed_replays_identically() {
    let a = play(2, 31, 120);
    let b = play(2, 31, 120);

    assert_eq!(snapshot(&a), snapshot(&b));
    assert_eq!(a.deposits, b.deposits);
    assert_eq!(
        a.state.ships.keys().collect::<Vec<_>>(),
        b.state.ships.keys().collect::<Vec<_>>()
    );
}

#[test]
fn test_four_player_game_runs_to_completion() {
    let constants = base_constants();
    let initial = build_initial_state(&constants, 4, 9, &mut ChaCha8Rng::seed_from_u64(9));
    let log = play(4, 9, 150);
    let metrics = snapshot(&log);

    assert_eq!(metrics.turn, 150);
    assert_eq!(metrics.players.len(), 4);
    assert!(metrics.map_halite < initial.map.total_halite());
}

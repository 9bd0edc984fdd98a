use serde::{Deserialize, Serialize};

use crate::{GameState, PlayerId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerMetrics {
    pub player: PlayerId,
    pub ships: u32,
    pub halite_banked: u32,
    pub halite_carried: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub turn: u64,
    pub map_halite: u64,
    pub players: Vec<PlayerMetrics>,
}

impl MetricsSnapshot {
    pub fn player(&self, player: PlayerId) -> Option<&PlayerMetrics> {
        self.players.iter().find(|m| m.player == player)
    }
}

/// Snapshot of the economy at the current turn, one entry per player in id order.
pub fn compute_metrics(state: &GameState) -> MetricsSnapshot {
    let players = state
        .players
        .values()
        .map(|player| {
            let mut ships = 0u32;
            let mut halite_carried = 0u64;
            for ship in state.ships_of(player.id) {
                ships += 1;
                halite_carried += u64::from(ship.halite);
            }
            PlayerMetrics {
                player: player.id,
                ships,
                halite_banked: player.halite,
                halite_carried,
            }
        })
        .collect();

    MetricsSnapshot {
        turn: state.meta.turn,
        map_halite: state.map.total_halite(),
        players,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::{base_constants, base_state, place_ship};
    use crate::Position;

    #[test]
    fn metrics_count_ships_and_cargo_per_player() {
        let constants = base_constants();
        let mut state = base_state(&constants);
        place_ship(&mut state, PlayerId(0), Position::new(3, 3), 120);
        place_ship(&mut state, PlayerId(0), Position::new(4, 3), 80);

        let snapshot = compute_metrics(&state);
        let me = snapshot.player(PlayerId(0)).unwrap();
        assert_eq!(me.ships, 2);
        assert_eq!(me.halite_carried, 200);
        assert_eq!(me.halite_banked, constants.initial_halite);
        assert_eq!(snapshot.map_halite, state.map.total_halite());
    }

    #[test]
    fn metrics_serialize_to_json() {
        let constants = base_constants();
        let state = base_state(&constants);
        let json = serde_json::to_value(compute_metrics(&state)).unwrap();
        assert_eq!(json["turn"], 0);
        assert!(json["players"].is_array());
    }
}

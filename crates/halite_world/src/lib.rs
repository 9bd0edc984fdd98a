//! World generation and content loading shared between the CLI and tests.

use anyhow::{Context, Result};
use halite_core::{
    rebuild_occupancy, Constants, Counters, GameMap, GameState, MetaState, PlayerId, PlayerState,
    Position,
};
use rand::Rng;
use std::collections::BTreeMap;
use std::path::Path;

/// Validates loaded constants, panicking on any authoring error.
///
/// Catches values the engine would divide by or that make a game impossible:
/// zero-sized maps, zero ratios, ships with no capacity.
pub fn validate_constants(constants: &Constants) {
    assert!(
        constants.map_width >= 2 && constants.map_height >= 2,
        "map must be at least 2x2, got {}x{}",
        constants.map_width,
        constants.map_height,
    );
    assert!(constants.max_turns > 0, "max_turns must be > 0");
    assert!(constants.extract_ratio > 0, "extract_ratio must be > 0");
    assert!(constants.move_cost_ratio > 0, "move_cost_ratio must be > 0");
    assert!(constants.ship_capacity > 0, "ship_capacity must be > 0");
    assert!(constants.max_cell_halite > 0, "max_cell_halite must be > 0");
}

pub fn load_constants(content_dir: &str) -> Result<Constants> {
    let path = Path::new(content_dir).join("constants.json");
    let constants: Constants = serde_json::from_str(
        &std::fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))?,
    )
    .with_context(|| format!("parsing {}", path.display()))?;
    validate_constants(&constants);
    Ok(constants)
}

/// Shipyard positions for 1, 2, or 4 players, mirrored like the map.
#[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
pub fn shipyard_positions(width: usize, height: usize, players: u32) -> Vec<Position> {
    let (w, h) = (width as i32, height as i32);
    let left = w / 4;
    let right = w - 1 - w / 4;
    let top = h / 4;
    let bottom = h - 1 - h / 4;
    match players {
        1 => vec![Position::new(w / 2, h / 2)],
        2 => vec![Position::new(left, h / 2), Position::new(right, h / 2)],
        4 => vec![
            Position::new(left, top),
            Position::new(right, top),
            Position::new(left, bottom),
            Position::new(right, bottom),
        ],
        n => panic!("unsupported player count {n}: expected 1, 2, or 4"),
    }
}

/// Size of the region generated before mirroring.
fn tile_size(width: usize, height: usize, players: u32) -> (usize, usize) {
    match players {
        2 => (width.div_ceil(2), height),
        4 => (width.div_ceil(2), height.div_ceil(2)),
        _ => (width, height),
    }
}

/// Random halite field: low background noise plus a few rich patches,
/// smoothed once so patches fade into their surroundings.
#[allow(
    clippy::cast_possible_wrap,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn generate_tile(tw: usize, th: usize, max_halite: u32, rng: &mut impl Rng) -> Vec<u32> {
    let mut raw: Vec<f64> = (0..tw * th)
        .map(|_| rng.gen_range(0.0..f64::from(max_halite) / 6.0))
        .collect();

    let patches = (tw * th) / 48 + 1;
    for _ in 0..patches {
        let cx = rng.gen_range(0..tw) as i32;
        let cy = rng.gen_range(0..th) as i32;
        let radius = rng.gen_range(2..=5);
        let peak = rng.gen_range(f64::from(max_halite) * 0.5..=f64::from(max_halite));
        for y in 0..th as i32 {
            for x in 0..tw as i32 {
                let d = (x - cx).abs() + (y - cy).abs();
                if d <= radius {
                    let falloff = 1.0 - f64::from(d) / f64::from(radius + 1);
                    raw[y as usize * tw + x as usize] += peak * falloff;
                }
            }
        }
    }

    let mut smoothed = vec![0u32; tw * th];
    for y in 0..th {
        for x in 0..tw {
            let mut sum = 0.0;
            let mut n = 0.0;
            let neighbours = [
                (x, y),
                (x.wrapping_sub(1), y),
                (x + 1, y),
                (x, y.wrapping_sub(1)),
                (x, y + 1),
            ];
            for (nx, ny) in neighbours {
                if nx < tw && ny < th {
                    let weight = if (nx, ny) == (x, y) { 2.0 } else { 1.0 };
                    sum += raw[ny * tw + nx] * weight;
                    n += weight;
                }
            }
            smoothed[y * tw + x] = (sum / n).min(f64::from(max_halite)) as u32;
        }
    }
    smoothed
}

/// Build the turn-0 state: a mirrored halite map, one shipyard and a starting
/// bank per player, no ships.
pub fn build_initial_state(
    constants: &Constants,
    players: u32,
    seed: u64,
    rng: &mut impl Rng,
) -> GameState {
    let (width, height) = (constants.map_width, constants.map_height);
    let (tw, th) = tile_size(width, height, players);
    let tile = generate_tile(tw, th, constants.max_cell_halite, rng);

    let mut map = GameMap::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let tx = if x < tw { x } else { width - 1 - x };
            let ty = if y < th { y } else { height - 1 - y };
            map.cells[y * width + x].halite = tile[ty * tw + tx];
        }
    }

    let mut player_states = BTreeMap::new();
    for (id, shipyard) in (0..).zip(shipyard_positions(width, height, players)) {
        let id = PlayerId(id);
        let cell = map.at_mut(shipyard);
        cell.halite = 0;
        cell.structure = Some(id);
        player_states.insert(
            id,
            PlayerState {
                id,
                shipyard,
                halite: constants.initial_halite,
            },
        );
    }

    let mut state = GameState {
        meta: MetaState {
            turn: 0,
            seed,
            max_turns: constants.max_turns,
        },
        map,
        players: player_states,
        ships: BTreeMap::new(),
        counters: Counters {
            next_event_id: 0,
            next_ship_id: 0,
        },
    };
    rebuild_occupancy(&mut state);
    state
}

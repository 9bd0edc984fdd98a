//! Harvest target selection: rank cells around the shipyard by halite,
//! widening the search until the sample is rich enough.

use std::collections::HashSet;

use halite_core::{GameMap, Position};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::TargetingConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub position: Position,
    pub halite: u32,
}

/// Cells within Manhattan `radius` of `center`, richest first, ties by
/// position. Excludes `center` and every structure cell.
#[allow(clippy::cast_possible_wrap)]
pub fn ranked_cells(map: &GameMap, center: Position, radius: u32) -> Vec<Candidate> {
    let center = map.normalize(center);
    let r = radius as i32;
    let mut seen = HashSet::new();
    let mut candidates = Vec::new();
    for dy in -r..=r {
        let span = r - dy.abs();
        for dx in -span..=span {
            let position = map.normalize(Position::new(center.x + dx, center.y + dy));
            if position == center || !seen.insert(position) {
                continue;
            }
            let cell = map.at(position);
            if cell.structure.is_some() {
                continue;
            }
            candidates.push(Candidate {
                position,
                halite: cell.halite,
            });
        }
    }
    candidates.sort_by(|a, b| {
        b.halite
            .cmp(&a.halite)
            .then_with(|| a.position.cmp(&b.position))
    });
    candidates
}

/// Largest useful search radius: half the shorter side of the map.
#[allow(clippy::cast_possible_truncation)]
pub fn max_radius(map: &GameMap) -> u32 {
    ((map.width.min(map.height) / 2) as u32).max(1)
}

fn richness_floor(config: &TargetingConfig, max_cell_halite: u32) -> f64 {
    config.richness_floor_fraction * f64::from(max_cell_halite)
}

/// Samples around `shipyard`, growing the radius by `radius_step` until the
/// candidate at `floor_rank` clears the richness floor or the radius reaches
/// [`max_radius`]. The last sample is returned either way.
pub fn sample_candidates(
    map: &GameMap,
    shipyard: Position,
    max_cell_halite: u32,
    config: &TargetingConfig,
) -> Vec<Candidate> {
    let floor = richness_floor(config, max_cell_halite);
    let limit = max_radius(map);
    let mut radius = config.min_radius.clamp(1, limit);
    loop {
        let candidates = ranked_cells(map, shipyard, radius);
        let rich_enough = candidates
            .get(config.floor_rank)
            .is_some_and(|c| f64::from(c.halite) >= floor);
        if rich_enough || radius >= limit {
            return candidates;
        }
        radius = (radius + config.radius_step.max(1)).min(limit);
    }
}

/// Picks a harvest target for one ship.
///
/// The pick is random among the `top_n` richest sampled cells that clear the
/// richness floor, preferring cells no other ship claims. When nothing clears
/// the floor the best available cells are used instead. `None` only when the
/// map has no cell besides the shipyard.
pub fn select_target(
    map: &GameMap,
    shipyard: Position,
    max_cell_halite: u32,
    claimed: &HashSet<Position>,
    config: &TargetingConfig,
    rng: &mut impl Rng,
) -> Option<Position> {
    let candidates = sample_candidates(map, shipyard, max_cell_halite, config);
    let floor = richness_floor(config, max_cell_halite);

    let unclaimed: Vec<&Candidate> = if config.avoid_claimed_targets {
        candidates
            .iter()
            .filter(|c| !claimed.contains(&c.position))
            .collect()
    } else {
        candidates.iter().collect()
    };
    let everything: Vec<&Candidate> = candidates.iter().collect();

    let top_rich = |pool: &[&Candidate]| -> Vec<Candidate> {
        pool.iter()
            .filter(|c| f64::from(c.halite) >= floor)
            .take(config.top_n)
            .map(|c| **c)
            .collect()
    };
    let top_any = |pool: &[&Candidate]| -> Vec<Candidate> {
        pool.iter().take(config.top_n).map(|c| **c).collect()
    };

    let picks = [
        top_rich(&unclaimed),
        top_rich(&everything),
        top_any(&unclaimed),
        top_any(&everything),
    ]
    .into_iter()
    .find(|pool| !pool.is_empty())?;

    picks.choose(rng).map(|c| c.position)
}

/// True once the target cell has fallen below the depletion floor.
pub fn target_depleted(
    map: &GameMap,
    target: Position,
    max_cell_halite: u32,
    config: &TargetingConfig,
) -> bool {
    f64::from(map.at(target).halite) < config.depletion_floor_fraction * f64::from(max_cell_halite)
}

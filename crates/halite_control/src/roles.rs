//! Per-ship role state machine and the fleet state it lives in.

use std::collections::{HashMap, HashSet};

use halite_core::{GameMap, Position, ShipId, ShipState};
use serde::{Deserialize, Serialize};

use crate::config::ReturnPolicy;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Role {
    /// Seeking or working a target cell. Every unseen ship starts here.
    #[default]
    Harvesting,
    /// Carrying cargo back to the shipyard.
    Returning,
}

/// Role and target per ship id, owned by one player's controller and carried
/// from turn to turn.
#[derive(Debug, Clone, Default)]
pub struct FleetState {
    roles: HashMap<ShipId, Role>,
    targets: HashMap<ShipId, Position>,
}

impl FleetState {
    pub fn role(&self, ship_id: ShipId) -> Role {
        self.roles.get(&ship_id).copied().unwrap_or_default()
    }

    pub fn target(&self, ship_id: ShipId) -> Option<Position> {
        self.targets.get(&ship_id).copied()
    }

    pub fn set_target(&mut self, ship_id: ShipId, target: Position) {
        self.targets.insert(ship_id, target);
    }

    pub fn clear_target(&mut self, ship_id: ShipId) {
        self.targets.remove(&ship_id);
    }

    /// Targets held by ships other than `except`.
    pub fn claimed_targets(&self, except: ShipId) -> HashSet<Position> {
        self.targets
            .iter()
            .filter(|(id, _)| **id != except)
            .map(|(_, pos)| *pos)
            .collect()
    }

    /// Drops entries for ships no longer in the roster.
    pub fn prune(&mut self, roster: &HashSet<ShipId>) {
        self.roles.retain(|id, _| roster.contains(id));
        self.targets.retain(|id, _| roster.contains(id));
    }

    pub fn tracked_ships(&self) -> usize {
        self.roles.len()
    }
}

/// Cargo above which a ship `distance` cells from its shipyard heads home.
pub fn return_threshold(policy: ReturnPolicy, distance: u32, width: usize, capacity: u32) -> f64 {
    let capacity = f64::from(capacity);
    match policy {
        ReturnPolicy::FixedFraction { fraction } => fraction * capacity,
        ReturnPolicy::DistanceScaled {
            base_fraction,
            distance_weight,
        } => {
            let reach = f64::from(distance) / width as f64;
            base_fraction * capacity + reach * distance_weight * capacity
        }
    }
}

/// Runs one transition for `ship` and returns its role for this turn.
///
/// Returning ships standing on the shipyard go back to harvesting; harvesting
/// ships that are full or whose cargo exceeds the return threshold start
/// returning. Both transitions clear the ship's target.
pub fn update_role(
    fleet: &mut FleetState,
    ship: &ShipState,
    shipyard: Position,
    map: &GameMap,
    policy: ReturnPolicy,
) -> Role {
    let role = fleet.roles.entry(ship.id).or_default();
    match *role {
        Role::Returning if ship.position == shipyard => {
            *role = Role::Harvesting;
            fleet.targets.remove(&ship.id);
            tracing::debug!(ship = %ship.id, "back at shipyard, harvesting");
        }
        Role::Harvesting => {
            let distance = map.calculate_distance(ship.position, shipyard);
            let threshold = return_threshold(policy, distance, map.width, ship.capacity);
            if ship.is_full() || f64::from(ship.halite) > threshold {
                *role = Role::Returning;
                fleet.targets.remove(&ship.id);
                tracing::debug!(
                    ship = %ship.id,
                    cargo = ship.halite,
                    threshold,
                    "returning to shipyard"
                );
            }
        }
        Role::Returning => {}
    }
    *role
}

//! Turns a ship's role and target into one collision-checked step.
//!
//! Ships are resolved one at a time in roster order. Every move claims its
//! destination in the turn's [`Reservations`] before the direction is
//! returned, and a claimed cell counts as occupied for every later ship.

use std::collections::HashSet;

use halite_core::{Direction, GameMap, Position, ShipState};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::MovementConfig;
use crate::roles::Role;

/// Destinations claimed so far this turn. Built empty each turn.
#[derive(Debug, Default)]
pub struct Reservations {
    cells: HashSet<Position>,
}

impl Reservations {
    pub fn is_reserved(&self, position: Position) -> bool {
        self.cells.contains(&position)
    }

    /// Returns false if the cell was already claimed.
    pub fn reserve(&mut self, position: Position) -> bool {
        self.cells.insert(position)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Read-only inputs shared by every ship in one player's turn.
pub struct MoveContext<'a> {
    pub map: &'a GameMap,
    pub shipyard: Position,
    pub max_cell_halite: u32,
    pub config: &'a MovementConfig,
}

impl MoveContext<'_> {
    fn is_free(&self, position: Position, reservations: &Reservations) -> bool {
        !self.map.is_occupied(position) && !reservations.is_reserved(position)
    }

    fn can_afford_move(&self, ship: &ShipState) -> bool {
        let cell = f64::from(self.map.at(ship.position).halite);
        f64::from(ship.halite) >= self.config.min_carry_fraction * cell
    }

    fn is_cheap_cell(&self, position: Position) -> bool {
        f64::from(self.map.at(position).halite)
            < self.config.cheap_cell_fraction * f64::from(self.max_cell_halite)
    }

    fn claim(&self, ship: &ShipState, direction: Direction, reservations: &mut Reservations) -> Direction {
        let next = self.map.directional_offset(ship.position, direction);
        let fresh = reservations.reserve(next);
        debug_assert!(fresh, "ship {} moved onto reserved cell {next}", ship.id);
        direction
    }

    /// Greedy step toward `destination`; when that cell is taken (or the
    /// suggestion is to hold) the first free cardinal direction in a shuffled
    /// order. Holds if every neighbour is taken.
    pub fn navigate(
        &self,
        ship: &ShipState,
        destination: Position,
        reservations: &mut Reservations,
        rng: &mut impl Rng,
    ) -> Direction {
        let greedy = self.map.greedy_direction(ship.position, destination);
        if greedy != Direction::Still {
            let next = self.map.directional_offset(ship.position, greedy);
            if self.is_free(next, reservations) {
                return self.claim(ship, greedy, reservations);
            }
        }

        let mut directions = Direction::CARDINALS;
        directions.shuffle(rng);
        for direction in directions {
            let next = self.map.directional_offset(ship.position, direction);
            if self.is_free(next, reservations) {
                return self.claim(ship, direction, reservations);
            }
        }
        Direction::Still
    }
}

/// Decides this turn's step for one ship.
///
/// - Returning: head for the shipyard.
/// - Harvesting on a cheap cell with enough cargo to leave: head for the target.
/// - Anything else: hold and mine.
pub fn resolve_move(
    ctx: &MoveContext<'_>,
    ship: &ShipState,
    role: Role,
    target: Option<Position>,
    reservations: &mut Reservations,
    rng: &mut impl Rng,
) -> Direction {
    debug_assert_eq!(
        ctx.map.at(ship.position).ship,
        Some(ship.id),
        "ship {} missing from its cell occupancy",
        ship.id
    );
    if !ctx.can_afford_move(ship) {
        return Direction::Still;
    }
    match role {
        Role::Returning => ctx.navigate(ship, ctx.shipyard, reservations, rng),
        Role::Harvesting => match target {
            Some(target) if ctx.is_cheap_cell(ship.position) => {
                ctx.navigate(ship, target, reservations, rng)
            }
            _ => Direction::Still,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use halite_core::{PlayerId, ShipId};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    const SHIPYARD: Position = Position::new(16, 16);

    fn place(map: &mut GameMap, id: u32, position: Position, halite: u32) -> ShipState {
        map.at_mut(position).ship = Some(ShipId(id));
        ShipState {
            id: ShipId(id),
            owner: PlayerId(0),
            position,
            halite,
            capacity: 1000,
        }
    }

    fn context<'a>(map: &'a GameMap, config: &'a MovementConfig) -> MoveContext<'a> {
        MoveContext {
            map,
            shipyard: SHIPYARD,
            max_cell_halite: 1000,
            config,
        }
    }

    #[test]
    fn test_returning_ship_steps_toward_shipyard() {
        let mut map = GameMap::new(32, 32);
        let ship = place(&mut map, 1, Position::new(12, 16), 700);
        let config = MovementConfig::default();
        let ctx = context(&map, &config);
        let mut reservations = Reservations::default();
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let dir = resolve_move(&ctx, &ship, Role::Returning, None, &mut reservations, &mut rng);

        assert_eq!(dir, Direction::East);
        assert!(reservations.is_reserved(Position::new(13, 16)));
    }

    #[test]
    fn test_second_ship_cannot_take_reserved_cell() {
        let mut map = GameMap::new(32, 32);
        let first = place(&mut map, 1, Position::new(15, 15), 700);
        let second = place(&mut map, 2, Position::new(17, 15), 700);
        let config = MovementConfig::default();
        let ctx = context(&map, &config);

        for seed in 0..8 {
            let mut reservations = Reservations::default();
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let a = resolve_move(&ctx, &first, Role::Returning, None, &mut reservations, &mut rng);
            let b = resolve_move(&ctx, &second, Role::Returning, None, &mut reservations, &mut rng);

            assert_eq!(a, Direction::East);
            assert_ne!(b, Direction::West, "(16, 15) already belongs to ship 1");
            assert_ne!(b, Direction::Still, "ship 2 has free neighbours");
            assert_eq!(reservations.len(), 2);
        }
    }

    #[test]
    fn test_blocked_ship_with_no_free_neighbour_holds() {
        let mut map = GameMap::new(32, 32);
        let ship = place(&mut map, 1, Position::new(10, 10), 700);
        for (id, dir) in (10..).zip(Direction::CARDINALS) {
            let pos = map.directional_offset(ship.position, dir);
            place(&mut map, id, pos, 0);
        }
        let config = MovementConfig::default();
        let ctx = context(&map, &config);
        let mut reservations = Reservations::default();
        let mut rng = ChaCha8Rng::seed_from_u64(4);

        let dir = resolve_move(&ctx, &ship, Role::Returning, None, &mut reservations, &mut rng);

        assert_eq!(dir, Direction::Still);
        assert!(reservations.is_empty());
    }

    #[test]
    fn test_occupied_greedy_cell_triggers_fallback() {
        let mut map = GameMap::new(32, 32);
        let ship = place(&mut map, 1, Position::new(12, 16), 700);
        place(&mut map, 2, Position::new(13, 16), 0);
        let config = MovementConfig::default();
        let ctx = context(&map, &config);
        let mut reservations = Reservations::default();
        let mut rng = ChaCha8Rng::seed_from_u64(6);

        let dir = resolve_move(&ctx, &ship, Role::Returning, None, &mut reservations, &mut rng);

        assert!(matches!(
            dir,
            Direction::North | Direction::South | Direction::West
        ));
    }

    #[test]
    fn test_harvester_holds_on_rich_cell() {
        let mut map = GameMap::new(32, 32);
        map.at_mut(Position::new(5, 5)).halite = 400;
        let ship = place(&mut map, 1, Position::new(5, 5), 100);
        let config = MovementConfig::default();
        let ctx = context(&map, &config);
        let mut reservations = Reservations::default();
        let mut rng = ChaCha8Rng::seed_from_u64(2);

        let dir = resolve_move(
            &ctx,
            &ship,
            Role::Harvesting,
            Some(Position::new(9, 5)),
            &mut reservations,
            &mut rng,
        );

        assert_eq!(dir, Direction::Still);
        assert!(reservations.is_empty());
    }

    #[test]
    fn test_harvester_leaves_cheap_cell_for_target() {
        let mut map = GameMap::new(32, 32);
        map.at_mut(Position::new(5, 5)).halite = 60;
        let ship = place(&mut map, 1, Position::new(5, 5), 10);
        let config = MovementConfig::default();
        let ctx = context(&map, &config);
        let mut reservations = Reservations::default();
        let mut rng = ChaCha8Rng::seed_from_u64(2);

        let dir = resolve_move(
            &ctx,
            &ship,
            Role::Harvesting,
            Some(Position::new(5, 9)),
            &mut reservations,
            &mut rng,
        );

        assert_eq!(dir, Direction::South);
        assert_eq!(reservations.len(), 1);
    }

    #[test]
    fn test_harvester_too_poor_to_leave_holds() {
        let mut map = GameMap::new(32, 32);
        map.at_mut(Position::new(5, 5)).halite = 90;
        let ship = place(&mut map, 1, Position::new(5, 5), 5);
        let config = MovementConfig::default();
        let ctx = context(&map, &config);
        let mut reservations = Reservations::default();
        let mut rng = ChaCha8Rng::seed_from_u64(2);

        let dir = resolve_move(
            &ctx,
            &ship,
            Role::Harvesting,
            Some(Position::new(5, 9)),
            &mut reservations,
            &mut rng,
        );

        assert_eq!(dir, Direction::Still);
    }

    #[test]
    fn test_harvester_without_target_holds() {
        let mut map = GameMap::new(32, 32);
        let ship = place(&mut map, 1, Position::new(5, 5), 0);
        let config = MovementConfig::default();
        let ctx = context(&map, &config);
        let mut reservations = Reservations::default();
        let mut rng = ChaCha8Rng::seed_from_u64(2);

        let dir = resolve_move(&ctx, &ship, Role::Harvesting, None, &mut reservations, &mut rng);

        assert_eq!(dir, Direction::Still);
    }

    #[test]
    fn test_harvester_standing_on_its_cheap_target_explores() {
        let mut map = GameMap::new(32, 32);
        let ship = place(&mut map, 1, Position::new(5, 5), 0);
        let config = MovementConfig::default();
        let ctx = context(&map, &config);
        let mut reservations = Reservations::default();
        let mut rng = ChaCha8Rng::seed_from_u64(2);

        let dir = resolve_move(
            &ctx,
            &ship,
            Role::Harvesting,
            Some(ship.position),
            &mut reservations,
            &mut rng,
        );

        assert_ne!(dir, Direction::Still);
        assert_eq!(reservations.len(), 1);
    }
}

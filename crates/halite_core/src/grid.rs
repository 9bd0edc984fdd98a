use crate::{Cell, Direction, GameMap, Position};

impl GameMap {
    /// Empty map of `width` × `height` cells with no halite.
    pub fn new(width: usize, height: usize) -> Self {
        assert!(width > 0 && height > 0, "map dimensions must be non-zero");
        Self {
            width,
            height,
            cells: vec![Cell::default(); width * height],
        }
    }

    #[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
    pub fn normalize(&self, position: Position) -> Position {
        let w = self.width as i32;
        let h = self.height as i32;
        Position::new(position.x.rem_euclid(w), position.y.rem_euclid(h))
    }

    #[allow(clippy::cast_sign_loss)]
    fn index(&self, position: Position) -> usize {
        let p = self.normalize(position);
        p.y as usize * self.width + p.x as usize
    }

    pub fn at(&self, position: Position) -> &Cell {
        &self.cells[self.index(position)]
    }

    pub fn at_mut(&mut self, position: Position) -> &mut Cell {
        let idx = self.index(position);
        &mut self.cells[idx]
    }

    pub fn directional_offset(&self, position: Position, direction: Direction) -> Position {
        let (dx, dy) = direction.offset();
        self.normalize(Position::new(position.x + dx, position.y + dy))
    }

    /// Toroidal Manhattan distance.
    pub fn calculate_distance(&self, a: Position, b: Position) -> u32 {
        let (dx, dy) = self.wrapped_delta(a, b);
        dx.unsigned_abs() + dy.unsigned_abs()
    }

    /// Signed per-axis step count from `from` to `to` along the shorter way
    /// around the torus.
    #[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
    fn wrapped_delta(&self, from: Position, to: Position) -> (i32, i32) {
        let from = self.normalize(from);
        let to = self.normalize(to);
        let shortest = |delta: i32, size: i32| {
            if delta > size / 2 {
                delta - size
            } else if delta < -(size / 2) {
                delta + size
            } else {
                delta
            }
        };
        (
            shortest(to.x - from.x, self.width as i32),
            shortest(to.y - from.y, self.height as i32),
        )
    }

    /// Single-step direction toward `to`, ignoring occupancy. Closes the
    /// horizontal gap first; `Still` once `from == to`.
    pub fn greedy_direction(&self, from: Position, to: Position) -> Direction {
        let (dx, dy) = self.wrapped_delta(from, to);
        if dx > 0 {
            Direction::East
        } else if dx < 0 {
            Direction::West
        } else if dy > 0 {
            Direction::South
        } else if dy < 0 {
            Direction::North
        } else {
            Direction::Still
        }
    }

    pub fn is_occupied(&self, position: Position) -> bool {
        self.at(position).ship.is_some()
    }

    pub fn total_halite(&self) -> u64 {
        self.cells.iter().map(|cell| u64::from(cell.halite)).sum()
    }

    /// All positions in row-major order.
    #[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.height).flat_map(move |y| {
            (0..self.width).map(move |x| Position::new(x as i32, y as i32))
        })
    }
}

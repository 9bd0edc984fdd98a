//! Type definitions for `halite_core`.
//!
//! All public types, structs, enums, and ID newtypes used by the world model.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// ID newtypes
// ---------------------------------------------------------------------------

macro_rules! int_id {
    ($name:ident) => {
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        pub struct $name(pub u32);

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

macro_rules! string_id {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub String);

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

int_id!(ShipId);
int_id!(PlayerId);
string_id!(CommandId);
string_id!(EventId);

// ---------------------------------------------------------------------------
// Geometry
// ---------------------------------------------------------------------------

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    South,
    East,
    West,
    Still,
}

impl Direction {
    pub const CARDINALS: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    /// Unit step `(dx, dy)`. North decreases `y`.
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::South => (0, 1),
            Direction::East => (1, 0),
            Direction::West => (-1, 0),
            Direction::Still => (0, 0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventLevel {
    Normal,
    Debug,
}

// ---------------------------------------------------------------------------
// State types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub halite: u32,
    /// Ship standing on this cell at the start of the turn.
    pub ship: Option<ShipId>,
    /// Owner of the shipyard built on this cell, if any.
    pub structure: Option<PlayerId>,
}

/// Toroidal grid stored row-major. Every accessor accepts un-normalized
/// positions and wraps them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameMap {
    pub width: usize,
    pub height: usize,
    pub cells: Vec<Cell>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub meta: MetaState,
    pub map: GameMap,
    pub players: BTreeMap<PlayerId, PlayerState>,
    /// Ordered by id, which is also the roster order ships are decided in.
    pub ships: BTreeMap<ShipId, ShipState>,
    pub counters: Counters,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetaState {
    pub turn: u64,
    pub seed: u64,
    pub max_turns: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Counters {
    pub next_event_id: u64,
    pub next_ship_id: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipState {
    pub id: ShipId,
    pub owner: PlayerId,
    pub position: Position,
    pub halite: u32,
    pub capacity: u32,
}

impl ShipState {
    pub fn is_full(&self) -> bool {
        self.halite >= self.capacity
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    pub id: PlayerId,
    pub shipyard: Position,
    /// Banked halite available for spending.
    pub halite: u32,
}

impl GameState {
    /// Owned ships in roster order.
    pub fn ships_of(&self, player: PlayerId) -> impl Iterator<Item = &ShipState> {
        self.ships.values().filter(move |ship| ship.owner == player)
    }
}

// ---------------------------------------------------------------------------
// Command types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandEnvelope {
    pub id: CommandId,
    pub issued_by: PlayerId,
    pub issued_turn: u64,
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// `Direction::Still` holds position (and mines).
    Move {
        ship_id: ShipId,
        direction: Direction,
    },
    /// Produce a new ship on the issuing player's shipyard.
    Spawn,
}

// ---------------------------------------------------------------------------
// Event types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope {
    pub id: EventId,
    pub turn: u64,
    pub event: Event,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    ShipSpawned {
        ship_id: ShipId,
        owner: PlayerId,
        position: Position,
    },
    ShipsCollided {
        ship_ids: Vec<ShipId>,
        position: Position,
    },
    HaliteDeposited {
        ship_id: ShipId,
        owner: PlayerId,
        amount: u32,
    },
    /// Only emitted at `EventLevel::Debug`.
    HaliteMined {
        ship_id: ShipId,
        position: Position,
        amount: u32,
    },
}

// ---------------------------------------------------------------------------
// Content types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Constants {
    pub map_width: usize,
    pub map_height: usize,
    pub max_turns: u64,
    /// Upper bound on generated cell halite; also the reference for
    /// richness floors in the decision core.
    pub max_cell_halite: u32,
    pub ship_capacity: u32,
    pub ship_cost: u32,
    /// Halite each player starts with in the bank.
    pub initial_halite: u32,
    /// A still ship extracts `ceil(cell / extract_ratio)` per turn.
    pub extract_ratio: u32,
    /// A moving ship pays `floor(cell / move_cost_ratio)` to leave its cell.
    pub move_cost_ratio: u32,
}

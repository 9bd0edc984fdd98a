//! `halite_control` — per-turn fleet decisions for one player.
//!
//! Each turn every owned ship passes through the role state machine, target
//! selection, and movement resolution in roster order; the economy check then
//! decides whether to add a spawn command.

pub mod config;
pub mod economy;
pub mod movement;
pub mod roles;
pub mod targeting;

use std::collections::HashSet;

use halite_core::{
    Command, CommandEnvelope, CommandId, Constants, Direction, GameState, PlayerId, PlayerState,
    ShipId, ShipState,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

pub use config::StrategyConfig;
pub use movement::{MoveContext, Reservations};
pub use roles::{FleetState, Role};

pub trait CommandSource {
    fn generate_commands(
        &mut self,
        state: &GameState,
        constants: &Constants,
        next_command_id: &mut u64,
    ) -> Vec<CommandEnvelope>;
}

/// Drives one player's ships:
/// 1. Update each ship's role (harvest ↔ return).
/// 2. Give harvesters without a live target a fresh one.
/// 3. Resolve a reserved, collision-checked step.
/// 4. Spawn a ship when the economy allows it.
pub struct FleetController {
    player: PlayerId,
    config: StrategyConfig,
    fleet: FleetState,
    rng: ChaCha8Rng,
}

impl FleetController {
    pub fn new(player: PlayerId, config: StrategyConfig) -> Self {
        let rng = ChaCha8Rng::seed_from_u64(config.seed ^ u64::from(player.0).rotate_left(32));
        tracing::info!(player = %player, seed = config.seed, "fleet controller ready");
        Self {
            player,
            config,
            fleet: FleetState::default(),
            rng,
        }
    }

    pub fn player(&self) -> PlayerId {
        self.player
    }

    pub fn fleet(&self) -> &FleetState {
        &self.fleet
    }

    /// Role update plus target refresh for one ship; returns the role to act on.
    fn plan_ship(
        &mut self,
        ship: &ShipState,
        player: &PlayerState,
        state: &GameState,
        constants: &Constants,
    ) -> Role {
        let role = roles::update_role(
            &mut self.fleet,
            ship,
            player.shipyard,
            &state.map,
            self.config.return_policy,
        );
        if role != Role::Harvesting {
            return role;
        }

        let stale = self.fleet.target(ship.id).is_none_or(|target| {
            targeting::target_depleted(
                &state.map,
                target,
                constants.max_cell_halite,
                &self.config.targeting,
            )
        });
        if stale {
            let claimed = self.fleet.claimed_targets(ship.id);
            match targeting::select_target(
                &state.map,
                player.shipyard,
                constants.max_cell_halite,
                &claimed,
                &self.config.targeting,
                &mut self.rng,
            ) {
                Some(target) => {
                    tracing::debug!(ship = %ship.id, %target, "assigned harvest target");
                    self.fleet.set_target(ship.id, target);
                }
                None => self.fleet.clear_target(ship.id),
            }
        }
        role
    }
}

/// Allocates a command ID and builds a `CommandEnvelope`.
fn make_cmd(
    owner: PlayerId,
    turn: u64,
    next_id: &mut u64,
    command: Command,
) -> CommandEnvelope {
    let cmd_id = CommandId(format!("cmd_{:06}", *next_id));
    *next_id += 1;
    CommandEnvelope {
        id: cmd_id,
        issued_by: owner,
        issued_turn: turn,
        command,
    }
}

impl CommandSource for FleetController {
    fn generate_commands(
        &mut self,
        state: &GameState,
        constants: &Constants,
        next_command_id: &mut u64,
    ) -> Vec<CommandEnvelope> {
        let Some(player) = state.players.get(&self.player) else {
            tracing::warn!(player = %self.player, "player missing from game state");
            return Vec::new();
        };
        let turn = state.meta.turn;

        let roster: HashSet<ShipId> = state.ships_of(self.player).map(|ship| ship.id).collect();
        self.fleet.prune(&roster);

        let movement_config = self.config.movement.clone();
        let ctx = MoveContext {
            map: &state.map,
            shipyard: player.shipyard,
            max_cell_halite: constants.max_cell_halite,
            config: &movement_config,
        };
        let mut reservations = Reservations::default();
        let mut commands = Vec::with_capacity(roster.len() + 1);

        for ship in state.ships_of(self.player) {
            debug_assert_eq!(
                ship.owner, self.player,
                "roster ship {} has a foreign owner",
                ship.id
            );
            let role = self.plan_ship(ship, player, state, constants);
            let target = self.fleet.target(ship.id);
            let direction = movement::resolve_move(
                &ctx,
                ship,
                role,
                target,
                &mut reservations,
                &mut self.rng,
            );
            commands.push(make_cmd(
                self.player,
                turn,
                next_command_id,
                Command::Move {
                    ship_id: ship.id,
                    direction,
                },
            ));
        }

        if economy::should_spawn(player, state, constants, &self.config.economy, &reservations) {
            tracing::debug!(player = %self.player, turn, bank = player.halite, "spawning ship");
            commands.push(make_cmd(self.player, turn, next_command_id, Command::Spawn));
        }

        debug_assert_eq!(
            reservations.len(),
            commands
                .iter()
                .filter(|c| matches!(
                    c.command,
                    Command::Move { direction, .. } if direction != Direction::Still
                ))
                .count(),
            "every move must own exactly one reserved cell"
        );
        commands
    }
}

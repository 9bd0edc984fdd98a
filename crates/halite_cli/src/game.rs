use anyhow::Result;
use halite_control::{CommandSource, FleetController, StrategyConfig};
use halite_core::{Constants, EventEnvelope, EventLevel, GameState, PlayerId};
use halite_world::build_initial_state;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::path::Path;

/// Everything loaded from disk before a game starts.
#[derive(Debug, Clone)]
pub struct GameSetup {
    pub constants: Constants,
    pub strategy: StrategyConfig,
    pub players: u32,
}

impl GameSetup {
    pub fn load(content_dir: &str, strategy_path: Option<&str>, players: u32) -> Result<Self> {
        let constants = halite_world::load_constants(content_dir)?;
        let strategy = match strategy_path {
            Some(path) => StrategyConfig::from_json_file(Path::new(path))?,
            None => StrategyConfig::default(),
        };
        Ok(Self {
            constants,
            strategy,
            players,
        })
    }
}

/// One running game: the world plus a controller per player.
pub struct Game {
    pub state: GameState,
    constants: Constants,
    controllers: Vec<FleetController>,
    next_command_id: u64,
}

impl Game {
    /// The seed drives both map generation and every controller's RNG.
    pub fn new(setup: &GameSetup, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let state = build_initial_state(&setup.constants, setup.players, seed, &mut rng);
        let controllers = state
            .players
            .keys()
            .map(|&player| {
                let strategy = StrategyConfig {
                    seed,
                    ..setup.strategy.clone()
                };
                FleetController::new(player, strategy)
            })
            .collect();
        Self {
            state,
            constants: setup.constants.clone(),
            controllers,
            next_command_id: 0,
        }
    }

    pub fn turn(&self) -> u64 {
        self.state.meta.turn
    }

    pub fn is_over(&self) -> bool {
        self.state.meta.turn >= self.state.meta.max_turns
    }

    /// Collect every player's commands against the same snapshot, then advance one turn.
    pub fn step(&mut self, event_level: EventLevel) -> Vec<EventEnvelope> {
        let mut commands = Vec::new();
        for controller in &mut self.controllers {
            commands.extend(controller.generate_commands(
                &self.state,
                &self.constants,
                &mut self.next_command_id,
            ));
        }
        halite_core::tick(&mut self.state, &commands, &self.constants, event_level)
    }

    /// Player with the most banked halite; ties go to the lower id.
    pub fn leader(&self) -> Option<PlayerId> {
        self.state
            .players
            .values()
            .max_by(|a, b| a.halite.cmp(&b.halite).then_with(|| b.id.cmp(&a.id)))
            .map(|p| p.id)
    }
}

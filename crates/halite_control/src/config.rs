//! Tuning knobs for the decision core, loadable from `strategy.json`.
//!
//! Every field has a default so a partial file only overrides what it names.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyConfig {
    /// Seed for the controller's RNG (fallback directions, target picks).
    pub seed: u64,
    pub return_policy: ReturnPolicy,
    pub targeting: TargetingConfig,
    pub movement: MovementConfig,
    pub economy: EconomyConfig,
}

/// When a harvesting ship heads home.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ReturnPolicy {
    /// Return once cargo exceeds `fraction × capacity`.
    FixedFraction { fraction: f64 },
    /// Return once cargo exceeds
    /// `base_fraction × capacity + (distance / width) × distance_weight × capacity`.
    DistanceScaled {
        base_fraction: f64,
        distance_weight: f64,
    },
}

impl Default for ReturnPolicy {
    fn default() -> Self {
        ReturnPolicy::DistanceScaled {
            base_fraction: 0.5,
            distance_weight: 0.4,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetingConfig {
    /// Search radius (Manhattan, around the shipyard) of the first sample.
    pub min_radius: u32,
    pub radius_step: u32,
    /// Zero-based rank in the sorted candidate list that must clear the floor.
    pub floor_rank: usize,
    /// Fraction of `max_cell_halite` a good target must hold.
    pub richness_floor_fraction: f64,
    /// Fraction of `max_cell_halite` below which a target is abandoned.
    pub depletion_floor_fraction: f64,
    /// Random pick among this many of the richest candidates.
    pub top_n: usize,
    /// Skip cells another ship already targets when alternatives exist.
    pub avoid_claimed_targets: bool,
}

impl Default for TargetingConfig {
    fn default() -> Self {
        Self {
            min_radius: 4,
            radius_step: 2,
            floor_rank: 3,
            richness_floor_fraction: 0.3,
            depletion_floor_fraction: 0.1,
            top_n: 4,
            avoid_claimed_targets: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    /// A harvesting ship leaves cells poorer than this fraction of `max_cell_halite`.
    pub cheap_cell_fraction: f64,
    /// Cargo needed to leave a cell, as a fraction of that cell's halite.
    pub min_carry_fraction: f64,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            cheap_cell_fraction: 0.1,
            min_carry_fraction: 0.1,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyConfig {
    pub production_window: ProductionWindow,
    /// Banked halite withheld from spawning, growing with elapsed turns.
    pub reserve: Option<ReserveSchedule>,
}

/// Last turn (inclusive) on which ships may be produced.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ProductionWindow {
    UntilTurn { turn: u64 },
    FractionOfMaxTurns { fraction: f64 },
}

impl Default for ProductionWindow {
    fn default() -> Self {
        ProductionWindow::FractionOfMaxTurns { fraction: 0.5 }
    }
}

/// Step function: `amount_per_step × floor(turn / turns_per_step)`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ReserveSchedule {
    pub amount_per_step: u32,
    pub turns_per_step: u64,
}

impl StrategyConfig {
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("reading strategy file: {}", path.display()))?;
        let config: StrategyConfig = serde_json::from_str(&json)
            .with_context(|| format!("parsing strategy file: {}", path.display()))?;
        config.validate();
        Ok(config)
    }

    /// Panics on values that would make a policy meaningless.
    pub fn validate(&self) {
        let fraction_ok = |f: f64| (0.0..=1.0).contains(&f);
        match self.return_policy {
            ReturnPolicy::FixedFraction { fraction } => assert!(
                fraction_ok(fraction),
                "return_policy fraction {fraction} must be within [0, 1]"
            ),
            ReturnPolicy::DistanceScaled {
                base_fraction,
                distance_weight,
            } => assert!(
                fraction_ok(base_fraction) && distance_weight >= 0.0,
                "return_policy base_fraction {base_fraction} must be within [0, 1] \
                 and distance_weight {distance_weight} non-negative"
            ),
        }

        let t = &self.targeting;
        assert!(t.top_n > 0, "targeting.top_n must be > 0");
        assert!(t.radius_step > 0, "targeting.radius_step must be > 0");
        assert!(
            fraction_ok(t.richness_floor_fraction) && fraction_ok(t.depletion_floor_fraction),
            "targeting floors must be fractions within [0, 1]"
        );

        let m = &self.movement;
        assert!(
            fraction_ok(m.cheap_cell_fraction) && fraction_ok(m.min_carry_fraction),
            "movement fractions must be within [0, 1]"
        );

        if let ProductionWindow::FractionOfMaxTurns { fraction } = self.economy.production_window {
            assert!(
                fraction_ok(fraction),
                "economy.production_window fraction {fraction} must be within [0, 1]"
            );
        }
        if let Some(reserve) = self.economy.reserve {
            assert!(
                reserve.turns_per_step > 0,
                "economy.reserve.turns_per_step must be > 0"
            );
        }
    }
}

//! Many seeded games in parallel, summarised per metric.

use anyhow::{bail, Context, Result};
use halite_core::{compute_metrics, EventLevel, MetricsSnapshot};
use rayon::prelude::*;
use serde::Serialize;
use std::path::Path;
use std::str::FromStr;

use crate::game::{Game, GameSetup};

/// Inclusive seed range written as `a..=b`, `a..b`, or a single seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedRange {
    pub first: u64,
    pub last: u64,
}

impl SeedRange {
    pub fn expand(self) -> Vec<u64> {
        (self.first..=self.last).collect()
    }
}

impl FromStr for SeedRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse = |v: &str| {
            v.trim()
                .parse::<u64>()
                .map_err(|e| format!("invalid seed '{v}': {e}"))
        };
        let (first, last) = if let Some((a, b)) = s.split_once("..=") {
            (parse(a)?, parse(b)?)
        } else if let Some((a, b)) = s.split_once("..") {
            let end = parse(b)?;
            if end == 0 {
                return Err(format!("empty seed range '{s}'"));
            }
            (parse(a)?, end - 1)
        } else {
            let seed = parse(s)?;
            (seed, seed)
        };
        if first > last {
            return Err(format!("empty seed range '{s}'"));
        }
        Ok(Self { first, last })
    }
}

#[derive(Debug, Serialize)]
pub struct SeedResult {
    pub seed: u64,
    pub winner: Option<u32>,
    pub final_snapshot: MetricsSnapshot,
}

#[derive(Debug, Serialize)]
pub struct MetricSummary {
    pub name: String,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub stddev: f64,
}

#[derive(Debug, Serialize)]
pub struct BenchSummary {
    pub seed_count: usize,
    pub players: u32,
    pub turns: u64,
    /// Indexed by player id.
    pub wins: Vec<usize>,
    pub metrics: Vec<MetricSummary>,
    pub seeds: Vec<SeedResult>,
}

pub fn run_seed(setup: &GameSetup, seed: u64) -> SeedResult {
    let mut game = Game::new(setup, seed);
    while !game.is_over() {
        game.step(EventLevel::Normal);
    }
    tracing::debug!(seed, turn = game.turn(), "seed finished");
    SeedResult {
        seed,
        winner: game.leader().map(|p| p.0),
        final_snapshot: compute_metrics(&game.state),
    }
}

type Extractor = (&'static str, fn(&MetricsSnapshot) -> f64);

fn total_ships(s: &MetricsSnapshot) -> f64 {
    s.players.iter().map(|p| f64::from(p.ships)).sum()
}

fn total_banked(s: &MetricsSnapshot) -> f64 {
    s.players.iter().map(|p| f64::from(p.halite_banked)).sum()
}

fn best_banked(s: &MetricsSnapshot) -> f64 {
    s.players
        .iter()
        .map(|p| f64::from(p.halite_banked))
        .fold(0.0, f64::max)
}

fn map_halite(s: &MetricsSnapshot) -> f64 {
    s.map_halite as f64
}

const EXTRACTORS: [Extractor; 4] = [
    ("ships_total", total_ships),
    ("halite_banked_total", total_banked),
    ("halite_banked_best", best_banked),
    ("map_halite_remaining", map_halite),
];

fn compute_metric_summary(name: &str, values: &[f64]) -> MetricSummary {
    let count = values.len() as f64;
    let mean = values.iter().sum::<f64>() / count;
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / count;

    MetricSummary {
        name: name.to_string(),
        mean,
        min,
        max,
        stddev: variance.sqrt(),
    }
}

pub fn summarize(setup: &GameSetup, results: Vec<SeedResult>) -> BenchSummary {
    let mut wins = vec![0; setup.players as usize];
    for winner in results.iter().filter_map(|r| r.winner) {
        if let Some(count) = wins.get_mut(winner as usize) {
            *count += 1;
        }
    }
    let metrics = EXTRACTORS
        .iter()
        .map(|(name, extract)| {
            let values: Vec<f64> = results.iter().map(|r| extract(&r.final_snapshot)).collect();
            compute_metric_summary(name, &values)
        })
        .collect();

    BenchSummary {
        seed_count: results.len(),
        players: setup.players,
        turns: setup.constants.max_turns,
        wins,
        metrics,
        seeds: results,
    }
}

pub fn print_summary(summary: &BenchSummary) {
    println!(
        "{} seeds × {} turns, {} players",
        summary.seed_count, summary.turns, summary.players
    );
    for (player, wins) in summary.wins.iter().enumerate() {
        println!("  p{player} wins: {wins}");
    }
    for m in &summary.metrics {
        println!(
            "  {:<24} mean={:>10.1} min={:>10.1} max={:>10.1} sd={:>8.1}",
            m.name, m.mean, m.min, m.max, m.stddev
        );
    }
}

pub fn run(setup: &GameSetup, seeds: SeedRange, output: &Path) -> Result<BenchSummary> {
    let seeds = seeds.expand();
    if seeds.is_empty() {
        bail!("no seeds to run");
    }
    tracing::info!(seeds = seeds.len(), players = setup.players, "running bench");

    let results: Vec<SeedResult> = seeds.par_iter().map(|&seed| run_seed(setup, seed)).collect();
    let summary = summarize(setup, results);

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating output directory: {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(&summary).context("serializing bench summary")?;
    std::fs::write(output, json).with_context(|| format!("writing {}", output.display()))?;
    Ok(summary)
}

//! `halite_core` — toroidal world model and deterministic turn engine.
//!
//! No IO, no network. The engine is fully deterministic for a given state
//! and command list.

mod engine;
mod grid;
pub mod metrics;
#[cfg(any(test, feature = "test-support"))]
pub mod test_fixtures;
mod types;

pub use engine::{rebuild_occupancy, tick};
pub use metrics::{compute_metrics, MetricsSnapshot, PlayerMetrics};
pub use types::*;

pub(crate) fn emit(counters: &mut Counters, turn: u64, event: Event) -> EventEnvelope {
    let id = EventId(format!("evt_{:06}", counters.next_event_id));
    counters.next_event_id += 1;
    EventEnvelope { id, turn, event }
}

#[cfg(test)]
mod tests;

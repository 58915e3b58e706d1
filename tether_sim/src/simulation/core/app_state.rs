// tether_sim/src/simulation/core/app_state.rs

use bevy::ecs::schedule::SystemSet;

// =========================================================================
// == Main Simulation Sets (The "Data Flow Graph") ==
// =========================================================================

/// One frame of the loopback run, chained in this order in `Update`.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum SyncSet {
    /// Advances the simulation clock by one fixed step. Runs first.
    Clock,
    /// Both peers move their own copies: the authority flies its script,
    /// the receiver propagates its remote copy on rails.
    Motion,
    /// The authority captures a snapshot when its broadcast timer fires.
    Capture,
    /// The link accepts new snapshots and delivers those whose latency elapsed.
    Network,
    /// The receiver applies delivered snapshots to its remote copy.
    Reconcile,
    /// Drift reporting and shutdown. Runs last, even after the clock ran out.
    Report,
}

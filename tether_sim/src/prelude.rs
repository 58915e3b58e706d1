// tether_sim/src/prelude.rs

// Re-export the entire Bevy prelude for convenience.
pub use bevy::prelude::*;

// Re-export the entire tether_core prelude so you can easily access
// pure types like `Snapshot`, `StateReconciler`, `SimContext`, etc.
pub use tether_core::prelude::*;

// Re-export common simulation-specific types for easy access in other plugins.
pub use crate::simulation::config::structs::*;
pub use crate::simulation::core::app_state::SyncSet;
pub use crate::simulation::core::clock::SimulationClock;
pub use crate::simulation::core::components::{Authority, Remote, Vessel};
pub use crate::simulation::plugins::reconcile::{ReconcileStats, Reconciler};

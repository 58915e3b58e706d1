// tether_sim/src/simulation/core/components.rs

use bevy::prelude::*;
use tether_core::prelude::{SimulatedVessel, SnapshotTrack};

use crate::simulation::plugins::vessels::authority::FlightScript;

/// A peer's copy of a vessel. Both the authoritative original and the
/// receiver's remote copy carry one.
#[derive(Component, Debug, Clone)]
pub struct Vessel(pub SimulatedVessel);

/// Marks the copy flown by the local operator of the sending peer.
/// The reconciler never touches it.
#[derive(Component, Debug, Clone)]
pub struct Authority {
    pub script: FlightScript,
}

/// Marks the receiver's copy, driven only by delivered snapshots.
#[derive(Component, Debug, Default)]
pub struct Remote {
    /// The last snapshot applied, the "previous" of the next apply.
    pub track: SnapshotTrack,
}

/// Fires each time the authority should broadcast a snapshot.
#[derive(Component, Debug)]
pub struct BroadcastTimer(pub Timer);

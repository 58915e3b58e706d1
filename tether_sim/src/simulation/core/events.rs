// tether_sim/src/simulation/core/events.rs
use bevy::prelude::Event;
use tether_core::prelude::Snapshot;

/// A snapshot the authoritative peer just captured and hands to the link.
#[derive(Event, Clone, Debug)]
pub struct SnapshotCaptured(pub Snapshot);

/// A snapshot the link has delivered (and decoded) at the receiving peer.
#[derive(Event, Clone, Debug)]
pub struct SnapshotDelivered(pub Snapshot);

// tether_sim/src/simulation/plugins/reconcile/mod.rs

//! The receiving peer: applies delivered snapshots to its remote copies.

use serde::Serialize;

use crate::prelude::*;
use crate::simulation::core::clock::SimulationClock;
use crate::simulation::core::components::{Remote, Vessel};
use crate::simulation::core::events::SnapshotDelivered;
use crate::simulation::core::simulation_setup::scenario;
use crate::simulation::plugins::world::{Bodies, PeerTerrain};

/// The receiver's reconciler, recording drift into an in-memory `DriftStatistics`.
#[derive(Resource)]
pub struct Reconciler(pub StateReconciler);

impl Reconciler {
    /// The drift statistics, if the sink is the in-memory one.
    pub fn statistics(&self) -> Option<&DriftStatistics> {
        self.0.sink().as_any().downcast_ref::<DriftStatistics>()
    }
}

/// What happened to the snapshots that reached the receiver.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileStats {
    pub applied: u64,
    /// Older than the last applied snapshot, dropped unapplied.
    pub stale: u64,
    /// Refused by the reconciler (unknown body, malformed, ...).
    pub rejected: u64,
    /// Addressed to a vessel this peer has no remote copy of.
    pub unknown_vessel: u64,
}

pub struct ReconcilePlugin;

impl Plugin for ReconcilePlugin {
    fn build(&self, app: &mut App) {
        let config = scenario(app);

        app.insert_resource(Reconciler(StateReconciler::new(
            config.reconciler,
            Box::new(DriftStatistics::new()),
        )))
        .init_resource::<ReconcileStats>()
        .add_systems(
            Update,
            apply_delivered_snapshots.in_set(SyncSet::Reconcile),
        );
    }
}

fn apply_delivered_snapshots(
    clock: Res<SimulationClock>,
    bodies: Res<Bodies>,
    terrain: Res<PeerTerrain>,
    mut reconciler: ResMut<Reconciler>,
    mut stats: ResMut<ReconcileStats>,
    mut delivered: EventReader<SnapshotDelivered>,
    mut remotes: Query<(&mut Vessel, &mut Remote)>,
) {
    let context = SimContext::new(
        clock.universal_time(),
        &bodies.0,
        terrain.receiver.as_ref(),
    );

    for SnapshotDelivered(snapshot) in delivered.read() {
        let Some((mut vessel, mut remote)) = remotes
            .iter_mut()
            .find(|(vessel, _)| vessel.0.id() == snapshot.vessel_id)
        else {
            debug!(vessel_id = %snapshot.vessel_id, "no remote copy for snapshot");
            stats.unknown_vessel += 1;
            continue;
        };

        // Out-of-order delivery: never let an older snapshot overwrite a newer one.
        if remote.track.is_stale(snapshot) {
            debug!(
                vessel_id = %snapshot.vessel_id,
                t = snapshot.capture_time,
                "dropping stale snapshot"
            );
            stats.stale += 1;
            continue;
        }

        let result = reconciler
            .0
            .apply(snapshot, remote.track.previous(), &mut vessel.0, &context);
        match result {
            Ok(_) => {
                remote.track.commit(snapshot.clone());
                stats.applied += 1;
            }
            // The reconciler already logged why.
            Err(_) => stats.rejected += 1,
        }
    }
}

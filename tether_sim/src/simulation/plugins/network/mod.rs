// tether_sim/src/simulation/plugins/network/mod.rs

//! The loopback transport between the two peers. Snapshots cross it as JSON.

pub mod link;

use crate::prelude::*;
use crate::simulation::core::clock::SimulationClock;
use crate::simulation::core::events::{SnapshotCaptured, SnapshotDelivered};
use crate::simulation::core::prng::SimulationRng;
use crate::simulation::core::simulation_setup::scenario;
use link::LoopbackLink;

/// The link resource, shared by both peers' systems.
#[derive(Resource, Debug)]
pub struct Link(pub LoopbackLink);

pub struct NetworkPlugin;

impl Plugin for NetworkPlugin {
    fn build(&self, app: &mut App) {
        let config = scenario(app);

        let link = match LoopbackLink::from_config(&config.network) {
            Ok(link) => link,
            Err(e) => {
                error!("Invalid link latency model: {}. No snapshots will be sent.", e);
                return;
            }
        };
        info!(
            "[NETWORK] Loopback link: latency {} ± {} s, drop probability {}",
            config.network.latency_mean,
            config.network.latency_stddev,
            config.network.drop_probability
        );

        app.insert_resource(Link(link)).add_systems(
            Update,
            (transmit_snapshots, deliver_snapshots)
                .chain()
                .in_set(SyncSet::Network),
        );
    }
}

/// Encodes every freshly captured snapshot and puts it on the wire.
fn transmit_snapshots(
    clock: Res<SimulationClock>,
    mut rng: ResMut<SimulationRng>,
    mut link: ResMut<Link>,
    mut captured: EventReader<SnapshotCaptured>,
) {
    let now = clock.universal_time();
    for SnapshotCaptured(snapshot) in captured.read() {
        let payload = match serde_json::to_vec(snapshot) {
            Ok(payload) => payload,
            Err(error) => {
                warn!(vessel_id = %snapshot.vessel_id, %error, "failed to encode snapshot");
                continue;
            }
        };
        if link.0.send(payload, now, &mut rng.0).is_none() {
            debug!(vessel_id = %snapshot.vessel_id, t = snapshot.capture_time, "snapshot lost in transit");
        }
    }
}

/// Decodes the payloads that arrived by now and hands them to the receiver.
fn deliver_snapshots(
    clock: Res<SimulationClock>,
    mut link: ResMut<Link>,
    mut delivered: EventWriter<SnapshotDelivered>,
) {
    for payload in link.0.receive(clock.universal_time()) {
        match serde_json::from_slice::<Snapshot>(&payload) {
            Ok(snapshot) => {
                delivered.write(SnapshotDelivered(snapshot));
            }
            Err(error) => {
                warn!(%error, bytes = payload.len(), "dropping undecodable payload");
                link.0.record_undecodable();
            }
        }
    }
}

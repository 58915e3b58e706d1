// tether_sim/src/simulation/plugins/vessels/remote.rs

//! The receiver's side of a vessel: between snapshots the remote copy coasts
//! on rails and flies whatever controls the reconciler hands it.

use bevy::prelude::*;
use tether_core::prelude::*;

use crate::simulation::core::clock::SimulationClock;
use crate::simulation::core::components::{Remote, Vessel};
use crate::simulation::plugins::reconcile::Reconciler;
use crate::simulation::plugins::world::Bodies;

/// Advances every remote copy along its current orbit.
pub fn propagate_remote_vessels(
    clock: Res<SimulationClock>,
    bodies: Res<Bodies>,
    mut query: Query<&mut Vessel, With<Remote>>,
) {
    let now = clock.universal_time();
    for mut vessel in &mut query {
        let Some(body) = bodies.0.find(vessel.0.body_name()) else {
            warn!(vessel_id = %vessel.0.id(), body = vessel.0.body_name(), "remote vessel orbits an unknown body");
            continue;
        };
        if let Err(error) = vessel.0.update_from_orbit(body, now) {
            warn!(vessel_id = %vessel.0.id(), %error, "failed to propagate remote vessel");
        }
    }
}

/// The receiver's fly-by-wire hook: remote pilot input wins while an
/// override is active, otherwise the copy gets neutral controls.
pub fn sample_remote_controls(
    clock: Res<SimulationClock>,
    mut reconciler: ResMut<Reconciler>,
    mut query: Query<&mut Vessel, With<Remote>>,
) {
    let now = clock.universal_time();
    for mut vessel in &mut query {
        let id = vessel.0.id();
        let controls = reconciler
            .0
            .update_controls(id, FlightControlState::default(), now);
        vessel.0.set_controls(controls);
    }
}

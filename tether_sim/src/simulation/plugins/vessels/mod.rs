// tether_sim/src/simulation/plugins/vessels/mod.rs

pub mod authority;
pub mod remote;

use std::time::Duration;

use nalgebra::Vector3;

use crate::prelude::*;
use crate::simulation::core::clock::SimulationClock;
use crate::simulation::core::components::{Authority, BroadcastTimer, Remote, Vessel};
use crate::simulation::core::events::SnapshotCaptured;
use crate::simulation::core::simulation_setup::scenario;
use crate::simulation::plugins::world::{Bodies, PeerTerrain};
use authority::FlightScript;

/// The sending peer's snapshot builder.
#[derive(Resource, Debug, Clone, Copy)]
pub struct SnapshotCapturer(pub SnapshotCapture);

pub struct VesselsPlugin;

impl Plugin for VesselsPlugin {
    fn build(&self, app: &mut App) {
        let config = scenario(app);

        app.insert_resource(SnapshotCapturer(SnapshotCapture::from_config(
            &config.reconciler,
        )))
        .add_systems(Startup, spawn_vessels)
        .add_systems(
            Update,
            (
                (
                    fly_authoritative_vessels,
                    remote::propagate_remote_vessels,
                    remote::sample_remote_controls,
                )
                    .in_set(SyncSet::Motion),
                broadcast_snapshots.in_set(SyncSet::Capture),
            ),
        );
    }
}

/// Spawns the authoritative vessel and the receiver's copy of it, both
/// starting from the same state.
fn spawn_vessels(
    mut commands: Commands,
    config: Res<ScenarioConfig>,
    bodies: Res<Bodies>,
    clock: Res<SimulationClock>,
) {
    let vessel_config = &config.vessel;
    let Some(body) = bodies.0.find(&config.body.name) else {
        error!("[SPAWN] Body '{}' is not in the body table.", config.body.name);
        return;
    };

    let script = FlightScript::from_config(vessel_config, clock.start_time());
    let orbit = match script.initial_orbit(body) {
        Ok(orbit) => orbit,
        Err(e) => {
            error!("[SPAWN] Cannot place vessel '{}': {}", vessel_config.name, e);
            return;
        }
    };

    let parts = vessel_config
        .parts
        .iter()
        .map(|part| PartState::new(Vector3::from(part.offset), part.mass))
        .collect();
    let mut vessel = SimulatedVessel::new(VesselId(vessel_config.id), body.name.clone(), orbit)
        .with_parts(parts)
        .with_packed(false);
    vessel.set_action_groups(vessel_config.action_groups);
    let attitude = vessel.surface_relative_orientation();
    vessel.set_autopilot(vessel_config.autopilot.map(|mode| AutopilotLock {
        mode,
        locked_orientation: attitude,
    }));
    if let Err(e) = script.advance(&mut vessel, body, clock.universal_time()) {
        error!("[SPAWN] Cannot place vessel '{}': {}", vessel_config.name, e);
        return;
    }

    info!(
        "[SPAWN] Vessel '{}' ({}) at {:.4}°, {:.4}°, {:.1} m",
        vessel_config.name,
        vessel.id(),
        vessel.geodetic().latitude,
        vessel.geodetic().longitude,
        vessel.geodetic().altitude
    );

    let interval = Duration::from_secs_f64(config.network.broadcast_interval);
    commands.spawn((
        Name::new(format!("{} (authority)", vessel_config.name)),
        Vessel(vessel.clone()),
        Authority { script },
        BroadcastTimer(Timer::new(interval, TimerMode::Repeating)),
    ));
    commands.spawn((
        Name::new(format!("{} (remote)", vessel_config.name)),
        Vessel(vessel),
        Remote::default(),
    ));
}

fn fly_authoritative_vessels(
    clock: Res<SimulationClock>,
    bodies: Res<Bodies>,
    mut query: Query<(&mut Vessel, &Authority)>,
) {
    let now = clock.universal_time();
    for (mut vessel, authority) in &mut query {
        let Some(body) = bodies.0.find(vessel.0.body_name()) else {
            warn!(vessel_id = %vessel.0.id(), "authoritative vessel orbits an unknown body");
            continue;
        };
        if let Err(error) = authority.script.advance(&mut vessel.0, body, now) {
            warn!(vessel_id = %vessel.0.id(), %error, "flight script failed this step");
        }
    }
}

/// Captures the authoritative vessels whose broadcast timer fired.
fn broadcast_snapshots(
    clock: Res<SimulationClock>,
    bodies: Res<Bodies>,
    terrain: Res<PeerTerrain>,
    capturer: Res<SnapshotCapturer>,
    mut query: Query<(&Vessel, &mut BroadcastTimer), With<Authority>>,
    mut captured: EventWriter<SnapshotCaptured>,
) {
    let context = SimContext::new(
        clock.universal_time(),
        &bodies.0,
        terrain.sender.as_ref(),
    );
    let step = Duration::from_secs_f64(clock.step());
    for (vessel, mut timer) in &mut query {
        timer.0.tick(step);
        if !timer.0.just_finished() {
            continue;
        }
        // A failed capture is logged by the capturer; this cycle is skipped.
        if let Ok(snapshot) = capturer.0.capture(&vessel.0, &context) {
            captured.write(SnapshotCaptured(snapshot));
        }
    }
}

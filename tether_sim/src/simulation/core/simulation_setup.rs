// tether_sim/src/simulation/core/simulation_setup.rs

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::prelude::*;
use crate::simulation::core::clock::SimulationClock;
use crate::simulation::core::events::{SnapshotCaptured, SnapshotDelivered};
use crate::simulation::core::prng::SimulationRng;

pub struct SimulationSetupPlugin;

impl Plugin for SimulationSetupPlugin {
    fn build(&self, app: &mut App) {
        // This plugin's job is to read the config and add resources and the frame schedule.
        let config = scenario(app);

        // --- 1. Add the Deterministic PRNG Resource ---
        let rng = match config.simulation.seed {
            Some(seed) => {
                info!("Seeding the simulation RNG with {}", seed);
                ChaCha8Rng::seed_from_u64(seed)
            }
            None => {
                info!("No seed configured, seeding the simulation RNG from OS entropy");
                ChaCha8Rng::from_entropy()
            }
        };
        app.insert_resource(SimulationRng(rng));

        // --- 2. The shared clock and the snapshot events ---
        app.insert_resource(SimulationClock::new(
            config.simulation.start_time,
            config.simulation.duration_seconds,
            config.simulation.tick_hz,
        ))
        .add_event::<SnapshotCaptured>()
        .add_event::<SnapshotDelivered>();

        // --- 3. Configure the frame graph ---
        // .chain() enforces the order; everything but reporting stops with the clock.
        app.configure_sets(
            Update,
            (
                SyncSet::Clock,
                SyncSet::Motion.run_if(simulation_running),
                SyncSet::Capture.run_if(simulation_running),
                SyncSet::Network.run_if(simulation_running),
                SyncSet::Reconcile.run_if(simulation_running),
                SyncSet::Report,
            )
                .chain(),
        );

        app.add_systems(
            Update,
            (
                advance_clock.in_set(SyncSet::Clock),
                exit_when_finished.in_set(SyncSet::Report),
            ),
        );
    }
}

/// Returns the scenario the app was built with, falling back to the defaults.
pub(crate) fn scenario(app: &mut App) -> ScenarioConfig {
    if !app.world().contains_resource::<ScenarioConfig>() {
        warn!("No ScenarioConfig resource inserted before the plugins, using defaults");
    }
    app.world_mut()
        .get_resource_or_insert_with(ScenarioConfig::default)
        .clone()
}

/// Run condition: true until the configured duration has elapsed.
pub fn simulation_running(clock: Res<SimulationClock>) -> bool {
    !clock.is_finished()
}

fn advance_clock(mut clock: ResMut<SimulationClock>) {
    clock.advance();
}

fn exit_when_finished(
    clock: Res<SimulationClock>,
    mut exit: EventWriter<AppExit>,
    mut requested: Local<bool>,
) {
    if clock.is_finished() && !*requested {
        info!(
            "Simulation finished at t = {:.2} s after {} steps.",
            clock.universal_time(),
            clock.ticks()
        );
        exit.write(AppExit::Success);
        *requested = true;
    }
}

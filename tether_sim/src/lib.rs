// tether_sim/src/lib.rs

use bevy::prelude::*;

// Import the plugins defined within the simulation crate.
use crate::simulation::core::simulation_setup::SimulationSetupPlugin;
use crate::simulation::plugins::debugging::drift_report::DriftReportPlugin;
use crate::simulation::plugins::network::NetworkPlugin;
use crate::simulation::plugins::reconcile::ReconcilePlugin;
use crate::simulation::plugins::vessels::VesselsPlugin;
use crate::simulation::plugins::world::WorldPlugin;

// This prelude is for convenience for other files WITHIN the tether_sim crate.
pub mod prelude;

// This module contains all the simulation-specific logic.
pub mod cli;
pub mod simulation;

/// The main plugin that brings together both peers and the link between them.
/// Insert a `ScenarioConfig` resource before adding it.
pub struct TetherSimulationPlugin;

impl Plugin for TetherSimulationPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((
            // Clock, RNG and the frame schedule.
            SimulationSetupPlugin,
            // Reference bodies and each peer's terrain.
            WorldPlugin,
            // The authoritative vessel and the receiver's copy.
            VesselsPlugin,
            NetworkPlugin,
            ReconcilePlugin,
            DriftReportPlugin,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::{
        ReconcileStats, Reconciler, Remote, ScenarioConfig, SimulationClock, Vessel, VesselView,
    };
    use crate::simulation::plugins::network::Link;
    use figment::{
        providers::{Format, Toml},
        Figment,
    };

    const SCENARIO: &str = r#"
        [simulation]
        seed = 1234
        duration_seconds = 6.0
        tick_hz = 50.0
        report_interval = 2.0

        [network]
        broadcast_interval = 0.2
        latency_mean = 0.1
        latency_stddev = 0.02
        drop_probability = 0.0

        [vessel]
        id = 42
        name = "Test Rocket"
        spin_rate = 0.2
        autopilot = "stability_assist"
        parts = [
            { offset = [0.0, 0.0, 0.0], mass = 2000.0 },
            { offset = [0.0, 0.0, 4.0], mass = 500.0 },
        ]

        [vessel.flight]
        kind = "climb"
        latitude = 0.0
        longitude = 0.0
        altitude = 90.0
        heading_deg = 45.0
        ground_speed = 30.0
        climb_rate = 5.0
        climb_acceleration = 1.0
    "#;

    fn loopback_app() -> App {
        let config: ScenarioConfig = Figment::new()
            .merge(Toml::string(SCENARIO))
            .extract()
            .unwrap();
        config.validate().unwrap();

        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .insert_resource(config)
            .add_plugins(TetherSimulationPlugin);
        app
    }

    #[test]
    fn the_receiver_reconciles_what_the_sender_broadcasts() {
        let mut app = loopback_app();
        for _ in 0..200 {
            app.update();
        }

        let traffic = app.world().resource::<Link>().0.stats();
        assert!(traffic.sent >= 15, "sent {}", traffic.sent);
        assert_eq!(traffic.dropped, 0);

        let stats = *app.world().resource::<ReconcileStats>();
        assert!(stats.applied > 0);
        assert_eq!(stats.rejected, 0);
        assert_eq!(stats.unknown_vessel, 0);

        let reconciler = app.world().resource::<Reconciler>();
        let statistics = reconciler.statistics().unwrap();
        assert_eq!(statistics.total_samples(), stats.applied);
        assert!(statistics.recent().all(|s| s.distance_error.is_finite()));

        // The remote copy flies the sender's controls while the override is live.
        let mut remotes = app.world_mut().query_filtered::<&Vessel, With<Remote>>();
        let remote = remotes.single(app.world()).unwrap();
        assert!(remote.0.controls().main_throttle > 0.5);
        assert!(remote.0.autopilot().is_some());
    }

    #[test]
    fn the_run_stops_after_its_duration() {
        let mut app = loopback_app();
        for _ in 0..300 {
            app.update();
        }
        assert!(app.world().resource::<SimulationClock>().is_finished());
        assert!(!app.world().resource::<Events<AppExit>>().is_empty());

        // Further frames neither advance time nor capture anything new.
        let sent = app.world().resource::<Link>().0.stats().sent;
        for _ in 0..20 {
            app.update();
        }
        let clock = app.world().resource::<SimulationClock>();
        assert_eq!(clock.ticks(), 300);
        assert_eq!(app.world().resource::<Link>().0.stats().sent, sent);
    }
}

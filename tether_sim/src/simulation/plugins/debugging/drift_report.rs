// tether_sim/src/simulation/plugins/debugging/drift_report.rs

use std::time::Duration;

use crate::prelude::*;
use crate::simulation::core::clock::SimulationClock;
use crate::simulation::core::simulation_setup::scenario;
use crate::simulation::plugins::network::Link;
use crate::simulation::plugins::reconcile::{ReconcileStats, Reconciler};

/// Fires every `report_interval` simulation seconds.
#[derive(Resource, Debug)]
pub struct ReportTimer(pub Timer);

/// Logs how far the remote copies drifted from what the snapshots said,
/// periodically and once more when the run ends.
pub struct DriftReportPlugin;

impl Plugin for DriftReportPlugin {
    fn build(&self, app: &mut App) {
        let config = scenario(app);

        app.insert_resource(ReportTimer(Timer::new(
            Duration::from_secs_f64(config.simulation.report_interval),
            TimerMode::Repeating,
        )))
        .add_systems(
            Update,
            (report_drift_periodically, report_final_summary)
                .chain()
                .in_set(SyncSet::Report),
        );
    }
}

fn report_drift_periodically(
    clock: Res<SimulationClock>,
    mut timer: ResMut<ReportTimer>,
    reconciler: Res<Reconciler>,
) {
    if clock.is_finished() {
        return;
    }
    timer.0.tick(Duration::from_secs_f64(clock.step()));
    if !timer.0.just_finished() {
        return;
    }
    let Some(statistics) = reconciler.statistics() else {
        return;
    };
    for (vessel_id, summary) in statistics.summaries() {
        info!(
            "[DRIFT] t = {:>8.2} s {}: {} samples, distance mean {:.3} m / max {:.3} m, velocity mean {:.3} m/s, rotation mean {:.3}°",
            clock.universal_time(),
            vessel_id,
            summary.samples,
            summary.mean_distance,
            summary.max_distance,
            summary.mean_velocity,
            summary.mean_rotation
        );
    }
}

fn report_final_summary(
    clock: Res<SimulationClock>,
    reconciler: Res<Reconciler>,
    stats: Res<ReconcileStats>,
    link: Option<Res<Link>>,
    mut reported: Local<bool>,
) {
    if !clock.is_finished() || *reported {
        return;
    }
    *reported = true;

    info!("===== == Loopback run summary == =====");
    if let Some(link) = link {
        let traffic = link.0.stats();
        info!(
            "[NETWORK] sent {}, lost {}, delivered {}, undecodable {}, still in flight {}",
            traffic.sent,
            traffic.dropped,
            traffic.delivered,
            traffic.undecodable,
            link.0.in_flight()
        );
    }
    info!(
        "[RECONCILE] applied {}, stale {}, rejected {}, unknown vessel {}",
        stats.applied, stats.stale, stats.rejected, stats.unknown_vessel
    );

    let Some(statistics) = reconciler.statistics() else {
        warn!("The reconciler's drift sink does not keep statistics.");
        return;
    };
    for (vessel_id, summary) in statistics.summaries() {
        info!(
            "[DRIFT] {}: distance mean {:.3} m / max {:.3} m, velocity mean {:.3} / max {:.3} m/s, rotation mean {:.3}° / max {:.3}°",
            vessel_id,
            summary.mean_distance,
            summary.max_distance,
            summary.mean_velocity,
            summary.max_velocity,
            summary.mean_rotation,
            summary.max_rotation
        );
    }
}

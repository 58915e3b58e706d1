// tether_core/src/reconcile/mod.rs

//! Applies received snapshots to the local copies of remote vessels.
//!
//! `StateReconciler::apply` works in two phases. `plan` reads the live vessel
//! and computes every corrected quantity; anything that can fail does so
//! there. `commit` then writes the correction into the vessel and cannot
//! fail halfway, so an `Err` from `apply` never leaves a half-updated vessel.

use crate::bodies::ReferenceBody;
use crate::config::ReconcilerConfig;
use crate::context::SimContext;
use crate::kinematics::{dead_reckon, extrapolate_rotation, from_to_rotation, rigid_point_velocity};
use crate::orbit::{Orbit, OrbitError, StateVector};
use crate::snapshot::{FlightControlState, PositionUpdate, Snapshot, SnapshotError, SurfaceState};
use crate::statistics::{DriftSink, ErrorSample};
use crate::types::VesselId;
use crate::vessel::MutableVesselState;
use nalgebra::{UnitQuaternion, Vector3};
use thiserror::Error;
use tracing::{debug, trace, warn};

mod control;

pub use control::{ControlOverride, ControlOverrides};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ReconcileError {
    #[error("reference body '{0}' is not known")]
    UnknownBody(String),
    #[error("snapshot for {found} cannot be applied to {expected}")]
    VesselMismatch { expected: VesselId, found: VesselId },
    #[error("malformed snapshot: {0}")]
    Malformed(#[from] SnapshotError),
    #[error(transparent)]
    Orbit(#[from] OrbitError),
}

/// Everything `apply` will write, computed before touching the vessel.
struct Correction<'b> {
    body: &'b ReferenceBody,
    orbit: Orbit,
    state: StateVector,
    orientation: UnitQuaternion<f64>,
    world_angular_velocity: Vector3<f64>,
    old_position: Vector3<f64>,
    old_velocity: Vector3<f64>,
    old_orientation: UnitQuaternion<f64>,
}

/// # StateReconciler
/// Owns the per-vessel control overrides and the drift sink.
pub struct StateReconciler {
    config: ReconcilerConfig,
    overrides: ControlOverrides,
    sink: Box<dyn DriftSink>,
}

impl StateReconciler {
    pub fn new(config: ReconcilerConfig, sink: Box<dyn DriftSink>) -> Self {
        Self {
            config,
            overrides: ControlOverrides::new(),
            sink,
        }
    }

    pub fn config(&self) -> &ReconcilerConfig {
        &self.config
    }

    pub fn overrides(&self) -> &ControlOverrides {
        &self.overrides
    }

    pub fn sink(&self) -> &dyn DriftSink {
        self.sink.as_ref()
    }

    pub fn sink_mut(&mut self) -> &mut dyn DriftSink {
        self.sink.as_mut()
    }

    /// The fly-by-wire hook for a reconciled vessel: returns the remote
    /// pilot's controls while an override is active, `requested` otherwise.
    pub fn update_controls(
        &mut self,
        vessel_id: VesselId,
        requested: FlightControlState,
        now: f64,
    ) -> FlightControlState {
        self.overrides.update_controls(vessel_id, requested, now)
    }

    /// Moves `vessel` to where `snapshot` says it should be at
    /// `context.universal_time`, and reports how far that moved it.
    ///
    /// `previous` is the last snapshot applied to this vessel; it drives the
    /// rotation extrapolation. The caller must not pass the vessel the local
    /// operator is flying. On `Err` the vessel is untouched and the message
    /// should simply be dropped.
    pub fn apply(
        &mut self,
        snapshot: &Snapshot,
        previous: Option<&Snapshot>,
        vessel: &mut dyn MutableVesselState,
        context: &SimContext,
    ) -> Result<ErrorSample, ReconcileError> {
        let correction = self.plan(snapshot, previous, vessel, context).inspect_err(|error| {
            debug!(vessel_id = %snapshot.vessel_id, %error, "dropping snapshot");
        })?;
        let sample = self.commit(snapshot, correction, vessel, context.universal_time)?;

        trace!(
            vessel_id = %sample.vessel_id,
            distance = sample.distance_error,
            velocity = sample.velocity_error,
            rotation = sample.rotation_error,
            "applied snapshot"
        );
        if let Err(error) = self.sink.record(&sample) {
            warn!(vessel_id = %sample.vessel_id, %error, "drift sink rejected sample");
        }
        Ok(sample)
    }

    fn plan<'b>(
        &self,
        snapshot: &Snapshot,
        previous: Option<&Snapshot>,
        vessel: &dyn MutableVesselState,
        context: &SimContext<'b>,
    ) -> Result<Correction<'b>, ReconcileError> {
        snapshot.validate()?;
        if snapshot.vessel_id != vessel.id() {
            return Err(ReconcileError::VesselMismatch {
                expected: vessel.id(),
                found: snapshot.vessel_id,
            });
        }
        let body = context
            .bodies
            .find(&snapshot.body_name)
            .ok_or_else(|| ReconcileError::UnknownBody(snapshot.body_name.clone()))?;
        let now = context.universal_time;

        let old_position = vessel.world_position();
        let old_velocity = vessel.orbit().state_at(now)?.velocity;
        let old_orientation = vessel.surface_relative_orientation();

        // --- Position and velocity ---
        let (orbit, normal_correction) = match &snapshot.position {
            PositionUpdate::Surface(surface) => {
                self.surface_orbit(surface, snapshot.capture_time, body, context)?
            }
            PositionUpdate::Orbital(elements) => (
                Orbit::from_elements(elements, body.gravitational_parameter)?,
                UnitQuaternion::identity(),
            ),
        };
        let state = orbit.state_at(now)?;

        // --- Orientation ---
        let usable_previous = previous.filter(|p| match p.validate() {
            Ok(()) => true,
            Err(error) => {
                debug!(vessel_id = %snapshot.vessel_id, %error, "ignoring malformed previous snapshot");
                false
            }
        });
        let unfudged = match usable_previous.and_then(|p| self.rotation_scaling(snapshot, p, now).map(|s| (p, s))) {
            Some((p, scaling)) => extrapolate_rotation(&p.orientation, &snapshot.orientation, scaling),
            None => snapshot.orientation,
        };
        let orientation = normal_correction * unfudged;

        let world_orientation = body.rotation_at(now) * orientation;
        Ok(Correction {
            body,
            orbit,
            state,
            orientation,
            world_angular_velocity: world_orientation * snapshot.angular_velocity,
            old_position,
            old_velocity,
            old_orientation,
        })
    }

    /// Dead-reckons a surface update to `now` and returns the orbit through
    /// the result, plus the terrain-normal correction to apply to orientation.
    fn surface_orbit(
        &self,
        surface: &SurfaceState,
        capture_time: f64,
        body: &ReferenceBody,
        context: &SimContext,
    ) -> Result<(Orbit, UnitQuaternion<f64>), ReconcileError> {
        let now = context.universal_time;

        // Keep the sender's height above ground when both peers sampled ground
        // and the sender was close to it.
        let local_ground = context
            .terrain
            .sample_ground(surface.latitude, surface.longitude, body);
        let (altitude_fudge, normal_correction) = match (surface.ground, local_ground) {
            (Some(theirs), Some(ours))
                if (surface.altitude - theirs.altitude).abs() < self.config.ground_proximity =>
            {
                (
                    ours.altitude - theirs.altitude,
                    from_to_rotation(&theirs.normal, &ours.normal),
                )
            }
            _ => (0.0, UnitQuaternion::identity()),
        };

        let dt = now - capture_time;
        let to_world = body.rotation_at(now);
        let motion = dead_reckon(
            to_world * surface.velocity,
            to_world * surface.acceleration,
            dt,
            self.config.extrapolation_horizon,
        );
        if !(dt.abs() < self.config.extrapolation_horizon) {
            debug!(dt, "latency beyond extrapolation horizon, using unextrapolated position");
        }

        let position = body.world_surface_position(
            surface.latitude,
            surface.longitude,
            surface.altitude + altitude_fudge,
            now,
        ) + motion.offset;
        let velocity = motion.velocity + body.frame_velocity_at(&position);
        let orbit = Orbit::from_state_vectors(
            position - body.position,
            velocity,
            body.gravitational_parameter,
            now,
        )?;
        Ok((orbit, normal_correction))
    }

    /// How far to project the rotation between `previous` and `snapshot`,
    /// in units of their capture interval. `None` disables extrapolation.
    fn rotation_scaling(&self, snapshot: &Snapshot, previous: &Snapshot, now: f64) -> Option<f64> {
        let since_previous = now - previous.capture_time;
        let interval = snapshot.capture_time - previous.capture_time;
        if since_previous <= 0.0 || since_previous >= self.config.extrapolation_horizon || interval <= 0.0 {
            return None;
        }
        Some((now - snapshot.capture_time) / interval)
    }

    fn commit(
        &mut self,
        snapshot: &Snapshot,
        correction: Correction,
        vessel: &mut dyn MutableVesselState,
        now: f64,
    ) -> Result<ErrorSample, ReconcileError> {
        let body = correction.body;

        vessel.set_orbit(correction.orbit);
        // Cannot fail: `state` was already propagated from this orbit to `now`.
        vessel.update_from_orbit(body, now)?;
        vessel.set_surface_relative_orientation(correction.orientation);
        vessel.set_angular_velocity(snapshot.angular_velocity);

        if !vessel.is_packed() {
            propagate_to_parts(
                vessel,
                body,
                &correction.state.velocity,
                &correction.world_angular_velocity,
            );
        }

        vessel.recompute_physics();
        let new_position = vessel.world_position();
        vessel.set_geodetic(body.geodetic(&new_position, now));

        vessel.set_action_groups(snapshot.action_groups);
        vessel.set_autopilot(snapshot.autopilot);
        let control = ControlOverride::new(
            snapshot.controls,
            snapshot.capture_time + self.config.control_override_duration,
        );
        if let Some(superseded) = self.overrides.install(snapshot.vessel_id, control) {
            trace!(vessel_id = %snapshot.vessel_id, expiry = superseded.expiry, "superseded control override");
        }

        Ok(ErrorSample {
            vessel_id: snapshot.vessel_id,
            distance_error: (correction.old_position - new_position).norm(),
            velocity_error: (correction.old_velocity - correction.state.velocity).norm(),
            rotation_error: correction
                .old_orientation
                .angle_to(&correction.orientation)
                .to_degrees(),
            sample_time: now,
        })
    }
}

/// Gives every active part the vessel's velocity and angular velocity, plus
/// the rigid-body term for parts offset from the centre of mass.
fn propagate_to_parts(
    vessel: &mut dyn MutableVesselState,
    body: &ReferenceBody,
    orbital_velocity: &Vector3<f64>,
    angular_velocity: &Vector3<f64>,
) {
    let base = orbital_velocity - vessel.frame_velocity();
    let center_of_mass = vessel.center_of_mass();
    let root = vessel.root_part_index();

    for (index, part) in vessel.parts_mut().iter_mut().enumerate() {
        if !part.active {
            continue;
        }
        let mut velocity = base;
        if body.inverse_rotation {
            velocity -= body.frame_velocity_at(&part.position);
        }
        part.angular_velocity = *angular_velocity;
        part.velocity = if root == Some(index) {
            velocity
        } else {
            rigid_point_velocity(&velocity, angular_velocity, &part.position, &center_of_mass)
        };
    }
}

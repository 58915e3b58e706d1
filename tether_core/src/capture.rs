// tether_core/src/capture.rs

//! Builds snapshots from the live vessels this peer is authoritative for.

use crate::config::{ReconcilerConfig, DEFAULT_SURFACE_ALTITUDE_THRESHOLD};
use crate::context::SimContext;
use crate::orbit::OrbitError;
use crate::snapshot::{PositionUpdate, Snapshot, SurfaceState};
use crate::vessel::VesselView;
use nalgebra::Vector3;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum CaptureError {
    #[error("reference body '{0}' is not known")]
    UnknownBody(String),
    #[error("{0} is not finite")]
    NonFinite(&'static str),
    #[error(transparent)]
    Orbit(#[from] OrbitError),
}

/// Snapshot builder. Below `surface_altitude_threshold` the surface
/// representation is captured, above it the orbital elements.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapshotCapture {
    surface_altitude_threshold: f64,
}

impl Default for SnapshotCapture {
    fn default() -> Self {
        Self::new(DEFAULT_SURFACE_ALTITUDE_THRESHOLD)
    }
}

impl SnapshotCapture {
    pub fn new(surface_altitude_threshold: f64) -> Self {
        Self {
            surface_altitude_threshold,
        }
    }

    pub fn from_config(config: &ReconcilerConfig) -> Self {
        Self::new(config.surface_altitude_threshold)
    }

    pub fn surface_altitude_threshold(&self) -> f64 {
        self.surface_altitude_threshold
    }

    /// Captures `vessel` as of `context.universal_time`.
    ///
    /// An `Err` means this broadcast cycle should be skipped; it is never fatal.
    pub fn capture(
        &self,
        vessel: &dyn VesselView,
        context: &SimContext,
    ) -> Result<Snapshot, CaptureError> {
        self.build(vessel, context).inspect_err(|error| {
            warn!(vessel_id = %vessel.id(), %error, "snapshot capture failed, skipping broadcast");
        })
    }

    fn build(&self, vessel: &dyn VesselView, context: &SimContext) -> Result<Snapshot, CaptureError> {
        let body = context
            .bodies
            .find(vessel.body_name())
            .ok_or_else(|| CaptureError::UnknownBody(vessel.body_name().to_string()))?;

        let geodetic = vessel.geodetic();
        if !geodetic.is_finite() {
            return Err(CaptureError::NonFinite("geodetic position"));
        }
        let angular_velocity = finite(vessel.angular_velocity(), "angular velocity")?;

        let position = if geodetic.altitude < self.surface_altitude_threshold {
            let to_body_fixed = body.rotation_at(context.universal_time).inverse();
            PositionUpdate::Surface(SurfaceState {
                latitude: geodetic.latitude,
                longitude: geodetic.longitude,
                altitude: geodetic.altitude,
                ground: context
                    .terrain
                    .sample_ground(geodetic.latitude, geodetic.longitude, body),
                velocity: to_body_fixed * finite(vessel.surface_velocity(), "surface velocity")?,
                acceleration: to_body_fixed * finite(vessel.acceleration(), "acceleration")?,
            })
        } else {
            PositionUpdate::Orbital(vessel.orbit().elements()?)
        };

        Ok(Snapshot {
            vessel_id: vessel.id(),
            capture_time: context.universal_time,
            body_name: body.name.clone(),
            orientation: vessel.surface_relative_orientation(),
            angular_velocity,
            controls: vessel.controls(),
            action_groups: vessel.action_groups(),
            position,
            autopilot: vessel.autopilot(),
        })
    }
}

fn finite(v: Vector3<f64>, field: &'static str) -> Result<Vector3<f64>, CaptureError> {
    if v.iter().all(|c| c.is_finite()) {
        Ok(v)
    } else {
        Err(CaptureError::NonFinite(field))
    }
}

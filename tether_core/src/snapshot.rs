// tether_core/src/snapshot.rs

//! The snapshot a peer broadcasts for every vessel it controls.
//!
//! A `Snapshot` is immutable once built. Its field list is the contract any
//! wire serializer has to round-trip; everything here derives serde.

use crate::orbit::OrbitalElements;
use crate::terrain::GroundSample;
use crate::types::VesselId;
use nalgebra::{Quaternion, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Tolerance on `|q| - 1` for quaternions received from a peer.
const UNIT_NORM_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SnapshotError {
    #[error("{0} is not a unit quaternion")]
    NonUnitQuaternion(&'static str),
    #[error("{0} contains a non-finite value")]
    NonFinite(&'static str),
    #[error("invalid orbital elements: {0}")]
    InvalidElements(&'static str),
}

// =========================================================================
// == Control and Discrete State ==
// =========================================================================

/// Pilot control inputs. The reconciler never interprets these; they are
/// replayed verbatim by a `ControlOverride`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FlightControlState {
    pub pitch: f64,
    pub yaw: f64,
    pub roll: f64,
    pub pitch_trim: f64,
    pub yaw_trim: f64,
    pub roll_trim: f64,
    /// Translation axes (RCS).
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub main_throttle: f64,
    pub wheel_steer: f64,
    pub wheel_throttle: f64,
}

impl FlightControlState {
    fn is_finite(&self) -> bool {
        [
            self.pitch,
            self.yaw,
            self.roll,
            self.pitch_trim,
            self.yaw_trim,
            self.roll_trim,
            self.x,
            self.y,
            self.z,
            self.main_throttle,
            self.wheel_steer,
            self.wheel_throttle,
        ]
        .iter()
        .all(|v| v.is_finite())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ActionGroups {
    pub gear: bool,
    pub lights: bool,
    pub brakes: bool,
    pub sas: bool,
    pub rcs: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutopilotMode {
    #[default]
    StabilityAssist,
    Prograde,
    Retrograde,
    Normal,
    Antinormal,
    RadialIn,
    RadialOut,
    Target,
    AntiTarget,
    Maneuver,
}

/// An engaged autopilot: its mode and the orientation it holds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AutopilotLock {
    pub mode: AutopilotMode,
    pub locked_orientation: UnitQuaternion<f64>,
}

// =========================================================================
// == Position Representations ==
// =========================================================================

/// Near-surface state, in the body-fixed frame of the reference body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceState {
    /// Degrees.
    pub latitude: f64,
    /// Degrees.
    pub longitude: f64,
    pub altitude: f64,
    /// The sender's own ground sample under the vessel, if it had one.
    pub ground: Option<GroundSample>,
    /// Surface-relative velocity.
    pub velocity: Vector3<f64>,
    pub acceleration: Vector3<f64>,
}

impl SurfaceState {
    /// Height above the sender's ground sample, if one was taken.
    pub fn height_above_ground(&self) -> Option<f64> {
        self.ground.map(|g| self.altitude - g.altitude)
    }
}

/// Exactly one of the two representations travels with each snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PositionUpdate {
    Surface(SurfaceState),
    Orbital(OrbitalElements),
}

// =========================================================================
// == The Snapshot ==
// =========================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub vessel_id: VesselId,
    /// Simulation time the state was observed at.
    pub capture_time: f64,
    pub body_name: String,
    /// Orientation relative to the body-fixed frame of `body_name`.
    pub orientation: UnitQuaternion<f64>,
    /// Angular velocity in the vessel's own frame.
    pub angular_velocity: Vector3<f64>,
    pub controls: FlightControlState,
    pub action_groups: ActionGroups,
    pub position: PositionUpdate,
    /// Present iff SAS was engaged on the sender.
    pub autopilot: Option<AutopilotLock>,
}

impl Snapshot {
    pub fn is_surface_update(&self) -> bool {
        matches!(self.position, PositionUpdate::Surface(_))
    }

    pub fn sas_enabled(&self) -> bool {
        self.autopilot.is_some()
    }

    pub fn surface(&self) -> Option<&SurfaceState> {
        match &self.position {
            PositionUpdate::Surface(surface) => Some(surface),
            PositionUpdate::Orbital(_) => None,
        }
    }

    pub fn orbital(&self) -> Option<&OrbitalElements> {
        match &self.position {
            PositionUpdate::Orbital(elements) => Some(elements),
            PositionUpdate::Surface(_) => None,
        }
    }

    /// Rejects snapshots a reconciler cannot safely apply: non-unit
    /// quaternions, NaNs/infinities, impossible orbital elements.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        if !self.capture_time.is_finite() {
            return Err(SnapshotError::NonFinite("capture_time"));
        }
        check_unit(self.orientation.quaternion(), "orientation")?;
        check_finite(&self.angular_velocity, "angular_velocity")?;
        if !self.controls.is_finite() {
            return Err(SnapshotError::NonFinite("controls"));
        }

        match &self.position {
            PositionUpdate::Surface(surface) => {
                if !(surface.latitude.is_finite()
                    && surface.longitude.is_finite()
                    && surface.altitude.is_finite())
                {
                    return Err(SnapshotError::NonFinite("surface position"));
                }
                check_finite(&surface.velocity, "surface velocity")?;
                check_finite(&surface.acceleration, "surface acceleration")?;
                if let Some(ground) = &surface.ground {
                    if !ground.altitude.is_finite() {
                        return Err(SnapshotError::NonFinite("ground altitude"));
                    }
                    check_finite(&ground.normal, "terrain normal")?;
                }
            }
            PositionUpdate::Orbital(elements) => {
                elements.validate().map_err(SnapshotError::InvalidElements)?;
            }
        }

        if let Some(lock) = &self.autopilot {
            check_unit(lock.locked_orientation.quaternion(), "locked_orientation")?;
        }
        Ok(())
    }
}

fn check_unit(q: &Quaternion<f64>, field: &'static str) -> Result<(), SnapshotError> {
    if !q.coords.iter().all(|v| v.is_finite()) {
        return Err(SnapshotError::NonFinite(field));
    }
    if (q.norm() - 1.0).abs() > UNIT_NORM_TOLERANCE {
        return Err(SnapshotError::NonUnitQuaternion(field));
    }
    Ok(())
}

fn check_finite(v: &Vector3<f64>, field: &'static str) -> Result<(), SnapshotError> {
    if v.iter().all(|c| c.is_finite()) {
        Ok(())
    } else {
        Err(SnapshotError::NonFinite(field))
    }
}

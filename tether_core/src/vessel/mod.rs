// tether_core/src/vessel/mod.rs

use crate::bodies::ReferenceBody;
use crate::orbit::{Orbit, OrbitError};
use crate::snapshot::{ActionGroups, AutopilotLock, FlightControlState};
use crate::types::{Geodetic, VesselId};
use nalgebra::{UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

// --- Part Data Structures ---
/// One rigid sub-part of a composite vessel. Positions and velocities are in
/// the world frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PartState {
    pub position: Vector3<f64>,
    pub velocity: Vector3<f64>,
    pub angular_velocity: Vector3<f64>,
    pub mass: f64,
    /// `false` once the part is destroyed; inactive parts are never touched.
    pub active: bool,
}

impl PartState {
    pub fn new(position: Vector3<f64>, mass: f64) -> Self {
        Self {
            position,
            velocity: Vector3::zeros(),
            angular_velocity: Vector3::zeros(),
            mass,
            active: true,
        }
    }
}

// --- The Capability Traits ("Contract") ---
/// Read access to a live vessel, as needed to capture a snapshot of it.
pub trait VesselView {
    fn id(&self) -> VesselId;

    /// Name of the reference body the vessel currently orbits.
    fn body_name(&self) -> &str;

    fn orbit(&self) -> &Orbit;

    /// World position of the centre of mass.
    fn world_position(&self) -> Vector3<f64>;

    /// Velocity relative to the rotating surface, in the world frame.
    fn surface_velocity(&self) -> Vector3<f64>;

    /// Acceleration in the world frame.
    fn acceleration(&self) -> Vector3<f64>;

    fn geodetic(&self) -> Geodetic;

    /// Orientation relative to the reference body's surface frame.
    fn surface_relative_orientation(&self) -> UnitQuaternion<f64>;

    /// Angular velocity in the vessel's own frame.
    fn angular_velocity(&self) -> Vector3<f64>;

    fn controls(&self) -> FlightControlState;

    fn action_groups(&self) -> ActionGroups;

    fn autopilot(&self) -> Option<AutopilotLock>;

    fn parts(&self) -> &[PartState];
}

/// The narrow write surface the reconciler needs on a live vessel.
///
/// The host simulation implements this with an adapter over its own vessel
/// object; `SimulatedVessel` is the in-memory implementation.
pub trait MutableVesselState: VesselView {
    fn set_orbit(&mut self, orbit: Orbit);

    /// Moves the vessel to where its orbit places it at `universal_time`,
    /// as if on rails.
    fn update_from_orbit(
        &mut self,
        body: &ReferenceBody,
        universal_time: f64,
    ) -> Result<(), OrbitError>;

    fn set_surface_relative_orientation(&mut self, orientation: UnitQuaternion<f64>);

    /// Sets the angular velocity in the vessel's own frame.
    fn set_angular_velocity(&mut self, angular_velocity: Vector3<f64>);

    /// Packed vessels are on rails; their parts are not rigid-body simulated.
    fn is_packed(&self) -> bool;

    /// Velocity of the host's moving physics frame, if it uses one.
    fn frame_velocity(&self) -> Vector3<f64>;

    fn root_part_index(&self) -> Option<usize>;

    fn center_of_mass(&self) -> Vector3<f64>;

    fn parts_mut(&mut self) -> &mut [PartState];

    /// Refreshes mass-dependent aggregates after parts moved.
    fn recompute_physics(&mut self);

    fn set_geodetic(&mut self, geodetic: Geodetic);

    fn set_action_groups(&mut self, groups: ActionGroups);

    /// `None` disengages the autopilot.
    fn set_autopilot(&mut self, lock: Option<AutopilotLock>);
}

mod simulated;

pub use simulated::SimulatedVessel;

// tether_core/src/vessel/simulated.rs

use super::{MutableVesselState, PartState, VesselView};
use crate::bodies::ReferenceBody;
use crate::orbit::{Orbit, OrbitError};
use crate::snapshot::{ActionGroups, AutopilotLock, FlightControlState};
use crate::types::{Geodetic, VesselId};
use nalgebra::{UnitQuaternion, Vector3};

/// An in-memory vessel: a Keplerian orbit carrying a rigid set of parts.
///
/// The host drives authoritative motion through the inherent setters and
/// the reconciler corrects remote copies through `MutableVesselState`.
#[derive(Debug, Clone)]
pub struct SimulatedVessel {
    id: VesselId,
    body_name: String,
    orbit: Orbit,
    parts: Vec<PartState>,
    root_part: Option<usize>,
    center_of_mass: Vector3<f64>,
    orbital_velocity: Vector3<f64>,
    surface_velocity: Vector3<f64>,
    acceleration: Vector3<f64>,
    geodetic: Geodetic,
    orientation: UnitQuaternion<f64>,
    angular_velocity: Vector3<f64>,
    packed: bool,
    frame_velocity: Vector3<f64>,
    controls: FlightControlState,
    action_groups: ActionGroups,
    autopilot: Option<AutopilotLock>,
}

impl SimulatedVessel {
    /// A packed, partless vessel. Call `update_from_orbit` to place it.
    pub fn new(id: VesselId, body_name: impl Into<String>, orbit: Orbit) -> Self {
        Self {
            id,
            body_name: body_name.into(),
            orbit,
            parts: Vec::new(),
            root_part: None,
            center_of_mass: Vector3::zeros(),
            orbital_velocity: Vector3::zeros(),
            surface_velocity: Vector3::zeros(),
            acceleration: Vector3::zeros(),
            geodetic: Geodetic::default(),
            orientation: UnitQuaternion::identity(),
            angular_velocity: Vector3::zeros(),
            packed: true,
            frame_velocity: Vector3::zeros(),
            controls: FlightControlState::default(),
            action_groups: ActionGroups::default(),
            autopilot: None,
        }
    }

    /// Attaches parts; the first one becomes the root part.
    pub fn with_parts(mut self, parts: Vec<PartState>) -> Self {
        self.root_part = if parts.is_empty() { None } else { Some(0) };
        self.parts = parts;
        self.recompute_physics();
        self
    }

    pub fn with_root_part(mut self, index: usize) -> Self {
        self.root_part = (index < self.parts.len()).then_some(index);
        self
    }

    pub fn with_orientation(mut self, orientation: UnitQuaternion<f64>) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn with_packed(mut self, packed: bool) -> Self {
        self.packed = packed;
        self
    }

    // --- Host-side setters ---

    pub fn set_packed(&mut self, packed: bool) {
        self.packed = packed;
    }

    pub fn set_frame_velocity(&mut self, frame_velocity: Vector3<f64>) {
        self.frame_velocity = frame_velocity;
    }

    pub fn set_acceleration(&mut self, acceleration: Vector3<f64>) {
        self.acceleration = acceleration;
    }

    pub fn set_controls(&mut self, controls: FlightControlState) {
        self.controls = controls;
    }

    /// World-frame orbital velocity from the last on-rails update.
    pub fn orbital_velocity(&self) -> Vector3<f64> {
        self.orbital_velocity
    }
}

impl VesselView for SimulatedVessel {
    fn id(&self) -> VesselId {
        self.id
    }

    fn body_name(&self) -> &str {
        &self.body_name
    }

    fn orbit(&self) -> &Orbit {
        &self.orbit
    }

    fn world_position(&self) -> Vector3<f64> {
        self.center_of_mass
    }

    fn surface_velocity(&self) -> Vector3<f64> {
        self.surface_velocity
    }

    fn acceleration(&self) -> Vector3<f64> {
        self.acceleration
    }

    fn geodetic(&self) -> Geodetic {
        self.geodetic
    }

    fn surface_relative_orientation(&self) -> UnitQuaternion<f64> {
        self.orientation
    }

    fn angular_velocity(&self) -> Vector3<f64> {
        self.angular_velocity
    }

    fn controls(&self) -> FlightControlState {
        self.controls
    }

    fn action_groups(&self) -> ActionGroups {
        self.action_groups
    }

    fn autopilot(&self) -> Option<AutopilotLock> {
        self.autopilot
    }

    fn parts(&self) -> &[PartState] {
        &self.parts
    }
}

impl MutableVesselState for SimulatedVessel {
    fn set_orbit(&mut self, orbit: Orbit) {
        self.orbit = orbit;
    }

    fn update_from_orbit(
        &mut self,
        body: &ReferenceBody,
        universal_time: f64,
    ) -> Result<(), OrbitError> {
        let state = self.orbit.state_at(universal_time)?;
        let position = body.position + state.position;

        // Parts move rigidly with the centre of mass.
        let shift = position - self.center_of_mass;
        for part in &mut self.parts {
            part.position += shift;
        }
        self.center_of_mass = position;
        self.orbital_velocity = state.velocity;
        self.surface_velocity = state.velocity - body.frame_velocity_at(&position);
        self.geodetic = body.geodetic(&position, universal_time);
        if self.body_name != body.name {
            self.body_name.clone_from(&body.name);
        }
        Ok(())
    }

    fn set_surface_relative_orientation(&mut self, orientation: UnitQuaternion<f64>) {
        self.orientation = orientation;
    }

    fn set_angular_velocity(&mut self, angular_velocity: Vector3<f64>) {
        self.angular_velocity = angular_velocity;
    }

    fn is_packed(&self) -> bool {
        self.packed
    }

    fn frame_velocity(&self) -> Vector3<f64> {
        self.frame_velocity
    }

    fn root_part_index(&self) -> Option<usize> {
        self.root_part
    }

    fn center_of_mass(&self) -> Vector3<f64> {
        self.center_of_mass
    }

    fn parts_mut(&mut self) -> &mut [PartState] {
        &mut self.parts
    }

    fn recompute_physics(&mut self) {
        let (weighted, total_mass) = self
            .parts
            .iter()
            .filter(|p| p.active && p.mass > 0.0)
            .fold((Vector3::zeros(), 0.0), |(sum, mass), p| {
                (sum + p.position * p.mass, mass + p.mass)
            });
        if total_mass > 0.0 {
            self.center_of_mass = weighted / total_mass;
        }
    }

    fn set_geodetic(&mut self, geodetic: Geodetic) {
        self.geodetic = geodetic;
    }

    fn set_action_groups(&mut self, groups: ActionGroups) {
        self.action_groups = groups;
    }

    fn set_autopilot(&mut self, lock: Option<AutopilotLock>) {
        self.autopilot = lock;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn kerbin() -> ReferenceBody {
        ReferenceBody::new("Kerbin", 600_000.0, 3.5316e12).with_rotation_period(21_549.425)
    }

    fn low_orbit(body: &ReferenceBody) -> Orbit {
        let r = body.radius + 80_000.0;
        let v = (body.gravitational_parameter / r).sqrt();
        Orbit::from_state_vectors(
            Vector3::new(r, 0.0, 0.0),
            Vector3::new(0.0, v, 0.0),
            body.gravitational_parameter,
            0.0,
        )
        .unwrap()
    }

    #[test]
    fn centre_of_mass_is_mass_weighted_over_active_parts() {
        let body = kerbin();
        let mut dead = PartState::new(Vector3::new(100.0, 0.0, 0.0), 50.0);
        dead.active = false;
        let vessel = SimulatedVessel::new(VesselId(1), "Kerbin", low_orbit(&body)).with_parts(vec![
            PartState::new(Vector3::new(0.0, 0.0, 0.0), 3.0),
            PartState::new(Vector3::new(4.0, 0.0, 0.0), 1.0),
            dead,
        ]);
        assert_abs_diff_eq!(vessel.center_of_mass(), Vector3::new(1.0, 0.0, 0.0), epsilon = 1e-12);
        assert_eq!(vessel.root_part_index(), Some(0));
    }

    #[test]
    fn on_rails_update_moves_parts_rigidly() {
        let body = kerbin();
        let mut vessel = SimulatedVessel::new(VesselId(1), "Mun", low_orbit(&body)).with_parts(vec![
            PartState::new(Vector3::new(-1.0, 0.0, 0.0), 1.0),
            PartState::new(Vector3::new(1.0, 2.0, 0.0), 1.0),
        ]);
        vessel.update_from_orbit(&body, 0.0).unwrap();

        assert_abs_diff_eq!(vessel.world_position().x, 680_000.0, epsilon = 1e-6);
        let parts = vessel.parts();
        assert_abs_diff_eq!(parts[1].position - parts[0].position, Vector3::new(2.0, 2.0, 0.0), epsilon = 1e-9);
        assert_eq!(vessel.body_name(), "Kerbin");
        assert_abs_diff_eq!(vessel.geodetic().altitude, 80_000.0, epsilon = 1e-6);

        let expected_surface = vessel.orbital_velocity() - body.frame_velocity_at(&vessel.world_position());
        assert_abs_diff_eq!(vessel.surface_velocity(), expected_surface, epsilon = 1e-9);
    }
}

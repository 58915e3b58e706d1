// tether_sim/src/simulation/plugins/vessels/authority.rs

//! The scripted flight of the authoritative vessel.

use nalgebra::{UnitQuaternion, Vector3};
use tether_core::prelude::*;

use crate::simulation::config::structs::{ClimbProfile, FlightConfig, VesselConfig};

/// Drives the authoritative copy through its configured flight, as a pilot
/// and the host's physics would.
#[derive(Debug, Clone)]
pub struct FlightScript {
    flight: FlightConfig,
    spin_rate: f64,
    start_time: f64,
}

impl FlightScript {
    pub fn new(flight: FlightConfig, spin_rate: f64, start_time: f64) -> Self {
        Self {
            flight,
            spin_rate,
            start_time,
        }
    }

    pub fn from_config(vessel: &VesselConfig, start_time: f64) -> Self {
        Self::new(vessel.flight.clone(), vessel.spin_rate, start_time)
    }

    /// The orbit the vessel is on when the run starts.
    pub fn initial_orbit(&self, body: &ReferenceBody) -> Result<Orbit, OrbitError> {
        match &self.flight {
            FlightConfig::Climb(profile) => {
                ClimbState::at(profile, body, 0.0).osculating_orbit(body, self.start_time)
            }
            FlightConfig::Coast(profile) => Orbit::from_elements(
                &profile.to_elements(body, self.start_time),
                body.gravitational_parameter,
            ),
        }
    }

    /// Moves `vessel` to where the script puts it at `now`.
    pub fn advance(
        &self,
        vessel: &mut SimulatedVessel,
        body: &ReferenceBody,
        now: f64,
    ) -> Result<(), OrbitError> {
        let elapsed = now - self.start_time;
        let spin = UnitQuaternion::from_axis_angle(&Vector3::z_axis(), self.spin_rate * elapsed);

        let orientation = match &self.flight {
            FlightConfig::Climb(profile) => {
                let state = ClimbState::at(profile, body, elapsed);
                // A fresh osculating orbit every step keeps the vessel on the scripted path.
                vessel.set_orbit(state.osculating_orbit(body, now)?);
                vessel.update_from_orbit(body, now)?;
                vessel.set_acceleration(body.rotation_at(now) * state.acceleration);
                state.attitude() * spin
            }
            FlightConfig::Coast(_) => {
                vessel.update_from_orbit(body, now)?;
                let r = vessel.world_position() - body.position;
                vessel.set_acceleration(-r * body.gravitational_parameter / r.norm().powi(3));
                spin
            }
        };

        vessel.set_surface_relative_orientation(orientation);
        vessel.set_angular_velocity(Vector3::new(0.0, 0.0, self.spin_rate));
        vessel.set_controls(scripted_controls(elapsed));
        if let Some(lock) = vessel.autopilot() {
            vessel.set_autopilot(Some(AutopilotLock {
                locked_orientation: orientation,
                ..lock
            }));
        }
        Ok(())
    }
}

/// Pilot input while flying the script: gentle stick motion at full throttle.
pub fn scripted_controls(elapsed: f64) -> FlightControlState {
    FlightControlState {
        pitch: 0.3 * (0.5 * elapsed).sin(),
        yaw: 0.1 * (0.3 * elapsed).cos(),
        roll: 0.05 * (0.7 * elapsed).sin(),
        main_throttle: 1.0,
        ..FlightControlState::default()
    }
}

// --- Climb Kinematics ---

/// Where a climb profile puts the vessel, in the body-fixed frame.
#[derive(Debug, Clone, Copy)]
struct ClimbState {
    latitude: f64,
    longitude: f64,
    altitude: f64,
    north: Vector3<f64>,
    up: Vector3<f64>,
    velocity: Vector3<f64>,
    acceleration: Vector3<f64>,
}

impl ClimbState {
    fn at(profile: &ClimbProfile, body: &ReferenceBody, elapsed: f64) -> Self {
        let heading = profile.heading_deg.to_radians();
        let (sin_heading, cos_heading) = heading.sin_cos();

        // The ground track runs at the start altitude.
        let track_radius = body.radius + profile.altitude;
        let distance = profile.ground_speed * elapsed;
        let cos_latitude = profile.latitude.to_radians().cos().max(1.0e-6);
        let latitude = profile.latitude + (distance * cos_heading / track_radius).to_degrees();
        let longitude = profile.longitude
            + (distance * sin_heading / (track_radius * cos_latitude)).to_degrees();

        let vertical_speed = profile.climb_rate + profile.climb_acceleration * elapsed;
        let altitude = profile.altitude
            + profile.climb_rate * elapsed
            + 0.5 * profile.climb_acceleration * elapsed * elapsed;

        let up = body.surface_normal(latitude, longitude);
        let (sin_lon, cos_lon) = longitude.to_radians().sin_cos();
        let east = Vector3::new(-sin_lon, cos_lon, 0.0);
        let north = up.cross(&east);

        Self {
            latitude,
            longitude,
            altitude,
            north,
            up,
            velocity: (north * cos_heading + east * sin_heading) * profile.ground_speed
                + up * vertical_speed,
            acceleration: up * profile.climb_acceleration,
        }
    }

    /// The inertial orbit passing through this state at `t`.
    fn osculating_orbit(&self, body: &ReferenceBody, t: f64) -> Result<Orbit, OrbitError> {
        let rotation = body.rotation_at(t);
        let position = rotation * body.body_fixed_position(self.latitude, self.longitude, self.altitude);
        let velocity = rotation * self.velocity + body.angular_velocity().cross(&position);
        Orbit::from_state_vectors(position, velocity, body.gravitational_parameter, t)
    }

    /// Nose (+Z) along the flight path, belly (-Y) towards the ground.
    fn attitude(&self) -> UnitQuaternion<f64> {
        let Some(forward) = self.velocity.try_normalize(1.0e-9) else {
            return UnitQuaternion::face_towards(&self.up, &self.north);
        };
        let hint = if forward.cross(&self.up).norm() > 1.0e-6 {
            self.up
        } else {
            self.north
        };
        UnitQuaternion::face_towards(&forward, &hint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::config::structs::CoastProfile;
    use approx::assert_abs_diff_eq;

    fn kerbin() -> ReferenceBody {
        ReferenceBody::new("Kerbin", 600_000.0, 3.5316e12).with_rotation_period(21_549.425)
    }

    fn eastward_climb() -> FlightConfig {
        FlightConfig::Climb(ClimbProfile {
            latitude: 0.0,
            longitude: 0.0,
            altitude: 100.0,
            heading_deg: 90.0,
            ground_speed: 50.0,
            climb_rate: 10.0,
            climb_acceleration: 2.0,
        })
    }

    fn launch(script: &FlightScript, body: &ReferenceBody) -> SimulatedVessel {
        let orbit = script.initial_orbit(body).unwrap();
        let mut vessel = SimulatedVessel::new(VesselId(1), body.name.clone(), orbit)
            .with_parts(vec![PartState::new(Vector3::zeros(), 1_000.0)]);
        vessel.update_from_orbit(body, script.start_time).unwrap();
        vessel
    }

    #[test]
    fn the_climb_starts_at_the_configured_position() {
        let body = kerbin();
        let script = FlightScript::new(eastward_climb(), 0.0, 50.0);
        let vessel = launch(&script, &body);

        let geodetic = vessel.geodetic();
        assert_abs_diff_eq!(geodetic.latitude, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(geodetic.longitude, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(geodetic.altitude, 100.0, epsilon = 1e-6);
    }

    #[test]
    fn the_climb_follows_its_heading_and_vertical_profile() {
        let body = kerbin();
        let script = FlightScript::new(eastward_climb(), 0.0, 0.0);
        let mut vessel = launch(&script, &body);

        script.advance(&mut vessel, &body, 10.0).unwrap();

        let geodetic = vessel.geodetic();
        // 100 + 10 * 10 + 0.5 * 2 * 100
        assert_abs_diff_eq!(geodetic.altitude, 300.0, epsilon = 1e-6);
        assert_abs_diff_eq!(geodetic.latitude, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(geodetic.longitude, (500.0 / 600_100.0_f64).to_degrees(), epsilon = 1e-9);

        // Surface-relative velocity, back in the body-fixed frame: 50 east, 30 up.
        let fixed = body.rotation_at(10.0).inverse() * vessel.surface_velocity();
        let up = body.surface_normal(0.0, geodetic.longitude);
        let east = Vector3::new(-geodetic.longitude.to_radians().sin(), geodetic.longitude.to_radians().cos(), 0.0);
        assert_abs_diff_eq!(fixed.dot(&east), 50.0, epsilon = 1e-6);
        assert_abs_diff_eq!(fixed.dot(&up), 30.0, epsilon = 1e-6);
    }

    #[test]
    fn the_nose_points_along_the_flight_path() {
        let body = kerbin();
        let script = FlightScript::new(eastward_climb(), 0.0, 0.0);
        let mut vessel = launch(&script, &body);
        script.advance(&mut vessel, &body, 3.0).unwrap();

        let nose = vessel.surface_relative_orientation() * Vector3::z();
        let fixed_velocity = body.rotation_at(3.0).inverse() * vessel.surface_velocity();
        assert_abs_diff_eq!(nose, fixed_velocity.normalize(), epsilon = 1e-6);
    }

    #[test]
    fn spin_is_reported_as_local_angular_velocity() {
        let body = kerbin();
        let script = FlightScript::new(eastward_climb(), 0.25, 0.0);
        let mut vessel = launch(&script, &body);
        script.advance(&mut vessel, &body, 2.0).unwrap();
        assert_abs_diff_eq!(vessel.angular_velocity(), Vector3::new(0.0, 0.0, 0.25));
    }

    #[test]
    fn the_autopilot_locks_the_current_attitude() {
        let body = kerbin();
        let script = FlightScript::new(eastward_climb(), 0.1, 0.0);
        let mut vessel = launch(&script, &body);
        vessel.set_autopilot(Some(AutopilotLock {
            mode: AutopilotMode::Prograde,
            locked_orientation: UnitQuaternion::identity(),
        }));

        script.advance(&mut vessel, &body, 4.0).unwrap();
        let lock = vessel.autopilot().unwrap();
        assert_eq!(lock.mode, AutopilotMode::Prograde);
        assert_eq!(lock.locked_orientation, vessel.surface_relative_orientation());
    }

    #[test]
    fn a_coast_stays_between_periapsis_and_apoapsis() {
        let body = kerbin();
        let coast = FlightConfig::Coast(CoastProfile {
            periapsis_altitude: 80_000.0,
            apoapsis_altitude: 120_000.0,
            inclination_deg: 10.0,
            longitude_of_ascending_node_deg: 0.0,
            argument_of_periapsis_deg: 0.0,
            mean_anomaly_deg: 0.0,
        });
        let script = FlightScript::new(coast, 0.0, 0.0);
        let mut vessel = launch(&script, &body);
        assert_abs_diff_eq!(vessel.geodetic().altitude, 80_000.0, epsilon = 1e-3);

        for step in 1..=20 {
            script.advance(&mut vessel, &body, step as f64 * 100.0).unwrap();
            let altitude = vessel.geodetic().altitude;
            assert!((80_000.0 - 1e-3..=120_000.0 + 1e-3).contains(&altitude));
        }
    }
}

// tether_core/src/bodies.rs

//! Reference bodies (planets, moons) and their rotating surface frames.

use crate::types::Geodetic;
use nalgebra::{UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::f64::consts::TAU;

/// A planet or moon that vessel states are expressed relative to.
///
/// The body spins about its own +Z axis. Its body-fixed ("surface") frame
/// coincides with the inertial frame at `t = 0` rotated by `initial_rotation`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceBody {
    pub name: String,
    /// Mean radius; altitudes are measured above it.
    pub radius: f64,
    /// Standard gravitational parameter μ = G·M.
    pub gravitational_parameter: f64,
    /// Sidereal rotation period. Zero or negative means the body does not rotate.
    pub rotation_period: f64,
    /// Rotation of the surface frame at `t = 0`, in radians.
    pub initial_rotation: f64,
    /// Centre of the body in the world frame.
    pub position: Vector3<f64>,
    /// Whether the host simulates physics in this body's rotating frame, so
    /// part velocities must have the frame velocity removed.
    pub inverse_rotation: bool,
}

impl ReferenceBody {
    pub fn new(name: impl Into<String>, radius: f64, gravitational_parameter: f64) -> Self {
        Self {
            name: name.into(),
            radius,
            gravitational_parameter,
            rotation_period: 0.0,
            initial_rotation: 0.0,
            position: Vector3::zeros(),
            inverse_rotation: false,
        }
    }

    pub fn with_rotation_period(mut self, rotation_period: f64) -> Self {
        self.rotation_period = rotation_period;
        self
    }

    pub fn with_inverse_rotation(mut self, inverse_rotation: bool) -> Self {
        self.inverse_rotation = inverse_rotation;
        self
    }

    /// Spin rate about +Z in rad/s.
    pub fn spin_rate(&self) -> f64 {
        if self.rotation_period > 0.0 {
            TAU / self.rotation_period
        } else {
            0.0
        }
    }

    pub fn angular_velocity(&self) -> Vector3<f64> {
        Vector3::new(0.0, 0.0, self.spin_rate())
    }

    /// Orientation of the body-fixed frame in the world frame at time `t`.
    pub fn rotation_at(&self, t: f64) -> UnitQuaternion<f64> {
        UnitQuaternion::from_axis_angle(
            &Vector3::z_axis(),
            self.initial_rotation + self.spin_rate() * t,
        )
    }

    /// Radial unit vector at a latitude/longitude, in the body-fixed frame.
    pub fn surface_normal(&self, latitude: f64, longitude: f64) -> Vector3<f64> {
        let (sin_lat, cos_lat) = latitude.to_radians().sin_cos();
        let (sin_lon, cos_lon) = longitude.to_radians().sin_cos();
        Vector3::new(cos_lat * cos_lon, cos_lat * sin_lon, sin_lat)
    }

    /// A point at `altitude` above the given latitude/longitude, in the
    /// body-fixed frame relative to the body's centre.
    pub fn body_fixed_position(&self, latitude: f64, longitude: f64, altitude: f64) -> Vector3<f64> {
        self.surface_normal(latitude, longitude) * (self.radius + altitude)
    }

    /// World position of a point at `altitude` above latitude/longitude at time `t`.
    pub fn world_surface_position(
        &self,
        latitude: f64,
        longitude: f64,
        altitude: f64,
        t: f64,
    ) -> Vector3<f64> {
        self.position + self.rotation_at(t) * self.body_fixed_position(latitude, longitude, altitude)
    }

    /// Velocity of the rotating surface frame at a world position (ω × r).
    /// Surface-relative velocity plus this is the inertial orbital velocity.
    pub fn frame_velocity_at(&self, world_position: &Vector3<f64>) -> Vector3<f64> {
        self.angular_velocity().cross(&(world_position - self.position))
    }

    /// Latitude/longitude/altitude of a world position at time `t`.
    pub fn geodetic(&self, world_position: &Vector3<f64>, t: f64) -> Geodetic {
        let fixed = self.rotation_at(t).inverse() * (world_position - self.position);
        let distance = fixed.norm();
        if distance <= f64::EPSILON {
            return Geodetic::new(0.0, 0.0, -self.radius);
        }
        Geodetic {
            latitude: (fixed.z / distance).clamp(-1.0, 1.0).asin().to_degrees(),
            longitude: fixed.y.atan2(fixed.x).to_degrees(),
            altitude: distance - self.radius,
        }
    }
}

// --- Body Lookup ---
/// Resolves reference bodies by name.
/// The host's body registry implements this, as does the plain `BodyTable`.
pub trait BodyCatalog {
    fn find(&self, name: &str) -> Option<&ReferenceBody>;
}

#[derive(Debug, Clone, Default)]
pub struct BodyTable {
    bodies: HashMap<String, ReferenceBody>,
}

impl BodyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a body, replacing any previous body with the same name.
    pub fn insert(&mut self, body: ReferenceBody) -> Option<ReferenceBody> {
        self.bodies.insert(body.name.clone(), body)
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }
}

impl FromIterator<ReferenceBody> for BodyTable {
    fn from_iter<I: IntoIterator<Item = ReferenceBody>>(iter: I) -> Self {
        let mut table = Self::new();
        for body in iter {
            table.insert(body);
        }
        table
    }
}

impl BodyCatalog for BodyTable {
    fn find(&self, name: &str) -> Option<&ReferenceBody> {
        self.bodies.get(name)
    }
}

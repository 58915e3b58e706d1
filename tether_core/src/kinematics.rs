// tether_core/src/kinematics.rs

//! Low-order dead reckoning of positions and rotations across network latency.

use nalgebra::{Unit, UnitQuaternion, Vector3};
use num_traits::{Float, FloatConst};

/// Unit quaternions whose vector part is shorter than this have no usable axis.
const AXIS_EPSILON: f64 = 1e-9;

/// Result of extrapolating a surface-relative linear state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extrapolation {
    pub velocity: Vector3<f64>,
    /// Displacement to add to the observed position.
    pub offset: Vector3<f64>,
}

/// Second-order dead reckoning over `dt`.
///
/// While `|dt| < horizon` the velocity is advanced by `a·dt` and the position
/// offset is `v'·dt + ½·a·dt²`. At or beyond the horizon the observed
/// velocity is kept and the offset is zero.
pub fn dead_reckon(
    velocity: Vector3<f64>,
    acceleration: Vector3<f64>,
    dt: f64,
    horizon: f64,
) -> Extrapolation {
    if !(dt.abs() < horizon) {
        return Extrapolation {
            velocity,
            offset: Vector3::zeros(),
        };
    }
    let extrapolated = velocity + acceleration * dt;
    Extrapolation {
        velocity: extrapolated,
        offset: extrapolated * dt + acceleration * (0.5 * dt * dt),
    }
}

/// Wraps an angle in degrees into `[-180, 180]`.
pub fn wrap_degrees<T: Float + FloatConst>(angle: T) -> T {
    let half_turn = T::PI().to_degrees();
    let full_turn = half_turn + half_turn;
    let reduced = angle % full_turn;
    if reduced > half_turn {
        reduced - full_turn
    } else if reduced < -half_turn {
        reduced + full_turn
    } else {
        reduced
    }
}

/// Angle (degrees, in `[0, 360]`) and axis of a rotation, taken straight
/// from the quaternion components without flipping to the shortest arc.
/// A rotation with no axis reports the +X axis.
pub fn angle_axis_degrees(rotation: &UnitQuaternion<f64>) -> (f64, Unit<Vector3<f64>>) {
    let q = rotation.quaternion();
    let w = q.w.clamp(-1.0, 1.0);
    let angle = 2.0 * w.acos();
    let axis = Unit::try_new(q.imag(), AXIS_EPSILON).unwrap_or_else(Vector3::x_axis);
    (angle.to_degrees(), axis)
}

/// First-order angular dead reckoning.
///
/// Takes the rotation that carried `previous` to `current`, scales its
/// angle (wrapped to `[-180°, 180°]` first) by `scaling`, and applies the
/// scaled rotation on top of `current`. `scaling == 0` returns `current`.
pub fn extrapolate_rotation(
    previous: &UnitQuaternion<f64>,
    current: &UnitQuaternion<f64>,
    scaling: f64,
) -> UnitQuaternion<f64> {
    let delta = current * previous.inverse();
    let (angle, axis) = angle_axis_degrees(&delta);
    let scaled = (wrap_degrees(angle) * scaling) % 360.0;
    UnitQuaternion::from_axis_angle(&axis, scaled.to_radians()) * current
}

/// The shortest rotation taking direction `from` onto direction `to`.
///
/// Antiparallel directions turn half a revolution about any perpendicular
/// axis. Zero-length input yields the identity.
pub fn from_to_rotation(from: &Vector3<f64>, to: &Vector3<f64>) -> UnitQuaternion<f64> {
    if from.norm() <= AXIS_EPSILON || to.norm() <= AXIS_EPSILON {
        return UnitQuaternion::identity();
    }
    if let Some(rotation) = UnitQuaternion::rotation_between(from, to) {
        return rotation;
    }
    // Antiparallel: pick the basis axis least aligned with `from`.
    let candidate = if from.x.abs() < 0.9 * from.norm() {
        Vector3::x()
    } else {
        Vector3::y()
    };
    match Unit::try_new(from.cross(&candidate), AXIS_EPSILON) {
        Some(axis) => UnitQuaternion::from_axis_angle(&axis, std::f64::consts::PI),
        None => UnitQuaternion::identity(),
    }
}

/// Velocity of a point rigidly attached to a body rotating at `angular_velocity`
/// about `center_of_mass`, whose centre moves at `base_velocity`.
pub fn rigid_point_velocity(
    base_velocity: &Vector3<f64>,
    angular_velocity: &Vector3<f64>,
    point: &Vector3<f64>,
    center_of_mass: &Vector3<f64>,
) -> Vector3<f64> {
    base_velocity + angular_velocity.cross(&(point - center_of_mass))
}

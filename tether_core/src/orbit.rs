// tether_core/src/orbit.rs

//! Two-body Keplerian orbits around a reference body.
//!
//! An [`Orbit`] is stored as a state vector pair at an epoch, relative to the
//! reference body's centre in the inertial frame. That keeps near-radial,
//! near-parabolic and hyperbolic trajectories (a vessel hopping just above the
//! ground is all three at once) on the same code path: propagation uses the
//! universal-variable formulation, which does not care about the conic type.
//! Classical elements are only produced/consumed at the edges.

use nalgebra::{UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};
use std::f64::consts::{PI, TAU};
use thiserror::Error;

const KEPLER_TOLERANCE: f64 = 1e-12;
const KEPLER_MAX_ITERATIONS: usize = 100;
const UNIVERSAL_TOLERANCE: f64 = 1e-10;
const UNIVERSAL_MAX_ITERATIONS: usize = 200;
/// Below this, eccentricity or inclination is treated as exactly zero.
const SINGULARITY_TOLERANCE: f64 = 1e-11;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum OrbitError {
    #[error("degenerate orbit: {0}")]
    Degenerate(&'static str),
    #[error("Kepler solver did not converge after {iterations} iterations")]
    NoConvergence { iterations: usize },
}

/// The seven classical orbital elements. Angles are in radians.
/// `semi_major_axis` is negative for hyperbolic trajectories.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrbitalElements {
    pub inclination: f64,
    pub eccentricity: f64,
    pub semi_major_axis: f64,
    pub longitude_of_ascending_node: f64,
    pub argument_of_periapsis: f64,
    pub mean_anomaly_at_epoch: f64,
    pub epoch: f64,
}

impl OrbitalElements {
    /// Checks that the elements describe an elliptic or hyperbolic orbit.
    pub fn validate(&self) -> Result<(), &'static str> {
        let values = [
            self.inclination,
            self.eccentricity,
            self.semi_major_axis,
            self.longitude_of_ascending_node,
            self.argument_of_periapsis,
            self.mean_anomaly_at_epoch,
            self.epoch,
        ];
        if values.iter().any(|v| !v.is_finite()) {
            return Err("orbital elements must be finite");
        }
        if self.eccentricity < 0.0 {
            return Err("eccentricity must be non-negative");
        }
        if (self.eccentricity - 1.0).abs() < SINGULARITY_TOLERANCE {
            return Err("parabolic orbits are not representable");
        }
        if self.eccentricity < 1.0 && self.semi_major_axis <= 0.0 {
            return Err("elliptic orbits need a positive semi-major axis");
        }
        if self.eccentricity > 1.0 && self.semi_major_axis >= 0.0 {
            return Err("hyperbolic orbits need a negative semi-major axis");
        }
        Ok(())
    }
}

/// Position and velocity relative to the reference body's centre.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateVector {
    pub position: Vector3<f64>,
    pub velocity: Vector3<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Orbit {
    position: Vector3<f64>,
    velocity: Vector3<f64>,
    gravitational_parameter: f64,
    epoch: f64,
}

impl Orbit {
    /// Builds the orbit passing through `position` with `velocity` at `epoch`.
    pub fn from_state_vectors(
        position: Vector3<f64>,
        velocity: Vector3<f64>,
        gravitational_parameter: f64,
        epoch: f64,
    ) -> Result<Self, OrbitError> {
        if !(gravitational_parameter.is_finite() && gravitational_parameter > 0.0) {
            return Err(OrbitError::Degenerate("gravitational parameter must be positive"));
        }
        if !(position.iter().all(|v| v.is_finite())
            && velocity.iter().all(|v| v.is_finite())
            && epoch.is_finite())
        {
            return Err(OrbitError::Degenerate("state vectors must be finite"));
        }
        if position.norm() <= f64::EPSILON {
            return Err(OrbitError::Degenerate("position is at the body's centre"));
        }
        Ok(Self {
            position,
            velocity,
            gravitational_parameter,
            epoch,
        })
    }

    /// Builds the orbit described by classical elements; the stored state is
    /// the one at `elements.epoch`.
    pub fn from_elements(
        elements: &OrbitalElements,
        gravitational_parameter: f64,
    ) -> Result<Self, OrbitError> {
        elements.validate().map_err(OrbitError::Degenerate)?;

        let e = elements.eccentricity;
        let a = elements.semi_major_axis;
        let semi_latus_rectum = a * (1.0 - e * e);

        let true_anomaly = if e < 1.0 {
            let ecc = solve_elliptic_kepler(elements.mean_anomaly_at_epoch, e)?;
            2.0 * ((1.0 + e).sqrt() * (ecc / 2.0).sin())
                .atan2((1.0 - e).sqrt() * (ecc / 2.0).cos())
        } else {
            let hyp = solve_hyperbolic_kepler(elements.mean_anomaly_at_epoch, e)?;
            2.0 * ((e + 1.0).sqrt() * (hyp / 2.0).sinh())
                .atan2((e - 1.0).sqrt() * (hyp / 2.0).cosh())
        };

        let (sin_nu, cos_nu) = true_anomaly.sin_cos();
        let radius = semi_latus_rectum / (1.0 + e * cos_nu);

        // Perifocal frame: x towards periapsis, z along the angular momentum.
        let position_pf = Vector3::new(radius * cos_nu, radius * sin_nu, 0.0);
        let velocity_pf = (gravitational_parameter / semi_latus_rectum).sqrt()
            * Vector3::new(-sin_nu, e + cos_nu, 0.0);

        let to_inertial = perifocal_to_inertial(
            elements.longitude_of_ascending_node,
            elements.inclination,
            elements.argument_of_periapsis,
        );

        Self::from_state_vectors(
            to_inertial * position_pf,
            to_inertial * velocity_pf,
            gravitational_parameter,
            elements.epoch,
        )
    }

    pub fn epoch(&self) -> f64 {
        self.epoch
    }

    pub fn gravitational_parameter(&self) -> f64 {
        self.gravitational_parameter
    }

    /// Specific orbital energy, `v²/2 - μ/r`.
    pub fn specific_energy(&self) -> f64 {
        self.velocity.norm_squared() / 2.0 - self.gravitational_parameter / self.position.norm()
    }

    /// Orbital period, `None` for open trajectories.
    pub fn period(&self) -> Option<f64> {
        let alpha = self.reciprocal_semi_major_axis();
        (alpha > 0.0).then(|| TAU / (self.gravitational_parameter.sqrt() * alpha.powf(1.5)))
    }

    /// `1/a`, positive for ellipses, negative for hyperbolas, ~0 near parabolic.
    fn reciprocal_semi_major_axis(&self) -> f64 {
        2.0 / self.position.norm() - self.velocity.norm_squared() / self.gravitational_parameter
    }

    /// Position and velocity relative to the body's centre at time `t`.
    /// Exact (no propagation) when `t` equals the epoch.
    pub fn state_at(&self, t: f64) -> Result<StateVector, OrbitError> {
        let mut dt = t - self.epoch;
        if dt == 0.0 {
            return Ok(StateVector {
                position: self.position,
                velocity: self.velocity,
            });
        }
        if !dt.is_finite() {
            return Err(OrbitError::Degenerate("propagation time must be finite"));
        }

        let mu = self.gravitational_parameter;
        let sqrt_mu = mu.sqrt();
        let r0 = self.position.norm();
        let radial_velocity = self.position.dot(&self.velocity) / r0;
        let alpha = self.reciprocal_semi_major_axis();

        // Whole revolutions do not change the state.
        if let Some(period) = self.period() {
            dt %= period;
        }

        let chi = solve_universal_anomaly(r0, radial_velocity, alpha, sqrt_mu, dt)?;

        let z = alpha * chi * chi;
        let (c, s) = stumpff(z);
        let chi2 = chi * chi;

        // Lagrange coefficients.
        let f = 1.0 - chi2 / r0 * c;
        let g = dt - chi2 * chi / sqrt_mu * s;
        let position = f * self.position + g * self.velocity;
        let r = position.norm();
        if r <= f64::EPSILON {
            return Err(OrbitError::Degenerate("trajectory passes through the body's centre"));
        }
        let f_dot = sqrt_mu / (r * r0) * (alpha * chi2 * chi * s - chi);
        let g_dot = 1.0 - chi2 / r * c;
        let velocity = f_dot * self.position + g_dot * self.velocity;

        Ok(StateVector { position, velocity })
    }

    /// The classical elements of this orbit, with the epoch kept as-is.
    ///
    /// Circular orbits report an argument of periapsis of zero (the anomaly is
    /// measured from the node instead) and equatorial orbits a longitude of
    /// ascending node of zero (angles are measured from the +X axis).
    pub fn elements(&self) -> Result<OrbitalElements, OrbitError> {
        let mu = self.gravitational_parameter;
        let r = self.position;
        let v = self.velocity;
        let r_norm = r.norm();

        let h = r.cross(&v);
        let h_norm = h.norm();
        if h_norm <= SINGULARITY_TOLERANCE * r_norm * v.norm().max(1.0) {
            return Err(OrbitError::Degenerate("radial trajectory has no orbital plane"));
        }

        let energy = self.specific_energy();
        if energy.abs() <= SINGULARITY_TOLERANCE * mu / r_norm {
            return Err(OrbitError::Degenerate("parabolic trajectory"));
        }
        let semi_major_axis = -mu / (2.0 * energy);

        let inclination = (h.z / h_norm).clamp(-1.0, 1.0).acos();
        let node = Vector3::new(-h.y, h.x, 0.0);
        let node_norm = node.norm();
        let e_vec = ((v.norm_squared() - mu / r_norm) * r - r.dot(&v) * v) / mu;
        let eccentricity = e_vec.norm();

        let equatorial = node_norm <= SINGULARITY_TOLERANCE * h_norm;
        let circular = eccentricity <= SINGULARITY_TOLERANCE;
        let retrograde = h.z < 0.0;

        let longitude_of_ascending_node = if equatorial {
            0.0
        } else {
            let raan = (node.x / node_norm).clamp(-1.0, 1.0).acos();
            if node.y < 0.0 {
                TAU - raan
            } else {
                raan
            }
        };

        let argument_of_periapsis = if circular {
            0.0
        } else if equatorial {
            let w = e_vec.y.atan2(e_vec.x);
            (if retrograde { -w } else { w }).rem_euclid(TAU)
        } else {
            let w = (node.dot(&e_vec) / (node_norm * eccentricity))
                .clamp(-1.0, 1.0)
                .acos();
            if e_vec.z < 0.0 {
                TAU - w
            } else {
                w
            }
        };

        let true_anomaly = if circular {
            if equatorial {
                let l = r.y.atan2(r.x);
                (if retrograde { -l } else { l }).rem_euclid(TAU)
            } else {
                let u = (node.dot(&r) / (node_norm * r_norm))
                    .clamp(-1.0, 1.0)
                    .acos();
                if r.z < 0.0 {
                    TAU - u
                } else {
                    u
                }
            }
        } else {
            let nu = (e_vec.dot(&r) / (eccentricity * r_norm))
                .clamp(-1.0, 1.0)
                .acos();
            if r.dot(&v) < 0.0 {
                TAU - nu
            } else {
                nu
            }
        };

        let mean_anomaly_at_epoch = if eccentricity < 1.0 {
            let e = eccentricity;
            let ecc = 2.0
                * ((1.0 - e).sqrt() * (true_anomaly / 2.0).sin())
                    .atan2((1.0 + e).sqrt() * (true_anomaly / 2.0).cos());
            (ecc - e * ecc.sin()).rem_euclid(TAU)
        } else {
            let e = eccentricity;
            let hyp = 2.0 * (((e - 1.0) / (e + 1.0)).sqrt() * (true_anomaly / 2.0).tan()).atanh();
            e * hyp.sinh() - hyp
        };

        Ok(OrbitalElements {
            inclination,
            eccentricity,
            semi_major_axis,
            longitude_of_ascending_node,
            argument_of_periapsis,
            mean_anomaly_at_epoch,
            epoch: self.epoch,
        })
    }
}

/// Rotation from the perifocal frame into the body's inertial frame
/// (3-1-3 sequence: node, inclination, periapsis).
fn perifocal_to_inertial(raan: f64, inclination: f64, argument_of_periapsis: f64) -> UnitQuaternion<f64> {
    UnitQuaternion::from_axis_angle(&Vector3::z_axis(), raan)
        * UnitQuaternion::from_axis_angle(&Vector3::x_axis(), inclination)
        * UnitQuaternion::from_axis_angle(&Vector3::z_axis(), argument_of_periapsis)
}

/// Solves `M = E - e sin E` for the eccentric anomaly with Newton-Raphson.
fn solve_elliptic_kepler(mean_anomaly: f64, eccentricity: f64) -> Result<f64, OrbitError> {
    // Reduce to (-PI, PI] so the starting guess is always close.
    let m = (mean_anomaly + PI).rem_euclid(TAU) - PI;
    let mut ecc = if eccentricity > 0.8 { PI.copysign(m) } else { m };

    for _ in 0..KEPLER_MAX_ITERATIONS {
        let delta = (ecc - eccentricity * ecc.sin() - m) / (1.0 - eccentricity * ecc.cos());
        ecc -= delta;
        if delta.abs() < KEPLER_TOLERANCE {
            return Ok(ecc);
        }
    }
    Err(OrbitError::NoConvergence {
        iterations: KEPLER_MAX_ITERATIONS,
    })
}

/// Solves `M = e sinh H - H` for the hyperbolic anomaly with Newton-Raphson.
fn solve_hyperbolic_kepler(mean_anomaly: f64, eccentricity: f64) -> Result<f64, OrbitError> {
    let m = mean_anomaly;
    let mut hyp = if m.abs() < 1.0 {
        m / (eccentricity - 1.0)
    } else {
        m.signum() * (2.0 * m.abs() / eccentricity + 1.8).ln()
    };

    for _ in 0..KEPLER_MAX_ITERATIONS {
        let delta = (eccentricity * hyp.sinh() - hyp - m) / (eccentricity * hyp.cosh() - 1.0);
        hyp -= delta;
        if delta.abs() < KEPLER_TOLERANCE * hyp.abs().max(1.0) {
            return Ok(hyp);
        }
    }
    Err(OrbitError::NoConvergence {
        iterations: KEPLER_MAX_ITERATIONS,
    })
}

/// Stumpff functions `(C(z), S(z))`, with series expansions near zero to
/// avoid cancellation.
fn stumpff(z: f64) -> (f64, f64) {
    if z.abs() < 1e-6 {
        (0.5 - z / 24.0 + z * z / 720.0, 1.0 / 6.0 - z / 120.0 + z * z / 5040.0)
    } else if z > 0.0 {
        let sz = z.sqrt();
        ((1.0 - sz.cos()) / z, (sz - sz.sin()) / (sz * sz * sz))
    } else {
        let sz = (-z).sqrt();
        ((sz.cosh() - 1.0) / -z, (sz.sinh() - sz) / (sz * sz * sz))
    }
}

/// Newton iteration on the universal Kepler equation.
fn solve_universal_anomaly(
    r0: f64,
    radial_velocity: f64,
    alpha: f64,
    sqrt_mu: f64,
    dt: f64,
) -> Result<f64, OrbitError> {
    let mut chi = if alpha > SINGULARITY_TOLERANCE {
        sqrt_mu * alpha * dt
    } else if alpha < -SINGULARITY_TOLERANCE {
        let a = 1.0 / alpha;
        let guess = dt.signum()
            * (-a).sqrt()
            * ((-2.0 * sqrt_mu * sqrt_mu * alpha * dt)
                / (r0 * radial_velocity + dt.signum() * (-sqrt_mu * sqrt_mu * a).sqrt() * (1.0 - r0 * alpha)))
                .ln();
        if guess.is_finite() {
            guess
        } else {
            sqrt_mu * dt / r0
        }
    } else {
        sqrt_mu * dt / r0
    };

    let sigma = r0 * radial_velocity / sqrt_mu;
    for _ in 0..UNIVERSAL_MAX_ITERATIONS {
        let chi2 = chi * chi;
        let z = alpha * chi2;
        let (c, s) = stumpff(z);
        let f = sigma * chi2 * c + (1.0 - alpha * r0) * chi2 * chi * s + r0 * chi - sqrt_mu * dt;
        let f_prime = sigma * chi * (1.0 - z * s) + (1.0 - alpha * r0) * chi2 * c + r0;
        if !(f.is_finite() && f_prime.is_finite()) || f_prime == 0.0 {
            break;
        }
        let delta = f / f_prime;
        chi -= delta;
        if delta.abs() < UNIVERSAL_TOLERANCE * chi.abs().max(1.0) {
            return Ok(chi);
        }
    }
    Err(OrbitError::NoConvergence {
        iterations: UNIVERSAL_MAX_ITERATIONS,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    // Kerbin-like body: mu in m^3/s^2.
    const MU: f64 = 3.5316e12;
    const RADIUS: f64 = 600_000.0;

    fn assert_vector_close(a: &Vector3<f64>, b: &Vector3<f64>, epsilon: f64) {
        assert_abs_diff_eq!(a.x, b.x, epsilon = epsilon);
        assert_abs_diff_eq!(a.y, b.y, epsilon = epsilon);
        assert_abs_diff_eq!(a.z, b.z, epsilon = epsilon);
    }

    fn circular_orbit(radius: f64) -> Orbit {
        let speed = (MU / radius).sqrt();
        Orbit::from_state_vectors(
            Vector3::new(radius, 0.0, 0.0),
            Vector3::new(0.0, speed, 0.0),
            MU,
            0.0,
        )
        .unwrap()
    }

    #[test]
    fn state_at_epoch_is_exact() {
        let position = Vector3::new(RADIUS + 105.0, 3.0, -2.0);
        let velocity = Vector3::new(10.0, 174.5, 0.0);
        let orbit = Orbit::from_state_vectors(position, velocity, MU, 101.5).unwrap();
        let state = orbit.state_at(101.5).unwrap();
        assert_eq!(state.position, position);
        assert_eq!(state.velocity, velocity);
    }

    #[test]
    fn quarter_period_of_circular_orbit_turns_ninety_degrees() {
        let radius = RADIUS + 100_000.0;
        let orbit = circular_orbit(radius);
        let period = orbit.period().unwrap();
        let state = orbit.state_at(period / 4.0).unwrap();
        assert_vector_close(&state.position, &Vector3::new(0.0, radius, 0.0), 1e-3);
    }

    #[test]
    fn many_revolutions_return_to_start() {
        let orbit = Orbit::from_state_vectors(
            Vector3::new(RADIUS + 80_000.0, 0.0, 0.0),
            Vector3::new(0.0, 2_500.0, 400.0),
            MU,
            0.0,
        )
        .unwrap();
        let period = orbit.period().unwrap();
        let state = orbit.state_at(37.0 * period).unwrap();
        assert_vector_close(&state.position, &Vector3::new(RADIUS + 80_000.0, 0.0, 0.0), 1e-2);
        assert_vector_close(&state.velocity, &Vector3::new(0.0, 2_500.0, 400.0), 1e-5);
    }

    #[test]
    fn suborbital_hop_conserves_energy_and_momentum() {
        // A slow vessel just above the ground: nearly radial, very eccentric.
        let orbit = Orbit::from_state_vectors(
            Vector3::new(RADIUS + 100.0, 0.0, 0.0),
            Vector3::new(5.0, 10.0, 0.0),
            MU,
            0.0,
        )
        .unwrap();
        let later = orbit.state_at(20.0).unwrap();
        let propagated =
            Orbit::from_state_vectors(later.position, later.velocity, MU, 20.0).unwrap();

        assert_relative_eq!(orbit.specific_energy(), propagated.specific_energy(), max_relative = 1e-9);
        let h0 = Vector3::new(RADIUS + 100.0, 0.0, 0.0).cross(&Vector3::new(5.0, 10.0, 0.0));
        let h1 = later.position.cross(&later.velocity);
        assert!((h0 - h1).norm() / h0.norm() < 1e-9);
        // It is falling: the radius shrank.
        assert!(later.position.norm() < RADIUS + 100.0);
    }

    #[test]
    fn hyperbolic_escape_conserves_energy() {
        let orbit = Orbit::from_state_vectors(
            Vector3::new(RADIUS + 50_000.0, 0.0, 0.0),
            Vector3::new(0.0, 4_500.0, 0.0),
            MU,
            0.0,
        )
        .unwrap();
        assert!(orbit.period().is_none());
        let later = orbit.state_at(3_600.0).unwrap();
        let propagated =
            Orbit::from_state_vectors(later.position, later.velocity, MU, 3_600.0).unwrap();
        assert_relative_eq!(orbit.specific_energy(), propagated.specific_energy(), max_relative = 1e-8);
        assert!(later.position.norm() > RADIUS + 50_000.0);
    }

    #[test]
    fn elements_survive_a_trip_through_state_vectors() {
        let elements = OrbitalElements {
            inclination: 0.4,
            eccentricity: 0.2,
            semi_major_axis: 900_000.0,
            longitude_of_ascending_node: 1.1,
            argument_of_periapsis: 2.3,
            mean_anomaly_at_epoch: 0.7,
            epoch: 1_234.0,
        };
        let orbit = Orbit::from_elements(&elements, MU).unwrap();
        let recovered = orbit.elements().unwrap();

        assert_abs_diff_eq!(recovered.inclination, elements.inclination, epsilon = 1e-9);
        assert_abs_diff_eq!(recovered.eccentricity, elements.eccentricity, epsilon = 1e-9);
        assert_relative_eq!(recovered.semi_major_axis, elements.semi_major_axis, max_relative = 1e-9);
        assert_abs_diff_eq!(
            recovered.longitude_of_ascending_node,
            elements.longitude_of_ascending_node,
            epsilon = 1e-9
        );
        assert_abs_diff_eq!(recovered.argument_of_periapsis, elements.argument_of_periapsis, epsilon = 1e-8);
        assert_abs_diff_eq!(recovered.mean_anomaly_at_epoch, elements.mean_anomaly_at_epoch, epsilon = 1e-8);
        assert_eq!(recovered.epoch, elements.epoch);
    }

    #[test]
    fn hyperbolic_elements_survive_a_trip_through_state_vectors() {
        let elements = OrbitalElements {
            inclination: 0.1,
            eccentricity: 1.6,
            semi_major_axis: -1_500_000.0,
            longitude_of_ascending_node: 0.3,
            argument_of_periapsis: 0.9,
            mean_anomaly_at_epoch: 0.5,
            epoch: 0.0,
        };
        let recovered = Orbit::from_elements(&elements, MU).unwrap().elements().unwrap();
        assert_abs_diff_eq!(recovered.eccentricity, 1.6, epsilon = 1e-9);
        assert_relative_eq!(recovered.semi_major_axis, -1_500_000.0, max_relative = 1e-9);
        assert_abs_diff_eq!(recovered.mean_anomaly_at_epoch, 0.5, epsilon = 1e-8);
    }

    #[test]
    fn circular_equatorial_orbit_uses_conventional_angles() {
        let orbit = circular_orbit(RADIUS + 70_000.0);
        let elements = orbit.elements().unwrap();
        assert_abs_diff_eq!(elements.inclination, 0.0, epsilon = 1e-12);
        assert_eq!(elements.longitude_of_ascending_node, 0.0);
        assert_eq!(elements.argument_of_periapsis, 0.0);
        assert_abs_diff_eq!(elements.mean_anomaly_at_epoch, 0.0, epsilon = 1e-9);

        let rebuilt = Orbit::from_elements(&elements, MU).unwrap();
        let state = rebuilt.state_at(0.0).unwrap();
        assert_vector_close(&state.position, &Vector3::new(RADIUS + 70_000.0, 0.0, 0.0), 1e-3);
    }

    #[test]
    fn parabolic_and_inconsistent_elements_are_rejected() {
        let mut elements = OrbitalElements {
            inclination: 0.0,
            eccentricity: 1.0,
            semi_major_axis: 1.0e6,
            longitude_of_ascending_node: 0.0,
            argument_of_periapsis: 0.0,
            mean_anomaly_at_epoch: 0.0,
            epoch: 0.0,
        };
        assert!(matches!(Orbit::from_elements(&elements, MU), Err(OrbitError::Degenerate(_))));

        elements.eccentricity = 1.3; // hyperbolic with a positive semi-major axis
        assert!(matches!(Orbit::from_elements(&elements, MU), Err(OrbitError::Degenerate(_))));
    }

    #[test]
    fn radial_trajectory_has_no_elements() {
        let orbit = Orbit::from_state_vectors(
            Vector3::new(RADIUS, 0.0, 0.0),
            Vector3::new(50.0, 0.0, 0.0),
            MU,
            0.0,
        )
        .unwrap();
        assert!(orbit.elements().is_err());
        // ...but it still propagates.
        assert!(orbit.state_at(10.0).is_ok());
    }
}

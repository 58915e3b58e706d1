// tether_sim/src/simulation/plugins/world/terrain.rs

use nalgebra::Vector3;
use std::f64::consts::TAU;
use tether_core::prelude::{GroundSample, ReferenceBody, TerrainSampler};

use crate::simulation::config::structs::RippledTerrainConfig;

/// Fraction of a wavelength used as the finite-difference step for normals.
const NORMAL_STEP_FRACTION: f64 = 1.0e-3;

/// A sinusoidal height field over latitude/longitude.
///
/// Stands in for a peer's terrain mesh. Two peers with slightly different
/// ripples disagree about the ground height and slope exactly the way two
/// clients with different mesh detail do.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RippledTerrain {
    base_height: f64,
    amplitude: f64,
    wavelength_deg: f64,
    phase_deg: f64,
}

impl RippledTerrain {
    pub fn new(base_height: f64, amplitude: f64, wavelength_deg: f64, phase_deg: f64) -> Self {
        Self {
            base_height,
            amplitude,
            wavelength_deg,
            phase_deg,
        }
    }

    pub fn from_config(config: &RippledTerrainConfig) -> Self {
        Self::new(
            config.base_height,
            config.amplitude,
            config.wavelength_deg,
            config.phase_deg,
        )
    }

    /// Ground height above the body radius, in meters.
    pub fn height_at(&self, latitude: f64, longitude: f64) -> f64 {
        if !(self.wavelength_deg > 0.0) {
            return self.base_height;
        }
        let phase = self.phase_deg.to_radians();
        let u = TAU * latitude / self.wavelength_deg + phase;
        let v = TAU * longitude / self.wavelength_deg;
        self.base_height + self.amplitude * u.sin() * v.cos()
    }

    fn surface_point(&self, body: &ReferenceBody, latitude: f64, longitude: f64) -> Vector3<f64> {
        body.body_fixed_position(latitude, longitude, self.height_at(latitude, longitude))
    }
}

impl TerrainSampler for RippledTerrain {
    fn sample_ground(
        &self,
        latitude: f64,
        longitude: f64,
        body: &ReferenceBody,
    ) -> Option<GroundSample> {
        if !(latitude.is_finite() && longitude.is_finite()) {
            return None;
        }

        // Central differences along the two surface directions.
        let h = (self.wavelength_deg * NORMAL_STEP_FRACTION).max(1.0e-9);
        let along_longitude = self.surface_point(body, latitude, longitude + h)
            - self.surface_point(body, latitude, longitude - h);
        let along_latitude = self.surface_point(body, latitude + h, longitude)
            - self.surface_point(body, latitude - h, longitude);

        // East × North points up. Degenerates at the poles.
        let normal = along_longitude
            .cross(&along_latitude)
            .try_normalize(1.0e-12)
            .unwrap_or_else(|| body.surface_normal(latitude, longitude));

        Some(GroundSample {
            altitude: self.height_at(latitude, longitude),
            normal,
        })
    }
}

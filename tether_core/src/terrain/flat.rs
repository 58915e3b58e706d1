use crate::bodies::ReferenceBody;
use crate::terrain::{GroundSample, TerrainSampler};

/// Perfectly smooth terrain at a constant height above the body's radius.
/// The normal is always the radial direction.
#[derive(Default, Debug, Clone, Copy, PartialEq)]
pub struct FlatTerrain {
    pub height: f64,
}

impl FlatTerrain {
    pub fn new(height: f64) -> Self {
        Self { height }
    }
}

impl TerrainSampler for FlatTerrain {
    fn sample_ground(&self, latitude: f64, longitude: f64, body: &ReferenceBody) -> Option<GroundSample> {
        Some(GroundSample {
            altitude: self.height,
            normal: body.surface_normal(latitude, longitude),
        })
    }
}

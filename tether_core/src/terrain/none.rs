use crate::bodies::ReferenceBody;
use crate::terrain::{GroundSample, TerrainSampler};

/// A sampler for hosts without terrain: the ground is never available.
/// Reconciliation then skips the terrain height and normal corrections.
#[derive(Default, Debug, Clone, Copy)]
pub struct NoTerrain;

impl TerrainSampler for NoTerrain {
    fn sample_ground(&self, _latitude: f64, _longitude: f64, _body: &ReferenceBody) -> Option<GroundSample> {
        None
    }
}

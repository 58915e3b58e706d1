// tether_core/src/terrain/mod.rs

use crate::bodies::ReferenceBody;
use dyn_clone::DynClone;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

// --- Terrain Data Structures ---
/// Ground height and surface normal under a latitude/longitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroundSample {
    /// Height of the ground above the body's radius.
    pub altitude: f64,
    /// Unit surface normal, in the body-fixed frame.
    pub normal: Vector3<f64>,
}

// --- The TerrainSampler Trait ("Contract") ---
/// Samples the local terrain model of a reference body.
///
/// Different peers may carry different terrain models (e.g. different mesh
/// detail), which is exactly what the reconciler corrects for. Sampling must be
/// synchronous and bounded. `None` means the ground is unavailable there
/// (not loaded, ray missed).
pub trait TerrainSampler: DynClone + Send + Sync {
    fn sample_ground(
        &self,
        latitude: f64,
        longitude: f64,
        body: &ReferenceBody,
    ) -> Option<GroundSample>;
}

dyn_clone::clone_trait_object!(TerrainSampler);

mod flat;
mod none;

pub use flat::FlatTerrain;
pub use none::NoTerrain;

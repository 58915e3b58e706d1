// tether_core/src/context.rs

use crate::bodies::BodyCatalog;
use crate::terrain::TerrainSampler;

/// Everything the host simulation provides to capture and reconciliation,
/// passed explicitly instead of being read from global state.
#[derive(Clone, Copy)]
pub struct SimContext<'a> {
    /// The local simulation clock, "now".
    pub universal_time: f64,
    /// Resolves `Snapshot::body_name`.
    pub bodies: &'a dyn BodyCatalog,
    /// This peer's own terrain model.
    pub terrain: &'a dyn TerrainSampler,
}

impl<'a> SimContext<'a> {
    pub fn new(
        universal_time: f64,
        bodies: &'a dyn BodyCatalog,
        terrain: &'a dyn TerrainSampler,
    ) -> Self {
        Self {
            universal_time,
            bodies,
            terrain,
        }
    }
}

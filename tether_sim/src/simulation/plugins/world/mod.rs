// tether_sim/src/simulation/plugins/world/mod.rs

pub mod terrain;

use bevy::prelude::*;
use tether_core::prelude::{BodyTable, TerrainSampler};

use crate::simulation::core::simulation_setup::scenario;
use terrain::RippledTerrain;

/// The reference bodies both peers agree on.
#[derive(Resource, Debug, Clone)]
pub struct Bodies(pub BodyTable);

/// Each peer's own terrain model. The sender samples the ground it reports,
/// the receiver samples the ground it corrects against.
#[derive(Resource, Clone)]
pub struct PeerTerrain {
    pub sender: Box<dyn TerrainSampler>,
    pub receiver: Box<dyn TerrainSampler>,
}

pub struct WorldPlugin;

impl Plugin for WorldPlugin {
    fn build(&self, app: &mut App) {
        let config = scenario(app);

        let body = config.body.to_reference_body();
        info!(
            "[WORLD] Reference body '{}': radius {} m, rotation period {} s",
            body.name, body.radius, body.rotation_period
        );

        app.insert_resource(Bodies(BodyTable::from_iter([body])))
            .insert_resource(PeerTerrain {
                sender: Box::new(RippledTerrain::from_config(&config.terrain.sender)),
                receiver: Box::new(RippledTerrain::from_config(&config.terrain.receiver)),
            });
    }
}

use bevy::prelude::Resource;
use clap::Parser;
use std::path::PathBuf;

use crate::simulation::config::{load_scenario, ScenarioConfig};

/// Tether: two simulated peers keeping a vessel in sync over a lossy link.
///
/// This struct defines the command-line arguments that can be passed to any
/// binary application that uses the Tether simulation library.
#[derive(Parser, Debug, Resource, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// The path to the scenario TOML file to run.
    #[arg(
        short,
        long,
        default_value = concat!(env!("CARGO_MANIFEST_DIR"), "/assets/scenarios/surface_climb.toml")
    )]
    pub scenario: PathBuf,

    /// Overrides the scenario's PRNG seed.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Overrides the scenario's duration, in simulation seconds.
    #[arg(short, long)]
    pub duration: Option<f64>,
}

impl Cli {
    /// Loads the scenario file and applies the command-line overrides.
    pub fn load_scenario(&self) -> Result<ScenarioConfig, figment::Error> {
        let mut config = load_scenario(&self.scenario)?;
        if let Some(seed) = self.seed {
            config.simulation.seed = Some(seed);
        }
        if let Some(duration) = self.duration {
            config.simulation.duration_seconds = duration;
        }
        config.validate()?;
        Ok(config)
    }
}

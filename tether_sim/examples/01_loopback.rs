// tether_sim/examples/01_loopback.rs

//! Two peers, one vessel, one lossy link, run headless to completion.
//!
//! This example demonstrates how to:
//! 1. Load a scenario from a TOML file (with command-line overrides).
//! 2. Set up a headless Bevy application with logging.
//! 3. Add the `TetherSimulationPlugin`, which contains both peers and the link.
//!
//! To run this example:
//! `cargo run -p tether_sim --example 01_loopback -- --scenario tether_sim/assets/scenarios/orbital_coast.toml`

use std::time::Duration;

use bevy::{app::ScheduleRunnerPlugin, log::LogPlugin, prelude::*};
use clap::Parser;

use tether_sim::cli::Cli;
use tether_sim::TetherSimulationPlugin;

fn main() -> AppExit {
    let cli = Cli::parse();

    // --- 1. Load Simulation Configuration ---
    let config = match cli.load_scenario() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Could not load scenario '{}': {}",
                cli.scenario.display(),
                e
            );
            return AppExit::error();
        }
    };

    let mut app = App::new();

    // --- 2. Add Core Bevy Plugins & Resources ---
    app.add_plugins((
        // No window, no renderer: step the schedule as fast as possible.
        MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::ZERO)),
        LogPlugin {
            level: bevy::log::Level::INFO,
            // A good filter for focusing on our crates' logs during development.
            filter: "info,tether_core=debug,tether_sim=debug".to_string(),
            ..default()
        },
    ))
    // Insert the loaded configuration before the plugins read it.
    .insert_resource(config)
    .insert_resource(cli);

    // --- 3. Add the Main Tether Simulation Plugin ---
    app.add_plugins(TetherSimulationPlugin);

    // --- 4. Run the App ---
    info!("Starting the loopback run...");
    app.run()
}

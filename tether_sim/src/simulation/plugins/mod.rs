// tether_sim/src/simulation/plugins/mod.rs

pub mod debugging;
pub mod network;
pub mod reconcile;
pub mod vessels;
pub mod world;

// tether_sim/src/simulation/plugins/debugging/mod.rs

pub mod drift_report;

// tether_core/src/lib.rs

pub mod bodies;
pub mod capture;
pub mod config;
pub mod context;
pub mod kinematics;
pub mod orbit;
pub mod prelude;
pub mod reconcile;
pub mod snapshot;
pub mod statistics;
pub mod terrain;
pub mod track;
pub mod types;
pub mod vessel;

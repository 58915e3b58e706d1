// tether_core/src/types.rs

use serde::{Deserialize, Serialize};
use std::fmt;

// --- Core Identifier ---
/// Stable identifier of a vessel, unique across the whole shared simulation.
/// Every peer refers to the same vessel by the same id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct VesselId(pub u64);

impl fmt::Display for VesselId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "vessel#{:016x}", self.0)
    }
}

// --- Geodetic Coordinates ---
/// A position expressed relative to a reference body's surface.
/// Latitude and longitude are in degrees, altitude is above the body's radius.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Geodetic {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
}

impl Geodetic {
    pub fn new(latitude: f64, longitude: f64, altitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            altitude,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite() && self.altitude.is_finite()
    }
}

// tether_core/src/config.rs

//! Tunable thresholds shared by snapshot capture and reconciliation.

use serde::Deserialize;

/// Below this altitude a vessel is captured (and reconciled) in the surface
/// representation, above it in orbital elements.
pub const DEFAULT_SURFACE_ALTITUDE_THRESHOLD: f64 = 10_000.0;

/// Latencies at or beyond this many simulation seconds are not extrapolated.
pub const DEFAULT_EXTRAPOLATION_HORIZON: f64 = 3.0;

/// The sender must have been this close to its own ground sample for the
/// terrain height and normal corrections to apply.
pub const DEFAULT_GROUND_PROXIMITY: f64 = 50.0;

/// How long remote control input keeps overriding local input after the
/// snapshot was captured.
pub const DEFAULT_CONTROL_OVERRIDE_DURATION: f64 = 5.0;

/// # ReconcilerConfig
/// The thresholds used by `SnapshotCapture` and `StateReconciler`.
/// Every field falls back to its `DEFAULT_*` constant when omitted from a config file.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReconcilerConfig {
    pub surface_altitude_threshold: f64,
    pub extrapolation_horizon: f64,
    pub ground_proximity: f64,
    pub control_override_duration: f64,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            surface_altitude_threshold: DEFAULT_SURFACE_ALTITUDE_THRESHOLD,
            extrapolation_horizon: DEFAULT_EXTRAPOLATION_HORIZON,
            ground_proximity: DEFAULT_GROUND_PROXIMITY,
            control_override_duration: DEFAULT_CONTROL_OVERRIDE_DURATION,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn omitted_fields_fall_back_to_defaults() {
        let config: ReconcilerConfig = serde_json::from_str(r#"{ "extrapolation_horizon": 1.5 }"#).unwrap();
        assert_eq!(config.extrapolation_horizon, 1.5);
        assert_eq!(config.ground_proximity, DEFAULT_GROUND_PROXIMITY);
        assert_eq!(config.control_override_duration, DEFAULT_CONTROL_OVERRIDE_DURATION);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result = serde_json::from_str::<ReconcilerConfig>(r#"{ "horizon": 1.5 }"#);
        assert!(result.is_err());
    }
}

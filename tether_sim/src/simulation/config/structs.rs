// tether_sim/src/simulation/config/structs.rs

use bevy::prelude::Resource;
use serde::Deserialize;
use tether_core::prelude::{
    ActionGroups, AutopilotMode, OrbitalElements, ReconcilerConfig, ReferenceBody,
};

// =========================================================================
// == Top-Level Configuration Resource ==
// =========================================================================

/// # ScenarioConfig
/// The primary Bevy resource holding all configuration for a loopback run.
/// This struct is the root of the data parsed from a `scenario.toml` file.
#[derive(Resource, Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)] // Fail if the TOML has fields not in our struct
pub struct ScenarioConfig {
    #[serde(default)] // Use default if the [simulation] section is missing
    pub simulation: Simulation,

    #[serde(default)]
    pub network: Network,

    #[serde(default)]
    pub body: Body,

    #[serde(default)]
    pub terrain: Terrain,

    #[serde(default)]
    pub vessel: VesselConfig,

    // Shared by the sender's capture and the receiver's reconciler.
    #[serde(default)]
    pub reconciler: ReconcilerConfig,
}

// =========================================================================
// == Configuration Sub-Structs ==
// These map directly to the sections in a scenario.toml file.
// =========================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Simulation {
    /// Optional seed for the pseudo-random number generator for determinism.
    pub seed: Option<u64>,
    /// Length of the run in simulation seconds.
    pub duration_seconds: f64,
    /// Fixed simulation steps per simulation second.
    pub tick_hz: f64,
    /// Universal time at the first step.
    #[serde(default)]
    pub start_time: f64,
    /// Seconds between periodic drift reports.
    pub report_interval: f64,
}

impl Default for Simulation {
    fn default() -> Self {
        Self {
            seed: None,
            duration_seconds: 120.0,
            tick_hz: 50.0,
            start_time: 0.0,
            report_interval: 10.0,
        }
    }
}

/// The simulated link between the two peers.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Network {
    /// Seconds between snapshots sent by the authoritative peer.
    pub broadcast_interval: f64,
    /// One-way latency in seconds, drawn from a normal distribution.
    pub latency_mean: f64,
    pub latency_stddev: f64,
    /// Chance that a single snapshot is lost in transit.
    pub drop_probability: f64,
}

impl Default for Network {
    fn default() -> Self {
        Self {
            broadcast_interval: 0.2,
            latency_mean: 0.15,
            latency_stddev: 0.05,
            drop_probability: 0.05,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Body {
    pub name: String,
    /// Mean radius in meters.
    pub radius: f64,
    /// μ = G·M in m^3/s^2.
    pub gravitational_parameter: f64,
    /// Sidereal rotation period in seconds; zero for a non-rotating body.
    #[serde(default)]
    pub rotation_period: f64,
    #[serde(default)]
    pub initial_rotation_deg: f64,
    #[serde(default)]
    pub inverse_rotation: bool,
}

impl Default for Body {
    fn default() -> Self {
        Self {
            name: "Kerbin".to_string(),
            radius: 600_000.0,
            gravitational_parameter: 3.5316e12,
            rotation_period: 21_549.425,
            initial_rotation_deg: 0.0,
            inverse_rotation: false,
        }
    }
}

impl Body {
    pub fn to_reference_body(&self) -> ReferenceBody {
        let mut body = ReferenceBody::new(self.name.clone(), self.radius, self.gravitational_parameter)
            .with_rotation_period(self.rotation_period)
            .with_inverse_rotation(self.inverse_rotation);
        body.initial_rotation = self.initial_rotation_deg.to_radians();
        body
    }
}

/// Each peer carries its own terrain model. Making them differ is what
/// exercises the receiver's altitude and surface normal corrections.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Terrain {
    #[serde(default)]
    pub sender: RippledTerrainConfig,
    #[serde(default = "RippledTerrainConfig::receiver_default")]
    pub receiver: RippledTerrainConfig,
}

impl Default for Terrain {
    fn default() -> Self {
        Self {
            sender: RippledTerrainConfig::default(),
            receiver: RippledTerrainConfig::receiver_default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RippledTerrainConfig {
    /// Mean ground height above the body radius, in meters.
    pub base_height: f64,
    /// Peak deviation from `base_height`, in meters.
    #[serde(default)]
    pub amplitude: f64,
    /// Length of one ripple in degrees of latitude/longitude.
    pub wavelength_deg: f64,
    #[serde(default)]
    pub phase_deg: f64,
}

impl Default for RippledTerrainConfig {
    fn default() -> Self {
        Self {
            base_height: 70.0,
            amplitude: 25.0,
            wavelength_deg: 0.5,
            phase_deg: 0.0,
        }
    }
}

impl RippledTerrainConfig {
    /// A slightly different mesh than the sender's default.
    fn receiver_default() -> Self {
        Self {
            base_height: 72.0,
            amplitude: 22.0,
            phase_deg: 10.0,
            ..Self::default()
        }
    }
}

// =========================================================================
// == Vessel Configuration ==
// =========================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VesselConfig {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub action_groups: ActionGroups,
    /// Autopilot mode held for the whole flight; absent means SAS off.
    #[serde(default)]
    pub autopilot: Option<AutopilotMode>,
    /// Roll rate about the vessel's forward axis, in rad/s.
    #[serde(default)]
    pub spin_rate: f64,
    #[serde(default = "default_parts")]
    pub parts: Vec<PartConfig>,
    #[serde(default)]
    pub flight: FlightConfig,
}

impl Default for VesselConfig {
    fn default() -> Self {
        Self {
            id: 1,
            name: "Untitled Space Craft".to_string(),
            action_groups: ActionGroups::default(),
            autopilot: None,
            spin_rate: 0.0,
            parts: default_parts(),
            flight: FlightConfig::default(),
        }
    }
}

fn default_parts() -> Vec<PartConfig> {
    vec![PartConfig {
        offset: [0.0; 3],
        mass: 1_000.0,
    }]
}

/// One rigid part, placed relative to the vessel's reference point.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PartConfig {
    /// Offset in meters, in world axes.
    pub offset: [f64; 3],
    /// Mass in kilograms.
    pub mass: f64,
}

/// How the authoritative peer moves its vessel.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FlightConfig {
    /// A scripted ascent over the surface, expressed in the body-fixed frame.
    Climb(ClimbProfile),
    /// A pure on-rails orbit.
    Coast(CoastProfile),
}

impl Default for FlightConfig {
    fn default() -> Self {
        FlightConfig::Climb(ClimbProfile::default())
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClimbProfile {
    /// Start position, degrees.
    pub latitude: f64,
    pub longitude: f64,
    /// Start altitude above the body radius, meters.
    pub altitude: f64,
    /// Compass heading of the ground track, degrees clockwise from north.
    pub heading_deg: f64,
    /// Horizontal speed over the surface, m/s.
    pub ground_speed: f64,
    /// Initial vertical speed, m/s.
    pub climb_rate: f64,
    /// Constant vertical acceleration, m/s^2.
    #[serde(default)]
    pub climb_acceleration: f64,
}

impl Default for ClimbProfile {
    fn default() -> Self {
        Self {
            latitude: -0.0972,
            longitude: -74.5577,
            altitude: 80.0,
            heading_deg: 90.0,
            ground_speed: 60.0,
            climb_rate: 5.0,
            climb_acceleration: 2.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CoastProfile {
    /// Altitudes above the body radius, meters.
    pub periapsis_altitude: f64,
    pub apoapsis_altitude: f64,
    #[serde(default)]
    pub inclination_deg: f64,
    #[serde(default)]
    pub longitude_of_ascending_node_deg: f64,
    #[serde(default)]
    pub argument_of_periapsis_deg: f64,
    #[serde(default)]
    pub mean_anomaly_deg: f64,
}

impl CoastProfile {
    /// The orbit's classical elements around `body`, at `epoch`.
    pub fn to_elements(&self, body: &ReferenceBody, epoch: f64) -> OrbitalElements {
        let periapsis = body.radius + self.periapsis_altitude;
        let apoapsis = body.radius + self.apoapsis_altitude;
        OrbitalElements {
            inclination: self.inclination_deg.to_radians(),
            eccentricity: (apoapsis - periapsis) / (apoapsis + periapsis),
            semi_major_axis: 0.5 * (apoapsis + periapsis),
            longitude_of_ascending_node: self.longitude_of_ascending_node_deg.to_radians(),
            argument_of_periapsis: self.argument_of_periapsis_deg.to_radians(),
            mean_anomaly_at_epoch: self.mean_anomaly_deg.to_radians(),
            epoch,
        }
    }
}

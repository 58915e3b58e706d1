// tether_sim/src/simulation/config/mod.rs

//! Loading and validating the scenario configuration from disk.

pub mod structs;

use std::path::Path;

use figment::{
    providers::{Format, Toml},
    Figment,
};

pub use structs::ScenarioConfig;
use structs::FlightConfig;

/// Reads a scenario TOML file into a validated `ScenarioConfig`.
pub fn load_scenario(path: impl AsRef<Path>) -> Result<ScenarioConfig, figment::Error> {
    let path = path.as_ref();
    // Figment treats a missing file as an empty one.
    if !path.is_file() {
        return Err(format!("scenario file not found: {}", path.display()).into());
    }
    let config: ScenarioConfig = Figment::new().merge(Toml::file(path)).extract()?;
    config.validate()?;
    Ok(config)
}

impl ScenarioConfig {
    /// Rejects values that would make the run meaningless or panic downstream
    /// (a zero tick rate, a drop probability outside [0, 1], ...).
    pub fn validate(&self) -> Result<(), figment::Error> {
        let sim = &self.simulation;
        positive("simulation.duration_seconds", sim.duration_seconds)?;
        positive("simulation.tick_hz", sim.tick_hz)?;
        positive("simulation.report_interval", sim.report_interval)?;
        finite("simulation.start_time", sim.start_time)?;

        let net = &self.network;
        positive("network.broadcast_interval", net.broadcast_interval)?;
        non_negative("network.latency_mean", net.latency_mean)?;
        non_negative("network.latency_stddev", net.latency_stddev)?;
        if !(0.0..=1.0).contains(&net.drop_probability) {
            return Err(invalid("network.drop_probability", "must be within [0, 1]"));
        }

        positive("body.radius", self.body.radius)?;
        positive("body.gravitational_parameter", self.body.gravitational_parameter)?;
        finite("body.rotation_period", self.body.rotation_period)?;

        for (peer, terrain) in [("sender", &self.terrain.sender), ("receiver", &self.terrain.receiver)] {
            positive(&format!("terrain.{peer}.wavelength_deg"), terrain.wavelength_deg)?;
            finite(&format!("terrain.{peer}.base_height"), terrain.base_height)?;
            finite(&format!("terrain.{peer}.amplitude"), terrain.amplitude)?;
        }

        let vessel = &self.vessel;
        finite("vessel.spin_rate", vessel.spin_rate)?;
        if vessel.parts.is_empty() {
            return Err(invalid("vessel.parts", "a vessel needs at least one part"));
        }
        for part in &vessel.parts {
            positive("vessel.parts.mass", part.mass)?;
        }
        match &vessel.flight {
            FlightConfig::Climb(climb) => {
                if !(-90.0..=90.0).contains(&climb.latitude) {
                    return Err(invalid("vessel.flight.latitude", "must be within [-90, 90]"));
                }
                non_negative("vessel.flight.ground_speed", climb.ground_speed)?;
            }
            FlightConfig::Coast(coast) => {
                positive("vessel.flight.periapsis_altitude", coast.periapsis_altitude)?;
                if coast.apoapsis_altitude < coast.periapsis_altitude {
                    return Err(invalid(
                        "vessel.flight.apoapsis_altitude",
                        "must not be below the periapsis",
                    ));
                }
            }
        }

        self.reconciler_is_sane()
    }

    fn reconciler_is_sane(&self) -> Result<(), figment::Error> {
        let r = &self.reconciler;
        finite("reconciler.surface_altitude_threshold", r.surface_altitude_threshold)?;
        positive("reconciler.extrapolation_horizon", r.extrapolation_horizon)?;
        non_negative("reconciler.ground_proximity", r.ground_proximity)?;
        non_negative("reconciler.control_override_duration", r.control_override_duration)
    }
}

fn invalid(field: &str, reason: &str) -> figment::Error {
    format!("invalid scenario value `{field}`: {reason}").into()
}

fn finite(field: &str, value: f64) -> Result<(), figment::Error> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(invalid(field, "must be finite"))
    }
}

fn positive(field: &str, value: f64) -> Result<(), figment::Error> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, "must be a positive number"))
    }
}

fn non_negative(field: &str, value: f64) -> Result<(), figment::Error> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(field, "must not be negative"))
    }
}

#[cfg(test)]
mod tests {
    use super::structs::*;
    use super::*;
    use approx::assert_relative_eq;
    use tether_core::prelude::{AutopilotMode, ReferenceBody};

    fn parse(toml: &str) -> Result<ScenarioConfig, figment::Error> {
        Figment::new().merge(Toml::string(toml)).extract()
    }

    #[test]
    fn an_empty_file_is_the_default_scenario() {
        let config = parse("").unwrap();
        assert!(config.validate().is_ok());
        assert!(matches!(config.vessel.flight, FlightConfig::Climb(_)));
        assert_eq!(config.terrain.sender, RippledTerrainConfig::default());
        assert_ne!(config.terrain.sender, config.terrain.receiver);
        assert_relative_eq!(config.reconciler.surface_altitude_threshold, 10_000.0);
    }

    #[test]
    fn flight_kind_selects_the_profile() {
        let config = parse(
            r#"
            [vessel]
            id = 7
            name = "Relay"
            autopilot = "prograde"

            [vessel.flight]
            kind = "coast"
            periapsis_altitude = 80000.0
            apoapsis_altitude = 120000.0
            inclination_deg = 6.0
            "#,
        )
        .unwrap();
        assert_eq!(config.vessel.autopilot, Some(AutopilotMode::Prograde));
        let FlightConfig::Coast(coast) = config.vessel.flight else {
            panic!("expected a coast profile");
        };

        let body = ReferenceBody::new("Kerbin", 600_000.0, 3.5316e12);
        let elements = coast.to_elements(&body, 42.0);
        assert_relative_eq!(elements.semi_major_axis, 700_000.0);
        assert_relative_eq!(elements.eccentricity, 40_000.0 / 1_400_000.0);
        assert_relative_eq!(elements.inclination, 6.0_f64.to_radians());
        assert_relative_eq!(elements.epoch, 42.0);
        assert!(elements.validate().is_ok());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(parse("[network]\nbandwidth = 3.0").is_err());
        assert!(parse("[reconciler]\nhorizon = 3.0").is_err());
    }

    #[test]
    fn nonsense_values_fail_validation() {
        let mut config = ScenarioConfig::default();
        config.network.drop_probability = 1.5;
        assert!(config.validate().is_err());

        let mut config = ScenarioConfig::default();
        config.simulation.tick_hz = 0.0;
        assert!(config.validate().is_err());

        let mut config = ScenarioConfig::default();
        config.vessel.parts.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn a_missing_scenario_file_is_an_error() {
        assert!(load_scenario("does/not/exist.toml").is_err());
    }

    #[test]
    fn bundled_scenarios_load() {
        let dir = concat!(env!("CARGO_MANIFEST_DIR"), "/assets/scenarios");
        let climb = load_scenario(format!("{dir}/surface_climb.toml")).unwrap();
        assert!(matches!(climb.vessel.flight, FlightConfig::Climb(_)));
        let coast = load_scenario(format!("{dir}/orbital_coast.toml")).unwrap();
        assert!(matches!(coast.vessel.flight, FlightConfig::Coast(_)));
    }

    #[test]
    fn body_section_builds_a_reference_body() {
        let body = Body {
            initial_rotation_deg: 90.0,
            inverse_rotation: true,
            ..Body::default()
        }
        .to_reference_body();
        assert_eq!(body.name, "Kerbin");
        assert!(body.inverse_rotation);
        assert_relative_eq!(body.initial_rotation, std::f64::consts::FRAC_PI_2);
    }
}

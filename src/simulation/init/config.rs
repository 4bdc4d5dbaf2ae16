//! Simulation configuration: seed, cadence, tool limits and the three tuning
//! tables (scheduler, air solver, material rules). Everything is optional in
//! JSON; missing keys keep their defaults.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::random::DEFAULT_SEED;
use crate::domain::RuleRates;
use crate::spatial::SchedulerConfig;
use crate::systems::air::AirConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid value for `{field}`: {reason}")]
    Invalid { field: String, reason: String },
}

impl ConfigError {
    fn invalid(field: &str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid { field: field.to_string(), reason: reason.into() }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub seed: u32,
    /// The slow pass runs when `frame % slow_interval == 0`.
    pub slow_interval: u32,
    /// Brush radius cap in cells.
    pub max_brush_radius: f32,
    pub entity_capacity: usize,
    pub beam_length: u32,
    /// Velocity injected by the wind tool at full strength.
    pub wind_tool_force: f32,
    pub scheduler: SchedulerConfig,
    pub air: AirConfig,
    pub rules: RuleRates,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            slow_interval: 4,
            max_brush_radius: 64.0,
            entity_capacity: 256,
            beam_length: 256,
            wind_tool_force: 6000.0,
            scheduler: SchedulerConfig::default(),
            air: AirConfig::default(),
            rules: RuleRates::default(),
        }
    }
}

fn air_values(air: &AirConfig) -> [(&'static str, f32); 20] {
    [
        ("air.pressure_diffusion", air.pressure_diffusion),
        ("air.velocity_damping", air.velocity_damping),
        ("air.gradient_force", air.gradient_force),
        ("air.wind_nudge", air.wind_nudge),
        ("air.wind_ease", air.wind_ease),
        ("air.turbulence", air.turbulence),
        ("air.pressure_decay", air.pressure_decay),
        ("air.velocity_diffusion", air.velocity_diffusion),
        ("air.advection_strength", air.advection_strength),
        ("air.advection_blend", air.advection_blend),
        ("air.velocity_decay", air.velocity_decay),
        ("air.divergence_correction", air.divergence_correction),
        ("air.stagnation", air.stagnation),
        ("air.deflection", air.deflection),
        ("air.lee_attenuation", air.lee_attenuation),
        ("air.lee_suction", air.lee_suction),
        ("air.lee_min_speed", air.lee_min_speed),
        ("air.venturi_boost", air.venturi_boost),
        ("air.ambient_mix", air.ambient_mix),
        ("air.bound", air.bound),
    ]
}

impl SimConfig {
    pub fn from_json(json: &str) -> Result<SimConfig, ConfigError> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.slow_interval == 0 {
            return Err(ConfigError::invalid("slow_interval", "must be at least 1"));
        }
        if !self.max_brush_radius.is_finite() || self.max_brush_radius < 1.0 {
            return Err(ConfigError::invalid("max_brush_radius", "must be a finite value >= 1"));
        }
        if self.beam_length == 0 {
            return Err(ConfigError::invalid("beam_length", "must be at least 1"));
        }
        if !self.wind_tool_force.is_finite() || self.wind_tool_force < 0.0 {
            return Err(ConfigError::invalid("wind_tool_force", "must be finite and non-negative"));
        }
        let wake = self.scheduler.wind_wake_speed;
        if !wake.is_finite() || wake < 0.0 {
            return Err(ConfigError::invalid("scheduler.wind_wake_speed", "must be finite and non-negative"));
        }

        for (field, value) in air_values(&self.air) {
            if !value.is_finite() {
                return Err(ConfigError::invalid(field, format!("{value} is not finite")));
            }
        }
        if self.air.bound <= 0.0 {
            return Err(ConfigError::invalid("air.bound", "must be positive"));
        }
        if self.air.turbulence_period == 0 {
            return Err(ConfigError::invalid("air.turbulence_period", "must be at least 1"));
        }

        for (field, p) in self.rules.probabilities() {
            if !(0.0..=1.0).contains(&p) {
                return Err(ConfigError::invalid(field, format!("{p} is outside 0..=1")));
            }
        }
        for (field, lo, hi) in self.rules.ranges() {
            if lo == 0 || lo > hi {
                return Err(ConfigError::invalid(field, format!("{lo}..={hi} is not a valid range")));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert!(SimConfig::default().validate().is_ok());
    }

    #[test]
    fn json_round_trip_preserves_every_table() {
        let mut config = SimConfig::default();
        config.seed = 77;
        config.rules.fire.ignite_chance = 0.5;
        config.air.lee_probe = 6;
        let json = config.to_json().unwrap();
        assert_eq!(SimConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn partial_documents_fill_defaults() {
        let config = SimConfig::from_json(r#"{ "slow_interval": 2, "scheduler": { "sleep_threshold": 10 } }"#).unwrap();
        assert_eq!(config.slow_interval, 2);
        assert_eq!(config.scheduler.sleep_threshold, 10);
        assert_eq!(config.air, AirConfig::default());
    }

    #[test]
    fn out_of_range_values_name_the_field() {
        let err = SimConfig::from_json(r#"{ "rules": { "cloud": { "rain_chance": 1.5 } } }"#).unwrap_err();
        match err {
            ConfigError::Invalid { field, .. } => assert_eq!(field, "cloud.rain_chance"),
            other => panic!("unexpected error: {other}"),
        }

        let err = SimConfig::from_json(r#"{ "slow_interval": 0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref field, .. } if field == "slow_interval"));

        let err = SimConfig::from_json(r#"{ "air": { "bound": -1.0 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref field, .. } if field == "air.bound"));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(SimConfig::from_json("{ nope"), Err(ConfigError::Parse(_))));
        assert!(SimConfig::from_json("{ nope").unwrap_err().to_string().starts_with("config is not valid JSON"));
    }
}

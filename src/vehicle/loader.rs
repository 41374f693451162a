use std::fs;
use std::path::Path;

use thiserror::Error;

use super::variant::{presets, StallRule, VariantConfig};
use crate::dynamics::state::{PITCH_LIMIT, ROLL_LIMIT};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid variant configuration: {0}")]
    Validation(String),
    #[error("Unknown variant '{0}'")]
    UnknownVariant(String),
}

/// Look up a preset by name.
pub fn preset(name: &str) -> Result<VariantConfig, ConfigError> {
    presets::by_name(name).ok_or_else(|| ConfigError::UnknownVariant(name.to_string()))
}

/// Load a variant from a YAML or JSON file, chosen by extension. Anything
/// that is not `.json` is parsed as YAML.
pub fn load_variant(path: impl AsRef<Path>) -> Result<VariantConfig, ConfigError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    let config = if is_json { from_json(&text)? } else { from_yaml(&text)? };
    log::info!("loaded variant '{}' from {}", config.name, path.display());
    Ok(config)
}

pub fn from_yaml(text: &str) -> Result<VariantConfig, ConfigError> {
    let config: VariantConfig = serde_yaml::from_str(text)?;
    validate(&config)?;
    Ok(config)
}

pub fn from_json(text: &str) -> Result<VariantConfig, ConfigError> {
    let config: VariantConfig = serde_json::from_str(text)?;
    validate(&config)?;
    Ok(config)
}

pub fn to_yaml(config: &VariantConfig) -> Result<String, ConfigError> {
    Ok(serde_yaml::to_string(config)?)
}

/// Reject configurations the flight model cannot integrate sensibly.
pub fn validate(c: &VariantConfig) -> Result<(), ConfigError> {
    let a = &c.airframe;
    positive("airframe.mass", a.mass)?;
    positive("airframe.wing_area", a.wing_area)?;
    non_negative("airframe.air_density", a.air_density)?;
    non_negative("airframe.max_thrust", a.max_thrust)?;
    non_negative("airframe.gravity", a.gravity)?;
    finite("airframe.lift_coeff", a.lift_coeff)?;
    non_negative("airframe.drag_coeff", a.drag_coeff)?;
    positive("airframe.stall_angle", a.stall_angle)?;

    non_negative("control_gain", c.control_gain)?;
    finite("ground_elevation", c.ground_elevation)?;
    non_negative("rudder_drag", c.rudder_drag)?;
    positive("overspeed", c.overspeed)?;
    positive("speed_limit", c.speed_limit)?;
    if c.speed_limit <= c.overspeed {
        return invalid(format!(
            "speed_limit ({}) must exceed overspeed ({})",
            c.speed_limit, c.overspeed
        ));
    }
    positive("throttle_step", c.throttle_step)?;

    if let Some(g) = &c.ground_roll {
        non_negative("ground_roll.ground_accel", g.ground_accel)?;
        if !(0.0..=1.0).contains(&g.friction) {
            return invalid(format!("ground_roll.friction must be in [0, 1], got {}", g.friction));
        }
        if !(0.0..=1.0).contains(&g.liftoff_throttle) {
            return invalid(format!(
                "ground_roll.liftoff_throttle must be in [0, 1], got {}",
                g.liftoff_throttle
            ));
        }
        if g.liftoff_speed < g.rollout_speed {
            return invalid(format!(
                "ground_roll.liftoff_speed ({}) below rollout_speed ({})",
                g.liftoff_speed, g.rollout_speed
            ));
        }
    }

    match c.stall {
        StallRule::Pitch { limit } => positive("stall.limit", limit)?,
        StallRule::AngleOfAttack { margin, min_speed } => {
            non_negative("stall.margin", margin)?;
            non_negative("stall.min_speed", min_speed)?;
        }
    }

    let init = &c.initial;
    if !init.pos.iter().chain(init.vel.iter()).all(|v| v.is_finite()) {
        return invalid("initial position/velocity must be finite".into());
    }
    if init.pos.y < c.ground_elevation {
        return invalid(format!(
            "initial altitude {} below ground elevation {}",
            init.pos.y, c.ground_elevation
        ));
    }
    if init.orientation.pitch.abs() > PITCH_LIMIT || init.orientation.roll.abs() > ROLL_LIMIT {
        return invalid("initial pitch/roll outside hard limits".into());
    }
    if !(0.0..=1.0).contains(&init.throttle) {
        return invalid(format!("initial throttle must be in [0, 1], got {}", init.throttle));
    }
    Ok(())
}

fn invalid(msg: String) -> Result<(), ConfigError> {
    Err(ConfigError::Validation(msg))
}

fn finite(field: &str, v: f64) -> Result<(), ConfigError> {
    if v.is_finite() { Ok(()) } else { invalid(format!("{} must be finite, got {}", field, v)) }
}

fn positive(field: &str, v: f64) -> Result<(), ConfigError> {
    if v.is_finite() && v > 0.0 { Ok(()) } else { invalid(format!("{} must be > 0, got {}", field, v)) }
}

fn non_negative(field: &str, v: f64) -> Result<(), ConfigError> {
    if v.is_finite() && v >= 0.0 { Ok(()) } else { invalid(format!("{} must be >= 0, got {}", field, v)) }
}

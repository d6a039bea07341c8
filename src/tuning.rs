//! Data-driven game balance
//!
//! Every gameplay number lives in [`Tuning`]. Defaults reproduce the classic
//! feel; a JSON file can override any subset of fields.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading or validating tuning data
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning value `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Gameplay constants for one match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === World ===
    /// Terrain width in columns (world units)
    pub world_width: usize,
    /// Visible world height; the crater floor and lost-shell depth derive from it
    pub world_height: f32,
    /// Downward acceleration on shells (units/s²)
    pub gravity: f32,
    /// Wind is sampled uniformly from this inclusive integer range each turn
    pub wind_min: i32,
    pub wind_max: i32,

    // === Terrain generation ===
    /// Mean surface height
    pub terrain_base: f32,
    /// Maximum depth of generated valleys below `terrain_base`
    pub terrain_relief: f32,
    /// Highest generated surface (smallest Y)
    pub terrain_min_height: i32,
    /// Deepest a crater can dig (largest Y)
    pub crater_floor: i32,

    // === Tanks ===
    /// Distance of each tank's spawn column from its edge of the world
    pub tank_anchor: f32,
    /// Tank centre sits this far above the surface
    pub tank_vertical_offset: f32,
    pub tank_radius: f32,
    /// Extra collision slack around the tank radius
    pub hit_pad: f32,
    pub max_move: f32,
    /// Horizontal drive speed (units/s)
    pub move_speed: f32,
    /// Tanks cannot drive closer than this to either edge
    pub edge_margin: f32,
    pub start_angle: f32,
    pub start_power: f32,
    /// Angle change per tick at full input (degrees)
    pub angle_rate: f32,
    /// Power change per tick at full input
    pub power_rate: f32,
    /// Half-width of the tilt probe under a tank
    pub tilt_probe: f32,

    // === Firing ===
    /// Launch speed at zero power
    pub base_speed: f32,
    /// Launch speed added per point of power
    pub speed_per_power: f32,
    /// Barrel pivot height above the tank centre
    pub pivot_offset: f32,
    pub barrel_length: f32,
    /// Shells past `world_width + margin` (or before `-margin`) are lost
    pub bounds_margin: f32,
    /// Shells deeper than `world_height + depth` are lost
    pub lost_depth: f32,

    // === Explosions ===
    pub blast_radius: f32,
    pub crater_depth_scale: f32,
    /// Direct hits within this distance deal `max_damage` flat
    pub direct_hit_radius: f32,
    pub max_damage: f32,
    /// Peak damage of an airstrike bomb
    pub bomb_damage: f32,

    // === AI ===
    /// Pause before the AI picks its shot (seconds)
    pub ai_think_delay: f32,
    /// Pause between aiming and firing (seconds)
    pub ai_fire_delay: f32,
    /// Pause before the AI acts after taking over mid-turn (seconds)
    pub ai_takeover_delay: f32,
    /// Relative random error applied to the solved speed (0.005 = ±0.5%)
    pub ai_speed_jitter: f32,
    pub ai_min_power: f32,

    // === Airstrikes ===
    pub airstrikes: bool,
    /// Seconds between bomber spawns
    pub airstrike_period: f32,
    pub bomb_gravity: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            world_width: 2000,
            world_height: 720.0,
            gravity: 520.0,
            wind_min: -90,
            wind_max: 90,

            terrain_base: 520.0,
            terrain_relief: 120.0,
            terrain_min_height: 120,
            crater_floor: 720,

            tank_anchor: 300.0,
            tank_vertical_offset: 18.0,
            tank_radius: 16.0,
            hit_pad: 30.0,
            max_move: 40.0,
            move_speed: 40.0,
            edge_margin: 20.0,
            start_angle: 45.0,
            start_power: 70.0,
            angle_rate: 0.8,
            power_rate: 0.7,
            tilt_probe: 10.0,

            base_speed: 420.0,
            speed_per_power: 5.2,
            pivot_offset: 20.0,
            barrel_length: 24.0,
            bounds_margin: 50.0,
            lost_depth: 200.0,

            blast_radius: 35.0,
            crater_depth_scale: 0.75,
            direct_hit_radius: 46.0,
            max_damage: 11.0,
            bomb_damage: 1.0,

            ai_think_delay: 1.5,
            ai_fire_delay: 0.4,
            ai_takeover_delay: 0.6,
            ai_speed_jitter: 0.005,
            ai_min_power: 10.0,

            airstrikes: true,
            airstrike_period: 5.0,
            bomb_gravity: 400.0,
        }
    }
}

impl Tuning {
    /// Parse overrides from JSON; omitted fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load overrides from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.as_ref().display());
        Ok(tuning)
    }

    /// Reject values the simulation cannot work with
    pub fn validate(&self) -> Result<(), TuningError> {
        let invalid = |field: &'static str, reason: &'static str| -> Result<(), TuningError> {
            Err(TuningError::Invalid { field, reason })
        };

        if self.world_width == 0 {
            return invalid("world_width", "must be greater than zero");
        }
        if self.wind_min > self.wind_max {
            return invalid("wind_min", "must not exceed wind_max");
        }
        if self.terrain_min_height > self.crater_floor {
            return invalid("terrain_min_height", "must not exceed crater_floor");
        }
        if !(self.crater_depth_scale > 0.0 && self.crater_depth_scale <= 1.0) {
            return invalid("crater_depth_scale", "must lie in (0, 1]");
        }
        if self.blast_radius <= 0.0 {
            return invalid("blast_radius", "must be positive");
        }
        if self.speed_per_power <= 0.0 {
            return invalid("speed_per_power", "must be positive");
        }
        if self.ai_min_power > 100.0 {
            return invalid("ai_min_power", "must not exceed 100");
        }
        if self.airstrikes && self.airstrike_period <= 0.0 {
            return invalid("airstrike_period", "must be positive when airstrikes are on");
        }
        Ok(())
    }

    /// Launch speed for a power setting
    #[inline]
    pub fn speed_for_power(&self, power: f32) -> f32 {
        self.base_speed + power * self.speed_per_power
    }

    /// Inverse of [`Tuning::speed_for_power`]
    #[inline]
    pub fn power_for_speed(&self, speed: f32) -> f32 {
        (speed - self.base_speed) / self.speed_per_power
    }

    /// Highest surface a generated terrain may have after clamping
    pub fn terrain_max_height(&self) -> i32 {
        (self.terrain_base + self.terrain_relief).round() as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "gravity": 300.0, "airstrikes": false }"#).unwrap();
        assert_eq!(tuning.gravity, 300.0);
        assert!(!tuning.airstrikes);
        assert_eq!(tuning.world_width, 2000);
        assert_eq!(tuning.blast_radius, 35.0);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = Tuning::from_json(r#"{ "wind_min": 10, "wind_max": -10 }"#).unwrap_err();
        assert!(matches!(err, TuningError::Invalid { field: "wind_min", .. }));

        let err = Tuning::from_json(r#"{ "crater_depth_scale": 1.5 }"#).unwrap_err();
        assert!(matches!(err, TuningError::Invalid { field: "crater_depth_scale", .. }));

        let err = Tuning::from_json(r#"{ "world_width": 0 }"#).unwrap_err();
        assert!(matches!(err, TuningError::Invalid { field: "world_width", .. }));
    }

    #[test]
    fn test_malformed_json() {
        let err = Tuning::from_json("{ not json").unwrap_err();
        assert!(matches!(err, TuningError::Parse(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = Tuning::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, TuningError::Io(_)));
    }

    #[test]
    fn test_power_speed_mapping() {
        let tuning = Tuning::default();
        assert_eq!(tuning.speed_for_power(0.0), 420.0);
        assert!((tuning.speed_for_power(100.0) - 940.0).abs() < 1e-3);
        let power = tuning.power_for_speed(tuning.speed_for_power(63.0));
        assert!((power - 63.0).abs() < 1e-3);
    }
}

//! # Generator Configuration
//!
//! Tuning knobs for the generator, loaded from TOML or built in code:
//!
//! ```toml
//! cell_depth = 4.0
//! road_build_ahead = 160.0
//! obstacle_build_ahead = 130.0
//! ```
//!
//! Missing keys take their default.

use serde::{Deserialize, Serialize};

use crate::error::{GeneratorError, GeneratorResult};

/// Seed for a run.
///
/// Same seed + same content + same inputs = same track.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrackSeed(u64);

impl TrackSeed {
    /// Creates a new track seed.
    #[inline]
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self(seed)
    }

    /// Returns the raw seed value.
    #[inline]
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Derives a sub-seed for a specific purpose (e.g. a restarted session).
    #[inline]
    #[must_use]
    pub const fn derive(self, purpose: u64) -> Self {
        // FNV-1a style mixing
        let mut hash = self.0;
        hash ^= purpose;
        hash = hash.wrapping_mul(0x517c_c1b7_2722_0a95);
        hash ^= hash >> 32;
        Self(hash)
    }
}

impl Default for TrackSeed {
    fn default() -> Self {
        Self(0x52_55_4E_57_41_59)
    }
}

/// Generator tuning.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// World units per cell.
    pub cell_depth: f32,
    /// Road is generated while its cursor is below this many cells.
    pub road_build_ahead: f32,
    /// Sides are generated while their cursors are below this many cells.
    pub side_build_ahead: f32,
    /// Obstacles are generated while a lane cursor is below this many cells.
    pub obstacle_build_ahead: f32,
    /// Obstacle-free run-up at the start of a run, in cells.
    pub obstacle_start: f32,
    /// Rounding slack when converting a length gap to whole quanta.
    pub sync_tolerance: f32,
    /// Upper bound on generation steps per channel per tick.
    pub max_steps_per_tick: u32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            cell_depth: 4.0,
            road_build_ahead: 160.0,
            side_build_ahead: 160.0,
            obstacle_build_ahead: 130.0,
            obstacle_start: 40.0,
            sync_tolerance: 0.05,
            max_steps_per_tick: 256,
        }
    }
}

impl GeneratorConfig {
    /// Parses a config from TOML and validates it.
    ///
    /// # Errors
    ///
    /// Returns [`GeneratorError::ConfigParse`] or [`GeneratorError::InvalidConfig`].
    pub fn from_toml_str(text: &str) -> GeneratorResult<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| GeneratorError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks every value is in range.
    ///
    /// # Errors
    ///
    /// Returns [`GeneratorError::InvalidConfig`] naming the first bad value.
    pub fn validate(&self) -> GeneratorResult<()> {
        let positive = [
            ("cell_depth", self.cell_depth),
            ("road_build_ahead", self.road_build_ahead),
            ("side_build_ahead", self.side_build_ahead),
            ("obstacle_build_ahead", self.obstacle_build_ahead),
        ];
        for (name, value) in positive {
            if value <= 0.0 || !value.is_finite() {
                return Err(GeneratorError::InvalidConfig(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        if !(0.0..1.0).contains(&self.sync_tolerance) {
            return Err(GeneratorError::InvalidConfig(format!(
                "sync_tolerance must be in [0, 1), got {}",
                self.sync_tolerance
            )));
        }
        if self.obstacle_start < 0.0 {
            return Err(GeneratorError::InvalidConfig(format!(
                "obstacle_start must not be negative, got {}",
                self.obstacle_start
            )));
        }
        if self.max_steps_per_tick == 0 {
            return Err(GeneratorError::InvalidConfig(
                "max_steps_per_tick must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Converts a world distance to cells.
    #[inline]
    #[must_use]
    pub fn to_cells(&self, distance: f32) -> f32 {
        distance / self.cell_depth
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = GeneratorConfig::default();
        assert!(config.validate().is_ok());
        assert!((config.to_cells(8.0) - 2.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = GeneratorConfig::from_toml_str("cell_depth = 2.0\nobstacle_start = 0.0\n")
            .expect("valid config");
        assert!((config.cell_depth - 2.0).abs() < f32::EPSILON);
        assert!(config.obstacle_start.abs() < f32::EPSILON);
        assert_eq!(config.max_steps_per_tick, 256);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            GeneratorConfig::from_toml_str("cell_depth = 0.0"),
            Err(GeneratorError::InvalidConfig(_))
        ));
        assert!(matches!(
            GeneratorConfig::from_toml_str("sync_tolerance = 2.5"),
            Err(GeneratorError::InvalidConfig(_))
        ));
        assert!(matches!(
            GeneratorConfig::from_toml_str("cell_depth = \"deep\""),
            Err(GeneratorError::ConfigParse(_))
        ));
    }

    #[test]
    fn test_seed_derivation() {
        let seed = TrackSeed::new(42);
        assert_eq!(seed.derive(1), TrackSeed::new(42).derive(1));
        assert_ne!(seed.derive(1), seed.derive(2));
        assert_eq!(seed.value(), 42);
    }
}

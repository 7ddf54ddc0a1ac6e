//! Tuning configuration for the floor and the light puzzle.
//!
//! Missing JSON fields fall back to the defaults.
//!
//! ```
//! use liminal_logic::config::TuningConfig;
//!
//! let config = TuningConfig::from_json(r#"{ "floor": { "commit_delay_secs": 0.3 } }"#).unwrap();
//! assert_eq!(config.floor.commit_delay_secs, 0.3);
//! assert_eq!(config.puzzle.overlap_threshold, 1.0);
//! ```

use serde::{Deserialize, Serialize};

/// Room-transition timings and construction constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FloorTuning {
    /// Delay between leaving a zone and committing the room swap.
    pub commit_delay_secs: f64,
    /// Ceiling lights hang this far below the ceiling.
    pub light_ceiling_offset: f32,
    /// Thickness of floor and ceiling collider slabs.
    pub slab_thickness: f32,
}

impl Default for FloorTuning {
    fn default() -> Self {
        Self {
            commit_delay_secs: 0.2,
            light_ceiling_offset: 0.05,
            slab_thickness: 0.1,
        }
    }
}

/// Color-mixing and sensor thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PuzzleTuning {
    /// Lights closer than this mix their colors.
    pub overlap_threshold: f32,
    /// Weight of a mix contribution at zero distance. Must lie in
    /// `[0, 0.8]`; every mix weight is bounded by it.
    pub max_mix_weight: f32,
    /// Default single-light tolerance (RGB distance) for new sensors.
    pub individual_tolerance: f32,
    /// Tolerance for the combined multi-light check.
    pub combined_tolerance: f32,
    /// Combined color is scaled by `1 + boost · light_count`.
    pub combined_boost_per_light: f32,
    /// Minimum cosine between a light's forward and the sensor direction.
    pub direction_cone_cos: f32,
    /// How far the player can reach to pick up a light.
    pub pickup_reach: f32,
    /// Minimum cosine between the look direction and a pickup target.
    pub pickup_cone_cos: f32,
    /// Distance in front of the eye where a held light floats.
    pub hold_distance: f32,
}

impl Default for PuzzleTuning {
    fn default() -> Self {
        Self {
            overlap_threshold: 1.0,
            max_mix_weight: 0.8,
            individual_tolerance: 0.5,
            combined_tolerance: 0.3,
            combined_boost_per_light: 0.3,
            direction_cone_cos: 0.7,
            pickup_reach: 3.0,
            pickup_cone_cos: 0.9,
            hold_distance: 1.5,
        }
    }
}

/// Complete tuning set for a session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TuningConfig {
    pub floor: FloorTuning,
    pub puzzle: PuzzleTuning,
    /// Seed for room selection (None = from entropy).
    pub seed: Option<u64>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid tuning JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{field} out of range: {value}")]
    OutOfRange { field: &'static str, value: f64 },
}

impl TuningConfig {
    /// Parse and validate a JSON tuning document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: TuningConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let checks: [(&'static str, f64, bool); 9] = [
            (
                "floor.commit_delay_secs",
                self.floor.commit_delay_secs,
                self.floor.commit_delay_secs >= 0.0,
            ),
            (
                "floor.slab_thickness",
                self.floor.slab_thickness as f64,
                self.floor.slab_thickness > 0.0,
            ),
            (
                "puzzle.overlap_threshold",
                self.puzzle.overlap_threshold as f64,
                self.puzzle.overlap_threshold > 0.0,
            ),
            (
                "puzzle.max_mix_weight",
                self.puzzle.max_mix_weight as f64,
                (0.0..=0.8).contains(&self.puzzle.max_mix_weight),
            ),
            (
                "puzzle.individual_tolerance",
                self.puzzle.individual_tolerance as f64,
                self.puzzle.individual_tolerance > 0.0,
            ),
            (
                "puzzle.combined_tolerance",
                self.puzzle.combined_tolerance as f64,
                self.puzzle.combined_tolerance > 0.0,
            ),
            (
                "puzzle.combined_boost_per_light",
                self.puzzle.combined_boost_per_light as f64,
                self.puzzle.combined_boost_per_light >= 0.0,
            ),
            (
                "puzzle.direction_cone_cos",
                self.puzzle.direction_cone_cos as f64,
                (-1.0..=1.0).contains(&self.puzzle.direction_cone_cos),
            ),
            (
                "puzzle.pickup_reach",
                self.puzzle.pickup_reach as f64,
                self.puzzle.pickup_reach > 0.0,
            ),
        ];
        for (field, value, ok) in checks {
            if !ok {
                return Err(ConfigError::OutOfRange { field, value });
            }
        }
        Ok(())
    }
}

//! Tunable parameters for aggregation.

use serde::{Deserialize, Serialize};

/// Upper bounds for the coarse status buckets.
///
/// A mean at or below `good_max` is good, at or below `moderate_max` is
/// moderate, anything higher is poor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatusThresholds {
    /// Highest value still considered good.
    pub good_max: f64,
    /// Highest value still considered moderate.
    pub moderate_max: f64,
}

impl StatusThresholds {
    /// Air thresholds on the AQI scale.
    pub const AIR: Self = Self {
        good_max: 50.0,
        moderate_max: 100.0,
    };

    /// Noise thresholds in decibels.
    pub const NOISE: Self = Self {
        good_max: 50.0,
        moderate_max: 70.0,
    };
}

/// Aggregation settings, typically loaded from the `[aggregate]` table of
/// the config file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregateSettings {
    /// Half-width in degrees of the square around a point that counts as
    /// its neighborhood.
    pub neighborhood_tolerance: f64,
    /// Maximum number of reports in a location's recent list.
    pub recent_limit: usize,
    /// Degrees added to every side of a viewport before filtering.
    pub viewport_padding: f64,
    /// Status buckets for air reports.
    pub air_thresholds: StatusThresholds,
    /// Status buckets for noise reports.
    pub noise_thresholds: StatusThresholds,
}

impl Default for AggregateSettings {
    fn default() -> Self {
        Self {
            neighborhood_tolerance: 0.01,
            recent_limit: 10,
            viewport_padding: 0.0,
            air_thresholds: StatusThresholds::AIR,
            noise_thresholds: StatusThresholds::NOISE,
        }
    }
}

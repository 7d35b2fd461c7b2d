//! Heatmap intensity normalization and the AQI color categories.

use serde::Serialize;
use strum_macros::{AsRefStr, Display};

/// Highest value on the AQI scale.
pub const MAX_INDEX: f64 = 500.0;

/// Loudness mapped to full heatmap intensity.
pub const MAX_NOISE_DB: f64 = 100.0;

/// Clamps `value` to `[0, max]` and scales it to `[0, 1]`.
///
/// NaN maps to 0.
#[must_use]
pub fn normalize(value: f64, max: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, max) / max
}

/// Heatmap intensity for an AQI value.
#[must_use]
pub fn index_to_intensity(index: f64) -> f64 {
    normalize(index, MAX_INDEX)
}

/// Heatmap intensity for a loudness in decibels.
#[must_use]
pub fn decibels_to_intensity(decibels: f64) -> f64 {
    normalize(decibels, MAX_NOISE_DB)
}

/// EPA AQI category.
///
/// Each category owns one evenly spaced stop of the heatmap gradient,
/// from 0.0 (good, green) to 1.0 (hazardous, maroon).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Display, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AqiCategory {
    /// 0-50.
    Good,
    /// 51-100.
    Moderate,
    /// 101-150.
    UnhealthyForSensitiveGroups,
    /// 151-200.
    Unhealthy,
    /// 201-300.
    VeryUnhealthy,
    /// 301-500.
    Hazardous,
}

impl AqiCategory {
    /// Category containing `index`.
    #[must_use]
    pub fn from_index(index: f64) -> Self {
        match index {
            i if i <= 50.0 || i.is_nan() => Self::Good,
            i if i <= 100.0 => Self::Moderate,
            i if i <= 150.0 => Self::UnhealthyForSensitiveGroups,
            i if i <= 200.0 => Self::Unhealthy,
            i if i <= 300.0 => Self::VeryUnhealthy,
            _ => Self::Hazardous,
        }
    }

    /// Position of this category's color on the heatmap gradient.
    #[must_use]
    pub const fn gradient_stop(self) -> f64 {
        match self {
            Self::Good => 0.0,
            Self::Moderate => 0.2,
            Self::UnhealthyForSensitiveGroups => 0.4,
            Self::Unhealthy => 0.6,
            Self::VeryUnhealthy => 0.8,
            Self::Hazardous => 1.0,
        }
    }

    /// Gradient color for this category.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Good => "#00e400",
            Self::Moderate => "#ffff00",
            Self::UnhealthyForSensitiveGroups => "#ff7e00",
            Self::Unhealthy => "#ff0000",
            Self::VeryUnhealthy => "#8f3f97",
            Self::Hazardous => "#7e0023",
        }
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Good,
            Self::Moderate,
            Self::UnhealthyForSensitiveGroups,
            Self::Unhealthy,
            Self::VeryUnhealthy,
            Self::Hazardous,
        ]
    }
}

/// The heatmap gradient as `(stop, color)` pairs in ascending order.
#[must_use]
pub fn gradient() -> Vec<(f64, &'static str)> {
    AqiCategory::all()
        .iter()
        .map(|c| (c.gradient_stop(), c.color()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intensity_endpoints() {
        assert_eq!(index_to_intensity(0.0), 0.0);
        assert_eq!(index_to_intensity(500.0), 1.0);
        assert_eq!(index_to_intensity(250.0), 0.5);
    }

    #[test]
    fn intensity_clamps() {
        assert_eq!(index_to_intensity(-20.0), 0.0);
        assert_eq!(index_to_intensity(900.0), 1.0);
        assert_eq!(index_to_intensity(f64::NAN), 0.0);
        assert_eq!(decibels_to_intensity(130.0), 1.0);
    }

    #[test]
    fn intensity_is_monotone() {
        let values: Vec<f64> = (0..=600).map(|i| index_to_intensity(f64::from(i))).collect();
        assert!(values.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn categories_follow_breakpoints() {
        assert_eq!(AqiCategory::from_index(50.0), AqiCategory::Good);
        assert_eq!(AqiCategory::from_index(51.0), AqiCategory::Moderate);
        assert_eq!(
            AqiCategory::from_index(150.0),
            AqiCategory::UnhealthyForSensitiveGroups
        );
        assert_eq!(AqiCategory::from_index(301.0), AqiCategory::Hazardous);
    }

    #[test]
    fn gradient_stops_are_evenly_spaced() {
        let stops = gradient();
        assert_eq!(stops.len(), 6);
        assert_eq!(stops[0], (0.0, "#00e400"));
        assert_eq!(stops[5], (1.0, "#7e0023"));
        for (i, (stop, _)) in stops.iter().enumerate() {
            #[allow(clippy::cast_precision_loss)]
            let expected = i as f64 * 0.2;
            assert!((stop - expected).abs() < 1e-9);
        }
    }
}

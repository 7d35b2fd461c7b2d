//! Representative values for categorical severity levels.
//!
//! Citizen reports carry an ordinal level rather than a measured
//! concentration. These lookups give each level a representative index
//! (air) or decibel value (noise) so reports can be averaged and drawn on
//! the same scales as measured data.

use citizen_map_report_models::{AirQualityLevel, NoiseLevel};

/// Index used for an air report without a usable level.
pub const DEFAULT_AIR_INDEX: f64 = 50.0;

/// Decibels used for a noise report without a usable level.
pub const DEFAULT_NOISE_DB: f64 = 50.0;

/// Representative index for an air quality level.
#[must_use]
pub const fn air_level_index(level: AirQualityLevel) -> f64 {
    match level {
        AirQualityLevel::Good => 30.0,
        AirQualityLevel::Moderate => 75.0,
        AirQualityLevel::Unhealthy => 125.0,
        AirQualityLevel::VeryUnhealthy => 175.0,
        AirQualityLevel::Hazardous => 225.0,
    }
}

/// Representative index for an optional air level, falling back to
/// [`DEFAULT_AIR_INDEX`].
#[must_use]
pub const fn air_index_or_default(level: Option<AirQualityLevel>) -> f64 {
    match level {
        Some(level) => air_level_index(level),
        None => DEFAULT_AIR_INDEX,
    }
}

/// Representative index for a raw ordinal, falling back to
/// [`DEFAULT_AIR_INDEX`] when the ordinal names no level.
#[must_use]
pub fn air_ordinal_index(ordinal: i64) -> f64 {
    air_index_or_default(AirQualityLevel::from_value(ordinal).ok())
}

/// Display label for an optional air level.
#[must_use]
pub const fn air_label_or_default(level: Option<AirQualityLevel>) -> &'static str {
    match level {
        Some(level) => level.label(),
        None => AirQualityLevel::DEFAULT_LABEL,
    }
}

/// Representative loudness in decibels for a noise level.
#[must_use]
pub const fn noise_level_decibels(level: NoiseLevel) -> f64 {
    match level {
        NoiseLevel::Quiet => 40.0,
        NoiseLevel::Moderate => 60.0,
        NoiseLevel::Loud => 80.0,
        NoiseLevel::VeryLoud => 100.0,
    }
}

/// Representative loudness for an optional noise level, falling back to
/// [`DEFAULT_NOISE_DB`].
#[must_use]
pub const fn noise_decibels_or_default(level: Option<NoiseLevel>) -> f64 {
    match level {
        Some(level) => noise_level_decibels(level),
        None => DEFAULT_NOISE_DB,
    }
}

/// Display label for an optional noise level.
#[must_use]
pub const fn noise_label_or_default(level: Option<NoiseLevel>) -> &'static str {
    match level {
        Some(level) => level.label(),
        None => NoiseLevel::DEFAULT_LABEL,
    }
}

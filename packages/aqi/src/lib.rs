#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Air quality index conversion and heatmap intensity.
//!
//! Converts pollutant concentrations to the 0-500 AQI scale using EPA
//! breakpoint tables, maps categorical report levels to representative
//! index and decibel values, and normalizes both onto `[0, 1]` for heatmap
//! rendering. Everything here is pure and infallible: out-of-range input
//! is clamped and unknown levels fall back to documented defaults.

pub mod breakpoints;
pub mod intensity;
pub mod level;

pub use breakpoints::{
    BreakpointRange, PM10_BREAKPOINTS, PM25_BREAKPOINTS, Pollutant, concentration_to_index,
    index_from_table,
};
pub use intensity::{
    AqiCategory, MAX_INDEX, MAX_NOISE_DB, decibels_to_intensity, gradient, index_to_intensity,
    normalize,
};
pub use level::{
    DEFAULT_AIR_INDEX, DEFAULT_NOISE_DB, air_index_or_default, air_label_or_default,
    air_level_index, air_ordinal_index, noise_decibels_or_default, noise_label_or_default,
    noise_level_decibels,
};

/// Index for a sample, preferring a measured concentration over the
/// provider-reported index.
///
/// Returns 0 when neither is present.
#[must_use]
pub fn resolve_index(server_index: Option<f64>, concentration: Option<f64>) -> f64 {
    concentration.map_or_else(|| server_index.unwrap_or(0.0), concentration_to_index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn concentration_wins_over_server_index() {
        assert_eq!(resolve_index(Some(3.0), Some(35.4)), 100.0);
    }

    #[test]
    fn server_index_used_without_concentration() {
        assert_eq!(resolve_index(Some(87.0), None), 87.0);
        assert_eq!(resolve_index(None, None), 0.0);
    }
}

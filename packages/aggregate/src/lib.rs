#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Geospatial aggregation of citizen reports.
//!
//! Turns in-memory reports and air quality samples into what the map
//! draws: viewport-filtered heat points, neighborhood averages with a
//! coarse status, the recent-reports panel, and optimistic vote state.
//!
//! All functions are synchronous and side-effect free apart from
//! [`apply_vote`]/[`revert_vote`], which mutate the report they are given.
//! Network results are handed in as plain data.

pub mod heat;
pub mod neighborhood;
pub mod recent;
pub mod settings;
pub mod viewport;
pub mod vote;

use citizen_map_aqi::{air_index_or_default, noise_decibels_or_default};
use citizen_map_report_models::{Measurement, Report};

pub use heat::{report_heat_points, report_intensity, sample_heat_points};
pub use neighborhood::{
    LocationSummary, NeighborhoodAverage, NeighborhoodStatus, average_of, location_summary,
    neighborhood_average,
};
pub use recent::recent_reports;
pub use settings::{AggregateSettings, StatusThresholds};
pub use viewport::{reports_in_viewport, samples_in_viewport};
pub use vote::{VoteChange, accuracy_rate, apply_vote, approval_ratio, revert_vote};

/// The value a report contributes to averages and heatmaps: the
/// representative AQI for air reports, decibels for noise reports.
#[must_use]
pub const fn report_value(report: &Report) -> f64 {
    match report.measurement {
        Measurement::Air { air_quality } => air_index_or_default(air_quality),
        Measurement::Noise { noise_level } => noise_decibels_or_default(noise_level),
    }
}

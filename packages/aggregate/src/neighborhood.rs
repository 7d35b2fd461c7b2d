//! Averages of nearby reports and the summary panel for a selected location.

use citizen_map_report_models::{GeoPoint, Report, ReportType};
use serde::Serialize;
use strum_macros::{AsRefStr, Display};

use crate::{AggregateSettings, StatusThresholds, recent::recent_reports, report_value};

/// Coarse status of a neighborhood average.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum NeighborhoodStatus {
    /// At or below the good threshold.
    Good,
    /// At or below the moderate threshold.
    Moderate,
    /// Above the moderate threshold.
    Poor,
}

impl NeighborhoodStatus {
    /// Buckets `mean` using `thresholds`.
    #[must_use]
    pub fn classify(mean: f64, thresholds: &StatusThresholds) -> Self {
        if mean <= thresholds.good_max {
            Self::Good
        } else if mean <= thresholds.moderate_max {
            Self::Moderate
        } else {
            Self::Poor
        }
    }
}

/// Average of the reports of one type around a point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NeighborhoodAverage {
    /// Type of the averaged reports.
    pub report_type: ReportType,
    /// Arithmetic mean of the reports' index (air) or decibel (noise)
    /// values.
    pub mean: f64,
    /// Number of reports averaged.
    pub count: usize,
    /// Status bucket of the mean.
    pub status: NeighborhoodStatus,
}

/// Averages the values of the `report_type` reports in `reports`.
///
/// Returns `None` when there are no such reports.
#[must_use]
pub fn average_of<'a>(
    reports: impl IntoIterator<Item = &'a Report>,
    report_type: ReportType,
    settings: &AggregateSettings,
) -> Option<NeighborhoodAverage> {
    let (sum, count) = reports
        .into_iter()
        .filter(|r| r.report_type() == report_type)
        .fold((0.0, 0_usize), |(sum, count), r| (sum + report_value(r), count + 1));

    if count == 0 {
        return None;
    }

    #[allow(clippy::cast_precision_loss)]
    let mean = sum / count as f64;
    let thresholds = match report_type {
        ReportType::Air => &settings.air_thresholds,
        ReportType::Noise => &settings.noise_thresholds,
    };

    Some(NeighborhoodAverage {
        report_type,
        mean,
        count,
        status: NeighborhoodStatus::classify(mean, thresholds),
    })
}

/// Averages the `report_type` reports within the configured tolerance of
/// `center`.
///
/// Returns `None` when no report qualifies.
#[must_use]
pub fn neighborhood_average<'a>(
    reports: impl IntoIterator<Item = &'a Report>,
    center: GeoPoint,
    report_type: ReportType,
    settings: &AggregateSettings,
) -> Option<NeighborhoodAverage> {
    let tolerance = settings.neighborhood_tolerance;
    let average = average_of(
        reports
            .into_iter()
            .filter(|r| center.is_near(r.location(), tolerance)),
        report_type,
        settings,
    );

    if average.is_none() {
        log::debug!("No {report_type} reports within {tolerance} of {center:?}");
    }
    average
}

/// What the detail panel shows for a selected location.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationSummary<'a> {
    /// The selected location.
    pub location: GeoPoint,
    /// Most recent nearby reports, newest first.
    pub recent: Vec<&'a Report>,
    /// Average over the recent air reports.
    pub air: Option<NeighborhoodAverage>,
    /// Average over the recent noise reports.
    pub noise: Option<NeighborhoodAverage>,
}

/// Builds the summary for `location`: the newest nearby reports and the
/// averages over them.
#[must_use]
pub fn location_summary<'a>(
    reports: impl IntoIterator<Item = &'a Report>,
    location: GeoPoint,
    settings: &AggregateSettings,
) -> LocationSummary<'a> {
    let nearby = reports
        .into_iter()
        .filter(|r| location.is_near(r.location(), settings.neighborhood_tolerance));
    let recent = recent_reports(nearby, settings.recent_limit);

    LocationSummary {
        location,
        air: average_of(recent.iter().copied(), ReportType::Air, settings),
        noise: average_of(recent.iter().copied(), ReportType::Noise, settings),
        recent,
    }
}

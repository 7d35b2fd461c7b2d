//! Projection of reports and samples onto heatmap points.

use citizen_map_aqi::{decibels_to_intensity, index_to_intensity, resolve_index};
use citizen_map_report_models::{AqiSample, HeatPoint, Measurement, Report, ReportType};

use crate::report_value;

/// Heatmap intensity for a single report.
///
/// Air reports are normalized on the AQI scale, noise reports on the
/// decibel scale.
#[must_use]
pub fn report_intensity(report: &Report) -> f64 {
    let value = report_value(report);
    match report.measurement {
        Measurement::Air { .. } => index_to_intensity(value),
        Measurement::Noise { .. } => decibels_to_intensity(value),
    }
}

/// Heat points for every report of `report_type`.
#[must_use]
pub fn report_heat_points<'a>(
    reports: impl IntoIterator<Item = &'a Report>,
    report_type: ReportType,
) -> Vec<HeatPoint> {
    let points: Vec<HeatPoint> = reports
        .into_iter()
        .filter(|r| r.report_type() == report_type)
        .map(|r| HeatPoint {
            lat: r.lat,
            lng: r.lng,
            intensity: report_intensity(r),
        })
        .collect();

    log::debug!("Projected {} {report_type} reports to heat points", points.len());
    points
}

/// Heat points for air quality samples.
///
/// A sample's index comes from its PM2.5 concentration when present and
/// from the provider-reported index otherwise.
#[must_use]
pub fn sample_heat_points<'a>(samples: impl IntoIterator<Item = &'a AqiSample>) -> Vec<HeatPoint> {
    samples
        .into_iter()
        .map(|s| {
            let index = resolve_index(s.server_index, s.concentration);
            log::trace!("Sample ({}, {}) -> index {index}", s.lat, s.lon);
            HeatPoint {
                lat: s.lat,
                lng: s.lon,
                intensity: index_to_intensity(index),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{air_report, noise_report};
    use citizen_map_report_models::{AirQualityLevel, NoiseLevel};

    #[test]
    fn projects_only_selected_type() {
        let reports = vec![
            air_report("a", 10.0, 106.0, Some(AirQualityLevel::Hazardous), 0),
            noise_report("n", 10.0, 106.0, Some(NoiseLevel::Loud), 0),
        ];
        let air = report_heat_points(&reports, ReportType::Air);
        assert_eq!(air.len(), 1);
        assert!((air[0].intensity - 225.0 / 500.0).abs() < 1e-12);

        let noise = report_heat_points(&reports, ReportType::Noise);
        assert_eq!(noise.len(), 1);
        assert!((noise[0].intensity - 0.8).abs() < 1e-12);
    }

    #[test]
    fn missing_level_uses_default_intensity() {
        let reports = vec![air_report("a", 10.0, 106.0, None, 0)];
        let points = report_heat_points(&reports, ReportType::Air);
        assert!((points[0].intensity - 0.1).abs() < 1e-12);
    }

    #[test]
    fn samples_prefer_concentration() {
        let samples = vec![
            AqiSample::from((10.0, 106.0, Some(5.0), Some(35.4))),
            AqiSample::from((10.1, 106.1, Some(250.0), None)),
            AqiSample::from((10.2, 106.2, None, None)),
            AqiSample::from((10.3, 106.3, None, Some(900.0))),
        ];
        let points = sample_heat_points(&samples);
        let intensities: Vec<f64> = points.iter().map(|p| p.intensity).collect();
        assert_eq!(intensities, vec![0.2, 0.5, 0.0, 1.0]);
        assert_eq!(points[1].lat, 10.1);
        assert_eq!(points[1].lng, 106.1);
    }
}

//! Bounding-box filtering of reports and samples.

use citizen_map_report_models::{AqiSample, BoundingBox, Report};

/// Reports whose location lies inside `bbox` grown by `padding` degrees.
///
/// An inverted or non-finite box yields no reports.
#[must_use]
pub fn reports_in_viewport<'a>(
    reports: impl IntoIterator<Item = &'a Report>,
    bbox: &BoundingBox,
    padding: f64,
) -> Vec<&'a Report> {
    let bbox = bbox.padded(padding);
    if !bbox.is_valid() {
        log::debug!("Viewport {bbox:?} is malformed, returning no reports");
        return Vec::new();
    }

    reports
        .into_iter()
        .filter(|r| bbox.contains(r.lat, r.lng))
        .collect()
}

/// Samples whose coordinate lies inside `bbox` grown by `padding` degrees.
///
/// An inverted or non-finite box yields no samples.
#[must_use]
pub fn samples_in_viewport<'a>(
    samples: impl IntoIterator<Item = &'a AqiSample>,
    bbox: &BoundingBox,
    padding: f64,
) -> Vec<&'a AqiSample> {
    let bbox = bbox.padded(padding);
    if !bbox.is_valid() {
        log::debug!("Viewport {bbox:?} is malformed, returning no samples");
        return Vec::new();
    }

    samples
        .into_iter()
        .filter(|s| bbox.contains(s.lat, s.lon))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::air_report;
    use citizen_map_report_models::AirQualityLevel;

    #[test]
    fn keeps_reports_inside_box() {
        let reports = vec![
            air_report("a", 10.77, 106.70, Some(AirQualityLevel::Good), 0),
            air_report("b", 10.95, 106.70, Some(AirQualityLevel::Good), 0),
            air_report("c", 10.80, 106.75, Some(AirQualityLevel::Good), 0),
        ];
        let bbox = BoundingBox::from_extents(10.7, 106.6, 10.9, 106.8);
        let ids: Vec<&str> = reports_in_viewport(&reports, &bbox, 0.0)
            .iter()
            .map(|r| r.id.as_str())
            .collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[test]
    fn padding_widens_the_box() {
        let reports = vec![air_report("b", 10.95, 106.70, None, 0)];
        let bbox = BoundingBox::from_extents(10.7, 106.6, 10.9, 106.8);
        assert!(reports_in_viewport(&reports, &bbox, 0.0).is_empty());
        assert_eq!(reports_in_viewport(&reports, &bbox, 0.1).len(), 1);
    }

    #[test]
    fn malformed_box_is_empty() {
        let reports = vec![air_report("a", 10.77, 106.70, None, 0)];
        let bbox = BoundingBox::from_extents(10.9, 106.6, 10.7, 106.8);
        assert!(reports_in_viewport(&reports, &bbox, 0.0).is_empty());

        let nan = BoundingBox::new(f64::NAN, 10.7, 106.8, 10.9);
        assert!(reports_in_viewport(&reports, &nan, 0.0).is_empty());
    }

    #[test]
    fn filters_samples() {
        let samples = vec![
            AqiSample::from((10.75, 106.65, Some(2.0), Some(20.0))),
            AqiSample::from((12.0, 106.65, Some(2.0), None)),
        ];
        let bbox = BoundingBox::from_extents(10.7, 106.6, 10.9, 106.8);
        assert_eq!(samples_in_viewport(&samples, &bbox, 0.0).len(), 1);
    }
}

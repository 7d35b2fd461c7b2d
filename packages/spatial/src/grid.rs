//! Sampling grid generation for viewport air quality lookups.

use citizen_map_report_models::{BoundingBox, GeoPoint};
use geo::{Destination, Haversine, Point};

/// Spacing between sampling points when none is configured.
pub const DEFAULT_GRID_SPACING_KM: f64 = 5.0;

/// Upper bound on grid size; larger viewports are truncated.
const MAX_GRID_POINTS: usize = 10_000;

const BEARING_NORTH: f64 = 0.0;
const BEARING_EAST: f64 = 90.0;

/// Lays out sampling coordinates across `bbox`, `spacing_km` apart.
///
/// Rows start at the west edge, beginning in the south-west corner, and
/// step east along the great circle until they pass the east edge. The
/// next row starts at the west edge one spacing further north. Generation
/// stops once a row starts north of the box. Rows also end at the
/// antimeridian, and the grid ends at the pole. Coordinates are rounded to
/// six decimals so they can be used as stable cache keys.
///
/// Returns an empty grid for an invalid box or a non-positive spacing.
#[must_use]
pub fn sampling_grid(bbox: &BoundingBox, spacing_km: f64) -> Vec<GeoPoint> {
    if !bbox.is_valid() || spacing_km.is_nan() || spacing_km <= 0.0 {
        log::debug!("No sampling grid for bbox={bbox:?} spacing_km={spacing_km}");
        return Vec::new();
    }

    let step_m = spacing_km * 1000.0;
    let mut points = Vec::new();
    let mut current = Point::new(bbox.west, bbox.south);

    while current.y() <= bbox.north {
        if points.len() >= MAX_GRID_POINTS {
            log::warn!(
                "Sampling grid truncated at {MAX_GRID_POINTS} points for bbox={bbox:?} \
                 spacing_km={spacing_km}"
            );
            break;
        }

        points.push(GeoPoint::new(round6(current.y()), round6(current.x())));
        let next = Haversine.destination(current, BEARING_EAST, step_m);

        // A step past 180° wraps to -180, so a decreasing longitude also
        // ends the row.
        if next.x() <= bbox.east && next.x() > current.x() {
            current = next;
            continue;
        }

        let row_start = Point::new(bbox.west, current.y());
        let next_row = Haversine.destination(row_start, BEARING_NORTH, step_m);
        // Stepping over the pole lowers the latitude.
        if next_row.y() <= row_start.y() {
            break;
        }
        current = next_row;
    }

    log::trace!("Sampling grid has {} points", points.len());
    points
}

fn round6(value: f64) -> f64 {
    (value * 1e6).round() / 1e6
}

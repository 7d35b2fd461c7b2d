#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Spatial helpers for the citizen map.
//!
//! [`sampling_grid`] lays out the coordinates at which air quality samples
//! are requested for a viewport, and [`PointIndex`] answers viewport and
//! neighborhood lookups over report locations with an R-tree.

pub mod grid;

use citizen_map_report_models::{BoundingBox, GeoPoint};
use rstar::{AABB, RTree, RTreeObject};

pub use grid::{DEFAULT_GRID_SPACING_KM, sampling_grid};

/// A point stored in the R-tree with the position of its source item.
struct IndexedPoint {
    slot: usize,
    envelope: AABB<[f64; 2]>,
}

impl RTreeObject for IndexedPoint {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

/// R-tree over a list of coordinates.
///
/// Lookups return positions into the list the index was built from, in
/// ascending order.
pub struct PointIndex {
    tree: RTree<IndexedPoint>,
}

impl PointIndex {
    /// Builds an index over `points`.
    #[must_use]
    pub fn new(points: impl IntoIterator<Item = GeoPoint>) -> Self {
        let entries: Vec<IndexedPoint> = points
            .into_iter()
            .enumerate()
            .filter(|(_, p)| p.lat.is_finite() && p.lng.is_finite())
            .map(|(slot, p)| IndexedPoint {
                slot,
                envelope: AABB::from_point([p.lng, p.lat]),
            })
            .collect();

        Self {
            tree: RTree::bulk_load(entries),
        }
    }

    /// Number of indexed points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    /// Whether the index is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Positions of the points inside `bbox`, edges included.
    ///
    /// An invalid box matches nothing.
    #[must_use]
    pub fn within(&self, bbox: &BoundingBox) -> Vec<usize> {
        if !bbox.is_valid() {
            log::debug!("Ignoring invalid bounding box {bbox:?}");
            return Vec::new();
        }

        let query = AABB::from_corners([bbox.west, bbox.south], [bbox.east, bbox.north]);
        let mut slots: Vec<usize> = self
            .tree
            .locate_in_envelope(&query)
            .map(|entry| entry.slot)
            .collect();
        slots.sort_unstable();
        slots
    }

    /// Positions of the points strictly within `tolerance` degrees of
    /// `center` on both axes.
    #[must_use]
    pub fn near(&self, center: GeoPoint, tolerance: f64) -> Vec<usize> {
        if tolerance.is_nan() || tolerance <= 0.0 {
            return Vec::new();
        }

        let query = AABB::from_corners(
            [center.lng - tolerance, center.lat - tolerance],
            [center.lng + tolerance, center.lat + tolerance],
        );
        let mut slots: Vec<usize> = self
            .tree
            .locate_in_envelope(&query)
            .filter(|entry| {
                let [lng, lat] = entry.envelope.lower();
                center.is_near(GeoPoint::new(lat, lng), tolerance)
            })
            .map(|entry| entry.slot)
            .collect();
        slots.sort_unstable();
        slots
    }
}

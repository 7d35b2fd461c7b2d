//! Map geometry types shared by the aggregator, spatial index, and store.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A WGS84 coordinate in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude.
    pub lat: f64,
    /// Longitude.
    pub lng: f64,
}

impl GeoPoint {
    /// Creates a new point.
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Whether `other` lies strictly within `tolerance` degrees on both axes.
    #[must_use]
    pub fn is_near(&self, other: Self, tolerance: f64) -> bool {
        (self.lat - other.lat).abs() < tolerance && (self.lng - other.lng).abs() < tolerance
    }
}

/// A geographic bounding box in WGS84 coordinates.
///
/// Also accepts the `lat_min`/`lon_min`/`lat_max`/`lon_max` field names
/// used by viewport fetch requests.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Western longitude boundary.
    #[serde(alias = "lon_min")]
    pub west: f64,
    /// Southern latitude boundary.
    #[serde(alias = "lat_min")]
    pub south: f64,
    /// Eastern longitude boundary.
    #[serde(alias = "lon_max")]
    pub east: f64,
    /// Northern latitude boundary.
    #[serde(alias = "lat_max")]
    pub north: f64,
}

impl BoundingBox {
    /// Creates a new bounding box from the given coordinates.
    #[must_use]
    pub const fn new(west: f64, south: f64, east: f64, north: f64) -> Self {
        Self {
            west,
            south,
            east,
            north,
        }
    }

    /// Creates a bounding box from latitude/longitude extents.
    #[must_use]
    pub const fn from_extents(lat_min: f64, lon_min: f64, lat_max: f64, lon_max: f64) -> Self {
        Self::new(lon_min, lat_min, lon_max, lat_max)
    }

    /// Whether the box is finite with `south <= north` and `west <= east`.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        [self.west, self.south, self.east, self.north]
            .iter()
            .all(|v| v.is_finite())
            && self.south <= self.north
            && self.west <= self.east
    }

    /// Whether the point lies inside the box, edges included.
    ///
    /// An invalid box contains nothing.
    #[must_use]
    pub fn contains(&self, lat: f64, lng: f64) -> bool {
        self.is_valid()
            && lat >= self.south
            && lat <= self.north
            && lng >= self.west
            && lng <= self.east
    }

    /// Grows the box by `margin` degrees on every side.
    #[must_use]
    pub fn padded(&self, margin: f64) -> Self {
        Self::new(
            self.west - margin,
            self.south - margin,
            self.east + margin,
            self.north + margin,
        )
    }
}

/// Error returned when a `"west,south,east,north"` string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseBoundingBoxError {
    /// The rejected input.
    pub input: String,
}

impl std::fmt::Display for ParseBoundingBoxError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid bounding box {:?}: expected west,south,east,north",
            self.input
        )
    }
}

impl std::error::Error for ParseBoundingBoxError {}

impl FromStr for BoundingBox {
    type Err = ParseBoundingBoxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let error = || ParseBoundingBoxError {
            input: s.to_string(),
        };
        let parts = s
            .split(',')
            .map(|p| p.trim().parse::<f64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| error())?;

        match parts[..] {
            [west, south, east, north] => Ok(Self::new(west, south, east, north)),
            _ => Err(error()),
        }
    }
}

/// A heatmap point: location plus an intensity in `[0, 1]`.
///
/// Serialized as a `[lat, lng, intensity]` tuple, the shape heatmap
/// renderers consume.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f64, f64, f64)", into = "(f64, f64, f64)")]
pub struct HeatPoint {
    /// Latitude.
    pub lat: f64,
    /// Longitude.
    pub lng: f64,
    /// Normalized intensity.
    pub intensity: f64,
}

impl From<(f64, f64, f64)> for HeatPoint {
    fn from((lat, lng, intensity): (f64, f64, f64)) -> Self {
        Self {
            lat,
            lng,
            intensity,
        }
    }
}

impl From<HeatPoint> for (f64, f64, f64) {
    fn from(p: HeatPoint) -> Self {
        (p.lat, p.lng, p.intensity)
    }
}

/// An air quality sample at a sampling-grid coordinate.
///
/// Serialized as a `[lat, lon, serverIndex, concentration]` tuple where
/// either reading may be `null`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(
    from = "(f64, f64, Option<f64>, Option<f64>)",
    into = "(f64, f64, Option<f64>, Option<f64>)"
)]
pub struct AqiSample {
    /// Latitude.
    pub lat: f64,
    /// Longitude.
    pub lon: f64,
    /// Index value reported by the upstream provider.
    pub server_index: Option<f64>,
    /// Raw PM2.5 concentration in µg/m³.
    pub concentration: Option<f64>,
}

impl AqiSample {
    /// Location of the sample.
    #[must_use]
    pub const fn point(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lon)
    }
}

impl From<(f64, f64, Option<f64>, Option<f64>)> for AqiSample {
    fn from((lat, lon, server_index, concentration): (f64, f64, Option<f64>, Option<f64>)) -> Self {
        Self {
            lat,
            lon,
            server_index,
            concentration,
        }
    }
}

impl From<AqiSample> for (f64, f64, Option<f64>, Option<f64>) {
    fn from(s: AqiSample) -> Self {
        (s.lat, s.lon, s.server_index, s.concentration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bbox_contains_edges() {
        let bbox = BoundingBox::from_extents(10.0, 106.0, 11.0, 107.0);
        assert!(bbox.contains(10.0, 106.0));
        assert!(bbox.contains(11.0, 107.0));
        assert!(bbox.contains(10.5, 106.5));
        assert!(!bbox.contains(11.000_1, 106.5));
        assert!(!bbox.contains(10.5, 105.9));
    }

    #[test]
    fn inverted_bbox_contains_nothing() {
        let bbox = BoundingBox::from_extents(11.0, 106.0, 10.0, 107.0);
        assert!(!bbox.is_valid());
        assert!(!bbox.contains(10.5, 106.5));
    }

    #[test]
    fn padding_grows_every_side() {
        let bbox = BoundingBox::new(106.0, 10.0, 107.0, 11.0).padded(0.5);
        assert_eq!(bbox, BoundingBox::new(105.5, 9.5, 107.5, 11.5));
    }

    #[test]
    fn parses_bbox_string() {
        let bbox: BoundingBox = "106.6, 10.7,106.8,10.9".parse().unwrap();
        assert_eq!(bbox, BoundingBox::new(106.6, 10.7, 106.8, 10.9));
        assert!("1,2,3".parse::<BoundingBox>().is_err());
    }

    #[test]
    fn bbox_string_rejects_junk_fields() {
        let err = "106.6,oops,10.7,106.8,10.9"
            .parse::<BoundingBox>()
            .unwrap_err();
        assert_eq!(err.input, "106.6,oops,10.7,106.8,10.9");
        assert!("106.6,10.7,106.8,".parse::<BoundingBox>().is_err());
        assert!("1,2,3,4,5".parse::<BoundingBox>().is_err());
    }

    #[test]
    fn bbox_accepts_extent_aliases() {
        let bbox: BoundingBox = serde_json::from_str(
            r#"{"lat_min": 10.0, "lon_min": 106.0, "lat_max": 11.0, "lon_max": 107.0}"#,
        )
        .unwrap();
        assert_eq!(bbox, BoundingBox::from_extents(10.0, 106.0, 11.0, 107.0));
    }

    #[test]
    fn sample_uses_tuple_form() {
        let sample: AqiSample = serde_json::from_str("[10.5, 106.7, 2, null]").unwrap();
        assert_eq!(sample.server_index, Some(2.0));
        assert_eq!(sample.concentration, None);

        let heat = HeatPoint::from((1.0, 2.0, 0.5));
        assert_eq!(serde_json::to_string(&heat).unwrap(), "[1.0,2.0,0.5]");
    }

    #[test]
    fn nearness_is_strict() {
        let p = GeoPoint::new(10.0, 106.0);
        assert!(p.is_near(GeoPoint::new(10.005, 106.005), 0.01));
        assert!(!p.is_near(GeoPoint::new(10.02, 106.0), 0.01));
    }
}

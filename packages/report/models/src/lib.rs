#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Citizen report types, severity levels, and map geometry.
//!
//! A [`Report`] is an air quality or noise observation submitted by a user
//! at a map location. Reports are immutable apart from their vote counters.
//! The JSON shape matches the REST API: flat camelCase fields with a
//! `type` discriminator and an `airQuality` or `noiseLevel` field.

pub mod geometry;
pub mod level;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

pub use geometry::{AqiSample, BoundingBox, GeoPoint, HeatPoint, ParseBoundingBoxError};
pub use level::{AirQualityLevel, InvalidLevelError, LevelStyle, MarkerIcon, NoiseLevel, Tone};

/// Kind of observation a report carries.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ReportType {
    /// Air quality observation.
    Air,
    /// Noise observation.
    Noise,
}

impl ReportType {
    /// Returns all report types.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Air, Self::Noise]
    }
}

/// The observation itself: its type and the matching severity level.
///
/// The level is optional because the upstream data may omit it or carry
/// an unrecognized value; consumers fall back to a documented default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Measurement {
    /// Air quality observation.
    Air {
        /// Reported air quality level.
        #[serde(
            rename = "airQuality",
            default,
            skip_serializing_if = "Option::is_none",
            deserialize_with = "level::lenient_air"
        )]
        air_quality: Option<AirQualityLevel>,
    },
    /// Noise observation.
    Noise {
        /// Reported noise level.
        #[serde(
            rename = "noiseLevel",
            default,
            skip_serializing_if = "Option::is_none",
            deserialize_with = "level::lenient_noise"
        )]
        noise_level: Option<NoiseLevel>,
    },
}

impl Measurement {
    /// The report type this measurement belongs to.
    #[must_use]
    pub const fn report_type(&self) -> ReportType {
        match self {
            Self::Air { .. } => ReportType::Air,
            Self::Noise { .. } => ReportType::Noise,
        }
    }
}

/// Direction of a user's vote on a report.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum VoteDirection {
    /// The report looks accurate.
    Up,
    /// The report looks inaccurate.
    Down,
}

impl VoteDirection {
    /// The other direction.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
        }
    }
}

/// Vote counters as confirmed by the server after a vote call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteTally {
    /// Number of upvotes.
    pub upvotes: u32,
    /// Number of downvotes.
    pub downvotes: u32,
}

/// A citizen report as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// Unique report ID.
    pub id: String,
    /// ID of the reporting user.
    pub user_id: String,
    /// Display name of the reporting user.
    pub user_name: String,
    /// Reputation score of the reporting user.
    #[serde(default)]
    pub user_reputation: i64,
    /// Latitude.
    pub lat: f64,
    /// Longitude.
    pub lng: f64,
    /// Observation type and level.
    #[serde(flatten)]
    pub measurement: Measurement,
    /// Free-text comment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Attached photo.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Attached audio clip.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
    /// When the report was submitted.
    pub timestamp: DateTime<Utc>,
    /// Number of upvotes.
    #[serde(default)]
    pub upvotes: u32,
    /// Number of downvotes.
    #[serde(default)]
    pub downvotes: u32,
    /// The current user's vote on this report, if any.
    #[serde(default)]
    pub user_vote: Option<VoteDirection>,
}

impl Report {
    /// The report type.
    #[must_use]
    pub const fn report_type(&self) -> ReportType {
        self.measurement.report_type()
    }

    /// Location of the report.
    #[must_use]
    pub const fn location(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lng)
    }

    /// Air quality level, if this is an air report with a known level.
    #[must_use]
    pub const fn air_quality(&self) -> Option<AirQualityLevel> {
        match self.measurement {
            Measurement::Air { air_quality } => air_quality,
            Measurement::Noise { .. } => None,
        }
    }

    /// Noise level, if this is a noise report with a known level.
    #[must_use]
    pub const fn noise_level(&self) -> Option<NoiseLevel> {
        match self.measurement {
            Measurement::Noise { noise_level } => noise_level,
            Measurement::Air { .. } => None,
        }
    }

    /// Marker style for this report's level.
    #[must_use]
    pub const fn style(&self) -> LevelStyle {
        match self.measurement {
            Measurement::Air { air_quality } => AirQualityLevel::style_or_default(air_quality),
            Measurement::Noise { noise_level } => NoiseLevel::style_or_default(noise_level),
        }
    }

    /// Current vote counters.
    #[must_use]
    pub const fn tally(&self) -> VoteTally {
        VoteTally {
            upvotes: self.upvotes,
            downvotes: self.downvotes,
        }
    }

    /// Overwrites the local counters with the server-confirmed tally.
    pub const fn confirm_tally(&mut self, tally: VoteTally) {
        self.upvotes = tally.upvotes;
        self.downvotes = tally.downvotes;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const AIR_JSON: &str = r#"{
        "id": "r1",
        "userId": "u1",
        "userName": "Lan",
        "userReputation": 120,
        "lat": 10.7769,
        "lng": 106.7009,
        "type": "air",
        "airQuality": "very_unhealthy",
        "timestamp": "2025-03-01T08:30:00Z",
        "upvotes": 3,
        "downvotes": 1,
        "userVote": "up"
    }"#;

    #[test]
    fn deserializes_flat_air_report() {
        let report: Report = serde_json::from_str(AIR_JSON).unwrap();
        assert_eq!(report.report_type(), ReportType::Air);
        assert_eq!(report.air_quality(), Some(AirQualityLevel::VeryUnhealthy));
        assert_eq!(report.noise_level(), None);
        assert_eq!(report.user_vote, Some(VoteDirection::Up));
        assert_eq!(report.tally(), VoteTally { upvotes: 3, downvotes: 1 });
    }

    #[test]
    fn accepts_ordinal_levels() {
        let json = AIR_JSON.replace(r#""very_unhealthy""#, "2");
        let report: Report = serde_json::from_str(&json).unwrap();
        assert_eq!(report.air_quality(), Some(AirQualityLevel::Moderate));
    }

    #[test]
    fn unknown_level_falls_back_to_none() {
        let json = AIR_JSON.replace(r#""very_unhealthy""#, "9");
        let report: Report = serde_json::from_str(&json).unwrap();
        assert_eq!(report.report_type(), ReportType::Air);
        assert_eq!(report.air_quality(), None);
        assert_eq!(report.style().tone, Tone::Gray);
    }

    #[test]
    fn noise_report_ignores_air_field() {
        let json = r#"{
            "id": "n1", "userId": "u2", "userName": "Minh",
            "lat": 10.0, "lng": 106.0,
            "type": "noise", "noiseLevel": "loud", "airQuality": "good",
            "timestamp": "2025-03-01T09:00:00Z"
        }"#;
        let report: Report = serde_json::from_str(json).unwrap();
        assert_eq!(report.noise_level(), Some(NoiseLevel::Loud));
        assert_eq!(report.air_quality(), None);
        assert_eq!(report.upvotes, 0);
        assert_eq!(report.user_vote, None);
    }

    #[test]
    fn serializes_back_to_flat_shape() {
        let report: Report = serde_json::from_str(AIR_JSON).unwrap();
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["type"], "air");
        assert_eq!(value["airQuality"], "very_unhealthy");
        assert!(value.get("noiseLevel").is_none());
        assert_eq!(value["userName"], "Lan");
    }

    #[test]
    fn confirm_tally_overwrites_counters() {
        let mut report: Report = serde_json::from_str(AIR_JSON).unwrap();
        report.confirm_tally(VoteTally {
            upvotes: 10,
            downvotes: 0,
        });
        assert_eq!(report.upvotes, 10);
        assert_eq!(report.downvotes, 0);
    }

    #[test]
    fn vote_direction_opposites() {
        assert_eq!(VoteDirection::Up.opposite(), VoteDirection::Down);
        assert_eq!("down".parse::<VoteDirection>().unwrap(), VoteDirection::Down);
    }
}

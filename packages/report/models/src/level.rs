//! Ordinal severity levels for air and noise reports.
//!
//! Both enums are the canonical representation of a report's severity.
//! They convert to and from the 1-based ordinal, the snake_case wire label
//! (`"very_unhealthy"`) and the human-readable label (`"Very Unhealthy"`).

use serde::{Deserialize, Deserializer, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Error returned when an ordinal does not name a level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidLevelError {
    /// The rejected ordinal.
    pub value: i64,
    /// Highest valid ordinal for the level kind.
    pub max: u8,
}

impl std::fmt::Display for InvalidLevelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid level value {}: expected 1-{}",
            self.value, self.max
        )
    }
}

impl std::error::Error for InvalidLevelError {}

/// Marker icon shown for a level on the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MarkerIcon {
    /// Smiling face.
    Smile,
    /// Frowning face.
    Frown,
    /// Warning triangle.
    AlertTriangle,
    /// Skull.
    Skull,
    /// Speaker with sound waves.
    Volume,
    /// Speaker crossed out.
    VolumeMuted,
}

/// Color family used for a level's marker and badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    /// Green.
    Green,
    /// Yellow.
    Yellow,
    /// Orange.
    Orange,
    /// Red.
    Red,
    /// Purple.
    Purple,
    /// Neutral gray for unknown levels.
    Gray,
}

impl Tone {
    /// Hex color for this tone.
    #[must_use]
    pub const fn hex(self) -> &'static str {
        match self {
            Self::Green => "#22c55e",
            Self::Yellow => "#eab308",
            Self::Orange => "#f97316",
            Self::Red => "#ef4444",
            Self::Purple => "#a855f7",
            Self::Gray => "#6b7280",
        }
    }
}

/// Presentation descriptor for a severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LevelStyle {
    /// Marker icon.
    pub icon: MarkerIcon,
    /// Color family.
    pub tone: Tone,
}

impl LevelStyle {
    const fn new(icon: MarkerIcon, tone: Tone) -> Self {
        Self { icon, tone }
    }
}

/// Air quality level reported by a citizen, from 1 (good) to 5 (hazardous).
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
pub enum AirQualityLevel {
    /// Level 1: clean air.
    Good = 1,
    /// Level 2: acceptable air.
    Moderate = 2,
    /// Level 3: unhealthy air.
    Unhealthy = 3,
    /// Level 4: very unhealthy air.
    VeryUnhealthy = 4,
    /// Level 5: hazardous air.
    Hazardous = 5,
}

impl AirQualityLevel {
    /// Label used when a report carries no usable air level.
    pub const DEFAULT_LABEL: &'static str = "Moderate";

    /// Returns the numeric value of this level.
    #[must_use]
    pub const fn value(self) -> u8 {
        self as u8
    }

    /// Creates a level from its ordinal.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not in the range 1-5.
    pub const fn from_value(value: i64) -> Result<Self, InvalidLevelError> {
        match value {
            1 => Ok(Self::Good),
            2 => Ok(Self::Moderate),
            3 => Ok(Self::Unhealthy),
            4 => Ok(Self::VeryUnhealthy),
            5 => Ok(Self::Hazardous),
            _ => Err(InvalidLevelError { value, max: 5 }),
        }
    }

    /// Parses either the wire label or the display label.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        normalize_label(label).parse().ok()
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Good => "Good",
            Self::Moderate => "Moderate",
            Self::Unhealthy => "Unhealthy",
            Self::VeryUnhealthy => "Very Unhealthy",
            Self::Hazardous => "Hazardous",
        }
    }

    /// Marker style for this level.
    #[must_use]
    pub const fn style(self) -> LevelStyle {
        match self {
            Self::Good => LevelStyle::new(MarkerIcon::Smile, Tone::Green),
            Self::Moderate => LevelStyle::new(MarkerIcon::Smile, Tone::Yellow),
            Self::Unhealthy => LevelStyle::new(MarkerIcon::Frown, Tone::Orange),
            Self::VeryUnhealthy => LevelStyle::new(MarkerIcon::AlertTriangle, Tone::Red),
            Self::Hazardous => LevelStyle::new(MarkerIcon::Skull, Tone::Purple),
        }
    }

    /// Marker style for an optional level, gray when absent.
    #[must_use]
    pub const fn style_or_default(level: Option<Self>) -> LevelStyle {
        match level {
            Some(level) => level.style(),
            None => LevelStyle::new(MarkerIcon::Smile, Tone::Gray),
        }
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Good,
            Self::Moderate,
            Self::Unhealthy,
            Self::VeryUnhealthy,
            Self::Hazardous,
        ]
    }
}

/// Noise level reported by a citizen, from 1 (quiet) to 4 (very loud).
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
pub enum NoiseLevel {
    /// Level 1: quiet.
    Quiet = 1,
    /// Level 2: normal street noise.
    Moderate = 2,
    /// Level 3: loud.
    Loud = 3,
    /// Level 4: very loud.
    VeryLoud = 4,
}

impl NoiseLevel {
    /// Label used when a report carries no usable noise level.
    pub const DEFAULT_LABEL: &'static str = "Moderate";

    /// Returns the numeric value of this level.
    #[must_use]
    pub const fn value(self) -> u8 {
        self as u8
    }

    /// Creates a level from its ordinal.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not in the range 1-4.
    pub const fn from_value(value: i64) -> Result<Self, InvalidLevelError> {
        match value {
            1 => Ok(Self::Quiet),
            2 => Ok(Self::Moderate),
            3 => Ok(Self::Loud),
            4 => Ok(Self::VeryLoud),
            _ => Err(InvalidLevelError { value, max: 4 }),
        }
    }

    /// Parses either the wire label or the display label.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        normalize_label(label).parse().ok()
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Quiet => "Quiet",
            Self::Moderate => "Moderate",
            Self::Loud => "Loud",
            Self::VeryLoud => "Very Loud",
        }
    }

    /// Marker style for this level.
    #[must_use]
    pub const fn style(self) -> LevelStyle {
        match self {
            Self::Quiet => LevelStyle::new(MarkerIcon::VolumeMuted, Tone::Green),
            Self::Moderate => LevelStyle::new(MarkerIcon::Volume, Tone::Yellow),
            Self::Loud => LevelStyle::new(MarkerIcon::Volume, Tone::Orange),
            Self::VeryLoud => LevelStyle::new(MarkerIcon::Volume, Tone::Red),
        }
    }

    /// Marker style for an optional level, gray when absent.
    #[must_use]
    pub const fn style_or_default(level: Option<Self>) -> LevelStyle {
        match level {
            Some(level) => level.style(),
            None => LevelStyle::new(MarkerIcon::Volume, Tone::Gray),
        }
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Quiet, Self::Moderate, Self::Loud, Self::VeryLoud]
    }
}

fn normalize_label(label: &str) -> String {
    label.trim().replace([' ', '-'], "_")
}

/// A level as it may appear on the wire: an ordinal or a label.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawLevel {
    Ordinal(i64),
    Label(String),
}

/// Deserializes an air level from an ordinal or label, mapping anything
/// unrecognized to `None`.
pub(crate) fn lenient_air<'de, D>(deserializer: D) -> Result<Option<AirQualityLevel>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<RawLevel>::deserialize(deserializer)? {
        None => None,
        Some(RawLevel::Ordinal(v)) => AirQualityLevel::from_value(v)
            .inspect_err(|e| log::warn!("Ignoring air quality level: {e}"))
            .ok(),
        Some(RawLevel::Label(s)) => {
            let level = AirQualityLevel::from_label(&s);
            if level.is_none() {
                log::warn!("Ignoring unknown air quality label {s:?}");
            }
            level
        }
    })
}

/// Deserializes a noise level from an ordinal or label, mapping anything
/// unrecognized to `None`.
pub(crate) fn lenient_noise<'de, D>(deserializer: D) -> Result<Option<NoiseLevel>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<RawLevel>::deserialize(deserializer)? {
        None => None,
        Some(RawLevel::Ordinal(v)) => NoiseLevel::from_value(v)
            .inspect_err(|e| log::warn!("Ignoring noise level: {e}"))
            .ok(),
        Some(RawLevel::Label(s)) => {
            let level = NoiseLevel::from_label(&s);
            if level.is_none() {
                log::warn!("Ignoring unknown noise label {s:?}");
            }
            level
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn air_from_value_roundtrip() {
        for level in AirQualityLevel::all() {
            let parsed = AirQualityLevel::from_value(i64::from(level.value())).unwrap();
            assert_eq!(parsed, *level);
        }
        assert!(AirQualityLevel::from_value(0).is_err());
        assert!(AirQualityLevel::from_value(6).is_err());
    }

    #[test]
    fn noise_from_value_rejects_out_of_range() {
        assert_eq!(NoiseLevel::from_value(4).unwrap(), NoiseLevel::VeryLoud);
        let err = NoiseLevel::from_value(5).unwrap_err();
        assert_eq!(err.to_string(), "invalid level value 5: expected 1-4");
    }

    #[test]
    fn labels_parse_in_both_forms() {
        assert_eq!(
            AirQualityLevel::from_label("very_unhealthy"),
            Some(AirQualityLevel::VeryUnhealthy)
        );
        assert_eq!(
            AirQualityLevel::from_label("Very Unhealthy"),
            Some(AirQualityLevel::VeryUnhealthy)
        );
        assert_eq!(NoiseLevel::from_label("Very Loud"), Some(NoiseLevel::VeryLoud));
        assert_eq!(NoiseLevel::from_label("deafening"), None);
    }

    #[test]
    fn wire_label_matches_display() {
        assert_eq!(AirQualityLevel::VeryUnhealthy.to_string(), "very_unhealthy");
        assert_eq!(NoiseLevel::Quiet.as_ref(), "quiet");
    }

    #[test]
    fn every_level_has_a_distinct_tone() {
        let tones: std::collections::BTreeSet<_> = AirQualityLevel::all()
            .iter()
            .map(|l| l.style().tone.hex())
            .collect();
        assert_eq!(tones.len(), AirQualityLevel::all().len());
        assert_eq!(
            AirQualityLevel::style_or_default(None).tone,
            Tone::Gray
        );
    }
}

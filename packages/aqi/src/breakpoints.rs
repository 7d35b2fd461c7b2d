//! US EPA breakpoint tables and piecewise-linear index interpolation.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// One row of a breakpoint table: a concentration interval and the index
/// interval it maps onto.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BreakpointRange {
    /// Lowest concentration in the bracket (inclusive).
    pub concentration_low: f64,
    /// Highest concentration in the bracket (inclusive).
    pub concentration_high: f64,
    /// Index at `concentration_low`.
    pub index_low: f64,
    /// Index at `concentration_high`.
    pub index_high: f64,
}

impl BreakpointRange {
    const fn new(
        concentration_low: f64,
        concentration_high: f64,
        index_low: f64,
        index_high: f64,
    ) -> Self {
        Self {
            concentration_low,
            concentration_high,
            index_low,
            index_high,
        }
    }

    /// Whether `concentration` lies inside this bracket, both ends included.
    #[must_use]
    pub fn contains(&self, concentration: f64) -> bool {
        concentration >= self.concentration_low && concentration <= self.concentration_high
    }

    /// Interpolates the index for a concentration on this bracket's line.
    #[must_use]
    pub fn interpolate(&self, concentration: f64) -> f64 {
        lerp(
            (self.concentration_low, self.index_low),
            (self.concentration_high, self.index_high),
            concentration,
        )
    }
}

/// Linear interpolation through two points.
///
/// The fraction is computed first so both endpoints map exactly.
fn lerp((x0, y0): (f64, f64), (x1, y1): (f64, f64), x: f64) -> f64 {
    let t = (x - x0) / (x1 - x0);
    t.mul_add(y1 - y0, y0)
}

/// PM2.5 (µg/m³, 24-hour) breakpoints.
pub const PM25_BREAKPOINTS: &[BreakpointRange] = &[
    BreakpointRange::new(0.0, 12.0, 0.0, 50.0),
    BreakpointRange::new(12.1, 35.4, 51.0, 100.0),
    BreakpointRange::new(35.5, 55.4, 101.0, 150.0),
    BreakpointRange::new(55.5, 150.4, 151.0, 200.0),
    BreakpointRange::new(150.5, 250.4, 201.0, 300.0),
    BreakpointRange::new(250.5, 350.4, 301.0, 400.0),
    BreakpointRange::new(350.5, 500.4, 401.0, 500.0),
];

/// PM10 (µg/m³, 24-hour) breakpoints.
pub const PM10_BREAKPOINTS: &[BreakpointRange] = &[
    BreakpointRange::new(0.0, 54.0, 0.0, 50.0),
    BreakpointRange::new(55.0, 154.0, 51.0, 100.0),
    BreakpointRange::new(155.0, 254.0, 101.0, 150.0),
    BreakpointRange::new(255.0, 354.0, 151.0, 200.0),
    BreakpointRange::new(355.0, 424.0, 201.0, 300.0),
    BreakpointRange::new(425.0, 504.0, 301.0, 400.0),
    BreakpointRange::new(505.0, 604.0, 401.0, 500.0),
];

/// Pollutant whose concentration is being converted.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
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
pub enum Pollutant {
    /// Fine particulate matter.
    #[default]
    Pm25,
    /// Coarse particulate matter.
    Pm10,
}

impl Pollutant {
    /// Breakpoint table for this pollutant.
    #[must_use]
    pub const fn breakpoints(self) -> &'static [BreakpointRange] {
        match self {
            Self::Pm25 => PM25_BREAKPOINTS,
            Self::Pm10 => PM10_BREAKPOINTS,
        }
    }

    /// Converts a concentration of this pollutant to an index.
    #[must_use]
    pub fn to_index(self, concentration: f64) -> f64 {
        index_from_table(self.breakpoints(), concentration)
    }
}

/// Converts a PM2.5 concentration to an index in `[0, 500]`.
///
/// Negative concentrations are treated as 0 and anything above the top
/// bracket is capped at 500.
///
/// Values in the gaps between published brackets (12.05, for example) are
/// interpolated across the gap rather than mapped to 0 as the web client's
/// `pm25ToAqi` does, so the index never drops as the concentration rises.
#[must_use]
pub fn concentration_to_index(concentration: f64) -> f64 {
    index_from_table(PM25_BREAKPOINTS, concentration)
}

/// Converts a concentration to an index using `table`.
///
/// The table must be ascending and non-overlapping. Published tables leave
/// a small gap between brackets (12.0 to 12.1 for PM2.5); a value inside
/// such a gap is interpolated between the two neighboring bracket ends so
/// the mapping stays monotone. A value matching no bracket, such as one
/// below a table that does not start at 0, yields 0.
#[must_use]
pub fn index_from_table(table: &[BreakpointRange], concentration: f64) -> f64 {
    let c = concentration.max(0.0);

    let Some(top) = table.last() else {
        return 0.0;
    };
    if c > top.concentration_high {
        return top.index_high;
    }

    let mut previous: Option<&BreakpointRange> = None;
    for range in table {
        if range.contains(c) {
            return range.interpolate(c);
        }
        if c < range.concentration_low {
            return previous.map_or(0.0, |prev| {
                lerp(
                    (prev.concentration_high, prev.index_high),
                    (range.concentration_low, range.index_low),
                    c,
                )
            });
        }
        previous = Some(range);
    }

    log::trace!("Concentration {c} matched no breakpoint bracket");
    0.0
}

//! Air quality samples cached per sampling-grid coordinate.
//!
//! A viewport request lays out a grid, serves the fresh cached samples,
//! fetches the rest upstream, and merges the results back. When a fetch
//! fails the previous sample for that coordinate is served even if stale.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use citizen_map_report_models::{AqiSample, GeoPoint};
use serde::Serialize;

/// Age after which a cached sample is refetched.
pub const DEFAULT_MAX_AGE_MINUTES: i64 = 15;

/// Grid coordinate in micro-degrees, so float coordinates can be keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
struct GridKey(i64, i64);

impl From<GeoPoint> for GridKey {
    #[allow(clippy::cast_possible_truncation)]
    fn from(point: GeoPoint) -> Self {
        Self(
            (point.lat * 1e6).round() as i64,
            (point.lng * 1e6).round() as i64,
        )
    }
}

#[derive(Debug, Clone, Copy)]
struct CachedSample {
    point: GeoPoint,
    sample: AqiSample,
    updated_at: DateTime<Utc>,
}

/// Result of an upstream fetch for one grid coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FetchOutcome {
    /// The requested coordinate.
    pub point: GeoPoint,
    /// The fetched sample, or `None` if the fetch failed.
    pub sample: Option<AqiSample>,
}

/// How to satisfy a grid request.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshPlan {
    /// Fresh cached samples, in grid order.
    pub cached: Vec<AqiSample>,
    /// Coordinates with no sample or a stale one, in grid order.
    pub to_fetch: Vec<GeoPoint>,
}

/// Cache of the most recent sample at each grid coordinate.
#[derive(Debug, Clone)]
pub struct AqiSampleCache {
    entries: BTreeMap<GridKey, CachedSample>,
    max_age: Duration,
}

impl Default for AqiSampleCache {
    fn default() -> Self {
        Self::new(Duration::minutes(DEFAULT_MAX_AGE_MINUTES))
    }
}

impl AqiSampleCache {
    /// Creates an empty cache whose samples go stale after `max_age`.
    #[must_use]
    pub const fn new(max_age: Duration) -> Self {
        Self {
            entries: BTreeMap::new(),
            max_age,
        }
    }

    /// Number of cached coordinates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn is_fresh(&self, entry: &CachedSample, now: DateTime<Utc>) -> bool {
        now - entry.updated_at < self.max_age
    }

    /// Splits `grid` into fresh cached samples and coordinates to fetch.
    #[must_use]
    pub fn plan_refresh(&self, grid: &[GeoPoint], now: DateTime<Utc>) -> RefreshPlan {
        let mut plan = RefreshPlan::default();
        for &point in grid {
            match self.entries.get(&GridKey::from(point)) {
                Some(entry) if self.is_fresh(entry, now) => plan.cached.push(entry.sample),
                _ => plan.to_fetch.push(point),
            }
        }

        log::debug!(
            "Sample refresh plan: {} cached, {} to fetch",
            plan.cached.len(),
            plan.to_fetch.len()
        );
        plan
    }

    /// Stores a sample fetched at `now` under its own coordinate.
    pub fn record(&mut self, sample: AqiSample, now: DateTime<Utc>) {
        self.record_at(sample.point(), sample, now);
    }

    /// Stores a sample fetched at `now` under the grid coordinate it was
    /// requested for.
    pub fn record_at(&mut self, point: GeoPoint, sample: AqiSample, now: DateTime<Utc>) {
        self.entries.insert(
            GridKey::from(point),
            CachedSample {
                point,
                sample,
                updated_at: now,
            },
        );
    }

    /// Records successful fetches under their requested coordinates and
    /// returns the best available sample for every grid coordinate, in
    /// grid order.
    ///
    /// Coordinates whose fetch failed fall back to their previous sample;
    /// coordinates that were never sampled are omitted.
    pub fn merge(
        &mut self,
        grid: &[GeoPoint],
        fetched: impl IntoIterator<Item = FetchOutcome>,
        now: DateTime<Utc>,
    ) -> Vec<AqiSample> {
        let mut failures = 0_usize;
        for outcome in fetched {
            match outcome.sample {
                Some(sample) => self.record_at(outcome.point, sample, now),
                None => failures += 1,
            }
        }
        if failures > 0 {
            log::warn!("{failures} sample fetches failed, serving previous samples");
        }

        grid.iter()
            .filter_map(|&point| self.entries.get(&GridKey::from(point)))
            .map(|entry| entry.sample)
            .collect()
    }

    /// Coordinates of every cached sample that has gone stale.
    #[must_use]
    pub fn stale_points(&self, now: DateTime<Utc>) -> Vec<GeoPoint> {
        self.entries
            .values()
            .filter(|entry| !self.is_fresh(entry, now))
            .map(|entry| entry.point)
            .collect()
    }
}
